use crate::cli::parser::{Cli, Commands};
use crate::config::Config;
use crate::core::Core;
use crate::errors::AppResult;
use crate::ui::messages::{success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database and its migrations
///  - the credential sheet
///  - optionally, the first admin account
pub fn handle(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let Commands::Init { admin, password } = &cli.command else {
        return Ok(());
    };

    // 1️⃣ config file + database path
    let mut cfg = cfg.clone();
    let db_path = cfg.init_all(cli.db.as_deref(), cli.test)?;

    println!("⚙️  Initializing rCheckin…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", db_path.display());

    // 2️⃣ open the store: runs migrations, creates the credential sheet
    let core = Core::open(&cfg)?;
    success(format!("Database initialized at {}", db_path.display()));

    // 3️⃣ first admin
    if let (Some(account), Some(password)) = (admin, password) {
        if core.bootstrap_admin(account, password)? {
            success(format!("Admin account '{}' created", account.trim()));
        } else {
            warning(format!("Account '{}' already exists, left unchanged", account.trim()));
        }
    }

    // 4️⃣ audit trail (non blocking)
    if let Err(e) = core.store().audit(
        "init",
        "",
        &format!("Database initialized at {}", db_path.display()),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    println!("🎉 rCheckin initialization completed!");
    Ok(())
}
