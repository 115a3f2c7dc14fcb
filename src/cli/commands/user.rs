use crate::cli::parser::{Commands, UserAction};
use crate::config::Config;
use crate::core::{Core, NewUser};
use crate::errors::AppResult;
use crate::models::user::Role;
use crate::ui::labels::label;
use crate::ui::messages::{info, success, warning};
use crate::utils::table::Table;
use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::User { action } = cmd else {
        return Ok(());
    };

    let core = Core::open(cfg)?;
    let lang = cfg.default_language;
    let operator = core.operator_session(lang);

    match action {
        UserAction::Add {
            account,
            password,
            role,
            disabled,
        } => {
            let new_user = NewUser {
                account: account.clone(),
                secret: password.clone(),
                role: Role::parse(role)?,
                enabled: !disabled,
            };
            core.add_user(&operator, &new_user)?;
            success(format!("{}: {}", label(lang, "add_user_success"), account.trim()));
        }

        UserAction::List => {
            let users = core.list_users(&operator)?;
            if users.is_empty() {
                info(label(lang, "no_users"));
                return Ok(());
            }

            let mut table =
                Table::with_headers(&[label(lang, "account"), label(lang, "new_role"), label(lang, "enabled")]);
            for u in users {
                table.add_row(vec![
                    u.account,
                    u.role.to_db_str().to_string(),
                    if u.enabled { "Y" } else { "N" }.to_string(),
                ]);
            }
            print!("{}", table.render());
        }

        UserAction::Enable { account } | UserAction::Disable { account } => {
            let enabled = matches!(action, UserAction::Enable { .. });
            if core.set_enabled(&operator, account, enabled)? {
                let key = if enabled { "enabled_account" } else { "disabled_account" };
                success(format!("{}: {}", label(lang, key), account.trim()));
            } else {
                warning(format!("{}: {}", label(lang, "account_not_found"), account.trim()));
            }
        }

        UserAction::Del { account, yes } => {
            if !*yes
                && !ask_confirmation(&format!(
                    "Delete account '{}'? This action is irreversible.",
                    account.trim()
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let removed = core.delete_user(&operator, account)?;
            if removed == 0 {
                warning(format!("{}: {}", label(lang, "account_not_found"), account.trim()));
            } else {
                success(format!("{}: {}", label(lang, "deleted_account"), account.trim()));
            }
        }
    }

    Ok(())
}
