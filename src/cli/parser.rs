use clap::{Parser, Subcommand};

/// Command-line interface definition for rCheckin
/// Attendance check-in service and its admin tools, backed by SQLite
#[derive(Parser)]
#[command(
    name = "rcheckin",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small attendance service: log in, check in, review and export monthly check-in history",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration and the database
    Init {
        #[arg(long, value_name = "ACCOUNT", requires = "password", help = "Create this admin account")]
        admin: Option<String>,

        #[arg(long, requires = "admin", help = "Password of the admin account")]
        password: Option<String>,
    },

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Run the HTTP API
    Serve {
        #[arg(long, help = "Address to bind (default from config)")]
        bind: Option<String>,

        #[arg(long, help = "Port to listen on (default from config)")]
        port: Option<u16>,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Record a check-in for an account, now
    Checkin {
        /// Account to check in
        account: String,
    },

    /// List months that have check-ins
    Months,

    /// Show the check-in history of a month
    History {
        #[arg(long, value_name = "YYYYMM")]
        month: String,

        #[arg(long, help = "Only this account (default: everybody)")]
        user: Option<String>,
    },

    /// Export the check-in history of a month to an .xlsx file
    Export {
        #[arg(long, value_name = "YYYYMM")]
        month: String,

        #[arg(long, help = "Only this account (default: everybody)")]
        user: Option<String>,

        #[arg(long, value_name = "FILE", help = "Output file, or a directory to use the default name")]
        file: String,

        #[arg(long, value_name = "LANG", help = "Header language: zh-TW or en")]
        lang: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Add an account
    Add {
        account: String,

        #[arg(long)]
        password: String,

        #[arg(long, default_value = "user", help = "user or admin")]
        role: String,

        #[arg(long, help = "Create the account disabled")]
        disabled: bool,
    },

    /// List all accounts
    List,

    /// Enable an account
    Enable { account: String },

    /// Disable an account
    Disable { account: String },

    /// Delete an account
    Del {
        account: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },
}
