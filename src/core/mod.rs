pub mod accounts;
pub mod auth;
pub mod cache;
pub mod credentials;
pub mod history;
pub mod ledger;
pub mod log;
pub mod logic;
pub mod password;

pub use accounts::NewUser;
pub use logic::{Core, MonthList};
