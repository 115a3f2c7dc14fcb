pub mod checkin;
pub mod config;
pub mod export;
pub mod history;
pub mod init;
pub mod log;
pub mod months;
pub mod serve;
pub mod user;
