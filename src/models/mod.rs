pub mod event;
pub mod language;
pub mod session;
pub mod user;
