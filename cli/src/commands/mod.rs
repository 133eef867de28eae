pub mod care;
pub mod config;
pub mod init;
pub mod login;
pub mod notify;
pub mod plant;
pub mod profile;
