pub mod activity_log;
pub mod config;
pub mod error;
