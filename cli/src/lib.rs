pub mod commands;
pub mod config_file;
pub mod error;
pub mod logger;
pub mod runner;
