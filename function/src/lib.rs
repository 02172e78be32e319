pub mod config;
pub mod event;
pub mod handler;

pub use config::HandlerConfig;
pub use handler::{handle, HandlerError, Response};
