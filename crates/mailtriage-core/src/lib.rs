//! MailTriage Core — configuration and error types shared by all crates.

pub mod config;
pub mod error;

pub use config::MailTriageConfig;
pub use error::{Error, Result};
