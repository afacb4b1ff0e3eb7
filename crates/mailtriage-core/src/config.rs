//! Configuration and data directory management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default maximum accepted email body length, in characters.
pub const DEFAULT_MAX_EMAIL_LEN: usize = 10_000;

/// Top-level MailTriage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailTriageConfig {
    /// HTTP server port.
    pub port: u16,
    /// Directory holding ONNX models and tokenizers (`data/models/`).
    pub model_dir: PathBuf,
    /// Directory holding the static frontend (`data/static/`).
    pub static_dir: PathBuf,
    /// Maximum accepted email body length, in characters.
    pub max_email_len: usize,
}

impl MailTriageConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let data_dir = data_dir.as_ref();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let max_email_len = std::env::var("MAILTRIAGE_MAX_EMAIL_LEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_EMAIL_LEN);

        let config = Self {
            port,
            model_dir: data_dir.join("models"),
            static_dir: data_dir.join("static"),
            max_email_len,
        };
        config.ensure_dirs()?;
        Ok(config)
    }

    /// Create all required directories.
    fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.model_dir)?;
        std::fs::create_dir_all(&self.static_dir)?;
        Ok(())
    }
}
