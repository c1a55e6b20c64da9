//! Registry Configuration
//!
//! Loads configuration from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::codec::CodecFormat;

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one role definition per file (default: "assets/role")
    pub role_dir: PathBuf,

    /// Format of stored role sets (default: json)
    pub state_format: CodecFormat,

    /// Stored role set to inspect at startup (optional)
    pub state_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let state_format = match env::var("ROLE_STATE_FORMAT") {
            Ok(value) => value
                .parse::<CodecFormat>()
                .with_context(|| format!("ROLE_STATE_FORMAT is invalid: {value}"))?,
            Err(_) => CodecFormat::default(),
        };

        Ok(Self {
            role_dir: env::var("ROLE_DIR")
                .unwrap_or_else(|_| "assets/role".into())
                .into(),
            state_format,
            state_file: env::var("ROLE_STATE_FILE").ok().map(PathBuf::from),
        })
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            role_dir: "assets/role".into(),
            state_format: CodecFormat::Json,
            state_file: None,
        }
    }
}
