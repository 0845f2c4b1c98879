//! Configuration file loading and value resolution
//!
//! Each service resolves every setting in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (`--config <FILE>`)
//! 4. Compiled default (fallback)
//!
//! Steps 1 and 2 are handled by clap in each binary; this module covers the
//! TOML file and the final merge.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Contents of an AlignPath TOML config file
///
/// Every key is optional; a file may configure one service or both.
///
/// ```toml
/// [agent]
/// bind = "0.0.0.0:5000"
/// gemini_model = "gemini-1.5-flash"
///
/// [stt]
/// model_size = "small"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub agent: AgentToml,
    pub stt: SttToml,
}

/// `[agent]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AgentToml {
    pub bind: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub gemini_temperature: Option<f32>,
    pub shared_token: Option<String>,
    pub model_timeout_secs: Option<u64>,
}

/// `[stt]` section
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SttToml {
    pub bind: Option<String>,
    pub skip_model_init: Option<bool>,
    pub model_size: Option<String>,
    pub compute_type: Option<String>,
    pub model_dir: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load a config file if one was given, otherwise use empty defaults
    ///
    /// An explicitly named file that cannot be read is an error.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Merge one setting: CLI/env value, then TOML value, then default
///
/// # Examples
///
/// ```
/// use alignpath_common::config::resolve;
///
/// assert_eq!(resolve(Some(1), Some(2), 3), 1);
/// assert_eq!(resolve(None, Some(2), 3), 2);
/// assert_eq!(resolve(None::<i32>, None, 3), 3);
/// ```
pub fn resolve<T>(cli_or_env: Option<T>, toml: Option<T>, default: T) -> T {
    cli_or_env.or(toml).unwrap_or(default)
}

/// Parse a loose boolean flag (`1`, `true`, `True`)
///
/// Anything else, including an unset variable, is `false`.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "True")
}
