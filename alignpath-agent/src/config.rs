//! Agent configuration
//!
//! Resolution order per setting: CLI flag, environment variable, `[agent]`
//! section of the TOML file, compiled default.

use alignpath_common::api::SharedToken;
use alignpath_common::config::{resolve, AgentToml};
use alignpath_common::{Error, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::services::gemini_client::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::services::GeminiConfig;

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 120;

/// Command-line arguments for alignpath-agent
#[derive(Parser, Debug, Default)]
#[command(name = "alignpath-agent")]
#[command(about = "Study analysis and lesson personalization microservice")]
#[command(version)]
pub struct Args {
    /// Optional TOML config file
    #[arg(short, long, env = "ALIGNPATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "ALIGNPATH_AGENT_BIND")]
    pub bind: Option<String>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL")]
    pub gemini_model: Option<String>,

    #[arg(long, env = "GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    #[arg(long, env = "GEMINI_TEMPERATURE")]
    pub gemini_temperature: Option<f32>,

    /// Shared bearer secret; unset or blank disables authorization
    #[arg(long, env = "AI_AGENT_SHARED_TOKEN", hide_env_values = true)]
    pub shared_token: Option<String>,

    /// Upstream model timeout in seconds (0 waits indefinitely)
    #[arg(long, env = "ALIGNPATH_MODEL_TIMEOUT_SECS")]
    pub model_timeout_secs: Option<u64>,
}

/// Fully resolved agent settings
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub bind: SocketAddr,
    pub gemini: GeminiConfig,
    pub shared_token: Option<SharedToken>,
}

impl AgentConfig {
    pub fn resolve(args: Args, toml: AgentToml) -> Result<Self> {
        let bind = resolve(args.bind, toml.bind, DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        let api_key = args
            .gemini_api_key
            .or(toml.gemini_api_key)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::Config("GEMINI_API_KEY is not set".to_string()))?;

        let timeout_secs = resolve(
            args.model_timeout_secs,
            toml.model_timeout_secs,
            DEFAULT_MODEL_TIMEOUT_SECS,
        );

        let shared_token = SharedToken::from_config(args.shared_token.or(toml.shared_token));
        if shared_token
            .as_ref()
            .is_some_and(SharedToken::has_surrounding_whitespace)
        {
            warn!("Shared token has surrounding whitespace; it must be sent verbatim");
        }

        Ok(Self {
            bind,
            gemini: GeminiConfig {
                api_key,
                model: resolve(args.gemini_model, toml.gemini_model, DEFAULT_MODEL.to_string()),
                base_url: resolve(
                    args.gemini_base_url,
                    toml.gemini_base_url,
                    DEFAULT_BASE_URL.to_string(),
                ),
                temperature: args.gemini_temperature.or(toml.gemini_temperature),
                timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            },
            shared_token,
        })
    }
}
