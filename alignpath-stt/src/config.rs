//! STT service configuration
//!
//! Resolution order per setting: CLI flag, environment variable, `[stt]`
//! section of the TOML file, compiled default.

use alignpath_common::config::{parse_flag, resolve, SttToml};
use alignpath_common::{Error, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::transcriber::{ComputeType, ModelSize, ModelSpec};

pub const DEFAULT_BIND: &str = "127.0.0.1:8001";
pub const DEFAULT_MODEL_SIZE: &str = "base";
pub const DEFAULT_COMPUTE_TYPE: &str = "int8";
pub const DEFAULT_MODEL_DIR: &str = "./models";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Command-line arguments for alignpath-stt
#[derive(Parser, Debug, Default)]
#[command(name = "alignpath-stt")]
#[command(about = "Speech-to-text microservice")]
#[command(version)]
pub struct Args {
    /// Optional TOML config file
    #[arg(short, long, env = "ALIGNPATH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, env = "ALIGNPATH_STT_BIND")]
    pub bind: Option<String>,

    /// Skip model loading (`1`, `true`, `True`); `/transcribe` then returns 503
    #[arg(long, env = "STT_SKIP_MODEL_INIT")]
    pub skip_model_init: Option<String>,

    /// tiny | base | small | medium | large-v3
    #[arg(long, env = "STT_MODEL_SIZE")]
    pub model_size: Option<String>,

    /// int8 | int5 | float16 | default
    #[arg(long, env = "STT_COMPUTE_TYPE")]
    pub compute_type: Option<String>,

    /// Directory holding ggml model files
    #[arg(long, env = "STT_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Largest accepted request body in bytes
    #[arg(long, env = "STT_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<usize>,
}

/// Fully resolved STT settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SttConfig {
    pub bind: SocketAddr,
    pub skip_model_init: bool,
    pub model: ModelSpec,
    pub max_upload_bytes: usize,
}

impl SttConfig {
    pub fn resolve(args: Args, toml: SttToml) -> Result<Self> {
        let bind = resolve(args.bind, toml.bind, DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind, e)))?;

        let skip_model_init = match args.skip_model_init {
            Some(flag) => parse_flag(&flag),
            None => toml.skip_model_init.unwrap_or(false),
        };

        let size: ModelSize = resolve(
            args.model_size,
            toml.model_size,
            DEFAULT_MODEL_SIZE.to_string(),
        )
        .parse()
        .map_err(Error::Config)?;
        let compute_type: ComputeType = resolve(
            args.compute_type,
            toml.compute_type,
            DEFAULT_COMPUTE_TYPE.to_string(),
        )
        .parse()
        .map_err(Error::Config)?;
        let model_dir = resolve(
            args.model_dir,
            toml.model_dir.map(PathBuf::from),
            PathBuf::from(DEFAULT_MODEL_DIR),
        );

        let max_upload_bytes = resolve(
            args.max_upload_bytes,
            toml.max_upload_bytes,
            DEFAULT_MAX_UPLOAD_BYTES,
        );
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be positive".to_string()));
        }

        Ok(Self {
            bind,
            skip_model_init,
            model: ModelSpec {
                size,
                compute_type,
                model_dir,
            },
            max_upload_bytes,
        })
    }
}
