//! Transcription backend contract
//!
//! A [`Transcriber`] turns one audio file into chronologically ordered
//! [`Segment`]s. Inference is CPU-bound, so handlers call it from
//! `tokio::task::spawn_blocking`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Time-bounded fragment of transcribed audio
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// `None` when the backend produced no text for the span
    pub text: Option<String>,
    pub start_secs: f64,
    pub end_secs: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>, start_secs: f64, end_secs: f64) -> Self {
        Self {
            text: Some(text.into()),
            start_secs,
            end_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Failed to load model: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Transcription backend unavailable: {0}")]
    Unsupported(String),
}

/// Speech-to-text backend shared by all requests
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path`
    ///
    /// `language` is an ISO 639-1 code; `None` lets the backend detect it.
    fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<Segment>, TranscribeError>;

    /// Backend identifier for logs and `/health`
    fn name(&self) -> String;
}

/// Loaded model, or `None` when initialization was skipped or failed
pub type ModelHandle = Option<Arc<dyn Transcriber>>;

// ========================================
// Model selection
// ========================================

/// Whisper model size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    LargeV3,
}

impl ModelSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::LargeV3 => "large-v3",
        }
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" | "large-v3" => Ok(ModelSize::LargeV3),
            other => Err(format!(
                "unknown model size '{}' (expected tiny|base|small|medium|large-v3)",
                other
            )),
        }
    }
}

/// Weight precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputeType {
    Int8,
    Int5,
    Float16,
}

impl ComputeType {
    /// ggml quantization suffix, `None` for unquantized weights
    pub fn quantization(self) -> Option<&'static str> {
        match self {
            ComputeType::Int8 => Some("q8_0"),
            ComputeType::Int5 => Some("q5_1"),
            ComputeType::Float16 => None,
        }
    }
}

impl FromStr for ComputeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "int8" => Ok(ComputeType::Int8),
            "int5" => Ok(ComputeType::Int5),
            "float16" | "default" => Ok(ComputeType::Float16),
            other => Err(format!(
                "unknown compute type '{}' (expected int8|int5|float16|default)",
                other
            )),
        }
    }
}

/// Which model to load and from where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub size: ModelSize,
    pub compute_type: ComputeType,
    pub model_dir: PathBuf,
}

impl ModelSpec {
    /// ggml file name, e.g. `ggml-base-q8_0.bin`
    pub fn file_name(&self) -> String {
        match self.compute_type.quantization() {
            Some(quant) => format!("ggml-{}-{}.bin", self.size, quant),
            None => format!("ggml-{}.bin", self.size),
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(self.file_name())
    }
}

/// Load the configured backend
///
/// Fails with [`TranscribeError::Unsupported`] when the crate was built
/// without the `whisper` feature.
#[cfg(feature = "whisper")]
pub fn load_backend(spec: &ModelSpec) -> Result<Arc<dyn Transcriber>, TranscribeError> {
    let transcriber = crate::whisper::WhisperTranscriber::load(spec)?;
    Ok(Arc::new(transcriber))
}

#[cfg(not(feature = "whisper"))]
pub fn load_backend(spec: &ModelSpec) -> Result<Arc<dyn Transcriber>, TranscribeError> {
    Err(TranscribeError::Unsupported(format!(
        "built without the `whisper` feature, cannot load {}",
        spec.file_name()
    )))
}
