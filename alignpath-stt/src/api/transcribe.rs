//! Transcription endpoint
//!
//! `POST /transcribe`, multipart fields:
//! - `audio`: the recording (required)
//! - `language`: ISO 639-1 code (optional, empty means auto-detect)

use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::assemble::{assemble_transcript, TranscriptionResult};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const AUDIO_FIELD: &str = "audio";
const LANGUAGE_FIELD: &str = "language";
const DEFAULT_SUFFIX: &str = ".webm";

/// Upload spooled to disk; the file is deleted when this is dropped
struct SpooledUpload {
    file: NamedTempFile,
    bytes: usize,
}

pub async fn transcribe(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<TranscriptionResult>> {
    // Fail fast, before touching the body
    let Some(model) = state.model.clone() else {
        return Err(ApiError::ModelUnavailable);
    };
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let mut upload: Option<SpooledUpload> = None;
    let mut language: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(AUDIO_FIELD) => upload = Some(spool(field).await?),
            Some(LANGUAGE_FIELD) => {
                let value = field.text().await?;
                let value = value.trim();
                language = (!value.is_empty()).then(|| value.to_string());
            }
            other => debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    let upload = upload
        .ok_or_else(|| ApiError::BadRequest("Missing 'audio' file field".to_string()))?;
    info!(
        bytes = upload.bytes,
        language = language.as_deref().unwrap_or("auto"),
        "Transcribing upload"
    );

    let audio_path = upload.file.path().to_path_buf();
    let segments = tokio::task::spawn_blocking(move || {
        model.transcribe(&audio_path, language.as_deref())
    })
    .await
    .map_err(|e| ApiError::Transcription(format!("Transcription task failed: {}", e)))??;

    // Temp file is removed here on success; early returns drop it the same way
    drop(upload);

    let result = assemble_transcript(&segments);
    info!(
        segments = segments.len(),
        chars = result.text.len(),
        "Transcription complete"
    );
    Ok(Json(result))
}

async fn spool(mut field: Field<'_>) -> ApiResult<SpooledUpload> {
    let suffix = upload_suffix(field.file_name());
    let file = tempfile::Builder::new()
        .prefix("alignpath-stt-")
        .suffix(&suffix)
        .tempfile()?;

    // `file` keeps ownership of the path; writes go through a second handle
    let mut writer = tokio::fs::File::from_std(file.reopen()?);
    let mut bytes = 0;
    while let Some(chunk) = field.chunk().await? {
        writer.write_all(&chunk).await?;
        bytes += chunk.len();
    }
    writer.flush().await?;
    drop(writer);

    debug!(path = %file.path().display(), bytes, "Spooled upload");
    Ok(SpooledUpload { file, bytes })
}

/// Temp file suffix from the uploaded file name, `.webm` when it has none
fn upload_suffix(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| DEFAULT_SUFFIX.to_string())
}
