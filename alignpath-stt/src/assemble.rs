//! Transcript assembly

use serde::Serialize;

use crate::transcriber::Segment;

/// Body of a successful `/transcribe` response
///
/// Both fields carry the same text; existing callers read either name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub transcription: String,
}

impl TranscriptionResult {
    pub fn new(text: String) -> Self {
        Self {
            transcription: text.clone(),
            text,
        }
    }
}

/// Join segment texts in order with single spaces
///
/// Fragments are trimmed; absent and blank fragments are skipped.
///
/// # Examples
///
/// ```
/// use alignpath_stt::assemble::assemble_transcript;
/// use alignpath_stt::transcriber::Segment;
///
/// let segments = vec![
///     Segment::new("Hello", 0.0, 0.8),
///     Segment::new("", 0.8, 1.0),
///     Segment::new("world", 1.0, 1.6),
/// ];
/// assert_eq!(assemble_transcript(&segments).text, "Hello world");
/// ```
pub fn assemble_transcript(segments: &[Segment]) -> TranscriptionResult {
    let text = segments
        .iter()
        .filter_map(|segment| segment.text.as_deref())
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    TranscriptionResult::new(text)
}
