//! whisper.cpp backend
//!
//! One [`WhisperContext`] is loaded at startup and shared; every call creates
//! its own state, so concurrent requests need no locking.

use std::path::Path;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio::{decode_to_whisper_pcm, WHISPER_SAMPLE_RATE};
use crate::transcriber::{ModelSpec, Segment, TranscribeError, Transcriber};

/// Segments whose no-speech probability exceeds this are dropped by whisper
const NO_SPEECH_THRESHOLD: f32 = 0.6;

pub struct WhisperTranscriber {
    ctx: WhisperContext,
    label: String,
    n_threads: i32,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("label", &self.label)
            .field("n_threads", &self.n_threads)
            .finish_non_exhaustive()
    }
}

impl WhisperTranscriber {
    pub fn load(spec: &ModelSpec) -> Result<Self, TranscribeError> {
        let path = spec.model_path();
        if !path.exists() {
            return Err(TranscribeError::ModelNotFound(path));
        }
        let path_str = path.to_str().ok_or_else(|| {
            TranscribeError::ModelLoad(format!("non UTF-8 model path: {}", path.display()))
        })?;

        info!("Loading whisper model from {}", path.display());
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| TranscribeError::ModelLoad(e.to_string()))?;

        let n_threads = std::thread::available_parallelism()
            .map(|n| n.get().min(8) as i32)
            .unwrap_or(4);

        Ok(Self {
            ctx,
            label: format!("whisper-{}", spec.file_name().trim_end_matches(".bin")),
            n_threads,
        })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(
        &self,
        audio_path: &Path,
        language: Option<&str>,
    ) -> Result<Vec<Segment>, TranscribeError> {
        let audio = decode_to_whisper_pcm(audio_path)?;
        debug!(
            samples = audio.len(),
            seconds = audio.len() as f64 / WHISPER_SAMPLE_RATE as f64,
            language = language.unwrap_or("auto"),
            "Running whisper inference"
        );

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(language);
        params.set_n_threads(self.n_threads);
        params.set_no_speech_thold(NO_SPEECH_THRESHOLD);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_special(false);
        params.set_print_timestamps(false);

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;
        state
            .full(params, &audio)
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        let mut segments = Vec::with_capacity(n_segments.max(0) as usize);
        for i in 0..n_segments {
            let text = state.full_get_segment_text(i).ok();
            // Timestamps are centiseconds
            let t0 = state.full_get_segment_t0(i).unwrap_or(0).max(0);
            let t1 = state.full_get_segment_t1(i).unwrap_or(0).max(0);
            segments.push(Segment {
                text,
                start_secs: t0 as f64 / 100.0,
                end_secs: t1 as f64 / 100.0,
            });
        }

        Ok(segments)
    }

    fn name(&self) -> String {
        self.label.clone()
    }
}
