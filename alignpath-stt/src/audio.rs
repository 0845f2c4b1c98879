//! Audio decoding to whisper input format
//!
//! Any container symphonia can probe (WAV, MP3, FLAC, OGG, WebM/Matroska,
//! AAC/MP4) is decoded, mixed down to mono and resampled to 16 kHz f32.

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::transcriber::TranscribeError;

/// Sample rate whisper models expect
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Decoded mono PCM
#[derive(Debug, Clone)]
pub struct MonoPcm {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoPcm {
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Decode `path` and return 16 kHz mono samples
pub fn decode_to_whisper_pcm(path: &Path) -> Result<Vec<f32>, TranscribeError> {
    let pcm = decode_mono(path)?;
    resample(pcm.samples, pcm.sample_rate, WHISPER_SAMPLE_RATE)
}

/// Decode the first audio track of `path`, averaging channels to mono
pub fn decode_mono(path: &Path) -> Result<MonoPcm, TranscribeError> {
    let file = std::fs::File::open(path)
        .map_err(|e| decode_error(format!("failed to open {}: {}", path.display(), e)))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| decode_error(format!("unrecognized audio format: {}", e)))?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_error("no audio track found".to_string()))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| decode_error("sample rate unknown".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_error(format!("unsupported codec: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(decode_error(format!("failed to read packet: {}", e))),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt packet; keep going
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(decode_error(format!("decoder failed: {}", e))),
        };

        let mut buffer: AudioBuffer<f32> = decoded.make_equivalent();
        decoded.convert(&mut buffer);
        mix_to_mono(&buffer, &mut samples);
    }

    if samples.is_empty() {
        return Err(decode_error("audio contains no samples".to_string()));
    }

    let pcm = MonoPcm {
        samples,
        sample_rate,
    };
    debug!(
        path = %path.display(),
        sample_rate,
        duration_secs = format!("{:.2}", pcm.duration_secs()),
        "Decoded audio"
    );
    Ok(pcm)
}

fn mix_to_mono(buffer: &AudioBuffer<f32>, out: &mut Vec<f32>) {
    let channels = buffer.spec().channels.count();
    let frames = buffer.frames();
    if channels == 0 {
        return;
    }
    if channels == 1 {
        out.extend_from_slice(buffer.chan(0));
        return;
    }

    out.reserve(frames);
    for frame in 0..frames {
        let sum: f32 = (0..channels).map(|ch| buffer.chan(ch)[frame]).sum();
        out.push(sum / channels as f32);
    }
}

/// Resample mono samples with a sinc interpolator
pub fn resample(
    samples: Vec<f32>,
    source_rate: u32,
    target_rate: u32,
) -> Result<Vec<f32>, TranscribeError> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples);
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let frames = samples.len();
    let ratio = target_rate as f64 / source_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, frames, 1)
        .map_err(|e| decode_error(format!("failed to create resampler: {}", e)))?;

    let mut output = resampler
        .process(&[samples], None)
        .map_err(|e| decode_error(format!("resampling failed: {}", e)))?;

    let resampled = output.pop().unwrap_or_default();
    debug!(
        "Resampled {} frames ({} Hz) to {} frames ({} Hz)",
        frames,
        source_rate,
        resampled.len(),
        target_rate
    );
    Ok(resampled)
}

fn decode_error(message: String) -> TranscribeError {
    TranscribeError::Decode(message)
}
