// WAV decoding and upload validation.
//
// Uploads are validated against the configured bounds (extension allowlist,
// size cap, sample-rate range, silence floor) and decoded to a mono AudioClip.
// The accepted-extension set mirrors the original upload form; only WAV is
// actually decodable in this demo, the rest are rejected at decode time.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::config::IngestConfig;
use crate::error::IngestError;

/// Upload extensions accepted at the HTTP boundary
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg"];

/// Peak amplitude below which a clip is treated as silent
pub const SILENCE_PEAK_FLOOR: f32 = 1e-6;

/// Reference sound pressure for the Leq approximation (20 uPa)
const LEQ_REFERENCE_PRESSURE: f64 = 20e-6;

/// Calibration offset approximating dB SPL for full-scale digital audio
const LEQ_CALIBRATION_OFFSET_DB: f64 = 94.0;

/// Decoded mono audio ready for the model collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f32 {
        self.samples
            .iter()
            .fold(0.0f32, |peak, sample| peak.max(sample.abs()))
    }

    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_squares: f64 = self
            .samples
            .iter()
            .map(|&sample| (sample as f64) * (sample as f64))
            .sum();
        (sum_squares / self.samples.len() as f64).sqrt()
    }

    /// Approximate equivalent sound level in dB
    ///
    /// 20 * log10(rms / 20uPa) plus a fixed calibration offset, clamped to
    /// the realistic [0, 140] range. A rough demo measure, not a calibrated
    /// SPL reading.
    pub fn approximate_leq_db(&self) -> f64 {
        let rms = self.rms();
        if rms <= 0.0 {
            return 0.0;
        }
        let leq = 20.0 * (rms / LEQ_REFERENCE_PRESSURE).log10() + LEQ_CALIBRATION_OFFSET_DB;
        leq.clamp(0.0, 140.0)
    }
}

/// Check a filename's extension against the accepted set
pub fn validate_extension(filename: &str) -> Result<(), IngestError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    if extension.is_empty() {
        return Err(IngestError::UnsupportedFormat {
            extension: "(none)".to_string(),
        });
    }
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(IngestError::UnsupportedFormat { extension });
    }
    Ok(())
}

/// Decode and validate a WAV payload
///
/// # Arguments
/// * `bytes` - raw upload payload
/// * `config` - size and sample-rate bounds
///
/// # Returns
/// A validated mono `AudioClip`, or the `IngestError` describing why the
/// payload was rejected.
pub fn decode_wav(bytes: &[u8], config: &IngestConfig) -> Result<AudioClip, IngestError> {
    if bytes.is_empty() {
        return Err(IngestError::MissingAudio);
    }
    if bytes.len() > config.max_upload_bytes {
        return Err(IngestError::FileTooLarge {
            bytes: bytes.len(),
            limit: config.max_upload_bytes,
        });
    }

    let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    if spec.sample_rate < config.min_sample_rate_hz || spec.sample_rate > config.max_sample_rate_hz
    {
        return Err(IngestError::SampleRateOutOfRange {
            rate: spec.sample_rate,
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<Vec<f32>, hound::Error>>()?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 / scale))
                .collect::<Result<Vec<f32>, hound::Error>>()?
        }
    };

    let samples = downmix(&interleaved, spec.channels as usize);
    if samples.is_empty() {
        return Err(IngestError::EmptyAudio);
    }

    let clip = AudioClip {
        samples,
        sample_rate: spec.sample_rate,
    };
    if clip.peak() < SILENCE_PEAK_FLOOR {
        return Err(IngestError::SilentAudio);
    }

    Ok(clip)
}

/// Average interleaved channels down to mono
fn downmix(interleaved: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::wav::{sine_wav_bytes, silent_wav_bytes};

    fn config() -> IngestConfig {
        IngestConfig::default()
    }

    #[test]
    fn test_extension_allowlist() {
        assert!(validate_extension("street.wav").is_ok());
        assert!(validate_extension("street.WAV").is_ok());
        assert!(validate_extension("street.mp3").is_ok());
        assert!(matches!(
            validate_extension("street.exe"),
            Err(IngestError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            validate_extension("street"),
            Err(IngestError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_decode_valid_sine() {
        let bytes = sine_wav_bytes(44_100, 0.5, 440.0, 0.5);
        let clip = decode_wav(&bytes, &config()).expect("decode sine wav");
        assert_eq!(clip.sample_rate, 44_100);
        assert!((clip.duration_seconds() - 0.5).abs() < 0.01);
        assert!(clip.peak() > 0.4);
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert_eq!(decode_wav(&[], &config()), Err(IngestError::MissingAudio));
    }

    #[test]
    fn test_garbage_payload_rejected() {
        let result = decode_wav(b"definitely not a wav", &config());
        assert!(matches!(result, Err(IngestError::MalformedAudio { .. })));
    }

    #[test]
    fn test_oversize_payload_rejected() {
        let small_limit = IngestConfig {
            max_upload_bytes: 64,
            ..IngestConfig::default()
        };
        let bytes = sine_wav_bytes(44_100, 0.1, 440.0, 0.5);
        assert!(matches!(
            decode_wav(&bytes, &small_limit),
            Err(IngestError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_low_sample_rate_rejected() {
        let bytes = sine_wav_bytes(4_000, 0.1, 200.0, 0.5);
        assert_eq!(
            decode_wav(&bytes, &config()),
            Err(IngestError::SampleRateOutOfRange { rate: 4_000 })
        );
    }

    #[test]
    fn test_silent_audio_rejected() {
        let bytes = silent_wav_bytes(44_100, 0.2);
        assert_eq!(decode_wav(&bytes, &config()), Err(IngestError::SilentAudio));
    }

    #[test]
    fn test_leq_increases_with_amplitude() {
        let quiet = decode_wav(&sine_wav_bytes(44_100, 0.2, 440.0, 0.05), &config()).unwrap();
        let loud = decode_wav(&sine_wav_bytes(44_100, 0.2, 440.0, 0.8), &config()).unwrap();
        assert!(loud.approximate_leq_db() > quiet.approximate_leq_db());
        assert!(loud.approximate_leq_db() <= 140.0);
    }
}
