//! In-memory WAV fixtures for ingest and HTTP tests.

use std::io::Cursor;

/// Render a mono 16-bit sine tone as WAV bytes
pub fn sine_wav_bytes(sample_rate: u32, seconds: f32, frequency_hz: f32, amplitude: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).expect("create in-memory wav writer");
        let total_samples = (sample_rate as f32 * seconds) as u32;
        for n in 0..total_samples {
            let t = n as f32 / sample_rate as f32;
            let value = (t * frequency_hz * 2.0 * std::f32::consts::PI).sin() * amplitude;
            let sample = (value * i16::MAX as f32) as i16;
            writer.write_sample(sample).expect("write wav sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}

/// Render a mono 16-bit all-zero clip as WAV bytes
pub fn silent_wav_bytes(sample_rate: u32, seconds: f32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).expect("create in-memory wav writer");
        let total_samples = (sample_rate as f32 * seconds) as u32;
        for _ in 0..total_samples {
            writer.write_sample(0i16).expect("write wav sample");
        }
        writer.finalize().expect("finalize wav");
    }
    cursor.into_inner()
}
