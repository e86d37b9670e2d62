//! WAV encode/decode.
//!
//! Clips are exported as 16-bit PCM mono little-endian (the standard
//! RIFF/WAVE layout `hound` writes). Reading accepts any format `hound`
//! understands and mixes multichannel input down to one f32 channel.

use std::path::Path;

use anyhow::{Context, Result};

/// Write `samples` as a 16-bit PCM mono WAV file.
///
/// Samples are clamped to [-1, 1] and scaled asymmetrically (0x8000 negative,
/// 0x7fff positive) so full-scale input maps onto the full i16 range.
pub fn write_mono_16bit(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;

    for &sample in samples {
        let s = sample.clamp(-1.0, 1.0);
        let v = if s < 0.0 { (s * 0x8000 as f32) as i16 } else { (s * 0x7fff as f32) as i16 };
        writer.write_sample(v)?;
    }

    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;
    Ok(())
}

/// Read a WAV file and mix it down to mono f32. Returns the samples and the
/// file's sample rate.
pub fn read_mono(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader =
        hound::WavReader::open(path).with_context(|| format!("opening {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let mut mono = Vec::with_capacity(reader.len() as usize / channels);
    let mut frame = Vec::with_capacity(channels);

    match spec.sample_format {
        hound::SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                frame.push(sample?);
                if frame.len() == channels {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                    frame.clear();
                }
            }
        }
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            for sample in reader.samples::<i32>() {
                frame.push(sample? as f32 * scale);
                if frame.len() == channels {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                    frame.clear();
                }
            }
        }
    }

    Ok((mono, spec.sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_samples_within_16bit_precision() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("clip.wav");

        let samples: Vec<f32> =
            (0..1000).map(|i| (i as f32 / 1000.0 * 6.28).sin() * 0.8).collect();
        write_mono_16bit(&path, &samples, 44_100).expect("write");

        let (read, rate) = read_mono(&path).expect("read");
        assert_eq!(rate, 44_100);
        assert_eq!(read.len(), samples.len());
        for (a, b) in samples.iter().zip(&read) {
            assert!((a - b).abs() < 2.0 / 32_768.0, "{a} vs {b}");
        }
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hot.wav");

        write_mono_16bit(&path, &[2.0, -2.0, 1.0, -1.0], 48_000).expect("write");
        let (read, _) = read_mono(&path).expect("read");

        assert!((read[0] - read[2]).abs() < 1e-4);
        assert!((read[1] - read[3]).abs() < 1e-4);
        assert!(read.iter().all(|s| (-1.0..=1.0).contains(s)));
    }

    #[test]
    fn stereo_input_is_mixed_down() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create");
        for _ in 0..100 {
            writer.write_sample(16_384i16).expect("left");
            writer.write_sample(-16_384i16).expect("right");
        }
        writer.finalize().expect("finalize");

        let (read, _) = read_mono(&path).expect("read");
        assert_eq!(read.len(), 100);
        // Opposite channels cancel in the mixdown.
        assert!(read.iter().all(|s| s.abs() < 1e-4));
    }
}
