//! Averaged noise power spectrum.
//!
//! Estimated once per session from a noise-only capture (room tone recorded
//! while the user stays silent), then consumed read-only by every denoise
//! frame. Stationary hiss is assumed; transients in the capture simply bias
//! the average upward.

use crate::dsp::fft::{Direction, TransformPlan};
use crate::dsp::window::hanning;
use crate::dsp::{FRAME_SIZE, HOP_SIZE};
use crate::error::{Error, Result};

/// Per-bin average power (`re^2 + im^2`) of the noise capture. Length is
/// always [`FRAME_SIZE`]; every value is non-negative.
#[derive(Debug)]
pub struct NoiseProfile {
    power: Vec<f32>,
}

impl NoiseProfile {
    /// Average the power spectrum of `noise` over overlapping
    /// Hanning-windowed frames ([`FRAME_SIZE`] samples, [`HOP_SIZE`] hop).
    ///
    /// A capture shorter than one frame yields zero frames and fails with
    /// [`Error::InsufficientData`] rather than dividing by zero.
    pub fn estimate(noise: &[f32]) -> Result<Self> {
        let plan = TransformPlan::new(FRAME_SIZE)?;
        let window = hanning(FRAME_SIZE)?;

        let mut power = vec![0.0f32; FRAME_SIZE];
        let mut re = vec![0.0f32; FRAME_SIZE];
        let mut im = vec![0.0f32; FRAME_SIZE];
        let mut frames = 0usize;

        let mut start = 0usize;
        while start + FRAME_SIZE <= noise.len() {
            for j in 0..FRAME_SIZE {
                re[j] = noise[start + j] * window[j];
                im[j] = 0.0;
            }
            plan.apply(&mut re, &mut im, Direction::Forward)?;

            for j in 0..FRAME_SIZE {
                power[j] += re[j] * re[j] + im[j] * im[j];
            }

            frames += 1;
            start += HOP_SIZE;
        }

        if frames == 0 {
            return Err(Error::InsufficientData(format!(
                "noise capture of {} samples is shorter than one {FRAME_SIZE}-sample frame",
                noise.len()
            )));
        }

        let inv = 1.0 / frames as f32;
        for p in &mut power {
            *p *= inv;
        }

        log::debug!("noise profile averaged over {frames} frames");
        Ok(Self { power })
    }

    /// Averaged per-bin power spectrum, length [`FRAME_SIZE`].
    #[inline]
    pub fn power(&self) -> &[f32] {
        &self.power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_capture_yields_zero_spectrum() {
        // Exactly one frame long is enough.
        let profile = NoiseProfile::estimate(&vec![0.0; FRAME_SIZE]).expect("profile");
        assert_eq!(profile.power().len(), FRAME_SIZE);
        assert!(profile.power().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn short_capture_is_rejected() {
        let err = NoiseProfile::estimate(&vec![0.0; FRAME_SIZE - 1]).unwrap_err();
        assert!(matches!(err, Error::InsufficientData(_)));
        assert!(matches!(
            NoiseProfile::estimate(&[]).unwrap_err(),
            Error::InsufficientData(_)
        ));
    }

    #[test]
    fn power_is_non_negative_and_scales_with_level() {
        let quiet: Vec<f32> = (0..FRAME_SIZE * 3).map(|i| 0.01 * (i as f32 * 0.7).sin()).collect();
        let loud: Vec<f32> = quiet.iter().map(|&s| s * 10.0).collect();

        let p_quiet = NoiseProfile::estimate(&quiet).expect("quiet");
        let p_loud = NoiseProfile::estimate(&loud).expect("loud");

        assert!(p_quiet.power().iter().all(|&p| p >= 0.0));
        let sum_quiet: f32 = p_quiet.power().iter().sum();
        let sum_loud: f32 = p_loud.power().iter().sum();
        // 10x amplitude => 100x power.
        assert!(sum_loud > 50.0 * sum_quiet);
    }
}
