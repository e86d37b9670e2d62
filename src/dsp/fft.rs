//! In-place radix-2 Cooley-Tukey FFT.
//!
//! A `TransformPlan` is built once per transform size and reused for every
//! frame of a run; construction precomputes the bit-reversal permutation so
//! `apply` does no heap allocation. The butterfly stages derive their twiddle
//! factors from a single trig evaluation per stage, advanced across the stage
//! by complex multiplication (angle addition), so the hot loop is free of
//! `sin`/`cos` calls.
//!
//! Conventions
//! - The forward transform is unnormalized; the inverse divides by N, so a
//!   forward/inverse pair reproduces the input.
//! - Input is a split complex buffer pair (`real`, `imag`), both of exact
//!   length N, mutated in place. The caller owns both for the duration of
//!   one call.

use std::f32::consts::PI;

use crate::error::{Error, Result};

/// Transform direction. The inverse additionally scales every sample by 1/N.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

impl Direction {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        }
    }
}

/// Immutable precomputed state for one fixed transform size.
pub struct TransformPlan {
    size: usize,
    reverse: Vec<u32>,
}

impl TransformPlan {
    /// Build a plan for `size`, which must be a power of two >= 2.
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 || !size.is_power_of_two() {
            return Err(Error::Configuration(format!(
                "transform size must be a power of two >= 2, got {size}"
            )));
        }

        // Bit-reversal table via the mirror recurrence: each doubling of the
        // filled block copies the existing entries with the next bit set.
        let mut reverse = vec![0u32; size];
        let mut limit = 1usize;
        let mut bit = size >> 1;
        while limit < size {
            for i in 0..limit {
                reverse[i + limit] = reverse[i] + bit as u32;
            }
            limit <<= 1;
            bit >>= 1;
        }

        Ok(Self { size, reverse })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform one complex buffer pair in place.
    ///
    /// Both slices must have exactly the plan's length. Deterministic up to
    /// floating-point rounding; allocates nothing.
    pub fn apply(&self, real: &mut [f32], imag: &mut [f32], direction: Direction) -> Result<()> {
        let n = self.size;
        if real.len() != n || imag.len() != n {
            return Err(Error::Configuration(format!(
                "transform buffers must have length {n}, got {} / {}",
                real.len(),
                imag.len()
            )));
        }

        // Bit-reversal permutation. Only the bottom half initiates swaps, so
        // each pair is exchanged exactly once.
        for i in 0..n {
            let j = self.reverse[i] as usize;
            if i < j {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }

        // Decimation-in-time butterflies.
        let dir = direction.sign();
        let mut half = 1usize;
        while half < n {
            let step_re = (dir * PI / half as f32).cos();
            let step_im = (dir * PI / half as f32).sin();

            let mut cur_re = 1.0f32;
            let mut cur_im = 0.0f32;

            for step in 0..half {
                let mut i = step;
                while i < n {
                    let off = i + half;
                    let tr = cur_re * real[off] - cur_im * imag[off];
                    let ti = cur_re * imag[off] + cur_im * real[off];

                    real[off] = real[i] - tr;
                    imag[off] = imag[i] - ti;
                    real[i] += tr;
                    imag[i] += ti;

                    i += half * 2;
                }

                // Advance the stage twiddle by one angle step.
                let tmp = cur_re;
                cur_re = tmp * step_re - cur_im * step_im;
                cur_im = tmp * step_im + cur_im * step_re;
            }

            half <<= 1;
        }

        if direction == Direction::Inverse {
            let inv = 1.0 / n as f32;
            for i in 0..n {
                real[i] *= inv;
                imag[i] *= inv;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn test_signal(n: usize) -> Vec<f32> {
        // Deterministic mixture with no special symmetry.
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                (TAU * 3.0 * t).sin() + 0.5 * (TAU * 17.0 * t + 0.3).cos() + 0.1 * (i as f32).sin()
            })
            .collect()
    }

    #[test]
    fn rejects_invalid_sizes() {
        assert!(TransformPlan::new(0).is_err());
        assert!(TransformPlan::new(1).is_err());
        assert!(TransformPlan::new(3).is_err());
        assert!(TransformPlan::new(1000).is_err());
        assert!(TransformPlan::new(2).is_ok());
        assert!(TransformPlan::new(2048).is_ok());
    }

    #[test]
    fn rejects_mismatched_buffer_lengths() {
        let plan = TransformPlan::new(8).expect("plan");
        let mut re = vec![0.0; 4];
        let mut im = vec![0.0; 8];
        assert!(plan.apply(&mut re, &mut im, Direction::Forward).is_err());
        let mut re = vec![0.0; 8];
        let mut im = vec![0.0; 16];
        assert!(plan.apply(&mut re, &mut im, Direction::Forward).is_err());
    }

    #[test]
    fn round_trip_reproduces_input() {
        let mut n = 2;
        while n <= 2048 {
            let plan = TransformPlan::new(n).expect("plan");
            let original = test_signal(n);
            let mut re = original.clone();
            let mut im = vec![0.0f32; n];

            plan.apply(&mut re, &mut im, Direction::Forward).expect("forward");
            plan.apply(&mut re, &mut im, Direction::Inverse).expect("inverse");

            let scale = original.iter().fold(0.0f32, |m, &v| m.max(v.abs()));
            for i in 0..n {
                assert!(
                    (re[i] - original[i]).abs() <= 1e-4 * scale,
                    "size {n}, sample {i}: {} vs {}",
                    re[i],
                    original[i]
                );
                assert!(im[i].abs() <= 1e-4 * scale, "size {n}, imag {i}: {}", im[i]);
            }
            n *= 2;
        }
    }

    #[test]
    fn pure_tone_peaks_at_its_bin() {
        let n = 256;
        let k = 19;
        let plan = TransformPlan::new(n).expect("plan");
        let mut re: Vec<f32> = (0..n).map(|i| (TAU * k as f32 * i as f32 / n as f32).sin()).collect();
        let mut im = vec![0.0f32; n];
        plan.apply(&mut re, &mut im, Direction::Forward).expect("forward");

        let mag: Vec<f32> = (0..n).map(|i| (re[i] * re[i] + im[i] * im[i]).sqrt()).collect();
        // Energy lands in bin k and its mirror n - k, each ~n/2.
        assert!(mag[k] > 0.9 * n as f32 / 2.0);
        assert!(mag[n - k] > 0.9 * n as f32 / 2.0);
        for (i, &m) in mag.iter().enumerate() {
            if i != k && i != n - k {
                assert!(m < 1e-2 * mag[k], "bin {i} leaked: {m}");
            }
        }
    }

    #[test]
    fn magnitudes_match_rustfft() {
        use rustfft::num_complex::Complex;
        use rustfft::FftPlanner;

        let n = 512;
        let signal = test_signal(n);

        let plan = TransformPlan::new(n).expect("plan");
        let mut re = signal.clone();
        let mut im = vec![0.0f32; n];
        plan.apply(&mut re, &mut im, Direction::Forward).expect("forward");

        let mut oracle: Vec<Complex<f32>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        FftPlanner::new().plan_fft_forward(n).process(&mut oracle);

        // Real input: per-bin magnitudes agree regardless of the sign
        // convention of the exponent.
        for i in 0..n {
            let ours = (re[i] * re[i] + im[i] * im[i]).sqrt();
            let theirs = oracle[i].norm();
            assert!(
                (ours - theirs).abs() <= 1e-3 * (1.0 + theirs),
                "bin {i}: {ours} vs {theirs}"
            );
        }
    }
}
