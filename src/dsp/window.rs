//! Hanning analysis/synthesis window.

use std::f32::consts::TAU;

use crate::error::{Error, Result};

/// Hanning window of `size` weights: `w[i] = 0.5 * (1 - cos(2*pi*i / (size-1)))`.
///
/// The same window is applied at analysis and resynthesis (weighted
/// overlap-add). Sizes below 2 would divide by zero in the `size - 1`
/// denominator and are rejected.
pub fn hanning(size: usize) -> Result<Vec<f32>> {
    if size < 2 {
        return Err(Error::Configuration(format!(
            "window size must be at least 2, got {size}"
        )));
    }
    let denom = (size - 1) as f32;
    Ok((0..size)
        .map(|i| 0.5 * (1.0 - (TAU * i as f32 / denom).cos()))
        .collect())
}
