//! Library error type.
//!
//! The DSP core itself is pure and deterministic; every error here is a
//! boundary validation failure raised before numeric work starts. Near-zero
//! denominators inside the hot path are handled with small epsilons instead
//! of errors, so a denoise run either fails up front or runs to completion.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid size or parameter: non-power-of-two transform size, mismatched
    /// buffer length, window shorter than two samples, bad session settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Not enough input to produce a meaningful result, e.g. a noise capture
    /// shorter than one analysis frame.
    #[error("insufficient data: {0}")]
    InsufficientData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
