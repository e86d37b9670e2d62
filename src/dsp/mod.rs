//! Fixed-size, in-memory DSP core: radix-2 FFT, Hanning window, averaged
//! noise profile, and the decision-directed Wiener denoiser.
//!
//! Everything here is synchronous and operates on complete buffers; there is
//! no streaming and no shared mutable state between independent runs.

pub mod denoiser;
pub mod fft;
pub mod noise_profile;
pub mod window;

pub use denoiser::{Denoiser, DEFAULT_AMOUNT};
pub use fft::{Direction, TransformPlan};
pub use noise_profile::NoiseProfile;
pub use window::hanning;

/// Analysis frame size shared by the noise profiler and the denoiser.
pub const FRAME_SIZE: usize = 2048;

/// Sample advance between consecutive frames (75% overlap).
pub const HOP_SIZE: usize = FRAME_SIZE / 4;
