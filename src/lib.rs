//! Clickpack recording toolkit.
//!
//! Turns one continuous, metronome-prompted microphone take into a folder of
//! short, cleaned click samples. The numerical core is a fixed-size radix-2
//! FFT plus a spectral-subtraction (decision-directed Wiener) denoiser fed by
//! a separately captured noise profile; around it sit the prompt sequencer,
//! the virtual-clock scheduler, clip extraction, and WAV export.
//!
//! The DSP core ([`dsp`]) is synchronous and single-threaded over complete
//! in-memory buffers. Independent sessions or clips share no mutable state
//! and may be processed in parallel, each with its own [`Denoiser`].

pub mod config;
pub mod dsp;
pub mod error;
pub mod sequence;
pub mod session;
pub mod wav;

pub use config::{ClickCounts, SessionConfig};
pub use dsp::{hanning, Denoiser, Direction, NoiseProfile, TransformPlan, FRAME_SIZE, HOP_SIZE};
pub use error::{Error, Result};
pub use sequence::{ClickKind, ScheduledStep, Step, StepAction};
pub use session::Clip;
