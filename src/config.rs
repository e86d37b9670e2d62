//! Session configuration.
//!
//! One explicit struct passed by reference through the pipeline; nothing in
//! the crate reads configuration from globals. On the CLI boundary it is
//! plain JSON, with every field optional thanks to `serde(default)`.

use serde::{Deserialize, Serialize};

use crate::dsp::DEFAULT_AMOUNT;
use crate::error::{Error, Result};
use crate::sequence::ClickKind;

/// Prompted click count per click kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickCounts {
    pub hard: u32,
    pub normal: u32,
    pub soft: u32,
    pub micro: u32,
}

impl ClickCounts {
    pub fn get(&self, kind: ClickKind) -> u32 {
        match kind {
            ClickKind::Hard => self.hard,
            ClickKind::Normal => self.normal,
            ClickKind::Soft => self.soft,
            ClickKind::Micro => self.micro,
        }
    }

    pub fn total(&self) -> u32 {
        self.hard + self.normal + self.soft + self.micro
    }
}

/// Everything one recording session needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Pack name; becomes the root folder of the exported tree.
    pub pack_name: String,
    /// Number of players recorded back to back.
    pub players: u32,
    /// Metronome tempo driving the prompt sequence.
    pub bpm: u32,
    /// Milliseconds of audio kept before each detected peak.
    pub pre_peak_ms: u32,
    /// Capture a silent span for the noise profile.
    pub record_noise: bool,
    /// Peak-normalize every clip to 0 dBFS.
    pub normalize: bool,
    /// Run the spectral denoiser over every clip.
    pub denoise: bool,
    /// Wiener filter strength; 1.0 is the standard filter.
    pub denoise_strength: f32,
    pub counts: ClickCounts,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pack_name: "Clickpack".into(),
            players: 1,
            bpm: 120,
            pre_peak_ms: 10,
            record_noise: true,
            normalize: true,
            denoise: true,
            denoise_strength: DEFAULT_AMOUNT,
            counts: ClickCounts::default(),
        }
    }
}

impl SessionConfig {
    /// Seconds per metronome beat.
    #[inline]
    pub fn beat_duration(&self) -> f64 {
        60.0 / self.bpm as f64
    }

    pub fn validate(&self) -> Result<()> {
        if self.players == 0 {
            return Err(Error::Configuration("players must be at least 1".into()));
        }
        if self.bpm == 0 {
            return Err(Error::Configuration("bpm must be positive".into()));
        }
        if !self.denoise_strength.is_finite() || self.denoise_strength <= 0.0 {
            return Err(Error::Configuration(format!(
                "denoise_strength must be finite and positive, got {}",
                self.denoise_strength
            )));
        }
        if self.counts.total() == 0 {
            return Err(Error::Configuration(
                "at least one click kind needs a non-zero count".into(),
            ));
        }
        Ok(())
    }
}
