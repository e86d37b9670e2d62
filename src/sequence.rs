//! Recording prompt sequence and virtual-clock scheduling.
//!
//! A session is prompted as an ordered list of metronome-aligned steps: an
//! optional silent noise capture, then for each player and click kind a short
//! preparation followed by alternating click/release prompts. Scheduling maps
//! that list onto sample offsets with an explicit virtual clock, so the whole
//! timeline is a pure function of config, tempo and sample rate; no wall
//! clock is involved anywhere.

use serde::{Deserialize, Serialize};

use crate::config::SessionConfig;

/// Beats of lead-in before each prompted block.
const PREP_BEATS: u32 = 2;
/// Seconds of room tone captured for the noise profile.
const NOISE_CAPTURE_SECS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickKind {
    Hard,
    Normal,
    Soft,
    Micro,
}

impl ClickKind {
    pub const ALL: [ClickKind; 4] =
        [ClickKind::Hard, ClickKind::Normal, ClickKind::Soft, ClickKind::Micro];

    pub fn name(&self) -> &'static str {
        match self {
            ClickKind::Hard => "Hard Click",
            ClickKind::Normal => "Normal Click",
            ClickKind::Soft => "Soft Click",
            ClickKind::Micro => "Micro Click",
        }
    }

    /// Folder for press samples in the exported tree.
    pub fn click_folder(&self) -> &'static str {
        match self {
            ClickKind::Hard => "hardclicks",
            ClickKind::Normal => "clicks",
            ClickKind::Soft => "softclicks",
            ClickKind::Micro => "microclicks",
        }
    }

    /// Folder for release samples in the exported tree.
    pub fn release_folder(&self) -> &'static str {
        match self {
            ClickKind::Hard => "hardreleases",
            ClickKind::Normal => "releases",
            ClickKind::Soft => "softrelease",
            ClickKind::Micro => "microreleases",
        }
    }
}

/// One prompted step. Every variant shares the metronome duration; payloads
/// are variant-specific.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub beats: u32,
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// "Get ready" lead-in shown before a block.
    Preparation { label: String },
    /// Silent span recorded as the noise profile.
    NoiseCapture,
    /// Mouse press prompt.
    Click { kind: ClickKind, player: u32, index: u32 },
    /// Mouse release prompt.
    Release { kind: ClickKind, player: u32, index: u32 },
}

/// Build the prompt sequence for a session.
pub fn build(config: &SessionConfig) -> Vec<Step> {
    let mut steps = Vec::new();

    if config.record_noise {
        steps.push(Step {
            beats: PREP_BEATS,
            action: StepAction::Preparation { label: "Noise".into() },
        });
        let noise_beats = (NOISE_CAPTURE_SECS / config.beat_duration()).ceil() as u32;
        steps.push(Step {
            beats: noise_beats.max(1),
            action: StepAction::NoiseCapture,
        });
    }

    for player in 1..=config.players {
        for kind in ClickKind::ALL {
            let count = config.counts.get(kind);
            if count == 0 {
                continue;
            }
            steps.push(Step {
                beats: PREP_BEATS,
                action: StepAction::Preparation { label: format!("{}s", kind.name()) },
            });
            for index in 1..=count {
                steps.push(Step {
                    beats: 1,
                    action: StepAction::Click { kind, player, index },
                });
                steps.push(Step {
                    beats: 1,
                    action: StepAction::Release { kind, player, index },
                });
            }
        }
    }

    steps
}

/// A step pinned to sample offsets by the virtual clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledStep {
    pub start_sample: usize,
    pub len_samples: usize,
    pub step: Step,
}

/// Lay a sequence out on a virtual clock.
///
/// The clock accumulates in beat time and is quantized to samples once per
/// step boundary, so rounding never drifts over a long session and adjacent
/// steps tile the timeline exactly.
///
/// Panics when `bpm` is zero; [`SessionConfig::validate`](crate::config::SessionConfig::validate)
/// rejects that before any session pipeline reaches this point.
pub fn schedule(steps: &[Step], bpm: u32, sample_rate: u32) -> Vec<ScheduledStep> {
    assert!(bpm > 0, "bpm must be positive");
    let beat = 60.0 / bpm as f64;
    let rate = sample_rate as f64;

    let mut clock = 0.0f64;
    let mut out = Vec::with_capacity(steps.len());
    for step in steps {
        let duration = step.beats as f64 * beat;
        let start_sample = (clock * rate).floor() as usize;
        let end_sample = ((clock + duration) * rate).floor() as usize;
        out.push(ScheduledStep {
            start_sample,
            len_samples: end_sample - start_sample,
            step: step.clone(),
        });
        clock += duration;
    }
    out
}
