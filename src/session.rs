//! Session processing: slice a finished recording into cleaned clips.
//!
//! The recording is one long mono take of the whole prompted sequence. For
//! each click/release prompt we search a short window around the prompt time
//! for the loudest sample, cut a clip around that peak, optionally denoise it
//! against the captured room tone, optionally peak-normalize, and fade the
//! edges. Prompts whose window never rises above the miss threshold are
//! skipped with a warning; a skipped prompt is a user miss, not an error.

use crate::config::SessionConfig;
use crate::dsp::{Denoiser, NoiseProfile, FRAME_SIZE};
use crate::error::Result;
use crate::sequence::{self, StepAction};

// Peak search window around a prompt (seconds).
const PEAK_SEARCH_BEFORE_SECS: f64 = 0.15;
const PEAK_SEARCH_AFTER_SECS: f64 = 0.4;
// Windows whose loudest sample stays below this are treated as missed clicks.
const MISSED_CLICK_THRESHOLD: f32 = 0.01;
// Audio kept after the detected peak (seconds).
const POST_PEAK_SECS: f64 = 0.3;
// Linear fade-out over the clip tail (seconds).
const FADE_OUT_SECS: f64 = 0.01;
// Linear fade-in length (samples).
const FADE_IN_SAMPLES: usize = 100;

/// One exported file: path relative to the pack root, plus its samples.
#[derive(Debug, Clone)]
pub struct Clip {
    pub relative_path: String,
    pub samples: Vec<f32>,
}

/// Process a finished session recording into its clips.
///
/// Returns the noise capture (if any) as `noise.wav` followed by one clip per
/// detected click/release, in prompt order.
pub fn process(recording: &[f32], sample_rate: u32, config: &SessionConfig) -> Result<Vec<Clip>> {
    config.validate()?;

    let steps = sequence::build(config);
    let scheduled = sequence::schedule(&steps, config.bpm, sample_rate);

    let noise: Option<&[f32]> = scheduled.iter().find_map(|s| {
        if let StepAction::NoiseCapture = s.step.action {
            let start = s.start_sample.min(recording.len());
            let end = (s.start_sample + s.len_samples).min(recording.len());
            Some(&recording[start..end])
        } else {
            None
        }
    });

    let profile = if config.denoise {
        match noise {
            Some(buf) if buf.len() > FRAME_SIZE => match NoiseProfile::estimate(buf) {
                Ok(profile) => Some(profile),
                Err(err) => {
                    log::warn!("noise profile unavailable, denoise bypassed: {err}");
                    None
                }
            },
            _ => {
                log::warn!("no usable noise capture, denoise bypassed");
                None
            }
        }
    } else {
        None
    };
    let mut denoiser = if profile.is_some() { Some(Denoiser::new()?) } else { None };

    let mut clips = Vec::new();
    if let Some(buf) = noise {
        if !buf.is_empty() {
            clips.push(Clip { relative_path: "noise.wav".into(), samples: buf.to_vec() });
        }
    }

    let mut missed = 0usize;
    for sched in &scheduled {
        let (kind, player, index, release) = match sched.step.action {
            StepAction::Click { kind, player, index } => (kind, player, index, false),
            StepAction::Release { kind, player, index } => (kind, player, index, true),
            _ => continue,
        };

        let Some(peak) = find_peak(recording, sample_rate, sched.start_sample) else {
            missed += 1;
            log::warn!(
                "missed {} {index} for player {player} (no peak above threshold)",
                if release { kind.release_folder() } else { kind.click_folder() }
            );
            continue;
        };

        let pre = (config.pre_peak_ms as f64 / 1000.0 * sample_rate as f64) as usize;
        let post = (POST_PEAK_SECS * sample_rate as f64) as usize;
        let start = peak.saturating_sub(pre);
        let end = (peak + post).min(recording.len());
        let mut slice = recording[start..end].to_vec();

        if let (Some(denoiser), Some(profile)) = (denoiser.as_mut(), profile.as_ref()) {
            slice = denoiser.process(&slice, profile, config.denoise_strength)?;
        }

        if config.normalize {
            normalize(&mut slice);
        }
        apply_fades(&mut slice, sample_rate);

        let mut path = String::new();
        if config.players > 1 {
            path.push_str(&format!("player{player}/"));
        }
        let folder = if release { kind.release_folder() } else { kind.click_folder() };
        path.push_str(&format!("{folder}/{index}.wav"));

        clips.push(Clip { relative_path: path, samples: slice });
    }

    log::info!("extracted {} clips ({missed} prompts missed)", clips.len());
    Ok(clips)
}

/// Loudest sample in the search window around a prompt, or `None` when the
/// window never clears the miss threshold.
fn find_peak(recording: &[f32], sample_rate: u32, prompt_sample: usize) -> Option<usize> {
    let before = (PEAK_SEARCH_BEFORE_SECS * sample_rate as f64) as usize;
    let after = (PEAK_SEARCH_AFTER_SECS * sample_rate as f64) as usize;
    let start = prompt_sample.saturating_sub(before);
    let end = (prompt_sample + after).min(recording.len());

    let mut max_val = 0.0f32;
    let mut max_idx = start;
    for (i, &sample) in recording.iter().enumerate().take(end).skip(start) {
        let v = sample.abs();
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    (max_val > MISSED_CLICK_THRESHOLD).then_some(max_idx)
}

/// Peak-normalize to 0 dBFS. Silence is left alone.
fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0f32, |m, &s| m.max(s.abs()));
    if peak > 0.0 {
        let gain = 1.0 / peak;
        for s in samples.iter_mut() {
            *s *= gain;
        }
    }
}

fn apply_fades(samples: &mut [f32], sample_rate: u32) {
    let len = samples.len();

    let fade_out = ((FADE_OUT_SECS * sample_rate as f64) as usize).min(len);
    for i in 0..fade_out {
        samples[len - 1 - i] *= i as f32 / fade_out as f32;
    }

    let fade_in = FADE_IN_SAMPLES.min(len);
    for (i, s) in samples.iter_mut().take(fade_in).enumerate() {
        *s *= i as f32 / FADE_IN_SAMPLES as f32;
    }
}
