//! clickforge CLI: turn a prompted session recording into a clickpack tree.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use clickforge::{session, wav, SessionConfig};

#[derive(Parser, Debug)]
#[command(
    name = "clickforge",
    version,
    about = "Slice a metronome-prompted recording into a denoised clickpack"
)]
struct Args {
    /// Recorded session (WAV; multichannel input is mixed down to mono)
    recording: PathBuf,

    /// Session configuration (JSON; omitted fields fall back to defaults)
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory; the pack folder is created inside it
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let text = fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config.display()))?;
    let config: SessionConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", args.config.display()))?;

    let (samples, sample_rate) = wav::read_mono(&args.recording)?;
    log::info!(
        "loaded {} samples at {sample_rate} Hz from {}",
        samples.len(),
        args.recording.display()
    );

    let clips = session::process(&samples, sample_rate, &config)?;

    let root = args.out.join(&config.pack_name);
    for clip in &clips {
        let path = root.join(&clip.relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        wav::write_mono_16bit(&path, &clip.samples, sample_rate)?;
    }

    println!("{} files written under {}", clips.len(), root.display());
    Ok(())
}
