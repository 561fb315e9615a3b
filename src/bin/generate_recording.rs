use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use compass_heading::sensor::write_recording;
use compass_heading::simulation::{MotionConfig, NoiseConfig, apply_noise, generate_samples};

#[derive(Parser, Debug)]
#[command(name = "generate_recording")]
#[command(about = "Generate synthetic accelerometer/magnetometer recordings for heading tests")]
struct Args {
    /// TOML motion and noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output recording (JSON lines)
    #[arg(short, long, default_value = "data/synthetic.jsonl")]
    output: PathBuf,

    /// Initial heading in degrees
    #[arg(long, default_value_t = 0.0)]
    heading: f32,

    /// Turn rate in degrees per second (positive is clockwise)
    #[arg(long, default_value_t = 0.0)]
    turn_rate: f32,

    /// Duration in seconds (CLI override)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Per-sensor sample rate in Hz (CLI override)
    #[arg(long)]
    sample_rate: Option<f32>,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Accelerometer noise standard deviation in m/s² (CLI override)
    #[arg(long)]
    accel_noise: Option<f32>,

    /// Magnetometer noise standard deviation in µT (CLI override)
    #[arg(long)]
    mag_noise: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TomlConfig {
    motion: MotionConfig,
    noise: NoiseConfig,
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let toml = match &args.config {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    let mut motion = toml.motion;
    if let Some(duration) = args.duration {
        motion.duration_secs = duration;
    }
    if let Some(rate) = args.sample_rate {
        motion.sample_rate_hz = rate;
    }
    if motion.sample_rate_hz <= 0.0 {
        anyhow::bail!("Sample rate must be positive");
    }

    let mut noise = toml.noise;
    if let Some(seed) = args.seed {
        noise.seed = Some(seed);
    }
    if let Some(std) = args.accel_noise {
        noise.accel_std = std;
    }
    if let Some(std) = args.mag_noise {
        noise.mag_std = std;
    }

    let start = args.heading;
    let turn_rate = args.turn_rate;
    let mut samples = generate_samples(&motion, |t| start + turn_rate * t);
    apply_noise(&mut samples, &noise);

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }
    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    write_recording(BufWriter::new(file), &samples).context("Failed to write recording")?;

    println!(
        "Wrote {} samples ({:.1}s at {} Hz) to {}",
        samples.len(),
        motion.duration_secs,
        motion.sample_rate_hz,
        args.output.display()
    );

    Ok(())
}
