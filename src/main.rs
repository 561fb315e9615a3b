use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;

use compass_heading::config::{DeviceRotation, HeadingConfig, SamplingRate};
use compass_heading::output::{OutputFormat, create_formatter};
use compass_heading::sensor::{FixedRotation, ReplaySource};
use compass_heading::{CompassHeading, HeadingEvent};

#[derive(Parser, Debug)]
#[command(name = "compass-heading")]
#[command(about = "Replay accelerometer and magnetometer recordings through the heading filter", long_about = None)]
struct Args {
    /// JSON-lines sensor recording
    recording: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum heading change in degrees before an event is emitted
    #[arg(short = 't', long)]
    threshold: Option<u32>,

    /// Screen rotation in degrees: 0, 90, 180, 270
    #[arg(short, long, default_value = "0")]
    rotation: DeviceRotation,

    /// Sampling rate tier requested from both sensors
    #[arg(long, value_enum)]
    rate: Option<SamplingRate>,

    /// Output format: text, json, csv
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Pace the replay by the recorded timestamps
    #[arg(long)]
    realtime: bool,

    /// Include timestamps and accuracy in text output
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<HeadingConfig> {
    let mut config = match &args.config {
        Some(path) => HeadingConfig::from_file(path).context("Failed to load config file")?,
        None => HeadingConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.filter_threshold = threshold;
    }
    if let Some(rate) = args.rate {
        config.sampling_rate = rate;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let source = ReplaySource::from_file(&args.recording)
        .with_context(|| format!("Failed to read {}", args.recording.display()))?
        .realtime(args.realtime);
    log::info!("Loaded {} samples", source.len());

    let (event_tx, event_rx) = unbounded::<HeadingEvent>();
    let mut compass = CompassHeading::with_rotation_provider(
        source,
        &config,
        FixedRotation(args.rotation),
        event_tx,
    );

    if !compass.has_compass() {
        anyhow::bail!("Recording needs both accelerometer and magnetometer samples");
    }

    let formatter = create_formatter(args.format, args.verbose);
    let printer = std::thread::spawn(move || {
        if let Some(header) = formatter.header() {
            println!("{}", header);
        }
        let mut count = 0usize;
        for event in event_rx {
            println!("{}", formatter.format(&event));
            count += 1;
        }
        count
    });

    compass
        .start(config.filter_threshold)
        .context("Failed to start compass heading")?;
    compass.source_mut().join();
    compass.stop();

    let final_heading = compass.heading();
    drop(compass);

    let count = printer
        .join()
        .map_err(|_| anyhow::anyhow!("Output thread panicked"))?;
    log::info!("{} heading events, final heading {}°", count, final_heading);

    Ok(())
}
