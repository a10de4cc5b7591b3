use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::info;

use anglemeter::{AngleMeter, AngleMeterCommand, AngleMeterConfig};

#[derive(Parser, Debug)]
#[command(name = "anglemeter")]
#[command(author, version, about = "Analog angle meter fed by a random walk")]
struct Args {
    /// Config file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pointer model asset (TOML); the built-in arrow is used otherwise
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// TrueType/OpenType font for the angle label
    #[arg(short, long)]
    font: Option<PathBuf>,

    /// Dial radius in pixels
    #[arg(short, long)]
    radius: Option<f64>,

    /// Draw a half dial (-90..90)
    #[arg(long)]
    half: bool,

    /// Show the cross-hair guide lines
    #[arg(long)]
    cross_light: bool,

    /// Leave a histogram mark for every reading
    #[arg(long)]
    histogram: bool,

    /// Milliseconds between readings
    #[arg(long, default_value = "250")]
    interval_ms: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("anglemeter=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AngleMeterConfig::load(path)?,
        None => AngleMeterConfig::default(),
    };
    if let Some(radius) = args.radius {
        config.radius = radius;
    }
    if let Some(model) = &args.model {
        match config.models.first_mut() {
            Some(descriptor) => descriptor.src = Some(model.clone()),
            None => config.src = Some(model.clone()),
        }
    }
    if let Some(path) = &args.font {
        let data = std::fs::read(path)
            .with_context(|| format!("reading font {}", path.display()))?;
        config.font_data = Some(data);
    }
    config.half |= args.half;
    config.enable_cross_light |= args.cross_light;

    let (low, high) = if config.half { (-90.0, 90.0) } else { (-180.0, 180.0) };
    let mut meter = AngleMeter::new(config)?;

    let (sender, receiver) = mpsc::channel();
    let interval = Duration::from_millis(args.interval_ms);
    let histogram = args.histogram;
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut angle: f64 = 0.0;
        loop {
            angle = (angle + rng.random_range(-20.0..20.0)).clamp(low, high);
            let reading = (angle * 10.0).round() / 10.0;
            let command = if histogram {
                AngleMeterCommand::RotateWithHistogram(reading)
            } else {
                AngleMeterCommand::Rotate(reading)
            };
            if sender.send(command).is_err() {
                break;
            }
            thread::sleep(interval);
        }
    });

    info!(
        radius = meter.config().radius,
        half = meter.config().half,
        histogram,
        "showing angle meter, close the window to exit"
    );
    meter
        .show_with_commands(receiver)
        .map_err(|err| anyhow::anyhow!("{err}"))
}
