//! # Turntable Keys
//!
//! Turn a DJ controller jog wheel into clockwise/counter-clockwise key presses.
//!
//! This application polls one absolute axis of a game-controller style input
//! device and types `A` while the platter spins clockwise and `S` while it
//! spins counter-clockwise.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use turntable_keys::config::Config;
use turntable_keys::controller::turntable::{enumerate, select_device};
use turntable_keys::controller::{AxisSelector, TurntableDevice};
use turntable_keys::keyboard::VirtualKeyboard;
use turntable_keys::session::Session;

/// Log file name prefix inside the configured log directory
const LOG_FILE_PREFIX: &str = "turntable-keys.log";

#[derive(Parser, Debug)]
#[command(name = "turntable-keys", version)]
#[command(about = "Turn a DJ controller jog wheel into A/S key presses")]
struct Cli {
    /// Config file path (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Device index from --list-devices (default: first device)
    #[arg(short, long)]
    device: Option<usize>,

    /// Explicit input device path, e.g. /dev/input/event5
    #[arg(long)]
    path: Option<String>,

    /// Turntable axis: X, Y, Z, R, U, V or 0-5
    #[arg(short, long)]
    axis: Option<AxisSelector>,

    /// Moving samples before a key goes down (1-10)
    #[arg(long)]
    min_ticks: Option<u32>,

    /// Still samples before a held key is released (1-1000)
    #[arg(long)]
    stop_threshold: Option<u32>,

    /// Poll interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// List input devices and exit
    #[arg(short, long)]
    list_devices: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Overlays command line values on the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(index) = self.device {
            config.device.index = Some(index);
        }
        if let Some(path) = &self.path {
            config.device.path = path.clone();
        }
        if let Some(axis) = self.axis {
            config.device.axis = axis;
        }
        if let Some(min_ticks) = self.min_ticks {
            config.detector.min_ticks = min_ticks;
        }
        if let Some(stop_threshold) = self.stop_threshold {
            config.detector.stop_threshold = stop_threshold;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.polling.interval_ms = interval_ms;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

/// Sets up console logging, plus a daily log file when a directory is set.
///
/// `RUST_LOG` takes precedence over the configured level. The returned guard
/// must be held for the life of the program to flush the file writer.
fn init_logging(config: &Config) -> Option<WorkerGuard> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_ascii_lowercase()))
    };

    match config.log_directory() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter())
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();

            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter()).init();
            None
        }
    }
}

/// Resolves the input device path from configuration or the device listing.
fn resolve_device(config: &Config) -> Result<PathBuf> {
    if let Some(path) = config.device_path() {
        info!("Using configured device {}", path);
        return Ok(PathBuf::from(path));
    }

    info!("Scanning for input devices...");
    let devices = enumerate()?;
    for device in &devices {
        info!("  {}", device);
    }

    let selected = select_device(&devices, config.device.index).context(
        "Check that the controller is connected and that /dev/input/event* is readable \
         (e.g. membership in the 'input' group)",
    )?;

    if devices.len() == 1 {
        info!("Auto-selecting the only available device");
    }
    info!("Device {} selected: {}", selected.index, selected.name);

    Ok(selected.path.clone())
}

/// Main entry point for Turntable Keys
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Parse command line, load configuration, set up logging
///    - Select and open the input device, create the virtual keyboard
///
/// 2. **Main Loop**
///    - Poll the axis every `interval_ms`
///    - Press/release A and S as the detector decides
///
/// 3. **Shutdown** (Ctrl+C)
///    - Release any held key
///    - Log session counters
///
/// # Errors
///
/// Exits with status 1 if:
/// - Configuration cannot be loaded or is invalid
/// - No input device is found or the selection is invalid
/// - The axis is not supported or the virtual keyboard cannot be created
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let _log_guard = init_logging(&config);

    info!("Turntable Keys v{} starting...", env!("CARGO_PKG_VERSION"));

    if cli.list_devices {
        let devices = enumerate()?;
        if devices.is_empty() {
            println!("No input devices with absolute axes found");
        }
        for device in &devices {
            println!("{}", device);
        }
        return Ok(());
    }

    let path = resolve_device(&config)?;
    let source = TurntableDevice::open(&path, config.device.axis)?;
    info!("{}-axis selected", source.axis());

    let detector = config.detector_config();
    info!("Minimum ticks: {}", detector.min_ticks());
    info!("Stop threshold: {} samples", detector.stop_threshold());

    let sink = VirtualKeyboard::new()
        .context("Creating the virtual keyboard needs write access to /dev/uinput")?;
    info!("Key mapping: clockwise (>) = A, counter-clockwise (<) = S");

    let mut session = Session::new(source, sink, detector, &config.polling);

    info!("Monitoring turntable... Press Ctrl+C to exit");
    session
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
