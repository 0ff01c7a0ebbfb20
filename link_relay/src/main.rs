//! # Link Relay Binary
//!
//! Forwards Mumble Link shared memory snapshots to `127.0.0.1:7070`.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: /MumbleLink.<uid>, 16ms poll interval
//! link_relay
//!
//! # With a config file
//! link_relay --config /etc/link/relay.toml
//!
//! # Override the segment name, verbose logging
//! link_relay --segment-name /MumbleLink.1000 -v
//! ```

use clap::Parser;
use link::config::{ConfigLoader, LogLevel, RelayConfig};
use link_relay::platform::default_segment_name;
use link_relay::{RelayError, RelayLoop, SharedSegment, UdpChannel, bootstrap};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Link Relay - Mumble Link shared memory to UDP bridge
#[derive(Parser, Debug)]
#[command(name = "link_relay")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Relays Mumble Link shared memory snapshots to a local UDP listener")]
struct Args {
    /// Path to relay configuration TOML. Built-in defaults when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Shared memory object name (default: /MumbleLink.<uid>).
    #[arg(long, value_name = "NAME")]
    segment_name: Option<String>,

    /// Delay between two polls of the segment, in milliseconds.
    #[arg(long, value_name = "MS")]
    poll_interval_ms: Option<u64>,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    let config = load_config(&args);

    let level = match &config {
        Ok(config) => config.shared.log_level,
        Err(_) => LogLevel::Info,
    };
    setup_tracing(&args, level);

    info!("Link Relay v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.and_then(|config| run(&config)) {
        error!("FATAL: {e}");
        process::exit(e.exit_code());
    }

    info!("Link Relay shutdown complete");
}

fn run(config: &RelayConfig) -> Result<(), RelayError> {
    let segment_name = config
        .relay
        .segment_name
        .clone()
        .unwrap_or_else(default_segment_name);

    // Segment first: a mapping failure exits before any socket is opened.
    let (segment, channel) = bootstrap(
        || SharedSegment::open_or_create(&segment_name),
        UdpChannel::init,
    )?;

    let record = segment.read_record();
    info!(
        "Segment {} ready: tick={}, name={:?}",
        segment.name(),
        record.tick(),
        record.name()
    );

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    })?;

    let mut relay = RelayLoop::new(segment, channel, config.relay.poll_interval());
    relay.run(&running);

    // Segment unmapped and socket closed on drop.
    Ok(())
}

/// Load the config file (if any) and apply CLI overrides.
fn load_config(args: &Args) -> Result<RelayConfig, RelayError> {
    let mut config = match &args.config {
        Some(path) => RelayConfig::load(path)?,
        None => RelayConfig::default(),
    };

    if let Some(name) = &args.segment_name {
        config.relay.segment_name = Some(name.clone());
    }
    if let Some(ms) = args.poll_interval_ms {
        config.relay.poll_interval_ms = ms;
    }
    if args.verbose {
        config.shared.log_level = LogLevel::Debug;
    }

    config.validate()?;
    Ok(config)
}

/// Setup tracing subscriber based on CLI arguments and configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }

    if args.config.is_none() {
        info!("No --config given, using built-in defaults");
    }
}
