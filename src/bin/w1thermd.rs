//! w1thermd - DS18B20 temperature polling daemon.
//!
//! Discovers the sensors on the 1-Wire bus, re-reads them on a fixed
//! interval and prints every sample as text or JSON lines.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use w1therm::BusConfig;
use w1therm::sensor::{self, Modprobe, ProbeGroup, RealFs, Readings};

/// DS18B20 temperature polling daemon.
#[derive(Parser)]
#[command(name = "w1thermd", about = "DS18B20 temperature polling daemon", version)]
struct Args {
    /// Polling interval in seconds.
    #[arg(short, long, default_value = "10")]
    interval: u64,

    /// Path to the 1-Wire devices directory (for testing/mocking).
    #[arg(long, default_value = BusConfig::DEFAULT_DEVICES_PATH)]
    devices_path: String,

    /// Load the w1-gpio and w1-therm kernel modules before starting.
    #[arg(long)]
    setup: bool,

    /// Module loader command used by --setup.
    #[arg(long, default_value = "/sbin/modprobe")]
    modprobe: String,

    /// Name a sensor, e.g. --alias kitchen=28-000005e2fdc3. Repeatable.
    #[arg(short, long = "alias", value_name = "NAME=ID", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,

    /// Print samples as JSON lines.
    #[arg(long)]
    json: bool,

    /// Take one sample and exit.
    #[arg(long)]
    once: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

/// Parses a `NAME=ID` alias assignment.
fn parse_alias(s: &str) -> Result<(String, String), String> {
    let (name, id) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid alias '{}': expected NAME=ID", s))?;
    let (name, id) = (name.trim(), id.trim());
    if name.is_empty() || id.is_empty() {
        return Err(format!("invalid alias '{}': empty name or id", s));
    }
    Ok((name.to_string(), id.to_string()))
}

/// Initializes the tracing subscriber with the appropriate log level.
/// Default level is INFO. Use -q for quiet mode (errors only).
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("w1thermd={},w1therm={}", level, level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct SampleJson<'a> {
    timestamp: String,
    readings: &'a Readings,
    #[serde(skip_serializing_if = "no_aliases")]
    aliases: &'a Readings,
}

fn no_aliases(aliases: &&Readings) -> bool {
    aliases.is_empty()
}

/// Prints one sample to stdout.
fn print_sample(readings: &Readings, aliases: &Readings, json: bool) {
    if json {
        let sample = SampleJson {
            timestamp: Utc::now().to_rfc3339(),
            readings,
            aliases,
        };
        match serde_json::to_string(&sample) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to encode sample: {}", e),
        }
        return;
    }

    for (id, temperature) in readings {
        println!("{:<20} {:>10}  {:>8.3} F", id, temperature, temperature.fahrenheit());
    }
    for (alias, temperature) in aliases {
        println!("{:<20} {:>10}  {:>8.3} F", alias, temperature, temperature.fahrenheit());
    }
}

/// Updates every probe and prints the result. Failures are logged only.
fn sample(group: &ProbeGroup, json: bool) {
    if let Err(e) = group.update() {
        warn!("Update failed: {}", e);
        return;
    }
    match (group.read(), group.read_alias()) {
        (Ok(readings), Ok(aliases)) => print_sample(&readings, &aliases, json),
        (Err(e), _) | (_, Err(e)) => warn!("Read failed: {}", e),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let mut config = BusConfig::default().with_devices_path(&args.devices_path);
    config.modprobe = args.modprobe.clone().into();

    info!("w1thermd {} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Config: interval={}s, devices={}",
        args.interval, args.devices_path
    );

    let fs = RealFs::new();

    if args.setup {
        if let Err(e) = sensor::setup(&fs, &Modprobe::from_config(&config), &config) {
            error!("Bus setup failed: {}", e);
            return ExitCode::FAILURE;
        }
    } else {
        debug!("Bus setup skipped");
    }

    let group = match ProbeGroup::create(&fs, &config) {
        Ok(group) => group,
        Err(e) => {
            error!("Failed to open sensors: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match group.ids() {
        Ok(ids) => info!("Sensors: {}", ids.join(", ")),
        Err(e) => warn!("Failed to list sensors: {}", e),
    }

    for (name, id) in &args.aliases {
        if let Err(e) = group.assign_alias(name, id) {
            error!("Cannot alias {} as {}: {}", id, name, e);
            return ExitCode::FAILURE;
        }
        debug!("Alias {} -> {}", name, id);
    }

    let interval = Duration::from_secs(args.interval);

    // Setup graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    info!("Starting polling loop");

    while running.load(Ordering::SeqCst) {
        sample(&group, args.json);

        if args.once {
            break;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutting down...");
    if let Err(e) = group.close() {
        error!("Failed to close sensors: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Shutdown complete");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_alias() {
        assert_eq!(
            parse_alias("kitchen=28-000005e2fdc3").unwrap(),
            ("kitchen".to_string(), "28-000005e2fdc3".to_string())
        );
        assert_eq!(
            parse_alias(" porch = 28-1 ").unwrap(),
            ("porch".to_string(), "28-1".to_string())
        );
        assert!(parse_alias("kitchen").is_err());
        assert!(parse_alias("=28-1").is_err());
        assert!(parse_alias("kitchen=").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "w1thermd",
            "--interval",
            "5",
            "--alias",
            "kitchen=28-1",
            "-a",
            "porch=28-2",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.interval, 5);
        assert_eq!(args.aliases.len(), 2);
        assert!(args.json);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.devices_path, "/sys/bus/w1/devices");
    }

    #[test]
    fn test_sample_json_shape() {
        let mut readings = Readings::new();
        readings.insert("28-1".to_string(), w1therm::Temperature::from_celsius(21.5));
        let aliases = Readings::new();
        let sample = SampleJson {
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            readings: &readings,
            aliases: &aliases,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":"2024-01-01T00:00:00+00:00","readings":{"28-1":21.5}}"#
        );
    }
}
