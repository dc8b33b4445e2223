//! BMA423-IO - accelerometer sampling daemon
//!
//! Opens the configured sensor (real I2C or simulated), applies the
//! configured range / data rate / oversampling and logs samples until
//! Ctrl-C or the sample budget runs out.

use bma423_io::config::AppConfig;
use bma423_io::sampler::{Sample, Sampler};
use bma423_io::{AccelDriver, Error, Result, create_device};
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

const DEFAULT_CONFIG_PATH: &str = "/etc/bma423io.toml";

/// Parse config path from command line arguments.
///
/// Supports:
/// - `bma423-io <path>` (positional)
/// - `bma423-io --config <path>` (flag-based)
/// - `bma423-io -c <path>` (short flag)
///
/// Defaults to `/etc/bma423io.toml` if not specified.
fn parse_config_path(args: &[String]) -> String {
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    DEFAULT_CONFIG_PATH.to_string()
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config_path = parse_config_path(&args);
    let (config, loaded) = AppConfig::load_or_default(&config_path)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("BMA423-IO v{} starting...", env!("CARGO_PKG_VERSION"));
    if loaded {
        log::info!("Using config: {}", config_path);
    } else {
        log::warn!("Config {} not found, using defaults", config_path);
    }
    log::info!(
        "Device: {} (bus {}, address {:#04x})",
        config.device.device_type,
        config.device.bus,
        config.device.address
    );

    let mut device = create_device(&config.device)?;
    device.configure(&config.sensor)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    let (sampler, samples) = Sampler::spawn(device, config.sampling.clone(), running)?;
    log::info!("BMA423-IO running. Press Ctrl-C to stop.");

    // Ends when the sampler drops its sender
    for sample in samples.iter() {
        match sample {
            Sample::Accel(s) => {
                let [x, y, z] = s.accel_ms2();
                log::info!(
                    "x:{:.2}m/s2, y:{:.2}m/s2, z:{:.2}m/s2 (|a| {:.3}g)",
                    x,
                    y,
                    z,
                    s.magnitude()
                );
            }
            Sample::Temperature(t) => log::info!("temperature: {:.0}°C", t),
        }
    }

    log::info!("Shutting down...");
    let (mut device, stats) = sampler.join()?;
    device.shutdown()?;
    log::info!(
        "BMA423-IO stopped ({} samples, {} errors)",
        stats.samples,
        stats.errors
    );
    Ok(())
}
