//! Background sampling thread
//!
//! Polls an [`AccelDriver`] at a fixed interval and pushes readings into a
//! crossbeam channel. The consumer decides what to do with them (log,
//! publish, record).
//!
//! ```text
//! ┌──────────────────┐  Sample   ┌─────────────────┐
//! │  bma423-sampler  │ ────────▶ │   consumer      │
//! │  (driver owner)  │  channel  │  (main thread)  │
//! └──────────────────┘           └─────────────────┘
//! ```
//!
//! The loop exits when the running flag clears, the receiver is dropped,
//! the sample budget is spent, or reads fail too many times in a row. The
//! driver is handed back through the join handle so the caller can power
//! the sensor down.

use crate::config::SamplingConfig;
use crate::drivers::AccelDriver;
use crate::error::{Error, Result};
use crate::types::AccelSample;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Channel capacity; a slow consumer makes the sampler block, not grow memory
const CHANNEL_CAPACITY: usize = 64;

/// Message sent to the consumer
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    /// Acceleration reading
    Accel(AccelSample),
    /// Temperature reading (°C), only when valid
    Temperature(f32),
}

/// Why the sampling loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Running flag cleared
    Shutdown,
    /// `max_samples` reached
    Completed,
    /// Receiver dropped
    Disconnected,
    /// Too many consecutive read failures
    TooManyErrors,
}

/// Statistics returned when the sampler stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerStats {
    pub samples: u64,
    pub errors: u64,
    pub reason: StopReason,
}

/// Handle to a running sampler thread
pub struct Sampler<D> {
    handle: JoinHandle<(D, SamplerStats)>,
}

impl<D: AccelDriver + 'static> Sampler<D> {
    /// Spawn the sampling thread, returning its handle and the sample receiver
    pub fn spawn(
        driver: D,
        config: SamplingConfig,
        running: Arc<AtomicBool>,
    ) -> Result<(Self, Receiver<Sample>)> {
        let (tx, rx) = bounded(CHANNEL_CAPACITY);
        let handle = thread::Builder::new()
            .name("bma423-sampler".to_string())
            .spawn(move || run(driver, &config, &running, &tx))
            .map_err(|e| Error::Other(format!("Failed to spawn sampler: {}", e)))?;
        Ok((Self { handle }, rx))
    }

    /// Wait for the thread to stop and take the driver back
    pub fn join(self) -> Result<(D, SamplerStats)> {
        self.handle
            .join()
            .map_err(|_| Error::Other("sampler thread panicked".to_string()))
    }
}

/// Sampling loop, runs on the sampler thread
fn run<D: AccelDriver>(
    mut driver: D,
    config: &SamplingConfig,
    running: &AtomicBool,
    tx: &Sender<Sample>,
) -> (D, SamplerStats) {
    let interval = Duration::from_millis(config.interval_ms);
    let mut stats = SamplerStats {
        samples: 0,
        errors: 0,
        reason: StopReason::Shutdown,
    };
    let mut consecutive_errors = 0u32;

    log::info!(
        "Sampler started ({} ms interval, {})",
        config.interval_ms,
        match config.max_samples {
            0 => "unbounded".to_string(),
            n => format!("{} samples", n),
        }
    );

    while running.load(Ordering::Relaxed) {
        let started = Instant::now();

        match driver.read() {
            Ok(sample) => {
                consecutive_errors = 0;
                stats.samples += 1;
                if tx.send(Sample::Accel(sample)).is_err() {
                    stats.reason = StopReason::Disconnected;
                    break;
                }
            }
            Err(e) => {
                consecutive_errors += 1;
                stats.errors += 1;
                log::warn!(
                    "Acceleration read failed ({}/{}): {}",
                    consecutive_errors,
                    config.max_consecutive_errors,
                    e
                );
                if consecutive_errors >= config.max_consecutive_errors {
                    log::error!("Giving up after {} consecutive errors", consecutive_errors);
                    stats.reason = StopReason::TooManyErrors;
                    break;
                }
            }
        }

        if config.temperature_every > 0
            && stats.samples > 0
            && consecutive_errors == 0
            && stats.samples % config.temperature_every == 0
        {
            match driver.temperature() {
                Ok(Some(t)) => {
                    if tx.send(Sample::Temperature(t)).is_err() {
                        stats.reason = StopReason::Disconnected;
                        break;
                    }
                }
                Ok(None) => log::debug!("Temperature not valid yet"),
                Err(e) => log::warn!("Temperature read failed: {}", e),
            }
        }

        if config.max_samples > 0 && stats.samples >= config.max_samples {
            stats.reason = StopReason::Completed;
            break;
        }

        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    log::info!(
        "Sampler stopped: {:?} ({} samples, {} errors)",
        stats.reason,
        stats.samples,
        stats.errors
    );
    (driver, stats)
}
