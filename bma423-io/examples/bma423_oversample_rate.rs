//! Cycle through every oversample (averaging) setting
//!
//! Averaging only applies in averaging performance mode, so the example
//! switches to it first.
//!
//! ```sh
//! cargo run --example bma423_oversample_rate [-- /dev/i2c-1]
//! ```

use bma423_io::config::DeviceConfig;
use bma423_io::create_device;
use bma423_io::settings::{OversampleRate, PerformanceMode};
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config = DeviceConfig::default();
    if let Some(bus) = std::env::args().nth(1) {
        config.device_type = "linux".to_string();
        config.bus = bus;
    }
    let mut bma = create_device(&config)?;

    bma.set_performance_mode(PerformanceMode::Averaging)?;
    bma.set_oversample_rate(OversampleRate::Avg32)?;

    loop {
        for oversample_rate in OversampleRate::ALL {
            println!(
                "Current Oversample rate setting: {}",
                bma.oversample_rate()?.describe(PerformanceMode::Averaging)
            );
            for _ in 0..10 {
                let [accx, accy, accz] = bma.acceleration_ms2()?;
                println!("x:{:.2}m/s2, y:{:.2}m/s2, z:{:.2}m/s2", accx, accy, accz);
                thread::sleep(Duration::from_millis(500));
            }
            bma.set_oversample_rate(oversample_rate)?;
        }
    }
}
