//! Simple test: read acceleration and temperature ten times
//!
//! ```sh
//! cargo run --example bma423_simpletest                 # simulated sensor
//! cargo run --example bma423_simpletest -- /dev/i2c-1   # real sensor
//! ```

use bma423_io::config::DeviceConfig;
use bma423_io::create_device;
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

    for _ in 0..10 {
        println!("{:?}", bma.acceleration()?);
        match bma.temperature()? {
            Some(t) => println!("{}", t),
            None => println!("temperature not ready"),
        }
        thread::sleep(Duration::from_secs(2));
    }
    Ok(())
}
