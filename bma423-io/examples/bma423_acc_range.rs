//! Cycle through every accelerometer range
//!
//! ```sh
//! cargo run --example bma423_acc_range [-- /dev/i2c-1]
//! ```

use bma423_io::config::DeviceConfig;
use bma423_io::create_device;
use bma423_io::settings::AccRange;
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

    bma.set_acc_range(AccRange::G8)?;

    loop {
        for acc_range in AccRange::ALL {
            println!("Current Acc range setting: {}", bma.acc_range());
            for _ in 0..10 {
                let [accx, accy, accz] = bma.acceleration_ms2()?;
                println!("x:{:.2}m/s2, y:{:.2}m/s2, z:{:.2}m/s2", accx, accy, accz);
                thread::sleep(Duration::from_millis(500));
            }
            bma.set_acc_range(acc_range)?;
        }
    }
}
