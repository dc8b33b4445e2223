//! Linux userspace I2C (`/dev/i2c-N`)

use crate::error::{Error, Result};
use linux_embedded_hal::I2cdev;

/// Open an I2C character device
pub fn open(path: &str) -> Result<I2cdev> {
    let bus = I2cdev::new(path).map_err(|e| Error::Linux(format!("{}: {}", path, e)))?;
    log::info!("Opened I2C bus: {}", path);
    Ok(bus)
}
