//! Device implementations

pub mod mock;
#[cfg(feature = "linux")]
pub mod linux;

use crate::config::DeviceConfig;
use crate::drivers::Bma423;
use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface};
use mock::SimulatedBma423;

/// Driver over a runtime-selected interface
pub type Device = Bma423<Box<dyn RegisterInterface>>;

/// Create a driver based on configuration
pub fn create_device(config: &DeviceConfig) -> Result<Device> {
    let iface: Box<dyn RegisterInterface> = match config.device_type.as_str() {
        "mock" => {
            let sim = SimulatedBma423::with_address(config.address, &config.simulation);
            Box::new(I2cInterface::with_address(sim, config.address))
        }
        #[cfg(feature = "linux")]
        "linux" => {
            let bus = linux::open(&config.bus)?;
            Box::new(I2cInterface::with_address(bus, config.address))
        }
        #[cfg(not(feature = "linux"))]
        "linux" => {
            return Err(Error::Other(
                "linux device requires the `linux` feature".to_string(),
            ));
        }
        other => return Err(Error::UnknownDevice(other.to_string())),
    };
    Bma423::new(iface)
}
