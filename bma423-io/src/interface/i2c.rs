//! I2C interface implementation

use super::RegisterInterface;
use crate::error::{Error, Result};
use crate::settings::SlaveAddr;
use embedded_hal::i2c::I2c;

/// Register access over any embedded-hal 1.0 I2C bus
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> I2cInterface<I2C> {
    /// Wrap a bus with one of the two strap-selected addresses
    pub fn new(i2c: I2C, address: SlaveAddr) -> Self {
        Self::with_address(i2c, address.addr())
    }

    /// Wrap a bus with an explicit 7-bit address
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        I2cInterface { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c + Send> RegisterInterface for I2cInterface<I2C> {
    fn read_register(&mut self, register: u8) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Error::bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        log::trace!("write {:#04x} <- {:#04x}", register, value);
        self.i2c
            .write(self.address, &[register, value])
            .map_err(Error::bus)
    }

    fn read_many(&mut self, register: u8, buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .write_read(self.address, &[register], buffer)
            .map_err(Error::bus)
    }
}
