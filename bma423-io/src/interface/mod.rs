//! Register interface abstraction
//!
//! The driver only ever talks to registers. Anything that can read and
//! write them (an embedded-hal I2C bus, a simulator, a test double)
//! implements [`RegisterInterface`].

use crate::error::Result;

mod i2c;
pub use i2c::I2cInterface;

/// Register-level access to a BMA423
pub trait RegisterInterface: Send {
    /// Read a single register
    fn read_register(&mut self, register: u8) -> Result<u8>;

    /// Write a single register
    fn write_register(&mut self, register: u8, value: u8) -> Result<()>;

    /// Burst read `buffer.len()` consecutive registers starting at `register`
    fn read_many(&mut self, register: u8, buffer: &mut [u8]) -> Result<()>;
}

impl<T: RegisterInterface + ?Sized> RegisterInterface for Box<T> {
    fn read_register(&mut self, register: u8) -> Result<u8> {
        (**self).read_register(register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<()> {
        (**self).write_register(register, value)
    }

    fn read_many(&mut self, register: u8, buffer: &mut [u8]) -> Result<()> {
        (**self).read_many(register, buffer)
    }
}
