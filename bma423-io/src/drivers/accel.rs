//! Accelerometer driver trait

use crate::error::Result;
use crate::types::AccelSample;

/// Accelerometer driver trait
pub trait AccelDriver: Send {
    /// Read one acceleration sample
    fn read(&mut self) -> Result<AccelSample>;

    /// Read the die temperature in °C, `None` when no valid value is available
    fn temperature(&mut self) -> Result<Option<f32>>;

    /// Power the sensing element down
    fn shutdown(&mut self) -> Result<()>;
}
