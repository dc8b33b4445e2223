//! Accelerometer sample types

use crate::settings::AccRange;

/// Standard gravity (m/s²)
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// One accelerometer reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    /// Host time of the read (µs since UNIX epoch)
    pub timestamp_us: u64,
    /// Acceleration in g
    pub accel: [f32; 3], // x, y, z
    /// Raw 12-bit counts
    pub raw: [i16; 3],
    /// Range the counts were scaled with
    pub range: AccRange,
}

impl AccelSample {
    /// Scale raw counts with the given range and stamp with the current time
    pub fn from_raw(raw: [i16; 3], range: AccRange) -> Self {
        let scale = range.lsb_per_g();
        Self {
            timestamp_us: now_us(),
            accel: raw.map(|v| v as f32 / scale),
            raw,
            range,
        }
    }

    /// Acceleration in m/s²
    pub fn accel_ms2(&self) -> [f32; 3] {
        self.accel.map(|g| g * STANDARD_GRAVITY)
    }

    /// Get accelerometer magnitude (g)
    pub fn magnitude(&self) -> f32 {
        (self.accel[0].powi(2) + self.accel[1].powi(2) + self.accel[2].powi(2)).sqrt()
    }
}

/// Current time in microseconds since UNIX epoch
#[inline]
pub fn now_us() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
