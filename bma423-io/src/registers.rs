//! BMA423 register map and bit-field helpers
//!
//! Only the registers used by the accelerometer path are listed. The
//! feature engine (step counter, tap, wrist wear) lives behind the
//! FEATURES_IN window and is not driven by this crate.

/// Chip identification code
pub const CHIP_ID: u8 = 0x00;

/// Expected content of [`CHIP_ID`]
pub const CHIP_ID_VALUE: u8 = 0x13;

/// Reports sensor error conditions
pub const ERR_REG: u8 = 0x02;

/// Sensor status flags
pub const STATUS: u8 = 0x03;

/// ACC_X(LSB), start of the 6-byte acceleration burst
pub const DATA_8: u8 = 0x12;
/// ACC_X(MSB)
pub const DATA_9: u8 = 0x13;
/// ACC_Y(LSB)
pub const DATA_10: u8 = 0x14;
/// ACC_Y(MSB)
pub const DATA_11: u8 = 0x15;
/// ACC_Z(LSB)
pub const DATA_12: u8 = 0x16;
/// ACC_Z(MSB)
pub const DATA_13: u8 = 0x17;

/// Sensor time <7:0>
pub const SENSORTIME_0: u8 = 0x18;
/// Sensor time <15:8>
pub const SENSORTIME_1: u8 = 0x19;
/// Sensor time <23:16>
pub const SENSORTIME_2: u8 = 0x1A;

/// Temperature, two's complement, 1 K/LSB, 0x00 = 23 °C
pub const TEMPERATURE: u8 = 0x22;

/// Error bits and message indicating internal status
pub const INTERNAL_STATUS: u8 = 0x2A;

/// Output data rate, bandwidth and read mode of the accelerometer
pub const ACC_CONF: u8 = 0x40;

/// Accelerometer g-range
pub const ACC_RANGE: u8 = 0x41;

/// Power mode configuration
pub const PWR_CONF: u8 = 0x7C;

/// Sensor enable
pub const PWR_CTRL: u8 = 0x7D;

/// Command register
pub const CMD: u8 = 0x7E;

/// Written to [`CMD`] to trigger a soft reset
pub const CMD_SOFT_RESET: u8 = 0xB6;

/// Raw temperature code meaning "no valid reading"
pub const TEMPERATURE_INVALID: u8 = 0x80;

/// Temperature at raw value 0 (°C)
pub const TEMPERATURE_OFFSET_C: f32 = 23.0;

/// Sensor time resolution (seconds per tick)
pub const SENSORTIME_TICK_S: f64 = 39.0625e-6;

/// A contiguous bit field within an 8-bit register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub register: u8,
    pub width: u8,
    pub shift: u8,
}

impl Field {
    pub const fn new(register: u8, width: u8, shift: u8) -> Self {
        Self {
            register,
            width,
            shift,
        }
    }

    /// Unshifted mask (`width` low bits set)
    #[inline]
    pub const fn mask(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Extract the field from a register value
    #[inline]
    pub const fn get(&self, reg: u8) -> u8 {
        (reg >> self.shift) & self.mask()
    }

    /// Replace the field in a register value, leaving other bits untouched
    #[inline]
    pub const fn set(&self, reg: u8, value: u8) -> u8 {
        let mask = self.mask() << self.shift;
        (reg & !mask) | ((value << self.shift) & mask)
    }
}

// ACC_CONF (0x40)
// | perf | bwp(2) | bwp(1) | bwp(0) | odr(3) | odr(2) | odr(1) | odr(0) |
pub const ACC_ODR: Field = Field::new(ACC_CONF, 4, 0);
pub const ACC_BWP: Field = Field::new(ACC_CONF, 3, 4);
pub const ACC_PERF_MODE: Field = Field::new(ACC_CONF, 1, 7);

pub const ACC_RANGE_BITS: Field = Field::new(ACC_RANGE, 2, 0);

pub const ADV_POWER_SAVE: Field = Field::new(PWR_CONF, 1, 0);
pub const ACC_EN: Field = Field::new(PWR_CTRL, 1, 2);

pub const DRDY_ACC: Field = Field::new(STATUS, 1, 7);
pub const CMD_RDY: Field = Field::new(STATUS, 1, 4);

pub const INTERNAL_MESSAGE: Field = Field::new(INTERNAL_STATUS, 5, 0);

/// Decode one axis from its LSB/MSB pair.
///
/// The 12-bit sample is left aligned: bits [7:4] of the LSB register hold
/// the low nibble, the low nibble of LSB is unused.
#[inline]
pub fn decode_axis(lsb: u8, msb: u8) -> i16 {
    i16::from_le_bytes([lsb & 0xF0, msb]) >> 4
}

/// Encode a 12-bit sample into its LSB/MSB pair
#[inline]
pub fn encode_axis(value: i16) -> (u8, u8) {
    let clamped = value.clamp(-2048, 2047);
    let [lsb, msb] = (clamped << 4).to_le_bytes();
    (lsb, msb)
}
