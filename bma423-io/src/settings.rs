//! Typed accelerometer settings
//!
//! Every enum maps 1:1 to a register field code, so an out-of-range
//! setting cannot be expressed. Decoding a reserved code from the device
//! returns `None` from `from_bits`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// I2C slave address, selected by the SDO pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlaveAddr {
    /// SDO pulled high (0x19)
    #[default]
    Default,
    /// SDO pulled low (0x18)
    Alternative,
}

impl SlaveAddr {
    pub fn addr(self) -> u8 {
        match self {
            SlaveAddr::Default => 0x19,
            SlaveAddr::Alternative => 0x18,
        }
    }
}

/// Accelerometer full-scale range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AccRange {
    #[serde(rename = "2g")]
    G2,
    #[default]
    #[serde(rename = "4g")]
    G4,
    #[serde(rename = "8g")]
    G8,
    #[serde(rename = "16g")]
    G16,
}

impl AccRange {
    /// All ranges in register order
    pub const ALL: [AccRange; 4] = [AccRange::G2, AccRange::G4, AccRange::G8, AccRange::G16];

    pub fn bits(self) -> u8 {
        match self {
            AccRange::G2 => 0x00,
            AccRange::G4 => 0x01,
            AccRange::G8 => 0x02,
            AccRange::G16 => 0x03,
        }
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(AccRange::G2),
            0x01 => Some(AccRange::G4),
            0x02 => Some(AccRange::G8),
            0x03 => Some(AccRange::G16),
            _ => None,
        }
    }

    /// Sensitivity of the 12-bit output (LSB per g)
    pub fn lsb_per_g(self) -> f32 {
        match self {
            AccRange::G2 => 1024.0,
            AccRange::G4 => 512.0,
            AccRange::G8 => 256.0,
            AccRange::G16 => 128.0,
        }
    }

    /// Full scale in g
    pub fn full_scale_g(self) -> f32 {
        match self {
            AccRange::G2 => 2.0,
            AccRange::G4 => 4.0,
            AccRange::G8 => 8.0,
            AccRange::G16 => 16.0,
        }
    }
}

impl fmt::Display for AccRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "±{}g", self.full_scale_g())
    }
}

/// Output data rate (ACC_CONF.acc_odr)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OutputDataRate {
    #[serde(rename = "0.78hz")]
    Hz0_78 = 0x01,
    #[serde(rename = "1.5hz")]
    Hz1_5 = 0x02,
    #[serde(rename = "3.1hz")]
    Hz3_1 = 0x03,
    #[serde(rename = "6.25hz")]
    Hz6_25 = 0x04,
    #[serde(rename = "12.5hz")]
    Hz12_5 = 0x05,
    #[serde(rename = "25hz")]
    Hz25 = 0x06,
    #[serde(rename = "50hz")]
    Hz50 = 0x07,
    #[default]
    #[serde(rename = "100hz")]
    Hz100 = 0x08,
    #[serde(rename = "200hz")]
    Hz200 = 0x09,
    #[serde(rename = "400hz")]
    Hz400 = 0x0A,
    #[serde(rename = "800hz")]
    Hz800 = 0x0B,
    #[serde(rename = "1600hz")]
    Hz1600 = 0x0C,
}

impl OutputDataRate {
    /// All rates in register order
    pub const ALL: [OutputDataRate; 12] = [
        OutputDataRate::Hz0_78,
        OutputDataRate::Hz1_5,
        OutputDataRate::Hz3_1,
        OutputDataRate::Hz6_25,
        OutputDataRate::Hz12_5,
        OutputDataRate::Hz25,
        OutputDataRate::Hz50,
        OutputDataRate::Hz100,
        OutputDataRate::Hz200,
        OutputDataRate::Hz400,
        OutputDataRate::Hz800,
        OutputDataRate::Hz1600,
    ];

    /// Register code; 0x00 and 0x0D..=0x0F are reserved
    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x01..=0x0C => Some(Self::ALL[(bits - 1) as usize]),
            _ => None,
        }
    }

    /// Nominal rate in Hz (25/32 Hz · 2^(code-1))
    pub fn hz(self) -> f32 {
        25.0 / 32.0 * (1u32 << (self.bits() - 1)) as f32
    }
}

impl fmt::Display for OutputDataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// Oversampling / averaging setting (ACC_CONF.acc_bwp)
///
/// In continuous filter mode only the first four codes are defined and
/// select the filter (osr4, osr2, normal, cic). In averaging mode every
/// code is valid and selects the number of averaged samples, 2^code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OversampleRate {
    Osr4,
    Osr2,
    #[default]
    Normal,
    Cic,
    Avg16,
    Avg32,
    Avg64,
    Avg128,
}

impl OversampleRate {
    pub const ALL: [OversampleRate; 8] = [
        OversampleRate::Osr4,
        OversampleRate::Osr2,
        OversampleRate::Normal,
        OversampleRate::Cic,
        OversampleRate::Avg16,
        OversampleRate::Avg32,
        OversampleRate::Avg64,
        OversampleRate::Avg128,
    ];

    pub fn bits(self) -> u8 {
        self as u8
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        Self::ALL.get(bits as usize).copied()
    }

    /// Number of samples averaged in averaging mode
    pub fn averaged_samples(self) -> u16 {
        1 << self.bits()
    }

    /// Whether the code is defined for the given filter mode
    pub fn is_valid_in(self, mode: PerformanceMode) -> bool {
        match mode {
            PerformanceMode::Averaging => true,
            PerformanceMode::Continuous => self.bits() <= OversampleRate::Cic.bits(),
        }
    }

    /// Name of the setting as the device interprets it in `mode`
    ///
    /// Averaging mode reads every code as a sample count (`avg1`..`avg128`).
    pub fn describe(self, mode: PerformanceMode) -> String {
        match mode {
            PerformanceMode::Averaging => format!("avg{}", self.averaged_samples()),
            PerformanceMode::Continuous => self.to_string(),
        }
    }
}

impl fmt::Display for OversampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OversampleRate::Osr4 => "osr4",
            OversampleRate::Osr2 => "osr2",
            OversampleRate::Normal => "normal",
            OversampleRate::Cic => "cic",
            OversampleRate::Avg16 => "avg16",
            OversampleRate::Avg32 => "avg32",
            OversampleRate::Avg64 => "avg64",
            OversampleRate::Avg128 => "avg128",
        };
        f.write_str(name)
    }
}

/// Filter performance mode (ACC_CONF.acc_perf_mode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    /// Duty-cycled, averages `OversampleRate::averaged_samples`
    Averaging,
    /// Continuous filter, full performance
    #[default]
    Continuous,
}

impl PerformanceMode {
    pub fn bits(self) -> u8 {
        match self {
            PerformanceMode::Averaging => 0,
            PerformanceMode::Continuous => 1,
        }
    }

    pub fn from_bits(bits: u8) -> Self {
        if bits & 0x01 == 0 {
            PerformanceMode::Averaging
        } else {
            PerformanceMode::Continuous
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerformanceMode::Averaging => write!(f, "averaging"),
            PerformanceMode::Continuous => write!(f, "continuous"),
        }
    }
}

/// Complete accelerometer configuration
///
/// Defaults match the power-on register values (±4 g, 100 Hz, normal,
/// continuous filter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccelConfig {
    #[serde(default)]
    pub acc_range: AccRange,
    #[serde(default)]
    pub output_data_rate: OutputDataRate,
    #[serde(default)]
    pub oversample_rate: OversampleRate,
    #[serde(default)]
    pub performance_mode: PerformanceMode,
}
