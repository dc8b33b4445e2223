//! Bosch BMA423 accelerometer driver
//!
//! Register-level driver generic over [`RegisterInterface`]. The active
//! range is cached on the host so every acceleration read costs a single
//! 6-byte burst.
//!
//! ```no_run
//! use bma423_io::{Bma423, SlaveAddr};
//! use bma423_io::settings::AccRange;
//!
//! # fn demo<I2C: embedded_hal::i2c::I2c + Send>(i2c: I2C) -> bma423_io::Result<()> {
//! let mut bma = Bma423::new_i2c(i2c, SlaveAddr::Default)?;
//! bma.set_acc_range(AccRange::G8)?;
//! let [x, y, z] = bma.acceleration()?;
//! println!("x:{:.2}g y:{:.2}g z:{:.2}g", x, y, z);
//! # Ok(())
//! # }
//! ```

use crate::drivers::AccelDriver;
use crate::error::{Error, Result};
use crate::interface::{I2cInterface, RegisterInterface};
use crate::registers::{self as reg, Field};
use crate::settings::{AccRange, AccelConfig, OutputDataRate, OversampleRate, PerformanceMode, SlaveAddr};
use crate::types::{AccelSample, STANDARD_GRAVITY};
use std::time::Duration;

/// Time the device needs after a soft reset before it accepts commands
const SOFT_RESET_DELAY: Duration = Duration::from_millis(2);

/// BMA423 driver
pub struct Bma423<IFACE> {
    iface: IFACE,
    range: AccRange,
}

impl<I2C: embedded_hal::i2c::I2c + Send> Bma423<I2cInterface<I2C>> {
    /// Probe a BMA423 on an I2C bus
    pub fn new_i2c(i2c: I2C, address: SlaveAddr) -> Result<Self> {
        Self::new(I2cInterface::new(i2c, address))
    }
}

impl<IFACE: RegisterInterface> Bma423<IFACE> {
    /// Probe the device, enable the accelerometer and cache the active range
    ///
    /// Fails with [`Error::DeviceNotFound`] if the chip ID is not 0x13.
    pub fn new(mut iface: IFACE) -> Result<Self> {
        let chip_id = iface.read_register(reg::CHIP_ID)?;
        if chip_id != reg::CHIP_ID_VALUE {
            return Err(Error::DeviceNotFound { found: chip_id });
        }

        let mut dev = Bma423 {
            iface,
            range: AccRange::default(),
        };
        dev.set_enabled(true)?;
        dev.range = dev.read_acc_range()?;
        log::info!("BMA423 found, range {}", dev.range);
        Ok(dev)
    }

    /// Give back the interface
    pub fn release(self) -> IFACE {
        self.iface
    }

    // ------------------------------------------------------------------
    // Register helpers
    // ------------------------------------------------------------------

    fn read_field(&mut self, field: Field) -> Result<u8> {
        let value = self.iface.read_register(field.register)?;
        Ok(field.get(value))
    }

    fn write_field(&mut self, field: Field, value: u8) -> Result<()> {
        let current = self.iface.read_register(field.register)?;
        self.update_field(field, current, value)
    }

    /// Write `value` into `field` of a register already read as `current`
    fn update_field(&mut self, field: Field, current: u8, value: u8) -> Result<()> {
        let updated = field.set(current, value);
        log::debug!(
            "reg {:#04x}: {:#04x} -> {:#04x}",
            field.register,
            current,
            updated
        );
        self.iface.write_register(field.register, updated)
    }

    // ------------------------------------------------------------------
    // Data
    // ------------------------------------------------------------------

    /// Raw 12-bit acceleration counts [x, y, z]
    pub fn raw_acceleration(&mut self) -> Result<[i16; 3]> {
        let mut buf = [0u8; 6];
        self.iface.read_many(reg::DATA_8, &mut buf)?;
        Ok([
            reg::decode_axis(buf[0], buf[1]),
            reg::decode_axis(buf[2], buf[3]),
            reg::decode_axis(buf[4], buf[5]),
        ])
    }

    /// Acceleration in g [x, y, z]
    pub fn acceleration(&mut self) -> Result<[f32; 3]> {
        let raw = self.raw_acceleration()?;
        let scale = self.range.lsb_per_g();
        Ok(raw.map(|v| v as f32 / scale))
    }

    /// Acceleration in m/s² [x, y, z]
    pub fn acceleration_ms2(&mut self) -> Result<[f32; 3]> {
        Ok(self.acceleration()?.map(|g| g * STANDARD_GRAVITY))
    }

    /// Timestamped sample with raw and scaled values
    pub fn sample(&mut self) -> Result<AccelSample> {
        let raw = self.raw_acceleration()?;
        Ok(AccelSample::from_raw(raw, self.range))
    }

    /// Die temperature in °C (±5 °C accuracy)
    ///
    /// Returns `None` while the device reports the invalid code 0x80.
    pub fn temperature(&mut self) -> Result<Option<f32>> {
        let raw = self.iface.read_register(reg::TEMPERATURE)?;
        if raw == reg::TEMPERATURE_INVALID {
            return Ok(None);
        }
        Ok(Some(raw as i8 as f32 + reg::TEMPERATURE_OFFSET_C))
    }

    /// New acceleration data available
    pub fn data_ready(&mut self) -> Result<bool> {
        Ok(self.read_field(reg::DRDY_ACC)? != 0)
    }

    /// Command decoder ready for a new command
    pub fn command_ready(&mut self) -> Result<bool> {
        Ok(self.read_field(reg::CMD_RDY)? != 0)
    }

    /// Free-running 24-bit sensor time in ticks
    pub fn sensor_time(&mut self) -> Result<u32> {
        let mut buf = [0u8; 3];
        self.iface.read_many(reg::SENSORTIME_0, &mut buf)?;
        Ok(u32::from_le_bytes([buf[0], buf[1], buf[2], 0]))
    }

    /// Sensor time in seconds
    pub fn sensor_time_seconds(&mut self) -> Result<f64> {
        Ok(self.sensor_time()? as f64 * reg::SENSORTIME_TICK_S)
    }

    /// Raw ERR_REG content
    pub fn error_status(&mut self) -> Result<u8> {
        self.iface.read_register(reg::ERR_REG)
    }

    /// INTERNAL_STATUS message field
    pub fn internal_status(&mut self) -> Result<u8> {
        self.read_field(reg::INTERNAL_MESSAGE)
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    /// Active range (cached)
    pub fn acc_range(&self) -> AccRange {
        self.range
    }

    fn read_acc_range(&mut self) -> Result<AccRange> {
        let bits = self.read_field(reg::ACC_RANGE_BITS)?;
        AccRange::from_bits(bits).ok_or(Error::InvalidRegisterValue {
            register: reg::ACC_RANGE,
            value: bits,
        })
    }

    pub fn set_acc_range(&mut self, range: AccRange) -> Result<()> {
        self.write_field(reg::ACC_RANGE_BITS, range.bits())?;
        self.range = range;
        Ok(())
    }

    pub fn output_data_rate(&mut self) -> Result<OutputDataRate> {
        let bits = self.read_field(reg::ACC_ODR)?;
        OutputDataRate::from_bits(bits).ok_or(Error::InvalidRegisterValue {
            register: reg::ACC_CONF,
            value: bits,
        })
    }

    pub fn set_output_data_rate(&mut self, odr: OutputDataRate) -> Result<()> {
        self.write_field(reg::ACC_ODR, odr.bits())
    }

    /// Oversample setting; codes above `Cic` are reserved in continuous mode
    pub fn oversample_rate(&mut self) -> Result<OversampleRate> {
        let conf = self.iface.read_register(reg::ACC_CONF)?;
        let bits = reg::ACC_BWP.get(conf);
        let mode = PerformanceMode::from_bits(reg::ACC_PERF_MODE.get(conf));
        OversampleRate::from_bits(bits)
            .filter(|osr| osr.is_valid_in(mode))
            .ok_or(Error::InvalidRegisterValue {
                register: reg::ACC_CONF,
                value: bits,
            })
    }

    /// Fails with [`Error::UnsupportedOversampleRate`] for `Avg16`..`Avg128`
    /// while the filter runs in continuous mode
    pub fn set_oversample_rate(&mut self, osr: OversampleRate) -> Result<()> {
        let conf = self.iface.read_register(reg::ACC_CONF)?;
        let mode = PerformanceMode::from_bits(reg::ACC_PERF_MODE.get(conf));
        check_oversample(osr, mode)?;
        self.update_field(reg::ACC_BWP, conf, osr.bits())
    }

    pub fn performance_mode(&mut self) -> Result<PerformanceMode> {
        Ok(PerformanceMode::from_bits(self.read_field(reg::ACC_PERF_MODE)?))
    }

    /// Switching to continuous mode fails while an averaging-only
    /// oversample code is active
    pub fn set_performance_mode(&mut self, mode: PerformanceMode) -> Result<()> {
        let conf = self.iface.read_register(reg::ACC_CONF)?;
        if let Some(osr) = OversampleRate::from_bits(reg::ACC_BWP.get(conf)) {
            check_oversample(osr, mode)?;
        }
        self.update_field(reg::ACC_PERF_MODE, conf, mode.bits())
    }

    /// Apply a complete configuration: one ACC_CONF write plus the range
    pub fn configure(&mut self, config: &AccelConfig) -> Result<()> {
        check_oversample(config.oversample_rate, config.performance_mode)?;
        let acc_conf = reg::ACC_ODR.set(0, config.output_data_rate.bits());
        let acc_conf = reg::ACC_BWP.set(acc_conf, config.oversample_rate.bits());
        let acc_conf = reg::ACC_PERF_MODE.set(acc_conf, config.performance_mode.bits());
        self.iface.write_register(reg::ACC_CONF, acc_conf)?;
        self.set_acc_range(config.acc_range)?;
        log::info!(
            "BMA423 configured: range {}, odr {}, osr {}, {}",
            config.acc_range,
            config.output_data_rate,
            config.oversample_rate.describe(config.performance_mode),
            config.performance_mode
        );
        Ok(())
    }

    pub fn is_enabled(&mut self) -> Result<bool> {
        Ok(self.read_field(reg::ACC_EN)? != 0)
    }

    /// Turn the accelerometer on or off (PWR_CTRL.acc_en)
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.write_field(reg::ACC_EN, enabled as u8)
    }

    pub fn advanced_power_save(&mut self) -> Result<bool> {
        Ok(self.read_field(reg::ADV_POWER_SAVE)? != 0)
    }

    pub fn set_advanced_power_save(&mut self, enabled: bool) -> Result<()> {
        self.write_field(reg::ADV_POWER_SAVE, enabled as u8)
    }

    /// Soft reset, then re-enable the accelerometer
    ///
    /// All registers return to power-on values, so the range goes back to ±4 g.
    pub fn soft_reset(&mut self) -> Result<()> {
        self.iface
            .write_register(reg::CMD, reg::CMD_SOFT_RESET)?;
        std::thread::sleep(SOFT_RESET_DELAY);
        self.range = AccRange::G4;
        self.set_enabled(true)?;
        log::info!("BMA423 soft reset");
        Ok(())
    }
}

fn check_oversample(osr: OversampleRate, mode: PerformanceMode) -> Result<()> {
    if osr.is_valid_in(mode) {
        Ok(())
    } else {
        Err(Error::UnsupportedOversampleRate { osr, mode })
    }
}

impl<IFACE: RegisterInterface> AccelDriver for Bma423<IFACE> {
    fn read(&mut self) -> Result<AccelSample> {
        self.sample()
    }

    fn temperature(&mut self) -> Result<Option<f32>> {
        Bma423::temperature(self)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.set_enabled(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};

    const ADDR: u8 = 0x19;

    /// Transactions issued by `Bma423::new` on a freshly powered device
    fn init_transactions(range_bits: u8) -> Vec<I2cTrans> {
        vec![
            I2cTrans::write_read(ADDR, vec![reg::CHIP_ID], vec![0x13]),
            I2cTrans::write_read(ADDR, vec![reg::PWR_CTRL], vec![0x00]),
            I2cTrans::write(ADDR, vec![reg::PWR_CTRL, 0x04]),
            I2cTrans::write_read(ADDR, vec![reg::ACC_RANGE], vec![range_bits]),
        ]
    }

    fn device(extra: Vec<I2cTrans>) -> Bma423<I2cInterface<I2cMock>> {
        let mut expectations = init_transactions(0x01);
        expectations.extend(extra);
        Bma423::new_i2c(I2cMock::new(&expectations), SlaveAddr::Default).unwrap()
    }

    fn finish(dev: Bma423<I2cInterface<I2cMock>>) {
        dev.release().release().done();
    }

    #[test]
    fn test_new_probes_and_enables() {
        let dev = device(vec![]);
        assert_eq!(dev.acc_range(), AccRange::G4);
        finish(dev);
    }

    #[test]
    fn test_new_wrong_chip_id() {
        let expectations = [I2cTrans::write_read(ADDR, vec![reg::CHIP_ID], vec![0x90])];
        let mut i2c = I2cMock::new(&expectations);
        match Bma423::new_i2c(i2c.clone(), SlaveAddr::Default) {
            Err(Error::DeviceNotFound { found: 0x90 }) => {}
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("expected DeviceNotFound"),
        }
        i2c.done();
    }

    #[test]
    fn test_new_caches_device_range() {
        let expectations = init_transactions(0x03);
        let dev = Bma423::new_i2c(I2cMock::new(&expectations), SlaveAddr::Default).unwrap();
        assert_eq!(dev.acc_range(), AccRange::G16);
        finish(dev);
    }

    #[test]
    fn test_acceleration_scaling() {
        // x = +512 (1g @ 4g), y = -256, z = 0
        let mut dev = device(vec![I2cTrans::write_read(
            ADDR,
            vec![reg::DATA_8],
            vec![0x00, 0x20, 0x00, 0xF0, 0x00, 0x00],
        )]);
        let accel = dev.acceleration().unwrap();
        assert_eq!(accel, [1.0, -0.5, 0.0]);
        finish(dev);
    }

    #[test]
    fn test_set_acc_range_updates_scale() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::ACC_RANGE], vec![0x01]),
            I2cTrans::write(ADDR, vec![reg::ACC_RANGE, 0x02]),
            I2cTrans::write_read(
                ADDR,
                vec![reg::DATA_8],
                vec![0x00, 0x10, 0x00, 0x00, 0x00, 0x00],
            ),
        ]);
        dev.set_acc_range(AccRange::G8).unwrap();
        assert_eq!(dev.acc_range(), AccRange::G8);
        // 256 counts at ±8g is 1g
        assert_eq!(dev.acceleration().unwrap()[0], 1.0);
        finish(dev);
    }

    #[test]
    fn test_output_data_rate_preserves_other_bits() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0xA8]),
            I2cTrans::write(ADDR, vec![reg::ACC_CONF, 0xA5]),
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0xA5]),
        ]);
        dev.set_output_data_rate(OutputDataRate::Hz12_5).unwrap();
        assert_eq!(dev.output_data_rate().unwrap(), OutputDataRate::Hz12_5);
        finish(dev);
    }

    #[test]
    fn test_reserved_odr_code_is_error() {
        let mut dev = device(vec![I2cTrans::write_read(
            ADDR,
            vec![reg::ACC_CONF],
            vec![0xAF],
        )]);
        match dev.output_data_rate() {
            Err(Error::InvalidRegisterValue {
                register: reg::ACC_CONF,
                value: 0x0F,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        finish(dev);
    }

    #[test]
    fn test_oversample_rate() {
        // averaging mode (perf bit clear), 100 Hz
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0x28]),
            I2cTrans::write(ADDR, vec![reg::ACC_CONF, 0x58]),
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0x58]),
        ]);
        dev.set_oversample_rate(OversampleRate::Avg32).unwrap();
        assert_eq!(dev.oversample_rate().unwrap(), OversampleRate::Avg32);
        finish(dev);
    }

    #[test]
    fn test_averaging_oversample_rejected_in_continuous_mode() {
        // power-on ACC_CONF: continuous, normal, 100 Hz; no write follows
        let mut dev = device(vec![I2cTrans::write_read(
            ADDR,
            vec![reg::ACC_CONF],
            vec![0xA8],
        )]);
        match dev.set_oversample_rate(OversampleRate::Avg32) {
            Err(Error::UnsupportedOversampleRate {
                osr: OversampleRate::Avg32,
                mode: PerformanceMode::Continuous,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        finish(dev);
    }

    #[test]
    fn test_reserved_oversample_code_is_error() {
        // continuous mode with bwp = 5
        let mut dev = device(vec![I2cTrans::write_read(
            ADDR,
            vec![reg::ACC_CONF],
            vec![0xD8],
        )]);
        match dev.oversample_rate() {
            Err(Error::InvalidRegisterValue {
                register: reg::ACC_CONF,
                value: 0x05,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        finish(dev);
    }

    #[test]
    fn test_continuous_mode_rejected_with_averaging_oversample() {
        let mut dev = device(vec![I2cTrans::write_read(
            ADDR,
            vec![reg::ACC_CONF],
            vec![0x58],
        )]);
        assert!(matches!(
            dev.set_performance_mode(PerformanceMode::Continuous),
            Err(Error::UnsupportedOversampleRate { .. })
        ));
        finish(dev);
    }

    #[test]
    fn test_performance_mode() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0xA8]),
            I2cTrans::write(ADDR, vec![reg::ACC_CONF, 0x28]),
            I2cTrans::write_read(ADDR, vec![reg::ACC_CONF], vec![0x28]),
        ]);
        dev.set_performance_mode(PerformanceMode::Averaging).unwrap();
        assert_eq!(dev.performance_mode().unwrap(), PerformanceMode::Averaging);
        finish(dev);
    }

    #[test]
    fn test_configure_single_acc_conf_write() {
        let mut dev = device(vec![
            I2cTrans::write(ADDR, vec![reg::ACC_CONF, 0x56]),
            I2cTrans::write_read(ADDR, vec![reg::ACC_RANGE], vec![0x01]),
            I2cTrans::write(ADDR, vec![reg::ACC_RANGE, 0x00]),
        ]);
        let config = AccelConfig {
            acc_range: AccRange::G2,
            output_data_rate: OutputDataRate::Hz25,
            oversample_rate: OversampleRate::Avg32,
            performance_mode: PerformanceMode::Averaging,
        };
        dev.configure(&config).unwrap();
        assert_eq!(dev.acc_range(), AccRange::G2);
        finish(dev);
    }

    #[test]
    fn test_configure_rejects_reserved_combination() {
        // nothing reaches the bus
        let mut dev = device(vec![]);
        let config = AccelConfig {
            oversample_rate: OversampleRate::Avg128,
            performance_mode: PerformanceMode::Continuous,
            ..AccelConfig::default()
        };
        match dev.configure(&config) {
            Err(Error::UnsupportedOversampleRate {
                osr: OversampleRate::Avg128,
                mode: PerformanceMode::Continuous,
            }) => {}
            other => panic!("unexpected result: {:?}", other),
        }
        finish(dev);
    }

    #[test]
    fn test_temperature() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::TEMPERATURE], vec![0x02]),
            I2cTrans::write_read(ADDR, vec![reg::TEMPERATURE], vec![0xFB]),
            I2cTrans::write_read(ADDR, vec![reg::TEMPERATURE], vec![0x80]),
        ]);
        assert_eq!(dev.temperature().unwrap(), Some(25.0));
        assert_eq!(dev.temperature().unwrap(), Some(18.0));
        assert_eq!(dev.temperature().unwrap(), None);
        finish(dev);
    }

    #[test]
    fn test_status_and_sensor_time() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::STATUS], vec![0x90]),
            I2cTrans::write_read(ADDR, vec![reg::SENSORTIME_0], vec![0x00, 0x00, 0x01]),
        ]);
        assert!(dev.data_ready().unwrap());
        assert_eq!(dev.sensor_time().unwrap(), 0x01_0000);
        finish(dev);
    }

    #[test]
    fn test_sensor_time_seconds_scaling() {
        // 25600 ticks of 39.0625 µs is exactly one second
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::SENSORTIME_0], vec![0x00, 0x64, 0x00]),
            I2cTrans::write_read(ADDR, vec![reg::SENSORTIME_0], vec![0xFF, 0xFF, 0xFF]),
        ]);
        assert!((dev.sensor_time_seconds().unwrap() - 1.0).abs() < 1e-9);
        let wrap = dev.sensor_time_seconds().unwrap();
        assert!((wrap - 655.359_960_937_5).abs() < 1e-9);
        finish(dev);
    }

    #[test]
    fn test_soft_reset_reenables() {
        let mut dev = device(vec![
            I2cTrans::write(ADDR, vec![reg::CMD, reg::CMD_SOFT_RESET]),
            I2cTrans::write_read(ADDR, vec![reg::PWR_CTRL], vec![0x00]),
            I2cTrans::write(ADDR, vec![reg::PWR_CTRL, 0x04]),
        ]);
        dev.soft_reset().unwrap();
        assert_eq!(dev.acc_range(), AccRange::G4);
        finish(dev);
    }

    #[test]
    fn test_shutdown_clears_acc_en() {
        let mut dev = device(vec![
            I2cTrans::write_read(ADDR, vec![reg::PWR_CTRL], vec![0x04]),
            I2cTrans::write(ADDR, vec![reg::PWR_CTRL, 0x00]),
        ]);
        AccelDriver::shutdown(&mut dev).unwrap();
        finish(dev);
    }
}
