//! Simulated BMA423 for hardware-free development
//!
//! [`SimulatedBma423`] is an I2C target: it implements
//! [`embedded_hal::i2c::I2c`] on top of a 128-byte register file, so the
//! real driver runs against it unchanged.
//!
//! # Behaviour
//!
//! | Register | Simulation |
//! |----------|------------|
//! | CHIP_ID | constant 0x13 |
//! | STATUS | `drdy_acc` while enabled, `cmd_rdy` always |
//! | DATA_8..13 | regenerated at the start of every read touching them |
//! | SENSORTIME | elapsed host time in 39.0625 µs ticks |
//! | TEMPERATURE | configured temperature, 0x80 while disabled |
//! | ACC_CONF, ACC_RANGE, PWR_CONF, PWR_CTRL | read/write |
//! | CMD | 0xB6 restores power-on values |
//!
//! Writes to any other register are ignored. The register pointer
//! auto-increments across a burst read.
//!
//! # Thread Model
//!
//! Clones share the same register file through `Arc<Mutex<_>>`, so a test
//! can hand one clone to the driver and inspect the device with another.

pub mod config;
mod accel_sim;
mod noise;

use crate::registers as reg;
use crate::settings::{AccRange, OversampleRate, PerformanceMode, SlaveAddr};

use accel_sim::AccelSimulator;
use config::SimulationConfig;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;

const REGISTER_COUNT: usize = 128;

/// Registers accepting writes from the host
const WRITABLE: [u8; 5] = [reg::ACC_CONF, reg::ACC_RANGE, reg::PWR_CONF, reg::PWR_CTRL, reg::CMD];

/// Power-on register values
fn power_on_registers() -> [u8; REGISTER_COUNT] {
    let mut regs = [0u8; REGISTER_COUNT];
    regs[reg::CHIP_ID as usize] = reg::CHIP_ID_VALUE;
    regs[reg::STATUS as usize] = 0x10;
    regs[reg::ACC_CONF as usize] = 0xA8;
    regs[reg::ACC_RANGE as usize] = 0x01;
    regs[reg::PWR_CONF as usize] = 0x03;
    regs[reg::PWR_CTRL as usize] = 0x00;
    regs[reg::TEMPERATURE as usize] = reg::TEMPERATURE_INVALID;
    regs
}

struct SimState {
    regs: [u8; REGISTER_COUNT],
    pointer: u8,
    sim: AccelSimulator,
    temperature_c: f32,
    nack_rate: f32,
    started: Instant,
    transfers: u64,
}

impl SimState {
    fn acc_enabled(&self) -> bool {
        reg::ACC_EN.get(self.regs[reg::PWR_CTRL as usize]) != 0
    }

    fn write(&mut self, register: u8, value: u8) {
        if !WRITABLE.contains(&register) {
            log::trace!("sim: ignoring write to read-only {:#04x}", register);
            return;
        }
        if register == reg::CMD {
            if value == reg::CMD_SOFT_RESET {
                log::debug!("sim: soft reset");
                self.regs = power_on_registers();
            }
            return;
        }
        self.regs[register as usize] = value;
    }

    /// Refresh the volatile registers a read of `len` bytes from `start` will see
    fn refresh(&mut self, start: u8, len: usize) {
        // Bursts past 0x7F wrap to 0x00
        let offset = |r: u8| (r as usize + REGISTER_COUNT - start as usize) % REGISTER_COUNT;
        let touches = |r: u8| offset(r) < len;
        let enabled = self.acc_enabled();

        if touches(reg::STATUS) {
            let drdy = reg::DRDY_ACC.set(0x00, enabled as u8);
            self.regs[reg::STATUS as usize] = reg::CMD_RDY.set(drdy, 1);
        }

        if (reg::DATA_8..=reg::DATA_13).any(touches) {
            let counts = if enabled {
                let conf = self.regs[reg::ACC_CONF as usize];
                let range = AccRange::from_bits(reg::ACC_RANGE_BITS.get(
                    self.regs[reg::ACC_RANGE as usize],
                ))
                .unwrap_or_default();
                let osr = OversampleRate::from_bits(reg::ACC_BWP.get(conf)).unwrap_or_default();
                let mode = PerformanceMode::from_bits(reg::ACC_PERF_MODE.get(conf));
                self.sim.generate(range, osr, mode)
            } else {
                [0; 3]
            };
            for (axis, value) in counts.iter().enumerate() {
                let (lsb, msb) = reg::encode_axis(*value);
                let base = reg::DATA_8 as usize + axis * 2;
                self.regs[base] = lsb;
                self.regs[base + 1] = msb;
            }
        }

        if (reg::SENSORTIME_0..=reg::SENSORTIME_2).any(touches) {
            let ticks = (self.started.elapsed().as_secs_f64() / reg::SENSORTIME_TICK_S) as u32;
            let [b0, b1, b2, _] = (ticks & 0x00FF_FFFF).to_le_bytes();
            self.regs[reg::SENSORTIME_0 as usize] = b0;
            self.regs[reg::SENSORTIME_1 as usize] = b1;
            self.regs[reg::SENSORTIME_2 as usize] = b2;
        }

        if touches(reg::TEMPERATURE) {
            self.regs[reg::TEMPERATURE as usize] = if enabled {
                let offset = (self.temperature_c - reg::TEMPERATURE_OFFSET_C).round();
                // 0x80 is reserved for "invalid"
                offset.clamp(-127.0, 127.0) as i8 as u8
            } else {
                reg::TEMPERATURE_INVALID
            };
        }
    }

    fn read(&mut self, buffer: &mut [u8]) {
        self.refresh(self.pointer, buffer.len());
        for byte in buffer.iter_mut() {
            *byte = self.regs[self.pointer as usize % REGISTER_COUNT];
            self.pointer = self.pointer.wrapping_add(1) % REGISTER_COUNT as u8;
        }
    }
}

/// Simulated BMA423 I2C target
#[derive(Clone)]
pub struct SimulatedBma423 {
    address: u8,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedBma423 {
    pub fn new(address: SlaveAddr, config: &SimulationConfig) -> Self {
        Self::with_address(address.addr(), config)
    }

    pub fn with_address(address: u8, config: &SimulationConfig) -> Self {
        log::info!(
            "Simulated BMA423 at {:#04x} (gravity {:?} g, seed {})",
            address,
            config.gravity,
            config.random_seed
        );
        Self {
            address,
            state: Arc::new(Mutex::new(SimState {
                regs: power_on_registers(),
                pointer: 0,
                sim: AccelSimulator::new(config),
                temperature_c: config.temperature_c,
                nack_rate: config.nack_rate.clamp(0.0, 1.0),
                started: Instant::now(),
                transfers: 0,
            })),
        }
    }

    /// Current raw register value, without side effects
    pub fn register(&self, register: u8) -> u8 {
        self.state.lock().regs[register as usize % REGISTER_COUNT]
    }

    /// Change the acceleration the sensor sees (g)
    pub fn set_gravity(&self, gravity: [f32; 3]) {
        self.state.lock().sim.set_gravity(gravity);
    }

    pub fn set_temperature(&self, temperature_c: f32) {
        self.state.lock().temperature_c = temperature_c;
    }

    /// Probability that a transfer is not acknowledged (0.0-1.0)
    pub fn set_nack_rate(&self, rate: f32) {
        self.state.lock().nack_rate = rate.clamp(0.0, 1.0);
    }

    /// Number of acknowledged bus transactions so far
    pub fn transfers(&self) -> u64 {
        self.state.lock().transfers
    }
}

impl ErrorType for SimulatedBma423 {
    type Error = ErrorKind;
}

impl I2c for SimulatedBma423 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error> {
        if address != self.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut state = self.state.lock();
        let nack_rate = state.nack_rate;
        if state.sim.noise().chance(nack_rate) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        }
        state.transfers += 1;

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let Some((&pointer, data)) = bytes.split_first() else {
                        continue;
                    };
                    state.pointer = pointer % REGISTER_COUNT as u8;
                    for &value in data {
                        let register = state.pointer;
                        state.write(register, value);
                        state.pointer = register.wrapping_add(1) % REGISTER_COUNT as u8;
                    }
                }
                Operation::Read(buffer) => state.read(buffer),
            }
        }
        Ok(())
    }
}
