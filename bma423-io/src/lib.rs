//! BMA423-IO - Bosch BMA423 accelerometer driver and sampling toolkit
//!
//! This library provides a register-level driver for the BMA423 (as found
//! in the LilyGo T-Watch), a simulated device for hardware-free testing,
//! and a background sampler used by the `bma423-io` daemon.
//!
//! ## Features
//!
//! - `linux` (default): open real sensors through `/dev/i2c-N`

pub mod config;
pub mod devices;
pub mod drivers;
pub mod error;
pub mod interface;
pub mod registers;
pub mod sampler;
pub mod settings;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use devices::mock::SimulatedBma423;
pub use devices::{Device, create_device};
pub use drivers::{AccelDriver, Bma423};
pub use error::{Error, Result};
pub use settings::SlaveAddr;
