//! Device drivers

pub mod accel;
pub mod bma423;

pub use accel::AccelDriver;
pub use bma423::Bma423;
