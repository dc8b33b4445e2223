//! Common data types

pub mod sample;

pub use sample::*;
