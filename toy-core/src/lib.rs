// Clippy rules to disable.
#![allow(clippy::new_without_default)]

pub mod addressing;
pub mod bus;
pub mod constants;
pub mod cpu;
pub mod emulator;
pub mod error;
pub mod flags;
pub mod ops;
pub mod video;

pub use emulator::Emulator;
pub use error::LoadError;
