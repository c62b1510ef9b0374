/// Two-wire bus access and the chip's register bank map.
pub mod bus;
/// Register scripts and the interpreter that replays them.
pub mod script;
/// Register addresses and field values.
pub mod regs;

/// Bring-up and power sequencing.
pub mod sequencer;
/// Video input detection.
pub mod detect;
/// Picture adjustment controls.
pub mod ctrl;

/// Analog video standards.
pub mod standard;
/// Digital video timings.
pub mod timings;
/// Media bus formats.
pub mod format;

/// Static link description.
pub mod link;
/// Per-instance driver configuration.
pub mod config;
pub mod error;

/// The device itself.
pub mod dev;

pub use dev::Adv7482;
pub use error::{BusError, Error, Result};
