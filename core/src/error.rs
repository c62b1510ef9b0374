use crate::bus::bank::Bank;
use crate::ctrl::ControlId;

/// Failure reported by the underlying two-wire adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("no adapter bound to this device")]
    NoDevice,
    #[error("no acknowledgment from address {addr:#04x}")]
    Nack { addr: u8 },
    #[error("arbitration lost on address {addr:#04x}")]
    ArbitrationLost { addr: u8 },
    #[error("adapter does not support byte-data transfers")]
    Unsupported,
    #[error("adapter error: {0}")]
    Other(String),
}

/// Errors returned by driver operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Bus(#[from] BusError),

    /// A script entry failed; nothing after `offset` was executed.
    #[error("script entry {offset} ({bank} reg {reg:#04x}) failed: {source}")]
    Script {
        offset: usize,
        bank: Bank,
        reg: u8,
        #[source]
        source: BusError,
    },

    #[error("{ctrl} value {val} outside [{min}, {max}]")]
    Range { ctrl: ControlId, val: i32, min: i32, max: i32 },

    #[error("timings outside of the supported envelope")]
    TimingsOutOfRange,

    #[error("unsupported resolution {width}x{height}{}", scan_char(.progressive))]
    UnsupportedFormat { width: u32, height: u32, progressive: bool },

    /// Status registers report lock but a zero-sized frame.
    #[error("inconsistent video status ({width}x{height})")]
    InconsistentStatus { width: u32, height: u32 },

    #[error("invalid argument: {0}")]
    Invalid(&'static str),

    #[error("interrupted while waiting for the device lock")]
    Interrupted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

fn scan_char(progressive: &bool) -> char {
    if *progressive { 'p' } else { 'i' }
}

pub type Result<T> = std::result::Result<T, Error>;
