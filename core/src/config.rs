use std::time::Duration;

use log::LevelFilter;

use crate::bus::bank::Bank;
use crate::error::Result;
use crate::link::LinkConfig;

/// Per-instance driver configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// 7-bit address of the IO bank.
    pub io_addr: u8,
    pub link: LinkConfig,
    /// Verbosity, 0 to 3.
    pub debug: u8,
    /// How long an operation waits for the device lock before giving up.
    pub lock_timeout: Duration,
    /// Replace the input with the internal color bar generator.
    pub color_bars: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            io_addr: Bank::Io.default_addr(),
            link: LinkConfig::default(),
            debug: 0,
            lock_timeout: Duration::from_millis(500),
            color_bars: false,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        self.link.validate()
    }

    /// Log level matching [DriverConfig::debug].
    pub fn log_level(&self) -> LevelFilter {
        match self.debug {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
