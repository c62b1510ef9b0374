pub mod bank;

use std::time::Duration;

use log::{debug, trace};

use crate::bus::bank::*;
use crate::error::BusError;
use crate::regs::io;

/// Interface to the two-wire adapter the chip hangs off of.
///
/// All transfers use 7-bit addresses. `write_read` must issue a repeated
/// start between the two halves.
pub trait I2cBus {
    /// Write `bytes` to the device at `addr`.
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError>;
    /// Write `bytes`, then read `buf.len()` bytes back from the same device.
    fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<(), BusError>;
    /// True when the adapter can perform single byte-data transfers.
    fn supports_byte_data(&self) -> bool { true }
}

/// Blocking millisecond delay.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// [Delay] backed by [std::thread::sleep].
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;
impl Delay for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}

/// Bank-aware access to the chip.
///
/// Owns the adapter, the delay source and the current bank bindings. The
/// bindings are updated by watching writes to the IO remap registers, so
/// running the remap script through here is enough to bind every bank.
pub struct BankedBus<B: I2cBus, D: Delay> {
    pub bus: B,
    pub delay: D,
    pub banks: BankAddressTable,
}
impl<B: I2cBus, D: Delay> BankedBus<B, D> {
    pub fn new(bus: B, delay: D, io_addr: u8) -> Self {
        BankedBus { bus, delay, banks: BankAddressTable::new(io_addr) }
    }

    /// Write a single register.
    pub fn write_register(&mut self, bank: Bank, reg: u8, val: u8) -> Result<(), BusError> {
        let addr = self.banks.resolve(bank);
        trace!(target: "BUS", "{bank} [{addr:02x}] w {reg:02x} <- {val:02x}");
        self.bus.write(addr, &[reg, val])?;

        if bank == Bank::Io {
            if reg == io::SW_RESET && val == io::SW_RESET_VALUE {
                debug!(target: "BUS", "soft reset, dropping bank bindings");
                self.banks.reset();
            } else if let Some(b) = self.banks.observe_io_write(reg, val) {
                debug!(target: "BUS", "{b} bound to {:02x}", val >> 1);
            }
        }
        Ok(())
    }

    /// Read a single register.
    pub fn read_register(&mut self, bank: Bank, reg: u8) -> Result<u8, BusError> {
        let addr = self.banks.resolve(bank);
        let mut buf = [0u8; 1];
        self.bus.write_read(addr, &[reg], &mut buf)?;
        trace!(target: "BUS", "{bank} [{addr:02x}] r {reg:02x} -> {:02x}", buf[0]);
        Ok(buf[0])
    }

    /// Read-modify-write, setting the bits in `mask`.
    pub fn set_bits(&mut self, bank: Bank, reg: u8, mask: u8) -> Result<(), BusError> {
        let val = self.read_register(bank, reg)?;
        self.write_register(bank, reg, val | mask)
    }

    pub fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Recording adapter for unit tests.
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Xfer {
        Write(u8, Vec<u8>),
        Read(u8, u8),
    }

    #[derive(Default)]
    pub struct MockBus {
        pub log: Vec<Xfer>,
        /// Values returned for reads, keyed on (address, register).
        pub regs: HashMap<(u8, u8), u8>,
        /// Fail the transfer with this index.
        pub fail_at: Option<usize>,
    }
    impl MockBus {
        fn check(&mut self, addr: u8) -> Result<(), BusError> {
            if self.fail_at == Some(self.log.len()) {
                return Err(BusError::Nack { addr });
            }
            Ok(())
        }
        pub fn writes(&self) -> Vec<(u8, u8, u8)> {
            self.log.iter().filter_map(|x| match x {
                Xfer::Write(a, b) => Some((*a, b[0], b[1])),
                _ => None,
            }).collect()
        }
    }
    impl I2cBus for MockBus {
        fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
            self.check(addr)?;
            self.log.push(Xfer::Write(addr, bytes.to_vec()));
            Ok(())
        }
        fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<(), BusError> {
            self.check(addr)?;
            self.log.push(Xfer::Read(addr, bytes[0]));
            buf[0] = *self.regs.get(&(addr, bytes[0])).unwrap_or(&0);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct MockDelay {
        pub waits: Vec<u32>,
    }
    impl Delay for MockDelay {
        fn delay_ms(&mut self, ms: u32) { self.waits.push(ms); }
    }

    pub fn banked() -> BankedBus<MockBus, MockDelay> {
        BankedBus::new(MockBus::default(), MockDelay::default(), Bank::Io.default_addr())
    }
}
