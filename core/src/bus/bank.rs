use log::warn;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Logical register banks presented by the chip.
///
/// Each bank answers on its own 7-bit bus address. Only [Bank::Io] is
/// reachable out of reset; the others are bound by writing their address
/// (shifted left by one) to the matching IO remap register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[repr(usize)]
pub enum Bank {
    #[strum(serialize = "IO")]
    Io,
    #[strum(serialize = "DPLL")]
    Dpll,
    #[strum(serialize = "CP")]
    Cp,
    #[strum(serialize = "HDMI")]
    Hdmi,
    #[strum(serialize = "EDID")]
    Edid,
    #[strum(serialize = "REPEATER")]
    Repeater,
    #[strum(serialize = "INFOFRAME")]
    Infoframe,
    #[strum(serialize = "CEC")]
    Cec,
    #[strum(serialize = "SDP")]
    Sdp,
    #[strum(serialize = "TXB")]
    Txb,
    #[strum(serialize = "TXA")]
    Txa,
}

impl Bank {
    /// Address the bank answers on with the recommended board layout.
    pub const fn default_addr(self) -> u8 {
        use Bank::*;
        match self {
            Io        => 0x70,
            Dpll      => 0x26,
            Cp        => 0x22,
            Hdmi      => 0x34,
            Edid      => 0x36,
            Repeater  => 0x32,
            Infoframe => 0x31,
            Cec       => 0x41,
            Sdp       => 0x79,
            Txb       => 0x48,
            Txa       => 0x4A,
        }
    }

    /// IO register which holds this bank's bus address, if it is remappable.
    pub const fn remap_reg(self) -> Option<u8> {
        use Bank::*;
        match self {
            Io        => None,
            Dpll      => Some(0xF3),
            Cp        => Some(0xF4),
            Hdmi      => Some(0xF5),
            Edid      => Some(0xF6),
            Repeater  => Some(0xF7),
            Infoframe => Some(0xF8),
            Cec       => Some(0xFA),
            Sdp       => Some(0xFB),
            Txb       => Some(0xFC),
            Txa       => Some(0xFD),
        }
    }

    /// Reverse lookup of [Bank::remap_reg].
    pub fn from_remap_reg(reg: u8) -> Option<Self> {
        Bank::iter().find(|b| b.remap_reg() == Some(reg))
    }
}

/// Runtime binding of logical banks to bus addresses.
///
/// The table mirrors what has been written to the chip's remap registers.
/// Only the IO bank is bound after a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankAddressTable {
    addr: [Option<u8>; Bank::COUNT],
}
impl BankAddressTable {
    pub fn new(io_addr: u8) -> Self {
        let mut addr = [None; Bank::COUNT];
        addr[Bank::Io as usize] = Some(io_addr);
        BankAddressTable { addr }
    }

    pub fn bind(&mut self, bank: Bank, addr: u8) {
        self.addr[bank as usize] = Some(addr);
    }

    /// Forget every binding except IO, as the chip does on a soft reset.
    pub fn reset(&mut self) {
        let io = self.addr[Bank::Io as usize];
        self.addr = [None; Bank::COUNT];
        self.addr[Bank::Io as usize] = io;
    }

    pub fn get(&self, bank: Bank) -> Option<u8> {
        self.addr[bank as usize]
    }

    pub fn is_bound(&self, bank: Bank) -> bool {
        self.addr[bank as usize].is_some()
    }

    /// Address to use for a transaction on `bank`.
    ///
    /// An unbound bank falls back to its default address. The chip will
    /// usually not answer there, so this is reported loudly.
    pub fn resolve(&self, bank: Bank) -> u8 {
        match self.addr[bank as usize] {
            Some(addr) => addr,
            None => {
                warn!(target: "BANK", "{bank} addressed before being bound, using {:#04x}",
                    bank.default_addr());
                bank.default_addr()
            },
        }
    }

    /// Track an IO register write, updating bindings if it hits a remap register.
    ///
    /// Returns the bank that was (re)bound, if any.
    pub fn observe_io_write(&mut self, reg: u8, val: u8) -> Option<Bank> {
        let bank = Bank::from_remap_reg(reg)?;
        self.bind(bank, val >> 1);
        Some(bank)
    }
}
