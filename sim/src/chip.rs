use std::sync::Arc;
use std::thread::ThreadId;

use log::{debug, trace, warn};
use parking_lot::{Mutex, MutexGuard};
use strum::{EnumCount, IntoEnumIterator};

use adv7482_core::bus::I2cBus;
use adv7482_core::bus::bank::Bank;
use adv7482_core::error::BusError;
use adv7482_core::regs::{hdmi, io, sdp};

/// Revision reported in IO 0xDF/0xE0.
pub const REVISION: (u8, u8) = (0x01, 0x20);

/// One transfer seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub thread: ThreadId,
    pub addr: u8,
    pub reg: u8,
    /// `Some` for a write, `None` for a read.
    pub val: Option<u8>,
}

/// Signal presented to the HDMI receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HdmiSignal {
    pub width: u32,
    pub height: u32,
    pub progressive: bool,
}

impl std::str::FromStr for HdmiSignal {
    type Err = anyhow::Error;

    /// Parses `WIDTHxHEIGHT` followed by `p` or `i`, e.g. `1920x1080i`.
    fn from_str(s: &str) -> anyhow::Result<Self> {
        let progressive = match s.chars().last() {
            Some('p') => true,
            Some('i') => false,
            _ => anyhow::bail!("signal '{s}' must end in 'p' or 'i'"),
        };
        let (w, h) = s[..s.len() - 1].split_once('x')
            .ok_or_else(|| anyhow::anyhow!("signal '{s}' is not WIDTHxHEIGHT"))?;
        Ok(HdmiSignal { width: w.parse()?, height: h.parse()?, progressive })
    }
}

/// Register state of the emulated chip.
pub struct ChipState {
    pub io_addr: u8,
    /// Register file per bank, indexed by `Bank as usize`.
    pub regs: [[u8; 256]; Bank::COUNT],
    /// Bus address each bank currently answers on.
    pub addr: [Option<u8>; Bank::COUNT],
    /// Lock and standard bits reported in the SDP read-only map.
    pub sdp_status: u8,
    pub hdmi: Option<HdmiSignal>,
    /// Pending interrupt bits in IO 0x8A.
    pub irq: u8,

    /// Every completed transfer, in bus order.
    pub log: Vec<Transfer>,
    /// Number of transfers attempted so far, failed ones included.
    pub xfers: usize,
    /// Refuse the transfer with this index.
    pub fail_at: Option<usize>,
}

impl ChipState {
    fn new(io_addr: u8) -> Self {
        let mut res = ChipState {
            io_addr,
            regs: [[0; 256]; Bank::COUNT],
            addr: [None; Bank::COUNT],
            sdp_status: 0,
            hdmi: None,
            irq: 0,
            log: Vec::new(),
            xfers: 0,
            fail_at: None,
        };
        res.reset();
        res
    }

    /// Soft reset: registers back to zero and every bank except IO unmapped.
    pub fn reset(&mut self) {
        self.regs = [[0; 256]; Bank::COUNT];
        self.addr = [None; Bank::COUNT];
        self.addr[Bank::Io as usize] = Some(self.io_addr);
        let io_regs = &mut self.regs[Bank::Io as usize];
        io_regs[io::RD_INFO1 as usize] = REVISION.0;
        io_regs[io::RD_INFO2 as usize] = REVISION.1;
    }

    fn bank_at(&self, addr: u8) -> Option<Bank> {
        Bank::iter().find(|b| self.addr[*b as usize] == Some(addr))
    }

    /// True when the SDP read-only map is selected.
    fn sdp_ro_selected(&self) -> bool {
        self.regs[Bank::Sdp as usize][sdp::REG_CTRL as usize] == sdp::RO_MAIN_MAP
    }

    fn hdmi_status(&self, reg: u8) -> u8 {
        let Some(sig) = self.hdmi else { return 0 };
        let field_height = if sig.progressive { sig.height } else { sig.height / 2 };
        match reg {
            hdmi::STATUS1 => hdmi::VF_LOCKED | hdmi::DERF_LOCKED
                | ((sig.width >> 8) as u8 & hdmi::LWIDTH_MSBS_MASK),
            hdmi::LWIDTH => sig.width as u8,
            hdmi::F0HEIGHT_MSBS => (field_height >> 8) as u8 & hdmi::F0HEIGHT_MSBS_MASK,
            hdmi::F0HEIGHT_LSBS => field_height as u8,
            hdmi::STATUS2 => if sig.progressive { 0 } else { hdmi::INTERLACED },
            _ => 0,
        }
    }

    fn read_handler(&self, bank: Bank, reg: u8) -> u8 {
        match (bank, reg) {
            (Bank::Hdmi, hdmi::STATUS1..=hdmi::STATUS2) => self.hdmi_status(reg),
            (Bank::Io, io::INT_STATUS) => self.irq,
            (Bank::Sdp, sdp::STATUS10) if self.sdp_ro_selected() => self.sdp_status,
            (Bank::Sdp, r) if self.sdp_ro_selected() && r != sdp::REG_CTRL => 0,
            _ => self.regs[bank as usize][reg as usize],
        }
    }

    fn write_handler(&mut self, bank: Bank, reg: u8, val: u8) {
        match (bank, reg) {
            (Bank::Io, io::SW_RESET) if val == io::SW_RESET_VALUE => {
                debug!(target: "SIM", "soft reset");
                self.reset();
                return;
            },
            (Bank::Io, r) => {
                if let Some(target) = Bank::from_remap_reg(r) {
                    let addr = val >> 1;
                    if let Some(other) = self.bank_at(addr) {
                        warn!(target: "SIM", "{target} remapped onto {other} at {addr:02x}");
                    }
                    debug!(target: "SIM", "{target} now at {addr:02x}");
                    self.addr[target as usize] = Some(addr);
                }
            },
            (Bank::Sdp, r) if self.sdp_ro_selected() && r != sdp::REG_CTRL => {
                trace!(target: "SIM", "write to SDP read-only map {r:02x} dropped");
                return;
            },
            _ => {},
        }
        self.regs[bank as usize][reg as usize] = val;
    }

    /// Account for a transfer and find the bank it addresses.
    fn begin(&mut self, addr: u8) -> Result<Bank, BusError> {
        let idx = self.xfers;
        self.xfers += 1;
        if self.fail_at == Some(idx) {
            debug!(target: "SIM", "injected failure on transfer {idx}");
            return Err(BusError::Nack { addr });
        }
        self.bank_at(addr).ok_or(BusError::Nack { addr })
    }

    fn record(&mut self, addr: u8, reg: u8, val: Option<u8>) {
        let thread = std::thread::current().id();
        self.log.push(Transfer { thread, addr, reg, val });
    }

    /// Value of a register as stored, bypassing read side effects.
    pub fn peek(&self, bank: Bank, reg: u8) -> u8 {
        self.regs[bank as usize][reg as usize]
    }

    /// Writes in the log as (address, register, value).
    pub fn writes(&self) -> Vec<(u8, u8, u8)> {
        self.log.iter().filter_map(|t| t.val.map(|v| (t.addr, t.reg, v))).collect()
    }
}

/// An emulated ADV7482 on an emulated adapter.
///
/// Clones share the same chip, so a test can keep one while the driver owns another.
#[derive(Clone)]
pub struct EmulatedChip {
    state: Arc<Mutex<ChipState>>,
    byte_data: bool,
}

impl EmulatedChip {
    pub fn new(io_addr: u8) -> Self {
        EmulatedChip {
            state: Arc::new(Mutex::new(ChipState::new(io_addr))),
            byte_data: true,
        }
    }

    /// An adapter without byte-data transfer support.
    pub fn without_byte_data(mut self) -> Self {
        self.byte_data = false;
        self
    }

    pub fn lock(&self) -> MutexGuard<'_, ChipState> {
        self.state.lock()
    }

    pub fn set_hdmi_signal(&self, sig: Option<HdmiSignal>) {
        self.lock().hdmi = sig;
    }

    /// Set the raw value of SDP status register 0x10.
    pub fn set_sdp_status(&self, status10: u8) {
        self.lock().sdp_status = status10;
    }

    /// Raise interrupt bits in IO 0x8A.
    pub fn raise_irq(&self, bits: u8) {
        self.lock().irq |= bits;
    }

    /// Fail the `n`-th transfer from now.
    pub fn fail_in(&self, n: usize) {
        let mut st = self.lock();
        st.fail_at = Some(st.xfers + n);
    }

    pub fn clear_log(&self) {
        self.lock().log.clear();
    }
}

impl I2cBus for EmulatedChip {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        let mut st = self.state.lock();
        let bank = st.begin(addr)?;
        let [reg, val] = bytes else {
            return Err(BusError::Other(format!("unexpected {}-byte write", bytes.len())));
        };
        st.write_handler(bank, *reg, *val);
        st.record(addr, *reg, Some(*val));
        Ok(())
    }

    fn write_read(&mut self, addr: u8, bytes: &[u8], buf: &mut [u8]) -> Result<(), BusError> {
        let mut st = self.state.lock();
        let bank = st.begin(addr)?;
        let (&[reg], [out]) = (bytes, buf) else {
            return Err(BusError::Other("only single register reads are supported".to_string()));
        };
        *out = st.read_handler(bank, reg);
        st.record(addr, reg, None);
        Ok(())
    }

    fn supports_byte_data(&self) -> bool {
        self.byte_data
    }
}

/// [adv7482_core::bus::Delay] that only keeps count.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimDelay {
    pub total_ms: u64,
}

impl adv7482_core::bus::Delay for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_io_answers_after_reset() {
        let mut chip = EmulatedChip::new(0x70);
        assert_eq!(chip.write(0x79, &[0x0E, 0x01]), Err(BusError::Nack { addr: 0x79 }));
        chip.write(0x70, &[0xFB, 0xF2]).unwrap();
        chip.write(0x79, &[0x0E, 0x01]).unwrap();
        assert_eq!(chip.lock().writes(), vec![(0x70, 0xFB, 0xF2), (0x79, 0x0E, 0x01)]);
    }

    #[test]
    fn sdp_status_only_in_read_only_map() {
        let mut chip = EmulatedChip::new(0x70);
        chip.write(0x70, &[0xFB, 0xF2]).unwrap();
        chip.set_sdp_status(0x41);
        let mut buf = [0];
        chip.write_read(0x79, &[0x10], &mut buf).unwrap();
        assert_eq!(buf[0], 0);
        chip.write(0x79, &[0x0E, 0x01]).unwrap();
        chip.write_read(0x79, &[0x10], &mut buf).unwrap();
        assert_eq!(buf[0], 0x41);
    }

    #[test]
    fn hdmi_status_encoding() {
        let mut chip = EmulatedChip::new(0x70);
        chip.write(0x70, &[0xF5, 0x68]).unwrap();
        chip.set_hdmi_signal(Some("1920x1080i".parse().unwrap()));
        let mut read = |reg| {
            let mut buf = [0];
            chip.write_read(0x34, &[reg], &mut buf).unwrap();
            buf[0]
        };
        assert_eq!(read(0x07), 0xA7);
        assert_eq!(read(0x08), 0x80);
        assert_eq!((read(0x09), read(0x0A)), (0x02, 0x1C));
        assert_eq!(read(0x0B), 0x20);
    }

    #[test]
    fn injected_failure_is_not_logged() {
        let mut chip = EmulatedChip::new(0x70);
        chip.fail_in(1);
        chip.write(0x70, &[0x00, 0x01]).unwrap();
        assert!(chip.write(0x70, &[0x00, 0x02]).is_err());
        chip.write(0x70, &[0x00, 0x03]).unwrap();
        assert_eq!(chip.lock().writes().len(), 2);
        assert_eq!(chip.lock().peek(Bank::Io, 0x00), 0x03);
    }

    #[test]
    fn signal_parsing() {
        assert_eq!("720x576p".parse::<HdmiSignal>().unwrap(), HdmiSignal { width: 720, height: 576, progressive: true });
        assert!("720x576".parse::<HdmiSignal>().is_err());
        assert!("axbp".parse::<HdmiSignal>().is_err());
    }
}
