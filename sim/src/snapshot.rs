use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use bincode::{config, Decode, Encode};
use log::debug;
use strum::IntoEnumIterator;

use adv7482_core::bus::bank::Bank;

use crate::chip::ChipState;

/// Registers and binding of one bank.
#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct BankImage {
    pub name: String,
    pub addr: Option<u8>,
    pub regs: Vec<u8>,
}

/// Serializable copy of the emulated register state.
///
/// Signal inputs and the transfer log are not part of it.
#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct Snapshot {
    pub io_addr: u8,
    pub banks: Vec<BankImage>,
}

impl Snapshot {
    pub fn capture(st: &ChipState) -> Self {
        let banks = Bank::iter().map(|b| BankImage {
            name: b.to_string(),
            addr: st.addr[b as usize],
            regs: st.regs[b as usize].to_vec(),
        }).collect();
        Snapshot { io_addr: st.io_addr, banks }
    }

    /// Write this snapshot back into `st`.
    pub fn restore(&self, st: &mut ChipState) -> anyhow::Result<()> {
        if self.banks.len() != st.regs.len() {
            bail!("snapshot has {} banks, expected {}", self.banks.len(), st.regs.len());
        }
        for (b, img) in Bank::iter().zip(&self.banks) {
            if img.name != b.to_string() || img.regs.len() != 256 {
                bail!("snapshot bank {} does not fit {b}", img.name);
            }
            st.regs[b as usize].copy_from_slice(&img.regs);
            st.addr[b as usize] = img.addr;
        }
        st.io_addr = self.io_addr;
        Ok(())
    }

    /// CRC32 over the encoded snapshot.
    pub fn fingerprint(&self) -> anyhow::Result<u32> {
        let bytes = bincode::encode_to_vec(self, config::standard())?;
        Ok(crc32fast::hash(&bytes))
    }

    pub fn to_file(&self, path: &impl AsRef<Path>) -> anyhow::Result<()> {
        use std::io::BufWriter;
        use lz4_flex::frame::*;
        let path = path.as_ref();
        let bytes = bincode::encode_to_vec(self, config::standard())?;
        let mut file = std::fs::File::create(path)
            .context(format!("Snapshot: Couldn't create dump file: {}", path.to_string_lossy()))?;
        let mut writer = BufWriter::new(&mut file);
        let mut encoder = FrameEncoder::new(&mut writer);
        encoder.write_all(&bytes)?;
        encoder.finish()?;
        drop(writer);
        file.flush()?;
        debug!(target: "SIM", "dumped {} bytes of register state to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn from_file(path: &impl AsRef<Path>) -> anyhow::Result<Self> {
        use lz4_flex::frame::*;
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .context(format!("Snapshot: Couldn't open dump file: {}", path.to_string_lossy()))?;
        let mut bytes: Vec<u8> = Vec::new();
        FrameDecoder::new(file).read_to_end(&mut bytes)?;
        let (res, _): (Snapshot, usize) = bincode::decode_from_slice(&bytes, config::standard())?;
        debug!(target: "SIM", "loaded snapshot of {} banks from {}", res.banks.len(), path.display());
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip::EmulatedChip;
    use adv7482_core::bus::I2cBus;

    #[test]
    fn file_round_trip_restores_bindings() {
        let mut chip = EmulatedChip::new(0x70);
        chip.write(0x70, &[0xF4, 0x44]).unwrap();
        chip.write(0x22, &[0x3C, 0x10]).unwrap();
        let snap = Snapshot::capture(&chip.lock());

        let path = std::env::temp_dir().join(format!("adv7482-snap-{}.bin", std::process::id()));
        snap.to_file(&path).unwrap();
        let loaded = Snapshot::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, snap);

        let fresh = EmulatedChip::new(0x70);
        loaded.restore(&mut fresh.lock()).unwrap();
        assert_eq!(fresh.lock().peek(Bank::Cp, 0x3C), 0x10);
        assert_eq!(Snapshot::capture(&fresh.lock()).fingerprint().unwrap(), snap.fingerprint().unwrap());
    }

    #[test]
    fn fingerprint_tracks_register_changes() {
        let mut chip = EmulatedChip::new(0x70);
        let before = Snapshot::capture(&chip.lock()).fingerprint().unwrap();
        chip.write(0x70, &[0x0C, 0xE0]).unwrap();
        let after = Snapshot::capture(&chip.lock()).fingerprint().unwrap();
        assert_ne!(before, after);
    }
}
