pub mod edid;
pub mod tables;

use log::{debug, error};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::error::{Error, Result};

/// One entry of a register script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOp {
    /// Write `val` to `reg` in `bank`.
    Write { bank: Bank, reg: u8, val: u8 },
    /// Block for the given number of milliseconds.
    Wait(u32),
    /// Marks the end of the script.
    End,
}
impl RegisterOp {
    pub const fn w(bank: Bank, reg: u8, val: u8) -> Self {
        RegisterOp::Write { bank, reg, val }
    }
}

/// An immutable, END-terminated list of register operations.
pub type Script = &'static [RegisterOp];

/// Replay `script` from the start.
///
/// Stops at the first END, or at the first failing write. Nothing after a
/// failing entry is executed and nothing already written is undone.
/// Returns the number of writes performed.
pub fn run_script<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>, name: &str, script: &[RegisterOp])
    -> Result<usize>
{
    let mut writes = 0;
    for (offset, op) in script.iter().enumerate() {
        match *op {
            RegisterOp::Write { bank, reg, val } => {
                if let Err(source) = bus.write_register(bank, reg, val) {
                    error!(target: "SCRIPT", "{name}: entry {offset} ({bank} {reg:02x}={val:02x}) failed: {source}");
                    return Err(Error::Script { offset, bank, reg, source });
                }
                writes += 1;
            },
            RegisterOp::Wait(ms) => bus.delay_ms(ms),
            RegisterOp::End => {
                debug!(target: "SCRIPT", "{name}: {writes} writes");
                return Ok(writes);
            },
        }
    }
    // Every constant table is terminated; a caller-built slice may not be.
    debug!(target: "SCRIPT", "{name}: ran off the end after {writes} writes");
    Ok(writes)
}

/// True when `script` contains exactly one END, as its last entry.
pub fn is_terminated(script: &[RegisterOp]) -> bool {
    let ends = script.iter().filter(|op| **op == RegisterOp::End).count();
    ends == 1 && script.last() == Some(&RegisterOp::End)
}
