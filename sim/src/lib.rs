//! Emulated ADV7482 used to exercise the driver without hardware.

/// Register file, bank mapping and signal inputs.
pub mod chip;
/// Dumping and fingerprinting register state.
pub mod snapshot;

pub use chip::{EmulatedChip, HdmiSignal, SimDelay};
pub use snapshot::Snapshot;

use adv7482_core::Adv7482;
use adv7482_core::config::DriverConfig;

/// Probe a driver against a fresh emulated chip at the configured IO address.
///
/// The returned chip handle shares state with the one the driver owns.
pub fn probe(cfg: DriverConfig) -> adv7482_core::Result<(Adv7482<EmulatedChip, SimDelay>, EmulatedChip)> {
    let chip = EmulatedChip::new(cfg.io_addr);
    let dev = Adv7482::probe(chip.clone(), SimDelay::default(), cfg)?;
    Ok((dev, chip))
}

impl Snapshot {
    /// Capture the state of `chip`.
    pub fn of(chip: &EmulatedChip) -> Self {
        Snapshot::capture(&chip.lock())
    }
}
