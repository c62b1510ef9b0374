//! Bring-up and power state machine.

use log::{debug, info, warn};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::config::DriverConfig;
use crate::detect;
use crate::error::{Error, Result};
use crate::link::{InputPath, LinkConfig};
use crate::regs::{io, tx};
use crate::script::run_script;
use crate::script::tables::*;

/// Which input paths have been initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSet {
    Hdmi,
    Composite,
    Both,
    /// Neither path is enabled; only the bank bindings were made.
    Neither,
}

impl PathSet {
    pub fn from_link(link: &LinkConfig) -> Self {
        match (link.hdmi_enabled, link.sdp_enabled) {
            (true, true) => PathSet::Both,
            (true, false) => PathSet::Hdmi,
            (false, true) => PathSet::Composite,
            (false, false) => PathSet::Neither,
        }
    }
}

/// Device lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    Uninitialized,
    Reset,
    AddressBound,
    PathInitialized(PathSet),
    PoweredDown,
    PoweredUp,
    Suspended,
}

/// Chip revision from the IO bank's info registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision(pub u8, pub u8);

impl std::fmt::Display for Revision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02x}{:02x}", self.0, self.1)
    }
}

/// Drives the chip through [InitState].
///
/// Each transition either completes, or fails and leaves the state where it was.
#[derive(Debug, Clone)]
pub struct Sequencer {
    pub state: InitState,
    pub revision: Option<Revision>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Sequencer { state: InitState::Uninitialized, revision: None }
    }
}

impl Sequencer {
    /// Perform the next bring-up transition.
    pub fn step<B: I2cBus, D: Delay>(&mut self, bus: &mut BankedBus<B, D>, cfg: &DriverConfig)
        -> Result<InitState>
    {
        use InitState::*;
        let link = &cfg.link;
        let next = match self.state {
            Uninitialized => {
                if link.sw_reset {
                    run_script(bus, "sw_reset", &SW_RESET)?;
                    let lsb = bus.read_register(Bank::Io, io::RD_INFO1)?;
                    let msb = bus.read_register(Bank::Io, io::RD_INFO2)?;
                    let rev = Revision(lsb, msb);
                    info!(target: "PROBE", "chip revision {rev}");
                    self.revision = Some(rev);
                } else {
                    debug!(target: "PROBE", "soft reset skipped");
                }
                Reset
            },

            Reset => {
                run_script(bus, "set_slave_address", &SET_SLAVE_ADDRESS)?;
                AddressBound
            },

            AddressBound => {
                let set = PathSet::from_link(link);
                for path in link.enabled_paths() {
                    run_script(bus, &format!("init {path}"), path.init_script())?;
                    if cfg.color_bars {
                        run_script(bus, &format!("colorbar {path}"), path.colorbar_script())?;
                    }
                    run_script(bus, &format!("power_down {path}"), path.power_down_script())?;
                }
                if set == PathSet::Both {
                    run_script(bus, "power_up_hdmi_rx", &POWER_UP_HDMI_RX)?;
                    run_script(bus, "enable_csi4_csi1", &ENABLE_CSI4_CSI1)?;
                    info!(target: "PROBE", "CSI-TXA and CSI-TXB enabled");
                }
                PathInitialized(set)
            },

            PathInitialized(_) => {
                run_script(bus, "set_virtual_channel", link.vc.script())?;
                info!(target: "PROBE", "virtual channel {}", link.vc.get());
                PoweredDown
            },

            PoweredDown | PoweredUp => return Ok(self.state),
            Suspended => return Err(Error::Invalid("device is suspended")),
        };
        self.state = next;
        Ok(next)
    }

    /// Step until the chip is initialized and powered down.
    pub fn bring_up<B: I2cBus, D: Delay>(&mut self, bus: &mut BankedBus<B, D>, cfg: &DriverConfig)
        -> Result<()>
    {
        while !matches!(self.state, InitState::PoweredDown | InitState::PoweredUp) {
            self.step(bus, cfg)?;
        }
        Ok(())
    }

    /// Turn the transmitter for `path` on or off.
    ///
    /// HDMI re-programs the active resolution before powering up; a resolution
    /// the CP block cannot handle is logged and power-up continues. Composite
    /// checks the TXB PLL enable bit and only powers up when it is clear.
    /// Returns whether the transmitter ended up powered.
    pub fn set_power<B: I2cBus, D: Delay>(&mut self, bus: &mut BankedBus<B, D>, path: InputPath, on: bool)
        -> Result<bool>
    {
        if self.state == InitState::Suspended {
            return Err(Error::Invalid("device is suspended"));
        }
        let powered = match path {
            InputPath::Composite => {
                let val = bus.read_register(path.tx_bank(), tx::DPHY_PWDN)?;
                if on && (val & tx::PLL_EN) == 0 {
                    run_script(bus, "power_up_txb", path.power_up_script())?;
                    true
                } else {
                    run_script(bus, "power_down_txb", path.power_down_script())?;
                    false
                }
            },
            InputPath::Hdmi if on => {
                match detect::program_active_resolution(bus) {
                    Ok(_) => {},
                    Err(e @ Error::UnsupportedFormat { .. }) => {
                        warn!(target: "PWR", "{e}, powering up anyway");
                    },
                    Err(e) => return Err(e),
                }
                let val = bus.read_register(path.tx_bank(), tx::DPHY_PWDN)?;
                debug!(target: "PWR", "TXA dphy {val:02x}");
                run_script(bus, "power_up_txa", path.power_up_script())?;
                true
            },
            InputPath::Hdmi => {
                run_script(bus, "power_down_txa", path.power_down_script())?;
                false
            },
        };
        self.state = if powered { InitState::PoweredUp } else { InitState::PoweredDown };
        info!(target: "PWR", "{path} {}", if powered { "up" } else { "down" });
        Ok(powered)
    }

    /// Put the chip in its low power state.
    pub fn suspend<B: I2cBus, D: Delay>(&mut self, bus: &mut BankedBus<B, D>) -> Result<()> {
        run_script(bus, "suspend", &SUSPEND)?;
        self.state = InitState::Suspended;
        Ok(())
    }

    /// Wake the chip and re-run path initialization.
    pub fn resume<B: I2cBus, D: Delay>(&mut self, bus: &mut BankedBus<B, D>, cfg: &DriverConfig)
        -> Result<()>
    {
        run_script(bus, "resume", &RESUME)?;
        self.state = InitState::AddressBound;
        self.bring_up(bus, cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::*;
    use crate::link::InputPath;

    #[test]
    fn bring_up_visits_every_state() {
        let mut b = banked();
        let cfg = DriverConfig::default();
        let mut seq = Sequencer::default();
        let mut seen = vec![];
        while seq.state != InitState::PoweredDown {
            seen.push(seq.step(&mut b, &cfg).unwrap());
        }
        assert_eq!(seen, vec![
            InitState::Reset,
            InitState::AddressBound,
            InitState::PathInitialized(PathSet::Hdmi),
            InitState::PoweredDown,
        ]);
        assert_eq!(seq.revision, Some(Revision(0, 0)));
        assert_eq!(b.delay.waits.first(), Some(&5));
    }

    #[test]
    fn failed_step_keeps_state() {
        let mut b = banked();
        let cfg = DriverConfig::default();
        let mut seq = Sequencer::default();
        seq.step(&mut b, &cfg).unwrap();
        b.bus.fail_at = Some(b.bus.log.len() + 3);
        assert!(matches!(seq.step(&mut b, &cfg), Err(Error::Script { offset: 3, .. })));
        assert_eq!(seq.state, InitState::Reset);
    }

    #[test]
    fn composite_power_follows_pll_bit() {
        let mut b = banked();
        b.banks.bind(Bank::Txb, 0x48);
        let mut seq = Sequencer { state: InitState::PoweredDown, revision: None };

        assert_eq!(seq.set_power(&mut b, InputPath::Composite, true), Ok(true));
        assert_eq!(b.bus.writes()[0], (0x48, 0x00, 0x81));

        // PLL already running: asking for power-up powers down instead.
        b.bus.regs.insert((0x48, 0x1E), 0x40);
        b.bus.log.clear();
        assert_eq!(seq.set_power(&mut b, InputPath::Composite, true), Ok(false));
        assert_eq!(b.bus.writes()[0], (0x48, 0x31, 0x82));
        assert_eq!(seq.state, InitState::PoweredDown);
    }

    #[test]
    fn suspended_rejects_power() {
        let mut b = banked();
        let mut seq = Sequencer::default();
        seq.suspend(&mut b).unwrap();
        assert_eq!(b.bus.writes(), vec![(0x70, 0x0C, 0x00)]);
        assert!(seq.set_power(&mut b, InputPath::Hdmi, true).is_err());
    }
}
