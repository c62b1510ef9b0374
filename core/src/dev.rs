//! The ADV7482 sub-device.
//!
//! [Adv7482] owns the bus and all mutable driver state. Operations take the
//! instance lock first and the bus lock second; the interrupt handler only
//! ever takes the bus lock.

/// Source pad formats, pixel codes and cropping.
pub mod pad;
/// Analog standards and digital video timings.
pub mod video;
/// Streaming, power management and the interrupt handler.
pub mod power;

use log::{debug, error, info};
use parking_lot::{Mutex, MutexGuard};

use crate::bus::*;
use crate::config::DriverConfig;
use crate::ctrl::{ControlDesc, ControlId};
use crate::error::{BusError, Error, Result};
use crate::format::{Field, MbusFrameFmt};
use crate::link::InputPath;
use crate::regs::{MAX_HEIGHT, MAX_WIDTH};
use crate::sequencer::{InitState, Revision, Sequencer};
use crate::standard::VideoStd;
use crate::timings::DvTimings;

/// Mutable per-instance state, guarded by the instance lock.
#[derive(Debug, Clone)]
pub struct DeviceState {
    pub seq: Sequencer,
    /// Whether the last power request left the transmitter running.
    pub powered: bool,
    pub streaming: bool,
    pub width: u32,
    pub height: u32,
    pub field: Field,
    /// Last detected analog standard.
    pub curr_norm: VideoStd,
    pub timings: DvTimings,
    /// Cached result of the last try-format negotiation.
    pub try_fmt: Option<MbusFrameFmt>,
    /// Current value of each control, indexed by [ControlId].
    pub ctrl_values: [i32; 4],
}

impl DeviceState {
    fn new(seq: Sequencer, path: InputPath) -> Self {
        let mut ctrl_values = [0; 4];
        for d in path.control_block().controls() {
            ctrl_values[d.id as usize] = d.default;
        }
        DeviceState {
            seq,
            powered: false,
            streaming: false,
            width: MAX_WIDTH,
            height: MAX_HEIGHT,
            field: Field::None,
            curr_norm: VideoStd::UNKNOWN,
            timings: DvTimings::default(),
            try_fmt: None,
            ctrl_values,
        }
    }
}

/// One ADV7482 on one adapter.
pub struct Adv7482<B: I2cBus, D: Delay> {
    cfg: DriverConfig,
    state: Mutex<DeviceState>,
    chip: Mutex<BankedBus<B, D>>,
}

impl<B: I2cBus, D: Delay> Adv7482<B, D> {
    /// Bind to the chip and bring it up to the powered-down state.
    ///
    /// No device is returned if any step of the bring-up fails.
    pub fn probe(bus: B, delay: D, cfg: DriverConfig) -> Result<Self> {
        cfg.validate()?;
        if !bus.supports_byte_data() {
            error!(target: "PROBE", "adapter lacks byte-data transfers");
            return Err(BusError::Unsupported.into());
        }
        info!(target: "PROBE", "chip found @ {:#04x}", cfg.io_addr);

        let mut chip = BankedBus::new(bus, delay, cfg.io_addr);
        let mut seq = Sequencer::default();
        if let Err(e) = seq.bring_up(&mut chip, &cfg) {
            error!(target: "PROBE", "bring-up failed in {:?}: {e}", seq.state);
            return Err(e);
        }
        info!(target: "PROBE", "{} input ready, link {:?}", cfg.link.input, cfg.link.interface);

        let state = DeviceState::new(seq, cfg.link.input);
        Ok(Adv7482 {
            cfg,
            state: Mutex::new(state),
            chip: Mutex::new(chip),
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.cfg
    }

    pub fn input(&self) -> InputPath {
        self.cfg.link.input
    }

    /// Take the instance lock, giving up after the configured timeout.
    fn lock(&self) -> Result<MutexGuard<'_, DeviceState>> {
        self.state.try_lock_for(self.cfg.lock_timeout).ok_or_else(|| {
            debug!(target: "PROBE", "instance lock timed out");
            Error::Interrupted
        })
    }

    /// Copy of the current driver state.
    pub fn state(&self) -> Result<DeviceState> {
        Ok(self.lock()?.clone())
    }

    pub fn init_state(&self) -> Result<InitState> {
        Ok(self.lock()?.seq.state)
    }

    /// Revision read during bring-up, if a soft reset was performed.
    pub fn revision(&self) -> Result<Option<Revision>> {
        Ok(self.lock()?.seq.revision)
    }

    /// Run `f` with exclusive access to the bus.
    pub fn with_bus<R>(&self, f: impl FnOnce(&mut BankedBus<B, D>) -> R) -> R {
        f(&mut self.chip.lock())
    }

    /// Descriptors of the controls on the active path.
    pub fn controls(&self) -> &'static [ControlDesc] {
        self.input().control_block().controls()
    }

    pub fn get_ctrl(&self, id: ControlId) -> Result<i32> {
        Ok(self.lock()?.ctrl_values[id as usize])
    }

    /// Set a picture control on the active path's processing block.
    pub fn set_ctrl(&self, id: ControlId, val: i32) -> Result<()> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        self.input().control_block().apply(&mut chip, id, val)?;
        st.ctrl_values[id as usize] = val;
        Ok(())
    }

    /// Write every control's default value.
    pub fn apply_default_controls(&self) -> Result<()> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        let block = self.input().control_block();
        for d in block.controls() {
            block.apply(&mut chip, d.id, d.default)?;
            st.ctrl_values[d.id as usize] = d.default;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::*;
    use crate::link::LinkConfig;
    use std::time::Duration;

    pub(super) fn probe(cfg: DriverConfig) -> Adv7482<MockBus, MockDelay> {
        Adv7482::probe(MockBus::default(), MockDelay::default(), cfg).unwrap()
    }

    #[test]
    fn probe_ends_powered_down() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.init_state(), Ok(InitState::PoweredDown));
        assert_eq!(dev.revision(), Ok(Some(Revision(0, 0))));
        let st = dev.state().unwrap();
        assert!(!st.powered);
        assert_eq!((st.width, st.height, st.field), (1920, 1080, Field::None));
    }

    #[test]
    fn probe_rejects_unserved_input() {
        let cfg = DriverConfig {
            link: LinkConfig { input: InputPath::Composite, ..Default::default() },
            ..Default::default()
        };
        let res = Adv7482::probe(MockBus::default(), MockDelay::default(), cfg);
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn probe_fails_on_bus_error() {
        let bus = MockBus { fail_at: Some(40), ..Default::default() };
        let res = Adv7482::probe(bus, MockDelay::default(), DriverConfig::default());
        assert!(matches!(res, Err(Error::Script { .. })));
    }

    #[test]
    fn rejected_control_keeps_value() {
        let dev = probe(DriverConfig::default());
        dev.with_bus(|b| b.bus.log.clear());
        assert!(matches!(dev.set_ctrl(ControlId::Brightness, 128), Err(Error::Range { .. })));
        assert_eq!(dev.get_ctrl(ControlId::Brightness), Ok(0));
        assert!(dev.with_bus(|b| b.bus.log.is_empty()));

        dev.set_ctrl(ControlId::Contrast, 90).unwrap();
        assert_eq!(dev.get_ctrl(ControlId::Contrast), Ok(90));
    }

    #[test]
    fn defaults_written_in_order() {
        let dev = probe(DriverConfig::default());
        dev.with_bus(|b| b.bus.log.clear());
        dev.apply_default_controls().unwrap();
        let writes: Vec<_> = dev.with_bus(|b| b.bus.writes())
            .into_iter()
            .filter(|w| w.1 != 0x3E)
            .collect();
        assert_eq!(writes, vec![(0x22, 0x3C, 0x00), (0x22, 0x3A, 0x80), (0x22, 0x3B, 0x80), (0x22, 0x3D, 0x00)]);
    }

    #[test]
    fn held_lock_interrupts() {
        let cfg = DriverConfig { lock_timeout: Duration::from_millis(10), ..Default::default() };
        let dev = probe(cfg);
        dev.with_bus(|b| b.bus.log.clear());
        let _held = dev.state.lock();
        assert_eq!(dev.set_ctrl(ControlId::Hue, 4), Err(Error::Interrupted));
        assert!(dev.with_bus(|b| b.bus.log.is_empty()));
    }
}
