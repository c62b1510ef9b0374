use log::{debug, info};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::dev::Adv7482;
use crate::error::Result;
use crate::regs::io;

impl<B: I2cBus, D: Delay> Adv7482<B, D> {
    /// Start or stop the CSI transmitter for the active path.
    pub fn s_stream(&self, enable: bool) -> Result<()> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        st.powered = st.seq.set_power(&mut chip, self.input(), enable)?;
        st.streaming = st.powered;
        Ok(())
    }

    /// Power the active path's transmitter on or off.
    ///
    /// Returns whether it ended up powered; the composite transmitter stays
    /// down when its PLL was already running.
    pub fn s_power(&self, on: bool) -> Result<bool> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        st.powered = st.seq.set_power(&mut chip, self.input(), on)?;
        Ok(st.powered)
    }

    pub fn suspend(&self) -> Result<()> {
        let mut st = self.lock()?;
        st.seq.suspend(&mut self.chip.lock())?;
        st.powered = false;
        st.streaming = false;
        info!(target: "PWR", "suspended");
        Ok(())
    }

    /// Leave the low power state and re-run path initialization.
    pub fn resume(&self) -> Result<()> {
        let mut st = self.lock()?;
        st.seq.resume(&mut self.chip.lock(), &self.cfg)?;
        info!(target: "PWR", "resumed");
        Ok(())
    }

    /// Service the chip's interrupt line.
    ///
    /// Returns true when the receiver flagged a new input frequency.
    pub fn isr(&self) -> Result<bool> {
        let status = self.chip.lock().read_register(Bank::Io, io::INT_STATUS)?;
        debug!(target: "IRQ", "status {status:02x}");
        let new_freq = status & io::INT_NEW_FREQ != 0;
        if new_freq {
            info!(target: "IRQ", "new frequency");
        }
        Ok(new_freq)
    }
}

#[cfg(test)]
mod tests {
    use crate::bus::mock::*;
    use crate::config::DriverConfig;
    use crate::dev::tests::probe;
    use crate::error::Error;
    use crate::sequencer::InitState;

    #[test]
    fn stream_powers_hdmi() {
        let dev = probe(DriverConfig::default());
        dev.with_bus(|b| b.bus.log.clear());
        dev.s_stream(true).unwrap();
        let st = dev.state().unwrap();
        assert!(st.powered && st.streaming);
        assert_eq!(st.seq.state, InitState::PoweredUp);

        dev.s_stream(false).unwrap();
        assert!(!dev.state().unwrap().powered);
        assert_eq!(dev.with_bus(|b| b.bus.writes()).last(), Some(&(0x4A, 0xC1, 0x3B)));
    }

    #[test]
    fn suspend_blocks_power_until_resume() {
        let dev = probe(DriverConfig::default());
        dev.suspend().unwrap();
        assert_eq!(dev.init_state(), Ok(InitState::Suspended));
        assert!(matches!(dev.s_power(true), Err(Error::Invalid(_))));

        dev.with_bus(|b| b.bus.log.clear());
        dev.resume().unwrap();
        assert_eq!(dev.init_state(), Ok(InitState::PoweredDown));
        assert_eq!(dev.with_bus(|b| b.bus.writes())[0], (0x70, 0x0C, 0xE0));
        assert_eq!(dev.s_power(true), Ok(true));
    }

    #[test]
    fn isr_flags_frequency_change() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.isr(), Ok(false));
        dev.with_bus(|b| b.bus.regs.insert((0x70, 0x8A), 0x02));
        assert_eq!(dev.isr(), Ok(true));
    }
}
