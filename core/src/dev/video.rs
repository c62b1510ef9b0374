use log::{debug, info};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::detect;
use crate::dev::Adv7482;
use crate::error::{Error, Result};
use crate::link::InputPath;
use crate::regs::hdmi;
use crate::standard::VideoStd;
use crate::timings::*;

/// Input status as seen by the capture side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStatus {
    Signal,
    NoSignal,
}

impl<B: I2cBus, D: Delay> Adv7482<B, D> {
    /// Sense the analog standard. The HDMI input always reports ATSC.
    pub fn querystd(&self) -> Result<VideoStd> {
        let mut st = self.lock()?;
        match self.input() {
            InputPath::Composite => {
                let std = detect::detect_standard(&mut self.chip.lock())?;
                st.curr_norm = std;
                Ok(std)
            },
            InputPath::Hdmi => Ok(VideoStd::ATSC),
        }
    }

    pub fn g_input_status(&self) -> Result<InputStatus> {
        let _st = self.lock()?;
        let mut chip = self.chip.lock();
        let locked = match self.input() {
            InputPath::Composite => detect::sdp_locked(detect::read_sdp_status(&mut chip)?),
            InputPath::Hdmi => {
                let status1 = chip.read_register(Bank::Hdmi, hdmi::STATUS1)?;
                status1 & hdmi::VF_LOCKED != 0 && status1 & hdmi::DERF_LOCKED != 0
            },
        };
        Ok(if locked { InputStatus::Signal } else { InputStatus::NoSignal })
    }

    /// Select the HDMI timings to report.
    ///
    /// The request must lie inside [TIMINGS_CAP] and match a table entry to
    /// within [MATCH_TOLERANCE_HZ] of pixel clock.
    pub fn s_dv_timings(&self, t: &DvTimings) -> Result<()> {
        let mut st = self.lock()?;
        if st.timings.matches(t, 0) {
            debug!(target: "DETECT", "dv timings unchanged");
            return Ok(());
        }
        if !TIMINGS_CAP.valid(t) {
            return Err(Error::TimingsOutOfRange);
        }
        let Some(entry) = find_standard(t, MATCH_TOLERANCE_HZ) else {
            return Err(Error::Invalid("timings match no supported video standard"));
        };
        info!(target: "DETECT", "dv timings {}x{} std {:#04x}", t.width, t.height, entry.vid_std);
        st.timings = *t;
        Ok(())
    }

    pub fn g_dv_timings(&self) -> Result<DvTimings> {
        Ok(self.lock()?.timings)
    }

    /// Detect the HDMI signal and find the table timings for it.
    ///
    /// When several table entries share the detected geometry the current
    /// timings win, otherwise the first one is returned. `None` means no signal.
    pub fn query_dv_timings(&self) -> Result<Option<DvTimings>> {
        if self.input() != InputPath::Hdmi {
            return Err(Error::Invalid("dv timings are only available on the HDMI input"));
        }
        let st = self.lock()?;
        let Some(info) = detect::read_video_info(&mut self.chip.lock())? else {
            return Ok(None);
        };
        let same_geometry = |t: &DvTimings| {
            t.width == info.width && t.height == info.height && t.interlaced == !info.progressive
        };
        if same_geometry(&st.timings) && find_standard(&st.timings, 0).is_some() {
            return Ok(Some(st.timings));
        }
        VIDEO_STANDARDS.iter()
            .map(|e| e.timings)
            .find(same_geometry)
            .map(Some)
            .ok_or(Error::UnsupportedFormat {
                width: info.width,
                height: info.height,
                progressive: info.progressive,
            })
    }

    pub fn enum_dv_timings(&self, index: usize) -> Result<DvTimings> {
        enum_timings(index).ok_or(Error::Invalid("dv timings index out of range"))
    }

    pub fn dv_timings_cap(&self) -> TimingsCap {
        TIMINGS_CAP
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::*;
    use crate::config::DriverConfig;
    use crate::dev::tests::probe;

    fn set_hdmi(dev: &Adv7482<MockBus, MockDelay>, regs: [(u8, u8); 5]) {
        dev.with_bus(|b| {
            for (reg, val) in regs {
                b.bus.regs.insert((0x34, reg), val);
            }
        });
    }

    #[test]
    fn hdmi_reports_atsc() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.querystd(), Ok(VideoStd::ATSC));
    }

    #[test]
    fn input_status_needs_both_locks() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.g_input_status(), Ok(InputStatus::NoSignal));
        set_hdmi(&dev, [(0x07, 0x80), (0x0B, 0), (0x08, 0), (0x09, 0), (0x0A, 0)]);
        assert_eq!(dev.g_input_status(), Ok(InputStatus::NoSignal));
        set_hdmi(&dev, [(0x07, 0xA0), (0x0B, 0), (0x08, 0), (0x09, 0), (0x0A, 0)]);
        assert_eq!(dev.g_input_status(), Ok(InputStatus::Signal));
    }

    #[test]
    fn set_timings() {
        let dev = probe(DriverConfig::default());
        let mut t = VIDEO_STANDARDS[7].timings;
        t.pixelclock -= 100_000;
        dev.s_dv_timings(&t).unwrap();
        assert_eq!(dev.g_dv_timings(), Ok(t));
        // Identical request is a no-op even without a table match.
        assert_eq!(dev.s_dv_timings(&t), Ok(()));

        let mut off = t;
        off.width = 3840;
        assert_eq!(dev.s_dv_timings(&off), Err(Error::TimingsOutOfRange));
        let mut odd = VIDEO_STANDARDS[7].timings;
        odd.vsync += 2;
        assert!(matches!(dev.s_dv_timings(&odd), Err(Error::Invalid(_))));
        assert_eq!(dev.g_dv_timings(), Ok(t));
    }

    #[test]
    fn query_prefers_current_timings() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.query_dv_timings(), Ok(None));

        // 1920x1080 progressive
        set_hdmi(&dev, [(0x07, 0xA7), (0x0B, 0x00), (0x08, 0x80), (0x09, 0x04), (0x0A, 0x38)]);
        let first = dev.query_dv_timings().unwrap().unwrap();
        assert_eq!((first.width, first.height), (1920, 1080));

        let other = VIDEO_STANDARDS.iter()
            .map(|e| e.timings)
            .filter(|t| t.width == 1920 && t.height == 1080)
            .nth(1)
            .unwrap();
        dev.s_dv_timings(&other).unwrap();
        assert_eq!(dev.query_dv_timings(), Ok(Some(other)));
    }

    #[test]
    fn query_rejects_unknown_geometry() {
        let dev = probe(DriverConfig::default());
        // 1024x600
        set_hdmi(&dev, [(0x07, 0xA4), (0x0B, 0x00), (0x08, 0x00), (0x09, 0x02), (0x0A, 0x58)]);
        assert_eq!(dev.query_dv_timings(),
            Err(Error::UnsupportedFormat { width: 1024, height: 600, progressive: true }));
    }

    #[test]
    fn enumeration_stops_at_table_end() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.enum_dv_timings(0), Ok(VIDEO_STANDARDS[0].timings));
        assert!(dev.enum_dv_timings(VIDEO_STANDARDS.len()).is_err());
        assert_eq!(dev.dv_timings_cap().max_height, 1200);
    }
}
