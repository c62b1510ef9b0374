use log::{debug, info};

use crate::bus::*;
use crate::detect::{self, VideoInfo};
use crate::dev::{Adv7482, DeviceState};
use crate::error::{Error, Result};
use crate::format::*;
use crate::link::{InputPath, MbusConfig};
use crate::regs::{MAX_HEIGHT, MAX_WIDTH};
use crate::script::run_script;
use crate::script::tables::{INIT_TXA_RGB, INIT_TXA_YUV};

/// Range reported by [Adv7482::enum_framesizes].
pub const FRAME_SIZES: FrameSizeRange = FrameSizeRange {
    min_width: 640,
    max_width: MAX_WIDTH,
    min_height: 480,
    max_height: MAX_HEIGHT,
};

impl<B: I2cBus, D: Delay> Adv7482<B, D> {
    /// Work out the source pad format for `req`.
    ///
    /// With `commit` set, the CP output conversion for the requested code is
    /// programmed and the resulting geometry is stored in `st`.
    fn negotiate(&self, st: &mut DeviceState, chip: &mut BankedBus<B, D>, req: &MbusFrameFmt, commit: bool)
        -> Result<MbusFrameFmt>
    {
        let fmt = match self.input() {
            InputPath::Composite => {
                let std = detect::detect_standard(chip)?;
                if commit {
                    st.curr_norm = std;
                }
                MbusFrameFmt {
                    width: 720,
                    height: std.frame_height(),
                    code: Some(MbusCode::Yuyv8_2x8),
                    colorspace: Colorspace::Smpte170m,
                    field: Field::Interlaced,
                }
            },
            InputPath::Hdmi => {
                let requested = req.code.and_then(|c| OutputSpace::for_code(c).map(|m| (c, m)));
                let (code, colorspace) = match requested {
                    Some((code, (space, colorspace))) => {
                        if commit {
                            match space {
                                OutputSpace::Rgb => run_script(chip, "init_txa_rgb", &INIT_TXA_RGB)?,
                                OutputSpace::Yuv => run_script(chip, "init_txa_yuv", &INIT_TXA_YUV)?,
                            };
                        }
                        (code, colorspace)
                    },
                    None => self.cfg.link.interface.default_format(),
                };
                let info = match detect::read_video_info(chip) {
                    Ok(Some(info)) => info,
                    Ok(None) | Err(Error::InconsistentStatus { .. }) => {
                        debug!(target: "DETECT", "no usable HDMI signal, assuming {MAX_WIDTH}x{MAX_HEIGHT}p");
                        VideoInfo::new(MAX_WIDTH, MAX_HEIGHT, true)
                    },
                    Err(e) => return Err(e),
                };
                MbusFrameFmt {
                    width: info.width,
                    height: info.height,
                    code: Some(code),
                    colorspace,
                    field: Field::from_progressive(info.progressive),
                }
            },
        };
        if commit {
            st.width = fmt.width;
            st.height = fmt.height;
            st.field = fmt.field;
        }
        Ok(fmt)
    }

    /// The `index`-th pixel code offered on the source pad.
    pub fn enum_mbus_code(&self, index: usize) -> Result<MbusCode> {
        self.input().codes().get(index).copied().ok_or(Error::Invalid("pixel code index out of range"))
    }

    /// Read back the source pad format.
    ///
    /// A cached try format is returned as is; otherwise the input is detected again.
    pub fn get_pad_format(&self, which: FormatWhich) -> Result<MbusFrameFmt> {
        let mut st = self.lock()?;
        if which == FormatWhich::Try {
            if let Some(fmt) = st.try_fmt {
                return Ok(fmt);
            }
        }
        let mut chip = self.chip.lock();
        let mut fmt = self.negotiate(&mut st, &mut chip, &MbusFrameFmt::default(), true)?;
        fmt.field = st.field;
        Ok(fmt)
    }

    /// Negotiate the source pad format.
    ///
    /// A try request only computes and caches the result. An active request
    /// with a new field order cycles the transmitter power first.
    pub fn set_pad_format(&self, which: FormatWhich, fmt: &MbusFrameFmt) -> Result<MbusFrameFmt> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        match which {
            FormatWhich::Try => {
                let mut out = self.negotiate(&mut st, &mut chip, fmt, false)?;
                if fmt.field == Field::Any {
                    out.field = st.field;
                }
                st.try_fmt = Some(out);
                Ok(out)
            },
            FormatWhich::Active => {
                if st.field != fmt.field {
                    info!(target: "PWR", "field order {:?} -> {:?}, restarting transmitter", st.field, fmt.field);
                    st.field = fmt.field;
                    st.powered = st.seq.set_power(&mut chip, self.input(), false)?;
                    st.powered = st.seq.set_power(&mut chip, self.input(), true)?;
                }
                self.negotiate(&mut st, &mut chip, fmt, true)
            },
        }
    }

    /// Cropping bounds; the default rectangle is the whole frame.
    pub fn cropcap(&self) -> Result<CropCap> {
        let bounds = self.crop_bounds()?;
        Ok(CropCap { bounds, defrect: bounds, pixelaspect: (1, 1) })
    }

    /// Current crop rectangle. Cropping cannot be changed, so this is the full frame.
    pub fn g_crop(&self) -> Result<Rect> {
        self.crop_bounds()
    }

    fn crop_bounds(&self) -> Result<Rect> {
        let mut st = self.lock()?;
        let mut chip = self.chip.lock();
        let (width, height) = match self.input() {
            InputPath::Composite => {
                st.curr_norm = detect::detect_standard(&mut chip)?;
                (720, st.curr_norm.frame_height())
            },
            InputPath::Hdmi => match detect::read_video_info(&mut chip) {
                Ok(Some(info)) => (info.width, info.height),
                Ok(None) | Err(Error::InconsistentStatus { .. }) => (MAX_WIDTH, MAX_HEIGHT),
                Err(e) => return Err(e),
            },
        };
        Ok(Rect { left: 0, top: 0, width, height })
    }

    pub fn enum_framesizes(&self) -> FrameSizeRange {
        FRAME_SIZES
    }

    /// CSI-2 link parameters for the receiver.
    pub fn mbus_config(&self) -> MbusConfig {
        self.input().mbus_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::bank::Bank;
    use crate::config::DriverConfig;
    use crate::dev::tests::probe;
    use crate::link::{InputInterface, LinkConfig};
    use crate::bus::mock::*;

    fn lock_hdmi(dev: &Adv7482<MockBus, MockDelay>, s1: u8, s2: u8, lw: u8, hm: u8, hl: u8) {
        dev.with_bus(|b| {
            let addr = b.banks.resolve(Bank::Hdmi);
            for (reg, val) in [(0x07, s1), (0x0B, s2), (0x08, lw), (0x09, hm), (0x0A, hl)] {
                b.bus.regs.insert((addr, reg), val);
            }
            b.bus.log.clear();
        });
    }

    #[test]
    fn codes_per_path() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.enum_mbus_code(0), Ok(MbusCode::Rgb888_1x24));
        assert_eq!(dev.enum_mbus_code(1), Ok(MbusCode::Uyvy8_2x8));
        assert!(dev.enum_mbus_code(2).is_err());
    }

    #[test]
    fn hdmi_format_without_signal() {
        let dev = probe(DriverConfig::default());
        let fmt = dev.get_pad_format(FormatWhich::Active).unwrap();
        assert_eq!(fmt, MbusFrameFmt {
            width: 1920,
            height: 1080,
            code: Some(MbusCode::Uyvy8_2x8),
            colorspace: Colorspace::Rec709,
            field: Field::None,
        });
    }

    #[test]
    fn rgb_interface_default() {
        let link = LinkConfig { interface: InputInterface::Rgb888, ..Default::default() };
        let dev = probe(DriverConfig { link, ..Default::default() });
        let fmt = dev.get_pad_format(FormatWhich::Active).unwrap();
        assert_eq!((fmt.code, fmt.colorspace), (Some(MbusCode::Rgb888_1x24), Colorspace::Srgb));
    }

    #[test]
    fn requested_code_selects_conversion() {
        let dev = probe(DriverConfig::default());
        lock_hdmi(&dev, 0xA5, 0x00, 0x00, 0x02, 0xD0);
        let req = MbusFrameFmt { code: Some(MbusCode::Yuyv8_1x16), field: Field::None, ..Default::default() };
        let fmt = dev.set_pad_format(FormatWhich::Active, &req).unwrap();
        assert_eq!((fmt.width, fmt.height, fmt.field), (1280, 720, Field::None));
        assert_eq!(fmt.colorspace, Colorspace::Rec709);
        // Same field order, so only the YUV conversion is written.
        assert_eq!(dev.with_bus(|b| b.bus.writes()), vec![(0x70, 0x04, 0x00), (0x70, 0x12, 0xF2)]);
    }

    #[test]
    fn try_format_is_cached_and_silent() {
        let dev = probe(DriverConfig::default());
        lock_hdmi(&dev, 0xA5, 0x00, 0x00, 0x02, 0xD0);
        let req = MbusFrameFmt { code: Some(MbusCode::Rgb888_1x24), field: Field::Any, ..Default::default() };
        let fmt = dev.set_pad_format(FormatWhich::Try, &req).unwrap();
        assert_eq!(fmt.field, Field::None);
        assert!(dev.with_bus(|b| b.bus.writes()).is_empty());
        assert_eq!(dev.get_pad_format(FormatWhich::Try), Ok(fmt));
        assert_eq!(dev.state().unwrap().width, 1920);
    }

    #[test]
    fn field_change_cycles_power() {
        let dev = probe(DriverConfig::default());
        let req = MbusFrameFmt { field: Field::Interlaced, ..Default::default() };
        dev.set_pad_format(FormatWhich::Active, &req).unwrap();
        let st = dev.state().unwrap();
        assert!(st.powered);
        // Detection found nothing, so the stored field follows the fallback.
        assert_eq!(st.field, Field::None);
    }

    #[test]
    fn crop_follows_detection() {
        let dev = probe(DriverConfig::default());
        assert_eq!(dev.g_crop().unwrap(), Rect { left: 0, top: 0, width: 1920, height: 1080 });
        lock_hdmi(&dev, 0xA2, 0x00, 0x80, 0x01, 0xE0);
        let cap = dev.cropcap().unwrap();
        assert_eq!((cap.bounds.width, cap.bounds.height), (640, 480));
        assert_eq!(cap.defrect, cap.bounds);
    }
}
