use strum::{Display, EnumIter, EnumString};

use crate::bus::bank::Bank;
use crate::ctrl::ControlBlock;
use crate::error::{Error, Result};
use crate::format::{Colorspace, MbusCode};
use crate::script::Script;
use crate::script::tables::*;

/// Video input feeding the source pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputPath {
    /// Analog CVBS through the SDP block, out on CSI-TXB.
    Composite,
    /// HDMI through the CP block, out on CSI-TXA.
    Hdmi,
}

static COMPOSITE_CODES: [MbusCode; 1] = [MbusCode::Yuyv8_2x8];
static HDMI_CODES: [MbusCode; 2] = [MbusCode::Rgb888_1x24, MbusCode::Uyvy8_2x8];

impl InputPath {
    pub fn init_script(self) -> Script {
        match self {
            InputPath::Composite => &INIT_TXB_1LANE,
            InputPath::Hdmi => &INIT_TXA_4LANE,
        }
    }

    pub fn power_up_script(self) -> Script {
        match self {
            InputPath::Composite => &POWER_UP_TXB_1LANE,
            InputPath::Hdmi => &POWER_UP_TXA_4LANE,
        }
    }

    pub fn power_down_script(self) -> Script {
        match self {
            InputPath::Composite => &POWER_DOWN_TXB_1LANE,
            InputPath::Hdmi => &POWER_DOWN_TXA_4LANE,
        }
    }

    pub fn colorbar_script(self) -> Script {
        match self {
            InputPath::Composite => &COLORBAR_SDP,
            InputPath::Hdmi => &COLORBAR_HDMI,
        }
    }

    /// CSI transmitter this path drives.
    pub const fn tx_bank(self) -> Bank {
        match self {
            InputPath::Composite => Bank::Txb,
            InputPath::Hdmi => Bank::Txa,
        }
    }

    pub const fn control_block(self) -> ControlBlock {
        match self {
            InputPath::Composite => ControlBlock::Sdp,
            InputPath::Hdmi => ControlBlock::Cp,
        }
    }

    /// Pixel codes offered on the source pad.
    pub fn codes(self) -> &'static [MbusCode] {
        match self {
            InputPath::Composite => &COMPOSITE_CODES,
            InputPath::Hdmi => &HDMI_CODES,
        }
    }

    pub const fn mbus_config(self) -> MbusConfig {
        match self {
            InputPath::Composite => MbusConfig { lanes: 1, channels: 0b0001, continuous_clock: true },
            InputPath::Hdmi => MbusConfig { lanes: 4, channels: 0b1111, continuous_clock: true },
        }
    }
}

/// Encoding of the pixels arriving on the HDMI receiver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputInterface {
    Rgb888,
    #[default]
    Ycbcr422,
}

impl InputInterface {
    /// Pixel code and colorspace reported when the caller asks for nothing specific.
    pub const fn default_format(self) -> (MbusCode, Colorspace) {
        match self {
            InputInterface::Rgb888 => (MbusCode::Rgb888_1x24, Colorspace::Srgb),
            InputInterface::Ycbcr422 => (MbusCode::Uyvy8_2x8, Colorspace::Rec709),
        }
    }
}

/// CSI-2 virtual channel, 0 to 3.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VirtualChannel(u8);
impl VirtualChannel {
    pub fn new(vc: u8) -> Result<Self> {
        if vc > 3 {
            return Err(Error::InvalidConfig("virtual channel must be 0-3"));
        }
        Ok(VirtualChannel(vc))
    }
    pub fn get(self) -> u8 { self.0 }

    pub fn script(self) -> Script {
        &SET_VIRTUAL_CHANNEL[self.0 as usize]
    }
}

/// MIPI CSI-2 link description for the receiving end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbusConfig {
    pub lanes: u8,
    /// Bitmap of usable virtual channels.
    pub channels: u8,
    pub continuous_clock: bool,
}

/// Static description of how the chip is wired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Path served on the source pad.
    pub input: InputPath,
    pub interface: InputInterface,
    pub vc: VirtualChannel,
    /// Bring up the HDMI receiver and CSI-TXA.
    pub hdmi_enabled: bool,
    /// Bring up the SDP and CSI-TXB.
    pub sdp_enabled: bool,
    /// Soft reset the chip before anything else.
    pub sw_reset: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        LinkConfig {
            input: InputPath::Hdmi,
            interface: InputInterface::Ycbcr422,
            vc: VirtualChannel::default(),
            hdmi_enabled: true,
            sdp_enabled: false,
            sw_reset: true,
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<()> {
        let served = match self.input {
            InputPath::Hdmi => self.hdmi_enabled,
            InputPath::Composite => self.sdp_enabled,
        };
        if !served {
            return Err(Error::InvalidConfig("selected input path is not enabled"));
        }
        Ok(())
    }

    /// Paths to bring up at probe, in order.
    pub fn enabled_paths(&self) -> Vec<InputPath> {
        let mut paths = Vec::with_capacity(2);
        if self.hdmi_enabled { paths.push(InputPath::Hdmi); }
        if self.sdp_enabled { paths.push(InputPath::Composite); }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_hdmi_only() {
        let l = LinkConfig::default();
        assert!(l.validate().is_ok());
        assert_eq!(l.enabled_paths(), vec![InputPath::Hdmi]);
    }

    #[test]
    fn selected_path_must_be_enabled() {
        let l = LinkConfig { input: InputPath::Composite, ..Default::default() };
        assert!(matches!(l.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn virtual_channel_range() {
        assert!(VirtualChannel::new(3).is_ok());
        assert!(VirtualChannel::new(4).is_err());
        assert_eq!(VirtualChannel::new(2).unwrap().script(), &SET_VIRTUAL_CHANNEL[2][..]);
    }
}
