use log::debug;
use strum::{Display, EnumIter, EnumString};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::error::{Error, Result};
use crate::regs::{cp, sdp};

/// Picture adjustment controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ControlId {
    Brightness,
    Contrast,
    Saturation,
    Hue,
}

/// Range and default for one control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlDesc {
    pub id: ControlId,
    pub min: i32,
    pub max: i32,
    pub step: i32,
    pub default: i32,
}

const fn desc(id: ControlId, min: i32, max: i32, default: i32) -> ControlDesc {
    ControlDesc { id, min, max, step: 1, default }
}

/// Controls of the component processor (HDMI path).
pub static CP_CONTROLS: [ControlDesc; 4] = [
    desc(ControlId::Brightness, -128, 127, 0),
    desc(ControlId::Contrast, 0, 255, 128),
    desc(ControlId::Saturation, 0, 255, 128),
    desc(ControlId::Hue, 0, 255, 0),
];

/// Controls of the standard definition processor (composite path).
pub static SDP_CONTROLS: [ControlDesc; 4] = [
    desc(ControlId::Brightness, -128, 127, 0),
    desc(ControlId::Contrast, 0, 255, 128),
    desc(ControlId::Saturation, 0, 255, 128),
    desc(ControlId::Hue, -127, 128, 0),
];

/// Processing block a control set lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlBlock {
    Cp,
    Sdp,
}

impl ControlBlock {
    pub fn controls(self) -> &'static [ControlDesc] {
        match self {
            ControlBlock::Cp => &CP_CONTROLS,
            ControlBlock::Sdp => &SDP_CONTROLS,
        }
    }

    /// Both tables are ordered like [ControlId].
    pub fn desc(self, id: ControlId) -> &'static ControlDesc {
        &self.controls()[id as usize]
    }

    pub const fn bank(self) -> Bank {
        match self {
            ControlBlock::Cp => Bank::Cp,
            ControlBlock::Sdp => Bank::Sdp,
        }
    }

    /// Register writes for `id = val`, or a range error if `val` is outside the control's limits.
    pub fn writes(self, id: ControlId, val: i32) -> Result<Vec<(u8, u8)>> {
        let d = self.desc(id);
        if val < d.min || val > d.max {
            return Err(Error::Range { ctrl: id, val, min: d.min, max: d.max });
        }
        // Signed ranges are stored as two's complement bytes.
        let byte = val as i8 as u8;
        let unsigned = val as u8;
        use ControlId::*;
        Ok(match (self, id) {
            (ControlBlock::Cp, Brightness)  => vec![(cp::BRI, byte)],
            (ControlBlock::Cp, Contrast)    => vec![(cp::CON, unsigned)],
            (ControlBlock::Cp, Saturation)  => vec![(cp::SAT, unsigned)],
            (ControlBlock::Cp, Hue)         => vec![(cp::HUE, unsigned)],
            (ControlBlock::Sdp, Brightness) => vec![(sdp::BRI, byte)],
            (ControlBlock::Sdp, Contrast)   => vec![(sdp::CON, unsigned)],
            // Chroma gain is set on both channels together.
            (ControlBlock::Sdp, Saturation) => vec![(sdp::SAT_CB, unsigned), (sdp::SAT_CR, unsigned)],
            // Hue runs the other way round the colour wheel on this block.
            (ControlBlock::Sdp, Hue)        => vec![(sdp::HUE, (-val) as i8 as u8)],
        })
    }

    /// Validate and apply a control value.
    ///
    /// Nothing is written when the value is out of range.
    pub fn apply<B: I2cBus, D: Delay>(self, bus: &mut BankedBus<B, D>, id: ControlId, val: i32)
        -> Result<()>
    {
        let writes = self.writes(id, val)?;
        match self {
            ControlBlock::Cp => bus.set_bits(Bank::Cp, cp::VID_ADJ, cp::VID_ADJ_ENABLE)?,
            ControlBlock::Sdp => bus.write_register(Bank::Sdp, sdp::REG_CTRL, sdp::MAIN_MAP_RW)?,
        }
        for (reg, v) in writes {
            bus.write_register(self.bank(), reg, v)?;
        }
        debug!(target: "CTRL", "{:?} {id} = {val}", self);
        Ok(())
    }
}
