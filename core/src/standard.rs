//! Analog video standard identifiers.

use std::fmt;

/// Set of analog video standards, one bit per variant.
///
/// Bit assignments follow the usual capture-API numbering so the values
/// can be handed to a pipeline unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct VideoStd(pub u64);

impl VideoStd {
    pub const UNKNOWN: Self     = Self(0);

    pub const PAL_B: Self       = Self(0x0000_0001);
    pub const PAL_B1: Self      = Self(0x0000_0002);
    pub const PAL_G: Self       = Self(0x0000_0004);
    pub const PAL_H: Self       = Self(0x0000_0008);
    pub const PAL_I: Self       = Self(0x0000_0010);
    pub const PAL_D: Self       = Self(0x0000_0020);
    pub const PAL_D1: Self      = Self(0x0000_0040);
    pub const PAL_K: Self       = Self(0x0000_0080);
    pub const PAL_M: Self       = Self(0x0000_0100);
    pub const PAL_N: Self       = Self(0x0000_0200);
    pub const PAL_NC: Self      = Self(0x0000_0400);
    pub const PAL_60: Self      = Self(0x0000_0800);

    pub const NTSC_M: Self      = Self(0x0000_1000);
    pub const NTSC_M_JP: Self   = Self(0x0000_2000);
    pub const NTSC_443: Self    = Self(0x0000_4000);
    pub const NTSC_M_KR: Self   = Self(0x0000_8000);

    pub const SECAM_B: Self     = Self(0x0001_0000);
    pub const SECAM_D: Self     = Self(0x0002_0000);
    pub const SECAM_G: Self     = Self(0x0004_0000);
    pub const SECAM_H: Self     = Self(0x0008_0000);
    pub const SECAM_K: Self     = Self(0x0010_0000);
    pub const SECAM_K1: Self    = Self(0x0020_0000);
    pub const SECAM_L: Self     = Self(0x0040_0000);
    pub const SECAM_LC: Self    = Self(0x0080_0000);

    pub const ATSC_8_VSB: Self  = Self(0x0100_0000);
    pub const ATSC_16_VSB: Self = Self(0x0200_0000);

    pub const NTSC: Self = Self(Self::NTSC_M.0 | Self::NTSC_M_JP.0 | Self::NTSC_M_KR.0);
    pub const PAL_BG: Self = Self(Self::PAL_B.0 | Self::PAL_B1.0 | Self::PAL_G.0);
    pub const PAL_DK: Self = Self(Self::PAL_D.0 | Self::PAL_D1.0 | Self::PAL_K.0);
    pub const PAL: Self = Self(Self::PAL_BG.0 | Self::PAL_DK.0 | Self::PAL_H.0 | Self::PAL_I.0);
    pub const SECAM_DK: Self = Self(Self::SECAM_D.0 | Self::SECAM_K.0 | Self::SECAM_K1.0);
    pub const SECAM: Self = Self(Self::SECAM_B.0 | Self::SECAM_G.0 | Self::SECAM_H.0
        | Self::SECAM_DK.0 | Self::SECAM_L.0 | Self::SECAM_LC.0);
    pub const ATSC: Self = Self(Self::ATSC_8_VSB.0 | Self::ATSC_16_VSB.0);

    /// Every 525-line, 60-field standard.
    pub const STD_525_60: Self = Self(Self::PAL_M.0 | Self::PAL_60.0 | Self::NTSC.0 | Self::NTSC_443.0);

    pub const fn union(self, other: Self) -> Self { Self(self.0 | other.0) }
    pub const fn intersects(self, other: Self) -> bool { (self.0 & other.0) != 0 }
    pub const fn is_unknown(self) -> bool { self.0 == 0 }

    /// Frame height of a standard-definition capture in this standard.
    pub const fn frame_height(self) -> u32 {
        if self.intersects(Self::STD_525_60) { 480 } else { 576 }
    }

    pub fn is_pal(self) -> bool {
        self.intersects(Self::PAL.union(Self::PAL_M).union(Self::PAL_60)
            .union(Self::PAL_N).union(Self::PAL_NC))
    }

    pub fn is_ntsc(self) -> bool {
        self.intersects(Self::NTSC.union(Self::NTSC_443))
    }
}

impl fmt::Display for VideoStd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::UNKNOWN => "unknown",
            Self::NTSC => "NTSC",
            Self::NTSC_443 => "NTSC-4.43",
            Self::PAL_M => "PAL-M",
            Self::PAL_60 => "PAL-60",
            Self::PAL => "PAL",
            Self::SECAM => "SECAM",
            Self::ATSC => "ATSC",
            s if s == Self::PAL_N.union(Self::PAL_NC) => "PAL-N/Nc",
            s => return write!(f, "{:#010x}", s.0),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_heights() {
        assert_eq!(VideoStd::NTSC.frame_height(), 480);
        assert_eq!(VideoStd::PAL_M.frame_height(), 480);
        assert_eq!(VideoStd::PAL.frame_height(), 576);
        assert_eq!(VideoStd::SECAM.frame_height(), 576);
        assert_eq!(VideoStd::UNKNOWN.frame_height(), 576);
    }

    #[test]
    fn names() {
        assert_eq!(VideoStd::PAL.to_string(), "PAL");
        assert_eq!(VideoStd::PAL_N.union(VideoStd::PAL_NC).to_string(), "PAL-N/Nc");
        assert_eq!(VideoStd::NTSC_M.to_string(), "0x00001000");
    }
}
