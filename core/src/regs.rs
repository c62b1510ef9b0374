//! Register offsets and bit definitions, grouped by bank.

pub mod io {
    pub const PWR_MAN: u8           = 0x0C;
    pub const PWR_MAN_ON: u8        = 0xE0;
    pub const PWR_MAN_OFF: u8       = 0x00;

    pub const CP_VID_STD: u8        = 0x05;
    pub const CP_VID_STD_480P: u8   = 0x4A;
    pub const CP_VID_STD_576P: u8   = 0x4B;
    pub const CP_VID_STD_720P: u8   = 0x53;
    pub const CP_VID_STD_1080I: u8  = 0x54;
    pub const CP_VID_STD_1080P: u8  = 0x5E;
    pub const CP_VID_STD_VGA60: u8  = 0x88;

    /// Latched interrupt status; bit 1 flags a new input frequency.
    pub const INT_STATUS: u8        = 0x8A;
    pub const INT_NEW_FREQ: u8      = 0x02;

    pub const RD_INFO1: u8          = 0xDF;
    pub const RD_INFO2: u8          = 0xE0;

    pub const SW_RESET: u8          = 0xFF;
    pub const SW_RESET_VALUE: u8    = 0xFF;
}

pub mod cp {
    pub const CON: u8               = 0x3A;
    pub const SAT: u8               = 0x3B;
    pub const BRI: u8               = 0x3C;
    pub const HUE: u8               = 0x3D;
    pub const VID_ADJ: u8           = 0x3E;
    pub const VID_ADJ_ENABLE: u8    = 0x80;

    /// Horizontal shift of the active video window.
    pub const HSHIFT_CTRL: u8       = 0x8B;
    pub const HSHIFT_START: u8      = 0x8C;
    pub const HSHIFT_END: u8        = 0x8D;
}

pub mod hdmi {
    pub const STATUS1: u8           = 0x07;
    pub const VF_LOCKED: u8         = 0x80;
    pub const DERF_LOCKED: u8       = 0x20;
    pub const LWIDTH_MSBS_MASK: u8  = 0x1F;
    pub const LWIDTH: u8            = 0x08;
    pub const F0HEIGHT_MSBS: u8     = 0x09;
    pub const F0HEIGHT_MSBS_MASK: u8 = 0x1F;
    pub const F0HEIGHT_LSBS: u8     = 0x0A;
    pub const STATUS2: u8           = 0x0B;
    pub const INTERLACED: u8        = 0x20;
}

pub mod sdp {
    pub const CON: u8               = 0x08;
    pub const BRI: u8               = 0x0A;
    pub const HUE: u8               = 0x0B;
    pub const SAT_CB: u8            = 0xE3;
    pub const SAT_CR: u8            = 0xE4;

    /// Selects which sub-map of the SDP bank is visible.
    pub const REG_CTRL: u8          = 0x0E;
    pub const MAIN_MAP_RW: u8       = 0x00;
    pub const RO_MAIN_MAP: u8       = 0x01;

    /// Status register 10 of the read-only main map.
    pub const STATUS10: u8          = 0x10;
    pub const IN_LOCK: u8           = 0x01;
    pub const FSC_LOCK: u8          = 0x04;
    pub const AUTOD_MASK: u8        = 0x70;
    pub const AUTOD_NTSC_M_J: u8    = 0x00;
    pub const AUTOD_NTSC_4_43: u8   = 0x10;
    pub const AUTOD_PAL_M: u8       = 0x20;
    pub const AUTOD_PAL_60: u8      = 0x30;
    pub const AUTOD_PAL_B_G: u8     = 0x40;
    pub const AUTOD_SECAM: u8       = 0x50;
    pub const AUTOD_PAL_COMB: u8    = 0x60;
    pub const AUTOD_SECAM_525: u8   = 0x70;
}

/// Registers shared by both CSI transmitters.
pub mod tx {
    pub const VC_REF: u8            = 0x0D;
    /// DPHY power control; bit 6 is the PLL enable.
    pub const DPHY_PWDN: u8         = 0x1E;
    pub const PLL_EN: u8            = 0x40;
}

/// Largest frame the chip produces.
pub const MAX_WIDTH: u32 = 1920;
pub const MAX_HEIGHT: u32 = 1080;
