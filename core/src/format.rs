//! Media bus pixel formats exchanged with the capture pipeline.

/// Pixel code carried on the CSI link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MbusCode {
    Rgb888_1x24,
    Rgb888_1x32Padhi,
    Uyvy8_2x8,
    Vyuy8_2x8,
    Yuyv8_2x8,
    Yvyu8_2x8,
    Uyvy8_1x16,
    Vyuy8_1x16,
    Yuyv8_1x16,
    Yvyu8_1x16,
    /// Any code this driver has no name for.
    Other(u32),
}

impl MbusCode {
    pub const fn raw(self) -> u32 {
        use MbusCode::*;
        match self {
            Rgb888_1x24      => 0x100a,
            Rgb888_1x32Padhi => 0x100f,
            Uyvy8_2x8        => 0x2006,
            Vyuy8_2x8        => 0x2007,
            Yuyv8_2x8        => 0x2008,
            Yvyu8_2x8        => 0x2009,
            Uyvy8_1x16       => 0x200f,
            Vyuy8_1x16       => 0x2010,
            Yuyv8_1x16       => 0x2011,
            Yvyu8_1x16       => 0x2012,
            Other(x)         => x,
        }
    }

    pub const fn from_raw(x: u32) -> Self {
        use MbusCode::*;
        match x {
            0x100a => Rgb888_1x24,
            0x100f => Rgb888_1x32Padhi,
            0x2006 => Uyvy8_2x8,
            0x2007 => Vyuy8_2x8,
            0x2008 => Yuyv8_2x8,
            0x2009 => Yvyu8_2x8,
            0x200f => Uyvy8_1x16,
            0x2010 => Vyuy8_1x16,
            0x2011 => Yuyv8_1x16,
            0x2012 => Yvyu8_1x16,
            _ => Other(x),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Colorspace {
    #[default]
    Default,
    Smpte170m,
    Rec709,
    Srgb,
}

/// Field order of a frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Let the driver pick.
    #[default]
    Any,
    /// Progressive.
    None,
    Top,
    Bottom,
    Interlaced,
}

impl Field {
    pub const fn from_progressive(progressive: bool) -> Self {
        if progressive { Field::None } else { Field::Interlaced }
    }
}

/// Whether a pad format request applies to the hardware or is a negotiation probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatWhich {
    Try,
    Active,
}

/// Frame format on the source pad.
///
/// `None` for `code` on input means no preference.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MbusFrameFmt {
    pub width: u32,
    pub height: u32,
    pub code: Option<MbusCode>,
    pub colorspace: Colorspace,
    pub field: Field,
}

/// Colorspace the CP block converts HDMI input to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputSpace {
    Rgb,
    Yuv,
}

impl OutputSpace {
    /// Pick the CP output conversion and reported colorspace for a requested code.
    ///
    /// Returns `None` for codes with no HDMI output mapping.
    pub const fn for_code(code: MbusCode) -> Option<(OutputSpace, Colorspace)> {
        use MbusCode::*;
        match code {
            Yuyv8_2x8 | Vyuy8_2x8 | Uyvy8_2x8 => Some((OutputSpace::Rgb, Colorspace::Srgb)),
            Yvyu8_2x8 | Yuyv8_1x16 | Vyuy8_1x16 | Uyvy8_1x16 | Yvyu8_1x16 =>
                Some((OutputSpace::Yuv, Colorspace::Rec709)),
            Rgb888_1x32Padhi | Rgb888_1x24 => Some((OutputSpace::Rgb, Colorspace::Srgb)),
            Other(_) => None,
        }
    }
}

/// A rectangle in the active frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Cropping limits and default rectangle. Scaling is not supported.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CropCap {
    pub bounds: Rect,
    pub defrect: Rect,
    /// Pixel aspect as (numerator, denominator).
    pub pixelaspect: (u32, u32),
}

/// Inclusive range of frame sizes the source pad can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSizeRange {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
}
