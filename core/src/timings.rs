//! Digital video timings and the HDMI video standard table.

/// Timing standards a descriptor conforms to.
pub const STD_CEA861: u32 = 1 << 0;
pub const STD_DMT: u32    = 1 << 1;

/// Capability bits.
pub const CAP_INTERLACED: u32  = 1 << 0;
pub const CAP_PROGRESSIVE: u32 = 1 << 1;

/// Polarity bits.
pub const VSYNC_POS_POL: u32 = 1 << 0;
pub const HSYNC_POS_POL: u32 = 1 << 1;

/// BT.656/1120 style timing descriptor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DvTimings {
    pub width: u32,
    pub height: u32,
    pub interlaced: bool,
    pub polarities: u32,
    /// Hz
    pub pixelclock: u64,
    pub hfrontporch: u32,
    pub hsync: u32,
    pub hbackporch: u32,
    pub vfrontporch: u32,
    pub vsync: u32,
    pub vbackporch: u32,
    pub standards: u32,
}

impl DvTimings {
    #[allow(clippy::too_many_arguments)]
    const fn new(width: u32, height: u32, polarities: u32, pixelclock: u64,
        h: (u32, u32, u32), v: (u32, u32, u32), standards: u32) -> Self
    {
        DvTimings {
            width, height, interlaced: false, polarities, pixelclock,
            hfrontporch: h.0, hsync: h.1, hbackporch: h.2,
            vfrontporch: v.0, vsync: v.1, vbackporch: v.2,
            standards,
        }
    }

    pub const fn htotal(&self) -> u32 {
        self.width + self.hfrontporch + self.hsync + self.hbackporch
    }

    pub const fn vtotal(&self) -> u32 {
        self.height + self.vfrontporch + self.vsync + self.vbackporch
    }

    /// Frame rate in millihertz, or zero for a degenerate descriptor.
    pub const fn refresh_mhz(&self) -> u64 {
        let total = self.htotal() as u64 * self.vtotal() as u64;
        if total == 0 { 0 } else { self.pixelclock * 1000 / total }
    }

    /// Compare two descriptors, allowing `tolerance` Hz of pixel clock drift.
    pub fn matches(&self, other: &DvTimings, tolerance: u64) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.interlaced == other.interlaced
            && self.polarities == other.polarities
            && self.pixelclock.abs_diff(other.pixelclock) <= tolerance
            && self.hfrontporch == other.hfrontporch
            && self.hsync == other.hsync
            && self.hbackporch == other.hbackporch
            && self.vfrontporch == other.vfrontporch
            && self.vsync == other.vsync
            && self.vbackporch == other.vbackporch
    }
}

/// Envelope of timings the receiver accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingsCap {
    pub min_width: u32,
    pub max_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub min_pixelclock: u64,
    pub max_pixelclock: u64,
    pub standards: u32,
    pub capabilities: u32,
}

impl TimingsCap {
    /// True when `t` lies inside this envelope.
    pub fn valid(&self, t: &DvTimings) -> bool {
        let scan_ok = if t.interlaced {
            self.capabilities & CAP_INTERLACED != 0
        } else {
            self.capabilities & CAP_PROGRESSIVE != 0
        };
        let std_ok = self.standards == 0 || t.standards == 0
            || (self.standards & t.standards) != 0;

        (self.min_width..=self.max_width).contains(&t.width)
            && (self.min_height..=self.max_height).contains(&t.height)
            && (self.min_pixelclock..=self.max_pixelclock).contains(&t.pixelclock)
            && scan_ok && std_ok
    }
}

pub const TIMINGS_CAP: TimingsCap = TimingsCap {
    min_width: 640,
    max_width: 1920,
    min_height: 480,
    max_height: 1200,
    // 720x480i59.94 less half a megahertz
    min_pixelclock: 13_000_000,
    // 1600x1200p60
    max_pixelclock: 162_000_000,
    standards: STD_CEA861 | STD_DMT,
    capabilities: CAP_PROGRESSIVE,
};

/// Pixel clock slack allowed when matching a request against the table.
pub const MATCH_TOLERANCE_HZ: u64 = 250_000;

/// A supported HDMI timing and the chip's code for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoStandardEntry {
    pub timings: DvTimings,
    /// Value for the IO video standard register.
    pub vid_std: u8,
    /// Refresh-rate selector within `vid_std`.
    pub v_freq: u8,
}

const POS: u32 = HSYNC_POS_POL | VSYNC_POS_POL;
const NEG: u32 = 0;
const CEA: u32 = STD_CEA861;
const DMT: u32 = STD_DMT;

const fn entry(timings: DvTimings, vid_std: u8, v_freq: u8) -> VideoStandardEntry {
    VideoStandardEntry { timings, vid_std, v_freq }
}

#[rustfmt::skip]
pub static VIDEO_STANDARDS: [VideoStandardEntry; 28] = [
    entry(DvTimings::new(720, 480, NEG, 27_000_000, (16, 62, 60), (9, 6, 30), CEA), 0x4a, 0x00),
    entry(DvTimings::new(720, 576, NEG, 27_000_000, (12, 64, 68), (5, 5, 39), CEA), 0x4b, 0x00),

    entry(DvTimings::new(1280, 720, POS, 74_250_000, (110, 40, 220), (5, 5, 20), CEA), 0x53, 0x00),
    entry(DvTimings::new(1280, 720, POS, 74_250_000, (440, 40, 220), (5, 5, 20), CEA), 0x53, 0x01),
    entry(DvTimings::new(1280, 720, POS, 74_250_000, (1760, 40, 220), (5, 5, 20), CEA), 0x53, 0x02),
    entry(DvTimings::new(1280, 720, POS, 74_250_000, (2420, 40, 220), (5, 5, 20), CEA), 0x53, 0x03),
    entry(DvTimings::new(1280, 720, POS, 59_400_000, (1760, 40, 220), (5, 5, 20), CEA), 0x53, 0x04),

    entry(DvTimings::new(1920, 1080, POS, 148_500_000, (88, 44, 148), (4, 5, 36), CEA), 0x5e, 0x00),
    entry(DvTimings::new(1920, 1080, POS, 148_500_000, (528, 44, 148), (4, 5, 36), CEA), 0x5e, 0x01),
    entry(DvTimings::new(1920, 1080, POS, 74_250_000, (88, 44, 148), (4, 5, 36), CEA), 0x5e, 0x02),
    entry(DvTimings::new(1920, 1080, POS, 74_250_000, (528, 44, 148), (4, 5, 36), CEA), 0x5e, 0x03),
    entry(DvTimings::new(1920, 1080, POS, 74_250_000, (638, 44, 148), (4, 5, 36), CEA), 0x5e, 0x04),

    // SVGA
    entry(DvTimings::new(800, 600, POS, 36_000_000, (24, 72, 128), (1, 2, 22), DMT), 0x80, 0x00),
    entry(DvTimings::new(800, 600, POS, 40_000_000, (40, 128, 88), (1, 4, 23), DMT), 0x81, 0x00),
    entry(DvTimings::new(800, 600, POS, 50_000_000, (56, 120, 64), (37, 6, 23), DMT), 0x82, 0x00),
    entry(DvTimings::new(800, 600, POS, 49_500_000, (16, 80, 160), (1, 3, 21), DMT), 0x83, 0x00),
    entry(DvTimings::new(800, 600, POS, 56_250_000, (32, 64, 152), (1, 3, 27), DMT), 0x84, 0x00),

    // SXGA
    entry(DvTimings::new(1280, 1024, POS, 108_000_000, (48, 112, 248), (1, 3, 38), DMT), 0x85, 0x00),
    entry(DvTimings::new(1280, 1024, POS, 135_000_000, (16, 144, 248), (1, 3, 38), DMT), 0x86, 0x00),

    // VGA
    entry(DvTimings::new(640, 480, NEG, 25_175_000, (8, 96, 40), (2, 2, 25), DMT | CEA), 0x88, 0x00),
    entry(DvTimings::new(640, 480, NEG, 31_500_000, (16, 40, 120), (1, 3, 20), DMT), 0x89, 0x00),
    entry(DvTimings::new(640, 480, NEG, 31_500_000, (16, 64, 120), (1, 3, 16), DMT), 0x8a, 0x00),
    entry(DvTimings::new(640, 480, NEG, 36_000_000, (56, 56, 80), (1, 3, 25), DMT), 0x8b, 0x00),

    // XGA
    entry(DvTimings::new(1024, 768, NEG, 65_000_000, (24, 136, 160), (3, 6, 29), DMT), 0x8c, 0x00),
    entry(DvTimings::new(1024, 768, NEG, 75_000_000, (24, 136, 144), (3, 6, 29), DMT), 0x8d, 0x00),
    entry(DvTimings::new(1024, 768, POS, 78_750_000, (16, 96, 176), (1, 3, 28), DMT), 0x8e, 0x00),
    entry(DvTimings::new(1024, 768, POS, 94_500_000, (48, 96, 208), (1, 3, 36), DMT), 0x8f, 0x00),

    // UXGA
    entry(DvTimings::new(1600, 1200, POS, 162_000_000, (64, 192, 304), (1, 3, 46), DMT), 0x96, 0x00),
];

/// First table entry matching `t` within `tolerance`.
pub fn find_standard(t: &DvTimings, tolerance: u64) -> Option<&'static VideoStandardEntry> {
    VIDEO_STANDARDS.iter().find(|e| t.matches(&e.timings, tolerance))
}

/// The `index`-th table timing inside [TIMINGS_CAP].
pub fn enum_timings(index: usize) -> Option<DvTimings> {
    VIDEO_STANDARDS.iter()
        .map(|e| e.timings)
        .filter(|t| TIMINGS_CAP.valid(t))
        .nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_inside_cap() {
        for e in VIDEO_STANDARDS.iter() {
            assert!(TIMINGS_CAP.valid(&e.timings), "{:?}", e);
        }
        assert_eq!(enum_timings(27), Some(VIDEO_STANDARDS[27].timings));
        assert_eq!(enum_timings(28), None);
    }

    #[test]
    fn refresh_rates() {
        // 1080p60 and 720p50
        assert_eq!(VIDEO_STANDARDS[7].timings.refresh_mhz(), 60_000);
        assert_eq!(VIDEO_STANDARDS[3].timings.refresh_mhz(), 50_000);
        assert_eq!(DvTimings::default().refresh_mhz(), 0);
    }

    #[test]
    fn tolerance_applies_to_pixel_clock_only() {
        let mut t = VIDEO_STANDARDS[7].timings;
        t.pixelclock += 200_000;
        assert_eq!(find_standard(&t, MATCH_TOLERANCE_HZ).map(|e| e.vid_std), Some(0x5e));
        assert!(find_standard(&t, 0).is_none());
        t.pixelclock += 100_000;
        assert!(find_standard(&t, MATCH_TOLERANCE_HZ).is_none());

        let mut t = VIDEO_STANDARDS[7].timings;
        t.hsync += 1;
        assert!(find_standard(&t, MATCH_TOLERANCE_HZ).is_none());
    }

    #[test]
    fn cap_rejects_interlaced_and_oversize() {
        let mut t = VIDEO_STANDARDS[0].timings;
        t.interlaced = true;
        assert!(!TIMINGS_CAP.valid(&t));
        let mut t = VIDEO_STANDARDS[0].timings;
        t.width = 2560;
        assert!(!TIMINGS_CAP.valid(&t));
        let mut t = VIDEO_STANDARDS[0].timings;
        t.pixelclock = 12_000_000;
        assert!(!TIMINGS_CAP.valid(&t));
    }
}
