//! Input format detection from the chip's status registers.

use log::{debug, info, warn};

use crate::bus::*;
use crate::bus::bank::Bank;
use crate::error::{Error, Result};
use crate::regs::{cp, hdmi, io, sdp};
use crate::standard::VideoStd;

/// Active video as reported by the HDMI receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub progressive: bool,
}

impl VideoInfo {
    pub const fn new(width: u32, height: u32, progressive: bool) -> Self {
        VideoInfo { width, height, progressive }
    }
}

/// Horizontal shift applied to the active window, as (start, end) offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HShift {
    /// Window left where it is.
    Neutral,
    /// Shifted left for sources with a 40-clock hsync.
    Left(u8),
}

/// A resolution the CP block has a register setting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionEntry {
    pub info: VideoInfo,
    pub vid_std: u8,
    pub hshift: HShift,
}

const fn res(width: u32, height: u32, progressive: bool, vid_std: u8, hshift: HShift) -> ResolutionEntry {
    ResolutionEntry { info: VideoInfo::new(width, height, progressive), vid_std, hshift }
}

pub static RESOLUTIONS: [ResolutionEntry; 6] = [
    res(640, 480, true, io::CP_VID_STD_VGA60, HShift::Neutral),
    res(720, 480, true, io::CP_VID_STD_480P, HShift::Neutral),
    res(720, 576, true, io::CP_VID_STD_576P, HShift::Neutral),
    res(1280, 720, true, io::CP_VID_STD_720P, HShift::Left(0xD8)),
    res(1920, 1080, true, io::CP_VID_STD_1080P, HShift::Left(0xD4)),
    res(1920, 1080, false, io::CP_VID_STD_1080I, HShift::Left(0xD4)),
];

/// Setting used when nothing is locked.
pub const FALLBACK: ResolutionEntry = res(1920, 1080, true, io::CP_VID_STD_480P, HShift::Neutral);

/// Look up the register setting for a detected resolution.
pub fn match_resolution(info: &VideoInfo) -> Result<&'static ResolutionEntry> {
    RESOLUTIONS.iter().find(|e| e.info == *info).ok_or(Error::UnsupportedFormat {
        width: info.width,
        height: info.height,
        progressive: info.progressive,
    })
}

/// Read the HDMI receiver's lock state and active frame size.
///
/// `Ok(None)` means no signal: either lock flag is clear.
pub fn read_video_info<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>) -> Result<Option<VideoInfo>> {
    let status1 = bus.read_register(Bank::Hdmi, hdmi::STATUS1)?;
    if status1 & hdmi::VF_LOCKED == 0 || status1 & hdmi::DERF_LOCKED == 0 {
        debug!(target: "DETECT", "HDMI not locked (status1 {status1:02x})");
        return Ok(None);
    }

    let status2 = bus.read_register(Bank::Hdmi, hdmi::STATUS2)?;
    let progressive = status2 & hdmi::INTERLACED == 0;

    let lsb = bus.read_register(Bank::Hdmi, hdmi::LWIDTH)?;
    let width = ((status1 & hdmi::LWIDTH_MSBS_MASK) as u32) << 8 | lsb as u32;

    let msb = bus.read_register(Bank::Hdmi, hdmi::F0HEIGHT_MSBS)?;
    let lsb = bus.read_register(Bank::Hdmi, hdmi::F0HEIGHT_LSBS)?;
    let mut height = ((msb & hdmi::F0HEIGHT_MSBS_MASK) as u32) << 8 | lsb as u32;
    // Field height; a frame is two fields.
    if !progressive {
        height *= 2;
    }

    if width == 0 || height == 0 {
        return Err(Error::InconsistentStatus { width, height });
    }
    debug!(target: "DETECT", "HDMI {width}x{height}{}", if progressive { 'p' } else { 'i' });
    Ok(Some(VideoInfo { width, height, progressive }))
}

/// Program the CP block for `entry`: horizontal shift, then the standard register.
pub fn write_resolution<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>, entry: &ResolutionEntry)
    -> Result<()>
{
    let (ctrl_a, ctrl_b, off) = match entry.hshift {
        HShift::Left(off) => (0x43, 0x4F, off),
        HShift::Neutral => (0x40, 0x40, 0x00),
    };
    bus.write_register(Bank::Cp, cp::HSHIFT_CTRL, ctrl_a)?;
    bus.write_register(Bank::Cp, cp::HSHIFT_START, off)?;
    bus.write_register(Bank::Cp, cp::HSHIFT_CTRL, ctrl_b)?;
    bus.write_register(Bank::Cp, cp::HSHIFT_END, off)?;
    bus.write_register(Bank::Io, io::CP_VID_STD, entry.vid_std)?;
    Ok(())
}

/// Detect the HDMI input and program the matching active resolution.
///
/// With no signal, or a lock on a zero-sized frame, the neutral fallback is
/// programmed. An unsupported resolution is reported without touching the
/// CP block.
pub fn program_active_resolution<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>)
    -> Result<Option<VideoInfo>>
{
    let info = match read_video_info(bus) {
        Ok(info) => info,
        Err(e @ Error::InconsistentStatus { .. }) => {
            warn!(target: "DETECT", "{e}, using fallback");
            None
        },
        Err(e) => return Err(e),
    };
    let entry = match info {
        Some(ref info) => {
            let e = match_resolution(info)?;
            info!(target: "DETECT", "active resolution {}x{}{}", info.width, info.height,
                if info.progressive { 'p' } else { 'i' });
            e
        },
        None => &FALLBACK,
    };
    write_resolution(bus, entry)?;
    Ok(info)
}

/// Decode SDP status register 10 into a video standard.
///
/// Without input lock the standard is unknown. FSC lock is not considered.
pub fn decode_sdp_status(status10: u8) -> VideoStd {
    if status10 & sdp::IN_LOCK == 0 {
        return VideoStd::UNKNOWN;
    }
    match status10 & sdp::AUTOD_MASK {
        sdp::AUTOD_NTSC_M_J  => VideoStd::NTSC,
        sdp::AUTOD_NTSC_4_43 => VideoStd::NTSC_443,
        sdp::AUTOD_PAL_M     => VideoStd::PAL_M,
        sdp::AUTOD_PAL_60    => VideoStd::PAL_60,
        sdp::AUTOD_PAL_B_G   => VideoStd::PAL,
        sdp::AUTOD_SECAM     => VideoStd::SECAM,
        sdp::AUTOD_PAL_COMB  => VideoStd::PAL_N.union(VideoStd::PAL_NC),
        sdp::AUTOD_SECAM_525 => VideoStd::SECAM,
        _ => VideoStd::UNKNOWN,
    }
}

/// True when the SDP reports input lock.
pub const fn sdp_locked(status10: u8) -> bool {
    status10 & sdp::IN_LOCK != 0
}

/// Switch the SDP bank to its read-only map and read status register 10.
pub fn read_sdp_status<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>) -> Result<u8> {
    bus.write_register(Bank::Sdp, sdp::REG_CTRL, sdp::RO_MAIN_MAP)?;
    let status = bus.read_register(Bank::Sdp, sdp::STATUS10)?;
    Ok(status)
}

/// Detect the analog standard on the composite input.
pub fn detect_standard<B: I2cBus, D: Delay>(bus: &mut BankedBus<B, D>) -> Result<VideoStd> {
    let status = read_sdp_status(bus)?;
    let std = decode_sdp_status(status);
    let fsc = status & sdp::FSC_LOCK != 0;
    if std.is_unknown() {
        warn!(target: "DETECT", "no composite input (status10 {status:02x})");
    } else if std.is_pal() && fsc {
        info!(target: "DETECT", "detected PAL input ({std})");
    } else if std.is_ntsc() && fsc {
        info!(target: "DETECT", "detected NTSC input ({std})");
    } else {
        info!(target: "DETECT", "composite standard {std}, fsc lock {fsc}");
    }
    Ok(std)
}
