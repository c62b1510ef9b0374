//! Vendor-recommended register scripts.
//!
//! Anything marked "required" is an undocumented write the vendor's
//! bring-up notes insist on.

use crate::bus::bank::Bank;
use crate::script::RegisterOp;
use crate::script::RegisterOp::{End, Wait};
use crate::script::edid::EDID_WRITES;

const fn io(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Io, reg, val) }
const fn cp(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Cp, reg, val) }
const fn hdmi(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Hdmi, reg, val) }
const fn rep(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Repeater, reg, val) }
const fn sdp(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Sdp, reg, val) }
const fn txa(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Txa, reg, val) }
const fn txb(reg: u8, val: u8) -> RegisterOp { RegisterOp::w(Bank::Txb, reg, val) }

/// Remap write binding `bank` to its default address.
const fn bind(bank: Bank) -> RegisterOp {
    match bank.remap_reg() {
        Some(reg) => io(reg, bank.default_addr() << 1),
        None => panic!("IO bank cannot be remapped"),
    }
}

/// Join `parts` into a single script with one END appended.
const fn splice<const N: usize>(parts: &[&[RegisterOp]]) -> [RegisterOp; N] {
    let mut out = [End; N];
    let mut n = 0;
    let mut p = 0;
    while p < parts.len() {
        let mut i = 0;
        while i < parts[p].len() {
            out[n] = parts[p][i];
            n += 1;
            i += 1;
        }
        p += 1;
    }
    assert!(n + 1 == N, "script length mismatch");
    out
}

const fn total_len(parts: &[&[RegisterOp]]) -> usize {
    let mut n = 1;
    let mut p = 0;
    while p < parts.len() {
        n += parts[p].len();
        p += 1;
    }
    n
}

pub static SW_RESET: [RegisterOp; 5] = [
    io(0xFF, 0xFF),     // soft reset
    Wait(5),
    io(0x01, 0x76),     // required
    io(0xF2, 0x01),     // read auto-increment
    End,
];

const REMAP: [RegisterOp; 10] = [
    bind(Bank::Dpll),
    bind(Bank::Cp),
    bind(Bank::Hdmi),
    bind(Bank::Edid),
    bind(Bank::Repeater),
    bind(Bank::Infoframe),
    bind(Bank::Cec),
    bind(Bank::Sdp),
    bind(Bank::Txb),
    bind(Bank::Txa),
];

const REMAP_PARTS: [&[RegisterOp]; 1] = [&REMAP];

/// Bind every bank except IO to its default address.
pub static SET_SLAVE_ADDRESS: [RegisterOp; total_len(&REMAP_PARTS)] = splice(&REMAP_PARTS);

const HDMI_PRE_EDID: [RegisterOp; 23] = [
    io(0x00, 0x40),     // chip powerdown off, HDMI Rx on
    rep(0x40, 0x83),    // HDCP 1.1
    hdmi(0x00, 0x08),   // foreground channel A
    hdmi(0x98, 0xFF),
    hdmi(0x99, 0xA3),
    hdmi(0x9A, 0x00),
    hdmi(0x9B, 0x0A),
    hdmi(0x9D, 0x40),
    hdmi(0xCB, 0x09),
    hdmi(0x3D, 0x10),
    hdmi(0x3E, 0x7B),
    hdmi(0x3F, 0x5E),
    hdmi(0x4E, 0xFE),
    hdmi(0x4F, 0x18),
    hdmi(0x57, 0xA3),
    hdmi(0x58, 0x04),
    hdmi(0x85, 0x10),
    hdmi(0x83, 0x00),   // all terminations on
    hdmi(0xA3, 0x01),
    hdmi(0xBE, 0x00),
    hdmi(0x6C, 0x00),   // HPA manual
    hdmi(0xF8, 0x00),   // HPA deasserted while EDID loads
    hdmi(0x0F, 0x00),   // fastest audio mute
];

const HDMI_POST_EDID: [RegisterOp; 29] = [
    rep(0x70, 0x10),    // EDID size: two blocks
    hdmi(0x6C, 0x01),
    hdmi(0xF8, 0x01),   // HPA asserted
    rep(0x74, 0x01),    // manual E-EDID on port A
    io(0x04, 0x00),
    io(0x12, 0xF2),     // CSC follows input packets
    io(0x17, 0x80),     // luma/chroma up to 254
    io(0x03, 0x86),     // insert AV codes
    cp(0x7C, 0x00),
    io(0x0C, 0xE0),     // LLC DLL, double LLC timing
    io(0x0E, 0xDD),     // pins tristated, audio out enabled
    io(0x10, 0xA0),     // 4-lane CSI TX and pixel port
    txa(0x00, 0x84),    // 4-lane MIPI
    txa(0x00, 0xA4),    // auto DPHY timing
    txa(0xDB, 0x10),
    txa(0xD6, 0x07),
    txa(0xC4, 0x0A),
    txa(0x71, 0x33),
    txa(0x72, 0x11),
    txa(0xF0, 0x00),    // dphy_pwdn = 0
    txa(0x31, 0x82),
    txa(0x1E, 0x40),
    txa(0xDA, 0x01),    // mipi_pll_en = 1
    Wait(2),
    txa(0x00, 0x24),    // power up CSI TX
    Wait(1),
    txa(0xC1, 0x2B),
    Wait(1),
    txa(0x31, 0x80),
];

const HDMI_INIT_PARTS: [&[RegisterOp]; 4] = [
    &REMAP,
    &HDMI_PRE_EDID,
    &EDID_WRITES,
    &HDMI_POST_EDID,
];

/// HDMI input to CSI-TXA, four lanes, EDID included.
pub static INIT_TXA_4LANE: [RegisterOp; total_len(&HDMI_INIT_PARTS)] = splice(&HDMI_INIT_PARTS);

/// Output colorspace: RGB out of the CP block.
pub static INIT_TXA_RGB: [RegisterOp; 3] = [
    io(0x04, 0x02),
    io(0x12, 0xF0),
    End,
];

/// Output colorspace: YCbCr out of the CP block.
pub static INIT_TXA_YUV: [RegisterOp; 3] = [
    io(0x04, 0x00),
    io(0x12, 0xF2),
    End,
];

const SDP_INIT: [RegisterOp; 17] = [
    io(0x0E, 0xFF),     // pins tristated
    sdp(0x0F, 0x00),    // exit power down
    sdp(0x52, 0xCD),
    sdp(0x00, 0x00),    // CVBS in on AIN1
    sdp(0x0E, 0x80),
    sdp(0x9C, 0x00),
    sdp(0x9C, 0xFF),
    sdp(0x0E, 0x00),    // back to the main map
    sdp(0x80, 0x51),
    sdp(0x81, 0x51),
    sdp(0x82, 0x68),
    sdp(0x03, 0x42),    // tristate output drivers, power down 656 pads
    sdp(0x04, 0xB5),    // BT.656-4
    sdp(0x13, 0x00),
    sdp(0x17, 0x41),    // SH1
    sdp(0x31, 0x12),
    sdp(0xE6, 0x4F),    // manual V bit end in NTSC
];

const TXB_INIT: [RegisterOp; 18] = [
    io(0x10, 0x70),     // 1-lane TX, SD through the pixel port
    txb(0x00, 0x81),    // 1-lane MIPI
    txb(0x00, 0xA1),    // auto DPHY timing
    txb(0xD2, 0x40),
    txb(0xC4, 0x0A),
    txb(0x71, 0x33),
    txb(0x72, 0x11),
    txb(0xF0, 0x00),
    txb(0x31, 0x82),
    txb(0x1E, 0x40),
    txb(0xDA, 0x01),
    Wait(2),
    txb(0x00, 0x21),    // power up CSI TX
    Wait(1),
    txb(0xC1, 0x2B),
    Wait(1),
    txb(0x31, 0x80),
    txa(0x7E, 0xA8),
];

const TXB_INIT_PARTS: [&[RegisterOp]; 4] = [
    &[io(0x00, 0x30), io(0xF2, 0x01)],    // HDMI Rx down, read auto-increment
    &REMAP,
    &SDP_INIT,
    &TXB_INIT,
];

/// Composite input on AIN1 to CSI-TXB, one lane.
pub static INIT_TXB_1LANE: [RegisterOp; total_len(&TXB_INIT_PARTS)] = splice(&TXB_INIT_PARTS);

pub static POWER_UP_TXA_4LANE: [RegisterOp; 12] = [
    txa(0x00, 0x84),
    txa(0x00, 0xA4),
    txa(0x31, 0x82),
    txa(0x1E, 0x40),
    txa(0xDA, 0x01),
    Wait(2),
    txa(0x00, 0x24),
    Wait(1),
    txa(0xC1, 0x2B),
    Wait(1),
    txa(0x31, 0x80),
    End,
];

pub static POWER_DOWN_TXA_4LANE: [RegisterOp; 6] = [
    txa(0x31, 0x82),
    txa(0x1E, 0x00),
    txa(0x00, 0x84),
    txa(0xDA, 0x01),
    txa(0xC1, 0x3B),
    End,
];

pub static POWER_UP_TXB_1LANE: [RegisterOp; 12] = [
    txb(0x00, 0x81),
    txb(0x00, 0xA1),
    txb(0x31, 0x82),
    txb(0x1E, 0x40),
    txb(0xDA, 0x01),
    Wait(2),
    txb(0x00, 0x21),
    Wait(1),
    txb(0xC1, 0x2B),
    Wait(1),
    txb(0x31, 0x80),
    End,
];

pub static POWER_DOWN_TXB_1LANE: [RegisterOp; 6] = [
    txb(0x31, 0x82),
    txb(0x1E, 0x00),
    txb(0x00, 0x81),
    txb(0xDA, 0x01),
    txb(0xC1, 0x3B),
    End,
];

pub static POWER_UP_HDMI_RX: [RegisterOp; 2] = [io(0x00, 0x40), End];
pub static POWER_DOWN_HDMI_RX: [RegisterOp; 2] = [io(0x00, 0x30), End];

/// Both CSI transmitters and the pixel port.
pub static ENABLE_CSI4_CSI1: [RegisterOp; 2] = [io(0x10, 0xE0), End];

const fn virtual_channel(vc: u8) -> [RegisterOp; 3] {
    [txb(0x0D, vc << 6), txa(0x0D, vc << 6), End]
}

/// Virtual channel assignment for both transmitters, indexed by channel.
pub static SET_VIRTUAL_CHANNEL: [[RegisterOp; 3]; 4] = [
    virtual_channel(0),
    virtual_channel(1),
    virtual_channel(2),
    virtual_channel(3),
];

pub static COLORBAR_HDMI: [RegisterOp; 2] = [cp(0x37, 0x81), End];
pub static COLORBAR_SDP: [RegisterOp; 3] = [sdp(0x0C, 0x01), sdp(0x14, 0x01), End];

pub static SUSPEND: [RegisterOp; 2] = [io(0x0C, 0x00), End];
pub static RESUME: [RegisterOp; 2] = [io(0x0C, 0xE0), End];

/// Every constant script, by name.
pub fn all() -> Vec<(&'static str, &'static [RegisterOp])> {
    vec![
        ("sw_reset", &SW_RESET[..]),
        ("set_slave_address", &SET_SLAVE_ADDRESS[..]),
        ("init_txa_4lane", &INIT_TXA_4LANE[..]),
        ("init_txa_rgb", &INIT_TXA_RGB[..]),
        ("init_txa_yuv", &INIT_TXA_YUV[..]),
        ("init_txb_1lane", &INIT_TXB_1LANE[..]),
        ("power_up_txa_4lane", &POWER_UP_TXA_4LANE[..]),
        ("power_down_txa_4lane", &POWER_DOWN_TXA_4LANE[..]),
        ("power_up_txb_1lane", &POWER_UP_TXB_1LANE[..]),
        ("power_down_txb_1lane", &POWER_DOWN_TXB_1LANE[..]),
        ("power_up_hdmi_rx", &POWER_UP_HDMI_RX[..]),
        ("power_down_hdmi_rx", &POWER_DOWN_HDMI_RX[..]),
        ("enable_csi4_csi1", &ENABLE_CSI4_CSI1[..]),
        ("set_virtual_channel0", &SET_VIRTUAL_CHANNEL[0][..]),
        ("set_virtual_channel1", &SET_VIRTUAL_CHANNEL[1][..]),
        ("set_virtual_channel2", &SET_VIRTUAL_CHANNEL[2][..]),
        ("set_virtual_channel3", &SET_VIRTUAL_CHANNEL[3][..]),
        ("colorbar_hdmi", &COLORBAR_HDMI[..]),
        ("colorbar_sdp", &COLORBAR_SDP[..]),
        ("suspend", &SUSPEND[..]),
        ("resume", &RESUME[..]),
    ]
}
