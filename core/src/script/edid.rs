//! EDID image presented on the HDMI port.

use crate::bus::bank::Bank;
use crate::script::RegisterOp;

pub const EDID_BLOCK_LEN: usize = 128;

/// Base block plus one CEA-861 extension block.
pub const EDID: [u8; 2 * EDID_BLOCK_LEN] = [
    0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x4c, 0x2d, 0x9e, 0x07, 0x00, 0x00, 0x00, 0x00,
    0x25, 0x15, 0x01, 0x03, 0x80, 0x3c, 0x22, 0x78, 0x2a, 0xee, 0x91, 0xa3, 0x54, 0x4c, 0x99, 0x26,
    0x0f, 0x50, 0x54, 0x23, 0x08, 0x00, 0x81, 0x80, 0x81, 0x40, 0x81, 0x00, 0x95, 0x00, 0xb3, 0x00,
    0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x02, 0x3a, 0x80, 0x18, 0x71, 0x38, 0x2d, 0x40, 0x58, 0x2c,
    0x45, 0x00, 0x56, 0x50, 0x21, 0x00, 0x00, 0x1e, 0x02, 0x3a, 0x80, 0xd0, 0x72, 0x38, 0x2d, 0x40,
    0x10, 0x2c, 0x45, 0x80, 0x56, 0x50, 0x21, 0x00, 0x00, 0x1e, 0x00, 0x00, 0x00, 0xfd, 0x00, 0x18,
    0x4b, 0x1a, 0x51, 0x17, 0x00, 0x0a, 0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x00, 0x00, 0x00, 0xfc,
    0x00, 0x53, 0x32, 0x37, 0x41, 0x39, 0x35, 0x30, 0x44, 0x0a, 0x20, 0x20, 0x20, 0x20, 0x01, 0x07,

    0x02, 0x03, 0x28, 0xf1, 0x49, 0x90, 0x1f, 0x04, 0x13, 0x05, 0x14, 0x03, 0x12, 0x20, 0x23, 0x09,
    0x07, 0x07, 0x83, 0x01, 0x00, 0x00, 0xe2, 0x00, 0x0f, 0x6e, 0x03, 0x0c, 0x00, 0x10, 0x00, 0x00,
    0x2d, 0x20, 0x90, 0x04, 0x08, 0x10, 0x18, 0x10, 0x01, 0x1d, 0x00, 0x72, 0x51, 0xd0, 0x1e, 0x20,
    0x6e, 0x28, 0x55, 0x00, 0x56, 0x50, 0x21, 0x00, 0x00, 0x1e, 0x01, 0x1d, 0x00, 0xbc, 0x52, 0xd0,
    0x1e, 0x20, 0xb8, 0x28, 0x55, 0x40, 0x56, 0x50, 0x21, 0x00, 0x00, 0x1e, 0x01, 0x1d, 0x80, 0x18,
    0x71, 0x1c, 0x16, 0x20, 0x58, 0x2c, 0x25, 0x00, 0x56, 0x50, 0x21, 0x00, 0x00, 0x9e, 0x01, 0x1d,
    0x80, 0xd0, 0x72, 0x1c, 0x16, 0x20, 0x10, 0x2c, 0x25, 0x80, 0x56, 0x50, 0x21, 0x00, 0x00, 0x9e,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xd6,
];

/// One EDID bank write per byte of [EDID], without an END marker.
pub const EDID_WRITES: [RegisterOp; EDID.len()] = edid_writes(&EDID);

const fn edid_writes(image: &[u8; 2 * EDID_BLOCK_LEN]) -> [RegisterOp; 2 * EDID_BLOCK_LEN] {
    let mut ops = [RegisterOp::End; 2 * EDID_BLOCK_LEN];
    let mut i = 0;
    while i < image.len() {
        ops[i] = RegisterOp::w(Bank::Edid, i as u8, image[i]);
        i += 1;
    }
    ops
}

/// True when every 128-byte block of `image` sums to zero.
pub fn checksums_valid(image: &[u8]) -> bool {
    image.len() % EDID_BLOCK_LEN == 0 && image.chunks(EDID_BLOCK_LEN)
        .all(|blk| blk.iter().fold(0u8, |acc, b| acc.wrapping_add(*b)) == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_checksums() {
        assert!(checksums_valid(&EDID));
        let mut broken = EDID;
        broken[10] ^= 1;
        assert!(!checksums_valid(&broken));
    }

    #[test]
    fn header_and_extension_tag() {
        assert_eq!(&EDID[0..8], &[0x00, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00]);
        // One extension block follows, tagged CEA-861.
        assert_eq!(EDID[126], 1);
        assert_eq!(EDID[128], 0x02);
    }

    #[test]
    fn writes_cover_every_register() {
        for (i, op) in EDID_WRITES.iter().enumerate() {
            assert_eq!(*op, RegisterOp::w(Bank::Edid, i as u8, EDID[i]));
        }
    }
}
