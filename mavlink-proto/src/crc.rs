//! X.25 checksum for MAVLink frames.
//!
//! MAVLink uses CRC-16/MCRF4XX over the frame header (without the start
//! byte) and payload, followed by one per-message `CRC_EXTRA` byte derived
//! from the message definition.

use crc::{Crc, CRC_16_MCRF4XX};

const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Checksum of a header-plus-payload slice, seeded with `crc_extra`.
#[inline]
#[must_use]
pub fn frame_checksum(data: &[u8], crc_extra: u8) -> u16 {
    let mut digest = FrameDigest::new();
    digest.update_slice(data);
    digest.finalize(crc_extra)
}

/// Incremental frame checksum, fed while a frame is written.
pub struct FrameDigest {
    digest: crc::Digest<'static, u16>,
}

impl FrameDigest {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            digest: CRC16.digest(),
        }
    }

    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.digest.update(&[byte]);
    }

    #[inline]
    pub fn update_slice(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Append the message's `CRC_EXTRA` and return the checksum.
    #[inline]
    #[must_use]
    pub fn finalize(mut self, crc_extra: u8) -> u16 {
        self.digest.update(&[crc_extra]);
        self.digest.finalize()
    }
}

impl Default for FrameDigest {
    fn default() -> Self {
        Self::new()
    }
}
