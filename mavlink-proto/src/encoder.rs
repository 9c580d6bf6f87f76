//! MAVLink 1 frame encoder.
//!
//! Outgoing traffic is framed as MAVLink 1, which every ground station
//! accepts and which never truncates payloads.
//!
//! # Frame Format
//!
//! ```text
//! STX(0xFE) LEN SEQ SYSID COMPID MSGID PAYLOAD[LEN] CRC_LO CRC_HI
//! ```
//!
//! # Example
//!
//! ```
//! use mavlink_proto::{FrameEncoder, ParamRequestList, MAVLINK_STX_V1};
//!
//! let mut encoder = FrameEncoder::new(1, 200);
//! let mut buf = [0u8; 16];
//! let msg = ParamRequestList { target_system: 1, target_component: 0 };
//! let len = encoder.encode(&msg, &mut buf).unwrap();
//!
//! assert_eq!(len, 10);
//! assert_eq!(buf[0], MAVLINK_STX_V1);
//! ```

use crate::crc::FrameDigest;
use crate::messages::MavPayload;
use crate::parser::MAVLINK_STX_V1;

/// Bytes added around the payload of a MAVLink 1 frame.
pub const V1_OVERHEAD: usize = 8;

/// Error type for frame encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer cannot hold the frame.
    BufferTooSmall,
    /// Message ID does not fit a MAVLink 1 header.
    IdOutOfRange,
}

/// Frame writer with the running checksum.
struct FrameBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
    crc: FrameDigest,
}

impl<'a> FrameBuf<'a> {
    #[inline]
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            crc: FrameDigest::new(),
        }
    }

    /// Write a byte outside the checksum (start byte, checksum itself).
    #[inline]
    fn write_raw(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    #[inline]
    fn write(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.crc.update(byte);
        self.pos += 1;
    }
}

/// Sender identity and rolling sequence number for one link.
#[derive(Debug, Clone)]
pub struct FrameEncoder {
    system_id: u8,
    component_id: u8,
    sequence: u8,
}

impl FrameEncoder {
    #[must_use]
    pub const fn new(system_id: u8, component_id: u8) -> Self {
        Self {
            system_id,
            component_id,
            sequence: 0,
        }
    }

    /// Sequence number the next frame will carry.
    #[inline]
    #[must_use]
    pub fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Frame `msg` into `buf` and return the frame length.
    ///
    /// The sequence number only advances when a frame is written.
    pub fn encode<P: MavPayload>(&mut self, msg: &P, buf: &mut [u8]) -> Result<usize, EncodeError> {
        let msg_id = u8::try_from(P::ID).map_err(|_| EncodeError::IdOutOfRange)?;
        let frame_len = P::LEN + V1_OVERHEAD;
        if buf.len() < frame_len {
            return Err(EncodeError::BufferTooSmall);
        }

        let mut out = FrameBuf::new(buf);
        out.write_raw(MAVLINK_STX_V1);
        out.write(P::LEN as u8);
        out.write(self.sequence);
        out.write(self.system_id);
        out.write(self.component_id);
        out.write(msg_id);

        let start = out.pos;
        msg.encode(&mut out.buf[start..start + P::LEN]);
        out.crc.update_slice(&out.buf[start..start + P::LEN]);
        out.pos += P::LEN;

        let crc = out.crc.finalize(P::CRC_EXTRA).to_le_bytes();
        let end = out.pos;
        out.buf[end] = crc[0];
        out.buf[end + 1] = crc[1];

        self.sequence = self.sequence.wrapping_add(1);
        Ok(frame_len)
    }
}
