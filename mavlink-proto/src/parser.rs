//! Minimal byte-at-a-time MAVLink frame parser.
//!
//! Accepts MAVLink 1 and MAVLink 2 framing and decodes the parameter
//! microservice messages. It does not depend on external MAVLink crates to
//! avoid atomic limitations on Cortex-M0 targets.

use crate::crc::frame_checksum;
use crate::messages::MavMessage;

/// MAVLink 1 start byte.
pub const MAVLINK_STX_V1: u8 = 0xFE;

/// MAVLink 2 start byte.
pub const MAVLINK_STX_V2: u8 = 0xFD;

/// Maximum MAVLink frame size (signed MAVLink 2 with full payload).
pub const MAX_FRAME_SIZE: usize = 280;

/// Maximum payload length.
pub const MAX_PAYLOAD_LEN: usize = 255;

const HEADER_LEN_V1: usize = 6;
const HEADER_LEN_V2: usize = 10;
const CHECKSUM_LEN: usize = 2;
const SIGNATURE_LEN: usize = 13;

/// MAVLink 2 incompatibility flag: frame carries a signature.
const IFLAG_SIGNED: u8 = 0x01;

/// Parser error. The parser is reset and ready for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// MAVLink 1 payload shorter than the message definition.
    Incomplete,
    /// CRC mismatch.
    CrcError,
}

/// MAVLink frame parser.
pub struct MavlinkParser {
    buffer: [u8; MAX_FRAME_SIZE],
    pos: usize,
    state: ParserState,
}

#[derive(Clone, Copy)]
enum ParserState {
    WaitingForStart,
    ReadingHeader,
    ReadingPayload { expected_len: usize },
}

impl MavlinkParser {
    /// Create a new parser.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0u8; MAX_FRAME_SIZE],
            pos: 0,
            state: ParserState::WaitingForStart,
        }
    }

    /// Reset parser state.
    pub fn reset(&mut self) {
        self.pos = 0;
        self.state = ParserState::WaitingForStart;
    }

    /// `true` between frames, when no start byte has been seen yet.
    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ParserState::WaitingForStart)
    }

    /// Feed a byte to the parser.
    ///
    /// Returns `Some(message)` if a complete valid message was parsed.
    pub fn push_byte(&mut self, byte: u8) -> Result<Option<MavMessage>, ParseError> {
        match self.state {
            ParserState::WaitingForStart => {
                if byte == MAVLINK_STX_V1 || byte == MAVLINK_STX_V2 {
                    self.buffer[0] = byte;
                    self.pos = 1;
                    self.state = ParserState::ReadingHeader;
                }
                Ok(None)
            }
            ParserState::ReadingHeader => {
                self.buffer[self.pos] = byte;
                self.pos += 1;

                let header_len = self.header_len();
                if self.pos >= header_len {
                    let payload_len = usize::from(self.buffer[1]);
                    let mut expected_len = header_len + payload_len + CHECKSUM_LEN;
                    if self.is_v2() && self.buffer[2] & IFLAG_SIGNED != 0 {
                        expected_len += SIGNATURE_LEN;
                    }
                    self.state = ParserState::ReadingPayload { expected_len };
                }
                Ok(None)
            }
            ParserState::ReadingPayload { expected_len } => {
                self.buffer[self.pos] = byte;
                self.pos += 1;

                if self.pos >= expected_len {
                    let result = self.parse_frame();
                    self.reset();
                    result
                } else {
                    Ok(None)
                }
            }
        }
    }

    #[inline]
    fn is_v2(&self) -> bool {
        self.buffer[0] == MAVLINK_STX_V2
    }

    #[inline]
    fn header_len(&self) -> usize {
        if self.is_v2() {
            HEADER_LEN_V2
        } else {
            HEADER_LEN_V1
        }
    }

    /// Parse a complete frame.
    fn parse_frame(&self) -> Result<Option<MavMessage>, ParseError> {
        let is_v2 = self.is_v2();
        let header_len = self.header_len();
        let payload_len = usize::from(self.buffer[1]);

        let msg_id = if is_v2 {
            // MAVLink 2: msgid is 3 bytes at offset 7-9
            u32::from(self.buffer[7])
                | (u32::from(self.buffer[8]) << 8)
                | (u32::from(self.buffer[9]) << 16)
        } else {
            u32::from(self.buffer[5])
        };

        let Some((crc_extra, full_len)) = MavMessage::definition(msg_id) else {
            return Ok(Some(MavMessage::Unknown(msg_id)));
        };

        // Header (excluding STX) + payload; the signature is not covered.
        let crc_start = header_len + payload_len;
        let calculated = frame_checksum(&self.buffer[1..crc_start], crc_extra);
        let received = u16::from_le_bytes([self.buffer[crc_start], self.buffer[crc_start + 1]]);
        if calculated != received {
            return Err(ParseError::CrcError);
        }

        if !is_v2 && payload_len < full_len {
            return Err(ParseError::Incomplete);
        }

        // MAVLink 2 drops trailing zero bytes from the payload.
        let mut payload = [0u8; MAX_PAYLOAD_LEN];
        payload[..payload_len].copy_from_slice(&self.buffer[header_len..crc_start]);
        Ok(Some(MavMessage::decode(msg_id, &payload)))
    }
}

impl Default for MavlinkParser {
    fn default() -> Self {
        Self::new()
    }
}
