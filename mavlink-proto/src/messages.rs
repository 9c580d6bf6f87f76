//! Payloads of the MAVLink parameter microservice.
//!
//! Field order on the wire follows the MAVLink convention of sorting fields
//! by descending size, so it differs from the declaration order in the
//! message definitions. All multi-byte fields are little-endian.

/// HEARTBEAT message ID.
pub const MSG_ID_HEARTBEAT: u32 = 0;

/// PARAM_REQUEST_READ message ID.
pub const MSG_ID_PARAM_REQUEST_READ: u32 = 20;

/// PARAM_REQUEST_LIST message ID.
pub const MSG_ID_PARAM_REQUEST_LIST: u32 = 21;

/// PARAM_VALUE message ID.
pub const MSG_ID_PARAM_VALUE: u32 = 22;

/// PARAM_SET message ID.
pub const MSG_ID_PARAM_SET: u32 = 23;

/// Width of the `param_id` field.
pub const PARAM_ID_LEN: usize = 16;

/// A message with a fixed payload layout.
pub trait MavPayload: Sized {
    /// Message ID.
    const ID: u32;
    /// Per-message checksum seed.
    const CRC_EXTRA: u8;
    /// Full payload length.
    const LEN: usize;

    /// Read from a payload of at least [`LEN`](Self::LEN) bytes.
    fn decode(payload: &[u8]) -> Self;

    /// Write exactly [`LEN`](Self::LEN) bytes into `out`.
    fn encode(&self, out: &mut [u8]);
}

/// Presence beacon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Heartbeat {
    pub custom_mode: u32,
    pub mav_type: u8,
    pub autopilot: u8,
    pub base_mode: u8,
    pub system_status: u8,
    pub mavlink_version: u8,
}

impl MavPayload for Heartbeat {
    const ID: u32 = MSG_ID_HEARTBEAT;
    const CRC_EXTRA: u8 = 50;
    const LEN: usize = 9;

    fn decode(p: &[u8]) -> Self {
        Self {
            custom_mode: u32::from_le_bytes([p[0], p[1], p[2], p[3]]),
            mav_type: p[4],
            autopilot: p[5],
            base_mode: p[6],
            system_status: p[7],
            mavlink_version: p[8],
        }
    }

    fn encode(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.custom_mode.to_le_bytes());
        out[4] = self.mav_type;
        out[5] = self.autopilot;
        out[6] = self.base_mode;
        out[7] = self.system_status;
        out[8] = self.mavlink_version;
    }
}

/// Request for one parameter, by name or by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamRequestRead {
    pub target_system: u8,
    pub target_component: u8,
    pub param_id: [u8; PARAM_ID_LEN],
    /// Index to read, or `-1` to look up by `param_id`.
    pub param_index: i16,
}

impl MavPayload for ParamRequestRead {
    const ID: u32 = MSG_ID_PARAM_REQUEST_READ;
    const CRC_EXTRA: u8 = 214;
    const LEN: usize = 20;

    fn decode(p: &[u8]) -> Self {
        Self {
            param_index: i16::from_le_bytes([p[0], p[1]]),
            target_system: p[2],
            target_component: p[3],
            param_id: read_id(&p[4..20]),
        }
    }

    fn encode(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.param_index.to_le_bytes());
        out[2] = self.target_system;
        out[3] = self.target_component;
        out[4..20].copy_from_slice(&self.param_id);
    }
}

/// Request for the full parameter list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamRequestList {
    pub target_system: u8,
    pub target_component: u8,
}

impl MavPayload for ParamRequestList {
    const ID: u32 = MSG_ID_PARAM_REQUEST_LIST;
    const CRC_EXTRA: u8 = 159;
    const LEN: usize = 2;

    fn decode(p: &[u8]) -> Self {
        Self {
            target_system: p[0],
            target_component: p[1],
        }
    }

    fn encode(&self, out: &mut [u8]) {
        out[0] = self.target_system;
        out[1] = self.target_component;
    }
}

/// One parameter report.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamValue {
    pub param_id: [u8; PARAM_ID_LEN],
    pub param_value: f32,
    pub param_type: u8,
    pub param_count: u16,
    /// Listing index, `0xFFFF` for an acknowledgement.
    pub param_index: u16,
}

impl MavPayload for ParamValue {
    const ID: u32 = MSG_ID_PARAM_VALUE;
    const CRC_EXTRA: u8 = 220;
    const LEN: usize = 25;

    fn decode(p: &[u8]) -> Self {
        Self {
            param_value: f32::from_le_bytes([p[0], p[1], p[2], p[3]]),
            param_count: u16::from_le_bytes([p[4], p[5]]),
            param_index: u16::from_le_bytes([p[6], p[7]]),
            param_id: read_id(&p[8..24]),
            param_type: p[24],
        }
    }

    fn encode(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.param_value.to_le_bytes());
        out[4..6].copy_from_slice(&self.param_count.to_le_bytes());
        out[6..8].copy_from_slice(&self.param_index.to_le_bytes());
        out[8..24].copy_from_slice(&self.param_id);
        out[24] = self.param_type;
    }
}

/// Remote parameter write.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamSet {
    pub target_system: u8,
    pub target_component: u8,
    pub param_id: [u8; PARAM_ID_LEN],
    pub param_value: f32,
    pub param_type: u8,
}

impl MavPayload for ParamSet {
    const ID: u32 = MSG_ID_PARAM_SET;
    const CRC_EXTRA: u8 = 168;
    const LEN: usize = 23;

    fn decode(p: &[u8]) -> Self {
        Self {
            param_value: f32::from_le_bytes([p[0], p[1], p[2], p[3]]),
            target_system: p[4],
            target_component: p[5],
            param_id: read_id(&p[6..22]),
            param_type: p[22],
        }
    }

    fn encode(&self, out: &mut [u8]) {
        out[0..4].copy_from_slice(&self.param_value.to_le_bytes());
        out[4] = self.target_system;
        out[5] = self.target_component;
        out[6..22].copy_from_slice(&self.param_id);
        out[22] = self.param_type;
    }
}

/// Parsed MAVLink message.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MavMessage {
    Heartbeat(Heartbeat),
    ParamRequestRead(ParamRequestRead),
    ParamRequestList(ParamRequestList),
    ParamValue(ParamValue),
    ParamSet(ParamSet),
    /// A message this crate does not decode. Its checksum is not verified.
    Unknown(u32),
}

impl MavMessage {
    /// Checksum seed and full payload length of a known message.
    #[must_use]
    pub fn definition(id: u32) -> Option<(u8, usize)> {
        match id {
            MSG_ID_HEARTBEAT => Some((Heartbeat::CRC_EXTRA, Heartbeat::LEN)),
            MSG_ID_PARAM_REQUEST_READ => Some((ParamRequestRead::CRC_EXTRA, ParamRequestRead::LEN)),
            MSG_ID_PARAM_REQUEST_LIST => Some((ParamRequestList::CRC_EXTRA, ParamRequestList::LEN)),
            MSG_ID_PARAM_VALUE => Some((ParamValue::CRC_EXTRA, ParamValue::LEN)),
            MSG_ID_PARAM_SET => Some((ParamSet::CRC_EXTRA, ParamSet::LEN)),
            _ => None,
        }
    }

    /// Decode a known message from a payload already extended to full length.
    #[must_use]
    pub fn decode(id: u32, payload: &[u8]) -> Self {
        match id {
            MSG_ID_HEARTBEAT => MavMessage::Heartbeat(Heartbeat::decode(payload)),
            MSG_ID_PARAM_REQUEST_READ => {
                MavMessage::ParamRequestRead(ParamRequestRead::decode(payload))
            }
            MSG_ID_PARAM_REQUEST_LIST => {
                MavMessage::ParamRequestList(ParamRequestList::decode(payload))
            }
            MSG_ID_PARAM_VALUE => MavMessage::ParamValue(ParamValue::decode(payload)),
            MSG_ID_PARAM_SET => MavMessage::ParamSet(ParamSet::decode(payload)),
            _ => MavMessage::Unknown(id),
        }
    }
}

#[inline]
fn read_id(bytes: &[u8]) -> [u8; PARAM_ID_LEN] {
    let mut id = [0u8; PARAM_ID_LEN];
    id.copy_from_slice(&bytes[..PARAM_ID_LEN]);
    id
}
