//! Persisted parameter record.
//!
//! A record is the raw bits of every parameter in registry order, plus the
//! settings that live outside the registry: feature mask, mixer selection,
//! RC channel order and aux switch activations. The layout is
//! little-endian:
//!
//! ```text
//! 0   magic      u32
//! 4   count      u16
//! 6   mixer      u8
//! 7   reserved   u8
//! 8   features   u32
//! 12  rc map     u8 * 8
//! 20  activation u32 * 16
//! 84  values     u32 * count
//! ..  crc        u32   CRC-32/ISO-HDLC over everything before it
//! ```
//!
//! Loading is all or nothing: a record that fails any check leaves every
//! parameter untouched.

use crc::{Crc, CRC_32_ISO_HDLC};

use crate::engine::{IDENTITY_RC_MAP, RC_CHANNEL_COUNT};
use crate::registry::Registry;

/// First word of every record.
pub const RECORD_MAGIC: u32 = 0x3143_4650;

/// Aux switch activation masks held by a record.
pub const MAX_BOXES: usize = 16;

const RC_MAP_AT: usize = 12;
const ACTIVATION_AT: usize = RC_MAP_AT + RC_CHANNEL_COUNT;

/// Bytes before the value array.
pub const RECORD_HEADER_LEN: usize = ACTIVATION_AT + 4 * MAX_BOXES;

const CRC_LEN: usize = 4;

const RECORD_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Size of a record holding `count` parameters.
#[must_use]
pub const fn record_len(count: usize) -> usize {
    RECORD_HEADER_LEN + 4 * count + CRC_LEN
}

/// Settings stored next to the parameter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub features: u32,
    pub mixer: u8,
    /// Input position of each RC function, a permutation of `0..8`.
    pub rc_map: [u8; RC_CHANNEL_COUNT],
    /// Aux switch activation mask per box.
    pub activation: [u32; MAX_BOXES],
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            features: 0,
            mixer: 0,
            rc_map: IDENTITY_RC_MAP,
            activation: [0; MAX_BOXES],
        }
    }
}

fn is_permutation(map: &[u8; RC_CHANNEL_COUNT]) -> bool {
    let mut seen = [false; RC_CHANNEL_COUNT];
    map.iter().all(|&position| {
        match seen.get_mut(usize::from(position)) {
            Some(slot) if !*slot => {
                *slot = true;
                true
            }
            _ => false,
        }
    })
}

/// Why a record could not be written or loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Buffer shorter than the record.
    BufferTooSmall,
    /// No record present (erased or foreign data).
    BadMagic,
    /// Record was written for a different parameter table.
    CountMismatch,
    /// Checksum mismatch.
    Checksum,
    /// A stored value lies outside its parameter's bounds, or the channel
    /// map is not a permutation.
    OutOfRange,
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            StoreError::BufferTooSmall => "record buffer too small",
            StoreError::BadMagic => "no parameter record",
            StoreError::CountMismatch => "parameter count mismatch",
            StoreError::Checksum => "record checksum mismatch",
            StoreError::OutOfRange => "stored value out of range",
        };
        f.write_str(text)
    }
}

#[inline]
fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Write the current parameter values into `buf`. Returns the record length.
pub fn encode_record(
    registry: &Registry<'_>,
    snapshot: Snapshot,
    buf: &mut [u8],
) -> Result<usize, StoreError> {
    let len = record_len(registry.len());
    if buf.len() < len {
        return Err(StoreError::BufferTooSmall);
    }

    buf[0..4].copy_from_slice(&RECORD_MAGIC.to_le_bytes());
    buf[4..6].copy_from_slice(&(registry.len() as u16).to_le_bytes());
    buf[6] = snapshot.mixer;
    buf[7] = 0;
    buf[8..12].copy_from_slice(&snapshot.features.to_le_bytes());
    buf[RC_MAP_AT..ACTIVATION_AT].copy_from_slice(&snapshot.rc_map);
    for (i, mask) in snapshot.activation.iter().enumerate() {
        let at = ACTIVATION_AT + 4 * i;
        buf[at..at + 4].copy_from_slice(&mask.to_le_bytes());
    }

    for (i, param) in registry.iter().enumerate() {
        let at = RECORD_HEADER_LEN + 4 * i;
        buf[at..at + 4].copy_from_slice(&param.raw_bits().to_le_bytes());
    }

    let body = len - CRC_LEN;
    let crc = RECORD_CRC.checksum(&buf[..body]);
    buf[body..len].copy_from_slice(&crc.to_le_bytes());

    trace!("parameter record encoded: {} bytes", len);
    Ok(len)
}

/// Validate the record in `buf` and load it into `registry`.
pub fn decode_record(buf: &[u8], registry: &Registry<'_>) -> Result<Snapshot, StoreError> {
    if buf.len() < RECORD_HEADER_LEN {
        return Err(StoreError::BufferTooSmall);
    }
    if read_u32(buf, 0) != RECORD_MAGIC {
        return Err(StoreError::BadMagic);
    }
    let count = usize::from(u16::from_le_bytes([buf[4], buf[5]]));
    if count != registry.len() {
        return Err(StoreError::CountMismatch);
    }
    let len = record_len(count);
    if buf.len() < len {
        return Err(StoreError::BufferTooSmall);
    }
    let body = len - CRC_LEN;
    if RECORD_CRC.checksum(&buf[..body]) != read_u32(buf, body) {
        return Err(StoreError::Checksum);
    }

    let mut rc_map = [0u8; RC_CHANNEL_COUNT];
    rc_map.copy_from_slice(&buf[RC_MAP_AT..ACTIVATION_AT]);
    if !is_permutation(&rc_map) {
        return Err(StoreError::OutOfRange);
    }

    let value_at = |i: usize| read_u32(buf, RECORD_HEADER_LEN + 4 * i);
    if !registry
        .iter()
        .enumerate()
        .all(|(i, param)| param.accepts(param.decode(value_at(i))))
    {
        return Err(StoreError::OutOfRange);
    }
    for (i, param) in registry.iter().enumerate() {
        param.set(value_at(i));
    }

    let mut activation = [0u32; MAX_BOXES];
    for (i, mask) in activation.iter_mut().enumerate() {
        *mask = read_u32(buf, ACTIVATION_AT + 4 * i);
    }

    Ok(Snapshot {
        features: read_u32(buf, 8),
        mixer: buf[6],
        rc_map,
        activation,
    })
}
