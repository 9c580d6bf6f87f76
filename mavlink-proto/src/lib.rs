//! MAVLink parameter protocol framing and parameter mapping.
//!
//! This crate provides chip-agnostic MAVLink framing for the parameter
//! microservice and the conversion between [`param_core`] reports and
//! MAVLink messages. It is designed to be used with any async UART
//! implementation.
//!
//! # Features
//!
//! - Minimal MAVLink 1/2 parser for HEARTBEAT and the PARAM_* messages
//! - MAVLink 1 encoder with rolling sequence numbers
//! - MAV_PARAM_TYPE mapping for every parameter kind
//! - No chip-specific dependencies - works on any platform
//! - Fully testable on host
//!
//! # Example
//!
//! ```
//! use mavlink_proto::{FrameEncoder, MavMessage, MavlinkParser, ParamRequestList};
//!
//! // A ground station asks for the parameter list.
//! let mut gcs = FrameEncoder::new(255, 190);
//! let mut frame = [0u8; 16];
//! let len = gcs
//!     .encode(&ParamRequestList { target_system: 1, target_component: 200 }, &mut frame)
//!     .unwrap();
//!
//! // Feed bytes from UART
//! let mut parser = MavlinkParser::new();
//! let mut received = None;
//! for &byte in &frame[..len] {
//!     if let Ok(Some(msg)) = parser.push_byte(byte) {
//!         received = Some(msg);
//!     }
//! }
//! assert!(matches!(received, Some(MavMessage::ParamRequestList(_))));
//! ```
//!
//! # MAVLink Message Types
//!
//! This crate handles:
//! - **HEARTBEAT** (ID 0): Connection presence indicator
//! - **PARAM_REQUEST_READ** (ID 20): Read one parameter
//! - **PARAM_REQUEST_LIST** (ID 21): Start a full parameter listing
//! - **PARAM_VALUE** (ID 22): Parameter report and write acknowledgement
//! - **PARAM_SET** (ID 23): Write one parameter
//!
//! # UART Configuration
//!
//! MAVLink commonly uses:
//! - 57600 baud for telemetry radios
//! - 115200 baud for direct serial connections
//! - 8N1 (8 data bits, no parity, 1 stop bit)

#![cfg_attr(not(feature = "std"), no_std)]

pub mod crc;
pub mod encoder;
pub mod mapping;
pub mod messages;
pub mod parser;

// Re-export main types from parser and encoder
pub use encoder::{EncodeError, FrameEncoder, V1_OVERHEAD};
pub use parser::{
    MavlinkParser, ParseError, MAVLINK_STX_V1, MAVLINK_STX_V2, MAX_FRAME_SIZE, MAX_PAYLOAD_LEN,
};

// Re-export message types
pub use messages::{
    Heartbeat, MavMessage, MavPayload, ParamRequestList, ParamRequestRead, ParamSet, ParamValue,
    MSG_ID_HEARTBEAT, MSG_ID_PARAM_REQUEST_LIST, MSG_ID_PARAM_REQUEST_READ, MSG_ID_PARAM_SET,
    MSG_ID_PARAM_VALUE, PARAM_ID_LEN,
};

// Re-export main types from mapping
pub use mapping::{
    is_addressed_to, param_kind, param_type_code, report_to_param_value, MAV_PARAM_TYPE_REAL32,
    PARAM_INDEX_ACK,
};

/// Common MAVLink baud rates.
pub const MAVLINK_BAUDRATE_TELEMETRY: u32 = 57_600;
pub const MAVLINK_BAUDRATE_SERIAL: u32 = 115_200;
