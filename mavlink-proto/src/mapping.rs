//! Mapping between parameter reports and MAVLink parameter messages.
//!
//! Parameter types travel as MAV_PARAM_TYPE codes. Values are always carried
//! as the numeric value converted to `f32`, not as a bit-cast of the native
//! integer.

use param_core::{ParamKind, ParamReport};

use crate::messages::ParamValue;

/// MAV_PARAM_TYPE codes.
pub const MAV_PARAM_TYPE_UINT8: u8 = 1;
pub const MAV_PARAM_TYPE_INT8: u8 = 2;
pub const MAV_PARAM_TYPE_UINT16: u8 = 3;
pub const MAV_PARAM_TYPE_INT16: u8 = 4;
pub const MAV_PARAM_TYPE_UINT32: u8 = 5;
pub const MAV_PARAM_TYPE_INT32: u8 = 6;
pub const MAV_PARAM_TYPE_REAL32: u8 = 9;

/// Float code of the pre-1.0 MAV_VAR enum, still sent by old ground stations.
pub const MAV_VAR_FLOAT: u8 = 0;

/// `param_index` of a PARAM_VALUE that acknowledges a write.
pub const PARAM_INDEX_ACK: u16 = 0xFFFF;

/// Wire type code of a parameter kind.
#[inline]
#[must_use]
pub fn param_type_code(kind: ParamKind) -> u8 {
    match kind {
        ParamKind::U8 => MAV_PARAM_TYPE_UINT8,
        ParamKind::I8 => MAV_PARAM_TYPE_INT8,
        ParamKind::U16 => MAV_PARAM_TYPE_UINT16,
        ParamKind::I16 => MAV_PARAM_TYPE_INT16,
        ParamKind::U32 => MAV_PARAM_TYPE_UINT32,
        ParamKind::F32 => MAV_PARAM_TYPE_REAL32,
    }
}

/// Parameter kind named by a wire type code, if there is one.
#[must_use]
pub fn param_kind(code: u8) -> Option<ParamKind> {
    match code {
        MAV_PARAM_TYPE_UINT8 => Some(ParamKind::U8),
        MAV_PARAM_TYPE_INT8 => Some(ParamKind::I8),
        MAV_PARAM_TYPE_UINT16 => Some(ParamKind::U16),
        MAV_PARAM_TYPE_INT16 => Some(ParamKind::I16),
        MAV_PARAM_TYPE_UINT32 => Some(ParamKind::U32),
        MAV_PARAM_TYPE_REAL32 | MAV_VAR_FLOAT => Some(ParamKind::F32),
        _ => None,
    }
}

/// PARAM_VALUE payload for a parameter report.
///
/// The wire field is unsigned, so the echo index -1 goes out as
/// [`PARAM_INDEX_ACK`].
#[must_use]
pub fn report_to_param_value(report: &ParamReport) -> ParamValue {
    ParamValue {
        param_id: report.id,
        param_value: report.value,
        param_type: param_type_code(report.kind),
        param_count: report.count,
        param_index: report.wire_index() as u16,
    }
}

/// Whether a request for `target_system` is meant for `system_id`.
///
/// Zero is the broadcast address. The component is not checked: ground
/// stations address the autopilot component, whatever id it reports.
#[inline]
#[must_use]
pub fn is_addressed_to(target_system: u8, system_id: u8) -> bool {
    target_system == 0 || target_system == system_id
}
