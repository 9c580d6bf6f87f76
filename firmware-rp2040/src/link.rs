//! Transmit queue shared by the console and the MAVLink link.
//!
//! Both front ends write into one queue; the serial task drains it to the
//! UART after every burst of input. When the queue is full, further output
//! is dropped until it has been drained.

use defmt::warn;
use heapless::Vec;
use mavlink_proto::{
    report_to_param_value, FrameEncoder, Heartbeat, MavPayload, MAX_FRAME_SIZE,
};
use param_core::{ConsoleOutput, ParamLink, ParamReport};

/// MAVLink system id of the flight controller.
pub const SYSTEM_ID: u8 = 1;

/// MAVLink component id of the flight controller.
pub const COMPONENT_ID: u8 = 200;

/// Transmit queue capacity.
pub const TX_QUEUE_LEN: usize = 1024;

const MAV_TYPE_QUADROTOR: u8 = 2;
const MAV_AUTOPILOT_GENERIC: u8 = 0;
const MAV_STATE_STANDBY: u8 = 3;
const MAVLINK_VERSION: u8 = 3;

/// Outgoing bytes for the UART.
pub struct SerialOut {
    queue: Vec<u8, TX_QUEUE_LEN>,
    encoder: FrameEncoder,
    overflowed: bool,
}

impl SerialOut {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            queue: Vec::new(),
            encoder: FrameEncoder::new(SYSTEM_ID, COMPONENT_ID),
            overflowed: false,
        }
    }

    /// Bytes waiting to be written.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.queue
    }

    /// Forget the queued bytes once they have been written.
    pub fn clear(&mut self) {
        self.queue.clear();
        if self.overflowed {
            warn!("Transmit queue overflowed, output dropped");
            self.overflowed = false;
        }
    }

    pub fn send_heartbeat(&mut self) {
        self.send_frame(&Heartbeat {
            custom_mode: 0,
            mav_type: MAV_TYPE_QUADROTOR,
            autopilot: MAV_AUTOPILOT_GENERIC,
            base_mode: 0,
            system_status: MAV_STATE_STANDBY,
            mavlink_version: MAVLINK_VERSION,
        });
    }

    fn send_frame<P: MavPayload>(&mut self, msg: &P) {
        let mut frame = [0u8; MAX_FRAME_SIZE];
        match self.encoder.encode(msg, &mut frame) {
            Ok(len) => self.write_bytes(&frame[..len]),
            Err(e) => warn!("Frame encode failed: {:?}", e),
        }
    }
}

impl Default for SerialOut {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleOutput for SerialOut {
    fn write_bytes(&mut self, bytes: &[u8]) {
        if self.queue.extend_from_slice(bytes).is_err() {
            self.overflowed = true;
        }
    }
}

impl ParamLink for SerialOut {
    fn send_value(&mut self, report: &ParamReport) {
        self.send_frame(&report_to_param_value(report));
    }
}
