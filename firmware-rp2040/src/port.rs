//! Shared UART front end: protocol autodetect and message dispatch.
//!
//! One UART carries both the text console and MAVLink. While the console is
//! closed every byte goes to the MAVLink parser, except that `#` or carriage
//! return between frames opens the console. A parameter listing in progress
//! blocks the console until it finishes.

use defmt::{debug, info, trace, warn};
use mavlink_proto::{is_addressed_to, param_kind, MavMessage, MavlinkParser};
use param_core::{
    CommandTable, ConsoleSession, Enumeration, ParamSync, Registry, ResetKind, Shell, Status,
    TransferGuard, BUILTINS,
};

use crate::engine::FlightEngine;
use crate::link::{SerialOut, SYSTEM_ID};

static COMMANDS: CommandTable = BUILTINS;

/// Ticks between heartbeats.
pub const HEARTBEAT_TICKS: u32 = 100;

/// Everything attached to the configuration UART.
pub struct ConfigPort<'a> {
    registry: &'a Registry<'a>,
    engine: FlightEngine<'a>,
    out: SerialOut,
    console: ConsoleSession,
    parser: MavlinkParser,
    sync: ParamSync<'a>,
    guard: &'a TransferGuard,
    ticks: u32,
}

impl<'a> ConfigPort<'a> {
    #[must_use]
    pub fn new(
        registry: &'a Registry<'a>,
        engine: FlightEngine<'a>,
        guard: &'a TransferGuard,
    ) -> Self {
        Self {
            registry,
            engine,
            out: SerialOut::new(),
            console: ConsoleSession::new(),
            parser: MavlinkParser::new(),
            sync: ParamSync::new(guard),
            guard,
            ticks: 0,
        }
    }

    /// Handle one received byte.
    pub fn receive(&mut self, byte: u8) {
        if self.console.is_active() {
            self.run_console(byte);
            return;
        }

        if (byte == b'#' || byte == b'\r') && self.parser.is_idle() && !self.guard.in_progress() {
            info!("Console opened");
            let mut shell = Shell::new(&mut self.out, self.registry, &mut self.engine, &COMMANDS);
            self.console.activate(&mut shell);
            return;
        }

        match self.parser.push_byte(byte) {
            Ok(Some(msg)) => self.handle_message(msg),
            Ok(None) => {}
            Err(e) => debug!("MAVLink frame dropped: {:?}", e),
        }
    }

    fn run_console(&mut self, byte: u8) {
        let mut shell = Shell::new(&mut self.out, self.registry, &mut self.engine, &COMMANDS);
        if let Status::Exited(kind) = self.console.process(byte, &mut shell) {
            info!("Console closed: {:?}", kind);
        }
    }

    fn handle_message(&mut self, msg: MavMessage) {
        match msg {
            MavMessage::ParamRequestList(req) => {
                if !is_addressed_to(req.target_system, SYSTEM_ID) {
                    return;
                }
                info!("Parameter list requested");
                self.sync.request_list(self.registry);
            }
            MavMessage::ParamRequestRead(req) => {
                if !is_addressed_to(req.target_system, SYSTEM_ID) {
                    return;
                }
                let result = match usize::try_from(req.param_index) {
                    Ok(index) => self.sync.send_one(self.registry, &mut self.out, index),
                    Err(_) => self.sync.send_named(self.registry, &mut self.out, &req.param_id),
                };
                if let Err(e) = result {
                    debug!("Parameter read ignored: {:?}", e);
                }
            }
            MavMessage::ParamSet(set) => {
                if !is_addressed_to(set.target_system, SYSTEM_ID) {
                    return;
                }
                let requested = param_kind(set.param_type);
                if let Err(e) = self.sync.apply_set(
                    self.registry,
                    &mut self.out,
                    &set.param_id,
                    set.param_value,
                    requested,
                ) {
                    warn!("Parameter set rejected: {:?}", e);
                }
            }
            MavMessage::Heartbeat(hb) => trace!("Heartbeat from type {}", hb.mav_type),
            MavMessage::ParamValue(_) | MavMessage::Unknown(_) => {}
        }
    }

    /// Periodic work: one listing step and the heartbeat.
    pub fn tick(&mut self) {
        if self.sync.is_listing()
            && self.sync.poll(self.registry, &mut self.out) == Enumeration::Complete
        {
            info!("Parameter list sent");
        }

        self.ticks = self.ticks.wrapping_add(1);
        if self.ticks % HEARTBEAT_TICKS == 0 && !self.console.is_active() {
            self.out.send_heartbeat();
        }
    }

    /// Bytes waiting for the UART.
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.out.pending()
    }

    /// Mark the pending bytes as written.
    pub fn written(&mut self) {
        self.out.clear();
    }

    /// Restart requested by the console, once its output has been written.
    pub fn take_reset(&mut self) -> Option<ResetKind> {
        self.engine.take_reset()
    }
}
