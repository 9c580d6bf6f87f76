//! Flight controller configuration firmware for RP2040.
//!
//! This crate wires the chip-agnostic [`param_core`] console and parameter
//! sync and the [`mavlink_proto`] codec to the RP2040 hardware.
//!
//! # Overview
//!
//! The firmware runs on a Raspberry Pi Pico (RP2040) and:
//! 1. Holds the flight configuration in RAM, restored from flash at boot
//! 2. Serves a text console and MAVLink parameter sync on one UART
//!    (115200 baud, 8N1)
//! 3. Persists the configuration to the last flash sector on `save`
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART1 TX | 8    | Serial transmit |
//! | UART1 RX | 9    | Serial receive (console or ground station) |
//!
//! # Architecture
//!
//! A single serial task owns the UART and the [`ConfigPort`]. Each pass it
//! waits for either received bytes or the 10 ms ticker, feeds the port, and
//! writes whatever output the port queued. The ticker paces parameter
//! listings and the 1 Hz heartbeat.
//!
//! # Modules
//!
//! - [`config`]: Configuration values and the parameter table ([`FlightConfig`])
//! - [`store`]: Flash persistence ([`ParamStore`])
//! - [`engine`]: Console services backed by the above ([`FlightEngine`])
//! - [`link`]: Shared transmit queue ([`SerialOut`])
//! - [`port`]: Protocol autodetect and dispatch ([`ConfigPort`])
//!
//! # Features
//!
//! - **`dev-panic`** (default): Use `panic-probe` for development (prints panic info via RTT)
//! - **`prod-panic`**: Use `panic-reset` for production (silent watchdog reset)

#![no_std]

pub mod config;
pub mod engine;
pub mod link;
pub mod port;
pub mod store;

pub use config::{FlightConfig, BOX_COUNT, BOX_NAMES, FEATURE_NAMES, MIXER_NAMES, PARAM_COUNT};
pub use engine::{restart, FlightEngine, FIRMWARE};
pub use link::{SerialOut, COMPONENT_ID, SYSTEM_ID};
pub use port::ConfigPort;
pub use store::{FlashStoreError, ParamStore, FLASH_SIZE};

/// Console and MAVLink baud rate.
pub const UART_BAUDRATE: u32 = 115_200;
