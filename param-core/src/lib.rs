//! Platform-agnostic parameter registry, text console and parameter sync.
//!
//! This crate holds the configuration surface of the flight firmware without
//! any platform-specific dependencies. It can be used both in embedded
//! `no_std` environments and on host for testing.
//!
//! # Overview
//!
//! The crate is organized into several modules:
//!
//! - [`types`]: Parameter descriptors ([`ParamDescriptor`], [`ParamKind`], [`Value`])
//! - [`access`]: Typed reads, writes, bounds checks and formatting
//! - [`registry`]: The fixed parameter set ([`Registry`])
//! - [`command`]: Command table and dispatcher ([`CommandTable`], [`Shell`])
//! - [`console`]: Line editor front end ([`ConsoleSession`])
//! - [`commands`]: Built-in console commands ([`BUILTINS`])
//! - [`sync`]: Binary parameter sync front end ([`ParamSync`], [`TransferGuard`])
//! - [`engine`]: Services provided by the firmware ([`Engine`])
//! - [`store`]: Persisted parameter record ([`encode_record`], [`decode_record`])
//! - [`output`]: Console byte sink ([`ConsoleOutput`])
//!
//! Both front ends read and write parameters through the same [`Registry`],
//! so a value set on the console is the value reported over the link, with
//! the same bounds enforced on either path.
//!
//! # Example
//!
//! ```rust
//! use core::cell::Cell;
//! use param_core::{ParamDescriptor, ParamError, Registry, Value};
//!
//! let p_roll = Cell::new(40u8);
//! let params = [ParamDescriptor::uint8("p_roll", &p_roll, 0, 200)];
//! let registry = Registry::new(&params);
//!
//! let param = registry.find("p_roll").unwrap();
//! assert_eq!(param.assign(Value::Int(250)), Err(ParamError::OutOfRange));
//! assert_eq!(param.assign(Value::Int(120)), Ok(()));
//! assert_eq!(param.format(true).as_str(), "120 0 200");
//! ```
//!
//! # Features
//!
//! - **`std`**: Enable standard library support (for host testing)
//! - **`defmt`**: Enable defmt formatting and internal trace logging
//!
//! # No-std Support
//!
//! This crate is `#![no_std]` by default and uses no heap allocations.
//! Parameter storage is borrowed as `Cell`s from whoever owns it.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
mod log;

pub mod access;
pub mod command;
pub mod commands;
pub mod console;
pub mod engine;
pub mod name;
pub mod output;
pub mod registry;
pub mod store;
pub mod sync;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use access::{ParamError, ParamText, PARAM_TEXT_LEN};
pub use command::{split_command, Command, CommandTable, Handler, Shell, UNKNOWN_COMMAND};
pub use commands::{BAD_ARGUMENTS, BUILTINS, OUT_OF_RANGE, UNKNOWN_PARAMETER};
pub use console::{ConsoleSession, Mode, Status, CONSOLE_BUFFER_LEN, PROMPT};
pub use engine::{
    Engine, EngineError, ResetKind, IDENTITY_RC_MAP, RC_CHANNEL_COUNT, RC_CHANNEL_LETTERS,
};
pub use output::ConsoleOutput;
pub use registry::{Registry, MAX_PARAMS};
pub use store::{
    decode_record, encode_record, record_len, Snapshot, StoreError, MAX_BOXES, RECORD_MAGIC,
};
pub use sync::{Enumeration, ParamLink, ParamReport, ParamSync, TransferGuard};
pub use types::{ParamDescriptor, ParamKind, ParamRef, Value, PARAM_ID_LEN};
