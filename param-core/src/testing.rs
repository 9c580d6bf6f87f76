//! Test doubles shared by the unit tests.

extern crate std;

use std::string::String;
use std::vec::Vec;

use crate::engine::{Engine, EngineError, ResetKind, IDENTITY_RC_MAP, RC_CHANNEL_COUNT};
use crate::output::ConsoleOutput;
use crate::registry::Registry;
use crate::sync::{ParamLink, ParamReport};

/// Captures console output.
#[derive(Default)]
pub struct MockOutput {
    pub bytes: Vec<u8>,
}

impl MockOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl ConsoleOutput for MockOutput {
    fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }
}

pub const FEATURES: &[&str] = &["PPM", "VBAT", "INFLIGHT_ACC_CAL", "MOTOR_STOP", "GPS"];
pub const MIXERS: &[&str] = &["TRI", "QUADP", "QUADX", "BI", "HEX6", "HEX6X"];
pub const BOXES: &[&str] = &["ANGLE", "HORIZON", "CAMSTAB"];

/// Records every engine call.
pub struct MockEngine {
    pub saves: usize,
    pub saved: Vec<u32>,
    pub save_fails: bool,
    pub defaults_loaded: usize,
    pub resets: Vec<ResetKind>,
    pub features: u32,
    pub mixer: usize,
    pub rc_map: [u8; RC_CHANNEL_COUNT],
    pub activation: Vec<u32>,
    pub aux_channels: usize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            saves: 0,
            saved: Vec::new(),
            save_fails: false,
            defaults_loaded: 0,
            resets: Vec::new(),
            features: 0b0000_0011,
            mixer: 2,
            rc_map: IDENTITY_RC_MAP,
            activation: std::vec![0; BOXES.len()],
            aux_channels: 4,
        }
    }
}

impl Engine for MockEngine {
    fn firmware(&self) -> &str {
        "TestFC 1.0"
    }

    fn save(&mut self, registry: &Registry<'_>) -> Result<(), EngineError> {
        if self.save_fails {
            return Err(EngineError::Storage);
        }
        self.saves += 1;
        self.saved = registry.iter().map(|p| p.raw_bits()).collect();
        Ok(())
    }

    fn load_defaults(&mut self) {
        self.defaults_loaded += 1;
    }

    fn reset(&mut self, kind: ResetKind) {
        self.resets.push(kind);
    }

    fn write_status(&mut self, out: &mut dyn ConsoleOutput) {
        out.print("Uptime: 42 sec\r\n");
    }

    fn feature_names(&self) -> &'static [&'static str] {
        FEATURES
    }

    fn features(&self) -> u32 {
        self.features
    }

    fn set_features(&mut self, mask: u32) {
        self.features = mask;
    }

    fn mixer_names(&self) -> &'static [&'static str] {
        MIXERS
    }

    fn mixer(&self) -> usize {
        self.mixer
    }

    fn set_mixer(&mut self, index: usize) {
        self.mixer = index;
    }

    fn rc_map(&self) -> [u8; RC_CHANNEL_COUNT] {
        self.rc_map
    }

    fn set_rc_map(&mut self, map: [u8; RC_CHANNEL_COUNT]) {
        self.rc_map = map;
    }

    fn box_names(&self) -> &'static [&'static str] {
        BOXES
    }

    fn aux_channels(&self) -> usize {
        self.aux_channels
    }

    fn box_activation(&self, index: usize) -> u32 {
        self.activation.get(index).copied().unwrap_or(0)
    }

    fn set_box_activation(&mut self, index: usize, mask: u32) {
        if let Some(slot) = self.activation.get_mut(index) {
            *slot = mask;
        }
    }
}

/// Collects parameter reports.
#[derive(Default)]
pub struct MockLink {
    pub reports: Vec<ParamReport>,
}

impl ParamLink for MockLink {
    fn send_value(&mut self, report: &ParamReport) {
        self.reports.push(*report);
    }
}
