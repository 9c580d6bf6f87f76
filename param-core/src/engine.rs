//! Flight-control engine collaborator trait.
//!
//! The console never touches hardware directly. Persistence, resets and the
//! feature and mixer tables belong to the engine that owns the parameter
//! memory; commands reach them through [`Engine`].

use crate::output::ConsoleOutput;
use crate::registry::Registry;

/// Kind of restart requested when the console is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetKind {
    /// Regular restart into the flight firmware.
    Warm,
    /// Restart into the bootloader for reflashing.
    Bootloader,
}

/// Error type for engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Parameter storage could not be written.
    Storage,
}

impl core::fmt::Display for EngineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EngineError::Storage => write!(f, "parameter storage failed"),
        }
    }
}

/// RC input functions in canonical order: aileron, elevator, throttle,
/// rudder, aux 1 to 4.
pub const RC_CHANNEL_LETTERS: &[u8; RC_CHANNEL_COUNT] = b"AETR1234";

/// Number of mappable RC input channels.
pub const RC_CHANNEL_COUNT: usize = 8;

/// Channel order with every function on its own input.
pub const IDENTITY_RC_MAP: [u8; RC_CHANNEL_COUNT] = [0, 1, 2, 3, 4, 5, 6, 7];

/// Services the console needs from the vehicle firmware.
///
/// The feature, mixer, channel map and aux switch methods have defaults for
/// engines that do not expose those tables.
pub trait Engine {
    /// Firmware identification string.
    fn firmware(&self) -> &str;

    /// Persist every parameter in `registry`.
    fn save(&mut self, registry: &Registry<'_>) -> Result<(), EngineError>;

    /// Restore every parameter to its built-in default.
    fn load_defaults(&mut self);

    /// Restart the system. On hardware this does not return.
    fn reset(&mut self, kind: ResetKind);

    /// Print a runtime status report.
    fn write_status(&mut self, out: &mut dyn ConsoleOutput);

    /// Names of the optional features, bit `i` of the mask is entry `i`.
    fn feature_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Bitmask of enabled features.
    fn features(&self) -> u32 {
        0
    }

    fn set_features(&mut self, _mask: u32) {}

    /// Names of the selectable mixer geometries.
    fn mixer_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Index of the active mixer in [`mixer_names`](Self::mixer_names).
    fn mixer(&self) -> usize {
        0
    }

    fn set_mixer(&mut self, _index: usize) {}

    /// RC channel order. Entry `i` is the input position carrying function
    /// `i` of [`RC_CHANNEL_LETTERS`].
    fn rc_map(&self) -> [u8; RC_CHANNEL_COUNT] {
        IDENTITY_RC_MAP
    }

    fn set_rc_map(&mut self, _map: [u8; RC_CHANNEL_COUNT]) {}

    /// Names of the flight mode boxes that aux switches can activate.
    fn box_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Number of aux channels shown and accepted by `auxset`.
    fn aux_channels(&self) -> usize {
        4
    }

    /// Activation mask of box `index`: three bits (low, mid, high) per aux
    /// channel, channel 1 in the lowest bits.
    fn box_activation(&self, _index: usize) -> u32 {
        0
    }

    fn set_box_activation(&mut self, _index: usize, _mask: u32) {}
}
