//! Console engine backed by [`FlightConfig`] and the flash store.

use core::fmt::Write as _;

use defmt::{info, warn};
use embassy_time::Instant;
use heapless::String;
use param_core::{
    ConsoleOutput, Engine, EngineError, Registry, ResetKind, Snapshot, MAX_BOXES, RC_CHANNEL_COUNT,
};

use crate::config::{FlightConfig, BOX_NAMES, FEATURE_NAMES, MIXER_NAMES};
use crate::store::ParamStore;

/// Firmware identification printed by `version` and the console banner.
pub const FIRMWARE: &str = concat!("FlightConfig RP2040 ", env!("CARGO_PKG_VERSION"));

/// Engine of the flight firmware.
///
/// Resets are deferred: [`Engine::reset`] only records the request, so the
/// serial task can drain the console output before calling [`restart`].
pub struct FlightEngine<'c> {
    config: &'c FlightConfig,
    store: ParamStore,
    pending_reset: Option<ResetKind>,
}

impl<'c> FlightEngine<'c> {
    #[must_use]
    pub fn new(config: &'c FlightConfig, store: ParamStore) -> Self {
        Self {
            config,
            store,
            pending_reset: None,
        }
    }

    /// Load the stored record, keeping defaults if there is none.
    pub fn restore(&mut self, registry: &Registry<'_>) {
        match self.store.load(registry) {
            Ok(snapshot) => {
                self.config.features.set(snapshot.features);
                if usize::from(snapshot.mixer) < MIXER_NAMES.len() {
                    self.config.mixer.set(snapshot.mixer);
                }
                self.config.rc_map.set(snapshot.rc_map);
                for (cell, &mask) in self.config.activate.iter().zip(&snapshot.activation) {
                    cell.set(mask);
                }
                info!("Parameters loaded from flash");
            }
            Err(e) => warn!("Using default parameters: {:?}", e),
        }
    }

    /// Restart requested by the console, if any.
    #[inline]
    pub fn take_reset(&mut self) -> Option<ResetKind> {
        self.pending_reset.take()
    }
}

impl Engine for FlightEngine<'_> {
    fn firmware(&self) -> &str {
        FIRMWARE
    }

    fn save(&mut self, registry: &Registry<'_>) -> Result<(), EngineError> {
        let mut activation = [0u32; MAX_BOXES];
        for (mask, cell) in activation.iter_mut().zip(&self.config.activate) {
            *mask = cell.get();
        }
        let snapshot = Snapshot {
            features: self.config.features.get(),
            mixer: self.config.mixer.get(),
            rc_map: self.config.rc_map.get(),
            activation,
        };
        self.store.save(registry, snapshot).map_err(|e| {
            warn!("Parameter save failed: {:?}", e);
            EngineError::Storage
        })
    }

    fn load_defaults(&mut self) {
        self.config.load_defaults();
        if let Err(e) = self.store.clear() {
            warn!("Parameter record erase failed: {:?}", e);
        }
    }

    fn reset(&mut self, kind: ResetKind) {
        info!("Restart requested: {:?}", kind);
        self.pending_reset = Some(kind);
    }

    fn write_status(&mut self, out: &mut dyn ConsoleOutput) {
        let mut line: String<64> = String::new();
        let uptime = Instant::now().as_secs();
        let _ = write!(line, "Uptime: {} sec\r\n", uptime);
        out.print(&line);

        line.clear();
        let mixer = MIXER_NAMES
            .get(usize::from(self.config.mixer.get()))
            .copied()
            .unwrap_or("?");
        let _ = write!(
            line,
            "Mixer: {}, features: 0x{:04X}\r\n",
            mixer,
            self.config.features.get()
        );
        out.print(&line);
    }

    fn feature_names(&self) -> &'static [&'static str] {
        FEATURE_NAMES
    }

    fn features(&self) -> u32 {
        self.config.features.get()
    }

    fn set_features(&mut self, mask: u32) {
        self.config.features.set(mask);
    }

    fn mixer_names(&self) -> &'static [&'static str] {
        MIXER_NAMES
    }

    fn mixer(&self) -> usize {
        usize::from(self.config.mixer.get())
    }

    fn set_mixer(&mut self, index: usize) {
        if let Ok(index) = u8::try_from(index) {
            self.config.mixer.set(index);
        }
    }

    fn rc_map(&self) -> [u8; RC_CHANNEL_COUNT] {
        self.config.rc_map.get()
    }

    fn set_rc_map(&mut self, map: [u8; RC_CHANNEL_COUNT]) {
        self.config.rc_map.set(map);
    }

    fn box_names(&self) -> &'static [&'static str] {
        BOX_NAMES
    }

    fn aux_channels(&self) -> usize {
        usize::from(self.config.rc_auxch.get())
    }

    fn box_activation(&self, index: usize) -> u32 {
        self.config.activate.get(index).map_or(0, |cell| cell.get())
    }

    fn set_box_activation(&mut self, index: usize, mask: u32) {
        if let Some(cell) = self.config.activate.get(index) {
            cell.set(mask);
        }
    }
}

/// Restart the chip. Called once the console output has been sent.
pub fn restart(kind: ResetKind) -> ! {
    match kind {
        ResetKind::Warm => cortex_m::peripheral::SCB::sys_reset(),
        ResetKind::Bootloader => {
            embassy_rp::rom_data::reset_to_usb_boot(0, 0);
            // The ROM call does not return; fall back to a plain reset.
            cortex_m::peripheral::SCB::sys_reset()
        }
    }
}
