//! Parameter record in the last flash sector.
//!
//! # Flash Layout
//!
//! ```text
//! 0x000000 ..            firmware image
//! FLASH_SIZE - 4 KiB ..  parameter record (one erase sector)
//! ```
//!
//! The record format lives in [`param_core::store`]; this module only moves
//! it between RAM and flash. Flash operations block with interrupts masked
//! for the duration of an erase, so they only run on explicit `save` or
//! `defaults` commands.

use embassy_rp::flash::{Blocking, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use param_core::{
    decode_record, encode_record, record_len, Registry, Snapshot, StoreError, MAX_PARAMS,
};

/// Flash size of the Raspberry Pi Pico.
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

const RECORD_OFFSET: u32 = (FLASH_SIZE - ERASE_SIZE) as u32;

/// Flash program page.
const PAGE_SIZE: usize = 256;

/// Record buffer, padded to whole pages.
const RECORD_CAPACITY: usize = record_len(MAX_PARAMS).next_multiple_of(PAGE_SIZE);

/// Error type for flash persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum FlashStoreError {
    /// Flash driver failure.
    Flash(embassy_rp::flash::Error),
    /// Stored record missing or invalid.
    Record(StoreError),
}

impl From<embassy_rp::flash::Error> for FlashStoreError {
    fn from(err: embassy_rp::flash::Error) -> Self {
        FlashStoreError::Flash(err)
    }
}

impl From<StoreError> for FlashStoreError {
    fn from(err: StoreError) -> Self {
        FlashStoreError::Record(err)
    }
}

/// Owner of the flash peripheral and the record buffer.
pub struct ParamStore {
    flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>,
    buf: [u8; RECORD_CAPACITY],
}

impl ParamStore {
    #[must_use]
    pub fn new(flash: Flash<'static, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self {
            flash,
            buf: [0xFF; RECORD_CAPACITY],
        }
    }

    /// Load the stored record into `registry`.
    ///
    /// On any error the parameters keep their current values.
    pub fn load(&mut self, registry: &Registry<'_>) -> Result<Snapshot, FlashStoreError> {
        self.flash.blocking_read(RECORD_OFFSET, &mut self.buf)?;
        Ok(decode_record(&self.buf, registry)?)
    }

    /// Replace the stored record with the current values.
    pub fn save(&mut self, registry: &Registry<'_>, snapshot: Snapshot) -> Result<(), FlashStoreError> {
        self.buf.fill(0xFF);
        let len = encode_record(registry, snapshot, &mut self.buf)?;
        let padded = len.next_multiple_of(PAGE_SIZE);

        self.flash
            .blocking_erase(RECORD_OFFSET, RECORD_OFFSET + ERASE_SIZE as u32)?;
        self.flash.blocking_write(RECORD_OFFSET, &self.buf[..padded])?;
        defmt::info!("Parameters saved ({} bytes)", len);
        Ok(())
    }

    /// Erase the record so the next boot starts from defaults.
    pub fn clear(&mut self) -> Result<(), FlashStoreError> {
        self.flash
            .blocking_erase(RECORD_OFFSET, RECORD_OFFSET + ERASE_SIZE as u32)?;
        defmt::info!("Parameter record erased");
        Ok(())
    }
}
