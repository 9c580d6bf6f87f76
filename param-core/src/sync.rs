//! Binary parameter synchronisation.
//!
//! Drives the parameter half of a telemetry link: a resumable, one-entry-per
//! call enumeration of the whole registry plus validated remote writes. The
//! wire encoding is left to a [`ParamLink`] implementation.
//!
//! # Protocol
//!
//! ```text
//! ground station                      vehicle
//!   PARAM_REQUEST_LIST  ──────────▶   request_list
//!                       ◀──────────   PARAM_VALUE index 0      (one per poll)
//!                       ◀──────────   ...
//!                       ◀──────────   PARAM_VALUE index N-1    (Complete)
//!   PARAM_SET           ──────────▶   apply_set
//!                       ◀──────────   PARAM_VALUE index -1     (echo)
//! ```
//!
//! The [`TransferGuard`] is raised from the moment a listing is requested
//! until its last entry has been sent, so protocol autodetection on the
//! shared serial port leaves the stream alone for the whole transfer.

use portable_atomic::{AtomicBool, Ordering};

use crate::access::ParamError;
use crate::name::id_bytes;
use crate::registry::Registry;
use crate::types::{ParamDescriptor, ParamKind, Value, PARAM_ID_LEN};

/// Advisory flag raised while a multi-message transfer is in flight.
///
/// Written only by [`ParamSync`]; read by whoever decides how to interpret
/// incoming serial bytes.
#[derive(Debug, Default)]
pub struct TransferGuard(AtomicBool);

impl TransferGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// `true` while an enumeration is in progress.
    #[inline]
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    fn set(&self, active: bool) {
        self.0.store(active, Ordering::Release);
    }
}

/// One parameter as reported over the link.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParamReport {
    /// Name, zero-padded. Not terminated when all 16 bytes are used.
    pub id: [u8; PARAM_ID_LEN],
    /// Current value coerced to `f32`.
    pub value: f32,
    pub kind: ParamKind,
    /// Total number of parameters.
    pub count: u16,
    /// Listing index, or `None` for the echo that acknowledges a write.
    pub index: Option<u16>,
}

impl ParamReport {
    /// Snapshot `param` for transmission.
    #[must_use]
    pub fn new(param: &ParamDescriptor<'_>, count: u16, index: Option<u16>) -> Self {
        let mut id = [0u8; PARAM_ID_LEN];
        let name = param.name().as_bytes();
        let len = name.len().min(PARAM_ID_LEN);
        id[..len].copy_from_slice(&name[..len]);
        Self {
            id,
            value: param.get().as_f32(),
            kind: param.kind(),
            count,
            index,
        }
    }

    /// Significant bytes of [`id`](Self::id).
    #[must_use]
    pub fn name(&self) -> &[u8] {
        id_bytes(&self.id)
    }

    /// Index as carried on the wire, `-1` for echoes.
    #[inline]
    #[must_use]
    pub fn wire_index(&self) -> i16 {
        self.index.map_or(-1, |index| index as i16)
    }
}

/// Transport for parameter reports.
///
/// Sends are fire-and-forget into the transport's own buffer.
pub trait ParamLink {
    fn send_value(&mut self, report: &ParamReport);
}

/// Progress of an enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enumeration {
    /// More parameters remain; call again.
    Pending,
    /// Every parameter has been sent, or the cursor was reset.
    Complete,
}

/// Enumeration cursor and write handler for one link.
#[derive(Debug)]
pub struct ParamSync<'g> {
    cursor: u16,
    listing: bool,
    guard: &'g TransferGuard,
}

impl<'g> ParamSync<'g> {
    #[must_use]
    pub const fn new(guard: &'g TransferGuard) -> Self {
        Self {
            cursor: 0,
            listing: false,
            guard,
        }
    }

    /// `true` between [`request_list`](Self::request_list) and the end of
    /// that listing.
    #[inline]
    #[must_use]
    pub fn is_listing(&self) -> bool {
        self.listing
    }

    /// Start a listing from the first parameter.
    ///
    /// The guard is raised immediately, before anything is sent, and stays
    /// up until [`poll`](Self::poll) has sent the last parameter. A request
    /// while a listing is running restarts it.
    pub fn request_list(&mut self, registry: &Registry<'_>) {
        self.cursor = 0;
        self.listing = !registry.is_empty();
        self.guard.set(self.listing);
        debug!("param list requested: {} entries", registry.len());
    }

    /// Send the next entry of a requested listing, if one is running.
    pub fn poll(&mut self, registry: &Registry<'_>, link: &mut dyn ParamLink) -> Enumeration {
        if !self.listing {
            return Enumeration::Complete;
        }
        self.enumerate_step(registry, link, false)
    }

    /// Index of the next parameter to send.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        usize::from(self.cursor)
    }

    /// Advance the enumeration by one parameter.
    ///
    /// With `reset` the cursor returns to zero, the guard is lowered and
    /// nothing is sent. Otherwise the guard is raised, the parameter at the
    /// cursor is sent and the cursor moves on; after the last parameter the
    /// cursor wraps, the guard is lowered and [`Enumeration::Complete`] is
    /// returned.
    pub fn enumerate_step(
        &mut self,
        registry: &Registry<'_>,
        link: &mut dyn ParamLink,
        reset: bool,
    ) -> Enumeration {
        if reset {
            self.cursor = 0;
            self.listing = false;
            self.guard.set(false);
            return Enumeration::Complete;
        }

        self.guard.set(true);
        let count = registry.len() as u16;
        if let Some(param) = registry.get(self.cursor()) {
            trace!("param list: {} of {}", self.cursor, count);
            link.send_value(&ParamReport::new(param, count, Some(self.cursor)));
            self.cursor += 1;
        }

        if self.cursor() >= registry.len() {
            self.cursor = 0;
            self.listing = false;
            self.guard.set(false);
            debug!("param list complete");
            Enumeration::Complete
        } else {
            Enumeration::Pending
        }
    }

    /// Send the parameter at `index`.
    pub fn send_one(
        &self,
        registry: &Registry<'_>,
        link: &mut dyn ParamLink,
        index: usize,
    ) -> Result<(), ParamError> {
        let param = registry.get(index).ok_or(ParamError::UnknownName)?;
        link.send_value(&ParamReport::new(
            param,
            registry.len() as u16,
            Some(index as u16),
        ));
        Ok(())
    }

    /// Send the parameter named by a protocol identifier.
    pub fn send_named(
        &self,
        registry: &Registry<'_>,
        link: &mut dyn ParamLink,
        id: &[u8],
    ) -> Result<(), ParamError> {
        if id_bytes(id).is_empty() {
            return Err(ParamError::EmptyName);
        }
        let (index, _) = registry.find_exact(id).ok_or(ParamError::UnknownName)?;
        self.send_one(registry, link, index)
    }

    /// Apply a remote write.
    ///
    /// `id` must match a parameter name exactly within its first 16 bytes.
    /// `value` is checked against the parameter's bounds in its native
    /// domain and truncated towards zero for integer parameters. `requested`
    /// is the type the sender believes the parameter has; it does not affect
    /// the write. On success the now-current value is echoed with index -1.
    /// On error nothing is written and nothing is sent.
    pub fn apply_set(
        &mut self,
        registry: &Registry<'_>,
        link: &mut dyn ParamLink,
        id: &[u8],
        value: f32,
        requested: Option<ParamKind>,
    ) -> Result<(), ParamError> {
        if id_bytes(id).is_empty() {
            return Err(ParamError::EmptyName);
        }
        let (_, param) = registry.find_exact(id).ok_or(ParamError::UnknownName)?;
        if requested.is_some_and(|kind| kind != param.kind()) {
            debug!("param set: type mismatch for {}", param.name());
        }

        // Integer parameters are range-checked before truncation.
        if let Err(err) = param.assign(Value::Float(value)) {
            warn!("param set rejected: {}", param.name());
            return Err(err);
        }

        link.send_value(&ParamReport::new(param, registry.len() as u16, None));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::testing::MockLink;
    use core::cell::Cell;
    use std::vec::Vec;

    struct Config {
        rc_mid: Cell<u16>,
        p_roll: Cell<u8>,
        accz_vcf: Cell<f32>,
        mag_dec: Cell<i16>,
    }

    impl Config {
        fn new() -> Self {
            Self {
                rc_mid: Cell::new(1500),
                p_roll: Cell::new(40),
                accz_vcf: Cell::new(0.5),
                mag_dec: Cell::new(-20),
            }
        }

        fn params(&self) -> [ParamDescriptor<'_>; 4] {
            [
                ParamDescriptor::uint16("rc_mid", &self.rc_mid, 1200, 1700),
                ParamDescriptor::uint8("p_roll", &self.p_roll, 0, 200),
                ParamDescriptor::float32("accz_vcf", &self.accz_vcf, 0.0, 1.0),
                ParamDescriptor::int16("mag_dec", &self.mag_dec, -18000, 18000),
            ]
        }
    }

    fn id(name: &str) -> [u8; PARAM_ID_LEN] {
        let mut id = [0u8; PARAM_ID_LEN];
        id[..name.len()].copy_from_slice(name.as_bytes());
        id
    }

    #[test]
    fn test_enumeration_visits_every_parameter_once() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        assert_eq!(
            sync.enumerate_step(&registry, &mut link, true),
            Enumeration::Complete
        );
        assert!(link.reports.is_empty());

        for step in 0..registry.len() {
            let status = sync.enumerate_step(&registry, &mut link, false);
            if step + 1 < registry.len() {
                assert_eq!(status, Enumeration::Pending);
                assert!(guard.in_progress());
            } else {
                assert_eq!(status, Enumeration::Complete);
                assert!(!guard.in_progress());
            }
        }

        let indices: Vec<Option<u16>> = link.reports.iter().map(|r| r.index).collect();
        assert_eq!(indices, [Some(0), Some(1), Some(2), Some(3)]);
        let names: Vec<&[u8]> = link.reports.iter().map(|r| r.name()).collect();
        assert_eq!(names, [&b"rc_mid"[..], b"p_roll", b"accz_vcf", b"mag_dec"]);
        assert!(link.reports.iter().all(|r| r.count == 4));
        assert_eq!(sync.cursor(), 0);
    }

    #[test]
    fn test_enumeration_reports_values_and_kinds() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        while sync.enumerate_step(&registry, &mut link, false) == Enumeration::Pending {}

        assert_eq!(link.reports[0].value, 1500.0);
        assert_eq!(link.reports[0].kind, ParamKind::U16);
        assert_eq!(link.reports[2].value, 0.5);
        assert_eq!(link.reports[2].kind, ParamKind::F32);
        assert_eq!(link.reports[3].value, -20.0);
        assert_eq!(link.reports[3].id, id("mag_dec"));
    }

    #[test]
    fn test_enumeration_is_resumable_and_resettable() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        sync.enumerate_step(&registry, &mut link, false);
        sync.enumerate_step(&registry, &mut link, false);
        assert_eq!(sync.cursor(), 2);
        assert!(guard.in_progress());

        sync.enumerate_step(&registry, &mut link, true);
        assert_eq!(sync.cursor(), 0);
        assert!(!guard.in_progress());
        assert_eq!(link.reports.len(), 2);

        sync.enumerate_step(&registry, &mut link, false);
        assert_eq!(link.reports[2].index, Some(0));
    }

    #[test]
    fn test_enumeration_of_empty_registry_completes() {
        let registry = Registry::new(&[]);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        assert_eq!(
            sync.enumerate_step(&registry, &mut link, false),
            Enumeration::Complete
        );
        assert!(link.reports.is_empty());
        assert!(!guard.in_progress());
    }

    #[test]
    fn test_request_list_raises_guard_before_first_entry() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        sync.request_list(&registry);
        assert!(guard.in_progress());
        assert!(sync.is_listing());
        assert!(link.reports.is_empty());

        let mut polls = 0;
        while sync.poll(&registry, &mut link) == Enumeration::Pending {
            polls += 1;
            assert!(guard.in_progress());
        }
        assert_eq!(polls, 3);
        assert_eq!(link.reports.len(), 4);
        assert!(!guard.in_progress());
        assert!(!sync.is_listing());

        // Idle polls send nothing.
        assert_eq!(sync.poll(&registry, &mut link), Enumeration::Complete);
        assert_eq!(link.reports.len(), 4);
    }

    #[test]
    fn test_request_list_restarts_running_listing() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        sync.request_list(&registry);
        sync.poll(&registry, &mut link);
        sync.poll(&registry, &mut link);
        sync.request_list(&registry);
        assert!(guard.in_progress());
        sync.poll(&registry, &mut link);
        assert_eq!(link.reports[2].index, Some(0));

        sync.enumerate_step(&registry, &mut link, true);
        assert!(!sync.is_listing());
        assert!(!guard.in_progress());
    }

    #[test]
    fn test_request_list_of_empty_registry_keeps_guard_down() {
        let registry = Registry::new(&[]);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        sync.request_list(&registry);
        assert!(!guard.in_progress());
        assert_eq!(sync.poll(&registry, &mut link), Enumeration::Complete);
        assert!(link.reports.is_empty());
    }

    #[test]
    fn test_apply_set_in_range_echoes() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        let result = sync.apply_set(&registry, &mut link, &id("p_roll"), 120.0, Some(ParamKind::U8));
        assert_eq!(result, Ok(()));
        assert_eq!(config.p_roll.get(), 120);
        assert_eq!(link.reports.len(), 1);
        assert_eq!(link.reports[0].index, None);
        assert_eq!(link.reports[0].wire_index(), -1);
        assert_eq!(link.reports[0].value, 120.0);
        assert_eq!(link.reports[0].kind, ParamKind::U8);
    }

    #[test]
    fn test_apply_set_out_of_range_rejected() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        let result = sync.apply_set(&registry, &mut link, &id("p_roll"), 250.0, None);
        assert_eq!(result, Err(ParamError::OutOfRange));
        assert_eq!(config.p_roll.get(), 40);
        assert!(link.reports.is_empty());

        let result = sync.apply_set(&registry, &mut link, &id("accz_vcf"), f32::NAN, None);
        assert_eq!(result, Err(ParamError::OutOfRange));
        assert_eq!(config.accz_vcf.get(), 0.5);
    }

    #[test]
    fn test_apply_set_boundaries_and_truncation() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        assert_eq!(sync.apply_set(&registry, &mut link, &id("p_roll"), 200.0, None), Ok(()));
        assert_eq!(config.p_roll.get(), 200);
        assert_eq!(
            sync.apply_set(&registry, &mut link, &id("p_roll"), 200.5, None),
            Err(ParamError::OutOfRange)
        );
        assert_eq!(sync.apply_set(&registry, &mut link, &id("mag_dec"), -12.9, None), Ok(()));
        assert_eq!(config.mag_dec.get(), -12);
        assert_eq!(sync.apply_set(&registry, &mut link, &id("accz_vcf"), 1.0, None), Ok(()));
        assert_eq!(config.accz_vcf.get(), 1.0);
    }

    #[test]
    fn test_apply_set_name_matching() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        assert_eq!(
            sync.apply_set(&registry, &mut link, &[0u8; 16], 1.0, None),
            Err(ParamError::EmptyName)
        );
        assert_eq!(
            sync.apply_set(&registry, &mut link, &id("p_rollx"), 1.0, None),
            Err(ParamError::UnknownName)
        );
        assert_eq!(
            sync.apply_set(&registry, &mut link, &id("p_rol"), 1.0, None),
            Err(ParamError::UnknownName)
        );
        assert_eq!(
            sync.apply_set(&registry, &mut link, &id("P_ROLL"), 1.0, None),
            Err(ParamError::UnknownName)
        );
        assert_eq!(config.p_roll.get(), 40);
        assert!(link.reports.is_empty());
    }

    #[test]
    fn test_apply_set_does_not_move_cursor() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let mut sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        sync.enumerate_step(&registry, &mut link, false);
        let _ = sync.apply_set(&registry, &mut link, &id("rc_mid"), 1600.0, None);
        assert_eq!(sync.cursor(), 1);
        assert!(guard.in_progress());
        assert_eq!(registry.find("rc_mid").map(|p| p.get()), Some(Value::Int(1600)));
    }

    #[test]
    fn test_send_one_and_named() {
        let config = Config::new();
        let params = config.params();
        let registry = Registry::new(&params);
        let guard = TransferGuard::new();
        let sync = ParamSync::new(&guard);
        let mut link = MockLink::default();

        assert_eq!(sync.send_one(&registry, &mut link, 2), Ok(()));
        assert_eq!(sync.send_one(&registry, &mut link, 9), Err(ParamError::UnknownName));
        assert_eq!(sync.send_named(&registry, &mut link, &id("mag_dec")), Ok(()));
        assert_eq!(sync.send_named(&registry, &mut link, b""), Err(ParamError::EmptyName));

        assert_eq!(link.reports.len(), 2);
        assert_eq!(link.reports[0].index, Some(2));
        assert_eq!(link.reports[1].index, Some(3));
        assert!(!guard.in_progress());
    }
}
