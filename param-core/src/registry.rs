//! Parameter registry: the fixed, ordered set of descriptors.
//!
//! Listing order is the order the descriptors were supplied in. Lookups go
//! through a second, name-sorted index so that name resolution is a binary
//! search regardless of how the table is laid out.

use core::cmp::Ordering;

use heapless::Vec;

use crate::name::{cmp_ignore_case, id_bytes, starts_with_ignore_case};
use crate::types::{ParamDescriptor, PARAM_ID_LEN};

/// Maximum number of parameters in one registry.
pub const MAX_PARAMS: usize = 256;

/// The full parameter set, shared by every front end.
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use param_core::{ParamDescriptor, Registry, Value};
///
/// let rc_mid = Cell::new(1500u16);
/// let p_roll = Cell::new(40u8);
/// let params = [
///     ParamDescriptor::uint16("rc_mid", &rc_mid, 1200, 1700),
///     ParamDescriptor::uint8("p_roll", &p_roll, 0, 200),
/// ];
/// let registry = Registry::new(&params);
///
/// assert_eq!(registry.index_of("P_ROLL"), Some(1));
/// assert_eq!(registry.find("rc_mid").map(|d| d.get()), Some(Value::Int(1500)));
/// ```
pub struct Registry<'a> {
    params: &'a [ParamDescriptor<'a>],
    by_name: Vec<u16, MAX_PARAMS>,
}

impl<'a> Registry<'a> {
    /// Build a registry over a fixed descriptor table.
    ///
    /// # Panics
    ///
    /// The table is fixed at build time, so malformed tables are rejected
    /// here: more than [`MAX_PARAMS`] entries, a name that is empty, longer
    /// than [`PARAM_ID_LEN`] or not printable ASCII without `=`, inverted or
    /// NaN bounds, or two names equal ignoring case.
    #[must_use]
    pub fn new(params: &'a [ParamDescriptor<'a>]) -> Self {
        assert!(params.len() <= MAX_PARAMS, "too many parameters");

        let mut by_name: Vec<u16, MAX_PARAMS> = Vec::new();
        for (index, param) in params.iter().enumerate() {
            let name = param.name();
            assert!(
                !name.is_empty() && name.len() <= PARAM_ID_LEN,
                "parameter name length"
            );
            assert!(
                name.bytes().all(|b| b.is_ascii_graphic() && b != b'='),
                "parameter name characters"
            );
            assert!(
                param.min().as_f64() <= param.max().as_f64(),
                "parameter bounds inverted"
            );
            let _ = by_name.push(index as u16);
        }

        by_name.sort_unstable_by(|&a, &b| {
            cmp_ignore_case(
                params[usize::from(a)].name().as_bytes(),
                params[usize::from(b)].name().as_bytes(),
            )
        });
        for pair in by_name.windows(2) {
            assert!(
                cmp_ignore_case(
                    params[usize::from(pair[0])].name().as_bytes(),
                    params[usize::from(pair[1])].name().as_bytes(),
                ) != Ordering::Equal,
                "duplicate parameter name"
            );
        }

        debug!("parameter registry: {} entries", params.len());
        Self { params, by_name }
    }

    /// Number of parameters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Descriptor at `index` in listing order.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ParamDescriptor<'a>> {
        self.params.get(index)
    }

    /// Iterate in listing order.
    pub fn iter(&self) -> core::slice::Iter<'_, ParamDescriptor<'a>> {
        self.params.iter()
    }

    /// Listing index of the parameter named `name`, ignoring case.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.search(name.as_bytes())
    }

    /// Descriptor named `name`, ignoring case.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&ParamDescriptor<'a>> {
        self.index_of(name).and_then(|index| self.get(index))
    }

    /// Resolve a fixed-width protocol identifier, byte for byte.
    ///
    /// Only the first [`PARAM_ID_LEN`] bytes are compared and a NUL ends the
    /// identifier, so unterminated full-width names work. Case must match.
    #[must_use]
    pub fn find_exact(&self, id: &[u8]) -> Option<(usize, &ParamDescriptor<'a>)> {
        let id = id_bytes(id);
        let index = self.search(id)?;
        let param = self.get(index)?;
        (param.name().as_bytes() == id).then_some((index, param))
    }

    /// Parameters whose name starts with `prefix`, in listing order.
    pub fn with_prefix<'s>(
        &'s self,
        prefix: &'s str,
    ) -> impl Iterator<Item = &'s ParamDescriptor<'a>> + 's {
        self.params
            .iter()
            .filter(move |param| starts_with_ignore_case(param.name(), prefix))
    }

    /// Next displayable parameter after `from`, wrapping at the end.
    ///
    /// Returns `from` itself when it is the only displayable entry and
    /// `None` when there is none.
    #[must_use]
    pub fn next_displayable(&self, from: usize) -> Option<usize> {
        let len = self.len();
        (1..=len)
            .map(|step| (from % len.max(1) + step) % len)
            .find(|&index| self.params[index].is_displayable())
    }

    /// Previous displayable parameter before `from`, wrapping at the start.
    #[must_use]
    pub fn prev_displayable(&self, from: usize) -> Option<usize> {
        let len = self.len();
        (1..=len)
            .map(|step| (from % len.max(1) + len - step) % len)
            .find(|&index| self.params[index].is_displayable())
    }

    fn search(&self, name: &[u8]) -> Option<usize> {
        self.by_name
            .binary_search_by(|&index| {
                cmp_ignore_case(self.params[usize::from(index)].name().as_bytes(), name)
            })
            .ok()
            .map(|pos| usize::from(self.by_name[pos]))
    }
}
