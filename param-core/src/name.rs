//! Case-insensitive name helpers shared by the registry and command table.

use core::cmp::Ordering;

use crate::types::PARAM_ID_LEN;

/// Compare two ASCII names ignoring case.
///
/// `const` so command tables can be checked for sortedness at compile time.
#[must_use]
pub const fn cmp_ignore_case(a: &[u8], b: &[u8]) -> Ordering {
    let mut i = 0;
    while i < a.len() && i < b.len() {
        let x = a[i].to_ascii_lowercase();
        let y = b[i].to_ascii_lowercase();
        if x < y {
            return Ordering::Less;
        }
        if x > y {
            return Ordering::Greater;
        }
        i += 1;
    }
    if a.len() < b.len() {
        Ordering::Less
    } else if a.len() > b.len() {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

/// `true` if `name` starts with `prefix`, ignoring ASCII case.
#[inline]
#[must_use]
pub fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.len() >= prefix.len()
        && name.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Significant bytes of a fixed-width protocol identifier.
///
/// At most [`PARAM_ID_LEN`] bytes are considered; a NUL ends the identifier
/// early. A full-width identifier carries no terminator.
#[must_use]
pub fn id_bytes(id: &[u8]) -> &[u8] {
    let id = &id[..id.len().min(PARAM_ID_LEN)];
    let end = id.iter().position(|&b| b == 0).unwrap_or(id.len());
    &id[..end]
}
