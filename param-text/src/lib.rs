//! Number text codec for the parameter console.
//!
//! Small, allocation-free conversions between numbers and ASCII text:
//!
//! - **Parsing**: lenient, never-failing readers for console input
//!   - [`parse_float()`] - decimal float with optional fraction and exponent
//!   - [`parse_int()`] - decimal integer with wrapping arithmetic
//!
//! - **Formatting**: deterministic renderers for parameter display
//!   - [`format_float()`] - fixed three fractional digits
//!   - [`format_int()`] - any radix from 2 to 36
//!
//! # Rounding
//!
//! [`format_float()`] rounds half away from zero at the third decimal by
//! biasing the magnitude with 0.0005 and truncating. The bias is applied to
//! the shortest decimal that reproduces the stored `f32`, so a value typed as
//! `1.0005` is shown as `1.001` even though its binary form is slightly
//! smaller. Console listings and configuration dumps rely on this exact
//! text.
//!
//! # Example
//!
//! ```
//! use param_text::{format_float, format_int, parse_float, parse_int};
//!
//! let text = format_float(parse_float(b"0.05"));
//! assert_eq!(text.as_str(), "0.050");
//!
//! let text = format_int(parse_int(b"-1500"), 10);
//! assert_eq!(text.as_str(), "-1500");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod format;
mod parse;

pub use format::{format_float, format_int, NumText, NUM_TEXT_LEN};
pub use parse::{parse_float, parse_int, MAX_EXPONENT};
