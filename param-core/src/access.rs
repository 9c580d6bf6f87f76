//! Typed access to parameter storage.
//!
//! Reads and writes go through the descriptor's [`ParamRef`], so the native
//! width and signedness of every parameter is respected without any
//! pointer reinterpretation. The only bit-level conversion is the explicit
//! `f32::from_bits` / `f32::to_bits` pair used for float parameters.

use heapless::String;
use param_text::{format_float, format_int, NumText};

use crate::types::{ParamDescriptor, ParamKind, ParamRef, Value};

/// Capacity of a rendered parameter: value plus both bounds.
pub const PARAM_TEXT_LEN: usize = 40;

/// Rendered parameter value, optionally followed by its bounds.
pub type ParamText = String<PARAM_TEXT_LEN>;

/// Error type for parameter assignment and lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// Empty or placeholder parameter name.
    EmptyName,
    /// No parameter with that name.
    UnknownName,
    /// Value outside the inclusive `[min, max]` range.
    OutOfRange,
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamError::EmptyName => write!(f, "empty parameter name"),
            ParamError::UnknownName => write!(f, "unknown parameter name"),
            ParamError::OutOfRange => write!(f, "value out of range"),
        }
    }
}

impl Value {
    /// Coerce to `i32`, truncating floats towards zero (saturating).
    #[inline]
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            Value::Int(v) => v,
            Value::Float(v) => v as i32,
        }
    }

    /// Render with the parameter text codec.
    #[must_use]
    pub fn to_text(self) -> NumText {
        match self {
            Value::Int(v) => format_int(v, 10),
            Value::Float(v) => format_float(v),
        }
    }
}

impl ParamDescriptor<'_> {
    /// Read the current value. No clamping is applied.
    #[must_use]
    pub fn get(&self) -> Value {
        match self.storage() {
            ParamRef::U8(c) => Value::Int(i32::from(c.get())),
            ParamRef::I8(c) => Value::Int(i32::from(c.get())),
            ParamRef::U16(c) => Value::Int(i32::from(c.get())),
            ParamRef::I16(c) => Value::Int(i32::from(c.get())),
            ParamRef::U32(c) => Value::Int(c.get() as i32),
            ParamRef::F32(c) => Value::Float(c.get()),
        }
    }

    /// Write raw bits through the storage type.
    ///
    /// Integer kinds keep the low-order bits that fit their width. Float
    /// parameters reinterpret `raw_bits` as an IEEE-754 single; use
    /// [`encode`](Self::encode) to produce the right pattern. No bounds check
    /// is done here.
    pub fn set(&self, raw_bits: u32) {
        match self.storage() {
            ParamRef::U8(c) => c.set(raw_bits as u8),
            ParamRef::I8(c) => c.set(raw_bits as u8 as i8),
            ParamRef::U16(c) => c.set(raw_bits as u16),
            ParamRef::I16(c) => c.set(raw_bits as u16 as i16),
            ParamRef::U32(c) => c.set(raw_bits),
            ParamRef::F32(c) => c.set(f32::from_bits(raw_bits)),
        }
    }

    /// Raw bits of the current value, the inverse of [`set`](Self::set).
    #[must_use]
    pub fn raw_bits(&self) -> u32 {
        match self.storage() {
            ParamRef::U8(c) => u32::from(c.get()),
            ParamRef::I8(c) => c.get() as u8 as u32,
            ParamRef::U16(c) => u32::from(c.get()),
            ParamRef::I16(c) => c.get() as u16 as u32,
            ParamRef::U32(c) => c.get(),
            ParamRef::F32(c) => c.get().to_bits(),
        }
    }

    /// The value [`set`](Self::set) would store for `raw_bits`, without
    /// writing anything.
    #[must_use]
    pub fn decode(&self, raw_bits: u32) -> Value {
        match self.kind() {
            ParamKind::U8 => Value::Int(i32::from(raw_bits as u8)),
            ParamKind::I8 => Value::Int(i32::from(raw_bits as u8 as i8)),
            ParamKind::U16 => Value::Int(i32::from(raw_bits as u16)),
            ParamKind::I16 => Value::Int(i32::from(raw_bits as u16 as i16)),
            ParamKind::U32 => Value::Int(raw_bits as i32),
            ParamKind::F32 => Value::Float(f32::from_bits(raw_bits)),
        }
    }

    /// Convert a value into the raw bits [`set`](Self::set) expects.
    ///
    /// Floats assigned to integer parameters truncate towards zero.
    #[must_use]
    pub fn encode(&self, value: Value) -> u32 {
        if self.kind().is_float() {
            value.as_f32().to_bits()
        } else {
            value.as_i32() as u32
        }
    }

    /// Whether `value` lies within `[min, max]`, compared in the native
    /// domain. Boundaries are accepted; NaN never is.
    #[must_use]
    pub fn accepts(&self, value: Value) -> bool {
        if self.kind().is_float() {
            let v = value.as_f32();
            self.min().as_f32() <= v && v <= self.max().as_f32()
        } else {
            // Every i32 is exact in f64, so this is an integer comparison
            // that also handles fractional or huge float input.
            let v = value.as_f64();
            self.min().as_f64() <= v && v <= self.max().as_f64()
        }
    }

    /// Validate and store `value`. Nothing is written on error.
    pub fn assign(&self, value: Value) -> Result<(), ParamError> {
        if !self.accepts(value) {
            return Err(ParamError::OutOfRange);
        }
        self.set(self.encode(value));
        Ok(())
    }

    /// Step the value by `delta` and saturate into `[min, max]`.
    ///
    /// Float parameters step by `delta / 1000`.
    pub fn adjust(&self, delta: i32) {
        let bits = match self.get() {
            Value::Float(current) => {
                let step = delta as f32 / 1000.0;
                let next = (current + step)
                    .max(self.min().as_f32())
                    .min(self.max().as_f32());
                next.to_bits()
            }
            Value::Int(current) => {
                let lo = i64::from(self.min().as_i32());
                let hi = i64::from(self.max().as_i32());
                let next = (i64::from(current) + i64::from(delta)).clamp(lo, hi);
                next as i32 as u32
            }
        };
        self.set(bits);
    }

    /// Render the current value, optionally followed by ` min max`.
    #[must_use]
    pub fn format(&self, include_bounds: bool) -> ParamText {
        let mut out = ParamText::new();
        let _ = out.push_str(&self.get().to_text());
        if include_bounds {
            let _ = out.push(' ');
            let _ = out.push_str(&self.min().to_text());
            let _ = out.push(' ');
            let _ = out.push_str(&self.max().to_text());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    #[test]
    fn test_get_sign_and_zero_extension() {
        let u = Cell::new(200u8);
        let i = Cell::new(-5i8);
        let w = Cell::new(0xFFFFu16);
        let s = Cell::new(-300i16);

        assert_eq!(ParamDescriptor::uint8("u", &u, 0, 255).get(), Value::Int(200));
        assert_eq!(ParamDescriptor::int8("i", &i, -128, 127).get(), Value::Int(-5));
        assert_eq!(
            ParamDescriptor::uint16("w", &w, 0, 65535).get(),
            Value::Int(65535)
        );
        assert_eq!(
            ParamDescriptor::int16("s", &s, -1000, 1000).get(),
            Value::Int(-300)
        );
    }

    #[test]
    fn test_set_truncates_to_native_width() {
        let u = Cell::new(0u8);
        let i = Cell::new(0i8);
        let w = Cell::new(0u16);

        ParamDescriptor::uint8("u", &u, 0, 255).set(0x1234);
        ParamDescriptor::int8("i", &i, -128, 127).set(0xFF);
        ParamDescriptor::uint16("w", &w, 0, 65535).set(0xDEAD_BEEF);

        assert_eq!(u.get(), 0x34);
        assert_eq!(i.get(), -1);
        assert_eq!(w.get(), 0xBEEF);
    }

    #[test]
    fn test_float_bit_pattern_fidelity() {
        let f = Cell::new(0.0f32);
        let desc = ParamDescriptor::float32("f", &f, -10.0, 10.0);

        for v in [0.1f32, -2.25, 9.999_999, f32::MIN_POSITIVE] {
            desc.set(desc.encode(Value::Float(v)));
            assert_eq!(desc.get(), Value::Float(v));
            assert_eq!(desc.raw_bits(), v.to_bits());
        }
    }

    #[test]
    fn test_round_trip_every_kind_within_bounds() {
        let u8c = Cell::new(0u8);
        let i8c = Cell::new(0i8);
        let u16c = Cell::new(0u16);
        let i16c = Cell::new(0i16);
        let u32c = Cell::new(0u32);

        let cases = [
            (ParamDescriptor::uint8("a", &u8c, 0, 255), [0, 128, 255]),
            (ParamDescriptor::int8("b", &i8c, -128, 127), [-128, 0, 127]),
            (ParamDescriptor::uint16("c", &u16c, 0, 65535), [0, 1500, 65535]),
            (ParamDescriptor::int16("d", &i16c, -32768, 32767), [-32768, -1, 32767]),
            (
                ParamDescriptor::uint32("e", &u32c, 0, 0x7FFF_FFFF),
                [0, 1, 0x7FFF_FFFF],
            ),
        ];
        for (desc, values) in cases {
            for v in values {
                desc.set(desc.encode(Value::Int(v)));
                assert_eq!(desc.get(), Value::Int(v));
                let bits = desc.raw_bits();
                desc.set(0);
                desc.set(bits);
                assert_eq!(desc.get(), Value::Int(v));
            }
        }
    }

    #[test]
    fn test_decode_matches_set() {
        let i = Cell::new(0i8);
        let desc = ParamDescriptor::int8("i", &i, -128, 127);
        for bits in [0u32, 0x7F, 0x80, 0xFF, 0x1234_56FE] {
            let decoded = desc.decode(bits);
            desc.set(bits);
            assert_eq!(desc.get(), decoded);
        }

        let f = Cell::new(0.0f32);
        let desc = ParamDescriptor::float32("f", &f, 0.0, 1.0);
        assert_eq!(desc.decode(0.25f32.to_bits()), Value::Float(0.25));
        assert!(!desc.accepts(desc.decode(f32::NAN.to_bits())));
        assert_eq!(f.get(), 0.0);
    }

    #[test]
    fn test_accepts_boundaries_in_native_domain() {
        let c = Cell::new(1500u16);
        let desc = ParamDescriptor::uint16("rc_mid", &c, 1200, 1700);

        assert!(desc.accepts(Value::Int(1200)));
        assert!(desc.accepts(Value::Int(1700)));
        assert!(!desc.accepts(Value::Int(1199)));
        assert!(!desc.accepts(Value::Int(1701)));
        assert!(desc.accepts(Value::Float(1700.0)));
        assert!(!desc.accepts(Value::Float(1700.5)));
        assert!(!desc.accepts(Value::Float(f32::NAN)));
        assert!(!desc.accepts(Value::Float(f32::INFINITY)));

        let f = Cell::new(0.5f32);
        let desc = ParamDescriptor::float32("accz_vcf", &f, 0.0, 1.0);
        assert!(desc.accepts(Value::Float(0.0)));
        assert!(desc.accepts(Value::Float(1.0)));
        assert!(!desc.accepts(Value::Float(1.0001)));
        assert!(!desc.accepts(Value::Float(-0.0001)));
        assert!(desc.accepts(Value::Int(1)));
    }

    #[test]
    fn test_assign_out_of_range_leaves_value() {
        let c = Cell::new(1500u16);
        let desc = ParamDescriptor::uint16("rc_mid", &c, 1200, 1700);

        assert_eq!(desc.assign(Value::Int(50)), Err(ParamError::OutOfRange));
        assert_eq!(c.get(), 1500);
        assert_eq!(desc.assign(Value::Int(1600)), Ok(()));
        assert_eq!(c.get(), 1600);
    }

    #[test]
    fn test_assign_float_to_int_truncates() {
        let c = Cell::new(0u8);
        let desc = ParamDescriptor::uint8("p_roll", &c, 0, 200);

        assert_eq!(desc.assign(Value::Float(199.7)), Ok(()));
        assert_eq!(c.get(), 199);
    }

    #[test]
    fn test_adjust_saturates() {
        let c = Cell::new(195u8);
        let desc = ParamDescriptor::uint8("p_roll", &c, 0, 200);

        desc.adjust(10);
        assert_eq!(c.get(), 200);
        desc.adjust(i32::MAX);
        assert_eq!(c.get(), 200);
        desc.adjust(-250);
        assert_eq!(c.get(), 0);
        desc.adjust(i32::MIN);
        assert_eq!(c.get(), 0);
        desc.adjust(7);
        assert_eq!(c.get(), 7);
    }

    #[test]
    fn test_adjust_float_steps_in_thousandths() {
        let f = Cell::new(0.5f32);
        let desc = ParamDescriptor::float32("accz_vcf", &f, 0.0, 1.0);

        desc.adjust(1);
        assert_eq!(desc.format(false).as_str(), "0.501");
        desc.adjust(10_000);
        assert_eq!(f.get(), 1.0);
        desc.adjust(-10_000);
        assert_eq!(f.get(), 0.0);
    }

    #[test]
    fn test_adjust_pulls_out_of_range_value_into_bounds() {
        let c = Cell::new(100u16);
        let desc = ParamDescriptor::uint16("rc_mid", &c, 1200, 1700);

        desc.adjust(1);
        assert_eq!(c.get(), 1200);
    }

    #[test]
    fn test_format_with_and_without_bounds() {
        let c = Cell::new(1500u16);
        let desc = ParamDescriptor::uint16("rc_mid", &c, 1200, 1700);
        assert_eq!(desc.format(false).as_str(), "1500");
        assert_eq!(desc.format(true).as_str(), "1500 1200 1700");

        let f = Cell::new(0.5f32);
        let desc = ParamDescriptor::float32("accz_vcf", &f, 0.0, 1.0);
        assert_eq!(desc.format(false).as_str(), "0.500");
        assert_eq!(desc.format(true).as_str(), "0.500 0.000 1.000");

        let n = Cell::new(-40i16);
        let desc = ParamDescriptor::int16("mag_dec", &n, -18000, 18000);
        assert_eq!(desc.format(true).as_str(), "-40 -18000 18000");
    }
}
