//! Parameter descriptor types: ParamKind, Value, ParamRef, ParamDescriptor.

use core::cell::Cell;

/// Maximum length of a parameter name, matching the binary protocol's
/// fixed-width identifier field.
pub const PARAM_ID_LEN: usize = 16;

/// Native storage type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    F32,
}

impl ParamKind {
    /// `true` for the single floating-point kind.
    #[inline]
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, ParamKind::F32)
    }

    /// Human-readable type name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ParamKind::U8 => "uint8",
            ParamKind::I8 => "int8",
            ParamKind::U16 => "uint16",
            ParamKind::I16 => "int16",
            ParamKind::U32 => "uint32",
            ParamKind::F32 => "float",
        }
    }
}

/// A parameter value widened to a common representation.
///
/// Integer kinds are sign- or zero-extended into `Int`; `uint32` values above
/// `i32::MAX` wrap, as they did in the legacy 32-bit signed view.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Value {
    Int(i32),
    Float(f32),
}

impl Value {
    /// Coerce to `f32`, as sent over the binary protocol.
    #[inline]
    #[must_use]
    pub fn as_f32(self) -> f32 {
        match self {
            Value::Int(v) => v as f32,
            Value::Float(v) => v,
        }
    }

    /// Coerce to `f64` for exact comparisons across representations.
    #[inline]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(v) => f64::from(v),
            Value::Float(v) => f64::from(v),
        }
    }
}

/// Non-owning, typed reference to parameter storage owned elsewhere.
///
/// Storage lives in `Cell`s so that both front ends can read and write
/// through a shared registry from a single execution context.
#[derive(Debug, Clone, Copy)]
pub enum ParamRef<'a> {
    U8(&'a Cell<u8>),
    I8(&'a Cell<i8>),
    U16(&'a Cell<u16>),
    I16(&'a Cell<i16>),
    U32(&'a Cell<u32>),
    F32(&'a Cell<f32>),
}

impl ParamRef<'_> {
    /// Storage type behind the reference.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            ParamRef::U8(_) => ParamKind::U8,
            ParamRef::I8(_) => ParamKind::I8,
            ParamRef::U16(_) => ParamKind::U16,
            ParamRef::I16(_) => ParamKind::I16,
            ParamRef::U32(_) => ParamKind::U32,
            ParamRef::F32(_) => ParamKind::F32,
        }
    }
}

/// Immutable metadata for one tunable parameter.
///
/// Bounds are inclusive and expressed in the parameter's native domain:
/// `Value::Float` for `float` parameters, `Value::Int` for everything else.
/// The constructors guarantee that pairing; the registry checks `min <= max`.
///
/// # Example
///
/// ```
/// use core::cell::Cell;
/// use param_core::{ParamDescriptor, Value};
///
/// let rc_mid = Cell::new(1500u16);
/// let desc = ParamDescriptor::uint16("rc_mid", &rc_mid, 1200, 1700).displayable();
///
/// assert_eq!(desc.get(), Value::Int(1500));
/// assert!(desc.is_displayable());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParamDescriptor<'a> {
    name: &'static str,
    value: ParamRef<'a>,
    min: Value,
    max: Value,
    displayable: bool,
}

impl<'a> ParamDescriptor<'a> {
    fn int(name: &'static str, value: ParamRef<'a>, min: i32, max: i32) -> Self {
        Self {
            name,
            value,
            min: Value::Int(min),
            max: Value::Int(max),
            displayable: false,
        }
    }

    /// Describe an unsigned 8-bit parameter.
    pub fn uint8(name: &'static str, cell: &'a Cell<u8>, min: i32, max: i32) -> Self {
        Self::int(name, ParamRef::U8(cell), min, max)
    }

    /// Describe a signed 8-bit parameter.
    pub fn int8(name: &'static str, cell: &'a Cell<i8>, min: i32, max: i32) -> Self {
        Self::int(name, ParamRef::I8(cell), min, max)
    }

    /// Describe an unsigned 16-bit parameter.
    pub fn uint16(name: &'static str, cell: &'a Cell<u16>, min: i32, max: i32) -> Self {
        Self::int(name, ParamRef::U16(cell), min, max)
    }

    /// Describe a signed 16-bit parameter.
    pub fn int16(name: &'static str, cell: &'a Cell<i16>, min: i32, max: i32) -> Self {
        Self::int(name, ParamRef::I16(cell), min, max)
    }

    /// Describe an unsigned 32-bit parameter.
    pub fn uint32(name: &'static str, cell: &'a Cell<u32>, min: i32, max: i32) -> Self {
        Self::int(name, ParamRef::U32(cell), min, max)
    }

    /// Describe a float parameter.
    pub fn float32(name: &'static str, cell: &'a Cell<f32>, min: f32, max: f32) -> Self {
        Self {
            name,
            value: ParamRef::F32(cell),
            min: Value::Float(min),
            max: Value::Float(max),
            displayable: false,
        }
    }

    /// Mark the parameter as browsable from the external display interface.
    #[must_use]
    pub fn displayable(mut self) -> Self {
        self.displayable = true;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.value.kind()
    }

    #[inline]
    #[must_use]
    pub fn storage(&self) -> ParamRef<'a> {
        self.value
    }

    /// Inclusive lower bound.
    #[inline]
    #[must_use]
    pub fn min(&self) -> Value {
        self.min
    }

    /// Inclusive upper bound.
    #[inline]
    #[must_use]
    pub fn max(&self) -> Value {
        self.max
    }

    #[inline]
    #[must_use]
    pub fn is_displayable(&self) -> bool {
        self.displayable
    }
}
