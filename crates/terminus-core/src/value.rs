//! Printable values attached to a diagnostic.
//!
//! The set of kinds is closed. A type can be passed to the entry points only
//! if it implements [`IntoValue`]; anything else is rejected by the compiler.

use std::borrow::Cow;
use std::fmt;

/// One printable context value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Str(Cow<'a, str>),
    Address(usize),
}

impl Value<'_> {
    /// Text used where the value acts as a label (pair names): strings are
    /// written without quotes, everything else as in [`fmt::Display`].
    pub(crate) fn write_label(&self, out: &mut impl fmt::Write) -> fmt::Result {
        match self {
            Value::Str(s) => out.write_str(s),
            other => write!(out, "{other}"),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::UInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Address(addr) => write!(f, "{addr:#x}"),
        }
    }
}

/// Conversion into a [`Value`]. Implemented for every supported primitive.
///
/// A type outside that set cannot be used as a pair value:
///
/// ```compile_fail
/// use terminus_core::Pair;
///
/// struct Opaque;
/// let _ = Pair::new("x", Opaque);
/// ```
pub trait IntoValue<'a> {
    fn into_value(self) -> Value<'a>;
}

impl<'a> IntoValue<'a> for Value<'a> {
    fn into_value(self) -> Value<'a> {
        self
    }
}

macro_rules! impl_into_value {
    ($variant:ident as $wide:ty: $($ty:ty),+) => {
        $(
            impl<'a> IntoValue<'a> for $ty {
                fn into_value(self) -> Value<'a> {
                    Value::$variant(self as $wide)
                }
            }
        )+
    };
}

impl_into_value!(Int as i64: i8, i16, i32, i64, isize);
impl_into_value!(UInt as u64: u8, u16, u32, u64, usize);
impl_into_value!(Float as f64: f32, f64);

impl<'a> IntoValue<'a> for bool {
    fn into_value(self) -> Value<'a> {
        Value::Bool(self)
    }
}

impl<'a> IntoValue<'a> for &'a str {
    fn into_value(self) -> Value<'a> {
        Value::Str(Cow::Borrowed(self))
    }
}

impl<'a> IntoValue<'a> for &'a String {
    fn into_value(self) -> Value<'a> {
        Value::Str(Cow::Borrowed(self.as_str()))
    }
}

impl<'a> IntoValue<'a> for String {
    fn into_value(self) -> Value<'a> {
        Value::Str(Cow::Owned(self))
    }
}

impl<'a, T: ?Sized> IntoValue<'a> for *const T {
    fn into_value(self) -> Value<'a> {
        Value::Address(self.cast::<()>() as usize)
    }
}

impl<'a, T: ?Sized> IntoValue<'a> for *mut T {
    fn into_value(self) -> Value<'a> {
        Value::Address(self.cast::<()>() as usize)
    }
}
