//! # Scalar Coercion
//!
//! Every value written to the server passes through [`Scalar`], a closed set
//! of supported argument types. Conversion into wire bytes happens once, when
//! the argument is pushed onto a [`Command`](crate::Command).

use bytes::Bytes;

/// A value that can be sent as a command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Bytes),
}

impl Scalar {
    /// Renders the value into its RESP bulk-string payload.
    pub fn into_wire(self) -> Bytes {
        match self {
            Scalar::Int(n) => Bytes::copy_from_slice(itoa::Buffer::new().format(n).as_bytes()),
            Scalar::UInt(n) => Bytes::copy_from_slice(itoa::Buffer::new().format(n).as_bytes()),
            Scalar::Float(f) => Bytes::from(format_float(f)),
            Scalar::Str(s) => Bytes::from(s),
            Scalar::Bytes(b) => b,
        }
    }

    /// True when the wire form is empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Str(s) => s.is_empty(),
            Scalar::Bytes(b) => b.is_empty(),
            Scalar::Int(_) | Scalar::UInt(_) | Scalar::Float(_) => false,
        }
    }
}

// Shortest round-trip form; integral values carry no fraction ("2", not "2.0").
fn format_float(f: f64) -> String {
    if f.is_infinite() {
        return if f > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    f.to_string()
}

/// Borrows a string-like item; used to feed slices of names into commands.
pub(crate) fn as_str<S: AsRef<str>>(value: &S) -> &str {
    value.as_ref()
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant($conv(value))
                }
            }
        )*
    };
}

scalar_from! {
    i32 => Int(i64::from),
    i64 => Int(std::convert::identity),
    u32 => UInt(u64::from),
    u64 => UInt(std::convert::identity),
    usize => UInt(|v: usize| v as u64),
    f64 => Float(std::convert::identity),
    String => Str(std::convert::identity),
    &str => Str(str::to_string),
    &String => Str(String::clone),
    Vec<u8> => Bytes(Bytes::from),
    &[u8] => Bytes(Bytes::copy_from_slice),
    Bytes => Bytes(std::convert::identity),
}

impl<const N: usize> From<&[u8; N]> for Scalar {
    fn from(value: &[u8; N]) -> Self {
        Scalar::Bytes(Bytes::copy_from_slice(value))
    }
}
