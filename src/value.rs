use crate::{number, str_to_bool, BoxError, ConvertError};
use std::{
    borrow::Cow,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

/// Where a conversion happens relative to the registered destination.
///
/// Sequences and maps may only be parsed at the top level. Their elements, keys and values are
/// parsed as `Element`, which rejects any further sequence or map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Nesting {
    /// The registered destination itself (possibly behind `Option` / `Box`)
    TopLevel,
    /// An element, key or value inside a sequence or map
    Element,
}

/// A type which can be produced from one resolved text value.
///
/// Implementations exist for strings, all integer widths, `bool`, floats, `Duration`, a few
/// `FromStr` types from std, `Option<T>` and `Box<T>` (which are transparent), `Vec<T>`, and
/// `HashMap` / `BTreeMap`. Other types can opt in with [`conf_value!`](crate::conf_value),
/// which routes conversion through a [`TextDecode`], [`BinaryDecode`] or `FromStr` impl.
///
/// A type with an empty impl can be registered, but every conversion fails with
/// [`ConvertError::UnsupportedDestinationType`].
pub trait ConfValue: Sized {
    /// Convert one text value into `Self`.
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        let _ = (text, nesting);
        Err(ConvertError::UnsupportedDestinationType(Self::type_name()))
    }

    /// Convert a top-level sequence of `Self`. The text is split on `,`, and each piece is
    /// converted as an element. `u8` overrides this to take the raw bytes instead.
    fn convert_sequence(text: &str) -> Result<Vec<Self>, ConvertError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        text.split(',')
            .map(|item| Self::convert(item, Nesting::Element))
            .collect()
    }

    /// Name used in error messages
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed(std::any::type_name::<Self>())
    }
}

/// A type that decodes itself from raw text, taking precedence over the built-in grammar.
pub trait TextDecode: Sized {
    /// Build `Self` from the resolved text
    fn decode_text(text: &[u8]) -> Result<Self, BoxError>;
}

/// A type that decodes itself from raw bytes. This is used when a type has no text decoder.
pub trait BinaryDecode: Sized {
    /// Build `Self` from the resolved bytes
    fn decode_binary(data: &[u8]) -> Result<Self, BoxError>;
}

/// Convert via a [`TextDecode`] impl. Used by [`conf_value!`](crate::conf_value).
#[doc(hidden)]
pub fn decode_text<T: TextDecode>(text: &str) -> Result<T, ConvertError> {
    T::decode_text(text.as_bytes()).map_err(ConvertError::Decode)
}

/// Convert via a [`BinaryDecode`] impl. Used by [`conf_value!`](crate::conf_value).
#[doc(hidden)]
pub fn decode_binary<T: BinaryDecode>(text: &str) -> Result<T, ConvertError> {
    T::decode_binary(text.as_bytes()).map_err(ConvertError::Decode)
}

/// Convert via a `FromStr` impl. Used by [`conf_value!`](crate::conf_value).
#[doc(hidden)]
pub fn decode_from_str<T>(text: &str) -> Result<T, ConvertError>
where
    T: FromStr + ConfValue,
    T::Err: std::fmt::Display,
{
    text.parse()
        .map_err(|err| ConvertError::invalid_value(T::type_name(), text, err))
}

/// Implement [`ConfValue`] for a type by delegating to one of its decoders.
///
/// ```
/// use confvar::{conf_value, BoxError, TextDecode};
///
/// #[derive(Debug, PartialEq)]
/// struct Upper(String);
///
/// impl TextDecode for Upper {
///     fn decode_text(text: &[u8]) -> Result<Self, BoxError> {
///         Ok(Upper(std::str::from_utf8(text)?.to_uppercase()))
///     }
/// }
///
/// conf_value!(text Upper);
/// ```
///
/// Use `text` for [`TextDecode`], `binary` for [`BinaryDecode`], and `from_str` for `FromStr`.
/// When a type has both decoders, register it with `text`.
#[macro_export]
macro_rules! conf_value {
    (text $ty:ty) => {
        impl $crate::ConfValue for $ty {
            fn convert(
                text: &str,
                _nesting: $crate::Nesting,
            ) -> ::core::result::Result<Self, $crate::ConvertError> {
                $crate::decode_text::<$ty>(text)
            }
        }
    };
    (binary $ty:ty) => {
        impl $crate::ConfValue for $ty {
            fn convert(
                text: &str,
                _nesting: $crate::Nesting,
            ) -> ::core::result::Result<Self, $crate::ConvertError> {
                $crate::decode_binary::<$ty>(text)
            }
        }
    };
    (from_str $ty:ty) => {
        impl $crate::ConfValue for $ty {
            fn convert(
                text: &str,
                _nesting: $crate::Nesting,
            ) -> ::core::result::Result<Self, $crate::ConvertError> {
                $crate::decode_from_str::<$ty>(text)
            }
        }
    };
}

impl ConfValue for String {
    fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
        Ok(text.to_owned())
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl ConfValue for $ty {
            fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
                number::parse_signed(text)
                    .map_err(|err| ConvertError::invalid_value(stringify!($ty), text, err))
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, i128, isize);

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl ConfValue for $ty {
            fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
                number::parse_unsigned(text)
                    .map_err(|err| ConvertError::invalid_value(stringify!($ty), text, err))
            }
        }
    )*};
}

impl_unsigned!(u16, u32, u64, u128, usize);

impl ConfValue for u8 {
    fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
        number::parse_unsigned(text).map_err(|err| ConvertError::invalid_value("u8", text, err))
    }

    // A byte sequence is the raw text, never split
    fn convert_sequence(text: &str) -> Result<Vec<Self>, ConvertError> {
        Ok(text.as_bytes().to_vec())
    }
}

impl ConfValue for bool {
    fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
        str_to_bool(text).map_err(|err| ConvertError::invalid_value("bool", text, err))
    }
}

macro_rules! impl_float {
    ($($ty:ty),*) => {$(
        impl ConfValue for $ty {
            fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
                let value = text
                    .parse::<$ty>()
                    .map_err(|err| ConvertError::invalid_value(stringify!($ty), text, err))?;
                if !value.is_finite() && !is_non_finite_literal(text) {
                    return Err(ConvertError::invalid_value(
                        stringify!($ty),
                        text,
                        "value out of range",
                    ));
                }
                Ok(value)
            }
        }
    )*};
}

impl_float!(f32, f64);

// A finite literal that overflows the destination width parses to infinity, so only the
// spelled-out forms may produce a non-finite value
fn is_non_finite_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    ["inf", "infinity", "nan"]
        .iter()
        .any(|word| unsigned.eq_ignore_ascii_case(word))
}

// Durations use a unit-suffixed literal grammar such as `5m`, `1h30m` or `250ms`
impl ConfValue for Duration {
    fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
        humantime::parse_duration(text)
            .map_err(|err| ConvertError::invalid_value("duration", text, err))
    }
}

macro_rules! impl_from_str {
    ($($ty:ty),*) => {$(
        impl ConfValue for $ty {
            fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
                decode_from_str(text)
            }
        }
    )*};
}

impl_from_str!(char, PathBuf, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr);

// Indirection is transparent: nesting passes through unchanged, and a custom decoder on `T`
// is reached through `T::convert`.
impl<T: ConfValue> ConfValue for Option<T> {
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        T::convert(text, nesting).map(Some)
    }

    fn type_name() -> Cow<'static, str> {
        format!("Option<{}>", T::type_name()).into()
    }
}

impl<T: ConfValue> ConfValue for Box<T> {
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        T::convert(text, nesting).map(Box::new)
    }

    fn type_name() -> Cow<'static, str> {
        format!("Box<{}>", T::type_name()).into()
    }
}
