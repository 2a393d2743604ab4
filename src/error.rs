use clap::{error::ErrorKind, Error as ClapError};
use std::{borrow::Cow, fmt};

/// Type-erased error returned by lookup sources and custom decoders
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error which occurs when a `Registry::try_parse` call fails.
/// This represents every field that failed during one pass, sorted by field name.
#[derive(Debug)]
pub struct Error {
    errors: Vec<FieldError>,
}

impl Error {
    // Sorting happens here so that the report doesn't depend on registry storage order.
    pub(crate) fn from_field_errors(mut errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            return None;
        }
        errors.sort_by(|a, b| a.name.cmp(&b.name));
        Some(Self { errors })
    }

    /// The per-field errors, sorted lexically by field name
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Look up the error recorded for one field, if that field failed
    pub fn get(&self, name: &str) -> Option<&InnerError> {
        self.errors
            .iter()
            .find(|field_error| field_error.name == name)
            .map(|field_error| &field_error.error)
    }

    /// Print formatted and colored error text to stderr (as clap does)
    pub fn print(&self) -> Result<(), std::io::Error> {
        self.to_clap_error().print()
    }

    /// Exit the program, printing an error message to stderr (as clap does)
    pub fn exit(&self) -> ! {
        self.to_clap_error().exit()
    }

    /// The exit code this error will exit the program with
    pub fn exit_code(&self) -> i32 {
        self.to_clap_error().exit_code()
    }

    fn to_clap_error(&self) -> ClapError {
        ClapError::raw(ErrorKind::ValueValidation, format!("{self}\n"))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "failed to parse variable(s):")?;
        for field_error in &self.errors {
            write!(f, "\n  - {field_error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// A failure attributed to one named field
#[derive(Debug)]
pub struct FieldError {
    /// Name the field was registered under
    pub name: String,
    /// What went wrong
    pub error: InnerError,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}

/// A single problem that occurs while resolving one field
#[derive(Debug)]
pub enum InnerError {
    /// The field is required but no source had it
    MissingRequired,
    /// The field was found with an empty value, and empty values are rejected
    EmptyValue,
    /// The value was found but could not be converted to the destination type
    Conversion(ConvertError),
    /// A lookup source failed, or something panicked while resolving the field
    SourceFault(String),
}

impl InnerError {
    /// Helper which makes SourceFault from a panic payload
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let msg = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => payload
                .downcast_ref::<&'static str>()
                .map(|s| (*s).to_owned())
                .unwrap_or_else(|| "panicked while resolving field".to_owned()),
        };
        Self::SourceFault(msg)
    }
}

impl fmt::Display for InnerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MissingRequired => write!(f, "field is required"),
            Self::EmptyValue => write!(f, "field is declared but empty: cannot be empty"),
            Self::Conversion(err) => fmt::Display::fmt(err, f),
            Self::SourceFault(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for InnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Conversion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConvertError> for InnerError {
    fn from(src: ConvertError) -> Self {
        Self::Conversion(src)
    }
}

/// An error produced by the conversion engine when text cannot become a destination value
#[derive(Debug)]
pub enum ConvertError {
    /// Text did not match the scalar grammar of the destination type
    // (type name, offending text, reason)
    InvalidValue(Cow<'static, str>, String, String),
    /// A sequence or map was requested as the element of another sequence or map
    UnsupportedNesting(&'static str),
    /// The destination type has no conversion
    UnsupportedDestinationType(Cow<'static, str>),
    /// A map key failed to convert
    // (raw key, cause)
    MapKey(String, Box<ConvertError>),
    /// A map value failed to convert
    // (raw key, cause)
    MapValue(String, Box<ConvertError>),
    /// A custom text or binary decoder rejected the value
    Decode(BoxError),
}

impl ConvertError {
    /// Helper which makes InvalidValue
    pub fn invalid_value(
        type_name: impl Into<Cow<'static, str>>,
        text: &str,
        err: impl fmt::Display,
    ) -> Self {
        Self::InvalidValue(type_name.into(), text.to_owned(), err.to_string())
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidValue(type_name, text, err) => {
                write!(f, "invalid {type_name} value \"{text}\": {err}")
            }
            Self::UnsupportedNesting(kind) => write!(f, "cannot support nested {kind}"),
            Self::UnsupportedDestinationType(type_name) => {
                write!(f, "destination type not supported: {type_name}")
            }
            Self::MapKey(key, err) => write!(f, "failed to parse key: {key}: {err}"),
            Self::MapValue(key, err) => write!(f, "failed to parse value at key: {key}: {err}"),
            Self::Decode(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MapKey(_, err) | Self::MapValue(_, err) => Some(&**err),
            Self::Decode(err) => Some(&**err),
            _ => None,
        }
    }
}
