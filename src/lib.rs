//! Register strongly-typed config variables by name, and fill them from env, command line args,
//! files, or any custom lookup source.
//!
//! Each registered destination is parsed from a single text value. Scalars use a fixed grammar
//! (base-prefixed integers, strict booleans, floats, and unit-suffixed durations), `Vec`s and maps
//! use one level of `,`-separated items and `key=value` entries, and any other type can bring its
//! own decoder through [`TextDecode`] or [`BinaryDecode`].
//!
//! ```
//! use confvar::{default, non_empty, CommandLine, Env, Lookup, Registry};
//! use std::collections::HashMap;
//!
//! let sources: Vec<Box<dyn Lookup>> = vec![
//!     Box::new(CommandLine::new(["--log-level", "debug"])),
//!     Box::new(Env::new([("LOG_LEVEL", "info"), ("WEIGHTS", "a=1,b=2")])),
//! ];
//!
//! let mut log_level = String::new();
//! let mut weights = HashMap::<String, u32>::new();
//! let mut retries = 0u8;
//!
//! let mut registry = Registry::with_sources(sources);
//! registry
//!     .var(&mut log_level, "LOG_LEVEL", [non_empty()])
//!     .var(&mut weights, "WEIGHTS", [])
//!     .var(&mut retries, "RETRIES", [default(3)]);
//! registry.try_parse().unwrap();
//! drop(registry);
//!
//! assert_eq!(log_level, "debug");
//! assert_eq!(weights["b"], 2);
//! assert_eq!(retries, 3);
//! ```
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod collections;
mod command_line;
mod error;
mod file_system;
#[cfg(feature = "serde")]
mod json;
mod lookup;
mod number;
mod options;
mod parse_env;
mod registry;
mod str_to_bool;
mod value;

use str_to_bool::str_to_bool;

pub use command_line::CommandLine;
pub use error::{BoxError, ConvertError, Error, FieldError, InnerError};
pub use file_system::FileSystem;
#[cfg(feature = "serde")]
pub use json::Json;
pub use lookup::{Chain, Lookup};
pub use options::{default, non_empty, required, skip_empty, FieldOption, FieldPolicy};
pub use parse_env::{Env, InvalidUtf8Env};
pub use registry::Registry;
pub use value::{BinaryDecode, ConfValue, Nesting, TextDecode};

// These are used by the conf_value! macro
#[doc(hidden)]
pub use value::{decode_binary, decode_from_str, decode_text};
