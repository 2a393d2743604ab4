use crate::{BoxError, Lookup};
use clap_lex::{ParsedArg, RawArgs};
use std::{collections::HashMap, ffi::OsString};

/// A lookup source backed by command line flags.
///
/// This is a loose tokenizer rather than a full CLI parser, meant to let the same names that are
/// registered for env also be given as flags:
///
/// * Flags are matched case-insensitively, and `_` is treated as `-`, so a field registered as
///   `DATABASE_URL` is found by `--database-url` (or `-database-url`).
/// * `--flag=value` and `--flag value` both work.
/// * A flag followed by another flag, or by nothing, has the value `true`.
/// * A flag given more than once has its values joined with `,`, so it can fill a `Vec`.
/// * Positional arguments are skipped, and `--` ends flag parsing.
/// * Negative numbers are values, not flags.
#[derive(Clone, Debug, Default)]
pub struct CommandLine {
    map: HashMap<String, Vec<String>>,
}

impl CommandLine {
    /// Read the args of the current process (skipping the binary name)
    pub fn from_process() -> Self {
        Self::new(std::env::args_os().skip(1))
    }

    /// Read the given args. These should not include the binary name.
    pub fn new<T>(args_os: impl IntoIterator<Item = T>) -> Self
    where
        T: Into<OsString>,
    {
        let raw = RawArgs::new(args_os);
        let mut cursor = raw.cursor();

        let mut map = HashMap::<String, Vec<String>>::new();
        let mut pending: Option<String> = None;

        while let Some(arg) = raw.next(&mut cursor) {
            if arg.is_escape() {
                break;
            }

            if let Some((flag, maybe_value)) = split_flag(&arg) {
                if let Some(prev) = pending.take() {
                    map.entry(prev).or_default().push("true".to_owned());
                }
                match maybe_value {
                    Some(value) => map.entry(flag).or_default().push(value),
                    None => pending = Some(flag),
                }
            } else if let Some(flag) = pending.take() {
                let value = arg.to_value_os().to_string_lossy().into_owned();
                map.entry(flag).or_default().push(value);
            }
            // Otherwise this is a positional arg, and we skip it
        }

        if let Some(prev) = pending {
            map.entry(prev).or_default().push("true".to_owned());
        }

        Self { map }
    }
}

impl Lookup for CommandLine {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        Ok(self.map.get(&normalize(name)).map(|values| values.join(",")))
    }
}

fn normalize(name: &str) -> String {
    name.to_lowercase().replace('_', "-")
}

// If this arg is a flag, returns its normalized name, and the value if it was attached with `=`
fn split_flag(arg: &ParsedArg<'_>) -> Option<(String, Option<String>)> {
    if arg.is_stdio() || arg.is_negative_number() {
        return None;
    }

    if let Some((maybe_flag, maybe_value)) = arg.to_long() {
        let flag = maybe_flag.ok()?.trim_start_matches('-');
        let value = maybe_value.map(|value| value.to_string_lossy().into_owned());
        return Some((normalize(flag), value));
    }

    if arg.is_short() {
        let text = arg.to_value_os().to_string_lossy();
        let flag = text.trim_start_matches('-');
        return Some(match flag.split_once('=') {
            Some((flag, value)) => (normalize(flag), Some(value.to_owned())),
            None => (normalize(flag), None),
        });
    }

    None
}
