use crate::{BoxError, Lookup};
use std::{collections::BTreeMap, ffi::OsString, fmt};

/// A snapshot of environment variables, usable as a lookup source.
#[derive(Clone, Debug, Default)]
pub struct Env {
    map: BTreeMap<String, OsString>,
}

impl Env {
    /// Snapshot the environment of the current process
    pub fn from_process() -> Self {
        Self::new(std::env::vars_os())
    }

    /// Parse a generic thing that looks like std::env::vars_os but might be test data,
    /// and store it in a searchable container.
    pub fn new<K, V>(env_vars_os: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<OsString>,
        V: Into<OsString>,
    {
        // Drop any non-utf8 env keys, since there's no way to register a field under them.
        // Non-utf8 values are kept, and only fail if a field actually reads them.
        Self {
            map: env_vars_os
                .into_iter()
                .filter_map(|(into_key, into_val)| {
                    into_key
                        .into()
                        .into_string()
                        .ok()
                        .map(|key| (key, into_val.into()))
                })
                .collect(),
        }
    }
}

impl Lookup for Env {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        match self.map.get(name) {
            Some(val) => match val.to_str() {
                Some(text) => Ok(Some(text.to_owned())),
                None => Err(Box::new(InvalidUtf8Env(name.to_owned()))),
            },
            None => Ok(None),
        }
    }
}

/// The value of an env var was not valid UTF-8. The value is not echoed, since it may be a secret.
#[derive(Debug)]
pub struct InvalidUtf8Env(pub String);

impl fmt::Display for InvalidUtf8Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "env var {} contained invalid UTF8", self.0)
    }
}

impl std::error::Error for InvalidUtf8Env {}
