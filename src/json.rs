//! A JSON document as a config value.
//!
//! The built-in grammar is deliberately flat (one level of `,` and `=`), so anything with more
//! structure than that should bring its own decoder. `Json<T>` is that decoder for any
//! `serde::Deserialize` type, and it shows the pattern for writing others.

use crate::{BoxError, ConfValue, ConvertError, Nesting, TextDecode};
use serde::de::DeserializeOwned;
use std::{
    borrow::Cow,
    ops::{Deref, DerefMut},
};

/// A value which is parsed from JSON text with `serde_json`
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> TextDecode for Json<T> {
    fn decode_text(text: &[u8]) -> Result<Self, BoxError> {
        Ok(Json(serde_json::from_slice(text)?))
    }
}

impl<T: DeserializeOwned> ConfValue for Json<T> {
    fn convert(text: &str, _nesting: Nesting) -> Result<Self, ConvertError> {
        crate::decode_text(text)
    }

    fn type_name() -> Cow<'static, str> {
        format!("Json<{}>", std::any::type_name::<T>()).into()
    }
}
