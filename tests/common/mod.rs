#![allow(unused, dead_code)]

use confvar::Error;
use std::collections::BTreeMap;

// Helper for making a lookup table concisely
pub fn table(
    entries: impl IntoIterator<Item = (&'static str, &'static str)>,
) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

#[macro_export]
macro_rules! assert_error_contains_text {
    ($left:expr, $right:expr) => {
        assert_error_contains_text(&$left, &$right, file!(), line!(), column!())
    };
}

pub fn assert_error_contains_text<T: core::fmt::Debug>(
    left: &Result<T, Error>,
    right: &[&str],
    file: &str,
    line: u32,
    col: u32,
) {
    match left {
        Ok(t) => {
            panic!("Assertion failed: expected error at {file}:{line}:{col}, found {left:#?}");
        }
        Err(e) => {
            let err_text = e.to_string();
            for substr in right {
                if !err_text.contains(substr) {
                    eprintln!("Assertion failed: error does not contain expected text at {file}:{line}:{col}");
                    eprintln!("Error text:");
                    eprintln!("{err_text}");
                    eprintln!("Expected substring:");
                    eprintln!("{substr}");
                    panic!("assertion failed");
                }
            }
        }
    }
}
