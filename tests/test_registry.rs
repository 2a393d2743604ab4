mod common;
use common::*;

use confvar::{
    conf_value, default, non_empty, required, skip_empty, BoxError, FieldOption, Registry,
    TextDecode,
};
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    rc::Rc,
    time::Duration,
};

#[derive(Clone, Debug, Default, PartialEq)]
struct Custom(serde_json::Value);

impl TextDecode for Custom {
    fn decode_text(text: &[u8]) -> Result<Self, BoxError> {
        Ok(Custom(serde_json::from_slice(text)?))
    }
}

conf_value!(text Custom);

#[test]
fn test_var() {
    let source = table([
        ("i", "-1"),
        ("ui", "1"),
        ("f", "2.5"),
        ("b", "T"),
        ("d", "5m"),
        ("s", "hello"),
        ("ss", "hello,world"),
        ("custom", "[1,2,3]"),
        ("mapint", "x=3,y=1"),
    ]);

    let mut int = 0i64;
    let mut uint = 0u32;
    let mut float = 0f64;
    let mut boolean = false;
    let mut duration = Duration::ZERO;
    let mut string = String::new();
    let mut string_vec = Vec::<String>::new();
    let mut custom = Custom::default();
    let mut map_int = HashMap::<String, i32>::new();

    let mut registry = Registry::new(source);
    registry
        .var(&mut int, "i", [])
        .var(&mut uint, "ui", [])
        .var(&mut float, "f", [])
        .var(&mut boolean, "b", [])
        .var(&mut duration, "d", [])
        .var(&mut string, "s", [])
        .var(&mut string_vec, "ss", [])
        .var(&mut custom, "custom", [])
        .var(&mut map_int, "mapint", []);
    assert_eq!(registry.len(), 9);
    registry.try_parse().unwrap();
    drop(registry);

    assert_eq!(int, -1);
    assert_eq!(uint, 1);
    assert_eq!(float, 2.5);
    assert!(boolean);
    assert_eq!(duration, Duration::from_secs(300));
    assert_eq!(string, "hello");
    assert_eq!(string_vec, ["hello", "world"]);
    assert_eq!(custom, Custom(serde_json::json!([1, 2, 3])));
    assert_eq!(map_int, HashMap::from([("x".into(), 3), ("y".into(), 1)]));
}

#[test]
fn test_options() {
    let source = table([("nonEmpty", ""), ("skipEmpty", "")]);

    let mut required_value = String::new();
    let mut non_empty_value = String::new();
    let mut non_empty_not_present = String::from("keep");
    // This would fail to parse if it were not skipped
    let mut skip_empty_value = 7i32;

    let mut registry = Registry::new(source);
    registry
        .var(&mut required_value, "required", [required()])
        .var(&mut non_empty_value, "nonEmpty", [non_empty()])
        .var(&mut non_empty_not_present, "emptynonpresent", [non_empty()])
        .var(&mut skip_empty_value, "skipEmpty", [skip_empty()]);

    let err = registry.try_parse().unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to parse variable(s):\n  - nonEmpty: field is declared but empty: cannot be empty\n  - required: field is required"
    );
    drop(registry);

    assert_eq!(non_empty_not_present, "keep");
    assert_eq!(skip_empty_value, 7);
}

#[test]
fn test_empty_value_without_policy_is_converted() {
    let source = table([("S", ""), ("N", ""), ("V", "")]);

    let mut s = String::from("old");
    let mut n = 5u8;
    let mut v = vec![1u8, 2];

    let mut registry = Registry::new(source);
    registry
        .var(&mut s, "S", [required()])
        .var(&mut n, "N", [])
        .var(&mut v, "V", []);

    assert_error_contains_text!(registry.try_parse(), ["  - N: invalid u8 value \"\""]);
    drop(registry);

    assert_eq!(s, "");
    assert_eq!(n, 5);
    assert!(v.is_empty());
}

#[test]
fn test_absent_fields() {
    let mut untouched = 42u64;
    let mut defaulted = 0u16;
    let mut defaulted_map = BTreeMap::<String, bool>::new();
    let mut required_with_default = 1i8;

    let mut registry = Registry::new(table([]));
    registry
        .var(&mut untouched, "UNTOUCHED", [])
        .var(&mut defaulted, "PORT", [FieldOption::Default(8080)])
        .var(
            &mut defaulted_map,
            "FLAGS",
            [default(BTreeMap::from([("debug".to_owned(), true)]))],
        )
        .var(&mut required_with_default, "LEVEL", [default(3), required()]);

    let err = registry.try_parse().unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(
        err.to_string(),
        "failed to parse variable(s):\n  - LEVEL: field is required"
    );
    drop(registry);

    assert_eq!(untouched, 42);
    assert_eq!(defaulted, 8080);
    assert!(defaulted_map["debug"]);
    assert_eq!(required_with_default, 1);
}

#[test]
fn test_found_value_overrides_default() {
    let mut port = 0u16;

    let mut registry = Registry::new(table([("PORT", "0x50")]));
    registry.var(&mut port, "PORT", [default(8080)]);
    registry.try_parse().unwrap();
    drop(registry);

    assert_eq!(port, 80);
}

#[test]
fn test_errors_are_sorted_by_name() {
    let mut b = 0i32;
    let mut a = 0i32;
    let mut c = 0i32;

    let mut registry = Registry::new(table([("b", "x"), ("a", "y"), ("c", "3")]));
    registry
        .var(&mut b, "b", [])
        .var(&mut a, "a", [])
        .var(&mut c, "c", []);

    let err = registry.try_parse().unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to parse variable(s):\n  - a: invalid i32 value \"y\": invalid digit found in string\n  - b: invalid i32 value \"x\": invalid digit found in string"
    );
    let names: Vec<&str> = err.errors().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a", "b"]);
    drop(registry);

    // Every field is attempted, so c is still set
    assert_eq!(c, 3);
}

#[test]
fn test_failed_field_is_not_modified() {
    let mut list = vec![9i32];
    let mut map = HashMap::from([("k".to_owned(), 1u8)]);

    let mut registry = Registry::new(table([("LIST", "1,x,3"), ("MAP", "a=1,b=300")]));
    registry.var(&mut list, "LIST", []).var(&mut map, "MAP", []);
    assert!(registry.try_parse().is_err());
    drop(registry);

    assert_eq!(list, [9]);
    assert_eq!(map, HashMap::from([("k".to_owned(), 1u8)]));
}

#[test]
fn test_duplicate_name_last_registration_wins() {
    let mut first = String::from("first");
    let mut second = String::from("second");

    let mut registry = Registry::new(table([("NAME", "value")]));
    registry
        .var(&mut first, "NAME", [])
        .var(&mut second, "NAME", []);
    assert_eq!(registry.len(), 1);
    registry.try_parse().unwrap();
    drop(registry);

    assert_eq!(first, "first");
    assert_eq!(second, "value");
}

#[test]
fn test_parse_twice() {
    let source = Rc::new(RefCell::new(table([("LEVEL", "4")])));
    let lookup = {
        let source = source.clone();
        move |name: &str| source.borrow().get(name).cloned()
    };

    let mut level = 0u8;
    let mut registry = Registry::new(lookup);
    registry.var(&mut level, "LEVEL", [default(1)]);

    registry.try_parse().unwrap();
    registry.try_parse().unwrap();

    source.borrow_mut().remove("LEVEL");
    registry.try_parse().unwrap();
    drop(registry);

    assert_eq!(level, 1);
}

#[test]
fn test_empty_registry() {
    let mut registry = Registry::new(|_: &str| -> Option<String> { None });
    assert!(registry.is_empty());
    registry.try_parse().unwrap();
}
