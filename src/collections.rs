// Composite destinations: one level of `,`-separated items, with `key=value` entries for maps.
// There is no quoting or escaping, so composites cannot nest.

use crate::{ConfValue, ConvertError, Nesting};
use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    hash::Hash,
};

impl<T: ConfValue> ConfValue for Vec<T> {
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        if nesting == Nesting::Element {
            return Err(ConvertError::UnsupportedNesting("sequences"));
        }
        T::convert_sequence(text)
    }

    fn type_name() -> Cow<'static, str> {
        format!("Vec<{}>", T::type_name()).into()
    }
}

impl<K, V> ConfValue for HashMap<K, V>
where
    K: ConfValue + Eq + Hash,
    V: ConfValue,
{
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        if nesting == Nesting::Element {
            return Err(ConvertError::UnsupportedNesting("maps"));
        }
        map_entries(text).collect()
    }

    fn type_name() -> Cow<'static, str> {
        format!("HashMap<{}, {}>", K::type_name(), V::type_name()).into()
    }
}

impl<K, V> ConfValue for BTreeMap<K, V>
where
    K: ConfValue + Ord,
    V: ConfValue,
{
    fn convert(text: &str, nesting: Nesting) -> Result<Self, ConvertError> {
        if nesting == Nesting::Element {
            return Err(ConvertError::UnsupportedNesting("maps"));
        }
        map_entries(text).collect()
    }

    fn type_name() -> Cow<'static, str> {
        format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()).into()
    }
}

// Yields converted entries in text order, so collecting into a map lets later keys win.
// Entries without `=` are skipped.
fn map_entries<K, V>(text: &str) -> impl Iterator<Item = Result<(K, V), ConvertError>> + '_
where
    K: ConfValue,
    V: ConfValue,
{
    let text = text.trim();
    let entries = if text.is_empty() {
        None
    } else {
        Some(text.split(','))
    };

    entries
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| {
            let k = K::convert(key, Nesting::Element)
                .map_err(|err| ConvertError::MapKey(key.to_owned(), Box::new(err)))?;
            let v = V::convert(value, Nesting::Element)
                .map_err(|err| ConvertError::MapValue(key.to_owned(), Box::new(err)))?;
            Ok((k, v))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_sequences() {
        assert_eq!(
            Vec::<String>::convert("a,b,c", Nesting::TopLevel).unwrap(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            Vec::<String>::convert(" a, b", Nesting::TopLevel).unwrap(),
            vec![" a", " b"]
        );
        assert!(Vec::<i32>::convert("", Nesting::TopLevel).unwrap().is_empty());
        assert!(Vec::<i32>::convert("  ", Nesting::TopLevel).unwrap().is_empty());
        assert_eq!(
            Vec::<Option<i32>>::convert("1,0x2", Nesting::TopLevel).unwrap(),
            vec![Some(1), Some(2)]
        );

        // Bytes are taken verbatim
        assert_eq!(
            Vec::<u8>::convert("1,2", Nesting::TopLevel).unwrap(),
            b"1,2".to_vec()
        );
    }

    #[test]
    fn test_sequence_errors() {
        assert_matches!(
            Vec::<i32>::convert("1,x,3", Nesting::TopLevel),
            Err(ConvertError::InvalidValue(..))
        );
        assert_matches!(
            Vec::<Vec<i32>>::convert("1,2", Nesting::TopLevel),
            Err(ConvertError::UnsupportedNesting("sequences"))
        );
        assert_matches!(
            Vec::<HashMap<String, i32>>::convert("a=1", Nesting::TopLevel),
            Err(ConvertError::UnsupportedNesting("maps"))
        );
    }

    #[test]
    fn test_maps() {
        let map = HashMap::<String, i32>::convert("x=3,y=1", Nesting::TopLevel).unwrap();
        assert_eq!(map, HashMap::from([("x".into(), 3), ("y".into(), 1)]));

        let map = BTreeMap::<String, String>::convert(" a=1=2,junk,b= ,a=3 ", Nesting::TopLevel)
            .unwrap();
        assert_eq!(
            map,
            BTreeMap::from([("a".into(), "3".into()), ("b".into(), " ".into())])
        );

        assert!(BTreeMap::<u8, u8>::convert(" ", Nesting::TopLevel)
            .unwrap()
            .is_empty());
        assert!(BTreeMap::<u8, u8>::convert("novalue", Nesting::TopLevel)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_map_errors() {
        let err = HashMap::<bool, i32>::convert("3=4", Nesting::TopLevel).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse key: 3: invalid bool value \"3\": invalid syntax"
        );

        let err = HashMap::<i32, bool>::convert("3=4", Nesting::TopLevel).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to parse value at key: 3: invalid bool value \"4\": invalid syntax"
        );

        assert_matches!(
            BTreeMap::<String, Vec<u8>>::convert("a=1", Nesting::TopLevel),
            Err(ConvertError::MapValue(key, _)) if key == "a"
        );
        assert_matches!(
            HashMap::<String, i32>::convert("a=1", Nesting::Element),
            Err(ConvertError::UnsupportedNesting("maps"))
        );
    }
}
