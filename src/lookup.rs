use crate::BoxError;
use std::collections::{BTreeMap, HashMap};

/// A source of text values by name.
///
/// `Ok(Some(text))` means found (even if `text` is empty), `Ok(None)` means not found, and
/// `Err` means the source itself failed, which is reported against the field being resolved.
///
/// Any `Fn(&str) -> Option<String>` is a lookup, as are string maps.
pub trait Lookup {
    /// Resolve one name
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        Ok(self(name))
    }
}

impl Lookup for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        Ok(self.get(name).cloned())
    }
}

impl Lookup for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        Ok(self.get(name).cloned())
    }
}

/// An ordered fallback chain of lookups. The first source which finds a name wins, and later
/// sources are not consulted.
#[derive(Default)]
pub struct Chain<'a> {
    sources: Vec<Box<dyn Lookup + 'a>>,
}

impl<'a> Chain<'a> {
    /// Make a chain from sources, in priority order
    pub fn new(sources: impl IntoIterator<Item = Box<dyn Lookup + 'a>>) -> Self {
        Self {
            sources: sources.into_iter().collect(),
        }
    }

    /// Append a source with lower priority than all current sources
    pub fn or(mut self, source: impl Lookup + 'a) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Number of sources in the chain
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// True if the chain has no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Lookup for Chain<'_> {
    fn lookup(&self, name: &str) -> Result<Option<String>, BoxError> {
        for source in &self.sources {
            if let Some(text) = source.lookup(name)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_chain_first_found_wins() {
        let chain = Chain::default()
            .or(table(&[("A", "first"), ("EMPTY", "")]))
            .or(table(&[("A", "second"), ("B", "b"), ("EMPTY", "x")]));

        assert_eq!(chain.len(), 2);
        assert_eq!(chain.lookup("A").unwrap().as_deref(), Some("first"));
        assert_eq!(chain.lookup("B").unwrap().as_deref(), Some("b"));
        // An empty value still counts as found
        assert_eq!(chain.lookup("EMPTY").unwrap().as_deref(), Some(""));
        assert_eq!(chain.lookup("C").unwrap(), None);
    }

    #[test]
    fn test_chain_short_circuits() {
        let failing = |_: &str| -> Option<String> { panic!("should not be consulted") };
        let chain = Chain::default().or(table(&[("A", "a")])).or(failing);
        assert_eq!(chain.lookup("A").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_chain_finds_nothing() {
        let chain = Chain::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(chain.lookup("A").unwrap(), None);
    }
}
