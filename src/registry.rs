use crate::{
    options::apply_options, Chain, ConfValue, Env, Error, FieldError, FieldOption, FieldPolicy,
    InnerError, Lookup, Nesting,
};
use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
};

/// A set of named config variables, each bound to a caller-owned destination, plus the lookup
/// source they are resolved from.
///
/// Register destinations with [`Registry::var`], then call [`Registry::try_parse`] (or
/// [`Registry::parse`], which exits the process on failure). Each field is resolved
/// independently, and all failures are reported together, sorted by field name.
///
/// ```
/// use confvar::{required, Registry};
/// use std::{collections::BTreeMap, time::Duration};
///
/// let source = BTreeMap::from([
///     ("PORT".to_owned(), "8080".to_owned()),
///     ("TIMEOUT".to_owned(), "1m30s".to_owned()),
/// ]);
///
/// let mut port = 0u16;
/// let mut timeout = Duration::ZERO;
/// let mut hosts = vec!["localhost".to_owned()];
///
/// let mut registry = Registry::new(source);
/// registry.var(&mut port, "PORT", [required()]);
/// registry.var(&mut timeout, "TIMEOUT", []);
/// registry.var(&mut hosts, "HOSTS", []);
/// registry.try_parse().unwrap();
/// drop(registry);
///
/// assert_eq!(port, 8080);
/// assert_eq!(timeout, Duration::from_secs(90));
/// assert_eq!(hosts, ["localhost"]);
/// ```
pub struct Registry<'a> {
    fields: HashMap<String, Field<'a>>,
    lookup: Box<dyn Lookup + 'a>,
}

struct Field<'a> {
    destination: Box<dyn Destination + 'a>,
    policy: FieldPolicy,
}

// A type-erased handle to one destination
trait Destination {
    // Convert text and assign it. Nothing is assigned if conversion fails.
    fn parse_text(&mut self, text: &str) -> Result<(), InnerError>;
    // Assign the fallback, if there is one. Returns false if there is no fallback.
    fn assign_fallback(&mut self) -> bool;
}

struct Slot<'a, T> {
    dst: &'a mut T,
    fallback: Option<T>,
}

impl<T> Destination for Slot<'_, T>
where
    T: ConfValue + Clone,
{
    fn parse_text(&mut self, text: &str) -> Result<(), InnerError> {
        *self.dst = T::convert(text, Nesting::TopLevel)?;
        Ok(())
    }

    fn assign_fallback(&mut self) -> bool {
        match self.fallback.as_ref() {
            Some(fallback) => {
                *self.dst = fallback.clone();
                true
            }
            None => false,
        }
    }
}

impl<'a> Registry<'a> {
    /// Make a registry which resolves every field from one lookup source
    pub fn new(lookup: impl Lookup + 'a) -> Self {
        Self {
            fields: HashMap::new(),
            lookup: Box::new(lookup),
        }
    }

    /// Make a registry which resolves fields from several sources, in priority order.
    ///
    /// If `sources` is empty, the environment of the current process is used.
    pub fn with_sources(sources: Vec<Box<dyn Lookup + 'a>>) -> Self {
        if sources.is_empty() {
            Self::from_env()
        } else {
            Self::new(Chain::new(sources))
        }
    }

    /// Make a registry which resolves fields from the environment of the current process
    pub fn from_env() -> Self {
        Self::new(Env::from_process())
    }

    /// Register a destination under a name.
    ///
    /// Options are applied in order. Registering a name again replaces the earlier field.
    pub fn var<T>(
        &mut self,
        dst: &'a mut T,
        name: impl Into<String>,
        options: impl IntoIterator<Item = FieldOption<T>>,
    ) -> &mut Self
    where
        T: ConfValue + Clone + 'a,
    {
        let name = name.into();
        let (policy, fallback) = apply_options(options);
        let field = Field {
            destination: Box::new(Slot { dst, fallback }),
            policy,
        };
        if self.fields.insert(name.clone(), field).is_some() {
            tracing::debug!(field = %name, "field registered again, replacing earlier registration");
        }
        self
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are registered
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve every field, and exit the program with an error message if any of them fail.
    pub fn parse(&mut self) {
        if let Err(err) = self.try_parse() {
            err.exit()
        }
    }

    /// Resolve every field, returning an error describing every field that failed.
    ///
    /// Each field is resolved on its own: a failure, or even a panic in a lookup source or
    /// decoder, only affects that field. Fields that failed are left unchanged.
    ///
    /// Caught panics are reported in the returned error, but the process panic hook still runs
    /// for each of them, so the default hook prints its usual message to stderr. Install a
    /// quieter hook with [`std::panic::set_hook`] if that output is unwanted.
    pub fn try_parse(&mut self) -> Result<(), Error> {
        let lookup = &*self.lookup;
        let errors: Vec<FieldError> = self
            .fields
            .iter_mut()
            .filter_map(|(name, field)| {
                panic::catch_unwind(AssertUnwindSafe(|| field.resolve(name, lookup)))
                    .unwrap_or_else(|payload| Err(InnerError::from_panic(payload)))
                    .err()
                    .map(|error| {
                        tracing::debug!(field = %name, %error, "field failed");
                        FieldError {
                            name: name.clone(),
                            error,
                        }
                    })
            })
            .collect();

        match Error::from_field_errors(errors) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Field<'_> {
    fn resolve(&mut self, name: &str, lookup: &dyn Lookup) -> Result<(), InnerError> {
        let found = lookup
            .lookup(name)
            .map_err(|err| InnerError::SourceFault(err.to_string()))?;

        match found {
            Some(text) if text.is_empty() && self.policy.non_empty => Err(InnerError::EmptyValue),
            Some(text) if text.is_empty() && self.policy.skip_empty => {
                tracing::debug!(field = name, "found empty value, skipping");
                Ok(())
            }
            Some(text) => {
                tracing::debug!(field = name, "found value");
                self.destination.parse_text(&text)
            }
            None if self.policy.required => Err(InnerError::MissingRequired),
            None => {
                let assigned = self.destination.assign_fallback();
                tracing::debug!(field = name, fallback = assigned, "not found");
                Ok(())
            }
        }
    }
}
