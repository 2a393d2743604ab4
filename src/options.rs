/// Per-field policy, built by applying [`FieldOption`]s in order to `FieldPolicy::default()`.
///
/// The typed fallback is kept alongside the destination, so only the flags live here.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldPolicy {
    /// Fail if no source has the field
    pub required: bool,
    /// Fail if a source has the field but its value is empty
    pub non_empty: bool,
    /// Leave the destination untouched if a source has the field but its value is empty
    pub skip_empty: bool,
}

/// An option passed when registering a field.
///
/// Options are applied in the order given, so a later option overrides an earlier one of the
/// same kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FieldOption<T> {
    /// Fail if no source has the field
    Required(bool),
    /// Fail if the field is found with an empty value
    NonEmpty(bool),
    /// Skip the field if it is found with an empty value
    SkipEmpty(bool),
    /// Assign this value when no source has the field
    Default(T),
}

/// Shorthand for `FieldOption::Required(true)`
pub fn required<T>() -> FieldOption<T> {
    FieldOption::Required(true)
}

/// Shorthand for `FieldOption::NonEmpty(true)`
pub fn non_empty<T>() -> FieldOption<T> {
    FieldOption::NonEmpty(true)
}

/// Shorthand for `FieldOption::SkipEmpty(true)`
pub fn skip_empty<T>() -> FieldOption<T> {
    FieldOption::SkipEmpty(true)
}

/// Shorthand for `FieldOption::Default(value)`
pub fn default<T>(value: T) -> FieldOption<T> {
    FieldOption::Default(value)
}

/// Apply options to a zeroed policy. Returns the policy and the last fallback given, if any.
pub(crate) fn apply_options<T>(
    options: impl IntoIterator<Item = FieldOption<T>>,
) -> (FieldPolicy, Option<T>) {
    let mut policy = FieldPolicy::default();
    let mut fallback = None;
    for option in options {
        match option {
            FieldOption::Required(value) => policy.required = value,
            FieldOption::NonEmpty(value) => policy.non_empty = value,
            FieldOption::SkipEmpty(value) => policy.skip_empty = value,
            FieldOption::Default(value) => fallback = Some(value),
        }
    }
    (policy, fallback)
}
