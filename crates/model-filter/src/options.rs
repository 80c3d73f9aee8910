//! Engine options.

use serde::Deserialize;

/// Store key under which every engine keeps its filter state.
pub const DEFAULT_NAMESPACE: &str = "model_filter.filters";

/// What to do when a `from`/`to` rule receives a value that is not a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateErrorPolicy {
    /// Fail the whole filter pass with [`FilterError::InvalidDate`](crate::FilterError::InvalidDate).
    #[default]
    Abort,
    /// Skip the offending rule and keep applying the rest.
    SkipRule,
}

/// Options for a [`ModelFilter`](crate::ModelFilter).
///
/// Deserializable so hosts can keep them next to the rest of their
/// configuration; missing keys take their defaults.
///
/// # Example
///
/// ```
/// use model_filter::{DateErrorPolicy, FilterOptions};
///
/// let options: FilterOptions = serde_json::from_str(r#"{"date_errors": "skip_rule"}"#).unwrap();
/// assert_eq!(options.date_errors, DateErrorPolicy::SkipRule);
/// assert_eq!(options.namespace, "model_filter.filters");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Top-level store key shared by all engines.
    pub namespace: String,
    /// Handling of unparseable dates.
    pub date_errors: DateErrorPolicy,
}

impl Default for FilterOptions {
    fn default() -> Self {
        FilterOptions {
            namespace: DEFAULT_NAMESPACE.to_string(),
            date_errors: DateErrorPolicy::default(),
        }
    }
}

impl FilterOptions {
    /// Sets the shared namespace key.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the date error policy.
    pub fn date_errors(mut self, policy: DateErrorPolicy) -> Self {
        self.date_errors = policy;
        self
    }
}
