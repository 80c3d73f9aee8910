//! The filter engine.
//!
//! [`ModelFilter`] remembers the last submitted filter form for one kind of
//! record (its *key*) and turns it into query conditions using a
//! [`RuleSet`].
//!
//! All engines share a single namespace entry in the [`StateStore`]:
//!
//! ```text
//! "model_filter.filters" => {
//!     "tickets": { "form_data": { "status": "open", "subject": "print" } },
//!     "users":   { "form_data": { "id": "42" } }
//! }
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::{FilterError, Result};
use crate::options::{DateErrorPolicy, FilterOptions};
use crate::rule::{Rule, RuleSet};
use crate::store::StateStore;
use crate::traits::QueryBuilder;
use crate::value::{FormData, FormValue};

/// Sub-key holding the submitted form inside an engine's bucket.
const FORM_DATA: &str = "form_data";

/// Datetime shapes accepted by `from`/`to` rules besides a bare date and
/// RFC 3339. Only the date part is used.
const DATETIME_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Applies remembered form data to queries according to a rule set.
///
/// # Example
///
/// ```
/// use model_filter::{Conditions, FormData, MemoryStore, ModelFilter, RuleSet};
///
/// let store = MemoryStore::new();
/// let mut tickets = ModelFilter::new(&store, "tickets");
/// tickets.set_rules(
///     RuleSet::new()
///         .primary("ticket_no")
///         .like("subject", None)
///         .from_date("created_from", "created_at"),
/// );
///
/// let mut form = FormData::new();
/// form.insert("ticket_no".into(), "".into());
/// form.insert("subject".into(), "print".into());
/// form.insert("created_from".into(), "2024-01-05".into());
/// tickets.set_form_data(form).unwrap();
///
/// let conditions = tickets.filter(Conditions::new()).unwrap();
/// let rendered: Vec<String> = conditions.iter().map(|c| c.to_string()).collect();
/// assert_eq!(
///     rendered,
///     [r#"subject like "print%""#, "created_at >= 2024-01-05 00:00:00"]
/// );
/// ```
#[derive(Debug)]
pub struct ModelFilter<S> {
    store: S,
    key: Option<String>,
    rules: Option<RuleSet>,
    options: FilterOptions,
}

impl<S: StateStore> ModelFilter<S> {
    /// Creates an engine bound to `key` with default options.
    ///
    /// Use one key per kind of record being filtered, e.g. the table name.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self::with_options(store, key, FilterOptions::default())
    }

    /// Creates an engine bound to `key` with the given options.
    pub fn with_options(store: S, key: impl Into<String>, options: FilterOptions) -> Self {
        let mut filter = ModelFilter {
            store,
            key: None,
            rules: None,
            options,
        };
        filter.set_key(key);
        filter
    }

    /// Creates an engine without a key.
    ///
    /// Reading or writing form data fails with
    /// [`FilterError::NotConfigured`] until [`set_key`](Self::set_key) is
    /// called.
    pub fn unconfigured(store: S) -> Self {
        Self::unconfigured_with_options(store, FilterOptions::default())
    }

    /// Creates an engine without a key, using the given options.
    ///
    /// The namespace is touched only once [`set_key`](Self::set_key) is
    /// called, and then under `options.namespace`.
    pub fn unconfigured_with_options(store: S, options: FilterOptions) -> Self {
        ModelFilter {
            store,
            key: None,
            rules: None,
            options,
        }
    }

    /// Binds the engine to `key`.
    ///
    /// The shared namespace is created, holding an empty bucket for `key`,
    /// only when the store has no namespace entry at all. An existing
    /// namespace, including form data stored under this or any other key, is
    /// left untouched.
    pub fn set_key(&mut self, key: impl Into<String>) -> &mut Self {
        let key = key.into();
        let namespace = &self.options.namespace;

        if !self.store.has(namespace) {
            let mut buckets = Map::new();
            buckets.insert(key.clone(), Value::Object(Map::new()));
            self.store.set(namespace, Value::Object(buckets));
            debug!(namespace = %namespace, key = %key, "filter namespace initialized");
        }

        self.key = Some(key);
        self
    }

    /// Returns the filter key, if set.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns the engine options.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sets the rules applied by [`filter`](Self::filter).
    ///
    /// Rules live on the engine only; they are never written to the store.
    pub fn set_rules(&mut self, rules: RuleSet) {
        self.rules = Some(rules);
    }

    /// Builder-style [`set_rules`](Self::set_rules).
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.set_rules(rules);
        self
    }

    /// Returns the rules, or `None` if none were set.
    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }

    /// Remembers the submitted form, replacing whatever was stored for this
    /// key before. Values are not merged.
    pub fn set_form_data(&self, form_data: FormData) -> Result<()> {
        let key = self.require_key()?;
        let value = serde_json::to_value(form_data).map_err(|e| FilterError::state(key, e))?;
        self.remember(FORM_DATA, value)
    }

    /// Returns the remembered form, or an empty form if nothing was stored.
    pub fn form_data(&self) -> Result<FormData> {
        let key = self.require_key()?;
        let namespace = self.load_namespace(key)?;

        let stored = match namespace.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(entries)) => entries.get(FORM_DATA),
            Some(other) => return Err(bucket_error(key, other)),
        };
        match stored {
            None | Some(Value::Null) => Ok(FormData::new()),
            Some(stored) => {
                serde_json::from_value(stored.clone()).map_err(|e| FilterError::state(key, e))
            }
        }
    }

    /// Returns one remembered field.
    ///
    /// A missing field and a stored null both come back as `None`. An empty
    /// string is returned as-is.
    pub fn form_value(&self, field: &str) -> Result<Option<FormValue>> {
        let mut form_data = self.form_data()?;
        Ok(form_data.remove(field).filter(|value| !value.is_null()))
    }

    /// Applies the rules to `query` and hands it back.
    ///
    /// Rules run in definition order. A rule whose field is missing, null or
    /// the empty string is skipped. A [`Rule::Primary`] that fires adds its
    /// equality condition and ends the pass: no later rule is applied.
    ///
    /// With no rules set, the query is returned unchanged.
    pub fn filter<Q: QueryBuilder>(&self, mut query: Q) -> Result<Q> {
        let form_data = self.form_data()?;
        let Some(rules) = &self.rules else {
            return Ok(query);
        };

        for (field, rule) in rules.iter() {
            let value = match form_data.get(field) {
                Some(value) if !value.is_empty_sentinel() => value,
                _ => {
                    trace!(field, "empty value, rule skipped");
                    continue;
                }
            };
            let column = rule.column(field);

            match rule {
                Rule::Primary => {
                    query.where_eq(field, value)?;
                    debug!(field, "primary rule matched, remaining rules skipped");
                    break;
                }
                Rule::In { .. } => match value.as_list() {
                    Some(values) => query.where_in(column, values)?,
                    None => query.where_in(column, std::slice::from_ref(value))?,
                },
                Rule::From { .. } => {
                    if let Some(day) = self.date_bound(field, value)? {
                        query.where_gte(column, at_time(field, value, day, (0, 0, 0))?)?;
                    }
                }
                Rule::To { .. } => {
                    if let Some(day) = self.date_bound(field, value)? {
                        query.where_lte(column, at_time(field, value, day, (23, 59, 59))?)?;
                    }
                }
                Rule::Like { .. } => {
                    let prefix = value.to_text().ok_or_else(|| FilterError::InvalidValue {
                        field: field.to_string(),
                        expected: "a single value for a prefix match",
                    })?;
                    query.where_like(column, &format!("{}%", prefix))?;
                }
                Rule::Equals { .. } => query.where_eq(column, value)?,
            }
        }

        Ok(query)
    }

    /// Parses a date rule's value, applying the date error policy.
    fn date_bound(&self, field: &str, value: &FormValue) -> Result<Option<NaiveDate>> {
        if let Some(day) = value.as_str().and_then(parse_day) {
            return Ok(Some(day));
        }

        match self.options.date_errors {
            DateErrorPolicy::Abort => Err(FilterError::invalid_date(field, display_raw(value))),
            DateErrorPolicy::SkipRule => {
                warn!(field, value = %value, "unparseable date, rule skipped");
                Ok(None)
            }
        }
    }

    fn require_key(&self) -> Result<&str> {
        self.key.as_deref().ok_or(FilterError::NotConfigured)
    }

    /// Reads the shared namespace as a map of key to bucket.
    fn load_namespace(&self, key: &str) -> Result<Map<String, Value>> {
        match self.store.get(&self.options.namespace) {
            None | Some(Value::Null) => Ok(Map::new()),
            Some(Value::Object(buckets)) => Ok(buckets),
            Some(other) => Err(FilterError::state(
                key,
                serde::de::Error::custom(format!(
                    "namespace '{}' holds {} instead of an object",
                    self.options.namespace,
                    json_kind(&other)
                )),
            )),
        }
    }

    /// Writes `value` under this engine's bucket, keeping sibling buckets.
    fn remember(&self, name: &str, value: Value) -> Result<()> {
        let key = self.require_key()?;
        let mut buckets = self.load_namespace(key)?;

        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if bucket.is_null() {
            *bucket = Value::Object(Map::new());
        }
        match bucket {
            Value::Object(entries) => {
                entries.insert(name.to_string(), value);
            }
            other => return Err(bucket_error(key, other)),
        }

        self.store.set(&self.options.namespace, Value::Object(buckets));
        trace!(key, name, "filter state remembered");
        Ok(())
    }
}

fn bucket_error(key: &str, bucket: &Value) -> FilterError {
    FilterError::state(
        key,
        serde::de::Error::custom(format!(
            "bucket holds {} instead of an object",
            json_kind(bucket)
        )),
    )
}

/// Parses a submitted date or datetime, keeping only the calendar day.
fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    for format in DATETIME_INPUTS {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(at.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|at| at.date_naive())
}

fn at_time(
    field: &str,
    value: &FormValue,
    day: NaiveDate,
    (hour, min, sec): (u32, u32, u32),
) -> Result<NaiveDateTime> {
    day.and_hms_opt(hour, min, sec)
        .ok_or_else(|| FilterError::invalid_date(field, display_raw(value)))
}

fn display_raw(value: &FormValue) -> String {
    value.to_text().unwrap_or_else(|| value.to_string())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
