//! Filter rules.
//!
//! A [`Rule`] says how one form field turns into a query condition. A
//! [`RuleSet`] keeps rules in definition order, which is the order the engine
//! applies them in.
//!
//! Rule sets can be written in code or loaded from configuration in the
//! positional `{"field": ["kind", "column"]}` format:
//!
//! ```
//! use model_filter::{Rule, RuleSet};
//!
//! let json = r#"{
//!     "id": ["primary"],
//!     "name": ["like"],
//!     "status": ["in", "status_id"],
//!     "created_from": ["from", "created_at"],
//!     "created_to": ["to", "created_at"]
//! }"#;
//! let rules: RuleSet = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(rules.len(), 5);
//! assert_eq!(rules.fields().next(), Some("id"));
//! assert_eq!(rules.get("status"), Some(&Rule::In { target: Some("status_id".into()) }));
//! ```

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::{FilterError, Result};

/// How a single form field is turned into a query condition.
///
/// Every variant except [`Primary`](Rule::Primary) carries an optional target
/// column; when it is `None` the form field name is used as the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Equality on the field itself; when it fires, no further rules are
    /// applied. Put it first in the rule set.
    Primary,
    /// Membership: the column is one of the submitted values.
    In { target: Option<String> },
    /// Lower date bound: the column is at or after the start of the
    /// submitted day.
    From { target: Option<String> },
    /// Upper date bound: the column is at or before the end of the
    /// submitted day.
    To { target: Option<String> },
    /// Prefix match: `column LIKE value%`.
    Like { target: Option<String> },
    /// Plain equality.
    Equals { target: Option<String> },
}

impl Rule {
    /// Builds a rule from the positional `[kind, target]` form.
    ///
    /// Unknown kinds fall back to [`Rule::Equals`]. A target given for
    /// `primary` is ignored.
    pub fn from_parts(kind: &str, target: Option<&str>) -> Self {
        let target = target.map(str::to_string);
        match kind {
            "primary" => Rule::Primary,
            "in" => Rule::In { target },
            "from" => Rule::From { target },
            "to" => Rule::To { target },
            "like" => Rule::Like { target },
            _ => Rule::Equals { target },
        }
    }

    /// Returns the kind tag of this rule.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Primary => "primary",
            Rule::In { .. } => "in",
            Rule::From { .. } => "from",
            Rule::To { .. } => "to",
            Rule::Like { .. } => "like",
            Rule::Equals { .. } => "equals",
        }
    }

    /// Returns the explicit target column, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            Rule::Primary => None,
            Rule::In { target }
            | Rule::From { target }
            | Rule::To { target }
            | Rule::Like { target }
            | Rule::Equals { target } => target.as_deref(),
        }
    }

    /// Returns the column this rule filters on for the given form field.
    pub fn column<'a>(&'a self, field: &'a str) -> &'a str {
        self.target().unwrap_or(field)
    }

    /// Returns `true` for [`Rule::Primary`].
    pub fn is_primary(&self) -> bool {
        matches!(self, Rule::Primary)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target() {
            Some(target) => write!(f, "{}({})", self.kind(), target),
            None => write!(f, "{}", self.kind()),
        }
    }
}

/// Rules keyed by form field, in definition order.
///
/// Defining a rule for a field that already has one replaces it in place,
/// keeping the field's original position.
///
/// # Example
///
/// ```
/// use model_filter::RuleSet;
///
/// let rules = RuleSet::new()
///     .primary("ticket_no")
///     .equals("status", None)
///     .like("subject", None)
///     .from_date("created_from", "created_at")
///     .to_date("created_to", "created_at");
///
/// let fields: Vec<&str> = rules.fields().collect();
/// assert_eq!(fields, ["ticket_no", "status", "subject", "created_from", "created_to"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<(String, Rule)>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        RuleSet::default()
    }

    /// Defines (or redefines) the rule for a form field.
    pub fn rule(mut self, field: impl Into<String>, rule: Rule) -> Self {
        self.insert(field, rule);
        self
    }

    /// Defines a primary rule.
    pub fn primary(self, field: impl Into<String>) -> Self {
        self.rule(field, Rule::Primary)
    }

    /// Defines a membership rule on `target`.
    pub fn within(self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.rule(
            field,
            Rule::In {
                target: Some(target.into()),
            },
        )
    }

    /// Defines a start-of-day lower bound on `target`.
    pub fn from_date(self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.rule(
            field,
            Rule::From {
                target: Some(target.into()),
            },
        )
    }

    /// Defines an end-of-day upper bound on `target`.
    pub fn to_date(self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.rule(
            field,
            Rule::To {
                target: Some(target.into()),
            },
        )
    }

    /// Defines a prefix-match rule.
    pub fn like(self, field: impl Into<String>, target: Option<&str>) -> Self {
        self.rule(
            field,
            Rule::Like {
                target: target.map(str::to_string),
            },
        )
    }

    /// Defines an equality rule.
    pub fn equals(self, field: impl Into<String>, target: Option<&str>) -> Self {
        self.rule(
            field,
            Rule::Equals {
                target: target.map(str::to_string),
            },
        )
    }

    /// Inserts a rule, replacing an existing rule for the same field in place.
    pub fn insert(&mut self, field: impl Into<String>, rule: Rule) {
        let field = field.into();
        match self.rules.iter().position(|(name, _)| *name == field) {
            Some(index) => self.rules[index].1 = rule,
            None => self.rules.push((field, rule)),
        }
    }

    /// Returns the rule for a form field.
    pub fn get(&self, field: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, rule)| rule)
    }

    /// Iterates over `(field, rule)` pairs in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    /// Iterates over the form field names in definition order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are defined.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parses a rule set from positional `(field, [kind, target?])` entries.
    ///
    /// Each definition must hold one or two items.
    pub fn from_positional<I, F>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (F, Vec<String>)>,
        F: Into<String>,
    {
        let mut set = RuleSet::new();
        for (field, definition) in entries {
            let field = field.into();
            let rule = match definition.as_slice() {
                [kind] => Rule::from_parts(kind, None),
                [kind, target] => Rule::from_parts(kind, Some(target.as_str())),
                parts => {
                    return Err(FilterError::invalid_rule(
                        field,
                        format!("expected [kind] or [kind, column], got {} items", parts.len()),
                    ))
                }
            };
            set.insert(field, rule);
        }
        Ok(set)
    }
}

impl<F: Into<String>> FromIterator<(F, Rule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (F, Rule)>>(iter: I) -> Self {
        let mut set = RuleSet::new();
        for (field, rule) in iter {
            set.insert(field, rule);
        }
        set
    }
}

/// Positional rule definition as it appears in configuration.
struct PositionalRule(Vec<String>);

impl<'de> Deserialize<'de> for PositionalRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PositionalVisitor;

        impl<'de> Visitor<'de> for PositionalVisitor {
            type Value = PositionalRule;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a rule kind or a [kind, column] sequence")
            }

            fn visit_str<E: de::Error>(self, kind: &str) -> std::result::Result<Self::Value, E> {
                Ok(PositionalRule(vec![kind.to_string()]))
            }

            fn visit_seq<A: SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut parts = Vec::new();
                while let Some(part) = seq.next_element::<String>()? {
                    parts.push(part);
                }
                Ok(PositionalRule(parts))
            }
        }

        deserializer.deserialize_any(PositionalVisitor)
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of form field names to rule definitions")
            }

            // Entries are read in document order, so no ordered-map support
            // is needed from the format.
            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some((field, rule)) = map.next_entry::<String, PositionalRule>()? {
                    entries.push((field, rule.0));
                }
                RuleSet::from_positional(entries).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}
