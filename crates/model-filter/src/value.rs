//! Submitted form values.
//!
//! The [`FormValue`] enum represents one submitted form field as it was stored
//! in the session: a string, a number, a boolean, a list (multi-selects) or
//! an explicit null. [`FormData`] maps field names to those values.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Submitted form data, keyed by form field name.
pub type FormData = BTreeMap<String, FormValue>;

/// A single submitted form value.
///
/// Deserializes untagged, so a JSON request body or session payload maps
/// onto it directly.
///
/// # Example
///
/// ```
/// use model_filter::FormValue;
///
/// let value: FormValue = serde_json::from_str(r#"[1, "two", true]"#).unwrap();
/// assert_eq!(
///     value,
///     FormValue::List(vec![1i64.into(), "two".into(), true.into()])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Explicit null.
    #[default]
    Null,
    /// Checkbox-like boolean value.
    Bool(bool),
    /// Numeric value.
    Number(serde_json::Number),
    /// Text value.
    String(String),
    /// Multi-valued field (e.g. a multi-select).
    List(Vec<FormValue>),
}

impl FormValue {
    /// Returns `true` if a rule must ignore this value.
    ///
    /// Only an explicit null and the empty string count as empty. `0`,
    /// `false`, `"0"`, whitespace and empty lists are real values and are
    /// filtered on.
    pub fn is_empty_sentinel(&self) -> bool {
        match self {
            FormValue::Null => true,
            FormValue::String(s) => s.is_empty(),
            FormValue::Bool(_) | FormValue::Number(_) | FormValue::List(_) => false,
        }
    }

    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the list items, if this is a list.
    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Renders a scalar as the text a query layer would bind.
    ///
    /// Returns `None` for lists and null.
    pub fn to_text(&self) -> Option<String> {
        match self {
            FormValue::String(s) => Some(s.clone()),
            FormValue::Number(n) => Some(n.to_string()),
            FormValue::Bool(b) => Some(b.to_string()),
            FormValue::Null | FormValue::List(_) => None,
        }
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormValue::Null => write!(f, "null"),
            FormValue::Bool(b) => write!(f, "{}", b),
            FormValue::Number(n) => write!(f, "{}", n),
            FormValue::String(s) => write!(f, "{:?}", s),
            FormValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(s: &str) -> Self {
        FormValue::String(s.to_string())
    }
}

impl From<String> for FormValue {
    fn from(s: String) -> Self {
        FormValue::String(s)
    }
}

impl From<bool> for FormValue {
    fn from(b: bool) -> Self {
        FormValue::Bool(b)
    }
}

impl From<i32> for FormValue {
    fn from(n: i32) -> Self {
        FormValue::Number(n.into())
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n.into())
    }
}

impl From<u32> for FormValue {
    fn from(n: u32) -> Self {
        FormValue::Number(n.into())
    }
}

impl From<u64> for FormValue {
    fn from(n: u64) -> Self {
        FormValue::Number(n.into())
    }
}

impl<T: Into<FormValue>> From<Vec<T>> for FormValue {
    fn from(items: Vec<T>) -> Self {
        FormValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FormValue>> From<Option<T>> for FormValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FormValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_and_null_are_empty() {
        assert!(FormValue::Null.is_empty_sentinel());
        assert!(FormValue::from("").is_empty_sentinel());
    }

    #[test]
    fn falsy_values_are_not_empty() {
        assert!(!FormValue::from(0i64).is_empty_sentinel());
        assert!(!FormValue::from(false).is_empty_sentinel());
        assert!(!FormValue::from("0").is_empty_sentinel());
        assert!(!FormValue::from(" ").is_empty_sentinel());
        assert!(!FormValue::List(vec![]).is_empty_sentinel());
    }

    #[test]
    fn deserialize_untagged() {
        let data: FormData =
            serde_json::from_str(r#"{"a": "x", "b": 3, "c": false, "d": null, "e": ["1", 2]}"#)
                .unwrap();

        assert_eq!(data["a"], FormValue::from("x"));
        assert_eq!(data["b"], FormValue::from(3i64));
        assert_eq!(data["c"], FormValue::from(false));
        assert_eq!(data["d"], FormValue::Null);
        assert_eq!(data["e"], FormValue::List(vec!["1".into(), 2i64.into()]));
    }

    #[test]
    fn to_text_renders_scalars() {
        assert_eq!(FormValue::from("ab").to_text(), Some("ab".to_string()));
        assert_eq!(FormValue::from(42i64).to_text(), Some("42".to_string()));
        assert_eq!(FormValue::from(true).to_text(), Some("true".to_string()));
        assert_eq!(FormValue::Null.to_text(), None);
        assert_eq!(FormValue::from(vec![1i64]).to_text(), None);
    }

    #[test]
    fn display() {
        assert_eq!(FormValue::from("x").to_string(), "\"x\"");
        assert_eq!(FormValue::from(vec![1i64, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(FormValue::Null.to_string(), "null");
    }

    #[test]
    fn option_conversion() {
        assert_eq!(FormValue::from(None::<&str>), FormValue::Null);
        assert_eq!(FormValue::from(Some("x")), FormValue::from("x"));
    }
}
