//! Recorded query conditions.
//!
//! A [`Condition`] is one predicate a rule appended: a column, an operator
//! and a value. [`Conditions`] is a [`QueryBuilder`] that simply records
//! them, for callers that translate conditions into their own query layer
//! and for inspecting what a filter pass produced.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::op::Op;
use crate::traits::QueryBuilder;
use crate::value::FormValue;

/// Format used when rendering datetime bounds.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single query predicate.
///
/// # Example
///
/// ```
/// use model_filter::{Condition, ConditionValue, Op};
///
/// let condition = Condition::new("name", Op::Like, ConditionValue::Pattern("ab%".into()));
/// assert_eq!(condition.to_string(), r#"name like "ab%""#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The query column.
    pub column: String,
    /// The comparison operator.
    pub op: Op,
    /// The value to compare against.
    pub value: ConditionValue,
}

impl Condition {
    /// Creates a new condition.
    pub fn new(column: impl Into<String>, op: Op, value: ConditionValue) -> Self {
        Condition {
            column: column.into(),
            op,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op, self.value)
    }
}

/// Owned value carried by a [`Condition`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    /// Submitted value compared for equality.
    Value(FormValue),
    /// Set of values for membership.
    Set(Vec<FormValue>),
    /// Normalized datetime bound.
    DateTime(NaiveDateTime),
    /// `LIKE` pattern, wildcard included.
    Pattern(String),
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Value(value) => write!(f, "{}", value),
            ConditionValue::Set(values) => write!(f, "{}", FormValue::List(values.clone())),
            ConditionValue::DateTime(at) => write!(f, "{}", at.format(DATETIME_FORMAT)),
            ConditionValue::Pattern(pattern) => write!(f, "{:?}", pattern),
        }
    }
}

/// A [`QueryBuilder`] that records every condition in order.
///
/// # Example
///
/// ```
/// use model_filter::{Conditions, FormValue, QueryBuilder};
///
/// let mut conditions = Conditions::new();
/// conditions.where_eq("status", &FormValue::from("open")).unwrap();
/// assert_eq!(conditions.len(), 1);
/// assert_eq!(conditions[0].to_string(), r#"status = "open""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    conditions: Vec<Condition>,
}

impl Conditions {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Returns the recorded conditions in the order they were appended.
    pub fn as_slice(&self) -> &[Condition] {
        &self.conditions
    }

    /// Returns the number of recorded conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterates over the recorded conditions.
    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.conditions.iter()
    }

    /// Consumes the recorder, returning the conditions.
    pub fn into_vec(self) -> Vec<Condition> {
        self.conditions
    }

    fn push(&mut self, column: &str, op: Op, value: ConditionValue) {
        tracing::trace!(column, op = %op, value = %value, "condition appended");
        self.conditions.push(Condition::new(column, op, value));
    }
}

impl std::ops::Index<usize> for Conditions {
    type Output = Condition;

    fn index(&self, index: usize) -> &Condition {
        &self.conditions[index]
    }
}

impl<'a> IntoIterator for &'a Conditions {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}

impl QueryBuilder for Conditions {
    fn where_eq(&mut self, column: &str, value: &FormValue) -> Result<()> {
        self.push(column, Op::Eq, ConditionValue::Value(value.clone()));
        Ok(())
    }

    fn where_in(&mut self, column: &str, values: &[FormValue]) -> Result<()> {
        self.push(column, Op::In, ConditionValue::Set(values.to_vec()));
        Ok(())
    }

    fn where_gte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        self.push(column, Op::Gte, ConditionValue::DateTime(at));
        Ok(())
    }

    fn where_lte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        self.push(column, Op::Lte, ConditionValue::DateTime(at));
        Ok(())
    }

    fn where_like(&mut self, column: &str, pattern: &str) -> Result<()> {
        self.push(column, Op::Like, ConditionValue::Pattern(pattern.to_string()));
        Ok(())
    }
}
