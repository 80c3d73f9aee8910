//! The query accumulator seam.
//!
//! [`QueryBuilder`] is implemented by whatever represents an in-progress,
//! not-yet-executed query in the host application. The engine only ever
//! appends conditions to it.

use chrono::NaiveDateTime;

use crate::error::{FilterError, Result};
use crate::op::Op;
use crate::value::FormValue;

/// A query under construction that rules can append conditions to.
///
/// Only [`where_eq`](Self::where_eq) is required, since the primary and
/// default rules both need it. The other capabilities default to returning
/// [`FilterError::Unsupported`], so a builder that cannot express, say, a
/// `LIKE` condition fails loudly when a `like` rule fires instead of
/// dropping the condition.
///
/// # Example
///
/// ```
/// use model_filter::{FormValue, QueryBuilder, Result};
///
/// #[derive(Default)]
/// struct SqlWhere {
///     parts: Vec<String>,
///     binds: Vec<FormValue>,
/// }
///
/// impl QueryBuilder for SqlWhere {
///     fn where_eq(&mut self, column: &str, value: &FormValue) -> Result<()> {
///         self.parts.push(format!("{} = ?", column));
///         self.binds.push(value.clone());
///         Ok(())
///     }
///
///     fn where_like(&mut self, column: &str, pattern: &str) -> Result<()> {
///         self.parts.push(format!("{} LIKE ?", column));
///         self.binds.push(pattern.into());
///         Ok(())
///     }
/// }
/// ```
pub trait QueryBuilder {
    /// Appends `column = value`.
    fn where_eq(&mut self, column: &str, value: &FormValue) -> Result<()>;

    /// Appends `column IN (values...)`.
    fn where_in(&mut self, column: &str, values: &[FormValue]) -> Result<()> {
        let _ = values;
        Err(FilterError::unsupported(Op::In, column))
    }

    /// Appends `column >= at`.
    fn where_gte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        let _ = at;
        Err(FilterError::unsupported(Op::Gte, column))
    }

    /// Appends `column <= at`.
    fn where_lte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        let _ = at;
        Err(FilterError::unsupported(Op::Lte, column))
    }

    /// Appends `column LIKE pattern`.
    fn where_like(&mut self, column: &str, pattern: &str) -> Result<()> {
        let _ = pattern;
        Err(FilterError::unsupported(Op::Like, column))
    }
}

impl<Q: QueryBuilder + ?Sized> QueryBuilder for &mut Q {
    fn where_eq(&mut self, column: &str, value: &FormValue) -> Result<()> {
        (**self).where_eq(column, value)
    }

    fn where_in(&mut self, column: &str, values: &[FormValue]) -> Result<()> {
        (**self).where_in(column, values)
    }

    fn where_gte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        (**self).where_gte(column, at)
    }

    fn where_lte(&mut self, column: &str, at: NaiveDateTime) -> Result<()> {
        (**self).where_lte(column, at)
    }

    fn where_like(&mut self, column: &str, pattern: &str) -> Result<()> {
        (**self).where_like(column, pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct EqOnly {
        seen: Vec<(String, FormValue)>,
    }

    impl QueryBuilder for EqOnly {
        fn where_eq(&mut self, column: &str, value: &FormValue) -> Result<()> {
            self.seen.push((column.to_string(), value.clone()));
            Ok(())
        }
    }

    #[test]
    fn missing_capabilities_are_unsupported() {
        let mut query = EqOnly::default();
        let err = query.where_like("name", "ab%").unwrap_err();
        assert!(matches!(
            err,
            FilterError::Unsupported { op: Op::Like, ref column } if column == "name"
        ));

        let err = query.where_in("status", &[]).unwrap_err();
        assert!(matches!(err, FilterError::Unsupported { op: Op::In, .. }));
    }

    fn append_id<Q: QueryBuilder>(mut query: Q) -> Q {
        query.where_eq("id", &FormValue::from(7i64)).unwrap();
        query
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut query = EqOnly::default();
        append_id(&mut query);
        assert_eq!(query.seen, vec![("id".to_string(), FormValue::from(7i64))]);
    }
}
