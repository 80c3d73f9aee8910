//! Condition operators.
//!
//! The [`Op`] enum names the conditions a rule can append to a query. Each
//! maps to one method of [`QueryBuilder`](crate::QueryBuilder).

/// Operator of a query condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Column equals value.
    Eq,
    /// Column is one of a set of values.
    In,
    /// Column is greater than or equal to a datetime.
    Gte,
    /// Column is less than or equal to a datetime.
    Lte,
    /// Column matches a `LIKE` pattern.
    Like,
}

impl Op {
    /// Returns the SQL-style spelling of this operator.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::In => "in",
            Op::Gte => ">=",
            Op::Lte => "<=",
            Op::Like => "like",
        }
    }

    /// Returns the name of the [`QueryBuilder`](crate::QueryBuilder) method
    /// that appends this operator.
    pub fn method(self) -> &'static str {
        match self {
            Op::Eq => "where_eq",
            Op::In => "where_in",
            Op::Gte => "where_gte",
            Op::Lte => "where_lte",
            Op::Like => "where_like",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn op_display() {
        assert_eq!(Op::Eq.to_string(), "=");
        assert_eq!(Op::In.to_string(), "in");
        assert_eq!(Op::Gte.to_string(), ">=");
        assert_eq!(Op::Lte.to_string(), "<=");
        assert_eq!(Op::Like.to_string(), "like");
    }

    #[test]
    fn op_method() {
        assert_eq!(Op::In.method(), "where_in");
        assert_eq!(Op::Like.method(), "where_like");
    }
}
