//! Model filter - remembered, rule-driven query filters.
//!
//! A list page usually has a filter form: a ticket number, a status
//! dropdown, a subject search box, a date range. `model-filter` keeps the
//! last submitted form in the user's session and turns it into query
//! conditions through a declarative rule set, so the page can be revisited
//! or paginated without re-submitting the form.
//!
//! # Quick Start
//!
//! ```rust
//! use model_filter::{Conditions, FormData, FormValue, MemoryStore, ModelFilter, RuleSet};
//!
//! // The host application's session store
//! let session = MemoryStore::new();
//!
//! // One engine per kind of record
//! let mut tickets = ModelFilter::new(&session, "tickets");
//! tickets.set_rules(
//!     RuleSet::new()
//!         .primary("ticket_no")
//!         .within("status", "status_id")
//!         .like("subject", None)
//!         .from_date("created_from", "created_at")
//!         .to_date("created_to", "created_at"),
//! );
//!
//! // Remember the submitted form
//! let form: FormData = serde_json::from_str(r#"{
//!     "ticket_no": "",
//!     "status": [1, 2],
//!     "subject": "printer",
//!     "created_from": "2024-01-01",
//!     "created_to": ""
//! }"#).unwrap();
//! tickets.set_form_data(form).unwrap();
//!
//! // Later, on any request: apply it to a query
//! let conditions = tickets.filter(Conditions::new()).unwrap();
//! assert_eq!(conditions.len(), 3);
//! assert_eq!(conditions[0].to_string(), "status_id in [1, 2]");
//! assert_eq!(conditions[1].to_string(), r#"subject like "printer%""#);
//! assert_eq!(conditions[2].to_string(), "created_at >= 2024-01-01 00:00:00");
//! assert_eq!(tickets.form_value("subject").unwrap(), Some(FormValue::from("printer")));
//! ```
//!
//! # Rule Semantics
//!
//! | Kind | Condition | Column |
//! |------|-----------|--------|
//! | `primary` | `field = value`, then stop | the field |
//! | `in` | `column IN value` | target or field |
//! | `from` | `column >= day 00:00:00` | target or field |
//! | `to` | `column <= day 23:59:59` | target or field |
//! | `like` | `column LIKE value%` | target or field |
//! | other | `column = value` | target or field |
//!
//! Rules apply in definition order. A field that is missing, null or the
//! empty string skips its rule; `0` and `false` do not.
//!
//! # Collaborators
//!
//! - [`StateStore`] is the session seam. [`MemoryStore`] ships for tests.
//! - [`QueryBuilder`] is the query seam. [`Conditions`] records what was
//!   appended; implement the trait for your own query type to build it
//!   directly.

mod condition;
mod error;
mod filter;
mod op;
mod options;
mod rule;
mod store;
mod traits;
mod value;

// Re-export public API
pub use condition::{Condition, ConditionValue, Conditions, DATETIME_FORMAT};
pub use error::{FilterError, Result};
pub use filter::ModelFilter;
pub use op::Op;
pub use options::{DateErrorPolicy, FilterOptions, DEFAULT_NAMESPACE};
pub use rule::{Rule, RuleSet};
pub use store::{MemoryStore, StateStore};
pub use traits::QueryBuilder;
pub use value::{FormData, FormValue};
