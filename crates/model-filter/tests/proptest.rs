//! Property-based tests for model-filter using proptest.

use model_filter::{
    ConditionValue, Conditions, FormData, FormValue, MemoryStore, ModelFilter, RuleSet,
};
use proptest::prelude::*;

// ============================================================================
// Test helpers
// ============================================================================

/// Non-empty scalar values, as submitted by a form.
fn non_empty_value() -> impl Strategy<Value = FormValue> {
    prop_oneof![
        "[a-z0-9]{1,10}".prop_map(FormValue::from),
        any::<i64>().prop_map(FormValue::from),
        any::<bool>().prop_map(FormValue::from),
    ]
}

/// Values a rule must skip.
fn empty_value() -> impl Strategy<Value = FormValue> {
    prop_oneof![Just(FormValue::from("")), Just(FormValue::Null)]
}

/// Equality rules over fields `f0..fN`.
fn equality_rules(count: usize) -> RuleSet {
    (0..count).fold(RuleSet::new(), |rules, i| rules.equals(format!("f{}", i), None))
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Empty values never produce conditions.
    #[test]
    fn empty_values_add_nothing(
        values in prop::collection::vec(empty_value(), 0..20),
    ) {
        let store = MemoryStore::new();
        let filter = ModelFilter::new(&store, "items").with_rules(equality_rules(values.len()));
        let form: FormData = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| (format!("f{}", i), value))
            .collect();
        filter.set_form_data(form).unwrap();

        let conditions = filter.filter(Conditions::new()).unwrap();
        prop_assert!(conditions.is_empty());
    }

    /// One condition per non-empty field, in rule order.
    #[test]
    fn one_condition_per_non_empty_field(
        values in prop::collection::vec(prop_oneof![non_empty_value(), empty_value()], 0..20),
    ) {
        let store = MemoryStore::new();
        let filter = ModelFilter::new(&store, "items").with_rules(equality_rules(values.len()));
        let form: FormData = values
            .iter()
            .enumerate()
            .map(|(i, value)| (format!("f{}", i), value.clone()))
            .collect();
        filter.set_form_data(form).unwrap();

        let conditions = filter.filter(Conditions::new()).unwrap();
        let expected: Vec<String> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| !value.is_empty_sentinel())
            .map(|(i, _)| format!("f{}", i))
            .collect();
        let columns: Vec<String> = conditions.iter().map(|c| c.column.clone()).collect();
        prop_assert_eq!(columns, expected);
    }

    /// A triggered primary rule yields exactly its own condition.
    #[test]
    fn primary_is_exclusive(
        primary in non_empty_value(),
        others in prop::collection::vec(non_empty_value(), 0..10),
        position in 0usize..10,
    ) {
        let position = position.min(others.len());
        let mut rules = RuleSet::new();
        let mut form = FormData::new();
        for (i, value) in others.iter().enumerate() {
            if i == position {
                rules = rules.primary("id");
            }
            rules = rules.like(format!("f{}", i), None);
            form.insert(format!("f{}", i), value.clone());
        }
        if position == others.len() {
            rules = rules.primary("id");
        }
        form.insert("id".to_string(), primary);

        let store = MemoryStore::new();
        let filter = ModelFilter::new(&store, "items").with_rules(rules);
        filter.set_form_data(form).unwrap();

        // Every rule before the primary one applies, nothing after it does
        let conditions = filter.filter(Conditions::new()).unwrap();
        prop_assert_eq!(conditions.len(), position + 1);
        prop_assert_eq!(&conditions[position].column, "id");
    }

    /// Engines with different keys never see each other's data.
    #[test]
    fn keys_are_isolated(
        left in prop::collection::btree_map("[a-z]{1,5}", non_empty_value(), 0..8),
        right in prop::collection::btree_map("[a-z]{1,5}", non_empty_value(), 0..8),
    ) {
        let store = MemoryStore::new();
        let a = ModelFilter::new(&store, "a");
        let b = ModelFilter::new(&store, "b");

        a.set_form_data(left.clone()).unwrap();
        b.set_form_data(right.clone()).unwrap();

        prop_assert_eq!(a.form_data().unwrap(), left);
        prop_assert_eq!(b.form_data().unwrap(), right);
    }

    /// Like rules always produce `value%`.
    #[test]
    fn like_pattern_is_prefix(text in "[a-zA-Z0-9 ]{1,20}") {
        let store = MemoryStore::new();
        let filter = ModelFilter::new(&store, "items").with_rules(RuleSet::new().like("q", None));
        let mut form = FormData::new();
        form.insert("q".to_string(), FormValue::from(text.clone()));
        filter.set_form_data(form).unwrap();

        let conditions = filter.filter(Conditions::new()).unwrap();
        prop_assert_eq!(conditions.len(), 1);
        prop_assert_eq!(
            &conditions[0].value,
            &ConditionValue::Pattern(format!("{}%", text))
        );
    }
}
