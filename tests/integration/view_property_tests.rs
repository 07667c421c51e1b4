//! # View Property Tests
//!
//! Filtering and sorting invariants over generated result sets.

use super::helpers::text_rows;
use parq_sql::view::{project, FilterEngine, RowMatcher, SortingProcessor};
use parq_sql::{ResultSet, SortSpec, Value};
use proptest::prelude::*;

/// 2^53, where `i64 as f64` starts rounding
const TWO_POW_53: i64 = 9_007_199_254_740_992;

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Integer),
        (-4i64..4).prop_map(|d| Value::Integer(TWO_POW_53 + d)),
        any::<f64>().prop_map(Value::Number),
        (-4i64..4).prop_map(|d| Value::Number((TWO_POW_53 + d) as f64)),
        "[a-zA-Z0-9 .\\-]{0,8}".prop_map(Value::Text),
    ]
}

fn result_set_strategy() -> impl Strategy<Value = ResultSet> {
    (1usize..4).prop_flat_map(|width| {
        proptest::collection::vec(
            proptest::collection::vec(value_strategy(), width),
            0..30,
        )
        .prop_map(move |rows| {
            let columns = (0..width).map(|i| format!("c{i}")).collect();
            ResultSet::new(columns, rows).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn prop_clearing_filter_restores_original_order(
        rs in result_set_strategy(),
        pattern in "[a-z\\[\\(\\.\\*]{0,4}",
    ) {
        let _ = FilterEngine::apply(&rs, &pattern);
        let cleared = FilterEngine::apply(&rs, "");

        let expected: Vec<usize> = (0..rs.row_count()).collect();
        prop_assert_eq!(cleared.visible_row_indices(), expected.as_slice());
        prop_assert_eq!(cleared.total_rows(), rs.row_count());
        prop_assert!(!cleared.is_filtered());
    }

    #[test]
    fn prop_filter_is_deterministic(rs in result_set_strategy(), pattern in ".{0,6}") {
        prop_assert_eq!(FilterEngine::apply(&rs, &pattern), FilterEngine::apply(&rs, &pattern));
    }

    #[test]
    fn prop_filter_yields_ascending_subset(rs in result_set_strategy(), pattern in ".{0,6}") {
        let view = FilterEngine::apply(&rs, &pattern);
        let indices = view.visible_row_indices();

        prop_assert!(indices.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(indices.iter().all(|i| *i < rs.row_count()));
        prop_assert_eq!(view.total_rows(), rs.row_count());
    }

    #[test]
    fn prop_sort_permutes_filtered_rows(
        rs in result_set_strategy(),
        pattern in "[a-c0-9]{0,2}",
        descending in any::<bool>(),
    ) {
        let matcher = RowMatcher::compile(&pattern);
        let filtered = FilterEngine::apply_matcher(&rs, &matcher);
        let spec = if descending { SortSpec::descending(0) } else { SortSpec::ascending(0) };
        let sorted = project(&rs, &matcher, Some(spec));

        let mut a = filtered.visible_row_indices().to_vec();
        let mut b = sorted.visible_row_indices().to_vec();
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);

        let keys: Vec<&Value> = sorted
            .visible_row_indices()
            .iter()
            .filter_map(|i| rs.cell(*i, 0))
            .collect();
        for pair in keys.windows(2) {
            let ordering = SortingProcessor::compare_values(pair[0], pair[1]);
            if descending {
                prop_assert!(ordering != std::cmp::Ordering::Less);
            } else {
                prop_assert!(ordering != std::cmp::Ordering::Greater);
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_compare_values_is_a_total_order(
        a in value_strategy(),
        b in value_strategy(),
        c in value_strategy(),
    ) {
        use std::cmp::Ordering;
        let cmp = SortingProcessor::compare_values;

        prop_assert_eq!(cmp(&a, &b), cmp(&b, &a).reverse());
        if cmp(&a, &b) != Ordering::Greater && cmp(&b, &c) != Ordering::Greater {
            prop_assert_ne!(cmp(&a, &c), Ordering::Greater);
        }
    }
}

#[test]
fn test_unbalanced_bracket_falls_back_to_literal() {
    let rs = text_rows("v", &["a[0]", "b", "[0"]);
    let view = FilterEngine::apply(&rs, "[0");

    assert_eq!(view.visible_row_indices(), &[0, 2]);
    assert!(view.is_filtered());
}

#[test]
fn test_filter_matches_any_cell_case_insensitively() {
    let rs = ResultSet::new(
        vec!["fruit".into(), "qty".into()],
        vec![
            vec![Value::Text("apple".into()), Value::Integer(1)],
            vec![Value::Text("Banana".into()), Value::Integer(-2)],
        ],
    )
    .unwrap();

    assert_eq!(FilterEngine::apply(&rs, "ban").visible_row_indices(), &[1]);
    assert_eq!(FilterEngine::apply(&rs, "-2").visible_row_indices(), &[1]);
    assert_eq!(FilterEngine::apply(&rs, "^a").visible_row_indices(), &[0]);
}
