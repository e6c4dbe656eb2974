//! Property-based tests for the query engine using proptest.

use std::collections::BTreeMap;

use catalog_query::{Filters, QueryEngine, QueryState, SortOrder};
use proptest::prelude::*;
use serde_json::{json, Value};

// ============================================================================
// Strategies
// ============================================================================

const LEVELS: &[&str] = &["BEGINNER", "INTERMEDIATE", "ADVANCED"];
const CATEGORIES: &[&str] = &["VFX", "Color", "3D"];

fn course_strategy() -> impl Strategy<Value = Value> {
    (
        "[A-Za-z ]{0,12}",
        prop::option::of(duration_strategy()),
        prop::option::of(any::<bool>()),
        prop::sample::select(LEVELS),
        prop::sample::select(CATEGORIES),
    )
        .prop_map(|(title, duration, free, level, category)| {
            let mut course = serde_json::Map::new();
            course.insert("title".into(), json!(title));
            course.insert("level".into(), json!(level));
            course.insert("category".into(), json!(category));
            if let Some(d) = duration {
                course.insert("totalDuration".into(), d);
            }
            if let Some(f) = free {
                course.insert("isFree".into(), json!(f));
            }
            Value::Object(course)
        })
}

/// Durations in every JSON number representation, including whole floats
/// and negative zero, so sorting sees numerically equal keys.
fn duration_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0u32..1000).prop_map(|d| json!(d)),
        (0u32..1000).prop_map(|d| json!(f64::from(d))),
        (0.0f64..1000.0).prop_map(|d| json!(d)),
        Just(json!(-0.0)),
    ]
}

fn tied_duration_strategy() -> impl Strategy<Value = Value> {
    prop::sample::select(vec![
        json!(0),
        json!(0.0),
        json!(-0.0),
        json!(120),
        json!(120.0),
        json!(120.5),
        json!(700u64),
        json!(700.0),
    ])
}

fn catalog_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(course_strategy(), 0..40)
}

fn filter_entry_strategy() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        prop::sample::select(vec!["free", "paid", "other", ""])
            .prop_map(|v| ("price".to_string(), v.to_string())),
        prop::sample::select(vec!["short", "medium", "long", "x"])
            .prop_map(|v| ("duration".to_string(), v.to_string())),
        prop::sample::select(vec!["BEGINNER", "ADVANCED", "ALL"])
            .prop_map(|v| ("level".to_string(), v.to_string())),
        prop::sample::select(CATEGORIES)
            .prop_map(|v| ("category".to_string(), v.to_string())),
    ]
}

fn state_strategy() -> impl Strategy<Value = QueryState> {
    (
        "[a-zA-Z]{0,3}",
        prop::collection::vec(filter_entry_strategy(), 0..4),
        prop::sample::select(vec!["", "title", "totalDuration", "isFree", "missing"]),
        any::<bool>(),
    )
        .prop_map(|(search, entries, sort_by, desc)| QueryState {
            search_query: search,
            filters: entries.into_iter().collect(),
            sort_by: sort_by.to_string(),
            sort_order: if desc { SortOrder::Desc } else { SortOrder::Asc },
        })
}

fn visible_ids(engine: &QueryEngine<'_, Value>) -> Vec<usize> {
    engine.visible_indices().to_vec()
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// Identical inputs always give an identical ordered result.
    #[test]
    fn derivation_is_deterministic(items in catalog_strategy(), state in state_strategy()) {
        let mut first = QueryEngine::new(&items, ["title", "category"]);
        first.set_state(state.clone());
        let mut second = QueryEngine::new(&items, ["title", "category"]);
        second.set_state(state);

        prop_assert_eq!(visible_ids(&first), visible_ids(&second));
        let again = first.visible_indices().to_vec();
        prop_assert_eq!(visible_ids(&first), again);
    }

    /// clear_all is idempotent and always leaves an inactive query.
    #[test]
    fn clear_all_is_idempotent(items in catalog_strategy(), state in state_strategy()) {
        let mut engine = QueryEngine::new(&items, ["title"]);
        engine.set_state(state);

        engine.clear_all();
        let once = engine.state().clone();
        engine.clear_all();

        prop_assert_eq!(engine.state(), &once);
        prop_assert_eq!(engine.state(), &QueryState::default());
        prop_assert!(!engine.has_active_query());
        prop_assert_eq!(engine.visible_count(), items.len());
    }

    /// Adding a filter never grows the result.
    #[test]
    fn filters_only_narrow(
        items in catalog_strategy(),
        entries in prop::collection::vec(filter_entry_strategy(), 0..4),
        extra in filter_entry_strategy(),
    ) {
        let base: Filters = entries.into_iter().collect();
        let mut engine = QueryEngine::new(&items, ["title"]);
        engine.set_filters(base.clone());
        let before = visible_ids(&engine);

        let (key, value) = extra;
        if base.contains_key(&key) {
            // Replacing a selection is not narrowing; only new keys count.
            return Ok(());
        }
        engine.set_filters(base.with(key, value));
        let after = visible_ids(&engine);

        prop_assert!(after.len() <= before.len());
        prop_assert!(after.iter().all(|i| before.contains(i)));
    }

    /// Without a sort field, the output is the input order restricted to
    /// matching items.
    #[test]
    fn unsorted_output_preserves_input_order(
        items in catalog_strategy(),
        mut state in state_strategy(),
    ) {
        state.sort_by.clear();
        let mut engine = QueryEngine::new(&items, ["title"]);
        engine.set_state(state);

        let ids = visible_ids(&engine);
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    /// Sorting permutes the filtered set and keeps equal keys in input order.
    #[test]
    fn sort_is_a_stable_permutation(
        items in catalog_strategy(),
        mut state in state_strategy(),
    ) {
        let mut engine = QueryEngine::new(&items, ["title"]);
        let sort_by = std::mem::take(&mut state.sort_by);
        let order = state.sort_order;
        engine.set_state(state);
        let unsorted = visible_ids(&engine);

        engine.set_sort_by(sort_by.clone());
        let sorted = visible_ids(&engine);

        let mut a = unsorted.clone();
        let mut b = sorted.clone();
        a.sort_unstable();
        b.sort_unstable();
        prop_assert_eq!(a, b);

        if !sort_by.is_empty() {
            for pair in sorted.windows(2) {
                let cmp = catalog_query::compare_by_field(
                    &items[pair[0]], &items[pair[1]], &sort_by, order,
                );
                prop_assert!(cmp != std::cmp::Ordering::Greater);
                if cmp == std::cmp::Ordering::Equal {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }
    }

    /// Keys that are numerically equal in any representation keep their
    /// input order, in both directions.
    #[test]
    fn numerically_equal_keys_keep_input_order(
        durations in prop::collection::vec(tied_duration_strategy(), 0..30),
        desc in any::<bool>(),
    ) {
        let items: Vec<Value> = durations
            .into_iter()
            .map(|d| json!({"totalDuration": d}))
            .collect();
        let mut engine = QueryEngine::new(&items, ["title"]);
        engine.set_sort_by("totalDuration");
        engine.set_sort_order(if desc { SortOrder::Desc } else { SortOrder::Asc });

        let ids = visible_ids(&engine);
        prop_assert_eq!(ids.len(), items.len());
        let key = |i: usize| items[i]["totalDuration"].as_f64().unwrap_or(f64::NAN);
        for pair in ids.windows(2) {
            let (a, b) = (key(pair[0]), key(pair[1]));
            if a == b {
                prop_assert!(pair[0] < pair[1]);
            } else if desc {
                prop_assert!(a > b);
            } else {
                prop_assert!(a < b);
            }
        }
    }

    /// Query casing does not affect the result.
    #[test]
    fn search_is_case_insensitive(items in catalog_strategy(), query in "[a-zA-Z]{1,3}") {
        let mut lower = QueryEngine::new(&items, ["title"]);
        lower.set_search_query(query.to_lowercase());
        let mut upper = QueryEngine::new(&items, ["title"]);
        upper.set_search_query(query.to_uppercase());

        prop_assert_eq!(visible_ids(&lower), visible_ids(&upper));
    }

    /// Filter insertion order is not observable.
    #[test]
    fn filter_order_is_irrelevant(
        items in catalog_strategy(),
        entries in prop::collection::vec(filter_entry_strategy(), 0..4),
    ) {
        let unique: BTreeMap<String, String> = entries.into_iter().collect();
        let forward: Filters = unique.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let backward: Filters = unique.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect();

        let mut a = QueryEngine::new(&items, ["title"]);
        a.set_filters(forward);
        let mut b = QueryEngine::new(&items, ["title"]);
        b.set_filters(backward);

        prop_assert_eq!(visible_ids(&a), visible_ids(&b));
    }
}
