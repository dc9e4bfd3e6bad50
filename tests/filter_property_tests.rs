use argo_query::filters::{combine_filters, ExtremeKind, FilterEngine, NegatedFilter, ResultLimit};
use argo_query::models::{CycleRecord, FloatCatalog, FloatCycles, FloatRecord, ResultTree};
use argo_query::processors::ResultNormalizer;
use argo_query::utils::BoundingBox;
use proptest::prelude::*;
use serde_json::json;
use std::collections::HashSet;

const MAX_FLOATS: usize = 40;

fn catalog_strategy() -> impl Strategy<Value = FloatCatalog> {
    prop::collection::vec(
        prop::option::weighted(0.85, (-90.0f64..=90.0, -180.0f64..=180.0)),
        0..MAX_FLOATS,
    )
    .prop_map(|positions| {
        let records = positions.into_iter().enumerate().map(|(i, position)| {
            let builder = FloatRecord::builder(format!("29{:05}", i));
            let builder = match position {
                Some((lat, lon)) => builder.coordinates(lat, lon),
                None => builder,
            };
            builder.build().unwrap()
        });
        FloatCatalog::from_records(records).unwrap()
    })
}

fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
    (-90.0f64..=90.0, -90.0f64..=90.0, -180.0f64..=180.0, -180.0f64..=180.0)
        .prop_map(|(a, b, c, d)| BoundingBox::new(a.min(b), a.max(b), c.min(d), c.max(d)))
}

fn id_lists_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(
        prop::collection::vec((0u8..20).prop_map(|n| format!("id{}", n)), 0..15),
        1..5,
    )
}

fn results_tree_strategy() -> impl Strategy<Value = ResultTree> {
    prop::collection::vec(prop::collection::vec(0i64..500, 0..12), 1..6).prop_map(|floats| {
        let mut cycles_by_float = FloatCycles::new();
        for (i, cycle_numbers) in floats.into_iter().enumerate() {
            let mut cycles = CycleRecord::new();
            for cycle in cycle_numbers {
                cycles.insert(cycle.to_string(), json!({"juld": "None"}));
            }
            cycles_by_float.insert(format!("float{}", i), cycles);
        }
        let mut tree = ResultTree::new();
        tree.insert("group", cycles_by_float);
        tree
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn coordinate_filter_matches_exactly_the_floats_inside(catalog in catalog_strategy(), bbox in bbox_strategy()) {
        let engine = FilterEngine::new(&catalog);
        let result: HashSet<String> = engine.filter_by_coordinates(&bbox, ResultLimit::All).into_iter().collect();

        for record in catalog.iter() {
            let inside = record.coordinates().is_some_and(|(lat, lon)| bbox.contains(lat, lon));
            prop_assert_eq!(result.contains(&record.float_id), inside);
        }
    }

    #[test]
    fn negation_partitions_the_catalog(catalog in catalog_strategy(), bbox in bbox_strategy()) {
        let engine = FilterEngine::new(&catalog);
        let direct: HashSet<String> = engine.filter_by_coordinates(&bbox, ResultLimit::All).into_iter().collect();
        let negated: HashSet<String> = engine
            .filter_by_negation(&NegatedFilter::coordinates(bbox), ResultLimit::All)
            .unwrap()
            .into_iter()
            .collect();

        for id in catalog.ids() {
            prop_assert!(direct.contains(id) ^ negated.contains(id));
        }
    }

    #[test]
    fn limit_truncates_to_a_prefix(catalog in catalog_strategy(), bbox in bbox_strategy(), k in 0usize..10) {
        let engine = FilterEngine::new(&catalog);
        let all = engine.filter_by_coordinates(&bbox, ResultLimit::All);
        let top = engine.filter_by_coordinates(&bbox, ResultLimit::Top(k));

        prop_assert_eq!(top.len(), all.len().min(k));
        prop_assert_eq!(&all[..top.len()], top.as_slice());
    }

    #[test]
    fn combine_is_set_intersection(lists in id_lists_strategy()) {
        let combined: HashSet<String> = combine_filters(&lists).into_iter().collect();

        let mut expected: HashSet<String> = lists[0].iter().cloned().collect();
        for list in &lists[1..] {
            let other: HashSet<String> = list.iter().cloned().collect();
            expected.retain(|id| other.contains(id));
        }
        prop_assert_eq!(&combined, &expected);

        let mut reversed = lists.clone();
        reversed.reverse();
        let combined_reversed: HashSet<String> = combine_filters(&reversed).into_iter().collect();
        prop_assert_eq!(combined, combined_reversed);
    }

    #[test]
    fn combine_output_has_no_duplicates(lists in id_lists_strategy()) {
        let combined = combine_filters(&lists);
        let unique: HashSet<&String> = combined.iter().collect();
        prop_assert_eq!(unique.len(), combined.len());
    }

    #[test]
    fn normalization_sorts_and_is_idempotent(tree in results_tree_strategy()) {
        let normalizer = ResultNormalizer::new();
        let (once, _) = normalizer.normalize(&tree, None);
        let (twice, report) = normalizer.normalize(&once, None);

        prop_assert_eq!(&once, &twice);
        prop_assert!(report.lexical_fallbacks.is_empty());

        for floats in once.values() {
            for cycles in floats.values() {
                let numbers: Vec<i64> = cycles.keys().map(|key| key.parse().unwrap()).collect();
                prop_assert!(numbers.windows(2).all(|pair| pair[0] <= pair[1]));
            }
        }
    }
}

#[test]
fn extreme_values_rank_and_truncate() {
    let catalog = FloatCatalog::from_records(vec![
        FloatRecord::builder("A").parameter("temp_max", 10.0).build().unwrap(),
        FloatRecord::builder("B").parameter("temp_max", 30.0).build().unwrap(),
        FloatRecord::builder("C").parameter("temp_max", 20.0).build().unwrap(),
    ])
    .unwrap();
    let engine = FilterEngine::new(&catalog);

    assert_eq!(
        engine.find_extreme_values("temperature", ExtremeKind::Max, ResultLimit::All),
        vec!["B", "C", "A"]
    );
    assert_eq!(
        engine.find_extreme_values("temperature", ExtremeKind::Min, ResultLimit::All),
        vec!["A", "C", "B"]
    );
    assert_eq!(
        engine.find_extreme_values("temperature", ExtremeKind::Max, ResultLimit::Top(2)),
        vec!["B", "C"]
    );
    assert!(engine
        .find_extreme_values("temperature", ExtremeKind::Max, ResultLimit::Top(0))
        .is_empty());
}
