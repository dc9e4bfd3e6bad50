use crate::models::{FloatCycles, GroupedResult, ProfileRow, ResultTree};
use std::collections::HashMap;
use tracing::{debug, info};

/// Arrange fetched profile rows under the filter group of their float.
///
/// Every group of `grouped` appears in the output, in the same order, even
/// when no rows arrived for it. Rows for floats outside every group are
/// dropped. A float listed in several groups is filed under the last one.
/// A repeated (float, cycle) pair keeps the later row.
pub fn group_rows(rows: &[ProfileRow], grouped: &GroupedResult) -> ResultTree {
    let mut tree = ResultTree::with_capacity(grouped.len());
    let mut float_to_group: HashMap<&str, &str> = HashMap::new();

    for (group, ids) in grouped.iter() {
        tree.insert(group, FloatCycles::new());
        for float_id in ids {
            float_to_group.insert(float_id.as_str(), group);
        }
    }

    let mut dropped = 0usize;
    for row in rows {
        let float_id = row.float_id.trim();
        let Some(group) = float_to_group.get(float_id) else {
            dropped += 1;
            continue;
        };

        if let Some(floats) = tree.get_mut(group) {
            floats
                .get_or_insert_with(float_id, Default::default)
                .insert(row.cycle_number.to_string(), row.payload());
        }
    }

    if dropped > 0 {
        debug!("Dropped {} rows for floats outside every group", dropped);
    }
    info!("Grouped {} rows into {} group(s)", rows.len() - dropped, tree.len());
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grouped() -> GroupedResult {
        serde_json::from_value(json!({
            "bay_of_bengal": ["2902746"],
            "arabian_sea": ["2902115"],
            "empty": []
        }))
        .unwrap()
    }

    #[test]
    fn test_rows_land_in_their_group() {
        let rows = vec![
            ProfileRow::new("2902115", 5).with_position("2012-03-05 00:00:00", 18.0, 65.0),
            ProfileRow::new("2902746", 12)
                .with_position("2020-01-01 00:00:00", 15.0, 88.0)
                .with_column("temperature", vec![28.0, f64::NAN]),
            ProfileRow::new("2902746", 3).with_position("2019-06-01 00:00:00", 15.1, 88.2),
        ];

        let tree = group_rows(&rows, &grouped());

        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["bay_of_bengal", "arabian_sea", "empty"]);
        let bob = tree.get("bay_of_bengal").unwrap().get("2902746").unwrap();
        assert_eq!(bob.keys().collect::<Vec<_>>(), vec!["12", "3"]);
        assert_eq!(bob.get("12").unwrap()["temperature"], json!([28.0, null]));
        assert!(tree.get("empty").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_floats_are_dropped() {
        let rows = vec![ProfileRow::new("9999999", 1)];
        let tree = group_rows(&rows, &grouped());

        assert!(tree.values().all(|floats| floats.is_empty()));
    }
}
