use std::collections::HashSet;

/// Intersect filter results.
///
/// The output follows the order of the first list with duplicates removed,
/// so the result is deterministic regardless of how the inputs were produced.
/// No lists means no matches.
pub fn combine_filters(lists: &[Vec<String>]) -> Vec<String> {
    let Some((first, rest)) = lists.split_first() else {
        return Vec::new();
    };

    let others: Vec<HashSet<&str>> = rest
        .iter()
        .map(|list| list.iter().map(String::as_str).collect())
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut combined = Vec::new();
    for id in first {
        if others.iter().all(|set| set.contains(id.as_str())) && seen.insert(id.as_str()) {
            combined.push(id.clone());
        }
    }
    combined
}
