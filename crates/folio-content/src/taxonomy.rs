//! Tag extraction and tag-based item lookups.

use std::collections::BTreeSet;

use serde_yaml::Value;

use crate::loader::Item;
use crate::text::slugify;

/// Item field holding the list of tags used for filtering.
pub const TAGS_FIELD: &str = "tags_filter";

/// Sorted, de-duplicated tags of all items.
pub fn extract_tags(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Items whose `field` has a value that slugifies to `key`.
///
/// The field may hold a single string or a sequence of strings. Matching is
/// case-insensitive.
pub fn taxonomy_filter<'a>(items: &'a [Item], field: &str, key: &str) -> Vec<&'a Item> {
    let key = key.to_lowercase();
    let matches = |value: &str| slugify(value) == key;

    items
        .iter()
        .filter(|item| match item.get(field) {
            Some(Value::Sequence(values)) => {
                values.iter().filter_map(Value::as_str).any(matches)
            }
            Some(Value::String(value)) => matches(value.as_str()),
            _ => false,
        })
        .collect()
}

/// Up to `limit` other items sharing tags with `current`.
///
/// Items sharing more tags rank first; ties keep content order.
pub fn similar_items<'a>(current: &Item, all: &'a [Item], limit: usize) -> Vec<&'a Item> {
    let tags: BTreeSet<&str> = current.tags().into_iter().collect();
    if tags.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<(usize, &Item)> = all
        .iter()
        .filter(|item| item.slug != current.slug)
        .map(|item| {
            let shared = item.tags().iter().filter(|t| tags.contains(*t)).count();
            (shared, item)
        })
        .filter(|(shared, _)| *shared > 0)
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked.into_iter().take(limit).map(|(_, item)| item).collect()
}
