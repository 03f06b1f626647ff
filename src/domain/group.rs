//! Generic "group by key, reduce, sort descending" primitive.
//!
//! Ranked categorical breakdowns appear in every engine (revenue by drug,
//! market share by manufacturer, mean revenue by channel, ...), so the
//! grouping/sorting logic lives here once instead of being re-derived per
//! feature.
//!
//! Ordering contract:
//! - entries are sorted descending by value
//! - ties keep the key that was encountered first in the input (the sort is
//!   stable and accumulation preserves first-encounter order)

use std::collections::{HashMap, HashSet};

use serde::Serialize;

/// A sorted mapping from categorical key to an aggregated value.
///
/// Serializes as an array of `[key, value]` pairs so the order survives
/// JSON encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GroupedAggregate {
    entries: Vec<(String, f64)>,
}

impl GroupedAggregate {
    /// Build from already-aggregated entries (sorts them here).
    fn from_accumulated(mut entries: Vec<(String, f64)>) -> Self {
        entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    /// The top-ranked key and its value, if any entries exist.
    pub fn top(&self) -> Option<(&str, f64)> {
        self.entries.first().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Sum of all aggregated values (conservation checks, share bases).
    pub fn value_total(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Apply `f` to every value, keeping keys and re-sorting descending.
    pub fn map_values(&self, f: impl Fn(f64) -> f64) -> GroupedAggregate {
        GroupedAggregate::from_accumulated(
            self.entries.iter().map(|(k, v)| (k.clone(), f(*v))).collect(),
        )
    }
}

/// Sum `value` per key, descending.
pub fn sum_by<'a, I>(items: I) -> GroupedAggregate
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<(String, f64)> = Vec::new();

    for (key, value) in items {
        match index.get(key) {
            Some(&i) => entries[i].1 += value,
            None => {
                index.insert(key.to_string(), entries.len());
                entries.push((key.to_string(), value));
            }
        }
    }

    GroupedAggregate::from_accumulated(entries)
}

/// Mean of `value` per key, descending.
pub fn mean_by<'a, I>(items: I) -> GroupedAggregate
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sums: Vec<(String, f64, usize)> = Vec::new();

    for (key, value) in items {
        match index.get(key) {
            Some(&i) => {
                sums[i].1 += value;
                sums[i].2 += 1;
            }
            None => {
                index.insert(key.to_string(), sums.len());
                sums.push((key.to_string(), value, 1));
            }
        }
    }

    GroupedAggregate::from_accumulated(
        sums.into_iter()
            .map(|(k, sum, n)| (k, sum / n as f64))
            .collect(),
    )
}

/// Distinct keys in first-encounter order.
pub fn distinct_keys<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::new();
    for key in items {
        if seen.insert(key) {
            keys.push(key.to_string());
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_by_sorts_descending() {
        let agg = sum_by(vec![("a", 1.0), ("b", 5.0), ("a", 2.0), ("c", 4.0)]);
        let entries = agg.entries();
        assert_eq!(entries[0], ("b".to_string(), 5.0));
        assert_eq!(entries[1], ("c".to_string(), 4.0));
        assert_eq!(entries[2], ("a".to_string(), 3.0));
    }

    #[test]
    fn sum_by_conserves_total() {
        let items = vec![("x", 10.0), ("y", 20.5), ("x", 0.5), ("z", 9.0)];
        let total: f64 = items.iter().map(|(_, v)| v).sum();
        let agg = sum_by(items.clone());
        assert!((agg.value_total() - total).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_encountered_key_first() {
        let agg = sum_by(vec![("late", 1.0), ("first", 3.0), ("second", 3.0)]);
        let entries = agg.entries();
        assert_eq!(entries[0].0, "first");
        assert_eq!(entries[1].0, "second");
        assert_eq!(entries[2].0, "late");
    }

    #[test]
    fn mean_by_averages_per_key() {
        let agg = mean_by(vec![("a", 2.0), ("a", 4.0), ("b", 10.0)]);
        assert_eq!(agg.top().unwrap(), ("b", 10.0));
        assert!((agg.get("a").unwrap() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn serializes_as_ordered_pairs() {
        let agg = sum_by(vec![("b", 1.0), ("a", 2.0)]);
        let value = serde_json::to_value(&agg).unwrap();
        assert_eq!(value, serde_json::json!([["a", 2.0], ["b", 1.0]]));
    }

    #[test]
    fn distinct_keys_preserves_encounter_order() {
        let keys = distinct_keys(vec!["north", "south", "north", "east"]);
        assert_eq!(keys, vec!["north", "south", "east"]);
    }
}
