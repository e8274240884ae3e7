use std::hash::Hash;

use indexmap::IndexMap;

/// Hash-based inner join of two keyed tables.
/// Emits one row per key present in both sides, in the left table's
/// insertion order.
///
/// # Arguments
/// * `left` - left table
/// * `right` - right table
///
/// # Returns
/// * `Vec<(&K, &L, &R)>` - joined rows
#[inline]
pub fn inner_join<'a, K, L, R>(
    left: &'a IndexMap<K, L>,
    right: &'a IndexMap<K, R>,
) -> Vec<(&'a K, &'a L, &'a R)>
where
    K: Eq + Hash,
{
    left.iter()
        .filter_map(|(key, l)| right.get(key).map(|r| (key, l, r)))
        .collect()
}

/// Hash-based full outer join of two keyed tables.
/// Emits one row per key present in either side: left keys first in the
/// left table's insertion order, then right-only keys in the right table's
/// insertion order. Deterministic for identical inputs.
#[inline]
pub fn full_join<'a, K, L, R>(
    left: &'a IndexMap<K, L>,
    right: &'a IndexMap<K, R>,
) -> Vec<(&'a K, Option<&'a L>, Option<&'a R>)>
where
    K: Eq + Hash,
{
    let mut rows: Vec<(&K, Option<&L>, Option<&R>)> = left
        .iter()
        .map(|(key, l)| (key, Some(l), right.get(key)))
        .collect();
    for (key, r) in right.iter() {
        if !left.contains_key(key) {
            rows.push((key, None, Some(r)));
        }
    }
    rows
}
