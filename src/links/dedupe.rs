use std::hash::Hash;

use itertools::Itertools;

/// First-seen-wins dedup, preserving input order. Idempotent by construction.
pub fn dedupe_by_key<T, K, F>(records: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash + Clone,
    F: FnMut(&T) -> K,
{
    records.into_iter().unique_by(key).collect()
}

// ── Tests ──
