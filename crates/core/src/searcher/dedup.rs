//! Deduplication and ranking of merged source results.

use std::collections::HashMap;

use super::DownloadCandidate;

/// Deduplicate candidates by identity hash (case-insensitive).
///
/// When several candidates share a hash the last one seen wins, but it takes
/// the slot of the first occurrence so the merged order stays stable.
pub fn deduplicate(candidates: Vec<DownloadCandidate>) -> Vec<DownloadCandidate> {
    let mut slot_by_hash: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<DownloadCandidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let key = candidate.identity_hash.to_ascii_lowercase();
        match slot_by_hash.get(&key) {
            Some(&slot) => unique[slot] = candidate,
            None => {
                slot_by_hash.insert(key, unique.len());
                unique.push(candidate);
            }
        }
    }

    unique
}

/// Full ranking pass: dedup, drop dead swarms, sort by seeders descending.
///
/// The sort is stable, so equal seeder counts keep their merged order.
pub fn rank_candidates(candidates: Vec<DownloadCandidate>) -> Vec<DownloadCandidate> {
    let mut live: Vec<_> = deduplicate(candidates)
        .into_iter()
        .filter(|c| c.seeders > 0)
        .collect();
    live.sort_by(|a, b| b.seeders.cmp(&a.seeders));
    live
}
