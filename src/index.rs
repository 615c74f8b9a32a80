//! In-memory mapping from fingerprint to the ordered list of entries sharing it.

use std::collections::HashMap;

use crate::types::{Chain, Entry, SortOrder};

/// `fingerprint -> Chain` plus an auxiliary `size -> entries` index.
///
/// Keys are unique; chains are nonempty; insertion order within a chain is traversal order
/// (depth-first per root, roots in command-line order) and multiplicity is preserved — a file
/// appearing twice under one root produces two entries in the same chain.
#[derive(Default)]
pub struct EntryIndex {
    chains: HashMap<u64, Chain>,
    /// Informational only today; reserved for a future full-content confirmation pass.
    size_index: HashMap<u64, Vec<Entry>>,
}

impl EntryIndex {
    pub fn new() -> Self {
        EntryIndex::default()
    }

    /// Append `entry` to the chain at `entry.fingerprint`, creating it if absent.
    ///
    /// Callers must never insert an entry whose fingerprint is
    /// [`crate::hash::OPEN_FAILED`] — that sentinel means "skip, don't add" and is filtered
    /// out before this is called.
    pub fn insert(&mut self, entry: Entry) {
        self.size_index.entry(entry.size).or_default().push(entry.clone());
        self.chains.entry(entry.fingerprint).or_default().push(entry);
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn chain(&self, fingerprint: u64) -> Option<&Chain> {
        self.chains.get(&fingerprint)
    }

    /// Yields `(fingerprint, chain)` pairs in unspecified order.
    pub fn iterate(&self) -> impl Iterator<Item = (&u64, &Chain)> {
        self.chains.iter()
    }

    pub fn size_chain(&self, size: u64) -> Option<&Vec<Entry>> {
        self.size_index.get(&size)
    }

    /// Fingerprint keys ordered by the size of each chain's first entry.
    ///
    /// A presentation aid, not correctness-critical: the sort is stable but ties are
    /// otherwise unbroken, and the key is always `chain[0].size`, the first entry inserted,
    /// not the largest or smallest in the chain.
    pub fn sorted_iterate(&self, order: SortOrder) -> Vec<u64> {
        let mut keys: Vec<u64> = self.chains.keys().copied().collect();
        keys.sort_by_key(|k| self.chains[k][0].size);
        if order == SortOrder::SizeDesc {
            keys.reverse();
        }
        keys
    }
}
