//! Data model shared by the walker, index, and reporter.

use regex::Regex;
use std::collections::HashSet;

/// One record per indexed file or directory.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Which command-line root this entry descends from (0-based by input order).
    pub root_id: usize,
    /// 0 at the walked root itself, incrementing per descent level.
    pub depth: usize,
    /// Stored verbatim, never normalized.
    pub path: String,
    /// Byte count of the file, or aggregate byte count of a directory's qualifying subtree.
    pub size: u64,
    /// 64-bit content fingerprint; see [`crate::hash`].
    pub fingerprint: u64,
}

/// Ordered sequence of [`Entry`] values sharing a fingerprint. Order is insertion
/// (traversal) order; multiplicity is preserved on purpose.
pub type Chain = Vec<Entry>;

/// Sort order for [`crate::index::EntryIndex::sorted_iterate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    SizeDesc,
    SizeAsc,
}

/// Sampling strategy, mirrors [`crate::hash::SamplingMode`] at the config layer.
pub use crate::hash::SamplingMode;

/// Scalar run configuration, frozen before the scan starts.
#[derive(Clone)]
pub struct Config {
    pub block_size: u64,
    pub sampling_mode: SamplingMode,
    pub dir_mode: bool,
    pub reverse: bool,
    /// Reverse-mode variant: only report chains longer than `num_roots` (`-pd`).
    pub print_duplicates_in_reverse: bool,
    /// Entries with `size <= file_size_threshold` are excluded. Signed so `-1` can force
    /// zero-length files back into the index (no real file size is negative).
    pub file_size_threshold: i64,
    pub dir_size_threshold: i64,
    pub name_filter: Option<Regex>,
    pub descend_stop: Option<Regex>,
    pub ignore_list: HashSet<String>,
    pub sort: Option<SortOrder>,
    pub prune_depth: usize,
    pub print_columns: PrintColumns,
    pub print_entries: bool,
    pub summary: bool,
    pub target_fingerprint: Option<u64>,
    pub strict: bool,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            block_size: 8192,
            sampling_mode: SamplingMode::Sampled,
            dir_mode: false,
            reverse: false,
            print_duplicates_in_reverse: false,
            file_size_threshold: 0,
            dir_size_threshold: -1,
            name_filter: None,
            descend_stop: None,
            ignore_list: default_ignore_list(),
            sort: None,
            prune_depth: 999,
            print_columns: PrintColumns::default(),
            print_entries: false,
            summary: false,
            target_fingerprint: None,
            strict: false,
            color: true,
        }
    }
}

/// Basenames skipped unconditionally, both as files and as directories (never descended).
pub fn default_ignore_list() -> HashSet<String> {
    [".DS_Store", ".Spotlight-V100", ".fseventsd", ".git"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Which columns [`crate::report`] prints, in the fixed order `F S H N L`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrintColumns {
    pub fingerprint: bool,
    pub size: bool,
    pub human_size: bool,
    pub num_roots: bool,
    pub chain_length: bool,
}

/// Process-wide counters, mutated only by the (single) scan call-chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stats {
    pub scanned_files: u64,
    pub scanned_dirs: u64,
    pub matched_files: u64,
    pub matched_dirs: u64,
}
