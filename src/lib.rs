//! foldprint: find duplicate and divergent files/directories across one or more roots via
//! sampled content fingerprints.

pub mod engine;
pub mod hash;
pub mod index;
pub mod report;
pub mod types;
pub mod utils;
pub mod walk;

pub use index::EntryIndex;
pub use types::{Chain, Config, Entry, PrintColumns, SortOrder, Stats};
