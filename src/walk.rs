//! Depth-first recursive traversal of a single root, with ignore-list and
//! prune-regex filtering, plus the directory fold that combines child
//! fingerprints into a directory fingerprint.
//!
//! Explicitly recursive (a plain function taking `depth` as a parameter), not a
//! nested closure capturing a mutable outer counter — the accumulator (`Stats`,
//! `EntryIndex`, and an optional progress probe) is threaded through as an
//! explicit `&mut` parameter instead of living in captured state.

use std::fs;
use std::path::Path;

use crate::engine::progress::ProgressHandle;
use crate::hash::file_hash::{self, SamplingMode};
use crate::hash::{self, Primitive};
use crate::index::EntryIndex;
use crate::types::{Config, Entry, Stats};

/// Shared, mutable scan state threaded through every recursive call. Owned by the Driver;
/// read-only once the scan completes.
pub struct ScanContext<'a> {
    pub config: &'a Config,
    pub stats: Stats,
    pub index: EntryIndex,
    pub progress: Option<ProgressHandle>,
}

impl<'a> ScanContext<'a> {
    pub fn new(config: &'a Config, progress: Option<ProgressHandle>) -> Self {
        ScanContext {
            config,
            stats: Stats::default(),
            index: EntryIndex::new(),
            progress,
        }
    }

    fn note_path(&self, phase: &'static str, path: &Path) {
        if let Some(p) = &self.progress {
            p.update(phase, path);
        }
    }
}

fn is_ignored(name: &str, cfg: &Config) -> bool {
    cfg.ignore_list.contains(name)
}

fn matches_descend_stop(name: &str, cfg: &Config) -> bool {
    cfg.descend_stop.as_ref().is_some_and(|re| re.is_match(name))
}

fn matches_name_filter(name: &str, cfg: &Config) -> bool {
    cfg.name_filter.as_ref().is_none_or(|re| re.is_match(name))
}

/// `true` when `size` clears the configured threshold. Strict `>`: a file/dir whose size
/// equals the threshold is excluded. The threshold is signed so `-1` can force zero-length
/// entries back in (no real size is negative).
fn passes_threshold(size: u64, threshold: i64) -> bool {
    threshold < 0 || size as i64 > threshold
}

fn fingerprint_for(path: &Path, size: u64, cfg: &Config) -> std::io::Result<u64> {
    let mode = match cfg.sampling_mode {
        SamplingMode::Sampled => SamplingMode::Sampled,
        SamplingMode::Full => SamplingMode::Full,
    };
    file_hash::fingerprint_file(path, size, cfg.block_size, mode)
}

/// Read a directory's entries in enumeration order (unsorted — an intentional design trade,
/// see spec §4.3: it admits nondeterminism across filesystems that enumerate differently, but
/// matches a filesystem-native scan rather than imposing a synthetic order).
fn read_dir_entries(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    fs::read_dir(dir)?.collect()
}

/// File-mode Walker: recurse under `dir`, emitting every qualifying regular file as an
/// [`Entry`] into `ctx.index`. Directories are never indexed in this mode; they are only
/// recursed into.
///
/// A mid-stream read error on an already-opened file is fatal (spec §5/§7: the file cannot be
/// meaningfully fingerprinted and continuing risks silent misclassification) and aborts the
/// whole scan by propagating as `Err`, unlike a transient `readdir`/`stat` failure on a
/// descendant, which is logged and skipped.
pub fn walk_files(dir: &Path, root_id: usize, depth: usize, ctx: &mut ScanContext) -> std::io::Result<()> {
    ctx.note_path("scan", dir);
    let entries = match read_dir_entries(dir) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("cannot read directory {}: {}", dir.display(), e);
            return Ok(());
        }
    };

    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = entry.path();

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        if is_ignored(&name, ctx.config) {
            continue;
        }

        if file_type.is_dir() {
            ctx.stats.scanned_dirs += 1;
            if matches_descend_stop(&name, ctx.config) {
                continue;
            }
            walk_files(&path, root_id, depth + 1, ctx)?;
        } else if file_type.is_file() {
            ctx.stats.scanned_files += 1;
            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    log::warn!("cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };
            if !passes_threshold(size, ctx.config.file_size_threshold) {
                continue;
            }
            if !matches_name_filter(&name, ctx.config) {
                continue;
            }
            ctx.stats.matched_files += 1;
            match fingerprint_for(&path, size, ctx.config) {
                Ok(hash::file_hash::OPEN_FAILED) => {
                    log::warn!("cannot open {}", path.display());
                }
                Ok(fp) => {
                    ctx.index.insert(Entry {
                        root_id,
                        depth: depth + 1,
                        path: path.to_string_lossy().into_owned(),
                        size,
                        fingerprint: fp,
                    });
                }
                Err(e) => {
                    log::error!("fatal read error hashing {}: {}", path.display(), e);
                    return Err(e);
                }
            }
        }
        // symlink / device / FIFO / socket: skip silently.
    }
    Ok(())
}

/// Result of folding one directory: its fingerprint and the aggregate size of its
/// qualifying descendants. `None` means the directory itself did not clear
/// `dir_size_threshold` and contributes nothing to its parent's fold.
pub struct FoldResult {
    pub fingerprint: u64,
    pub aggregate_size: u64,
}

/// Directory-mode Walker + DirectoryFolder: recurse under `dir`, folding child
/// fingerprints into a fresh [`Primitive`] per level (in enumeration order) and
/// indexing every directory (including `dir` itself) that clears `dir_size_threshold`.
/// Files are never indexed directly in this mode — only via their parent directory's fold.
///
/// A mid-stream read error on an already-opened file is fatal (spec §5/§7) and aborts the
/// whole scan by propagating as `Err`, same as [`walk_files`].
pub fn walk_dir_fold(dir: &Path, root_id: usize, depth: usize, ctx: &mut ScanContext) -> std::io::Result<FoldResult> {
    ctx.stats.scanned_dirs += 1;
    ctx.note_path("scan", dir);

    let mut folder = Primitive::new(hash::DEFAULT_SEED);
    let mut aggregate: u64 = 0;

    let entries = match read_dir_entries(dir) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("cannot read directory {}: {}", dir.display(), e);
            return Ok(FoldResult {
                fingerprint: folder.sum(),
                aggregate_size: 0,
            });
        }
    };

    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        let path = entry.path();

        if is_ignored(&name, ctx.config) {
            continue;
        }

        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("cannot stat {}: {}", path.display(), e);
                continue;
            }
        };

        if file_type.is_dir() {
            if matches_descend_stop(&name, ctx.config) {
                continue;
            }
            let child = walk_dir_fold(&path, root_id, depth + 1, ctx)?;
            if !passes_threshold(child.aggregate_size, ctx.config.dir_size_threshold) {
                continue;
            }
            ctx.stats.matched_dirs += 1;
            folder.write_u64(child.fingerprint);
            aggregate += child.aggregate_size;
            ctx.index.insert(Entry {
                root_id,
                depth: depth + 1,
                path: path.to_string_lossy().into_owned(),
                size: child.aggregate_size,
                fingerprint: child.fingerprint,
            });
        } else if file_type.is_file() {
            ctx.stats.scanned_files += 1;
            let size = match entry.metadata() {
                Ok(m) => m.len(),
                Err(e) => {
                    log::warn!("cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };
            if !passes_threshold(size, ctx.config.file_size_threshold) {
                continue;
            }
            if !matches_name_filter(&name, ctx.config) {
                continue;
            }
            ctx.stats.matched_files += 1;
            match fingerprint_for(&path, size, ctx.config) {
                Ok(hash::file_hash::OPEN_FAILED) => {
                    log::warn!("cannot open {}", path.display());
                }
                Ok(fp) => {
                    folder.write_u64(fp);
                    aggregate += size;
                    // Directory mode still indexes the file itself by its own fingerprint —
                    // not just folded into the parent — so file-level duplicates (and
                    // rename-invariance at file granularity) are found the same way they are
                    // in file mode, alongside the directory-level folds.
                    ctx.index.insert(Entry {
                        root_id,
                        depth: depth + 1,
                        path: path.to_string_lossy().into_owned(),
                        size,
                        fingerprint: fp,
                    });
                }
                Err(e) => {
                    log::error!("fatal read error hashing {}: {}", path.display(), e);
                    return Err(e);
                }
            }
        }
        // symlink / device / FIFO / socket: skip silently.
    }

    Ok(FoldResult {
        fingerprint: folder.sum(),
        aggregate_size: aggregate,
    })
}

/// Drive directory-mode folding for an explicit root argument: folds and indexes `root`
/// itself (at depth 0) the same way any descendant directory is indexed, subject only to
/// `dir_size_threshold` — explicit roots are never checked against `ignore_list` or
/// `descend_stop` (those filter descendants, not user-specified roots).
pub fn walk_root_dir(root: &Path, root_id: usize, ctx: &mut ScanContext) -> std::io::Result<()> {
    let result = walk_dir_fold(root, root_id, 0, ctx)?;
    if passes_threshold(result.aggregate_size, ctx.config.dir_size_threshold) {
        ctx.stats.matched_dirs += 1;
        ctx.index.insert(Entry {
            root_id,
            depth: 0,
            path: root.to_string_lossy().into_owned(),
            size: result.aggregate_size,
            fingerprint: result.fingerprint,
        });
    }
    Ok(())
}

/// Drive file-mode walking for an explicit root argument.
pub fn walk_root_files(root: &Path, root_id: usize, ctx: &mut ScanContext) -> std::io::Result<()> {
    walk_files(root, root_id, 0, ctx)
}
