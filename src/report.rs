//! Classifies chains in an [`EntryIndex`] and renders the configured output lines.
//!
//! Column order is fixed (`F S H N L`) regardless of the order flags were given on the
//! command line — deselected columns are omitted entirely, never replaced with a placeholder.

use colored::Colorize;
use std::io::Write;

use crate::index::EntryIndex;
use crate::types::{Chain, Config, Entry, PrintColumns, Stats};

/// Human-readable byte size with a unit suffix (`KiB`/`MiB`/...), binary (1024-based) units.
/// Hand-rolled: no crate in this project's dependency stack provides this, and it is a small
/// enough routine that pulling one in for a single formatting helper isn't warranted.
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} {}", UNITS[0])
    } else {
        format!("{value:.2} {}", UNITS[unit])
    }
}

fn root_mask(chain: &Chain) -> u64 {
    chain.iter().fold(0u64, |acc, e| acc | (1u64 << e.root_id))
}

fn full_mask(num_roots: usize) -> u64 {
    if num_roots >= 64 {
        u64::MAX
    } else {
        (1u64 << num_roots) - 1
    }
}

fn root_counts(chain: &Chain, num_roots: usize) -> Vec<usize> {
    let mut counts = vec![0usize; num_roots];
    for e in chain {
        if e.root_id < num_roots {
            counts[e.root_id] += 1;
        }
    }
    counts
}

fn all_ones(chain: &Chain, num_roots: usize) -> bool {
    root_counts(chain, num_roots).iter().all(|&c| c == 1)
}

/// `true` when `chain` should be printed in duplicate mode.
fn is_duplicate(chain: &Chain) -> bool {
    chain.len() > 1
}

/// `true` when `chain` should be printed in reverse mode, per spec: with `pd` off, report
/// chains of length `<= num_roots` whose coverage is incomplete or asymmetric; with `pd` on,
/// report only chains longer than `num_roots` (internal duplication within full coverage).
fn is_reverse_reportable(chain: &Chain, num_roots: usize, print_duplicates_in_reverse: bool) -> bool {
    if print_duplicates_in_reverse {
        return chain.len() > num_roots;
    }
    if chain.len() > num_roots {
        return false;
    }
    let mask = root_mask(chain);
    let full = full_mask(num_roots);
    mask != full || !all_ones(chain, num_roots)
}

fn fmt_fingerprint(fp: u64) -> String {
    format!("{fp:016x}")
}

/// `header` is the entry whose columns (size/path/depth) lead the line — the first entry in
/// `chain` that clears `prune_depth`, which is not necessarily `chain[0]` itself. `chain` is
/// still consulted for the `L` column: chain length reflects total membership in the chain,
/// not how much of it survived pruning.
fn print_header_line<W: Write>(
    out: &mut W,
    cols: &PrintColumns,
    fp: u64,
    chain: &Chain,
    header: &Entry,
    num_roots: usize,
    color: bool,
) -> std::io::Result<()> {
    let mut parts = Vec::new();
    if cols.fingerprint {
        parts.push(fmt_fingerprint(fp));
    }
    if cols.size {
        parts.push(header.size.to_string());
    }
    if cols.human_size {
        parts.push(human_size(header.size));
    }
    if cols.num_roots {
        parts.push(num_roots.to_string());
    }
    if cols.chain_length {
        parts.push(chain.len().to_string());
    }
    let path_field = format!("\"{}\"", header.path);
    let path_field = if color { path_field.cyan().to_string() } else { path_field };
    parts.push(path_field);
    parts.push(header.depth.to_string());
    writeln!(out, "{}", parts.join(" "))
}

fn print_entry_line<W: Write>(out: &mut W, entry: &Entry) -> std::io::Result<()> {
    writeln!(out, "\t\"{}\" {}", entry.path, entry.depth)
}

/// Iterate `index`'s chains (in `sort` order, if any) and print the ones selected by `cfg`'s
/// mode. Returns `(printed_entries, total_bytes)` for the summary line.
pub fn report<W: Write>(out: &mut W, index: &EntryIndex, cfg: &Config, num_roots: usize) -> std::io::Result<(u64, u64)> {
    if let Some(target) = cfg.target_fingerprint {
        return report_lookup(out, index, cfg, target, num_roots);
    }
    let keys = match cfg.sort {
        Some(order) => index.sorted_iterate(order),
        None => index.iterate().map(|(k, _)| *k).collect(),
    };

    let mut printed: u64 = 0;
    let mut total_bytes: u64 = 0;

    for key in keys {
        let chain = index.chain(key).expect("sorted_iterate key must exist in index");
        let reportable = if cfg.reverse {
            is_reverse_reportable(chain, num_roots, cfg.print_duplicates_in_reverse)
        } else {
            is_duplicate(chain)
        };
        if !reportable {
            continue;
        }

        // Prune depth gates which entries print at all, including which one becomes the
        // header: skip first, then filter, so an out-of-prune `chain[0]` never becomes the
        // header and never shifts which later in-prune entries get dropped.
        let printable: Vec<&Entry> = chain.iter().filter(|e| e.depth <= cfg.prune_depth).collect();
        let Some((header, body)) = printable.split_first() else {
            continue;
        };

        print_header_line(out, &cfg.print_columns, key, chain, header, num_roots, cfg.color)?;
        if cfg.print_entries {
            for entry in body {
                print_entry_line(out, entry)?;
            }
        }

        printed += printable.len() as u64;
        total_bytes += header.size;
    }

    if cfg.summary {
        print_summary(out, cfg, printed, total_bytes)?;
    }

    Ok((printed, total_bytes))
}

fn report_lookup<W: Write>(out: &mut W, index: &EntryIndex, cfg: &Config, target: u64, num_roots: usize) -> std::io::Result<(u64, u64)> {
    match index.chain(target) {
        Some(chain) => {
            let header = &chain[0];
            print_header_line(out, &cfg.print_columns, target, chain, header, num_roots, cfg.color)?;
            for entry in chain.iter().skip(1) {
                print_entry_line(out, entry)?;
            }
            Ok((chain.len() as u64, header.size))
        }
        None => Ok((0, 0)),
    }
}

fn print_summary<W: Write>(out: &mut W, cfg: &Config, printed: u64, total_bytes: u64) -> std::io::Result<()> {
    let kind = if cfg.dir_mode { "dirs" } else { "files" };
    if cfg.reverse {
        writeln!(out, "# {printed} {kind} missing")?;
    } else {
        writeln!(out, "# {printed} {kind} duplicated, totaling {}", human_size(total_bytes))?;
    }
    Ok(())
}

pub fn print_stats_line<W: Write>(out: &mut W, stats: &Stats) -> std::io::Result<()> {
    writeln!(out, "# {} files, {} dirs scanned", stats.scanned_files, stats.scanned_dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(root_id: usize, path: &str, size: u64, fingerprint: u64) -> Entry {
        Entry {
            root_id,
            depth: 0,
            path: path.to_string(),
            size,
            fingerprint,
        }
    }

    #[test]
    fn human_size_formats_binary_units() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1024), "1.00 KiB");
        assert_eq!(human_size(1024 * 1024 * 3), "3.00 MiB");
    }

    #[test]
    fn full_coverage_chain_not_reverse_reportable() {
        let chain = vec![entry(0, "a", 10, 1), entry(1, "a", 10, 1), entry(2, "a", 10, 1)];
        assert!(!is_reverse_reportable(&chain, 3, false));
    }

    #[test]
    fn missing_in_one_root_is_reverse_reportable() {
        let chain = vec![entry(0, "b", 10, 1), entry(1, "b", 10, 1)];
        assert!(is_reverse_reportable(&chain, 3, false));
    }

    #[test]
    fn asymmetric_counts_are_reverse_reportable_even_with_full_mask() {
        // root 0 has two copies, root 1 has none, root 2 has one: mask covers 0 and 2 only.
        let chain = vec![entry(0, "c", 10, 1), entry(0, "c", 10, 1), entry(2, "c", 10, 1)];
        assert!(is_reverse_reportable(&chain, 3, false));
    }

    #[test]
    fn pd_flag_isolates_chains_longer_than_num_roots() {
        let short = vec![entry(0, "d", 10, 1), entry(1, "d", 10, 1)];
        let long = vec![entry(0, "d", 10, 1), entry(0, "d", 10, 1), entry(1, "d", 10, 1)];
        assert!(!is_reverse_reportable(&short, 2, true));
        assert!(is_reverse_reportable(&long, 2, true));
    }

    #[test]
    fn duplicate_mode_requires_chain_length_above_one() {
        let single = vec![entry(0, "e", 10, 1)];
        let pair = vec![entry(0, "e", 10, 1), entry(1, "e", 10, 1)];
        assert!(!is_duplicate(&single));
        assert!(is_duplicate(&pair));
    }

    fn entry_at_depth(root_id: usize, path: &str, depth: usize, size: u64, fingerprint: u64) -> Entry {
        Entry {
            root_id,
            depth,
            path: path.to_string(),
            size,
            fingerprint,
        }
    }

    fn report_string(index: &EntryIndex, cfg: &Config, num_roots: usize) -> String {
        let mut buf = Vec::new();
        report(&mut buf, index, cfg, num_roots).unwrap();
        String::from_utf8(buf).unwrap()
    }

    /// Pruning skips the header entry first, then filters the remainder — an out-of-prune
    /// `chain[0]` must neither become the header nor shift which later entries get dropped.
    #[test]
    fn prune_depth_skips_header_before_filtering_body() {
        let mut index = EntryIndex::new();
        index.insert(entry_at_depth(0, "deep", 5, 10, 1));
        index.insert(entry_at_depth(0, "shallow-a", 0, 10, 1));
        index.insert(entry_at_depth(0, "shallow-b", 0, 10, 1));

        let cfg = Config {
            prune_depth: 0,
            print_entries: true,
            color: false,
            ..Config::default()
        };
        let out = report_string(&index, &cfg, 1);
        assert!(!out.contains("deep"), "chain[0] is out of prune and must not appear: {out}");
        assert!(out.contains("shallow-a"), "first in-prune entry must become the header: {out}");
        assert!(out.contains("shallow-b"), "second in-prune entry must still print in the body: {out}");
    }

    /// If no entry in a chain clears `prune_depth`, nothing is printed for that chain at all.
    #[test]
    fn prune_depth_suppresses_chain_with_no_surviving_entries() {
        let mut index = EntryIndex::new();
        index.insert(entry_at_depth(0, "deep-a", 5, 10, 1));
        index.insert(entry_at_depth(0, "deep-b", 5, 10, 1));

        let cfg = Config {
            prune_depth: 0,
            print_entries: true,
            color: false,
            ..Config::default()
        };
        let out = report_string(&index, &cfg, 1);
        assert_eq!(out, "");
    }

    /// The `N` column prints the configured number of roots, not the count of distinct roots
    /// this particular chain happened to touch.
    #[test]
    fn num_roots_column_prints_configured_root_count_not_distinct_touched() {
        let mut index = EntryIndex::new();
        index.insert(entry_at_depth(0, "a", 0, 10, 1));
        index.insert(entry_at_depth(1, "b", 0, 10, 1));

        let cfg = Config {
            print_columns: PrintColumns {
                num_roots: true,
                ..PrintColumns::default()
            },
            color: false,
            ..Config::default()
        };
        let out = report_string(&index, &cfg, 5);
        assert!(out.starts_with("5 "), "N column must print num_roots (5), not roots touched (2): {out}");
    }
}
