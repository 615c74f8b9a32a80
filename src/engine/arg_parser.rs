//! Command-line surface: a `clap`-derived [`Cli`] plus [`Cli::into_config`], which turns it
//! into the [`crate::types::Config`] the rest of the crate actually runs on.

use clap::Parser;
use std::path::PathBuf;

use crate::types::{Config, PrintColumns, SortOrder};

/// Find duplicate and divergent files/directories across one or more roots via sampled
/// content fingerprints.
#[derive(Clone, Parser)]
#[command(name = "foldprint")]
#[command(about = "Find duplicate and missing files/directories across one or more roots.")]
pub struct Cli {
    /// Paths to scan: files are fingerprinted and printed immediately, directories are
    /// indexed and reported on. At least one is required.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Block size in bytes, used by both sampled and full hashing.
    #[arg(long = "block-size", short = 'b', default_value_t = 8192)]
    pub block_size: u64,

    /// Directory-fingerprint mode: fold child fingerprints into one fingerprint per directory
    /// instead of indexing files individually.
    #[arg(long = "dir-mode", short = 'd')]
    pub dir_mode: bool,

    /// Reverse mode: report entries that are not uniformly present across all roots, instead
    /// of duplicates.
    #[arg(long = "reverse", short = 'r')]
    pub reverse: bool,

    /// Reverse-mode variant: only report chains longer than the number of roots (internal
    /// duplication within otherwise-complete coverage).
    #[arg(long = "print-duplicates-in-reverse", visible_alias = "pd")]
    pub print_duplicates_in_reverse: bool,

    /// Full-read hashing instead of sampled (start/middle/end windows).
    #[arg(long = "full-read", visible_alias = "fr")]
    pub full_read: bool,

    /// Regex filter on filenames; only matching files are indexed.
    #[arg(long = "name-filter", visible_alias = "pat")]
    pub name_filter: Option<String>,

    /// Regex matching directory basenames to not descend into.
    #[arg(long = "descend-stop", visible_alias = "dd")]
    pub descend_stop: Option<String>,

    /// Print each chain's member entries under its header line, not just the header.
    #[arg(long = "print-entries", short = 'p')]
    pub print_entries: bool,

    /// Print a summary line after the report.
    #[arg(long = "print-summary", visible_alias = "ps")]
    pub print_summary: bool,

    /// Show the fingerprint column.
    #[arg(long = "col-fingerprint", short = 'F')]
    pub col_fingerprint: bool,

    /// Show the decimal size column.
    #[arg(long = "col-size", short = 'S')]
    pub col_size: bool,

    /// Show the human-readable size column.
    #[arg(long = "col-human-size", short = 'H')]
    pub col_human_size: bool,

    /// Show the number-of-distinct-roots column.
    #[arg(long = "col-num-roots", short = 'N')]
    pub col_num_roots: bool,

    /// Show the chain-length column.
    #[arg(long = "col-chain-length", short = 'L')]
    pub col_chain_length: bool,

    /// Sort chains by first-entry size, descending.
    #[arg(long = "sort-size", short = 's')]
    pub sort_size: bool,

    /// Reverse the size sort to ascending. Has no effect unless `--sort-size` is also given.
    #[arg(long = "sort-ascending", visible_alias = "rs")]
    pub sort_ascending: bool,

    /// File size threshold in bytes; entries must exceed this to be indexed.
    #[arg(long = "file-threshold", visible_alias = "ft", default_value_t = 0)]
    pub file_size_threshold: i64,

    /// Directory size threshold in bytes; directories must exceed this to be indexed.
    /// Negative values (the default) admit zero-size directories.
    #[arg(long = "dir-threshold", visible_alias = "dt", default_value_t = -1)]
    pub dir_size_threshold: i64,

    /// Limit printing to entries at depth <= N.
    #[arg(long = "prune", default_value_t = 999)]
    pub prune: usize,

    /// Shorthand for `--prune 0`.
    #[arg(long = "p0", conflicts_with = "prune")]
    pub p0: bool,

    /// Shorthand for `--prune 1`.
    #[arg(long = "p1", conflicts_with = "prune")]
    pub p1: bool,

    /// Fingerprint-lookup target (hex or decimal); bypasses duplicate/reverse classification.
    #[arg(long = "fingerprint", visible_alias = "fp")]
    pub fingerprint: Option<String>,

    /// Fail on the first permission error instead of logging and skipping it.
    #[arg(long)]
    pub strict: bool,

    /// Disable ANSI color in report output.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Verbose logging.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Resolve this parsed CLI into a [`Config`]. Fallible only on a malformed
    /// `--name-filter`/`--descend-stop`/`--fingerprint` value.
    pub fn into_config(self) -> anyhow::Result<Config> {
        use anyhow::Context;

        let name_filter = self
            .name_filter
            .as_deref()
            .map(regex::Regex::new)
            .transpose()
            .context("invalid --name-filter regex")?;
        let descend_stop = self
            .descend_stop
            .as_deref()
            .map(regex::Regex::new)
            .transpose()
            .context("invalid --descend-stop regex")?;
        let target_fingerprint = self
            .fingerprint
            .as_deref()
            .map(parse_fingerprint)
            .transpose()
            .context("invalid --fingerprint value")?;

        let prune_depth = if self.p0 {
            0
        } else if self.p1 {
            1
        } else {
            self.prune
        };

        let sort = if self.sort_size {
            Some(if self.sort_ascending { SortOrder::SizeAsc } else { SortOrder::SizeDesc })
        } else {
            None
        };

        let print_columns = PrintColumns {
            fingerprint: self.col_fingerprint,
            size: self.col_size,
            human_size: self.col_human_size,
            num_roots: self.col_num_roots,
            chain_length: self.col_chain_length,
        };

        Ok(Config {
            block_size: self.block_size,
            sampling_mode: if self.full_read {
                crate::hash::file_hash::SamplingMode::Full
            } else {
                crate::hash::file_hash::SamplingMode::Sampled
            },
            dir_mode: self.dir_mode,
            reverse: self.reverse,
            print_duplicates_in_reverse: self.print_duplicates_in_reverse,
            file_size_threshold: self.file_size_threshold,
            dir_size_threshold: self.dir_size_threshold,
            name_filter,
            descend_stop,
            ignore_list: crate::types::default_ignore_list(),
            sort,
            prune_depth,
            print_columns,
            print_entries: self.print_entries,
            summary: self.print_summary,
            target_fingerprint,
            strict: self.strict,
            color: !self.no_color,
        })
    }
}

fn parse_fingerprint(s: &str) -> anyhow::Result<u64> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u64::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fingerprint_accepts_hex_and_decimal() {
        assert_eq!(parse_fingerprint("0xFF").unwrap(), 255);
        assert_eq!(parse_fingerprint("255").unwrap(), 255);
    }

    #[test]
    fn p0_overrides_prune_default() {
        let cli = Cli::parse_from(["foldprint", "--p0", "."]);
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.prune_depth, 0);
    }

    #[test]
    fn sort_ascending_without_sort_size_has_no_effect() {
        let cli = Cli::parse_from(["foldprint", "--sort-ascending", "."]);
        let cfg = cli.into_config().unwrap();
        assert_eq!(cfg.sort, None);
    }

    #[test]
    fn no_color_flips_color_default() {
        let cli = Cli::parse_from(["foldprint", "--no-color", "."]);
        let cfg = cli.into_config().unwrap();
        assert!(!cfg.color);
    }
}
