//! Driver: parse config, partition arguments, scan, report.

use anyhow::Result;
use std::path::PathBuf;

use crate::engine::arg_parser::Cli;
use crate::engine::progress;
use crate::engine::tools::{ArgKind, classify_arg};
use crate::report;
use crate::utils::setup_logging;
use crate::walk::{ScanContext, walk_root_dir, walk_root_files};

/// Parse config, partition `cli.paths` into file args and dir args by `stat`, emit file args
/// immediately, scan dir args (assigning `root_id` by position among dir args), then dispatch
/// to [`report::report`] per spec.md §4.7.
pub fn handle_run(cli: Cli) -> Result<()> {
    setup_logging(cli.verbose);
    let color = !cli.no_color;
    let config = cli.clone().into_config()?;

    let mut dir_args: Vec<PathBuf> = Vec::new();
    let mut any_root_failed = false;
    for path in &cli.paths {
        match classify_arg(path) {
            Ok(ArgKind::File { size }) => {
                let fp = crate::hash::file_hash::fingerprint_file(path, size, config.block_size, config.sampling_mode)?;
                println!("{fp:016x} \"{}\"", path.display());
            }
            Ok(ArgKind::Dir) => dir_args.push(path.clone()),
            Err(e) => {
                if config.strict {
                    return Err(e);
                }
                any_root_failed = true;
                log::warn!("{e}");
            }
        }
    }

    if dir_args.is_empty() {
        // Zero directory roots is only a legitimate, zero-exit outcome when no root argument
        // was ever given in the first place (the caller only passed file args). If at least
        // one root was supplied but every one of them failed `classify_arg`, no roots remain
        // to scan and that is a Config error (spec §7).
        if any_root_failed {
            anyhow::bail!("no directory roots left to scan: every root argument failed to stat");
        }
        return Ok(());
    }

    let progress_handle = progress::install(color);
    let mut ctx = ScanContext::new(&config, Some(progress_handle));

    for (root_id, root) in dir_args.iter().enumerate() {
        if config.dir_mode {
            walk_root_dir(root, root_id, &mut ctx)?;
        } else {
            walk_root_files(root, root_id, &mut ctx)?;
        }
    }

    let num_roots = dir_args.len();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report::report(&mut out, &ctx.index, &config, num_roots)?;
    if config.summary {
        report::print_stats_line(&mut out, &ctx.stats)?;
    }

    Ok(())
}
