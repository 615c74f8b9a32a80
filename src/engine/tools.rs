//! Small path utilities used by the Driver to partition CLI arguments.

use anyhow::{Context, Result};
use std::path::Path;

/// What an explicit CLI path argument turned out to be on disk.
pub enum ArgKind {
    File { size: u64 },
    Dir,
}

/// `stat` a path argument and classify it. Anything that is neither a regular file nor a
/// directory (symlink loop, device, socket, missing path) is an error — file/dir-mode
/// partitioning has nowhere to put it.
pub fn classify_arg(path: &Path) -> Result<ArgKind> {
    let meta = std::fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.is_dir() {
        Ok(ArgKind::Dir)
    } else if meta.is_file() {
        Ok(ArgKind::File { size: meta.len() })
    } else {
        anyhow::bail!("{} is neither a regular file nor a directory", path.display())
    }
}
