//! foldprint CLI: find duplicate and missing files/directories across one or more roots.

use anyhow::Result;
use clap::Parser;
use foldprint::engine::{Cli, handle_run};

fn main() -> Result<()> {
    let cli = Cli::parse();
    handle_run(cli)
}
