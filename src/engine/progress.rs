//! Best-effort progress probe, fired on Ctrl-C rather than on a timer.
//!
//! This is informational only — nothing here cancels the scan. It exists so a user staring
//! at an apparently-hung run against a slow mount can ask "where are you" without killing the
//! process. `ctrlc` is wired for the platform-universal Ctrl-C case; repurposing one signal
//! dependency for both "please stop" (absent here — there is nothing to stop) and "please
//! report" keeps the dependency list aligned with what the reference tool already pulls in
//! for interrupt handling.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct ProgressState {
    phase: &'static str,
    path: PathBuf,
}

/// Installed once per run; cloning shares the same underlying state.
#[derive(Clone)]
pub struct ProgressHandle {
    state: Arc<Mutex<ProgressState>>,
}

impl ProgressHandle {
    fn new() -> Self {
        ProgressHandle {
            state: Arc::new(Mutex::new(ProgressState::default())),
        }
    }

    /// Record the path/phase currently being visited. Called from the walker's hot path, so
    /// this must stay cheap — a `try_lock` that silently drops an update under contention
    /// would be fine too, but contention here is never real (single-threaded scan).
    pub fn update(&self, phase: &'static str, path: &std::path::Path) {
        if let Ok(mut s) = self.state.lock() {
            s.phase = phase;
            s.path = path.to_path_buf();
        }
    }

    fn snapshot(&self) -> Option<(&'static str, PathBuf)> {
        self.state.lock().ok().map(|s| (s.phase, s.path.clone()))
    }
}

/// Install a Ctrl-C handler that prints the current phase/path and keeps running. Returns the
/// handle the Driver threads through the scan, or an error if a handler is already installed
/// (ctrlc only allows one per process) — the Driver logs and continues without a handler
/// rather than treating this as fatal.
pub fn install(color: bool) -> ProgressHandle {
    let handle = ProgressHandle::new();
    let reporter = handle.clone();
    let install_result = ctrlc::set_handler(move || {
        if let Some((phase, path)) = reporter.snapshot() {
            let line = format!("[{phase}] {}", path.display());
            if color {
                eprintln!("{}", colored::Colorize::yellow(line.as_str()));
            } else {
                eprintln!("{line}");
            }
        } else {
            eprintln!("(no progress yet)");
        }
    });
    if let Err(e) = install_result {
        log::debug!("progress signal handler not installed: {e}");
    }
    handle
}
