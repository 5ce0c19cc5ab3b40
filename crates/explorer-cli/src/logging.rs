//! Tracing setup.
//!
//! Plain subcommands log to stderr. The TUI owns the terminal, so it logs to
//! `explorer.log` under the data directory instead.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "explorer=info";

fn env_filter() -> EnvFilter {
    match std::env::var("RUST_LOG") {
        Ok(val) => EnvFilter::new(val),
        Err(_) => EnvFilter::new(DEFAULT_FILTER),
    }
}

/// Log to stderr, for one-shot commands.
pub fn init_stderr() {
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(layer)
        .try_init();
}

/// Log to `<dir>/explorer.log`, for the TUI. Falls back to no logging if the
/// file cannot be opened.
pub fn init_file(dir: Option<&Path>) {
    let Some(dir) = dir else {
        return;
    };
    if let Err(e) = fs::create_dir_all(dir) {
        eprintln!("warning: could not create log directory {}: {e}", dir.display());
        return;
    }
    let path = dir.join("explorer.log");
    let file = match fs::OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: could not open {}: {e}", path.display());
            return;
        }
    };

    // File log: plain formatting, no ANSI/color codes
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter())
        .with(layer)
        .try_init();
}
