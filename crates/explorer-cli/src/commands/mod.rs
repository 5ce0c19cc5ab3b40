pub mod actions;
pub mod ops;
pub mod relative;
pub mod tree;

use std::path::Path;

use anyhow::{Context, Result};
use explorer::{Feedback, Locator};

/// Resolve a command-line argument: a `scheme://` URL as given, anything
/// else as a filesystem path relative to the current directory. Either way
/// the result has no `.`/`..` segments or trailing slash.
pub fn locate(raw: &str) -> Result<Locator> {
    if raw.contains("://") {
        let url = Locator::parse(raw).with_context(|| format!("invalid locator: {raw}"))?;
        return Ok(url.canonical());
    }
    let path = std::path::absolute(Path::new(raw))
        .with_context(|| format!("could not resolve path: {raw}"))?;
    let url =
        Locator::from_path(&path).with_context(|| format!("invalid path: {}", path.display()))?;
    Ok(url.canonical())
}

/// Print feedback: info to stdout, warnings and errors to stderr.
pub fn print_feedback(feedback: &Feedback) {
    match feedback {
        Feedback::Info(msg) => println!("{msg}"),
        Feedback::Warning(_) | Feedback::Error(_) => eprintln!("{feedback}"),
    }
}
