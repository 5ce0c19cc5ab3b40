//! Source-control decorations from `git status`.

use std::path::{Path, PathBuf};
use std::process::Command;

use explorer::{GitStatus, Locator, StatusSnapshot};

/// Snapshot of `git status` for the repository containing `root`, keyed by
/// locators under `root`. Empty when `root` is remote or not in a repository.
pub async fn snapshot(root: Locator) -> StatusSnapshot {
    tokio::task::spawn_blocking(move || snapshot_blocking(&root))
        .await
        .unwrap_or_default()
}

fn snapshot_blocking(root: &Locator) -> StatusSnapshot {
    let Some(root_path) = root.to_path() else {
        return StatusSnapshot::new();
    };
    let Some(toplevel) = git_toplevel(&root_path) else {
        tracing::debug!(%root, "not a git repository");
        return StatusSnapshot::new();
    };

    let output = match Command::new("git")
        .arg("-C")
        .arg(&root_path)
        .args(["status", "--porcelain=v1", "-z", "--untracked-files=all"])
        .output()
    {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!(status = %output.status, "git status failed");
            return StatusSnapshot::new();
        }
        Err(e) => {
            tracing::debug!(error = %e, "could not run git");
            return StatusSnapshot::new();
        }
    };

    let text = String::from_utf8_lossy(&output.stdout);
    let snapshot: StatusSnapshot = parse_porcelain(&text)
        .into_iter()
        .filter_map(|(relative, status)| {
            let absolute = toplevel.join(relative);
            let under_root = absolute.strip_prefix(&root_path).ok()?;
            Some((locator_under(root, under_root), status))
        })
        .collect();
    tracing::debug!(%root, entries = snapshot.len(), "git status loaded");
    snapshot
}

fn git_toplevel(dir: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let line = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    (!line.is_empty()).then(|| PathBuf::from(line))
}

fn locator_under(root: &Locator, relative: &Path) -> Locator {
    relative
        .components()
        .fold(root.clone(), |url, part| {
            url.join(&part.as_os_str().to_string_lossy())
        })
}

/// Parse `git status --porcelain=v1 -z` output into (path, status) pairs.
///
/// Paths are relative to the repository top level. A rename reports its new
/// path; the old path that follows it is skipped.
fn parse_porcelain(output: &str) -> Vec<(&str, GitStatus)> {
    let mut entries = Vec::new();
    let mut records = output.split('\0').filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        if record.len() < 4 {
            continue;
        }
        let (code, path) = record.split_at(3);
        let mut code = code.chars();
        let (x, y) = (code.next().unwrap_or(' '), code.next().unwrap_or(' '));

        let Some(status) = classify(x, y) else {
            continue;
        };
        if matches!(x, 'R' | 'C') {
            // Original path of a rename or copy.
            records.next();
        }
        entries.push((path, status));
    }

    entries
}

fn classify(x: char, y: char) -> Option<GitStatus> {
    match (x, y) {
        ('?', '?') => Some(GitStatus::Untracked),
        ('!', '!') => Some(GitStatus::Ignored),
        ('U', _) | (_, 'U') | ('A', 'A') | ('D', 'D') => Some(GitStatus::Conflicted),
        ('R', _) => Some(GitStatus::Renamed),
        ('A', _) => Some(GitStatus::Added),
        ('D', _) | (_, 'D') => Some(GitStatus::Deleted),
        ('M', _) | (_, 'M') | ('C', _) | ('T', _) | (_, 'T') => Some(GitStatus::Modified),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use explorer::SourceControl;
    use explorer::test_support::loc;

    use super::*;

    #[test]
    fn parses_common_states() {
        let output = " M src/a.txt\0A  new.rs\0?? notes.md\0D  gone.txt\0UU both.txt\0";
        let entries = parse_porcelain(output);
        assert_eq!(
            entries,
            vec![
                ("src/a.txt", GitStatus::Modified),
                ("new.rs", GitStatus::Added),
                ("notes.md", GitStatus::Untracked),
                ("gone.txt", GitStatus::Deleted),
                ("both.txt", GitStatus::Conflicted),
            ]
        );
    }

    #[test]
    fn rename_skips_original_path() {
        let output = "R  after.txt\0before.txt\0 M other.txt\0";
        assert_eq!(
            parse_porcelain(output),
            vec![
                ("after.txt", GitStatus::Renamed),
                ("other.txt", GitStatus::Modified),
            ]
        );
    }

    #[test]
    fn locators_are_built_under_root() {
        let root = loc("/work/proj");
        let url = locator_under(&root, Path::new("src/a.txt"));
        assert_eq!(url, loc("/work/proj/src/a.txt"));

        let snapshot: StatusSnapshot = [(url, GitStatus::Modified)].into_iter().collect();
        assert_eq!(
            snapshot.status_of(&loc("/work/proj/src/./a.txt").canonical()),
            Some(GitStatus::Modified)
        );
    }
}
