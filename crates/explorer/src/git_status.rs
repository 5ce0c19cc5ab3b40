use std::collections::HashMap;
use std::fmt;

use crate::locator::Locator;

/// Source-control state of one entry, as shown next to its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitStatus {
    Modified,
    Added,
    Deleted,
    Renamed,
    Untracked,
    Ignored,
    Conflicted,
}

impl GitStatus {
    /// Single-letter badge.
    pub fn badge(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Untracked => 'U',
            Self::Ignored => '!',
            Self::Conflicted => 'C',
        }
    }
}

impl fmt::Display for GitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Modified => write!(f, "modified"),
            Self::Added => write!(f, "added"),
            Self::Deleted => write!(f, "deleted"),
            Self::Renamed => write!(f, "renamed"),
            Self::Untracked => write!(f, "untracked"),
            Self::Ignored => write!(f, "ignored"),
            Self::Conflicted => write!(f, "conflicted"),
        }
    }
}

/// Read-only status lookup, queried per render.
pub trait SourceControl {
    fn status_of(&self, canonical: &Locator) -> Option<GitStatus>;
}

/// Status map captured once per refresh and read by every cell.
#[derive(Debug, Clone, Default)]
pub struct StatusSnapshot {
    entries: HashMap<Locator, GitStatus>,
}

impl StatusSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: Locator, status: GitStatus) {
        self.entries.insert(url.canonical(), status);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SourceControl for StatusSnapshot {
    fn status_of(&self, canonical: &Locator) -> Option<GitStatus> {
        self.entries.get(canonical).copied()
    }
}

impl FromIterator<(Locator, GitStatus)> for StatusSnapshot {
    fn from_iter<I: IntoIterator<Item = (Locator, GitStatus)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (url, status) in iter {
            snapshot.insert(url, status);
        }
        snapshot
    }
}
