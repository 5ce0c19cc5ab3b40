use crate::git_status::{GitStatus, SourceControl, StatusSnapshot};
use crate::locator::Locator;

/// The single file marked "selected for compare", shared by every cell.
///
/// Empty at workspace load; changes only by explicit reassignment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareSelection(Option<Locator>);

impl CompareSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Locator> {
        self.0.as_ref()
    }

    pub fn set(&mut self, url: Locator) {
        tracing::debug!(url = %url, "selected for compare");
        self.0 = Some(url);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// True when a selection exists and it is some other file than `url`.
    pub fn offers_compare_with(&self, url: &Locator) -> bool {
        self.0.as_ref().is_some_and(|selected| selected != url)
    }
}

/// State injected into every cell for one render/interaction turn.
///
/// Owned by the front end and mutated only on its event-handling turn;
/// cells read it by reference.
#[derive(Debug, Clone, Default)]
pub struct ExplorerContext {
    pub compare: CompareSelection,
    /// File shown in the active editor, the base for relative paths.
    pub active_editor: Option<Locator>,
    pub git: StatusSnapshot,
}

impl ExplorerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Git status for a node, looked up by canonical locator.
    pub fn status_of(&self, url: &Locator) -> Option<GitStatus> {
        self.git.status_of(&url.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::loc;

    #[test]
    fn compare_selection_starts_empty() {
        let selection = CompareSelection::new();
        assert_eq!(selection.get(), None);
        assert!(!selection.offers_compare_with(&loc("/proj/a.txt")));
    }

    #[test]
    fn compare_offered_only_for_other_files() {
        let mut selection = CompareSelection::new();
        selection.set(loc("/proj/a.txt"));
        assert!(!selection.offers_compare_with(&loc("/proj/a.txt")));
        assert!(selection.offers_compare_with(&loc("/proj/b.txt")));
    }

    #[test]
    fn reassignment_replaces_selection() {
        let mut selection = CompareSelection::new();
        selection.set(loc("/proj/a.txt"));
        selection.set(loc("/proj/b.txt"));
        assert_eq!(selection.get(), Some(&loc("/proj/b.txt")));
        selection.clear();
        assert_eq!(selection.get(), None);
    }

    #[test]
    fn status_lookup_uses_canonical_locator() {
        let mut ctx = ExplorerContext::new();
        ctx.git.insert(loc("/proj/a.txt"), GitStatus::Modified);
        assert_eq!(ctx.status_of(&loc("/proj/./src/../a.txt")), Some(GitStatus::Modified));
    }
}
