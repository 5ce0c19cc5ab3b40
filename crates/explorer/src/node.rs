use std::fmt;

use crate::locator::Locator;

/// Whether a tree entry is a file or a folder.
///
/// Folders own their children directly, so a file can never carry any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Folder { children: Vec<NodeIdentity> },
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Folder { .. } => write!(f, "folder"),
        }
    }
}

/// Immutable descriptor of one entry in the workspace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdentity {
    url: Locator,
    name: String,
    kind: NodeKind,
}

impl NodeIdentity {
    pub fn file(url: Locator) -> Self {
        let name = url.display_name();
        Self {
            url,
            name,
            kind: NodeKind::File,
        }
    }

    pub fn folder(url: Locator, children: Vec<NodeIdentity>) -> Self {
        let name = url.display_name();
        Self {
            url,
            name,
            kind: NodeKind::Folder { children },
        }
    }

    pub fn url(&self) -> &Locator {
        &self.url
    }

    /// Percent-decoded display name derived from the locator.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    /// Children of a folder; always empty for files.
    pub fn children(&self) -> &[NodeIdentity] {
        match &self.kind {
            NodeKind::Folder { children } => children,
            NodeKind::File => &[],
        }
    }

    /// The same entry without its children.
    pub fn shallow(&self) -> Self {
        let kind = match self.kind {
            NodeKind::File => NodeKind::File,
            NodeKind::Folder { .. } => NodeKind::Folder {
                children: Vec::new(),
            },
        };
        Self {
            url: self.url.clone(),
            name: self.name.clone(),
            kind,
        }
    }

    /// Depth-first search for a node by locator, including `self`.
    pub fn find(&self, url: &Locator) -> Option<&NodeIdentity> {
        if &self.url == url {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(url))
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(NodeIdentity::count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(raw: &str) -> Locator {
        Locator::parse(raw).unwrap()
    }

    fn sample_tree() -> NodeIdentity {
        NodeIdentity::folder(
            loc("/proj"),
            vec![NodeIdentity::folder(
                loc("/proj/src"),
                vec![NodeIdentity::file(loc("/proj/src/a.txt"))],
            )],
        )
    }

    #[test]
    fn name_is_derived_from_locator() {
        let node = NodeIdentity::file(loc("file:///proj/read%20me.md"));
        assert_eq!(node.name(), "read me.md");
    }

    #[test]
    fn files_have_no_children() {
        let node = NodeIdentity::file(loc("/proj/a.txt"));
        assert!(!node.is_folder());
        assert!(node.children().is_empty());
        assert_eq!(node.kind().to_string(), "file");
    }

    #[test]
    fn empty_folder_is_still_a_folder() {
        let node = NodeIdentity::folder(loc("/proj/empty"), vec![]);
        assert!(node.is_folder());
        assert!(node.children().is_empty());
    }

    #[test]
    fn find_walks_the_subtree() {
        let tree = sample_tree();
        let found = tree.find(&loc("/proj/src/a.txt")).unwrap();
        assert_eq!(found.name(), "a.txt");
        assert!(tree.find(&loc("/proj/missing")).is_none());
    }

    #[test]
    fn shallow_drops_children_but_keeps_kind() {
        let tree = sample_tree();
        let shallow = tree.shallow();
        assert!(shallow.is_folder());
        assert!(shallow.children().is_empty());
        assert_eq!(shallow.url(), tree.url());
        assert_eq!(shallow.name(), tree.name());
    }

    #[test]
    fn count_includes_root() {
        assert_eq!(sample_tree().count(), 3);
    }
}
