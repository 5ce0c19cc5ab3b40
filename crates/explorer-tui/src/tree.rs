use std::collections::{HashMap, HashSet};

use explorer::{ExplorerCell, Locator, NodeIdentity};

/// A row in the flattened tree: one visible node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub url: Locator,
    pub depth: usize,
    pub is_folder: bool,
    pub expanded: bool,
}

/// The listed workspace plus expansion state and one cell per visible node.
///
/// Folders are listed one level at a time: `listings` holds the children of
/// every folder read so far, each child without a subtree of its own.
pub struct TreeModel {
    root: NodeIdentity,
    listings: HashMap<Locator, Vec<NodeIdentity>>,
    cells: HashMap<Locator, ExplorerCell>,
    expanded: HashSet<Locator>,
    rows: Vec<TreeRow>,
}

impl TreeModel {
    /// Build a model with only the root expanded. The root counts as listed;
    /// so does every folder inside `root` that carries children.
    pub fn new(root: NodeIdentity) -> Self {
        let mut model = Self {
            root: root.shallow(),
            listings: HashMap::new(),
            cells: HashMap::new(),
            expanded: HashSet::from([root.url().clone()]),
            rows: Vec::new(),
        };
        model.ingest(&root, true);
        model.rebuild();
        model
    }

    fn ingest(&mut self, folder: &NodeIdentity, always: bool) {
        if !folder.is_folder() || (!always && folder.children().is_empty()) {
            return;
        }
        let children = folder.children().iter().map(NodeIdentity::shallow).collect();
        self.listings.insert(folder.url().clone(), children);
        for child in folder.children() {
            self.ingest(child, false);
        }
    }

    pub fn root(&self) -> &NodeIdentity {
        &self.root
    }

    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&TreeRow> {
        self.rows.get(index)
    }

    pub fn index_of(&self, url: &Locator) -> Option<usize> {
        self.rows.iter().position(|row| &row.url == url)
    }

    /// A listed node, looked up through its parent's listing.
    pub fn node(&self, url: &Locator) -> Option<&NodeIdentity> {
        if url == self.root.url() {
            return Some(&self.root);
        }
        let parent = url.parent()?;
        self.listings
            .get(&parent)?
            .iter()
            .find(|node| node.url() == url)
    }

    pub fn is_listed(&self, folder: &Locator) -> bool {
        self.listings.contains_key(folder)
    }

    pub fn cell(&self, url: &Locator) -> Option<&ExplorerCell> {
        self.cells.get(url)
    }

    pub fn cell_mut(&mut self, url: &Locator) -> Option<&mut ExplorerCell> {
        self.cells.get_mut(url)
    }

    /// The cell currently in rename mode, if any.
    pub fn renaming(&self) -> Option<&Locator> {
        self.cells
            .iter()
            .find(|(_, cell)| cell.rename().is_editing())
            .map(|(url, _)| url)
    }

    pub fn is_expanded(&self, url: &Locator) -> bool {
        self.expanded.contains(url)
    }

    /// Folders a reload lists again: the root, then every expanded folder.
    pub fn open_folders(&self) -> Vec<Locator> {
        let mut folders: Vec<Locator> = self
            .expanded
            .iter()
            .filter(|url| *url != self.root.url())
            .cloned()
            .collect();
        folders.sort();
        folders.insert(0, self.root.url().clone());
        folders
    }

    /// Expand or collapse a folder. Returns false for files and unknown urls.
    pub fn toggle(&mut self, url: &Locator) -> bool {
        if !self.node(url).is_some_and(NodeIdentity::is_folder) {
            return false;
        }
        if !self.expanded.remove(url) {
            self.expanded.insert(url.clone());
        }
        self.rebuild();
        true
    }

    /// Expand every folder on the way to `url` so its row shows once those
    /// folders are listed.
    pub fn reveal(&mut self, url: &Locator) {
        let mut current = url.parent();
        while let Some(folder) = current {
            if !self.contains(&folder) {
                break;
            }
            current = folder.parent();
            self.expanded.insert(folder);
        }
        self.rebuild();
    }

    /// Install a fresh listing of `folder`.
    ///
    /// Cells whose node survived keep their rename state. Child folders
    /// missing from the listing are forgotten with everything under them.
    /// Returns false for a folder outside this workspace.
    pub fn set_listing(&mut self, folder: &Locator, children: Vec<NodeIdentity>) -> bool {
        if !self.contains(folder) {
            return false;
        }
        let children: Vec<NodeIdentity> = children.iter().map(NodeIdentity::shallow).collect();
        let vanished: Vec<Locator> = self
            .listings
            .get(folder)
            .into_iter()
            .flatten()
            .filter(|old| old.is_folder())
            .filter(|old| {
                !children
                    .iter()
                    .any(|new| new.url() == old.url() && new.is_folder())
            })
            .map(|old| old.url().clone())
            .collect();
        for gone in &vanished {
            self.drop_subtree(gone);
        }
        self.listings.insert(folder.clone(), children);
        self.rebuild();
        true
    }

    /// Drop an entry that no longer exists, along with anything listed under it.
    pub fn forget(&mut self, url: &Locator) {
        if url == self.root.url() {
            return;
        }
        if let Some(parent) = url.parent()
            && let Some(siblings) = self.listings.get_mut(&parent)
        {
            siblings.retain(|node| node.url() != url);
        }
        self.drop_subtree(url);
        self.rebuild();
    }

    fn drop_subtree(&mut self, url: &Locator) {
        let inside = |other: &Locator| other == url || url.is_ancestor_of(other);
        self.listings.retain(|folder, _| !inside(folder));
        self.expanded.retain(|folder| !inside(folder));
    }

    fn contains(&self, url: &Locator) -> bool {
        url == self.root.url() || self.root.url().is_ancestor_of(url)
    }

    fn rebuild(&mut self) {
        let mut visible: Vec<(&NodeIdentity, usize)> = Vec::new();
        flatten(&self.root, 0, &self.listings, &self.expanded, &mut visible);

        let mut cells = HashMap::with_capacity(visible.len());
        let mut rows = Vec::with_capacity(visible.len());
        for (node, depth) in visible {
            let url = node.url().clone();
            let cell = match self.cells.remove(&url) {
                Some(mut cell) => {
                    cell.refresh(node.clone());
                    cell
                }
                None => ExplorerCell::new(node.clone()),
            };
            rows.push(TreeRow {
                url: url.clone(),
                depth,
                is_folder: node.is_folder(),
                expanded: self.expanded.contains(&url),
            });
            cells.insert(url, cell);
        }

        self.cells = cells;
        self.rows = rows;
    }
}

fn flatten<'a>(
    node: &'a NodeIdentity,
    depth: usize,
    listings: &'a HashMap<Locator, Vec<NodeIdentity>>,
    expanded: &HashSet<Locator>,
    out: &mut Vec<(&'a NodeIdentity, usize)>,
) {
    out.push((node, depth));
    if !node.is_folder() || !expanded.contains(node.url()) {
        return;
    }
    for child in listings.get(node.url()).into_iter().flatten() {
        flatten(child, depth + 1, listings, expanded, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer::test_support::{loc, sample_workspace};

    fn names(model: &TreeModel) -> Vec<String> {
        model
            .rows()
            .iter()
            .map(|row| format!("{}{}", "  ".repeat(row.depth), row.url.display_name()))
            .collect()
    }

    #[test]
    fn root_starts_expanded() {
        let model = TreeModel::new(sample_workspace());
        assert_eq!(names(&model), vec!["proj", "  src", "  README.md"]);
        assert!(model.rows()[0].expanded);
        assert!(!model.rows()[1].expanded);
    }

    #[test]
    fn toggle_expands_and_collapses_folders() {
        let mut model = TreeModel::new(sample_workspace());
        assert!(model.toggle(&loc("/proj/src")));
        assert_eq!(names(&model), vec!["proj", "  src", "    a.txt", "  README.md"]);

        assert!(model.toggle(&loc("/proj/src")));
        assert_eq!(model.len(), 3);
    }

    #[test]
    fn toggle_on_file_does_nothing() {
        let mut model = TreeModel::new(sample_workspace());
        assert!(!model.toggle(&loc("/proj/README.md")));
        assert!(!model.toggle(&loc("/elsewhere")));
    }

    #[test]
    fn every_visible_row_has_a_cell() {
        let mut model = TreeModel::new(sample_workspace());
        model.toggle(&loc("/proj/src"));
        for row in model.rows() {
            assert!(model.cell(&row.url).is_some(), "missing cell for {}", row.url);
        }
        assert!(model.cell(&loc("/proj/src/a.txt")).is_some());
    }

    #[test]
    fn reveal_expands_ancestors() {
        let mut model = TreeModel::new(sample_workspace());
        model.reveal(&loc("/proj/src/a.txt"));
        assert_eq!(model.index_of(&loc("/proj/src/a.txt")), Some(2));
    }

    #[test]
    fn cells_hold_entries_without_subtrees() {
        let model = TreeModel::new(sample_workspace());
        assert!(model.root().children().is_empty());
        let src = model.cell(&loc("/proj/src")).unwrap();
        assert!(src.node().children().is_empty());
        assert_eq!(model.node(&loc("/proj/src/a.txt")).unwrap().name(), "a.txt");
    }

    #[test]
    fn unlisted_folder_expands_empty_until_listed() {
        let mut model = TreeModel::new(NodeIdentity::folder(
            loc("/proj"),
            vec![NodeIdentity::folder(loc("/proj/src"), vec![])],
        ));
        assert!(!model.is_listed(&loc("/proj/src")));
        assert!(model.toggle(&loc("/proj/src")));
        assert_eq!(names(&model), vec!["proj", "  src"]);

        assert!(model.set_listing(
            &loc("/proj/src"),
            vec![NodeIdentity::file(loc("/proj/src/a.txt"))],
        ));
        assert!(model.is_listed(&loc("/proj/src")));
        assert_eq!(names(&model), vec!["proj", "  src", "    a.txt"]);
    }

    #[test]
    fn open_folders_start_with_root() {
        let mut model = TreeModel::new(sample_workspace());
        assert_eq!(model.open_folders(), vec![loc("/proj")]);
        model.toggle(&loc("/proj/src"));
        assert_eq!(model.open_folders(), vec![loc("/proj"), loc("/proj/src")]);
    }

    #[test]
    fn relisting_keeps_expansion_and_rename_state() {
        let mut model = TreeModel::new(sample_workspace());
        model.toggle(&loc("/proj/src"));
        model
            .cell_mut(&loc("/proj/README.md"))
            .unwrap()
            .rename_mut()
            .begin_rename();

        model.set_listing(&loc("/proj"), sample_workspace().children().to_vec());

        assert!(model.is_expanded(&loc("/proj/src")));
        assert!(model.is_listed(&loc("/proj/src")));
        assert_eq!(model.renaming(), Some(&loc("/proj/README.md")));
    }

    #[test]
    fn relisting_drops_vanished_folders() {
        let mut model = TreeModel::new(sample_workspace());
        model.toggle(&loc("/proj/src"));

        model.set_listing(&loc("/proj"), vec![NodeIdentity::file(loc("/proj/README.md"))]);

        assert!(!model.is_expanded(&loc("/proj/src")));
        assert!(!model.is_listed(&loc("/proj/src")));
        assert!(model.cell(&loc("/proj/src/a.txt")).is_none());
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn listing_outside_root_is_ignored() {
        let mut model = TreeModel::new(sample_workspace());
        assert!(!model.set_listing(&loc("/elsewhere"), vec![]));
        assert!(!model.is_listed(&loc("/elsewhere")));
    }

    #[test]
    fn forget_removes_entry_and_its_listings() {
        let mut model = TreeModel::new(sample_workspace());
        model.toggle(&loc("/proj/src"));
        model.forget(&loc("/proj/src"));
        assert_eq!(names(&model), vec!["proj", "  README.md"]);
        assert!(!model.is_expanded(&loc("/proj/src")));
        assert!(model.node(&loc("/proj/src/a.txt")).is_none());
    }
}
