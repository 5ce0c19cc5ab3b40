use std::sync::Mutex;

use crate::{CollaboratorError, EditorHost, Locator, NodeIdentity, WorkspaceStorage};

/// One recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListTree(Locator),
    ListFolder(Locator),
    Rename(Locator, String),
    Copy(Locator, Locator),
    Duplicate(Locator),
    Delete(Locator),
    CreateFile(Locator),
    CreateFolder(Locator),
    Open(Locator, bool),
    Compare(Locator, Locator),
    AssignRoot(Locator),
    Reveal(Locator),
    Clipboard(String),
}

/// Storage that records every call and answers from a fixed tree.
#[derive(Default)]
pub struct RecordingStorage {
    calls: Mutex<Vec<Call>>,
    failure: Mutex<Option<String>>,
    tree: Mutex<Option<NodeIdentity>>,
}

impl RecordingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree(tree: NodeIdentity) -> Self {
        let storage = Self::default();
        *storage.tree.lock().unwrap() = Some(tree);
        storage
    }

    /// Make every subsequent mutating call fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), CollaboratorError> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(CollaboratorError::Other(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl WorkspaceStorage for RecordingStorage {
    async fn list_tree(
        &self,
        root: &Locator,
        _show_hidden: bool,
    ) -> Result<NodeIdentity, CollaboratorError> {
        self.calls.lock().unwrap().push(Call::ListTree(root.clone()));
        self.tree
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| CollaboratorError::NotFound(root.clone()))
    }

    async fn list_folder(
        &self,
        folder: &Locator,
        _show_hidden: bool,
    ) -> Result<Vec<NodeIdentity>, CollaboratorError> {
        self.calls.lock().unwrap().push(Call::ListFolder(folder.clone()));
        let tree = self.tree.lock().unwrap();
        tree.as_ref()
            .and_then(|tree| tree.find(folder))
            .filter(|node| node.is_folder())
            .map(|node| node.children().iter().map(NodeIdentity::shallow).collect())
            .ok_or_else(|| CollaboratorError::NotFound(folder.clone()))
    }

    async fn rename_entry(
        &self,
        url: &Locator,
        new_name: &str,
    ) -> Result<Locator, CollaboratorError> {
        self.record(Call::Rename(url.clone(), new_name.to_owned()))?;
        let parent = url.parent().unwrap_or_else(|| url.clone());
        Ok(parent.join(new_name))
    }

    async fn copy_entry(
        &self,
        source: &Locator,
        destination: &Locator,
    ) -> Result<(), CollaboratorError> {
        self.record(Call::Copy(source.clone(), destination.clone()))
    }

    async fn duplicate_entry(&self, url: &Locator) -> Result<Locator, CollaboratorError> {
        self.record(Call::Duplicate(url.clone()))?;
        Ok(Locator::parse(&format!("{url} copy")).unwrap_or_else(|_| url.clone()))
    }

    async fn delete_entry(&self, url: &Locator) -> Result<(), CollaboratorError> {
        self.record(Call::Delete(url.clone()))
    }

    async fn create_file(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        self.record(Call::CreateFile(parent.clone()))?;
        Ok(parent.join("untitled"))
    }

    async fn create_folder(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        self.record(Call::CreateFolder(parent.clone()))?;
        Ok(parent.join("untitled folder"))
    }
}

/// Editor host that records every call.
#[derive(Default)]
pub struct RecordingEditor {
    calls: Mutex<Vec<Call>>,
    active: Mutex<Option<Locator>>,
}

impl RecordingEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_active(&self, url: Option<Locator>) {
        *self.active.lock().unwrap() = url;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), CollaboratorError> {
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait::async_trait]
impl EditorHost for RecordingEditor {
    fn active_editor(&self) -> Option<Locator> {
        self.active.lock().unwrap().clone()
    }

    async fn open_entry(
        &self,
        url: &Locator,
        force_new_tab: bool,
    ) -> Result<(), CollaboratorError> {
        self.set_active(Some(url.clone()));
        self.record(Call::Open(url.clone(), force_new_tab))
    }

    async fn compare(&self, left: &Locator, right: &Locator) -> Result<(), CollaboratorError> {
        self.record(Call::Compare(left.clone(), right.clone()))
    }

    async fn assign_workspace_root(&self, url: &Locator) -> Result<(), CollaboratorError> {
        self.record(Call::AssignRoot(url.clone()))
    }

    async fn reveal_in_container_app(&self, url: &Locator) -> Result<(), CollaboratorError> {
        self.record(Call::Reveal(url.clone()))
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), CollaboratorError> {
        self.record(Call::Clipboard(text.to_owned()))
    }
}

/// Parse a locator, panicking on bad input. Test-only convenience.
pub fn loc(raw: &str) -> Locator {
    Locator::parse(raw).unwrap()
}

/// The `/proj` workspace used throughout the tests:
///
/// ```text
/// /proj
///   src/
///     a.txt
///   README.md
/// ```
pub fn sample_workspace() -> NodeIdentity {
    NodeIdentity::folder(
        loc("/proj"),
        vec![
            NodeIdentity::folder(
                loc("/proj/src"),
                vec![NodeIdentity::file(loc("/proj/src/a.txt"))],
            ),
            NodeIdentity::file(loc("/proj/README.md")),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_storage_lists_configured_tree() {
        let storage = RecordingStorage::with_tree(sample_workspace());
        let tree = storage.list_tree(&loc("/proj"), false).await.unwrap();
        assert_eq!(tree.count(), 4);
        assert_eq!(storage.calls(), vec![Call::ListTree(loc("/proj"))]);
    }

    #[tokio::test]
    async fn recording_storage_lists_one_level() {
        let storage = RecordingStorage::with_tree(sample_workspace());
        let children = storage.list_folder(&loc("/proj"), false).await.unwrap();
        assert_eq!(
            children,
            vec![
                NodeIdentity::folder(loc("/proj/src"), vec![]),
                NodeIdentity::file(loc("/proj/README.md")),
            ]
        );
        assert!(storage.list_folder(&loc("/proj/README.md"), false).await.is_err());
    }

    #[tokio::test]
    async fn recording_storage_without_tree_is_not_found() {
        let storage = RecordingStorage::new();
        let result = storage.list_tree(&loc("/proj"), false).await;
        assert!(matches!(result, Err(CollaboratorError::NotFound(_))));
    }

    #[tokio::test]
    async fn failure_still_records_call() {
        let storage = RecordingStorage::new();
        storage.fail_with("disk full");
        let result = storage.create_file(&loc("/proj")).await;
        assert!(result.is_err());
        assert_eq!(storage.calls(), vec![Call::CreateFile(loc("/proj"))]);
    }
}
