use std::sync::Arc;

use crate::locator::Locator;
use crate::node::NodeIdentity;

/// Failures reported by storage and editor collaborators.
///
/// These never flow back into a controller. The executor turns them into a
/// single user-facing message.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{0} not found")]
    NotFound(Locator),

    #[error("{0} already exists")]
    AlreadyExists(Locator),

    #[error("permission denied: {0}")]
    PermissionDenied(Locator),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// The workspace-storage backend: enumeration and file CRUD.
///
/// Every mutating call is one-shot. Whether a copy onto an existing entry
/// overwrites, fails, or moves is the backend's decision.
#[async_trait::async_trait]
pub trait WorkspaceStorage: Send + Sync {
    /// Enumerate the tree rooted at `root`.
    async fn list_tree(
        &self,
        root: &Locator,
        show_hidden: bool,
    ) -> Result<NodeIdentity, CollaboratorError>;

    /// Rename `url` in place to `new_name`. Returns the new locator.
    async fn rename_entry(
        &self,
        url: &Locator,
        new_name: &str,
    ) -> Result<Locator, CollaboratorError>;

    /// List the direct children of `folder`, folders first. Child folders come
    /// back without their own children.
    async fn list_folder(
        &self,
        folder: &Locator,
        show_hidden: bool,
    ) -> Result<Vec<NodeIdentity>, CollaboratorError>;

    /// Copy `source` to `destination` (the full target locator, not its folder).
    async fn copy_entry(
        &self,
        source: &Locator,
        destination: &Locator,
    ) -> Result<(), CollaboratorError>;

    /// Create a sibling copy of `url`. Returns the copy's locator.
    async fn duplicate_entry(&self, url: &Locator) -> Result<Locator, CollaboratorError>;

    async fn delete_entry(&self, url: &Locator) -> Result<(), CollaboratorError>;

    /// Create a new empty file inside `parent`. Returns its locator.
    async fn create_file(&self, parent: &Locator) -> Result<Locator, CollaboratorError>;

    /// Create a new empty folder inside `parent`. Returns its locator.
    async fn create_folder(&self, parent: &Locator) -> Result<Locator, CollaboratorError>;
}

/// The editor side: opening, comparing, and host-application integration.
#[async_trait::async_trait]
pub trait EditorHost: Send + Sync {
    /// Locator of the file in the currently active editor, if any.
    fn active_editor(&self) -> Option<Locator>;

    async fn open_entry(&self, url: &Locator, force_new_tab: bool)
    -> Result<(), CollaboratorError>;

    /// Open a side-by-side comparison of two files.
    async fn compare(&self, left: &Locator, right: &Locator) -> Result<(), CollaboratorError>;

    /// Make `url` the new workspace root.
    async fn assign_workspace_root(&self, url: &Locator) -> Result<(), CollaboratorError>;

    /// Show the entry's containing folder in the host's file manager.
    async fn reveal_in_container_app(&self, url: &Locator) -> Result<(), CollaboratorError>;

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), CollaboratorError>;
}

#[async_trait::async_trait]
impl<T: WorkspaceStorage + ?Sized> WorkspaceStorage for Arc<T> {
    async fn list_tree(
        &self,
        root: &Locator,
        show_hidden: bool,
    ) -> Result<NodeIdentity, CollaboratorError> {
        (**self).list_tree(root, show_hidden).await
    }

    async fn list_folder(
        &self,
        folder: &Locator,
        show_hidden: bool,
    ) -> Result<Vec<NodeIdentity>, CollaboratorError> {
        (**self).list_folder(folder, show_hidden).await
    }

    async fn rename_entry(
        &self,
        url: &Locator,
        new_name: &str,
    ) -> Result<Locator, CollaboratorError> {
        (**self).rename_entry(url, new_name).await
    }

    async fn copy_entry(
        &self,
        source: &Locator,
        destination: &Locator,
    ) -> Result<(), CollaboratorError> {
        (**self).copy_entry(source, destination).await
    }

    async fn duplicate_entry(&self, url: &Locator) -> Result<Locator, CollaboratorError> {
        (**self).duplicate_entry(url).await
    }

    async fn delete_entry(&self, url: &Locator) -> Result<(), CollaboratorError> {
        (**self).delete_entry(url).await
    }

    async fn create_file(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        (**self).create_file(parent).await
    }

    async fn create_folder(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        (**self).create_folder(parent).await
    }
}

#[async_trait::async_trait]
impl<T: EditorHost + ?Sized> EditorHost for Arc<T> {
    fn active_editor(&self) -> Option<Locator> {
        (**self).active_editor()
    }

    async fn open_entry(
        &self,
        url: &Locator,
        force_new_tab: bool,
    ) -> Result<(), CollaboratorError> {
        (**self).open_entry(url, force_new_tab).await
    }

    async fn compare(&self, left: &Locator, right: &Locator) -> Result<(), CollaboratorError> {
        (**self).compare(left, right).await
    }

    async fn assign_workspace_root(&self, url: &Locator) -> Result<(), CollaboratorError> {
        (**self).assign_workspace_root(url).await
    }

    async fn reveal_in_container_app(&self, url: &Locator) -> Result<(), CollaboratorError> {
        (**self).reveal_in_container_app(url).await
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), CollaboratorError> {
        (**self).copy_to_clipboard(text).await
    }
}
