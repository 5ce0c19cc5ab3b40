use crate::collaborator::{CollaboratorError, EditorHost, WorkspaceStorage};
use crate::feedback::Feedback;
use crate::locator::Locator;

/// A request the explorer core hands to its collaborators.
///
/// Controllers only build these. Running one is the executor's job, which
/// keeps every state machine free of I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerCommand {
    Rename { url: Locator, new_name: String },
    Copy { source: Locator, destination: Locator },
    Open { url: Locator, new_tab: bool },
    Duplicate(Locator),
    Delete(Locator),
    CreateFile(Locator),
    CreateFolder(Locator),
    AssignWorkspaceRoot(Locator),
    Reveal(Locator),
    Compare { left: Locator, right: Locator },
    CopyToClipboard(String),
}

impl ExplorerCommand {
    /// True if a successful run changes what the tree shows.
    pub fn changes_tree(&self) -> bool {
        matches!(
            self,
            Self::Rename { .. }
                | Self::Copy { .. }
                | Self::Duplicate(_)
                | Self::Delete(_)
                | Self::CreateFile(_)
                | Self::CreateFolder(_)
                | Self::AssignWorkspaceRoot(_)
        )
    }

    /// Short verb for logs.
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Rename { .. } => "rename",
            Self::Copy { .. } => "copy",
            Self::Open { .. } => "open",
            Self::Duplicate(_) => "duplicate",
            Self::Delete(_) => "delete",
            Self::CreateFile(_) => "create-file",
            Self::CreateFolder(_) => "create-folder",
            Self::AssignWorkspaceRoot(_) => "assign-root",
            Self::Reveal(_) => "reveal",
            Self::Compare { .. } => "compare",
            Self::CopyToClipboard(_) => "copy-to-clipboard",
        }
    }
}

/// Run one command against the collaborators, exactly once.
///
/// Success yields an optional informational message; failures are returned
/// untouched for the caller to report.
pub async fn try_execute(
    command: &ExplorerCommand,
    storage: &dyn WorkspaceStorage,
    editor: &dyn EditorHost,
) -> Result<Option<Feedback>, CollaboratorError> {
    match command {
        ExplorerCommand::Rename { url, new_name } => {
            storage.rename_entry(url, new_name).await?;
            Ok(Some(Feedback::info(format!(
                "Renamed {} to {new_name}",
                url.display_name()
            ))))
        }
        ExplorerCommand::Copy {
            source,
            destination,
        } => {
            storage.copy_entry(source, destination).await?;
            Ok(Some(Feedback::info(format!(
                "Copied {} to {destination}",
                source.display_name()
            ))))
        }
        ExplorerCommand::Open { url, new_tab } => {
            editor.open_entry(url, *new_tab).await?;
            Ok(None)
        }
        ExplorerCommand::Duplicate(url) => {
            let copy = storage.duplicate_entry(url).await?;
            Ok(Some(Feedback::info(format!(
                "Duplicated as {}",
                copy.display_name()
            ))))
        }
        ExplorerCommand::Delete(url) => {
            storage.delete_entry(url).await?;
            Ok(Some(Feedback::info(format!("Deleted {}", url.display_name()))))
        }
        ExplorerCommand::CreateFile(parent) => {
            let created = storage.create_file(parent).await?;
            Ok(Some(Feedback::info(format!(
                "Created {}",
                created.display_name()
            ))))
        }
        ExplorerCommand::CreateFolder(parent) => {
            let created = storage.create_folder(parent).await?;
            Ok(Some(Feedback::info(format!(
                "Created {}",
                created.display_name()
            ))))
        }
        ExplorerCommand::AssignWorkspaceRoot(url) => {
            editor.assign_workspace_root(url).await?;
            Ok(Some(Feedback::info(format!(
                "Workspace root is now {}",
                url.display_name()
            ))))
        }
        ExplorerCommand::Reveal(url) => {
            editor.reveal_in_container_app(url).await?;
            Ok(None)
        }
        ExplorerCommand::Compare { left, right } => {
            editor.compare(left, right).await?;
            Ok(None)
        }
        ExplorerCommand::CopyToClipboard(text) => {
            editor.copy_to_clipboard(text).await?;
            Ok(Some(Feedback::info(format!("Copied {text}"))))
        }
    }
}

/// Run one command and fold any failure into a single error message.
pub async fn execute(
    command: &ExplorerCommand,
    storage: &dyn WorkspaceStorage,
    editor: &dyn EditorHost,
) -> Option<Feedback> {
    tracing::debug!(verb = command.verb(), ?command, "executing explorer command");
    match try_execute(command, storage, editor).await {
        Ok(feedback) => feedback,
        Err(e) => {
            tracing::warn!(verb = command.verb(), error = %e, "explorer command failed");
            Some(Feedback::error(e.to_string()))
        }
    }
}
