use explorer::{ExplorerCommand, Feedback, Locator, NodeIdentity, SidebarTab, StatusSnapshot};

/// Commands returned by the app to the event loop for side-effect execution.
#[derive(Debug)]
pub enum AppCommand {
    /// No side effect needed.
    None,
    /// Quit the application.
    Quit,
    /// Run one explorer command against the collaborators.
    Execute(ExplorerCommand),
    /// Run several independent commands (a multi-payload drop).
    ExecuteAll(Vec<ExplorerCommand>),
    /// Re-read git status for the given root and list every open folder again.
    ReloadTree(Locator),
    /// List these folders, one level each.
    ListFolders(Vec<Locator>),
    /// Read the first lines of a file for the editor pane.
    LoadPreview(Locator),
    /// Persist a committed sidebar width.
    SaveWidth(f64),
    /// Persist the active sidebar tab.
    SaveTab(SidebarTab),
}

/// Actions dispatched back into the app from async tasks.
#[derive(Debug)]
pub enum Action {
    /// One folder was listed (or failed).
    FolderListed {
        folder: Locator,
        result: Result<Vec<NodeIdentity>, String>,
    },
    /// A fresh git status snapshot.
    StatusLoaded(StatusSnapshot),
    /// A command ran; success carries the collaborator's message, if any.
    /// `active_editor` is the editor host's active file once it finished.
    Executed {
        command: ExplorerCommand,
        outcome: Result<Option<Feedback>, String>,
        active_editor: Option<Locator>,
    },
    /// Preview lines for the editor pane.
    PreviewLoaded(Locator, Result<Vec<String>, String>),
    /// A panel state write finished.
    Persisted(Result<(), String>),
}
