//! Context actions for a tree node.
//!
//! The menu is stateless: [`available_actions`] is a pure function of the
//! node and the compare selection, and [`dispatch`] maps a chosen action to
//! what the front end should do next. No I/O happens here.

use std::fmt;

use crate::command::ExplorerCommand;
use crate::context::{CompareSelection, ExplorerContext};
use crate::locator::Locator;
use crate::node::NodeIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    OpenInNewTab,
    RevealInContainerApp,
    Rename,
    Duplicate,
    Delete,
    CopyToFolder,
    CopyRelativePath,
    SelectForCompare,
    CompareWithSelected,
    NewFile,
    NewFolder,
    AssignAsWorkspaceRoot,
}

impl MenuAction {
    /// Menu label for this action on `node`. Copy reads "Download" for
    /// remote nodes; it is the same operation either way.
    pub fn label(self, node: &NodeIdentity) -> &'static str {
        match self {
            Self::OpenInNewTab => "Open in New Tab",
            Self::RevealInContainerApp => "Show in File Manager",
            Self::Rename => "Rename",
            Self::Duplicate => "Duplicate",
            Self::Delete => "Delete",
            Self::CopyToFolder if node.url().is_local() => "Copy to Folder…",
            Self::CopyToFolder => "Download to Folder…",
            Self::CopyRelativePath => "Copy Relative Path",
            Self::SelectForCompare => "Select for Compare",
            Self::CompareWithSelected => "Compare with Selected",
            Self::NewFile => "New File",
            Self::NewFolder => "New Folder",
            Self::AssignAsWorkspaceRoot => "Set as Workspace Root",
        }
    }

    /// True for actions that destroy or replace data.
    pub fn is_destructive(self) -> bool {
        matches!(self, Self::Delete)
    }
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenInNewTab => "open-in-new-tab",
            Self::RevealInContainerApp => "reveal",
            Self::Rename => "rename",
            Self::Duplicate => "duplicate",
            Self::Delete => "delete",
            Self::CopyToFolder => "copy-to-folder",
            Self::CopyRelativePath => "copy-relative-path",
            Self::SelectForCompare => "select-for-compare",
            Self::CompareWithSelected => "compare-with-selected",
            Self::NewFile => "new-file",
            Self::NewFolder => "new-folder",
            Self::AssignAsWorkspaceRoot => "assign-as-workspace-root",
        };
        f.write_str(name)
    }
}

/// Ordered actions offered for `node`.
pub fn available_actions(node: &NodeIdentity, compare: &CompareSelection) -> Vec<MenuAction> {
    use MenuAction::*;

    if node.is_folder() {
        return vec![
            RevealInContainerApp,
            Rename,
            Duplicate,
            Delete,
            CopyToFolder,
            CopyRelativePath,
            NewFile,
            NewFolder,
            AssignAsWorkspaceRoot,
        ];
    }

    let mut actions = vec![
        OpenInNewTab,
        RevealInContainerApp,
        Rename,
        Duplicate,
        Delete,
        CopyToFolder,
        CopyRelativePath,
        SelectForCompare,
    ];
    if compare.offers_compare_with(node.url()) {
        actions.push(CompareWithSelected);
    }
    actions
}

/// What the front end should do after an action is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Hand this to the executor.
    Command(ExplorerCommand),
    /// Put the node's cell into rename mode.
    BeginRename,
    /// Ask the user for a destination folder, then call [`copy_into_folder`].
    PickFolder,
    /// Handled in place, or nothing to do.
    Nothing,
}

/// Run `action` for `node`.
///
/// Actions not offered for the node's kind are rejected with a warning.
/// Selecting for compare updates `ctx` directly; copying a relative path
/// with no active editor quietly does nothing.
pub fn dispatch(action: MenuAction, node: &NodeIdentity, ctx: &mut ExplorerContext) -> MenuOutcome {
    if !available_actions(node, &ctx.compare).contains(&action) {
        tracing::warn!(%action, url = %node.url(), kind = %node.kind(), "action not offered for node");
        return MenuOutcome::Nothing;
    }
    tracing::debug!(%action, url = %node.url(), "menu dispatch");

    let url = node.url().clone();
    match action {
        MenuAction::OpenInNewTab => MenuOutcome::Command(ExplorerCommand::Open { url, new_tab: true }),
        MenuAction::RevealInContainerApp => MenuOutcome::Command(ExplorerCommand::Reveal(url)),
        MenuAction::Rename => MenuOutcome::BeginRename,
        MenuAction::Duplicate => MenuOutcome::Command(ExplorerCommand::Duplicate(url)),
        MenuAction::Delete => MenuOutcome::Command(ExplorerCommand::Delete(url)),
        MenuAction::CopyToFolder => MenuOutcome::PickFolder,
        MenuAction::CopyRelativePath => {
            let relative = ctx
                .active_editor
                .as_ref()
                .and_then(|base| url.relative_to(base));
            match relative {
                Some(path) => MenuOutcome::Command(ExplorerCommand::CopyToClipboard(path)),
                None => {
                    tracing::debug!(%url, "no relative path: no active editor or different origin");
                    MenuOutcome::Nothing
                }
            }
        }
        MenuAction::SelectForCompare => {
            ctx.compare.set(url);
            MenuOutcome::Nothing
        }
        MenuAction::CompareWithSelected => match ctx.compare.get() {
            Some(left) => MenuOutcome::Command(ExplorerCommand::Compare {
                left: left.clone(),
                right: url,
            }),
            None => MenuOutcome::Nothing,
        },
        MenuAction::NewFile => MenuOutcome::Command(ExplorerCommand::CreateFile(url)),
        MenuAction::NewFolder => MenuOutcome::Command(ExplorerCommand::CreateFolder(url)),
        MenuAction::AssignAsWorkspaceRoot => {
            MenuOutcome::Command(ExplorerCommand::AssignWorkspaceRoot(url))
        }
    }
}

/// Copy request for the folder picked after [`MenuOutcome::PickFolder`].
pub fn copy_into_folder(node: &NodeIdentity, folder: &Locator) -> ExplorerCommand {
    ExplorerCommand::Copy {
        source: node.url().clone(),
        destination: folder.join(node.name()),
    }
}
