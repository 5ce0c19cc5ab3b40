use crate::command::ExplorerCommand;
use crate::context::ExplorerContext;
use crate::drag_drop::{DragDropController, DragPayload, DropOutcome};
use crate::git_status::GitStatus;
use crate::node::NodeIdentity;
use crate::rename::RenameController;

/// What a front end needs to draw one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub name: String,
    pub is_folder: bool,
    pub git_status: Option<GitStatus>,
    pub renaming: bool,
    pub draft: Option<String>,
    pub selection_all: bool,
}

/// The interactive unit for one node: its rename controller plus its role
/// in drag and drop.
///
/// A cell keeps only its own entry; a folder's children live with whoever
/// lists them. A cell that is being renamed will not start a drag.
#[derive(Debug, Clone)]
pub struct ExplorerCell {
    node: NodeIdentity,
    rename: RenameController,
    drag: DragDropController,
}

impl ExplorerCell {
    pub fn new(node: NodeIdentity) -> Self {
        let node = node.shallow();
        let rename = RenameController::new(&node);
        Self {
            node,
            rename,
            drag: DragDropController::new(),
        }
    }

    pub fn node(&self) -> &NodeIdentity {
        &self.node
    }

    pub fn rename(&self) -> &RenameController {
        &self.rename
    }

    pub fn rename_mut(&mut self) -> &mut RenameController {
        &mut self.rename
    }

    /// Swap in a freshly listed node.
    ///
    /// Same locator and kind keeps the rename state; anything else is a
    /// different entity and starts over.
    pub fn refresh(&mut self, node: NodeIdentity) {
        if node.url() == self.node.url() && node.is_folder() == self.node.is_folder() {
            self.rename.rebind(&node);
            self.node = node.shallow();
        } else {
            *self = Self::new(node);
        }
    }

    /// Start a drag from this cell. `None` while the cell is renaming.
    pub fn begin_drag(&mut self) -> Option<DragPayload> {
        if self.rename.is_editing() {
            tracing::debug!(url = %self.node.url(), "drag refused while renaming");
            return None;
        }
        Some(self.drag.begin_drag(&self.node))
    }

    pub fn end_drag(&mut self) {
        self.drag.end_drag();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Drop `payloads` onto this cell. File cells never accept.
    pub fn accept_drop(&self, payloads: &[DragPayload]) -> DropOutcome {
        self.drag.accept_drop(payloads, &self.node)
    }

    /// A tap on the cell: files open in the current tab. Folders toggle in
    /// the tree instead, so they yield nothing here.
    pub fn open(&self) -> Option<ExplorerCommand> {
        if self.node.is_folder() {
            return None;
        }
        Some(ExplorerCommand::Open {
            url: self.node.url().clone(),
            new_tab: false,
        })
    }

    pub fn view(&self, ctx: &ExplorerContext) -> CellView {
        CellView {
            name: self.node.name().to_owned(),
            is_folder: self.node.is_folder(),
            git_status: ctx.status_of(self.node.url()),
            renaming: self.rename.is_editing(),
            draft: self.rename.draft().map(str::to_owned),
            selection_all: self.rename.has_full_selection(),
        }
    }
}
