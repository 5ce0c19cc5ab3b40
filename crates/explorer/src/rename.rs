//! Inline rename for a single tree cell.
//!
//! The controller starts `Idle`, bound to the node's display name. Only an
//! explicit [`RenameController::begin_rename`] moves it to `Editing`; taps
//! open the node instead. Commit hands back a rename command and returns to
//! `Idle` immediately, so a storage failure never has to be reconciled here.

use crate::command::ExplorerCommand;
use crate::locator::Locator;
use crate::node::NodeIdentity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameState {
    Idle,
    Editing { draft: String },
}

/// Text-input focus for the rename field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusState {
    Unfocused,
    /// Requested, waiting for the triggering overlay to finish closing.
    Pending,
    Focused,
}

#[derive(Debug, Clone)]
pub struct RenameController {
    url: Locator,
    name: String,
    state: RenameState,
    focus: FocusState,
    select_all: bool,
}

impl RenameController {
    pub fn new(node: &NodeIdentity) -> Self {
        Self {
            url: node.url().clone(),
            name: node.name().to_owned(),
            state: RenameState::Idle,
            focus: FocusState::Unfocused,
            select_all: false,
        }
    }

    pub fn state(&self) -> &RenameState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, RenameState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            RenameState::Editing { draft } => Some(draft),
            RenameState::Idle => None,
        }
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    /// True while the whole draft is selected, so the next keystroke replaces it.
    pub fn has_full_selection(&self) -> bool {
        self.select_all
    }

    /// The node's current display name (never the draft).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Point the controller at a refreshed node with the same locator.
    ///
    /// An in-progress draft is kept; only the name used for reset changes.
    pub fn rebind(&mut self, node: &NodeIdentity) {
        self.url = node.url().clone();
        self.name = node.name().to_owned();
    }

    /// Enter edit mode seeded with the current name. Focus stays pending until
    /// [`Self::overlay_dismissed`] is reported.
    pub fn begin_rename(&mut self) -> bool {
        if self.is_editing() {
            tracing::debug!(url = %self.url, "begin_rename ignored: already editing");
            return false;
        }
        tracing::debug!(url = %self.url, "rename started");
        self.state = RenameState::Editing {
            draft: self.name.clone(),
        };
        self.focus = FocusState::Pending;
        self.select_all = false;
        true
    }

    /// The menu or overlay that triggered the rename has fully closed.
    ///
    /// Acquires focus and selects the whole draft. Stale signals (no longer
    /// editing, or focus already taken) are ignored.
    pub fn overlay_dismissed(&mut self) -> bool {
        if !self.is_editing() || self.focus != FocusState::Pending {
            return false;
        }
        self.focus = FocusState::Focused;
        self.select_all = true;
        true
    }

    /// Replace the draft wholesale.
    pub fn update_draft(&mut self, text: impl Into<String>) {
        if let RenameState::Editing { draft } = &mut self.state {
            *draft = text.into();
            self.select_all = false;
        } else {
            tracing::debug!(url = %self.url, "update_draft ignored: not editing");
        }
    }

    /// Type one character, replacing the draft if it is fully selected.
    pub fn insert_char(&mut self, c: char) {
        if let RenameState::Editing { draft } = &mut self.state {
            if self.select_all {
                draft.clear();
                self.select_all = false;
            }
            draft.push(c);
        }
    }

    /// Delete the last character, or everything if the draft is fully selected.
    pub fn backspace(&mut self) {
        if let RenameState::Editing { draft } = &mut self.state {
            if self.select_all {
                draft.clear();
                self.select_all = false;
            } else {
                draft.pop();
            }
        }
    }

    /// Empty the draft ("clear and retype"). Not a cancel.
    pub fn clear_draft(&mut self) {
        if let RenameState::Editing { draft } = &mut self.state {
            draft.clear();
            self.select_all = false;
        } else {
            tracing::debug!(url = %self.url, "clear_draft ignored: not editing");
        }
    }

    /// Finish editing. Returns the rename request, or `None` if the draft
    /// still equals the original name. Focus is released either way.
    pub fn commit(&mut self) -> Option<ExplorerCommand> {
        let RenameState::Editing { draft } =
            std::mem::replace(&mut self.state, RenameState::Idle)
        else {
            tracing::debug!(url = %self.url, "commit ignored: not editing");
            return None;
        };
        self.release_focus();

        if draft == self.name {
            tracing::debug!(url = %self.url, "rename committed unchanged, treated as cancel");
            return None;
        }

        tracing::info!(url = %self.url, new_name = %draft, "rename committed");
        Some(ExplorerCommand::Rename {
            url: self.url.clone(),
            new_name: draft,
        })
    }

    /// Abandon editing (e.g. the keyboard went away). Safe from `Idle`.
    pub fn cancel(&mut self) {
        if self.is_editing() {
            tracing::debug!(url = %self.url, "rename cancelled");
        }
        self.state = RenameState::Idle;
        self.release_focus();
    }

    fn release_focus(&mut self) {
        self.focus = FocusState::Unfocused;
        self.select_all = false;
    }
}
