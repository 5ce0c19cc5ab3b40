pub mod cell;
pub mod collaborator;
pub mod command;
pub mod context;
pub mod drag_drop;
pub mod feedback;
pub mod git_status;
pub mod locator;
pub mod menu;
pub mod node;
pub mod panel;
pub mod rename;
pub mod ui_state;

pub use cell::{CellView, ExplorerCell};
pub use collaborator::{CollaboratorError, EditorHost, WorkspaceStorage};
pub use command::{ExplorerCommand, execute, try_execute};
pub use context::{CompareSelection, ExplorerContext};
pub use drag_drop::{DragDropController, DragPayload, DropOutcome, DropSkip};
pub use feedback::Feedback;
pub use git_status::{GitStatus, SourceControl, StatusSnapshot};
pub use locator::{Locator, LocatorError};
pub use menu::{MenuAction, MenuOutcome, available_actions, copy_into_folder, dispatch};
pub use node::{NodeIdentity, NodeKind};
pub use panel::{ContainerGeometry, PanelLimits, PanelResizer};
pub use rename::{FocusState, RenameController, RenameState};
pub use ui_state::{PanelState, SidebarTab, UiStateStore};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
