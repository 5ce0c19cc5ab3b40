use crate::command::ExplorerCommand;
use crate::locator::{Locator, LocatorError};
use crate::node::NodeIdentity;

/// Opaque reference carried from a drag source to a drop target.
///
/// Payloads can also originate outside the tree (another pane, another
/// application), so they hold raw text and are resolved only on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload(String);

impl DragPayload {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_raw(&self) -> &str {
        &self.0
    }

    pub fn resolve(&self) -> Result<Locator, LocatorError> {
        Locator::parse(&self.0)
    }
}

/// Why a payload in a drop was not turned into a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropSkip {
    /// The payload did not resolve to a locator.
    Unresolved(String),
    /// The target folder is the source itself or lies inside it.
    IntoOwnSubtree(Locator),
}

/// Result of a drop: the copy requests to issue plus what was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    pub commands: Vec<ExplorerCommand>,
    pub skipped: Vec<DropSkip>,
}

impl DropOutcome {
    /// A drop is handled when at least one payload was accepted.
    pub fn handled(&self) -> bool {
        !self.commands.is_empty()
    }
}

/// Drag source for every cell, drop target for folder cells.
///
/// Whether an accepted drop copies or moves is up to storage; this only
/// produces `Copy { source, destination }` requests.
#[derive(Debug, Clone, Default)]
pub struct DragDropController {
    active: Option<DragPayload>,
}

impl DragDropController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or continue) dragging `node`. Repeated calls during one gesture
    /// return an equivalent payload.
    pub fn begin_drag(&mut self, node: &NodeIdentity) -> DragPayload {
        if let Some(active) = &self.active
            && active.as_raw() == node.url().as_str()
        {
            return active.clone();
        }
        tracing::debug!(url = %node.url(), "drag started");
        let payload = DragPayload::from_raw(node.url().as_str());
        self.active = Some(payload.clone());
        payload
    }

    /// The gesture was released, wherever it landed.
    pub fn end_drag(&mut self) {
        self.active = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Accept `payloads` dropped onto `into`.
    ///
    /// Each payload is judged on its own: a bad one is skipped without
    /// blocking the rest. Dropping a folder into itself or its own subtree
    /// is refused here rather than left to storage.
    pub fn accept_drop(&self, payloads: &[DragPayload], into: &NodeIdentity) -> DropOutcome {
        let mut outcome = DropOutcome::default();

        if !into.is_folder() {
            tracing::warn!(target_url = %into.url(), "drop offered to a file cell, rejecting");
            return outcome;
        }

        for payload in payloads {
            let source = match payload.resolve() {
                Ok(source) => source,
                Err(e) => {
                    tracing::debug!(raw = payload.as_raw(), error = %e, "skipping unresolved drop payload");
                    outcome
                        .skipped
                        .push(DropSkip::Unresolved(payload.as_raw().to_owned()));
                    continue;
                }
            };

            if source.last_segment().is_none() {
                outcome
                    .skipped
                    .push(DropSkip::Unresolved(payload.as_raw().to_owned()));
                continue;
            }

            let folder = into.url();
            if source.canonical() == folder.canonical() || source.is_ancestor_of(folder) {
                tracing::debug!(source = %source, target_url = %folder, "refusing drop into own subtree");
                outcome.skipped.push(DropSkip::IntoOwnSubtree(source));
                continue;
            }

            let destination = folder.join(&source.display_name());

            tracing::info!(source = %source, destination = %destination, "drop accepted");
            outcome.commands.push(ExplorerCommand::Copy {
                source,
                destination,
            });
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{loc, sample_workspace};

    fn folder(raw: &str) -> NodeIdentity {
        NodeIdentity::folder(loc(raw), vec![])
    }

    #[test]
    fn payload_resolves_back_to_url() {
        let mut dnd = DragDropController::new();
        for raw in ["/proj/src/a.txt", "/proj/src", "file:///proj/my%20file.txt"] {
            let node = NodeIdentity::file(loc(raw));
            let payload = dnd.begin_drag(&node);
            assert_eq!(payload.resolve().unwrap(), loc(raw));
            dnd.end_drag();
        }
    }

    #[test]
    fn begin_drag_is_idempotent_within_gesture() {
        let mut dnd = DragDropController::new();
        let node = NodeIdentity::file(loc("/proj/a.txt"));
        let first = dnd.begin_drag(&node);
        let second = dnd.begin_drag(&node);
        assert_eq!(first, second);
        assert!(dnd.is_dragging());
        dnd.end_drag();
        assert!(!dnd.is_dragging());
    }

    #[test]
    fn partial_acceptance_skips_garbage() {
        let dnd = DragDropController::new();
        let payloads = vec![
            DragPayload::from_raw("/other/x.txt"),
            DragPayload::from_raw("garbage"),
        ];
        let outcome = dnd.accept_drop(&payloads, &folder("/proj"));

        assert!(outcome.handled());
        assert_eq!(
            outcome.commands,
            vec![ExplorerCommand::Copy {
                source: loc("/other/x.txt"),
                destination: loc("/proj/x.txt"),
            }]
        );
        assert_eq!(outcome.skipped, vec![DropSkip::Unresolved("garbage".into())]);
    }

    #[test]
    fn all_garbage_is_not_handled() {
        let dnd = DragDropController::new();
        let outcome = dnd.accept_drop(&[DragPayload::from_raw("")], &folder("/proj"));
        assert!(!outcome.handled());
    }

    #[test]
    fn drop_on_file_is_rejected() {
        let dnd = DragDropController::new();
        let target = NodeIdentity::file(loc("/proj/a.txt"));
        let outcome = dnd.accept_drop(&[DragPayload::from_raw("/other/x.txt")], &target);
        assert!(!outcome.handled());
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn dragging_file_to_workspace_root_copies_it() {
        let tree = sample_workspace();
        let file = tree.find(&loc("/proj/src/a.txt")).unwrap();
        let mut dnd = DragDropController::new();

        let payload = dnd.begin_drag(file);
        let outcome = dnd.accept_drop(&[payload], &tree);

        assert_eq!(
            outcome.commands,
            vec![ExplorerCommand::Copy {
                source: loc("/proj/src/a.txt"),
                destination: loc("/proj/a.txt"),
            }]
        );
    }

    #[test]
    fn folder_into_itself_or_descendant_is_refused() {
        let dnd = DragDropController::new();
        let payload = DragPayload::from_raw("/proj/src");

        let onto_self = dnd.accept_drop(&[payload.clone()], &folder("/proj/src"));
        assert!(!onto_self.handled());
        assert_eq!(onto_self.skipped, vec![DropSkip::IntoOwnSubtree(loc("/proj/src"))]);

        let into_child = dnd.accept_drop(&[payload], &folder("/proj/src/nested"));
        assert!(!into_child.handled());
    }

    #[test]
    fn drop_into_current_parent_is_left_to_storage() {
        let dnd = DragDropController::new();
        let outcome = dnd.accept_drop(
            &[DragPayload::from_raw("/proj/src/a.txt")],
            &folder("/proj/src"),
        );
        assert!(outcome.handled());
        assert_eq!(
            outcome.commands,
            vec![ExplorerCommand::Copy {
                source: loc("/proj/src/a.txt"),
                destination: loc("/proj/src/a.txt"),
            }]
        );
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn spaced_name_under_file_url_round_trips_through_drop() {
        let root = loc("file:///proj");
        let file = NodeIdentity::file(root.join("my notes.md"));
        let mut dnd = DragDropController::new();

        let payload = dnd.begin_drag(&file);
        assert_eq!(payload.resolve().unwrap(), *file.url());

        let target = NodeIdentity::folder(root.join("docs"), vec![]);
        let outcome = dnd.accept_drop(&[payload], &target);
        assert_eq!(
            outcome.commands,
            vec![ExplorerCommand::Copy {
                source: loc("file:///proj/my%20notes.md"),
                destination: loc("file:///proj/docs/my%20notes.md"),
            }]
        );
    }

    #[test]
    fn remote_name_is_decoded_into_local_folder() {
        let dnd = DragDropController::new();
        let outcome = dnd.accept_drop(
            &[DragPayload::from_raw("sftp://host/srv/my%20notes.md")],
            &folder("/proj"),
        );
        assert_eq!(
            outcome.commands,
            vec![ExplorerCommand::Copy {
                source: loc("sftp://host/srv/my%20notes.md"),
                destination: loc("/proj/my notes.md"),
            }]
        );
    }

    #[test]
    fn similarly_named_sibling_is_not_a_descendant() {
        let dnd = DragDropController::new();
        let outcome = dnd.accept_drop(&[DragPayload::from_raw("/proj/src")], &folder("/proj/srcs"));
        assert!(outcome.handled());
    }
}
