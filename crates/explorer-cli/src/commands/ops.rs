use anyhow::{Result, bail};
use explorer::{EditorHost, ExplorerCommand, WorkspaceStorage, execute};

use super::print_feedback;

/// Run one explorer command against the local collaborators and report the
/// outcome. A failed command becomes the process error.
pub async fn run(
    command: ExplorerCommand,
    storage: &dyn WorkspaceStorage,
    editor: &dyn EditorHost,
) -> Result<()> {
    let Some(feedback) = execute(&command, storage, editor).await else {
        return Ok(());
    };
    if feedback.is_error() {
        bail!("{} failed: {}", command.verb(), feedback.message());
    }
    print_feedback(&feedback);
    Ok(())
}
