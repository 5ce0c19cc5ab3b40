use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use explorer::{CollaboratorError, EditorHost, Locator};

/// Editor host for the terminal: the TUI's editor pane does the showing, so
/// this keeps track of the active file and handles the host integrations
/// (file manager, clipboard).
#[derive(Debug, Default)]
pub struct LocalEditor {
    active: Mutex<Option<Locator>>,
}

impl LocalEditor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl EditorHost for LocalEditor {
    fn active_editor(&self) -> Option<Locator> {
        self.active.lock().ok().and_then(|active| active.clone())
    }

    async fn open_entry(
        &self,
        url: &Locator,
        force_new_tab: bool,
    ) -> Result<(), CollaboratorError> {
        tracing::info!(%url, force_new_tab, "opening entry");
        let mut active = self
            .active
            .lock()
            .map_err(|_| CollaboratorError::Other("editor state poisoned".into()))?;
        *active = Some(url.clone());
        Ok(())
    }

    async fn compare(&self, left: &Locator, right: &Locator) -> Result<(), CollaboratorError> {
        tracing::info!(%left, %right, "comparing entries");
        Ok(())
    }

    async fn assign_workspace_root(&self, url: &Locator) -> Result<(), CollaboratorError> {
        let path = url
            .to_path()
            .ok_or_else(|| CollaboratorError::Unsupported(format!("{url} is not on this machine")))?;
        if !path.is_dir() {
            return Err(CollaboratorError::NotFound(url.clone()));
        }
        tracing::info!(%url, "workspace root assigned");
        Ok(())
    }

    async fn reveal_in_container_app(&self, url: &Locator) -> Result<(), CollaboratorError> {
        let folder = url.parent().unwrap_or_else(|| url.clone());
        let path = folder
            .to_path()
            .ok_or_else(|| CollaboratorError::Unsupported(format!("{url} is not on this machine")))?;

        Command::new(file_manager())
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        tracing::info!(%url, "revealed in file manager");
        Ok(())
    }

    async fn copy_to_clipboard(&self, text: &str) -> Result<(), CollaboratorError> {
        let mut stdout = std::io::stdout();
        stdout.write_all(osc52_sequence(text).as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

fn file_manager() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(windows) {
        "explorer"
    } else {
        "xdg-open"
    }
}

/// OSC 52 escape sequence, which most modern terminals turn into a
/// clipboard write.
fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}
