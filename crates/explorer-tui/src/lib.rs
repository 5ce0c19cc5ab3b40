pub mod action;
pub mod app;
pub mod tree;
mod render;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crossterm::ExecutableCommand;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use explorer::{
    EditorHost, ExplorerCommand, Locator, NodeIdentity, PanelState, StatusSnapshot, UiStateStore,
    WorkspaceStorage, try_execute,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};

use crate::action::{Action, AppCommand};
use crate::app::{App, PanelConfig};

/// Lines of a file shown in the editor pane.
const PREVIEW_LINES: usize = 200;

/// Callback the host provides to read source-control status for a root.
pub type StatusFn =
    Box<dyn Fn(Locator) -> Pin<Box<dyn Future<Output = StatusSnapshot> + Send>> + Send + Sync>;

/// Everything the explorer talks to outside itself.
pub struct Collaborators {
    pub storage: Arc<dyn WorkspaceStorage>,
    pub editor: Arc<dyn EditorHost>,
    pub ui_state: Arc<dyn UiStateStore>,
    pub status: StatusFn,
}

/// Startup options from the host's configuration.
#[derive(Debug, Clone)]
pub struct TuiOptions {
    pub root: Locator,
    pub show_hidden: bool,
    pub panel: PanelConfig,
}

/// Launch the interactive TUI. Returns when the user quits.
pub async fn run(collaborators: Collaborators, options: TuiOptions) -> anyhow::Result<()> {
    // Load initial data.
    let state = match collaborators.ui_state.load().await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(error = %e, "could not load panel state, using defaults");
            PanelState::default()
        }
    };
    let children = collaborators
        .storage
        .list_folder(&options.root, options.show_hidden)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list {}: {e}", options.root))?;
    let tree = NodeIdentity::folder(options.root.clone(), children);

    let app = App::new(tree, state, options.panel).with_hidden(options.show_hidden);

    // Terminal setup.
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, collaborators, app).await;

    // Terminal teardown (always runs).
    disable_raw_mode()?;
    std::io::stdout().execute(DisableMouseCapture)?;
    std::io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    collaborators: Collaborators,
    mut app: App,
) -> anyhow::Result<()> {
    use futures::StreamExt;

    let Collaborators {
        storage,
        editor,
        ui_state,
        status,
    } = collaborators;
    let status = Arc::new(status);
    app.ctx.active_editor = editor.active_editor();

    let (action_tx, mut action_rx) = mpsc::channel::<Action>(32);
    let mut event_stream = EventStream::new();
    let mut tick_interval = interval(Duration::from_millis(250));

    spawn_status(&status, app.root.clone(), &action_tx);

    loop {
        // Compute layout geometry for mouse hit testing before render.
        let size = terminal.size()?;
        let frame_rect = ratatui::layout::Rect::new(0, 0, size.width, size.height);
        app.set_layout(render::compute_layout(frame_rect, &app));

        // Render.
        terminal.draw(|frame| render::render(frame, &app))?;

        // Wait for next event.
        let command = tokio::select! {
            Some(event_result) = event_stream.next() => {
                match event_result {
                    Ok(event) => {
                        // Filter events: only key press (not release/repeat) and mouse events.
                        match &event {
                            Event::Key(key) if key.kind != KeyEventKind::Press => continue,
                            Event::Key(_) | Event::Mouse(_) => {}
                            _ => continue,
                        }
                        app.handle_event(event)
                    }
                    Err(_) => continue,
                }
            }
            Some(action) = action_rx.recv() => {
                app.handle_action(action)
            }
            _ = tick_interval.tick() => {
                app.tick();
                AppCommand::None
            }
        };

        // Execute side effects.
        match command {
            AppCommand::None => {}
            AppCommand::Quit => break,
            AppCommand::Execute(command) if runs_on_loop(&command) => {
                let follow_up = app.handle_action(run_command(&*storage, &*editor, command).await);
                if !matches!(follow_up, AppCommand::None) {
                    tracing::debug!(?follow_up, "follow-up of an inline command dropped");
                }
            }
            AppCommand::Execute(command) => {
                spawn_execute(&storage, &editor, command, &action_tx);
            }
            AppCommand::ExecuteAll(commands) => {
                for command in commands {
                    spawn_execute(&storage, &editor, command, &action_tx);
                }
            }
            AppCommand::ReloadTree(root) => {
                for folder in app.tree.open_folders() {
                    spawn_list(&storage, folder, app.show_hidden, &action_tx);
                }
                spawn_status(&status, root, &action_tx);
            }
            AppCommand::ListFolders(folders) => {
                for folder in folders {
                    spawn_list(&storage, folder, app.show_hidden, &action_tx);
                }
            }
            AppCommand::LoadPreview(url) => {
                let tx = action_tx.clone();
                tokio::spawn(async move {
                    let path = url.to_path();
                    let result = tokio::task::spawn_blocking(move || read_preview(path))
                        .await
                        .unwrap_or_else(|e| Err(format!("Task panicked: {e}")));
                    let _ = tx.send(Action::PreviewLoaded(url, result)).await;
                });
            }
            AppCommand::SaveWidth(width) => {
                let ui_state = Arc::clone(&ui_state);
                let tx = action_tx.clone();
                tokio::spawn(async move {
                    let result = ui_state.save_width(width).await.map_err(|e| format!("{e}"));
                    let _ = tx.send(Action::Persisted(result)).await;
                });
            }
            AppCommand::SaveTab(tab) => {
                let ui_state = Arc::clone(&ui_state);
                let tx = action_tx.clone();
                tokio::spawn(async move {
                    let result = ui_state.save_tab(tab).await.map_err(|e| format!("{e}"));
                    let _ = tx.send(Action::Persisted(result)).await;
                });
            }
        }
    }

    Ok(())
}

fn spawn_execute(
    storage: &Arc<dyn WorkspaceStorage>,
    editor: &Arc<dyn EditorHost>,
    command: ExplorerCommand,
    tx: &mpsc::Sender<Action>,
) {
    let storage = Arc::clone(storage);
    let editor = Arc::clone(editor);
    let tx = tx.clone();
    tokio::spawn(async move {
        let action = run_command(&*storage, &*editor, command).await;
        let _ = tx.send(action).await;
    });
}

fn spawn_list(
    storage: &Arc<dyn WorkspaceStorage>,
    folder: Locator,
    show_hidden: bool,
    tx: &mpsc::Sender<Action>,
) {
    let storage = Arc::clone(storage);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = storage
            .list_folder(&folder, show_hidden)
            .await
            .map_err(|e| format!("{e}"));
        let _ = tx.send(Action::FolderListed { folder, result }).await;
    });
}

/// Commands that write to the terminal themselves. These run on the event
/// loop between draws so their output cannot land inside a frame.
fn runs_on_loop(command: &ExplorerCommand) -> bool {
    matches!(command, ExplorerCommand::CopyToClipboard(_))
}

async fn run_command(
    storage: &dyn WorkspaceStorage,
    editor: &dyn EditorHost,
    command: ExplorerCommand,
) -> Action {
    tracing::debug!(verb = command.verb(), "executing");
    let outcome = try_execute(&command, storage, editor).await.map_err(|e| {
        tracing::warn!(verb = command.verb(), error = %e, "command failed");
        format!("{} failed: {e}", command.verb())
    });
    Action::Executed {
        command,
        outcome,
        active_editor: editor.active_editor(),
    }
}

fn spawn_status(status: &Arc<StatusFn>, root: Locator, tx: &mpsc::Sender<Action>) {
    let future = (**status)(root);
    let tx = tx.clone();
    tokio::spawn(async move {
        let snapshot = future.await;
        let _ = tx.send(Action::StatusLoaded(snapshot)).await;
    });
}

fn read_preview(path: Option<std::path::PathBuf>) -> Result<Vec<String>, String> {
    let path = path.ok_or_else(|| "Preview is only available for local files".to_owned())?;
    let bytes = std::fs::read(&path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text
        .lines()
        .take(PREVIEW_LINES)
        .map(|line| line.replace('\t', "    "))
        .collect())
}

#[cfg(test)]
mod tests {
    use explorer::test_support::{Call, RecordingEditor, RecordingStorage, loc};

    use super::*;

    #[test]
    fn only_clipboard_writes_run_on_the_loop() {
        assert!(runs_on_loop(&ExplorerCommand::CopyToClipboard("a.txt".into())));
        assert!(!runs_on_loop(&ExplorerCommand::Delete(loc("/proj/a.txt"))));
        assert!(!runs_on_loop(&ExplorerCommand::Open {
            url: loc("/proj/a.txt"),
            new_tab: false,
        }));
    }

    #[tokio::test]
    async fn executed_action_reports_host_active_editor() {
        let storage = RecordingStorage::new();
        let editor = RecordingEditor::new();
        let action = run_command(
            &storage,
            &editor,
            ExplorerCommand::Open {
                url: loc("/proj/README.md"),
                new_tab: false,
            },
        )
        .await;

        let Action::Executed {
            outcome,
            active_editor,
            ..
        } = action
        else {
            panic!("expected an executed action");
        };
        assert!(outcome.is_ok());
        assert_eq!(active_editor, Some(loc("/proj/README.md")));
        assert_eq!(editor.calls(), vec![Call::Open(loc("/proj/README.md"), false)]);
    }

    #[tokio::test]
    async fn failed_command_keeps_previous_active_editor() {
        let storage = RecordingStorage::new();
        storage.fail_with("disk full");
        let editor = RecordingEditor::new();
        editor.set_active(Some(loc("/proj/a.txt")));

        let action = run_command(&storage, &editor, ExplorerCommand::Delete(loc("/proj/b.txt"))).await;
        let Action::Executed {
            outcome,
            active_editor,
            ..
        } = action
        else {
            panic!("expected an executed action");
        };
        assert_eq!(outcome.unwrap_err(), "delete failed: disk full");
        assert_eq!(active_editor, Some(loc("/proj/a.txt")));
    }

    #[test]
    fn preview_reads_first_lines() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "one\n\ttwo\n").unwrap();

        let lines = read_preview(Some(file)).unwrap();
        assert_eq!(lines, vec!["one".to_owned(), "    two".to_owned()]);
    }

    #[test]
    fn preview_of_remote_file_is_an_error() {
        assert!(read_preview(None).is_err());
    }
}
