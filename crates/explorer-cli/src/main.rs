mod commands;
mod config;
mod editor;
mod git;
mod logging;
mod storage;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use explorer::{ExplorerCommand, Locator, UiStateStore, copy_into_folder};
use explorer_store::SqliteUiStateStore;
use explorer_tui::{Collaborators, StatusFn, TuiOptions};

use crate::config::AppConfig;
use crate::editor::LocalEditor;
use crate::storage::LocalWorkspace;

#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Browse and manage a workspace file tree")]
struct Cli {
    /// Workspace root (defaults to the configured root, then the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,
    /// Config file (defaults to ~/.config/workspace-explorer/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Launch the interactive explorer
    Tui,
    /// Print the workspace tree with source-control badges
    Tree {
        /// Include dot-files
        #[arg(long)]
        hidden: bool,
    },
    /// List the context-menu actions offered for an entry
    Actions {
        /// File, folder, or URL (a trailing `/` marks a remote folder)
        path: String,
        /// Treat this file as selected for compare
        #[arg(long)]
        compare_with: Option<String>,
    },
    /// Rename an entry in place
    Rename { path: String, new_name: String },
    /// Copy an entry into a folder
    Copy {
        source: String,
        destination_folder: String,
    },
    /// Create a sibling copy of an entry
    Duplicate { path: String },
    /// Delete an entry
    Delete { path: String },
    /// Create an untitled file inside a folder
    NewFile { folder: String },
    /// Create an untitled folder inside a folder
    NewFolder { folder: String },
    /// Print an entry's path relative to another file's folder
    Relative {
        path: String,
        /// The file the path is relative to
        #[arg(long)]
        from: String,
    },
}

fn workspace_root(cli: &Cli, config: &AppConfig) -> Result<Locator> {
    let path = match cli.root.clone().or_else(|| config.root.clone()) {
        Some(path) => path,
        None => std::env::current_dir().context("could not determine current directory")?,
    };
    commands::locate(&path.to_string_lossy())
}

fn ui_state_store(config: &AppConfig) -> Result<Arc<dyn UiStateStore>> {
    if let Some(path) = config.database_path() {
        match SqliteUiStateStore::open(&path) {
            Ok(store) => return Ok(Arc::new(store)),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "state database unavailable, panel width will not persist");
            }
        }
    }
    let store = SqliteUiStateStore::open_in_memory().map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(Arc::new(store))
}

async fn run_tui(root: Locator, config: &AppConfig) -> Result<()> {
    let status: StatusFn = Box::new(|root| Box::pin(git::snapshot(root)));
    let collaborators = Collaborators {
        storage: Arc::new(LocalWorkspace::new()),
        editor: Arc::new(LocalEditor::new()),
        ui_state: ui_state_store(config)?,
        status,
    };
    let options = TuiOptions {
        root,
        show_hidden: config.show_hidden,
        panel: config.panel.to_panel_config(),
    };
    explorer_tui::run(collaborators, options).await
}

async fn run_op(command: ExplorerCommand) -> Result<()> {
    commands::ops::run(command, &LocalWorkspace::new(), &LocalEditor::new()).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Command::Tui) {
        logging::init_file(config::data_dir().as_deref());
    } else {
        logging::init_stderr();
    }
    let config = config::load_config(cli.config.as_deref());

    match &cli.command {
        Command::Tui => {
            let root = workspace_root(&cli, &config)?;
            run_tui(root, &config).await
        }
        Command::Tree { hidden } => {
            let root = workspace_root(&cli, &config)?;
            let snapshot = git::snapshot(root.clone()).await;
            commands::tree::run(
                &LocalWorkspace::new(),
                &root,
                *hidden || config.show_hidden,
                snapshot,
            )
            .await
        }
        Command::Actions { path, compare_with } => {
            let node = commands::actions::identify(path, commands::locate(path)?)?;
            let compare_with = compare_with.as_deref().map(commands::locate).transpose()?;
            commands::actions::run(&node, compare_with)
        }
        Command::Rename { path, new_name } => {
            run_op(ExplorerCommand::Rename {
                url: commands::locate(path)?,
                new_name: new_name.clone(),
            })
            .await
        }
        Command::Copy {
            source,
            destination_folder,
        } => {
            let node = commands::actions::identify(source, commands::locate(source)?)?;
            let folder = commands::locate(destination_folder)?;
            run_op(copy_into_folder(&node, &folder)).await
        }
        Command::Duplicate { path } => {
            run_op(ExplorerCommand::Duplicate(commands::locate(path)?)).await
        }
        Command::Delete { path } => run_op(ExplorerCommand::Delete(commands::locate(path)?)).await,
        Command::NewFile { folder } => {
            run_op(ExplorerCommand::CreateFile(commands::locate(folder)?)).await
        }
        Command::NewFolder { folder } => {
            run_op(ExplorerCommand::CreateFolder(commands::locate(folder)?)).await
        }
        Command::Relative { path, from } => {
            let node = commands::actions::identify(path, commands::locate(path)?)?;
            commands::relative::run(&node, commands::locate(from)?)
        }
    }
}
