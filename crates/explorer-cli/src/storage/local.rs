use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use explorer::{CollaboratorError, Locator, NodeIdentity, WorkspaceStorage};
use walkdir::{DirEntry, WalkDir};

/// Workspace storage on the local filesystem.
///
/// Only local locators (bare paths and `file:` URLs) are served; anything
/// else is `Unsupported`. Copies never overwrite.
#[derive(Debug, Clone, Default)]
pub struct LocalWorkspace;

impl LocalWorkspace {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl WorkspaceStorage for LocalWorkspace {
    async fn list_tree(
        &self,
        root: &Locator,
        show_hidden: bool,
    ) -> Result<NodeIdentity, CollaboratorError> {
        let root = root.clone();
        blocking(move || {
            let path = local_path(&root)?;
            let meta = fs::metadata(&path).map_err(|e| io_error(&root, e))?;
            if !meta.is_dir() {
                return Ok(NodeIdentity::file(root));
            }
            let children = read_children(&root, &path, show_hidden, true)?;
            let tree = NodeIdentity::folder(root, children);
            tracing::debug!(root = %tree.url(), entries = tree.count(), "listed workspace");
            Ok(tree)
        })
        .await
    }

    async fn list_folder(
        &self,
        folder: &Locator,
        show_hidden: bool,
    ) -> Result<Vec<NodeIdentity>, CollaboratorError> {
        let folder = folder.clone();
        blocking(move || {
            let path = local_path(&folder)?;
            let meta = fs::metadata(&path).map_err(|e| io_error(&folder, e))?;
            if !meta.is_dir() {
                return Err(CollaboratorError::Unsupported(format!(
                    "{folder} is not a folder"
                )));
            }
            let children = read_children(&folder, &path, show_hidden, false)?;
            tracing::trace!(%folder, entries = children.len(), "listed folder");
            Ok(children)
        })
        .await
    }

    async fn rename_entry(
        &self,
        url: &Locator,
        new_name: &str,
    ) -> Result<Locator, CollaboratorError> {
        let url = url.clone();
        let new_name = new_name.to_owned();
        blocking(move || {
            validate_name(&new_name)?;
            let from = local_path(&url)?;
            let parent = url
                .parent()
                .ok_or_else(|| CollaboratorError::Other("cannot rename the filesystem root".into()))?;
            let target = parent.join(&new_name);
            if target == url {
                return Ok(target);
            }
            let to = local_path(&target)?;
            if exists(&to) {
                return Err(CollaboratorError::AlreadyExists(target));
            }
            fs::rename(&from, &to).map_err(|e| io_error(&url, e))?;
            tracing::info!(from = %url, to = %target, "renamed");
            Ok(target)
        })
        .await
    }

    async fn copy_entry(
        &self,
        source: &Locator,
        destination: &Locator,
    ) -> Result<(), CollaboratorError> {
        let source = source.clone();
        let destination = destination.clone();
        blocking(move || {
            let from = local_path(&source)?;
            let to = local_path(&destination)?;
            if !exists(&from) {
                return Err(CollaboratorError::NotFound(source));
            }
            if exists(&to) {
                return Err(CollaboratorError::AlreadyExists(destination));
            }
            if source.canonical() == destination.canonical()
                || source.is_ancestor_of(&destination)
            {
                return Err(CollaboratorError::Other(format!(
                    "cannot copy {} into itself",
                    source.display_name()
                )));
            }
            copy_recursive(&from, &to).map_err(|e| io_error(&destination, e))?;
            tracing::info!(%source, %destination, "copied");
            Ok(())
        })
        .await
    }

    async fn duplicate_entry(&self, url: &Locator) -> Result<Locator, CollaboratorError> {
        let url = url.clone();
        blocking(move || {
            let from = local_path(&url)?;
            let meta = fs::symlink_metadata(&from).map_err(|e| io_error(&url, e))?;
            let parent = url
                .parent()
                .ok_or_else(|| CollaboratorError::Other("cannot duplicate the filesystem root".into()))?;
            let parent_path = local_path(&parent)?;

            let name = url.display_name();
            let (stem, ext) = if meta.is_dir() {
                (name.as_str(), "")
            } else {
                split_extension(&name)
            };
            let copy_name = unique_name(&parent_path, &format!("{stem} copy"), ext);
            let target = parent.join(&copy_name);

            copy_recursive(&from, &parent_path.join(&copy_name))
                .map_err(|e| io_error(&target, e))?;
            tracing::info!(source = %url, copy = %target, "duplicated");
            Ok(target)
        })
        .await
    }

    async fn delete_entry(&self, url: &Locator) -> Result<(), CollaboratorError> {
        let url = url.clone();
        blocking(move || {
            let path = local_path(&url)?;
            let meta = fs::symlink_metadata(&path).map_err(|e| io_error(&url, e))?;
            let removed = if meta.is_dir() {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| io_error(&url, e))?;
            tracing::info!(%url, "deleted");
            Ok(())
        })
        .await
    }

    async fn create_file(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        let parent = parent.clone();
        blocking(move || {
            let dir = local_path(&parent)?;
            let name = unique_name(&dir, "untitled", "");
            fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(dir.join(&name))
                .map_err(|e| io_error(&parent, e))?;
            Ok(parent.join(&name))
        })
        .await
    }

    async fn create_folder(&self, parent: &Locator) -> Result<Locator, CollaboratorError> {
        let parent = parent.clone();
        blocking(move || {
            let dir = local_path(&parent)?;
            let name = unique_name(&dir, "untitled folder", "");
            fs::create_dir(dir.join(&name)).map_err(|e| io_error(&parent, e))?;
            Ok(parent.join(&name))
        })
        .await
    }
}

async fn blocking<T, F>(f: F) -> Result<T, CollaboratorError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CollaboratorError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Err(CollaboratorError::Other(format!("Task panicked: {e}"))))
}

fn local_path(url: &Locator) -> Result<PathBuf, CollaboratorError> {
    url.to_path()
        .ok_or_else(|| CollaboratorError::Unsupported(format!("{url} is not on this machine")))
}

fn io_error(url: &Locator, e: io::Error) -> CollaboratorError {
    match e.kind() {
        io::ErrorKind::NotFound => CollaboratorError::NotFound(url.clone()),
        io::ErrorKind::AlreadyExists => CollaboratorError::AlreadyExists(url.clone()),
        io::ErrorKind::PermissionDenied => CollaboratorError::PermissionDenied(url.clone()),
        _ => CollaboratorError::Io(e),
    }
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Folders first, then case-insensitive by name.
fn folders_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    b.file_type()
        .is_dir()
        .cmp(&a.file_type().is_dir())
        .then_with(|| {
            let a = a.file_name().to_string_lossy().to_lowercase();
            let b = b.file_name().to_string_lossy().to_lowercase();
            a.cmp(&b)
        })
}

/// Children of the folder at `path`. With `deep`, child folders carry their
/// own subtrees; otherwise they come back empty.
fn read_children(
    url: &Locator,
    path: &Path,
    show_hidden: bool,
    deep: bool,
) -> Result<Vec<NodeIdentity>, CollaboratorError> {
    let mut children = Vec::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by(folders_first)
        .into_iter()
        .filter_entry(|e| show_hidden || !is_hidden(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(folder = %url, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let child = url.join(&entry.file_name().to_string_lossy());
        if !entry.file_type().is_dir() {
            children.push(NodeIdentity::file(child));
        } else if deep {
            let grandchildren = read_children(&child, entry.path(), show_hidden, true)?;
            children.push(NodeIdentity::folder(child, grandchildren));
        } else {
            children.push(NodeIdentity::folder(child, Vec::new()));
        }
    }

    Ok(children)
}

fn copy_recursive(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = if relative.as_os_str().is_empty() {
            to.to_path_buf()
        } else {
            to.join(relative)
        };
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), CollaboratorError> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(CollaboratorError::Other(format!("invalid name: {name:?}")));
    }
    Ok(())
}

/// `"a.txt"` → `("a", ".txt")`. Dotfiles and extensionless names keep
/// everything in the stem.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(dot) => name.split_at(dot),
    }
}

/// First of `base`, `base 2`, `base 3`, … (with `ext`) not taken in `dir`.
fn unique_name(dir: &Path, base: &str, ext: &str) -> String {
    let first = format!("{base}{ext}");
    if !exists(&dir.join(&first)) {
        return first;
    }
    (2..)
        .map(|n| format!("{base} {n}{ext}"))
        .find(|candidate| !exists(&dir.join(candidate)))
        .unwrap_or(first)
}
