use anyhow::{Result, bail};
use explorer::{ExplorerContext, Locator, NodeIdentity, available_actions};

/// Identify the entry behind `raw`. Local paths are checked on disk; a remote
/// URL counts as a folder when written with a trailing `/`.
pub fn identify(raw: &str, url: Locator) -> Result<NodeIdentity> {
    let is_folder = match url.to_path() {
        Some(path) => match std::fs::metadata(&path) {
            Ok(meta) => meta.is_dir(),
            Err(_) => bail!("No such file or folder: {}", path.display()),
        },
        None => raw.ends_with('/'),
    };
    Ok(if is_folder {
        NodeIdentity::folder(url, Vec::new())
    } else {
        NodeIdentity::file(url)
    })
}

pub fn run(node: &NodeIdentity, compare_with: Option<Locator>) -> Result<()> {
    for line in lines(node, compare_with) {
        println!("{line}");
    }
    Ok(())
}

fn lines(node: &NodeIdentity, compare_with: Option<Locator>) -> Vec<String> {
    let mut ctx = ExplorerContext::new();
    if let Some(selected) = compare_with {
        ctx.compare.set(selected);
    }

    available_actions(node, &ctx.compare)
        .into_iter()
        .map(|action| {
            let marker = if action.is_destructive() { "!" } else { " " };
            format!("{marker} {}", action.label(node))
        })
        .collect()
}
