use anyhow::Result;
use explorer::{ExplorerContext, Locator, NodeIdentity, StatusSnapshot, WorkspaceStorage};

pub async fn run(
    storage: &dyn WorkspaceStorage,
    root: &Locator,
    show_hidden: bool,
    git: StatusSnapshot,
) -> Result<()> {
    let tree = storage
        .list_tree(root, show_hidden)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list {root}: {e}"))?;

    let mut ctx = ExplorerContext::new();
    ctx.git = git;

    let mut lines = Vec::new();
    render(&tree, 0, &ctx, &mut lines);
    for line in &lines {
        println!("{line}");
    }

    let folders = count_folders(&tree).saturating_sub(1);
    let files = tree.count() - folders - 1;
    println!("\n{folders} folders, {files} files");

    Ok(())
}

fn render(node: &NodeIdentity, depth: usize, ctx: &ExplorerContext, out: &mut Vec<String>) {
    let suffix = if node.is_folder() { "/" } else { "" };
    let mut line = format!("{}{}{suffix}", "  ".repeat(depth), node.name());
    if let Some(status) = ctx.status_of(node.url()) {
        line.push_str(&format!("  {}", status.badge()));
    }
    out.push(line);

    for child in node.children() {
        render(child, depth + 1, ctx, out);
    }
}

fn count_folders(node: &NodeIdentity) -> usize {
    usize::from(node.is_folder()) + node.children().iter().map(count_folders).sum::<usize>()
}
