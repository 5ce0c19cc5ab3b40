use anyhow::{Result, bail};
use explorer::{ExplorerCommand, ExplorerContext, Locator, MenuAction, MenuOutcome, NodeIdentity, dispatch};

/// Path of `node` relative to the folder holding `from`, the way "Copy
/// Relative Path" computes it with `from` open in the editor.
pub fn relative_path(node: &NodeIdentity, from: Locator) -> Result<String> {
    let mut ctx = ExplorerContext::new();
    ctx.active_editor = Some(from.clone());

    match dispatch(MenuAction::CopyRelativePath, node, &mut ctx) {
        MenuOutcome::Command(ExplorerCommand::CopyToClipboard(path)) => Ok(path),
        _ => bail!("No relative path from {from} to {}", node.url()),
    }
}

pub fn run(node: &NodeIdentity, from: Locator) -> Result<()> {
    println!("{}", relative_path(node, from)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use explorer::test_support::loc;

    use super::*;

    #[test]
    fn relative_to_sibling_folder() {
        let node = NodeIdentity::file(loc("/proj/src/a.txt"));
        let path = relative_path(&node, loc("/proj/docs/readme.md")).unwrap();
        assert_eq!(path, "../src/a.txt");
    }

    #[test]
    fn different_origin_is_an_error() {
        let node = NodeIdentity::file(loc("sftp://host/srv/a.txt"));
        assert!(relative_path(&node, loc("/proj/readme.md")).is_err());
    }
}
