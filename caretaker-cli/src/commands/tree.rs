//! `caretaker tree` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use caretaker_tree::{TreeView, build_tree};

use crate::cli::TreeArgs;
use crate::error::CliError;
use crate::loader::load_package;
use crate::output::{OutputWriter, Render};

/// Execute the `tree` command.
pub async fn execute(args: TreeArgs, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %args.path.display(), "building content tree");
    let facts = load_package(&args.path, None).await?;
    let tree = build_tree(&facts)?;

    let view = tree.view();
    writer.render(&TreeReport {
        package: args.path.display().to_string(),
        nodes: view.count(),
        tree: view,
    })
}

#[derive(Serialize)]
pub struct TreeReport {
    pub package: String,
    pub nodes: usize,
    pub tree: TreeView,
}

impl Render for TreeReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "{} ({} nodes)", self.package, self.nodes)?;
        writeln!(w, "{}", self.tree.label)?;
        render_children(w, &self.tree, "")
    }
}

fn render_children(w: &mut dyn Write, node: &TreeView, prefix: &str) -> std::io::Result<()> {
    let last = node.children.len().saturating_sub(1);
    for (i, child) in node.children.iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        writeln!(w, "{prefix}{branch}{} [{}]", child.label, child.id)?;
        render_children(w, child, &format!("{prefix}{indent}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, label: &str) -> TreeView {
        TreeView {
            id: id.to_owned(),
            title: label.to_owned(),
            label: label.to_owned(),
            versioned_library_id: "H5P.Image 1.1".to_owned(),
            children: Vec::new(),
        }
    }

    #[test]
    fn test_render_nested_tree() {
        let mut column = leaf("col-1", "Cells (H5P.Column)");
        column.children = vec![leaf("img-1", "Cell (H5P.Image)")];
        let mut root = leaf("root", "Biology (H5P.InteractiveBook)");
        root.children = vec![column, leaf("img-2", "Map (H5P.Image)")];

        let report = TreeReport {
            package: "pkg".to_owned(),
            nodes: root.count(),
            tree: root,
        };
        let mut buffer = Vec::new();
        report.render_text(&mut buffer).expect("render");
        let text = String::from_utf8(buffer).expect("utf8");

        let expected = "pkg (4 nodes)\n\
                        Biology (H5P.InteractiveBook)\n\
                        ├── Cells (H5P.Column) [col-1]\n\
                        │   └── Cell (H5P.Image) [img-1]\n\
                        └── Map (H5P.Image) [img-2]\n";
        assert_eq!(text, expected);
    }
}
