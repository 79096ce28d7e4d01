//! Rule module extension point.
//!
//! A [`RuleModule`] reads the content tree through an [`AnalysisContext`] and returns
//! [`Finding`]s. Modules never see each other's output; the engine routes findings into
//! node message bins after every module has run.

use caretaker_core::catalog::Catalog;
use caretaker_core::config::CaretakerConfig;
use caretaker_core::types::{Category, Message, MessageDetails};
use caretaker_tree::content::{Content, NodeId};
use caretaker_tree::path;
use caretaker_tree::{ContentTree, PackageFacts};

use crate::error::RuleError;

/// A message produced by a rule module, optionally addressed to a tree node.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Node whose message bin receives the message; `None` for report-level messages.
    pub node: Option<NodeId>,
    pub message: Message,
}

impl Finding {
    /// A message attached to `node`.
    pub fn on(node: NodeId, message: Message) -> Self {
        Self {
            node: Some(node),
            message,
        }
    }

    /// A message that belongs to no particular node.
    pub fn flat(message: Message) -> Self {
        Self {
            node: None,
            message,
        }
    }
}

/// Read-only inputs shared by all rule modules during one analysis.
pub struct AnalysisContext<'a> {
    pub tree: &'a ContentTree,
    pub facts: &'a PackageFacts,
    pub catalog: &'a dyn Catalog,
    pub config: &'a CaretakerConfig,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        tree: &'a ContentTree,
        facts: &'a PackageFacts,
        catalog: &'a dyn Catalog,
        config: &'a CaretakerConfig,
    ) -> Self {
        Self {
            tree,
            facts,
            catalog,
            config,
        }
    }

    /// Looks up a catalog entry.
    pub fn text(&self, id: &str, args: &[&str]) -> String {
        self.catalog.lookup(id, args)
    }

    /// Standard details for a message about `content`: path, title and sub-content id.
    pub fn details_for(&self, content: &Content) -> MessageDetails {
        let details = MessageDetails::new()
            .with_path(content.semantics_path.as_str())
            .with_title(content.title());
        if content.is_root() {
            details
        } else {
            details.with_sub_content_id(content.id.as_str())
        }
    }

    /// The node owning a parameter location: the one with the longest enclosing path.
    pub fn owner_of(&self, semantics_path: &str) -> NodeId {
        self.tree
            .iter()
            .skip(1)
            .filter(|(_, node)| {
                node.semantics_path == semantics_path
                    || path::is_ancestor(&node.semantics_path, semantics_path)
            })
            .max_by_key(|(_, node)| node.semantics_path.len())
            .map_or(ContentTree::ROOT, |(id, _)| id)
    }
}

/// An independent analyzer producing messages of one category.
///
/// Implementations must be pure with respect to the context: running a module twice on
/// the same inputs yields the same findings.
pub trait RuleModule: Send + Sync {
    /// Module name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Category of every message this module produces.
    fn category(&self) -> Category;

    /// Evaluates the module against the tree.
    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError>;
}
