//! Report aggregation.
//!
//! [`Aggregator`] merges report-level messages and per-node message bins into a [`Report`]:
//! grouped by category in report order, report-level messages first, then node bins in
//! depth-first tree order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use caretaker_core::types::{Category, Level, Message};
use caretaker_tree::{ContentTree, TreeView};

/// Message counts for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    pub by_level: BTreeMap<Level, usize>,
}

/// Final analysis report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub messages: BTreeMap<Category, Vec<Message>>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<TreeView>,
    /// Raw extracted facts, untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl Report {
    /// Messages of one category, in report order.
    pub fn messages_in(&self, category: Category) -> &[Message] {
        self.messages
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All messages, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.summary.total
    }

    pub fn is_empty(&self) -> bool {
        self.summary.total == 0
    }

    /// Highest level among all messages.
    pub fn max_level(&self) -> Option<Level> {
        self.iter().map(|m| m.level).max()
    }

    /// Number of messages at or above `level`.
    pub fn count_at_least(&self, level: Level) -> usize {
        self.iter().filter(|m| m.level >= level).count()
    }

    /// Messages of the given type across all categories.
    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Message> + 'a {
        self.iter().filter(move |m| m.kind == kind)
    }
}

/// Builds reports from module output and node message bins.
#[derive(Debug, Clone)]
pub struct Aggregator {
    categories: Vec<Category>,
    min_level: Level,
}

impl Aggregator {
    pub fn new(categories: Vec<Category>, min_level: Level) -> Self {
        Self {
            categories,
            min_level,
        }
    }

    /// Flattens `flat` messages and the bins of every reachable node into a report.
    ///
    /// Messages below the minimum level or outside the enabled categories are dropped.
    pub fn aggregate(&self, flat: Vec<Message>, tree: &ContentTree) -> Report {
        let mut messages: BTreeMap<Category, Vec<Message>> = self
            .categories
            .iter()
            .map(|c| (*c, Vec::new()))
            .collect();

        let node_messages = tree
            .iter()
            .flat_map(|(_, node)| node.messages.values().flatten().cloned());

        for message in flat.into_iter().chain(node_messages) {
            if message.level < self.min_level {
                continue;
            }
            if let Some(bin) = messages.get_mut(&message.category) {
                bin.push(message);
            }
        }

        let summary = summarize(&messages);
        Report {
            messages,
            summary,
            tree: None,
            raw: None,
        }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(Category::ALL.to_vec(), Level::Info)
    }
}

fn summarize(messages: &BTreeMap<Category, Vec<Message>>) -> Summary {
    let mut summary = Summary::default();
    for (category, bin) in messages {
        summary.by_category.insert(*category, bin.len());
        for message in bin {
            *summary.by_level.entry(message.level).or_default() += 1;
            summary.total += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use caretaker_tree::content::{Content, ContentRole};
    use caretaker_tree::metadata::Metadata;

    fn tree() -> ContentTree {
        let root = Content::new(
            "root",
            ContentRole::Root {
                metadata_settings: None,
            },
            "H5P.Column 1.16",
            "",
            Value::Null,
            Metadata::default(),
        );
        let mut tree = ContentTree::new(root);
        let child = tree.insert(Content::new(
            "a",
            ContentRole::SubContent {
                library_path: "content[0]".to_owned(),
            },
            "H5P.Image 1.1",
            "content[0].params",
            Value::Null,
            Metadata::default(),
        ));
        tree.add_child(ContentTree::ROOT, child);
        if let Some(node) = tree.get_mut(child) {
            node.add_message(Message::new(Category::License, "child", Level::Error, "c"));
        }
        if let Some(node) = tree.get_mut(ContentTree::ROOT) {
            node.add_message(Message::new(Category::License, "root", Level::Info, "r"));
        }
        tree
    }

    #[test]
    fn flat_messages_come_first_then_depth_first_bins() {
        let flat = vec![Message::new(Category::License, "flat", Level::Warning, "f")];
        let report = Aggregator::default().aggregate(flat, &tree());
        let kinds: Vec<_> = report
            .messages_in(Category::License)
            .iter()
            .map(|m| m.kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["flat", "root", "child"]);
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.max_level(), Some(Level::Error));
        assert_eq!(report.count_at_least(Level::Warning), 2);
    }

    #[test]
    fn min_level_filters_messages() {
        let report = Aggregator::new(Category::ALL.to_vec(), Level::Warning).aggregate(vec![], &tree());
        assert_eq!(report.len(), 1);
        assert_eq!(report.summary.by_level.get(&Level::Error), Some(&1));
    }

    #[test]
    fn disabled_categories_are_absent() {
        let report = Aggregator::new(vec![Category::Reuse], Level::Info).aggregate(vec![], &tree());
        assert!(report.is_empty());
        assert!(!report.messages.contains_key(&Category::License));
        assert!(report.messages.contains_key(&Category::Reuse));
    }

    #[test]
    fn serializes_categories_as_names() {
        let report = Aggregator::default().aggregate(vec![], &tree());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["messages"]["license"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["summary"]["byLevel"]["error"], 1);
        assert!(json.get("raw").is_none());
    }
}
