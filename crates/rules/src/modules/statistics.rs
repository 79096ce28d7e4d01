//! Content type statistics.

use serde_json::{Map, Value};

use caretaker_core::types::{Category, Level, Message, MessageDetails};

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

pub struct StatisticsRules;

impl RuleModule for StatisticsRules {
    fn name(&self) -> &'static str {
        "statistics"
    }

    fn category(&self) -> Category {
        Category::Statistics
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        // keys stay in first-seen order
        let mut counts = Map::new();
        for (_, content) in ctx.tree.iter() {
            let Some(name) = content.machine_name() else {
                continue;
            };
            let entry = counts.entry(name).or_insert(Value::from(0u64));
            *entry = Value::from(entry.as_u64().unwrap_or_default() + 1);
        }

        let distinct = counts.len().to_string();
        let message = Message::new(
            Category::Statistics,
            "contentTypeCount",
            Level::Info,
            ctx.text("statistics.contentTypeCount.summary", &[&distinct]),
        )
        .with_details(MessageDetails::from(counts));
        Ok(vec![Finding::flat(message)])
    }
}
