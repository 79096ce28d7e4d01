//! Accessibility checks: image alternative texts and external evaluation records.

use serde_json::Value;

use caretaker_core::types::{Category, Level, Message};
use caretaker_tree::content::Content;

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

const IMAGE: &str = "H5P.Image";

pub struct AccessibilityRules;

impl AccessibilityRules {
    fn missing_alt_text(ctx: &AnalysisContext<'_>, content: &Content) -> Option<Message> {
        if content.machine_name() != Some(IMAGE) || has_alt_or_decorative(&content.params) {
            return None;
        }

        let label = content.describe("{title}");
        let mut details = ctx.details_for(content);
        if let Some(file) = content.files.first() {
            details.insert("path", file.path.as_str());
            if let Some(payload) = &file.payload {
                details.insert("payload", payload.as_str());
            }
        }

        Some(
            Message::new(
                Category::Accessibility,
                "missingAltText",
                Level::Caution,
                ctx.text("accessibility.missingAltText.summary", &[&label]),
            )
            .with_recommendation(ctx.text("accessibility.missingAltText.recommendation", &[]))
            .with_details(details),
        )
    }

    fn evaluation(ctx: &AnalysisContext<'_>, content: &Content) -> Option<Message> {
        let record = content.accessibility.as_ref()?;
        let name = content.machine_name().unwrap_or_default();

        let details = ctx
            .details_for(content)
            .with("type", record.kind.as_str())
            .with("description", record.description.as_str())
            .with("status", record.status.as_str())
            .with("url", record.url.as_str());

        let mut message = Message::new(
            Category::Accessibility,
            "accessibilityEvaluation",
            Level::Info,
            ctx.text("accessibility.evaluation.summary", &[name, &record.status]),
        )
        .with_details(details);
        if !record.description.is_empty() {
            message = message.with_description(vec![record.description.clone()]);
        }
        if !record.url.is_empty() {
            message = message.with_recommendation(
                ctx.text("accessibility.evaluation.recommendation", &[&record.url]),
            );
        }
        Some(message)
    }
}

fn has_alt_or_decorative(params: &Value) -> bool {
    let alt = params
        .get("alt")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty());
    let decorative = params
        .get("decorative")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    alt || decorative
}

impl RuleModule for AccessibilityRules {
    fn name(&self) -> &'static str {
        "accessibility"
    }

    fn category(&self) -> Category {
        Category::Accessibility
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for (id, content) in ctx.tree.iter() {
            if let Some(message) = Self::missing_alt_text(ctx, content) {
                findings.push(Finding::on(id, message));
            }
            if let Some(message) = Self::evaluation(ctx, content) {
                findings.push(Finding::on(id, message));
            }
        }
        Ok(findings)
    }
}
