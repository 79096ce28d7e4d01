//! Feature support detected from the library facts of each content type.

use caretaker_core::types::{Category, Level, Message};
use caretaker_tree::content::Content;
use caretaker_tree::facts::LibraryFacts;

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

/// Functions of the question type contract.
pub const QUESTION_TYPE_CONTRACT: [&str; 9] = [
    "getAnswerGiven",
    "getScore",
    "getMaxScore",
    "showSolutions",
    "resetTask",
    "getXAPIData",
    "getCurrentState",
    "enableSolutionsButton",
    "enableRetry",
];

/// Degree of support for a set of functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Support {
    Full,
    Partial,
    None,
}

impl Support {
    fn of(supported: usize, total: usize) -> Self {
        match supported {
            0 => Self::None,
            n if n == total => Self::Full,
            _ => Self::Partial,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Partial => "partial",
            Self::None => "none",
        }
    }
}

pub struct FeatureRules;

impl FeatureRules {
    fn unavailable(ctx: &AnalysisContext<'_>, content: &Content) -> Message {
        let label = content.describe("{title} ({machineName})");
        let name = content.machine_name().unwrap_or_default();
        Message::new(
            Category::Features,
            "featuresUnavailable",
            Level::Caution,
            ctx.text("features.unavailable.summary", &[&label]),
        )
        .with_recommendation(ctx.text("features.unavailable.recommendation", &[name]))
        .with_details(ctx.details_for(content))
    }

    fn check(
        ctx: &AnalysisContext<'_>,
        content: &Content,
        library: &LibraryFacts,
        kind: &str,
        functions: &[&str],
    ) -> Message {
        let (supported, unsupported): (Vec<&str>, Vec<&str>) =
            functions.iter().copied().partition(|f| library.supports(f));
        let support = Support::of(supported.len(), functions.len());

        let label = content.describe("{title} ({machineName})");
        let summary = ctx.text(&format!("features.{kind}.{}", support.as_str()), &[&label]);

        let mut description = Vec::new();
        if support != Support::None && functions.len() > 1 {
            description.push(ctx.text("features.supportedFunctions", &[&supported.join(", ")]));
            if support == Support::Partial {
                description.push(
                    ctx.text("features.unsupportedFunctions", &[&unsupported.join(", ")]),
                );
            }
        }

        Message::new(Category::Features, kind, Level::Info, summary)
            .with_description(description)
            .with_details(
                ctx.details_for(content)
                    .with("support", support.as_str())
                    .with("supported", supported)
                    .with("unsupported", unsupported),
            )
    }
}

impl RuleModule for FeatureRules {
    fn name(&self) -> &'static str {
        "features"
    }

    fn category(&self) -> Category {
        Category::Features
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for (id, content) in ctx.tree.iter() {
            let Some(library) = &content.library else {
                tracing::debug!(
                    library = %content.versioned_library_id,
                    "no library facts, feature checks skipped"
                );
                findings.push(Finding::on(id, Self::unavailable(ctx, content)));
                continue;
            };

            findings.push(Finding::on(
                id,
                Self::check(ctx, content, library, "resume", &["getCurrentState"]),
            ));
            findings.push(Finding::on(
                id,
                Self::check(ctx, content, library, "xAPI", &["getXAPIData"]),
            ));
            findings.push(Finding::on(
                id,
                Self::check(
                    ctx,
                    content,
                    library,
                    "questionTypeContract",
                    &QUESTION_TYPE_CONTRACT,
                ),
            ));
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{TestPackage, image_node};
    use serde_json::json;

    fn library(functions: &[&str]) -> LibraryFacts {
        LibraryFacts {
            runnable: true,
            functions: functions.iter().map(|f| (*f).to_owned()).collect(),
            ..LibraryFacts::default()
        }
    }

    fn package_with_root_library(facts: LibraryFacts) -> TestPackage {
        let mut package = TestPackage::book(vec![]);
        package.facts = package.facts.with_library("H5P.InteractiveBook", facts);
        package
    }

    #[test]
    fn missing_library_facts_is_caution_once_per_node() {
        let package = TestPackage::book(vec![image_node("a", json!({})), image_node("b", json!({}))]);
        let findings = package.run(&FeatureRules);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.message.kind == "featuresUnavailable"));
        assert!(findings.iter().all(|f| f.message.level == Level::Caution));
    }

    #[test]
    fn full_contract_support() {
        let package = package_with_root_library(library(&QUESTION_TYPE_CONTRACT));
        let findings = package.run(&FeatureRules);
        let kinds: Vec<_> = findings.iter().map(|f| f.message.kind.as_str()).collect();
        assert_eq!(kinds, vec!["resume", "xAPI", "questionTypeContract"]);
        assert!(findings.iter().all(|f| f.message.details.get_str("support") == Some("full")));
        assert_eq!(findings[2].message.description.len(), 1);
    }

    #[test]
    fn partial_contract_lists_both_sides() {
        let package = package_with_root_library(library(&["getScore", "getMaxScore"]));
        let findings = package.run(&FeatureRules);

        assert_eq!(findings[0].message.details.get_str("support"), Some("none"));
        assert!(findings[0].message.summary.contains("does not support resuming"));

        let contract = &findings[2].message;
        assert_eq!(contract.details.get_str("support"), Some("partial"));
        assert_eq!(contract.description.len(), 2);
        assert!(contract.description[0].contains("getScore, getMaxScore"));
        assert!(contract.description[1].contains("getAnswerGiven"));
    }

    #[test]
    fn support_classification() {
        assert_eq!(Support::of(0, 9), Support::None);
        assert_eq!(Support::of(9, 9), Support::Full);
        assert_eq!(Support::of(4, 9), Support::Partial);
    }
}
