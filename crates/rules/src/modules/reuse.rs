//! Reuse checks: free cultural works licensing, license extras and author comments.

use caretaker_core::types::{Category, Level, Message, MessageDetails};
use caretaker_tree::content::{Content, FileKind};
use caretaker_tree::metadata::Metadata;

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

/// Licenses approved for free cultural works.
pub const CULTURAL_WORK_LICENSES: [&str; 7] = [
    "PD", "CC0 1.0", "CC BY", "CC BY-SA", "GNU GPL", "ODC PDDL", "CC PDM",
];

/// Content types that carry no metadata of their own.
const NO_METADATA: [&str; 6] = [
    "H5P.AdvancedText",
    "H5P.Text",
    "H5P.Table",
    "H5P.Link",
    "H5P.Row",
    "H5P.RowColumn",
];

pub fn is_cultural_work(license: &str) -> bool {
    CULTURAL_WORK_LICENSES.contains(&license)
}

pub struct ReuseRules;

impl ReuseRules {
    fn skip(ctx: &AnalysisContext<'_>, content: &Content) -> bool {
        if content.is_root() && ctx.facts.manifest.metadata_disabled() {
            return true;
        }
        if content
            .machine_name()
            .is_some_and(|name| NO_METADATA.contains(&name))
        {
            return true;
        }
        content.library.as_ref().is_some_and(|l| l.metadata_disabled)
    }

    fn check(
        ctx: &AnalysisContext<'_>,
        label: &str,
        metadata: &Metadata,
        details: &MessageDetails,
    ) -> Vec<Message> {
        let mut out = Vec::new();
        let license = metadata.license_or_undisclosed();

        if !is_cultural_work(license) {
            out.push(
                Message::new(
                    Category::Reuse,
                    "notCulturalWork",
                    Level::Info,
                    ctx.text("reuse.notCulturalWork.summary", &[label]),
                )
                .with_recommendation(ctx.text("reuse.notCulturalWork.recommendation", &[]))
                .with_details(details.clone().with("license", license)),
            );
            if let Some(extras) = &metadata.license_extras {
                out.push(
                    Message::new(
                        Category::Reuse,
                        "hasLicenseExtras",
                        Level::Info,
                        ctx.text("reuse.hasLicenseExtras.summary", &[label]),
                    )
                    .with_recommendation(ctx.text("reuse.hasLicenseExtras.recommendation", &[]))
                    .with_description(vec![extras.clone()])
                    .with_details(details.clone().with("licenseExtras", extras.as_str())),
                );
            }
        }

        if metadata.author_comments.is_none() {
            out.push(
                Message::new(
                    Category::Reuse,
                    "noAuthorComments",
                    Level::Info,
                    ctx.text("reuse.noAuthorComments.summary", &[label]),
                )
                .with_recommendation(ctx.text("reuse.noAuthorComments.recommendation", &[]))
                .with_details(details.clone()),
            );
        }
        out
    }
}

impl RuleModule for ReuseRules {
    fn name(&self) -> &'static str {
        "reuse"
    }

    fn category(&self) -> Category {
        Category::Reuse
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for (id, content) in ctx.tree.iter() {
            if Self::skip(ctx, content) {
                continue;
            }

            let label = content.describe("{title} ({machineName})");
            for message in Self::check(ctx, &label, &content.metadata, &ctx.details_for(content)) {
                findings.push(Finding::on(id, message));
            }

            for file in content.files.iter().filter(|f| f.kind == FileKind::File) {
                let details = ctx
                    .details_for(content)
                    .with_path(file.semantics_path.as_str())
                    .with("file", file.path.as_str());
                for message in Self::check(ctx, &file.path, &file.metadata, &details) {
                    findings.push(Finding::on(id, message));
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{TestPackage, book_manifest, chapter_params, node};
    use caretaker_tree::LibraryFacts;
    use serde_json::json;

    fn kinds(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.message.kind.as_str()).collect()
    }

    fn root_only(overrides: serde_json::Value) -> TestPackage {
        TestPackage::new(book_manifest(overrides), chapter_params(vec![]))
    }

    #[test]
    fn share_alike_is_cultural_work() {
        let findings = root_only(json!({ "license": "CC BY-SA" })).run(&ReuseRules);
        assert!(!kinds(&findings).contains(&"notCulturalWork"));
    }

    #[test]
    fn non_commercial_is_not_cultural_work() {
        let findings = root_only(json!({ "license": "CC BY-NC" })).run(&ReuseRules);
        assert_eq!(kinds(&findings), vec!["notCulturalWork"]);
        assert_eq!(findings[0].message.level, Level::Info);
    }

    #[test]
    fn license_extras_add_second_message() {
        let findings = root_only(json!({ "license": "C", "licenseExtras": "No printing" }))
            .run(&ReuseRules);
        assert_eq!(kinds(&findings), vec!["notCulturalWork", "hasLicenseExtras"]);
        assert_eq!(findings[1].message.description, vec!["No printing".to_owned()]);
    }

    #[test]
    fn missing_author_comments() {
        let findings = root_only(json!({ "authorComments": "" })).run(&ReuseRules);
        assert_eq!(kinds(&findings), vec!["noAuthorComments"]);
    }

    #[test]
    fn text_types_are_skipped() {
        let package = TestPackage::book(vec![node(
            "H5P.AdvancedText 1.1",
            "txt",
            json!({ "license": "C" }),
            json!({}),
        )]);
        assert!(package.run(&ReuseRules).is_empty());
    }

    #[test]
    fn metadata_disabled_library_is_skipped() {
        let mut package = TestPackage::book(vec![node(
            "H5P.Summary 1.10",
            "sum",
            json!({ "license": "C" }),
            json!({}),
        )]);
        package.facts = package.facts.with_library(
            "H5P.Summary",
            LibraryFacts {
                metadata_disabled: true,
                ..LibraryFacts::default()
            },
        );
        assert!(package.run(&ReuseRules).is_empty());
    }

    #[test]
    fn root_with_disabled_metadata_settings_is_skipped() {
        let findings = root_only(json!({ "license": "C", "metadataSettings": { "disable": true } }))
            .run(&ReuseRules);
        assert!(findings.is_empty());
    }

    #[test]
    fn non_media_files_are_checked_again() {
        let column = node(
            "H5P.Column 1.16",
            "col",
            json!({ "license": "CC BY", "authorComments": "fine" }),
            json!({
                "doc": { "path": "files/a.pdf", "mime": "application/pdf",
                         "copyright": { "license": "CC BY-ND" } },
                "pic": { "path": "images/a.png", "mime": "image/png",
                         "copyright": { "license": "CC BY-ND" } }
            }),
        );
        let findings = TestPackage::book(vec![column]).run(&ReuseRules);
        assert_eq!(kinds(&findings), vec!["notCulturalWork", "noAuthorComments"]);
        assert_eq!(findings[0].message.details.get_str("file"), Some("files/a.pdf"));
    }
}
