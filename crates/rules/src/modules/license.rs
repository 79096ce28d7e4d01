//! License checks.
//!
//! Licensed items are the root, every sub-content, and every file reference in the
//! parameters. A media instance whose file is already a licensed item is not checked twice. Files take their governing metadata from the closest
//! enclosing media instance of the matching type, otherwise from their own `copyright` block.

use std::collections::BTreeSet;

use serde_json::Value;

use caretaker_core::types::{Category, Level, Message, MessageDetails};
use caretaker_tree::ContentTree;
use caretaker_tree::content::{Content, FileKind, NodeId};
use caretaker_tree::indexer::PathIndexer;
use caretaker_tree::metadata::{Metadata, UNDISCLOSED};

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};

const MEDIA_LIBRARIES: [&str; 3] = ["H5P.Image", "H5P.Audio", "H5P.Video"];

/// A licensed item: a content node or a file reference.
struct Item<'a> {
    node: NodeId,
    semantics_path: String,
    label: String,
    metadata: Metadata,
    details: MessageDetails,
    is_file: bool,
    parent_license: Option<&'a str>,
}

pub struct LicenseRules {
    media_instances: PathIndexer,
    file_references: PathIndexer,
}

impl LicenseRules {
    pub fn new() -> Result<Self, RuleError> {
        Ok(Self {
            media_instances: PathIndexer::from_patterns(&[(
                "library",
                r"^H5P\.(Image|Audio|Video) \d+\.\d+$",
            )])?,
            file_references: PathIndexer::from_patterns(&[
                ("mime", r"^[\w.+-]+/[\w.+-]+$"),
                ("path", r"^.+$"),
            ])?,
        })
    }

    fn node_items<'a>(
        &self,
        ctx: &'a AnalysisContext<'a>,
        covered: &BTreeSet<&str>,
    ) -> Vec<Item<'a>> {
        ctx.tree
            .iter()
            .filter(|(_, content)| !is_covered_media(content, covered))
            .map(|(id, content)| Item {
                node: id,
                semantics_path: content.semantics_path.clone(),
                label: placement(ctx, content),
                metadata: content.metadata.clone(),
                details: ctx.details_for(content),
                is_file: false,
                parent_license: ctx
                    .tree
                    .parent(id)
                    .map(|p| ctx.tree[p].metadata.license_or_undisclosed()),
            })
            .collect()
    }

    fn file_items<'a>(&self, ctx: &'a AnalysisContext<'a>) -> Vec<Item<'a>> {
        let params = &ctx.facts.params;
        self.file_references
            .find_matches(params)
            .into_iter()
            .map(|m| {
                let mime = m.node.get("mime").and_then(Value::as_str).unwrap_or_default();
                let file_path = m.node.get("path").and_then(Value::as_str).unwrap_or_default();
                let kind = FileKind::from_mime(mime);

                let inherited = self
                    .media_instances
                    .find_closest_ancestor(params, &m.path)
                    .filter(|instance| instance_kind(instance.node) == Some(kind))
                    .map(|instance| {
                        instance
                            .node
                            .get("metadata")
                            .map(Metadata::from_h5p_metadata)
                            .unwrap_or_default()
                    });
                let metadata = inherited.unwrap_or_else(|| {
                    m.node
                        .get("copyright")
                        .map(Metadata::from_copyright)
                        .unwrap_or_default()
                });

                let owner = ctx.owner_of(&m.path);
                let details = MessageDetails::new()
                    .with_path(m.path.as_str())
                    .with_title(metadata.title.as_deref().unwrap_or(file_path))
                    .with("file", file_path);
                let details = if owner == ContentTree::ROOT {
                    details
                } else {
                    details.with_sub_content_id(ctx.tree[owner].id.as_str())
                };

                Item {
                    node: owner,
                    semantics_path: m.path.clone(),
                    label: ctx.text("license.placement.nested", &[file_path, &m.path]),
                    metadata,
                    details,
                    is_file: true,
                    parent_license: None,
                }
            })
            .collect()
    }

    fn check(ctx: &AnalysisContext<'_>, item: &Item<'_>) -> Vec<Message> {
        let mut out = Vec::new();
        let license = item.metadata.license_or_undisclosed();
        let message = |kind: &str, level: Level, summary: String, recommendation: String| {
            Message::new(Category::License, kind, level, summary)
                .with_recommendation(recommendation)
                .with_details(item.details.clone().with("license", license))
        };

        if license == UNDISCLOSED {
            out.push(message(
                "missingLicense",
                Level::Error,
                ctx.text("license.missingLicense.summary", &[&item.label]),
                ctx.text("license.missingLicense.recommendation", &[]),
            ));
            return out;
        }

        if is_creative_commons_by(license) && item.metadata.license_version.is_none() {
            out.push(message(
                "missingLicenseVersion",
                Level::Warning,
                ctx.text("license.missingLicenseVersion.summary", &[&item.label]),
                ctx.text("license.missingLicenseVersion.recommendation", &[license]),
            ));
        }

        if requires_attribution(license) && !item.metadata.has_author() {
            out.push(message(
                "missingAuthor",
                Level::Warning,
                ctx.text("license.missingAuthor.summary", &[&item.label]),
                ctx.text("license.missingAuthor.recommendation", &[license]),
            ));
        }

        if item.is_file && license.starts_with("CC") && item.metadata.source.is_none() {
            out.push(message(
                "missingSource",
                Level::Info,
                ctx.text("license.missingSource.summary", &[&item.label]),
                ctx.text("license.missingSource.recommendation", &[]),
            ));
        }

        if item.metadata.is_adaptation() && forbids_derivatives(license) {
            out.push(message(
                "invalidLicenseAdaptation",
                Level::Error,
                ctx.text(
                    "license.invalidLicenseAdaptation.summary",
                    &[&item.label, license],
                ),
                ctx.text("license.invalidLicenseAdaptation.recommendation", &[]),
            ));
        }

        if let Some(parent) = item.parent_license
            && remix_conflicts(license, parent)
        {
            out.push(message(
                "invalidLicenseRemix",
                Level::Warning,
                ctx.text(
                    "license.invalidLicenseRemix.summary",
                    &[license, &item.label, parent],
                ),
                ctx.text("license.invalidLicenseRemix.recommendation", &[]),
            ));
        }

        out
    }
}

fn placement(ctx: &AnalysisContext<'_>, content: &Content) -> String {
    let name = content.describe("{title} ({machineName})");
    if content.is_root() {
        ctx.text("license.placement.root", &[&name])
    } else {
        ctx.text("license.placement.nested", &[&name, &content.semantics_path])
    }
}

/// A media instance at least one of whose files is checked as a file reference.
fn is_covered_media(content: &Content, covered: &BTreeSet<&str>) -> bool {
    !content.is_root()
        && content
            .machine_name()
            .is_some_and(|name| MEDIA_LIBRARIES.contains(&name))
        && content
            .files
            .iter()
            .any(|file| covered.contains(file.semantics_path.as_str()))
}

fn instance_kind(instance: &Value) -> Option<FileKind> {
    let library = instance.get("library")?.as_str()?;
    let machine_name = library.split_whitespace().next()?;
    match machine_name {
        "H5P.Image" => Some(FileKind::Image),
        "H5P.Audio" => Some(FileKind::Audio),
        "H5P.Video" => Some(FileKind::Video),
        _ => None,
    }
}

fn is_creative_commons_by(license: &str) -> bool {
    license.starts_with("CC BY")
}

fn requires_attribution(license: &str) -> bool {
    license.starts_with("CC BY") || license.starts_with("GNU GPL")
}

fn forbids_derivatives(license: &str) -> bool {
    license.starts_with("CC BY") && license.contains("ND")
}

fn is_share_alike(license: &str) -> bool {
    license.starts_with("CC BY") && license.ends_with("SA")
}

fn is_non_commercial(license: &str) -> bool {
    license.starts_with("CC BY") && license.contains("NC")
}

/// Whether a child licensed `child` may not be placed inside content licensed `parent`.
fn remix_conflicts(child: &str, parent: &str) -> bool {
    if parent == UNDISCLOSED || child == UNDISCLOSED {
        return false;
    }
    if is_share_alike(child) && parent != child {
        return true;
    }
    is_non_commercial(child) && parent != "C" && !is_non_commercial(parent)
}

impl RuleModule for LicenseRules {
    fn name(&self) -> &'static str {
        "license"
    }

    fn category(&self) -> Category {
        Category::License
    }

    fn evaluate(&self, ctx: &AnalysisContext<'_>) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        let files = self.file_items(ctx);
        let covered: BTreeSet<&str> = files.iter().map(|f| f.semantics_path.as_str()).collect();
        let mut items = self.node_items(ctx, &covered);
        items.extend(files);

        for item in &items {
            for message in Self::check(ctx, item) {
                findings.push(Finding::on(item.node, message));
            }
        }
        tracing::debug!(items = items.len(), findings = findings.len(), "license items checked");
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::testing::{TestPackage, book_manifest, chapter_params, image_node, node};
    use serde_json::json;

    fn kinds(findings: &[Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.message.kind.as_str()).collect()
    }

    fn rules() -> LicenseRules {
        LicenseRules::new().unwrap()
    }

    #[test]
    fn complete_package_has_no_findings() {
        let package = TestPackage::book(vec![image_node(
            "img-1",
            json!({ "file": { "path": "images/a.png", "mime": "image/png" } }),
        )]);
        assert!(package.run(&rules()).is_empty());
    }

    #[test]
    fn undisclosed_root_license_mentions_main_content() {
        let package = TestPackage::new(
            book_manifest(json!({ "license": "U" })),
            chapter_params(vec![]),
        );
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["missingLicense"]);
        assert!(findings[0].message.summary.contains("as main content"));
        assert_eq!(findings[0].node, Some(ContentTree::ROOT));
    }

    #[test]
    fn undisclosed_nested_license_mentions_path() {
        let package = TestPackage::book(vec![node(
            "H5P.AdvancedText 1.1",
            "txt-1",
            json!({ "title": "Intro" }),
            json!({ "text": "hi" }),
        )]);
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["missingLicense"]);
        assert!(
            findings[0]
                .message
                .summary
                .contains("at chapters[0].params.content[0].content.params")
        );
        assert_eq!(findings[0].message.details.sub_content_id(), Some("txt-1"));
    }

    #[test]
    fn media_file_inherits_instance_metadata() {
        let unlicensed_image = node(
            "H5P.Image 1.1",
            "img-1",
            json!({ "title": "Cell" }),
            json!({ "file": { "path": "images/a.png", "mime": "image/png",
                              "copyright": { "license": "CC BY", "version": "4.0", "author": "x" } } }),
        );
        let package = TestPackage::book(vec![unlicensed_image]);
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["missingLicense"]);
        assert_eq!(
            findings[0].message.details.get_str("semanticsPath"),
            Some("chapters[0].params.content[0].content.params.file")
        );
    }

    #[test]
    fn media_instance_without_file_is_still_checked() {
        let package = TestPackage::book(vec![node(
            "H5P.Image 1.1",
            "img-u",
            json!({ "title": "Empty", "license": "U" }),
            json!({ "alt": "x" }),
        )]);
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["missingLicense"]);
        assert_eq!(findings[0].message.details.sub_content_id(), Some("img-u"));
    }

    #[test]
    fn media_instance_with_untyped_file_is_checked_as_node() {
        let package = TestPackage::book(vec![node(
            "H5P.Image 1.1",
            "img-2",
            json!({ "title": "Untyped", "license": "U" }),
            json!({ "file": { "path": "images/a.png" } }),
        )]);
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["missingLicense"]);
        assert_eq!(
            findings[0].message.details.get_str("semanticsPath"),
            Some("chapters[0].params.content[0].content.params")
        );
    }

    #[test]
    fn file_outside_media_uses_copyright_block() {
        let column = node(
            "H5P.Column 1.16",
            "col-1",
            json!({ "license": "CC BY", "licenseVersion": "4.0", "authors": [{ "name": "Ada" }] }),
            json!({ "background": { "path": "images/bg.png", "mime": "image/png",
                                    "copyright": { "license": "CC BY-SA", "author": "Bob" } } }),
        );
        let package = TestPackage::book(vec![column]);
        let findings = package.run(&rules());
        let kinds = kinds(&findings);
        assert!(kinds.contains(&"missingLicenseVersion"));
        assert!(kinds.contains(&"missingSource"));
        assert!(!kinds.contains(&"missingLicense"));
        let file_finding = findings
            .iter()
            .find(|f| f.message.kind == "missingSource")
            .unwrap();
        assert_eq!(file_finding.message.details.sub_content_id(), Some("col-1"));
    }

    #[test]
    fn missing_author_for_attribution_license() {
        let package = TestPackage::new(
            book_manifest(json!({ "authors": [] })),
            chapter_params(vec![]),
        );
        assert_eq!(kinds(&package.run(&rules())), vec!["missingAuthor"]);
    }

    #[test]
    fn adaptation_of_no_derivatives_is_error() {
        let package = TestPackage::new(
            book_manifest(json!({
                "license": "CC BY-ND",
                "changes": [{ "date": "2024", "author": "Bob", "log": "edited" }]
            })),
            chapter_params(vec![]),
        );
        let findings = package.run(&rules());
        assert_eq!(kinds(&findings), vec!["invalidLicenseAdaptation"]);
        assert_eq!(findings[0].message.level, Level::Error);
    }

    #[test]
    fn share_alike_child_under_other_license_warns() {
        let child = node(
            "H5P.Column 1.16",
            "col-1",
            json!({ "license": "CC BY-SA", "licenseVersion": "4.0", "authors": [{ "name": "A" }] }),
            json!({}),
        );
        let package = TestPackage::new(
            book_manifest(json!({ "license": "CC BY" })),
            chapter_params(vec![child]),
        );
        assert_eq!(kinds(&package.run(&rules())), vec!["invalidLicenseRemix"]);
    }

    #[test]
    fn remix_rules() {
        assert!(remix_conflicts("CC BY-SA", "CC BY"));
        assert!(!remix_conflicts("CC BY-SA", "CC BY-SA"));
        assert!(!remix_conflicts("CC BY-SA", "U"));
        assert!(remix_conflicts("CC BY-NC", "CC BY"));
        assert!(!remix_conflicts("CC BY-NC", "CC BY-NC-SA"));
        assert!(!remix_conflicts("CC BY", "CC BY-NC"));
        assert!(!remix_conflicts("CC BY-NC", "C"));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let package = TestPackage::new(
            book_manifest(json!({ "license": "U" })),
            chapter_params(vec![
                node("H5P.Text 1.1", "t", json!({}), json!({})),
                image_node("img", json!({ "file": { "path": "images/a.png", "mime": "image/png" } })),
            ]),
        );
        let rules = rules();
        let first = package.run(&rules);
        let second = package.run(&rules);
        assert_eq!(first, second);
    }
}
