//! Package fixtures shared by the module unit tests.

use serde_json::{Value, json};

use caretaker_core::catalog::EnglishCatalog;
use caretaker_core::config::CaretakerConfig;
use caretaker_tree::{ContentTree, Manifest, PackageFacts, build_tree};

use crate::module::{AnalysisContext, Finding, RuleModule};

pub(crate) struct TestPackage {
    pub facts: PackageFacts,
    pub config: CaretakerConfig,
}

impl TestPackage {
    pub fn new(manifest: Value, params: Value) -> Self {
        Self {
            facts: PackageFacts::new(Manifest::from_value(&manifest), params),
            config: CaretakerConfig::default(),
        }
    }

    /// An interactive book whose first chapter holds `children`.
    pub fn book(children: Vec<Value>) -> Self {
        Self::new(book_manifest(json!({})), chapter_params(children))
    }

    pub fn tree(&self) -> ContentTree {
        build_tree(&self.facts).unwrap()
    }

    pub fn run(&self, module: &dyn RuleModule) -> Vec<Finding> {
        let tree = self.tree();
        let catalog = EnglishCatalog::new();
        let ctx = AnalysisContext::new(&tree, &self.facts, &catalog, &self.config);
        module.evaluate(&ctx).unwrap()
    }
}

/// Book manifest; entries of `overrides` replace the default copyright fields.
pub(crate) fn book_manifest(overrides: Value) -> Value {
    let mut manifest = json!({
        "title": "Book",
        "mainLibrary": "H5P.InteractiveBook",
        "license": "CC BY-SA",
        "licenseVersion": "4.0",
        "authors": [{ "name": "Ada", "role": "Author" }],
        "authorComments": "Reuse welcome",
        "preloadedDependencies": [
            { "machineName": "H5P.InteractiveBook", "majorVersion": 1, "minorVersion": 10 }
        ]
    });
    if let (Some(target), Some(source)) = (manifest.as_object_mut(), overrides.as_object()) {
        for (k, v) in source {
            target.insert(k.clone(), v.clone());
        }
    }
    manifest
}

pub(crate) fn chapter_params(children: Vec<Value>) -> Value {
    let content: Vec<Value> = children.into_iter().map(|c| json!({ "content": c })).collect();
    json!({ "chapters": [{ "params": { "content": content } }] })
}

pub(crate) fn node(library: &str, id: &str, metadata: Value, params: Value) -> Value {
    json!({
        "library": library,
        "subContentId": id,
        "metadata": metadata,
        "params": params
    })
}

pub(crate) fn image_node(id: &str, params: Value) -> Value {
    node(
        "H5P.Image 1.1",
        id,
        json!({ "title": "Image", "license": "CC BY", "licenseVersion": "4.0",
                "authors": [{ "name": "Ada" }], "authorComments": "ok",
                "source": "https://example.org/image" }),
        params,
    )
}
