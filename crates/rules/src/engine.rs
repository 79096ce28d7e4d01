//! Analysis engine.
//!
//! Runs every enabled [`RuleModule`] against a content tree, isolating failures: a module
//! that returns an error or panics contributes a single `moduleFailure` message in its
//! category instead of aborting the analysis.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use caretaker_core::catalog::Catalog;
use caretaker_core::config::CaretakerConfig;
use caretaker_core::metrics as m;
use caretaker_core::types::{Category, Level, Message, MessageDetails};
use caretaker_tree::{ContentTree, PackageFacts, TreeError, TreeBuilder};

use crate::error::RuleError;
use crate::module::{AnalysisContext, Finding, RuleModule};
use crate::modules::module_for;
use crate::report::{Aggregator, Report};

/// Result of a complete analysis: the annotated tree and the report.
#[derive(Debug)]
pub struct Analysis {
    pub tree: ContentTree,
    pub report: Report,
}

/// Runs rule modules and aggregates their output.
pub struct Engine {
    modules: Vec<Box<dyn RuleModule>>,
    config: CaretakerConfig,
}

impl Engine {
    /// Engine with the built-in modules enabled by `config.analysis.modules`.
    pub fn new(config: CaretakerConfig) -> Result<Self, RuleError> {
        let modules = config
            .analysis
            .enabled_categories()
            .into_iter()
            .map(module_for)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { modules, config })
    }

    /// Engine with an explicit module list.
    pub fn with_modules(modules: Vec<Box<dyn RuleModule>>, config: CaretakerConfig) -> Self {
        Self { modules, config }
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    pub fn config(&self) -> &CaretakerConfig {
        &self.config
    }

    /// Builds the content tree from `facts` and analyzes it.
    ///
    /// Fails only when the tree cannot be built.
    pub fn run(&self, facts: &PackageFacts, catalog: &dyn Catalog) -> Result<Analysis, TreeError> {
        let mut tree = TreeBuilder::new(facts)?.build()?;
        let report = self.analyze(&mut tree, facts, catalog);
        Ok(Analysis { tree, report })
    }

    /// Runs all modules against `tree`, routes node findings into the node bins and
    /// aggregates the report.
    pub fn analyze(
        &self,
        tree: &mut ContentTree,
        facts: &PackageFacts,
        catalog: &dyn Catalog,
    ) -> Report {
        let started = Instant::now();
        info!(
            main_library = %tree.root().versioned_library_id,
            modules = self.modules.len(),
            "analysis started"
        );

        let findings = {
            let ctx = AnalysisContext::new(tree, facts, catalog, &self.config);
            self.modules
                .iter()
                .flat_map(|module| run_module(module.as_ref(), &ctx))
                .collect::<Vec<_>>()
        };

        let mut flat = Vec::new();
        for finding in findings {
            match finding.node.and_then(|id| tree.get_mut(id)) {
                Some(node) => node.add_message(finding.message),
                None => flat.push(finding.message),
            }
        }

        let aggregator = Aggregator::new(
            self.config.analysis.enabled_categories(),
            self.config.analysis.min_level(),
        );
        let mut report = aggregator.aggregate(flat, tree);
        report.tree = Some(tree.view());
        if self.config.analysis.include_raw {
            report.raw = raw_facts(facts);
        }

        for message in report.iter() {
            metrics::counter!(
                m::MESSAGES_TOTAL,
                m::LABEL_CATEGORY => message.category.as_str(),
                m::LABEL_LEVEL => message.level.to_string()
            )
            .increment(1);
        }
        metrics::counter!(m::ANALYSES_TOTAL).increment(1);
        metrics::histogram!(m::TREE_NODES).record(tree.len() as f64);
        metrics::histogram!(m::ANALYSIS_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        info!(
            nodes = tree.len(),
            messages = report.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "analysis finished"
        );
        report
    }
}

fn run_module(module: &dyn RuleModule, ctx: &AnalysisContext<'_>) -> Vec<Finding> {
    let outcome = catch_unwind(AssertUnwindSafe(|| module.evaluate(ctx)));
    let reason = match outcome {
        Ok(Ok(findings)) => {
            debug!(module = module.name(), findings = findings.len(), "module finished");
            return findings;
        }
        Ok(Err(e)) => e.to_string(),
        Err(panic) => panic_reason(&*panic),
    };

    warn!(module = module.name(), reason = %reason, "module failed");
    metrics::counter!(m::MODULE_FAILURES_TOTAL, m::LABEL_MODULE => module.name()).increment(1);
    vec![Finding::flat(failure_message(ctx, module.category(), module.name(), &reason))]
}

fn failure_message(ctx: &AnalysisContext<'_>, category: Category, name: &str, reason: &str) -> Message {
    Message::new(
        category,
        "moduleFailure",
        Level::Error,
        ctx.text("engine.moduleFailure.summary", &[name, reason]),
    )
    .with_details(MessageDetails::new().with("module", name).with("reason", reason))
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

fn raw_facts(facts: &PackageFacts) -> Option<Value> {
    match serde_json::to_value(facts) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "failed to serialize raw facts");
            None
        }
    }
}
