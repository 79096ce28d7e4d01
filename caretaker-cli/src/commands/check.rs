//! `caretaker check` command handler

use std::io::Write;
use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use tracing::info;

use caretaker_core::catalog::EnglishCatalog;
use caretaker_core::config::CaretakerConfig;
use caretaker_core::types::{Level, Message};
use caretaker_rules::{Engine, Report};

use crate::cli::CheckArgs;
use crate::error::CliError;
use crate::loader::load_package;
use crate::output::{OutputWriter, Render, level_tag};

/// Execute the `check` command.
pub async fn execute(
    args: CheckArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = effective_config(CaretakerConfig::load_or_default(config_path).await?, &args)?;
    let fail_on = args.fail_on.as_deref().map(parse_level).transpose()?;

    info!(path = %args.path.display(), "checking package");
    let facts = load_package(&args.path, args.facts.as_deref()).await?;
    let engine = Engine::new(config)?;
    let analysis = engine.run(&facts, &EnglishCatalog::new())?;

    let output = CheckReport {
        package: args.path.display().to_string(),
        report: analysis.report,
    };
    writer.render(&output)?;

    if let Some(level) = fail_on {
        let count = output.report.count_at_least(level);
        if count > 0 {
            return Err(CliError::Findings { count, level });
        }
    }
    Ok(())
}

/// Applies command-line overrides on top of the loaded configuration.
fn effective_config(
    mut config: CaretakerConfig,
    args: &CheckArgs,
) -> Result<CaretakerConfig, CliError> {
    if let Some(level) = &args.min_level {
        config.analysis.min_level = level.clone();
    }
    if !args.modules.is_empty() {
        config.analysis.modules = args.modules.clone();
    }
    config
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;
    Ok(config)
}

fn parse_level(s: &str) -> Result<Level, CliError> {
    Level::from_str_loose(s).ok_or_else(|| {
        CliError::Command(format!(
            "invalid level: {s} (expected: {})",
            Level::NAMES.join(", ")
        ))
    })
}

/// Report of one checked package.
#[derive(Serialize)]
pub struct CheckReport {
    pub package: String,
    #[serde(flatten)]
    pub report: Report,
}

impl Render for CheckReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w, "Package: {}", self.package.bold())?;
        if let Some(tree) = &self.report.tree {
            writeln!(w, "Main content: {} ({} nodes)", tree.label, tree.count())?;
        }

        let counts: Vec<String> = self
            .report
            .summary
            .by_level
            .iter()
            .rev()
            .map(|(level, n)| format!("{level} {n}"))
            .collect();
        if counts.is_empty() {
            writeln!(w, "Messages: {}", "none".green())?;
        } else {
            writeln!(w, "Messages: {} ({})", self.report.len(), counts.join(", "))?;
        }

        for (category, messages) in &self.report.messages {
            if messages.is_empty() {
                continue;
            }
            writeln!(w)?;
            writeln!(
                w,
                "{} ({})",
                category.as_str().to_uppercase().bold(),
                messages.len()
            )?;
            for message in messages {
                render_message(w, message)?;
            }
        }
        Ok(())
    }
}

fn render_message(w: &mut dyn Write, message: &Message) -> std::io::Result<()> {
    writeln!(w, "  {} {}", level_tag(message.level), message.summary)?;
    for line in &message.description {
        writeln!(w, "          - {line}")?;
    }
    if let Some(recommendation) = &message.recommendation {
        writeln!(w, "          {}", recommendation.dimmed())?;
    }
    Ok(())
}
