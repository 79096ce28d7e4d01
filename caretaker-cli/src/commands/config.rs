//! `caretaker config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use caretaker_core::config::CaretakerConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
pub const SECTIONS: [&str; 3] = ["general", "analysis", "efficiency"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Loads and validates the file; a missing file is reported as invalid.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validation_report(config_path, CaretakerConfig::load(config_path).await);
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }
    Ok(())
}

fn validation_report(
    config_path: &Path,
    result: Result<CaretakerConfig, caretaker_core::error::CaretakerError>,
) -> ConfigValidationReport {
    let errors = match result {
        Ok(_) => Vec::new(),
        Err(e) => vec![e.to_string()],
    };
    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        errors,
    }
}

/// Shows the effective configuration (file + env overrides + defaults).
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = CaretakerConfig::load_or_default(config_path).await?;
    let report = show_report(config_path, &config, section)?;
    writer.render(&report)?;
    Ok(())
}

fn show_report(
    config_path: &Path,
    config: &CaretakerConfig,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let rendered = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("analysis") => toml::to_string_pretty(&config.analysis),
        Some("efficiency") => toml::to_string_pretty(&config.efficiency),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: {})",
                SECTIONS.join(", ")
            )));
        }
    };

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml: rendered.unwrap_or_else(|e| format!("(serialization error: {e})")),
        config: serde_json::to_value(config)?,
    })
}

/// Configuration display report.
///
/// Text output prints the TOML rendering; JSON output carries the structured configuration.
#[derive(Serialize)]
pub struct ConfigReport {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
    pub config: serde_json::Value,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        match &self.section {
            Some(section) => writeln!(
                w,
                "Configuration {} (source: {})",
                format!("[{section}]").bold(),
                self.source
            )?,
            None => writeln!(w, "Configuration (source: {})", self.source.bold())?,
        }
        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;
        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    pub source: String,
    pub valid: bool,
    /// Empty when valid
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;
        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(payload: &dyn Render) -> String {
        let mut buffer = Vec::new();
        payload.render_text(&mut buffer).expect("render");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    #[test]
    fn test_show_full_config() {
        let report = show_report(Path::new("caretaker.toml"), &CaretakerConfig::default(), None)
            .expect("report");
        let output = render(&report);
        assert!(output.contains("caretaker.toml"));
        assert!(output.contains("[analysis]"));
        assert!(output.contains("zoom_factor = 4"));
    }

    #[test]
    fn test_show_single_section() {
        let report = show_report(
            Path::new("caretaker.toml"),
            &CaretakerConfig::default(),
            Some("efficiency".to_owned()),
        )
        .expect("report");
        let output = render(&report);
        assert!(output.contains("[efficiency]"));
        assert!(output.contains("check_image_size = true"));
        assert!(!output.contains("log_level"));
    }

    #[test]
    fn test_show_unknown_section_fails() {
        let err = show_report(
            Path::new("caretaker.toml"),
            &CaretakerConfig::default(),
            Some("ebpf".to_owned()),
        )
        .err()
        .expect("unknown section should fail");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("general, analysis, efficiency"));
    }

    #[test]
    fn test_show_report_json_skips_toml_text() {
        let report = show_report(Path::new("c.toml"), &CaretakerConfig::default(), None)
            .expect("report");
        let json = serde_json::to_value(&report).expect("json");
        assert!(json.get("config_toml").is_none());
        assert_eq!(json["config"]["analysis"]["min_level"], "info");
        assert!(json.get("section").is_none());
    }

    #[test]
    fn test_validation_report_invalid() {
        let err = CaretakerConfig::parse("[analysis]\nmin_level = 3").err();
        let report = validation_report(Path::new("bad.toml"), Err(err.expect("parse error")));
        let output = render(&report);
        assert!(!report.valid);
        assert!(output.contains("INVALID"));
        assert!(output.contains("Error:"));
    }

    #[test]
    fn test_validation_report_valid() {
        let report = validation_report(Path::new("ok.toml"), Ok(CaretakerConfig::default()));
        assert!(report.valid);
        assert!(render(&report).contains("VALID"));
        assert!(report.errors.is_empty());
    }
}
