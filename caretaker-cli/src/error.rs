//! CLI-specific error types and exit code mapping

use caretaker_core::error::CaretakerError;
use caretaker_core::types::Level;
use caretaker_rules::RuleError;
use caretaker_tree::TreeError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The package directory could not be turned into analysis input.
    #[error("package error: {0}")]
    Package(String),

    /// The report contains messages at or above the `--fail-on` level.
    #[error("{count} message(s) at level {level} or above")]
    Findings { count: usize, level: Level },

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from caretaker-core.
    #[error("{0}")]
    Core(#[from] CaretakerError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | General / command error                   |
    /// | 2    | Configuration error                       |
    /// | 3    | Package could not be loaded               |
    /// | 4    | Report has messages at or above --fail-on |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(CaretakerError::Config(_)) => 2,
            Self::Package(_) | Self::Core(CaretakerError::Package(_)) => 3,
            Self::Findings { .. } => 4,
            Self::Io(_) | Self::Core(CaretakerError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(CaretakerError::Analysis(_)) => 1,
        }
    }
}

impl From<TreeError> for CliError {
    fn from(e: TreeError) -> Self {
        Self::Package(e.to_string())
    }
}

impl From<RuleError> for CliError {
    fn from(e: RuleError) -> Self {
        Self::Command(e.to_string())
    }
}
