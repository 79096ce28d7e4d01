//! Rule engine error types.

use caretaker_core::error::{AnalysisError, CaretakerError};
use caretaker_tree::TreeError;

/// Errors raised while evaluating quality rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A rule module could not finish its evaluation.
    #[error("{module} evaluation failed: {reason}")]
    Evaluation { module: String, reason: String },

    /// A module-internal search pattern or tree operation failed.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

impl From<RuleError> for CaretakerError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::Evaluation { module, reason } => {
                CaretakerError::Analysis(AnalysisError::ModuleFailed { module, reason })
            }
            RuleError::Tree(e) => e.into(),
        }
    }
}
