#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error type (`RuleError`)
//! - [`module`]: Extension point (`RuleModule` trait, `AnalysisContext`, `Finding`)
//! - [`modules`]: Built-in modules (accessibility, license, efficiency, features, reuse, statistics)
//! - [`engine`]: Module runner with failure isolation (`Engine`, `Analysis`)
//! - [`report`]: Aggregation (`Aggregator`, `Report`, `Summary`)
//!
//! # Architecture
//!
//! ```text
//! PackageFacts --> TreeBuilder --> ContentTree
//!                                      |
//!              +-----------+-----------+-----------+-----------+-----------+
//!              |           |           |           |           |           |
//!        accessibility  license   efficiency   features      reuse    statistics
//!              |           |           |           |           |           |
//!              +-----------+------ Vec<Finding> ---+-----------+-----------+
//!                                      |
//!                        node bins / report-level messages
//!                                      |
//!                                 Aggregator --> Report
//! ```

pub mod engine;
pub mod error;
pub mod module;
pub mod modules;
pub mod report;

// --- Public API Re-exports ---

// Engine
pub use engine::{Analysis, Engine};

// Error
pub use error::RuleError;

// Extension point
pub use module::{AnalysisContext, Finding, RuleModule};

// Modules
pub use modules::{
    AccessibilityRules, EfficiencyRules, FeatureRules, LicenseRules, ReuseRules, StatisticsRules,
};

// Report
pub use report::{Aggregator, Report, Summary};
