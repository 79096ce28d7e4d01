#![doc = include_str!("../README.md")]

pub mod catalog;
pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{AnalysisError, CaretakerError, ConfigError, PackageError};

// 설정
pub use config::CaretakerConfig;

// 카탈로그
pub use catalog::{Catalog, EnglishCatalog};

// 도메인 타입
pub use types::{Category, Level, Message, MessageDetails, Remediation};
