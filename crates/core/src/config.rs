//! 설정 관리: caretaker.toml 파싱 및 런타임 설정
//!
//! [`CaretakerConfig`]는 로깅과 분석 동작 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`CARETAKER_ANALYSIS_MIN_LEVEL=warning` 형식)
//! 3. 설정 파일 (`caretaker.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), caretaker_core::error::CaretakerError> {
//! use caretaker_core::config::CaretakerConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = CaretakerConfig::load("caretaker.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = CaretakerConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CaretakerError, ConfigError};
use crate::types::{Category, Level};

/// Caretaker 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaretakerConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 분석 설정
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// 효율성 검사 설정
    #[serde(default)]
    pub efficiency: EfficiencyConfig,
}

impl CaretakerConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CaretakerError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일이 없으면 기본값에 환경변수 오버라이드만 적용합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, CaretakerError> {
        let path = path.as_ref();
        match Self::load(path).await {
            Err(CaretakerError::Config(ConfigError::FileNotFound { .. })) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
            other => other,
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, CaretakerError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CaretakerError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                CaretakerError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, CaretakerError> {
        toml::from_str(toml_str).map_err(|e| {
            CaretakerError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `CARETAKER_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "CARETAKER_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "CARETAKER_GENERAL_LOG_FORMAT");

        // Analysis
        override_csv(&mut self.analysis.modules, "CARETAKER_ANALYSIS_MODULES");
        override_string(&mut self.analysis.min_level, "CARETAKER_ANALYSIS_MIN_LEVEL");
        override_bool(
            &mut self.analysis.include_raw,
            "CARETAKER_ANALYSIS_INCLUDE_RAW",
        );

        // Efficiency
        override_u32(
            &mut self.efficiency.zoom_factor,
            "CARETAKER_EFFICIENCY_ZOOM_FACTOR",
        );
        override_bool(
            &mut self.efficiency.check_image_size,
            "CARETAKER_EFFICIENCY_CHECK_IMAGE_SIZE",
        );
        override_bool(
            &mut self.efficiency.check_image_resolution,
            "CARETAKER_EFFICIENCY_CHECK_IMAGE_RESOLUTION",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), CaretakerError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        for module in &self.analysis.modules {
            if Category::from_str_loose(module).is_none() {
                return Err(ConfigError::InvalidValue {
                    field: "analysis.modules".to_owned(),
                    reason: format!("unknown module '{module}'"),
                }
                .into());
            }
        }

        if Level::from_str_loose(&self.analysis.min_level).is_none() {
            return Err(ConfigError::InvalidValue {
                field: "analysis.min_level".to_owned(),
                reason: format!("must be one of: {}", Level::NAMES.join(", ")),
            }
            .into());
        }

        if self.efficiency.zoom_factor == 0 || self.efficiency.zoom_factor > 16 {
            return Err(ConfigError::InvalidValue {
                field: "efficiency.zoom_factor".to_owned(),
                reason: "must be 1-16".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 분석 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 실행할 모듈 목록 (비어 있으면 전체)
    pub modules: Vec<String>,
    /// 보고서에 포함할 최소 수준
    pub min_level: String,
    /// 원본 입력 사실을 보고서에 포함할지 여부
    pub include_raw: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            modules: Category::ALL.iter().map(|c| c.as_str().to_owned()).collect(),
            min_level: "info".to_owned(),
            include_raw: true,
        }
    }
}

impl AnalysisConfig {
    /// 활성화된 모듈 분류 목록 (보고서 순서)
    pub fn enabled_categories(&self) -> Vec<Category> {
        if self.modules.is_empty() {
            return Category::ALL.to_vec();
        }
        Category::ALL
            .into_iter()
            .filter(|c| {
                self.modules
                    .iter()
                    .any(|m| Category::from_str_loose(m) == Some(*c))
            })
            .collect()
    }

    /// 최소 수준 (검증된 설정이면 항상 유효)
    pub fn min_level(&self) -> Level {
        Level::from_str_loose(&self.min_level).unwrap_or_default()
    }
}

/// 효율성 검사 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// 표시 크기 대비 허용 배율 (WCAG 확대 기준)
    pub zoom_factor: u32,
    /// 이미지 파일 크기 검사
    pub check_image_size: bool,
    /// 이미지 해상도 검사
    pub check_image_resolution: bool,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 4,
            check_image_size: true,
            check_image_resolution: true,
        }
    }
}

// ─── 환경변수 헬퍼 ──────────────────────────────────────────────────

fn override_string(target: &mut String, key: &str) {
    if let Ok(val) = std::env::var(key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, key: &str) {
    if let Ok(val) = std::env::var(key) {
        match val.to_lowercase().as_str() {
            "true" | "1" | "yes" => *target = true,
            "false" | "0" | "no" => *target = false,
            _ => warn!(key, value = %val, "ignoring invalid boolean override"),
        }
    }
}

fn override_u32(target: &mut u32, key: &str) {
    if let Ok(val) = std::env::var(key) {
        match val.parse() {
            Ok(v) => *target = v,
            Err(_) => warn!(key, value = %val, "ignoring invalid integer override"),
        }
    }
}

fn override_csv(target: &mut Vec<String>, key: &str) {
    if let Ok(val) = std::env::var(key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_is_valid() {
        CaretakerConfig::default().validate().unwrap();
    }

    #[test]
    fn default_enables_all_modules() {
        let config = CaretakerConfig::default();
        assert_eq!(config.analysis.enabled_categories(), Category::ALL.to_vec());
        assert_eq!(config.analysis.min_level(), Level::Info);
    }

    #[test]
    fn parse_partial_config() {
        let config = CaretakerConfig::parse(
            r#"
[analysis]
modules = ["license", "reuse"]
min_level = "caution"
"#,
        )
        .unwrap();
        assert_eq!(
            config.analysis.enabled_categories(),
            vec![Category::License, Category::Reuse]
        );
        assert_eq!(config.analysis.min_level(), Level::Caution);
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.efficiency.zoom_factor, 4);
    }

    #[test]
    fn unknown_module_fails_validation() {
        let config = CaretakerConfig::parse("[analysis]\nmodules = [\"spelling\"]").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn invalid_min_level_fails_validation() {
        let config = CaretakerConfig::parse("[analysis]\nmin_level = \"fatal\"").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_zoom_factor_fails_validation() {
        let config = CaretakerConfig::parse("[efficiency]\nzoom_factor = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_fails_to_parse() {
        let err = CaretakerConfig::parse("[general").unwrap_err();
        assert!(matches!(
            err,
            CaretakerError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    #[serial]
    fn env_overrides_apply() {
        // SAFETY: serial 테스트에서만 환경변수를 변경합니다.
        unsafe {
            std::env::set_var("CARETAKER_ANALYSIS_MIN_LEVEL", "warning");
            std::env::set_var("CARETAKER_ANALYSIS_MODULES", "license, statistics");
            std::env::set_var("CARETAKER_EFFICIENCY_ZOOM_FACTOR", "2");
        }

        let mut config = CaretakerConfig::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("CARETAKER_ANALYSIS_MIN_LEVEL");
            std::env::remove_var("CARETAKER_ANALYSIS_MODULES");
            std::env::remove_var("CARETAKER_EFFICIENCY_ZOOM_FACTOR");
        }

        assert_eq!(config.analysis.min_level(), Level::Warning);
        assert_eq!(
            config.analysis.enabled_categories(),
            vec![Category::License, Category::Statistics]
        );
        assert_eq!(config.efficiency.zoom_factor, 2);
    }

    #[test]
    #[serial]
    fn invalid_bool_override_is_ignored() {
        unsafe {
            std::env::set_var("CARETAKER_ANALYSIS_INCLUDE_RAW", "maybe");
        }
        let mut config = CaretakerConfig::default();
        config.apply_env_overrides();
        unsafe {
            std::env::remove_var("CARETAKER_ANALYSIS_INCLUDE_RAW");
        }
        assert!(config.analysis.include_raw);
    }
}
