//! 도메인 타입: 진단 메시지 모델
//!
//! 모든 분석 모듈이 생성하는 [`Message`]와 그 분류 체계를 정의합니다.
//! 메시지는 [`Category`]별로 묶여 보고서에 담깁니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 메시지 수준
///
/// `Ord` 구현으로 수준 비교가 가능합니다 (`Info < Caution < Warning < Error`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// 참고 정보
    #[default]
    Info,
    /// 개선 권장
    Caution,
    /// 문제 가능성 높음
    Warning,
    /// 명백한 문제
    Error,
}

impl Level {
    /// 문자열에서 수준을 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(Self::Info),
            "caution" => Some(Self::Caution),
            "warning" | "warn" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// 설정 검증용 전체 이름 목록
    pub const NAMES: [&'static str; 4] = ["info", "caution", "warning", "error"];
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Caution => write!(f, "caution"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// 메시지 분류
///
/// 보고서의 최상위 그룹입니다. 선언 순서가 보고서 출력 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// 접근성
    Accessibility,
    /// 라이선스
    License,
    /// 파일 효율성
    Efficiency,
    /// 기능 지원
    Features,
    /// 재사용성
    Reuse,
    /// 통계
    Statistics,
}

impl Category {
    /// 전체 분류 (보고서 순서)
    pub const ALL: [Category; 6] = [
        Self::Accessibility,
        Self::License,
        Self::Efficiency,
        Self::Features,
        Self::Reuse,
        Self::Statistics,
    ];

    /// 분류 이름 (`"accessibility"` 등)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accessibility => "accessibility",
            Self::License => "license",
            Self::Efficiency => "efficiency",
            Self::Features => "features",
            Self::Reuse => "reuse",
            Self::Statistics => "statistics",
        }
    }

    /// 문자열에서 분류를 파싱합니다 (대소문자 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 기계가 처리할 수 있는 개선 지시
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Remediation {
    /// 이미지 파일 크기 축소
    #[serde(rename_all = "camelCase")]
    ReduceImageSize {
        /// 파일 경로 (패키지 기준 상대 경로)
        path: String,
        /// 해상도 축소 권장
        reduce_resolution: bool,
        /// JPEG 변환 권장 (이미 JPEG이면 false)
        convert_to_jpeg: bool,
        /// 품질 축소 권장 (이미 JPEG인 경우)
        reduce_quality: bool,
        /// 목표 최대 바이트 수
        max_bytes: u64,
    },
    /// 이미지 해상도 축소
    #[serde(rename_all = "camelCase")]
    ScaleDown {
        /// 파일 경로
        path: String,
        /// 목표 최대 너비
        max_width: u32,
        /// 목표 최대 높이
        max_height: u32,
    },
}

/// 메시지 상세 정보
///
/// 경로, 제목, subContentId 같은 구조화된 값을 담는 순서 보존 맵입니다.
/// 통계처럼 임의의 키를 담는 메시지도 같은 타입을 사용합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDetails(Map<String, Value>);

impl MessageDetails {
    /// 빈 상세 정보를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 시맨틱 경로를 설정합니다.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        self.with("semanticsPath", Value::String(path.into()))
    }

    /// 제목을 설정합니다.
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.with("title", Value::String(title.into()))
    }

    /// subContentId를 설정합니다.
    pub fn with_sub_content_id(self, id: impl Into<String>) -> Self {
        self.with("subContentId", Value::String(id.into()))
    }

    /// 임의의 키/값을 설정합니다.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// 임의의 키/값을 삽입합니다.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// 키로 값을 조회합니다.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 문자열 값을 조회합니다.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// subContentId를 조회합니다.
    pub fn sub_content_id(&self) -> Option<&str> {
        self.get_str("subContentId")
    }

    /// 내부 맵을 반환합니다.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for MessageDetails {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// 진단 메시지
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 분류
    pub category: Category,
    /// 세부 유형 태그 (예: `"missingAltText"`)
    #[serde(rename = "type")]
    pub kind: String,
    /// 한 줄 요약
    pub summary: String,
    /// 권장 조치
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// 설명 (줄 단위)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub description: Vec<String>,
    /// 구조화된 상세 정보
    #[serde(default)]
    pub details: MessageDetails,
    /// 수준
    pub level: Level,
    /// 기계 처리용 개선 지시
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<Remediation>,
}

impl Message {
    /// 필수 필드로 메시지를 생성합니다.
    pub fn new(
        category: Category,
        kind: impl Into<String>,
        level: Level,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            category,
            kind: kind.into(),
            summary: summary.into(),
            recommendation: None,
            description: Vec::new(),
            details: MessageDetails::new(),
            level,
            remediation: None,
        }
    }

    /// 권장 조치를 설정합니다.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    /// 설명 줄을 설정합니다.
    pub fn with_description(mut self, lines: Vec<String>) -> Self {
        self.description = lines;
        self
    }

    /// 상세 정보를 설정합니다.
    pub fn with_details(mut self, details: MessageDetails) -> Self {
        self.details = details;
        self
    }

    /// 개선 지시를 설정합니다.
    pub fn with_remediation(mut self, remediation: Remediation) -> Self {
        self.remediation = Some(remediation);
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}/{}: {}",
            self.level, self.category, self.kind, self.summary
        )
    }
}
