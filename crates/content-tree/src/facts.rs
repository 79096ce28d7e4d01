//! 분석 입력 -- 매니페스트와 외부에서 준비된 사실(facts) 테이블
//!
//! 압축 해제, 이미지 검사, 외부 접근성 데이터 조회는 분석 전에 끝나 있어야 하며
//! 그 결과가 이 모듈의 평범한 데이터 타입으로 전달됩니다.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TreeError;
use crate::metadata::Metadata;

/// 매니페스트(`h5p.json`)가 선언한 의존 라이브러리
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRef {
    pub machine_name: String,
    pub major_version: u32,
    pub minor_version: u32,
}

impl LibraryRef {
    /// `machineName`, `majorVersion`, `minorVersion` 필드를 가진 객체에서 읽습니다.
    /// `h5p.json`의 의존성 항목과 `library.json` 모두 이 형식입니다.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            machine_name: value.get("machineName")?.as_str()?.to_owned(),
            major_version: version_number(value.get("majorVersion")?)?,
            minor_version: version_number(value.get("minorVersion")?)?,
        })
    }

    /// `"H5P.Image 1.1"` 형식의 버전 포함 식별자
    pub fn versioned_id(&self) -> String {
        format!(
            "{} {}.{}",
            self.machine_name, self.major_version, self.minor_version
        )
    }
}

fn version_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 패키지 매니페스트
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub main_library: Option<String>,
    pub preloaded_dependencies: Vec<LibraryRef>,
    /// 최상위 저작권 필드에서 읽은 메타데이터
    pub metadata: Metadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_settings: Option<Value>,
}

impl Manifest {
    /// `h5p.json` 문서에서 매니페스트를 읽습니다. 형식이 맞지 않는 항목은 무시합니다.
    pub fn from_value(value: &Value) -> Self {
        Self {
            main_library: value
                .get("mainLibrary")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            preloaded_dependencies: value
                .get("preloadedDependencies")
                .and_then(Value::as_array)
                .map(|deps| deps.iter().filter_map(LibraryRef::from_value).collect())
                .unwrap_or_default(),
            metadata: Metadata::from_h5p_metadata(value),
            metadata_settings: value.get("metadataSettings").cloned(),
        }
    }

    /// 메인 라이브러리의 버전 포함 식별자
    ///
    /// 메인 라이브러리 이름이 없거나 의존성 목록에 해당 버전이 없으면 루트를 만들 수 없습니다.
    pub fn main_library_id(&self) -> Result<String, TreeError> {
        let name = self.main_library.as_deref().ok_or_else(|| {
            TreeError::MainLibraryUnresolved("manifest has no mainLibrary".to_owned())
        })?;
        self.preloaded_dependencies
            .iter()
            .find(|dep| dep.machine_name == name)
            .map(LibraryRef::versioned_id)
            .ok_or_else(|| {
                TreeError::MainLibraryUnresolved(format!(
                    "no version declared for main library '{name}'"
                ))
            })
    }

    /// 매니페스트가 루트 메타데이터 편집을 비활성화했는지 여부
    pub fn metadata_disabled(&self) -> bool {
        self.metadata_settings
            .as_ref()
            .and_then(|s| s.get("disable"))
            .is_some_and(|v| v.as_bool() == Some(true) || v.as_u64() == Some(1))
    }
}

/// 외부 접근성 평가 기록 (그대로 재현됨)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibilityRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub url: String,
}

/// 라이브러리가 선언한 기능
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LibraryFacts {
    pub runnable: bool,
    pub preloaded_js: Vec<String>,
    /// 스크립트에서 발견된 기능 함수 이름
    pub functions: BTreeSet<String>,
    pub metadata_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<AccessibilityRecord>,
}

impl LibraryFacts {
    pub fn supports(&self, function: &str) -> bool {
        self.functions.contains(function)
    }
}

/// 미디어 파일 정보
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaFacts {
    /// 바이트 크기
    pub size: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// 인라인 데이터 참조 (예: data URI)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl MediaFacts {
    /// 다른 출처의 값으로 비어 있는 필드만 채웁니다.
    pub fn merge(&mut self, other: MediaFacts) {
        self.size = self.size.or(other.size);
        self.width = self.width.or(other.width);
        self.height = self.height.or(other.height);
        if self.payload.is_none() {
            self.payload = other.payload;
        }
    }
}

/// 한 번의 분석에 필요한 전체 입력
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFacts {
    pub manifest: Manifest,
    /// `content/content.json` 루트 파라미터
    pub params: Value,
    /// 머신 이름 -> 라이브러리 기능
    pub libraries: BTreeMap<String, LibraryFacts>,
    /// 패키지 기준 상대 경로 -> 미디어 정보
    pub media: BTreeMap<String, MediaFacts>,
    /// 머신 이름 -> 외부 접근성 평가
    pub accessibility: BTreeMap<String, AccessibilityRecord>,
}

impl PackageFacts {
    pub fn new(manifest: Manifest, params: Value) -> Self {
        Self {
            manifest,
            params,
            ..Self::default()
        }
    }

    pub fn with_library(mut self, machine_name: impl Into<String>, facts: LibraryFacts) -> Self {
        self.libraries.insert(machine_name.into(), facts);
        self
    }

    pub fn with_media(mut self, path: impl Into<String>, facts: MediaFacts) -> Self {
        self.media.insert(path.into(), facts);
        self
    }

    pub fn with_accessibility(
        mut self,
        machine_name: impl Into<String>,
        record: AccessibilityRecord,
    ) -> Self {
        self.accessibility.insert(machine_name.into(), record);
        self
    }

    /// 파일 경로로 미디어 정보를 찾습니다.
    ///
    /// 정확히 일치하는 키가 우선이며, 없으면 마지막 경로 세그먼트가 같은 항목을 사용합니다.
    pub fn media_for(&self, file_path: &str) -> Option<&MediaFacts> {
        if let Some(facts) = self.media.get(file_path) {
            return Some(facts);
        }
        let name = crate::path::file_name(file_path);
        self.media
            .iter()
            .find(|(key, _)| crate::path::file_name(key) == name)
            .map(|(_, facts)| facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest_json() -> Value {
        json!({
            "title": "Book",
            "mainLibrary": "H5P.InteractiveBook",
            "license": "CC BY",
            "preloadedDependencies": [
                { "machineName": "H5P.Image", "majorVersion": 1, "minorVersion": 1 },
                { "machineName": "H5P.InteractiveBook", "majorVersion": "1", "minorVersion": "10" }
            ]
        })
    }

    #[test]
    fn main_library_id_from_dependencies() {
        let manifest = Manifest::from_value(&manifest_json());
        assert_eq!(manifest.main_library_id().unwrap(), "H5P.InteractiveBook 1.10");
        assert_eq!(manifest.metadata.license.as_deref(), Some("CC BY"));
    }

    #[test]
    fn missing_main_library_is_unresolved() {
        let manifest = Manifest::from_value(&json!({ "title": "x" }));
        assert!(matches!(
            manifest.main_library_id(),
            Err(TreeError::MainLibraryUnresolved(_))
        ));
    }

    #[test]
    fn main_library_without_version_is_unresolved() {
        let manifest = Manifest::from_value(&json!({
            "mainLibrary": "H5P.Foo",
            "preloadedDependencies": [{ "machineName": "H5P.Foo" }]
        }));
        assert!(manifest.main_library_id().is_err());
    }

    #[test]
    fn metadata_settings_disable_flag() {
        let manifest = Manifest::from_value(&json!({ "metadataSettings": { "disable": 1 } }));
        assert!(manifest.metadata_disabled());
        assert!(!Manifest::default().metadata_disabled());
    }

    #[test]
    fn media_lookup_falls_back_to_file_name() {
        let facts = PackageFacts::default().with_media(
            "content/images/a.png",
            MediaFacts {
                size: Some(10),
                ..MediaFacts::default()
            },
        );
        assert_eq!(facts.media_for("images/a.png").and_then(|m| m.size), Some(10));
        assert!(facts.media_for("images/b.png").is_none());
    }

    #[test]
    fn merge_keeps_existing_values() {
        let mut media = MediaFacts {
            size: Some(5),
            ..MediaFacts::default()
        };
        media.merge(MediaFacts {
            size: Some(9),
            width: Some(100),
            height: Some(50),
            payload: None,
        });
        assert_eq!(media.size, Some(5));
        assert_eq!(media.width, Some(100));
    }

    #[test]
    fn accessibility_record_uses_type_key() {
        let record: AccessibilityRecord = serde_json::from_value(json!({
            "type": "report",
            "status": "passed",
            "url": "https://example.org"
        }))
        .unwrap();
        assert_eq!(record.kind, "report");
        assert!(record.description.is_empty());
    }
}
