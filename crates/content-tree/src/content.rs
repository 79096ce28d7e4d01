//! 콘텐츠 노드와 미디어 파일 모델

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use caretaker_core::types::{Category, Message};

use crate::facts::{AccessibilityRecord, LibraryFacts, MediaFacts};
use crate::metadata::Metadata;

/// 루트 콘텐츠 식별자
pub const ROOT_ID: &str = "root";

/// 트리 arena 안의 노드 인덱스
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 노드 역할별 고정 필드
#[derive(Debug, Clone, PartialEq)]
pub enum ContentRole {
    /// 패키지의 메인 콘텐츠
    Root {
        /// 매니페스트의 `metadataSettings`
        metadata_settings: Option<Value>,
    },
    /// 다른 콘텐츠에 포함된 하위 콘텐츠
    SubContent {
        /// `library` 필드를 가진 객체의 경로 (`semantics_path`의 부모)
        library_path: String,
    },
}

/// 트리의 콘텐츠 노드
#[derive(Debug, Clone)]
pub struct Content {
    /// subContentId, 루트는 `"root"`
    pub id: String,
    pub role: ContentRole,
    /// 예: `"H5P.Image 1.1"`
    pub versioned_library_id: String,
    pub metadata: Metadata,
    /// 파라미터 위치, 루트는 `""`
    pub semantics_path: String,
    /// 이 인스턴스의 원본 파라미터
    pub params: Value,
    pub library: Option<LibraryFacts>,
    pub accessibility: Option<AccessibilityRecord>,
    pub files: Vec<ContentFile>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub messages: BTreeMap<Category, Vec<Message>>,
}

impl Content {
    pub fn new(
        id: impl Into<String>,
        role: ContentRole,
        versioned_library_id: impl Into<String>,
        semantics_path: impl Into<String>,
        params: Value,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: id.into(),
            role,
            versioned_library_id: versioned_library_id.into(),
            metadata,
            semantics_path: semantics_path.into(),
            params,
            library: None,
            accessibility: None,
            files: Vec::new(),
            parent: None,
            children: Vec::new(),
            messages: BTreeMap::new(),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.role, ContentRole::Root { .. })
    }

    /// 머신 이름 (버전 포함 식별자의 첫 토큰). 식별자가 비어 있으면 `None`
    pub fn machine_name(&self) -> Option<&str> {
        self.versioned_library_id.split_whitespace().next()
    }

    /// 제목. 없으면 `"Untitled"`
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or("Untitled")
    }

    /// 템플릿의 `{title}`, `{machineName}`을 치환합니다.
    pub fn describe(&self, template: &str) -> String {
        template
            .replace("{title}", self.title())
            .replace("{machineName}", self.machine_name().unwrap_or_default())
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 메시지를 분류별 목록 끝에 추가합니다.
    pub fn add_message(&mut self, message: Message) {
        self.messages
            .entry(message.category)
            .or_default()
            .push(message);
    }

    pub fn message_count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }
}

/// 미디어 파일 분류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Image,
    Audio,
    Video,
    File,
}

impl FileKind {
    /// MIME 최상위 타입으로 분류합니다.
    pub fn from_mime(mime: &str) -> Self {
        match mime.split('/').next().unwrap_or_default() {
            "image" => Self::Image,
            "audio" => Self::Audio,
            "video" => Self::Video,
            _ => Self::File,
        }
    }

    pub fn is_media(&self) -> bool {
        !matches!(self, Self::File)
    }
}

/// 콘텐츠가 참조하는 파일
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFile {
    pub kind: FileKind,
    /// 패키지 기준 상대 경로 (예: `images/file-1.png`)
    pub path: String,
    pub mime: String,
    /// 참조 필드의 파라미터 경로
    pub semantics_path: String,
    pub metadata: Metadata,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// 이미지 대체 텍스트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    pub decorative: bool,
}

impl ContentFile {
    /// 파라미터의 파일 객체(`{path, mime, copyright, width, height}`)에서 생성합니다.
    pub fn from_field(field: &Value, semantics_path: impl Into<String>) -> Option<Self> {
        let path = field.get("path")?.as_str()?.to_owned();
        let mime = field
            .get("mime")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let metadata = field
            .get("copyright")
            .map(Metadata::from_copyright)
            .unwrap_or_default();
        let dimension = |key: &str| {
            field
                .get(key)
                .and_then(Value::as_u64)
                .and_then(|v| u32::try_from(v).ok())
        };

        Some(Self {
            kind: FileKind::from_mime(&mime),
            width: dimension("width"),
            height: dimension("height"),
            path,
            mime,
            semantics_path: semantics_path.into(),
            metadata,
            size: None,
            payload: None,
            alt: None,
            decorative: false,
        })
    }

    /// 외부 미디어 정보로 크기/해상도/인라인 데이터를 채웁니다.
    pub fn enrich(&mut self, media: &MediaFacts) {
        self.size = media.size.or(self.size);
        self.width = media.width.or(self.width);
        self.height = media.height.or(self.height);
        if media.payload.is_some() {
            self.payload = media.payload.clone();
        }
    }

    /// 픽셀 수. 해상도를 모르면 `None`
    pub fn pixels(&self) -> Option<u64> {
        Some(u64::from(self.width?) * u64::from(self.height?))
    }
}
