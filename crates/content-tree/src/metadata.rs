//! 저작권/라이선스 메타데이터
//!
//! H5P 인스턴스의 `metadata` 객체와 미디어 필드의 `copyright` 객체를 같은 [`Metadata`]로 읽습니다.
//! 입력은 느슨하게 해석합니다: 누락되거나 타입이 맞지 않는 필드는 빈 값이 됩니다.

use serde::Serialize;
use serde_json::Value;

/// 라이선스 미공개 센티널
pub const UNDISCLOSED: &str = "U";

/// 저작자
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Author {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,
}

/// 변경 이력 한 건
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Change {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub log: String,
}

/// 콘텐츠 또는 파일의 메타데이터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: Option<String>,
    pub license: Option<String>,
    pub license_version: Option<String>,
    pub authors: Vec<Author>,
    pub author_comments: Option<String>,
    pub license_extras: Option<String>,
    pub changes: Vec<Change>,
    pub source: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
}

impl Metadata {
    /// H5P `metadata` 객체 (`h5p.json` 최상위 또는 인스턴스의 `metadata`)에서 읽습니다.
    pub fn from_h5p_metadata(value: &Value) -> Self {
        let authors = value
            .get("authors")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|a| {
                        let name = non_empty(a.get("name"))?;
                        Some(Author {
                            name,
                            role: non_empty(a.get("role")).unwrap_or_default(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let changes = value
            .get("changes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|c| c.is_object())
                    .map(|c| Change {
                        date: non_empty(c.get("date")).unwrap_or_default(),
                        author: non_empty(c.get("author")).unwrap_or_default(),
                        log: non_empty(c.get("log")).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            title: non_empty(value.get("title")),
            license: non_empty(value.get("license")),
            license_version: non_empty(value.get("licenseVersion")),
            authors,
            author_comments: non_empty(value.get("authorComments")),
            license_extras: non_empty(value.get("licenseExtras")),
            changes,
            source: non_empty(value.get("source")),
            year_from: scalar(value.get("yearFrom")),
            year_to: scalar(value.get("yearTo")),
        }
    }

    /// 미디어 필드의 `copyright` 객체에서 읽습니다.
    ///
    /// `author` 문자열은 저작자 목록 한 건으로, `version`은 라이선스 버전으로 옮깁니다.
    pub fn from_copyright(value: &Value) -> Self {
        let authors = non_empty(value.get("author"))
            .map(|name| {
                vec![Author {
                    name,
                    role: String::new(),
                }]
            })
            .unwrap_or_default();

        Self {
            title: non_empty(value.get("title")),
            license: non_empty(value.get("license")),
            license_version: non_empty(value.get("version")),
            authors,
            source: non_empty(value.get("source")),
            year_from: scalar(value.get("year")),
            ..Self::default()
        }
    }

    /// 라이선스 코드. 없으면 [`UNDISCLOSED`]
    pub fn license_or_undisclosed(&self) -> &str {
        self.license.as_deref().unwrap_or(UNDISCLOSED)
    }

    pub fn is_undisclosed(&self) -> bool {
        self.license_or_undisclosed() == UNDISCLOSED
    }

    pub fn has_author(&self) -> bool {
        !self.authors.is_empty()
    }

    /// 변경 이력이 있으면 원본의 각색물로 간주합니다.
    pub fn is_adaptation(&self) -> bool {
        !self.changes.is_empty()
    }
}

fn non_empty(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

fn scalar(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(n)) => Some(n.to_string()),
        other => non_empty(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_h5p_metadata() {
        let meta = Metadata::from_h5p_metadata(&json!({
            "title": "Book",
            "license": "CC BY-SA",
            "licenseVersion": "4.0",
            "authors": [{ "name": "Ada", "role": "Author" }, { "role": "Editor" }],
            "changes": [{ "date": "01-01-24", "author": "Bob", "log": "cropped" }],
            "authorComments": "Use freely",
            "yearFrom": 2020
        }));
        assert_eq!(meta.title.as_deref(), Some("Book"));
        assert_eq!(meta.license_or_undisclosed(), "CC BY-SA");
        assert_eq!(meta.authors.len(), 1);
        assert_eq!(meta.authors[0].name, "Ada");
        assert!(meta.is_adaptation());
        assert_eq!(meta.year_from.as_deref(), Some("2020"));
    }

    #[test]
    fn missing_license_is_undisclosed() {
        let meta = Metadata::from_h5p_metadata(&json!({ "license": "" }));
        assert!(meta.is_undisclosed());
        assert!(Metadata::from_h5p_metadata(&Value::Null).is_undisclosed());
    }

    #[test]
    fn reads_copyright_block() {
        let meta = Metadata::from_copyright(&json!({
            "license": "CC BY",
            "version": "4.0",
            "author": "Ada",
            "source": "https://example.org/a.png"
        }));
        assert_eq!(meta.license_version.as_deref(), Some("4.0"));
        assert!(meta.has_author());
        assert_eq!(meta.source.as_deref(), Some("https://example.org/a.png"));
    }

    #[test]
    fn wrong_types_degrade_to_empty() {
        let meta = Metadata::from_h5p_metadata(&json!({ "title": 3, "authors": "Ada" }));
        assert!(meta.title.is_none());
        assert!(meta.authors.is_empty());
    }
}
