//! 메시지 카탈로그: 식별자 기반 문자열 조회
//!
//! 분석 모듈은 사용자에게 보이는 문장을 직접 쓰지 않고 식별자와 위치 인자만 넘깁니다.
//! [`Catalog`] 구현체가 식별자를 실제 문장으로 바꾸며, `{0}`, `{1}` … 자리에 인자를 채웁니다.
//!
//! # 사용 예시
//! ```
//! use caretaker_core::catalog::{Catalog, EnglishCatalog};
//!
//! let catalog = EnglishCatalog::new();
//! let text = catalog.lookup("reuse.noAuthorComments.summary", &["Quiz"]);
//! assert!(text.contains("Quiz"));
//! ```

use std::collections::HashMap;

/// 문자열 조회 인터페이스
///
/// 분석 엔진 진입점에 명시적으로 전달됩니다. 전역 싱글턴은 없습니다.
pub trait Catalog: Send + Sync {
    /// 식별자에 해당하는 템플릿을 조회하고 위치 인자를 치환합니다.
    ///
    /// 알 수 없는 식별자는 식별자 자체를 반환합니다.
    fn lookup(&self, id: &str, args: &[&str]) -> String;
}

/// 기본 영어 카탈로그
pub struct EnglishCatalog {
    templates: HashMap<&'static str, &'static str>,
}

impl EnglishCatalog {
    /// 내장 영어 템플릿으로 카탈로그를 생성합니다.
    pub fn new() -> Self {
        Self {
            templates: ENGLISH.iter().copied().collect(),
        }
    }

    /// 등록된 템플릿 수
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for EnglishCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for EnglishCatalog {
    fn lookup(&self, id: &str, args: &[&str]) -> String {
        match self.templates.get(id) {
            Some(template) => substitute(template, args),
            None => id.to_owned(),
        }
    }
}

/// `{n}` 자리표시자를 위치 인자로 치환합니다.
///
/// 인자가 부족한 자리표시자는 그대로 남깁니다.
/// 템플릿만 한 번 훑으므로 인자 안의 `{n}`은 다시 치환되지 않습니다.
pub fn substitute(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match placeholder(after, args) {
            Some((arg, consumed)) => {
                out.push_str(arg);
                rest = &after[consumed..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// `{` 다음 텍스트가 `n}` 형태이고 인자가 있으면 (인자, 소비한 길이)
fn placeholder<'a>(after: &str, args: &[&'a str]) -> Option<(&'a str, usize)> {
    let end = after.find('}')?;
    let digits = &after[..end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let arg = args.get(digits.parse::<usize>().ok()?)?;
    Some((*arg, end + 1))
}

const ENGLISH: &[(&str, &str)] = &[
    // accessibility
    (
        "accessibility.missingAltText.summary",
        "Missing alternative text for image {0}",
    ),
    (
        "accessibility.missingAltText.recommendation",
        "Add an alternative text to the image or mark it as decorative if it only serves a visual purpose.",
    ),
    (
        "accessibility.evaluation.summary",
        "Accessibility evaluation for {0}: {1}",
    ),
    (
        "accessibility.evaluation.recommendation",
        "Check the evaluation details at {0}.",
    ),
    // license
    ("license.placement.root", "{0} as main content"),
    ("license.placement.nested", "{0} at {1}"),
    (
        "license.missingLicense.summary",
        "Missing license information for {0}",
    ),
    (
        "license.missingLicense.recommendation",
        "Check the license of the material and set it in the metadata.",
    ),
    (
        "license.missingLicenseVersion.summary",
        "Missing license version for {0}",
    ),
    (
        "license.missingLicenseVersion.recommendation",
        "Set the version of the {0} license.",
    ),
    (
        "license.missingAuthor.summary",
        "Missing author information for {0}",
    ),
    (
        "license.missingAuthor.recommendation",
        "The license {0} requires attribution. Add the author to the metadata.",
    ),
    ("license.missingSource.summary", "Missing source for {0}"),
    (
        "license.missingSource.recommendation",
        "Add a link to the original material so that it can be attributed properly.",
    ),
    (
        "license.invalidLicenseAdaptation.summary",
        "{0} is marked as changed, but the license {1} does not allow adaptations",
    ),
    (
        "license.invalidLicenseAdaptation.recommendation",
        "Remove the material or obtain permission to publish the adaptation.",
    ),
    (
        "license.invalidLicenseRemix.summary",
        "The license {0} of {1} may not be compatible with the license {2} of the surrounding content",
    ),
    (
        "license.invalidLicenseRemix.recommendation",
        "Check whether the licenses may be combined and adjust the license of the surrounding content if necessary.",
    ),
    // efficiency
    (
        "efficiency.imageSize.summary",
        "Image file {0} is larger than recommended ({1} bytes, recommended at most {2} bytes)",
    ),
    (
        "efficiency.imageSize.reduceResolution",
        "Reduce the resolution of the image.",
    ),
    (
        "efficiency.imageSize.convertToJpeg",
        "Convert the image to the JPEG format.",
    ),
    (
        "efficiency.imageSize.reduceQuality",
        "Reduce the quality of the JPEG image.",
    ),
    (
        "efficiency.imageResolution.summary",
        "Image {0} has a resolution of {1}x{2} pixels, which is more than needed for display",
    ),
    (
        "efficiency.imageResolution.recommendation",
        "Scale the image down to at most {0}x{1} pixels.",
    ),
    // features
    (
        "features.unavailable.summary",
        "Could not check the features of {0}",
    ),
    (
        "features.unavailable.recommendation",
        "The package does not contain library information for {0}.",
    ),
    ("features.resume.full", "{0} supports resuming"),
    ("features.resume.none", "{0} does not support resuming"),
    ("features.xAPI.full", "{0} supports reporting via xAPI"),
    ("features.xAPI.none", "{0} does not support reporting via xAPI"),
    (
        "features.questionTypeContract.full",
        "{0} fully supports the question type contract",
    ),
    (
        "features.questionTypeContract.partial",
        "{0} partially supports the question type contract",
    ),
    (
        "features.questionTypeContract.none",
        "{0} does not support the question type contract",
    ),
    ("features.supportedFunctions", "Supported functions: {0}"),
    ("features.unsupportedFunctions", "Unsupported functions: {0}"),
    // reuse
    (
        "reuse.notCulturalWork.summary",
        "{0} is not licensed as a free cultural work",
    ),
    (
        "reuse.notCulturalWork.recommendation",
        "Consider a license approved for free cultural works, e.g. CC BY or CC BY-SA, to make reuse easier.",
    ),
    (
        "reuse.hasLicenseExtras.summary",
        "{0} contains additional license terms",
    ),
    (
        "reuse.hasLicenseExtras.recommendation",
        "Additional license terms may restrict reuse. Check whether they are necessary.",
    ),
    (
        "reuse.noAuthorComments.summary",
        "{0} has no author comments",
    ),
    (
        "reuse.noAuthorComments.recommendation",
        "Add author comments that explain how the material is meant to be used and reused.",
    ),
    // statistics
    (
        "statistics.contentTypeCount.summary",
        "{0} different content types are used",
    ),
    // engine
    (
        "engine.moduleFailure.summary",
        "The {0} check could not be completed: {1}",
    ),
];
