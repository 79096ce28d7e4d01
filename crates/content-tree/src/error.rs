//! 콘텐츠 트리 에러 타입
//!
//! [`TreeError`]는 트리 구성 중 중단이 필요한 상황만 표현합니다.
//! 알 수 없는 라이브러리나 누락된 facts는 에러가 아니라 빈 필드로 처리됩니다.

use caretaker_core::error::{CaretakerError, PackageError};

/// 콘텐츠 트리 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// 매니페스트에서 메인 라이브러리(이름 + 버전)를 확인할 수 없음
    #[error("main library unresolved: {0}")]
    MainLibraryUnresolved(String),

    /// 탐색 조건의 정규식 컴파일 실패
    #[error("invalid pattern for attribute '{attribute}': {reason}")]
    InvalidPattern {
        /// 대상 속성명
        attribute: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<TreeError> for CaretakerError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::MainLibraryUnresolved(reason) => {
                CaretakerError::Package(PackageError::MainLibraryUnresolved(reason))
            }
            TreeError::InvalidPattern { attribute, reason } => CaretakerError::Package(
                PackageError::InvalidPattern(format!("{attribute}: {reason}")),
            ),
        }
    }
}
