//! 에러 타입: 도메인별 에러 정의

/// Caretaker 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum CaretakerError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 패키지 입력(매니페스트, 파라미터) 관련 에러
    #[error("package error: {0}")]
    Package(#[from] PackageError),

    /// 분석 규칙 실행 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 패키지 입력 에러
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// 메인 라이브러리를 확인할 수 없음 (루트 콘텐츠 생성 불가)
    #[error("main library unresolved: {0}")]
    MainLibraryUnresolved(String),

    /// 잘못된 탐색 패턴
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// 입력 문서 파싱 실패
    #[error("failed to parse {file}: {reason}")]
    ParseFailed { file: String, reason: String },

    /// 패키지 파일 읽기 실패
    #[error("failed to read {file}: {reason}")]
    Unreadable { file: String, reason: String },
}

/// 분석 규칙 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 개별 모듈 실패
    #[error("module '{module}' failed: {reason}")]
    ModuleFailed { module: String, reason: String },
}
