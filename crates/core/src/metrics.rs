//! 메트릭 상수
//!
//! 분석 엔진이 `metrics::counter!()`, `metrics::histogram!()` 매크로에 넘기는
//! 메트릭 이름과 레이블 키를 중앙에서 정의합니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `caretaker_`
//! - 접미어: `_total` (counter), `_seconds` (histogram)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 분류 레이블 키 (accessibility, license, …)
pub const LABEL_CATEGORY: &str = "category";

/// 수준 레이블 키 (info, caution, warning, error)
pub const LABEL_LEVEL: &str = "level";

/// 모듈 레이블 키
pub const LABEL_MODULE: &str = "module";

// ─── 분석 메트릭 ────────────────────────────────────────────────────

/// 완료된 분석 수 (counter)
pub const ANALYSES_TOTAL: &str = "caretaker_analyses_total";

/// 생성된 메시지 수 (counter, label: category, level)
pub const MESSAGES_TOTAL: &str = "caretaker_messages_total";

/// 실패한 모듈 실행 수 (counter, label: module)
pub const MODULE_FAILURES_TOTAL: &str = "caretaker_module_failures_total";

/// 분석 소요 시간 (histogram, 초)
pub const ANALYSIS_DURATION_SECONDS: &str = "caretaker_analysis_duration_seconds";

/// 콘텐츠 트리 노드 수 (histogram)
pub const TREE_NODES: &str = "caretaker_tree_nodes";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names_share_prefix() {
        for name in [
            ANALYSES_TOTAL,
            MESSAGES_TOTAL,
            MODULE_FAILURES_TOTAL,
            ANALYSIS_DURATION_SECONDS,
            TREE_NODES,
        ] {
            assert!(name.starts_with("caretaker_"), "{name}");
        }
    }
}
