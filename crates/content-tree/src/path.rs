//! 시맨틱 경로 유틸리티
//!
//! 경로는 `.`으로 구분된 키와 앞 세그먼트에 붙는 `[n]` 인덱스로 구성됩니다.
//! 예: `content[2].content.params`
//!
//! 조상 판정은 문자열 접두가 아니라 세그먼트 단위로 수행합니다.
//! `foo`는 `foo.bar`, `foo[0]`의 조상이지만 `foobar`의 조상은 아닙니다.

use std::cmp::Ordering;

/// 경로 세그먼트
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// 객체 키
    Key(String),
    /// 배열 인덱스
    Index(usize),
}

/// 부모 경로 뒤에 객체 키를 붙입니다.
pub fn join_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_owned()
    } else {
        format!("{parent}.{key}")
    }
}

/// 부모 경로 뒤에 배열 인덱스를 붙입니다.
pub fn join_index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// 기준 경로 뒤에 상대 경로를 이어 붙입니다.
pub fn concat(base: &str, relative: &str) -> String {
    if relative.is_empty() {
        base.to_owned()
    } else if base.is_empty() || relative.starts_with('[') {
        format!("{base}{relative}")
    } else {
        format!("{base}.{relative}")
    }
}

/// `ancestor`가 `path`의 진조상인지 세그먼트 단위로 판정합니다.
///
/// 빈 경로(루트)는 비어 있지 않은 모든 경로의 조상입니다.
pub fn is_ancestor(ancestor: &str, path: &str) -> bool {
    if ancestor.len() >= path.len() {
        return false;
    }
    if ancestor.is_empty() {
        return true;
    }
    path.starts_with(ancestor) && matches!(path.as_bytes()[ancestor.len()], b'.' | b'[')
}

/// 경로를 세그먼트 목록으로 분해합니다.
pub fn segments(path: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut key = String::new();
    let mut chars = path.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !key.is_empty() {
                    out.push(Segment::Key(std::mem::take(&mut key)));
                }
            }
            '[' => {
                if !key.is_empty() {
                    out.push(Segment::Key(std::mem::take(&mut key)));
                }
                let mut inner = String::new();
                for d in chars.by_ref() {
                    if d == ']' {
                        break;
                    }
                    inner.push(d);
                }
                match inner.parse::<usize>() {
                    Ok(idx) => out.push(Segment::Index(idx)),
                    Err(_) => out.push(Segment::Key(format!("[{inner}]"))),
                }
            }
            _ => key.push(c),
        }
    }
    if !key.is_empty() {
        out.push(Segment::Key(key));
    }
    out
}

/// 조상 경로가 먼저 오고, 그 외에는 세그먼트 순(인덱스는 숫자 순)으로 비교합니다.
pub fn compare(a: &str, b: &str) -> Ordering {
    segments(a).cmp(&segments(b))
}

/// 인덱스를 제거한 경로를 반환합니다. 예: `cards[0].image` → `cards.image`
pub fn strip_indices(path: &str) -> String {
    segments(path)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Key(k) => Some(k),
            Segment::Index(_) => None,
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// `/`로 구분된 파일 경로의 마지막 세그먼트
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
