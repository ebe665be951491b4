//! 블랙리스트 — 알려진 악성 출처 키 집합 로딩과 인시던트 보강
//!
//! 블랙리스트는 한 줄에 키 하나인 텍스트 파일에서 실행당 한 번 로드되며
//! 실행 동안 불변입니다. 파일이 없으면 에러가 아니라 빈 집합으로
//! 진행합니다 (경고 로그만 남김).

use std::collections::HashSet;
use std::path::Path;

use logvigil_core::error::AnalysisError;
use logvigil_core::types::Incident;

/// 알려진 악성 출처 키 집합
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    keys: HashSet<String>,
}

impl Blacklist {
    /// 빈 블랙리스트를 생성합니다.
    pub fn empty() -> Self {
        Self::default()
    }

    /// 키 목록에서 블랙리스트를 생성합니다.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// 파일에서 블랙리스트를 로드합니다.
    ///
    /// 한 줄에 키 하나, 앞뒤 공백은 제거하고 빈 줄과 `#` 주석 줄은
    /// 무시합니다. 파일이 없으면 빈 집합을 반환합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %path.display(),
                    "blacklist file not found, proceeding with empty set"
                );
                return Ok(Self::empty());
            }
            Err(e) => {
                return Err(AnalysisError::BlacklistLoad {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let keys: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_owned)
            .collect();

        tracing::info!(path = %path.display(), entries = keys.len(), "blacklist loaded");
        Ok(Self { keys })
    }

    /// 키가 블랙리스트에 있는지 확인합니다.
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// 등재된 키 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// 블랙리스트가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// 인시던트 목록에 블랙리스트 등재 여부를 표시합니다.
    ///
    /// 각 인시던트의 `blacklisted`를 집합 포함 여부로 설정할 뿐,
    /// 목록을 필터링하거나 재정렬하지 않습니다. 멱등적입니다.
    pub fn annotate(&self, incidents: &mut [Incident]) {
        for incident in incidents.iter_mut() {
            incident.blacklisted = self.contains(&incident.source_key);
        }
    }
}
