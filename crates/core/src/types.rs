//! 도메인 타입 — 시스템 전역에서 사용되는 공통 타입
//!
//! 탐지기 출력인 [`Incident`]와 그 변형 페이로드 [`IncidentDetails`],
//! 심각도 [`Severity`]를 정의합니다. 병합기와 블랙리스트 보강기는
//! 공통 필드(kind, source_key, time)만 보고 동작하며, 탐지기별 지표는
//! 변형 페이로드 안에 격리됩니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 심각도 레벨
///
/// `Ord` 구현으로 심각도 비교가 가능합니다 (`Info < Low < Medium < High < Critical`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    /// 정보성 이벤트
    #[default]
    Info,
    /// 낮은 심각도
    Low,
    /// 중간 심각도
    Medium,
    /// 높은 심각도
    High,
    /// 치명적 — 즉시 대응 필요
    Critical,
}

impl Severity {
    /// 문자열에서 심각도를 파싱합니다.
    ///
    /// 대소문자를 구분하지 않습니다.
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" | "informational" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" | "med" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" | "crit" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "Info"),
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Critical => write!(f, "Critical"),
        }
    }
}

/// 인시던트 종류 태그
///
/// 어느 탐지기가 생성했는지 식별하며, 중복 제거 식별자의 일부입니다.
/// 직렬화 이름은 [`fmt::Display`] 출력과 같아 JSON/CSV/텍스트 리포트가
/// 동일한 태그를 씁니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentKind {
    /// HTTP 상태 코드 기반 무차별 대입 (예: 401 반복)
    #[serde(rename = "http_bruteforce")]
    HttpBruteForce,
    /// SSH 인증 실패 무차별 대입
    #[serde(rename = "ssh_bruteforce")]
    SshBruteForce,
    /// 분당 요청 수 초과 (DoS 유사)
    #[serde(rename = "request_flood")]
    RequestFlood,
    /// 다수의 서로 다른 엔드포인트 접근 (스캐닝)
    #[serde(rename = "endpoint_scan")]
    EndpointScan,
}

impl fmt::Display for IncidentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpBruteForce => write!(f, "http_bruteforce"),
            Self::SshBruteForce => write!(f, "ssh_bruteforce"),
            Self::RequestFlood => write!(f, "request_flood"),
            Self::EndpointScan => write!(f, "endpoint_scan"),
        }
    }
}

/// 탐지기별 지표 페이로드
///
/// 공통 필드는 [`Incident`]에 있고, 탐지기 고유 지표만 여기에 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum IncidentDetails {
    /// HTTP 무차별 대입: 윈도우 내 최대 실패 응답 수
    #[serde(rename = "http_bruteforce")]
    HttpBruteForce {
        /// 감시 대상 상태 코드 (예: 401)
        status_code: u16,
        /// 슬라이딩 윈도우에서 관측된 최대 건수
        max_count: u64,
    },
    /// SSH 무차별 대입: 윈도우 내 최대 실패 횟수
    #[serde(rename = "ssh_bruteforce")]
    SshBruteForce {
        /// 슬라이딩 윈도우에서 관측된 최대 실패 수
        max_failed: u64,
    },
    /// 요청 폭주: 최대 분당 요청 수
    #[serde(rename = "request_flood")]
    RequestFlood {
        /// 피크 분(bin)의 요청 수
        requests_in_minute: u64,
    },
    /// 엔드포인트 스캔: 고유 엔드포인트 수
    #[serde(rename = "endpoint_scan")]
    EndpointScan {
        /// 접근한 서로 다른 엔드포인트 수
        distinct_endpoints: u64,
    },
}

impl IncidentDetails {
    /// 페이로드에 해당하는 종류 태그를 반환합니다.
    pub fn kind(&self) -> IncidentKind {
        match self {
            Self::HttpBruteForce { .. } => IncidentKind::HttpBruteForce,
            Self::SshBruteForce { .. } => IncidentKind::SshBruteForce,
            Self::RequestFlood { .. } => IncidentKind::RequestFlood,
            Self::EndpointScan { .. } => IncidentKind::EndpointScan,
        }
    }
}

/// 탐지된 인시던트
///
/// 정확히 하나의 탐지기가 생성하며, 병합기에서 중복 제거될 수 있고,
/// 블랙리스트 보강기가 `blacklisted`를 한 번 설정한 뒤에는 읽기 전용입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// 인시던트 ID
    pub id: String,
    /// 플래그된 출처 키 (보통 IP 주소)
    pub source_key: String,
    /// 피크가 관측된 시각 — 피크 시각이 없는 탐지기(스캔)는 None
    pub time: Option<DateTime<Utc>>,
    /// 심각도
    pub severity: Severity,
    /// 블랙리스트 등재 여부 — 보강 전에는 항상 false
    pub blacklisted: bool,
    /// 탐지기별 지표
    #[serde(flatten)]
    pub details: IncidentDetails,
}

impl Incident {
    /// 새 인시던트를 생성합니다. `blacklisted`는 보강 전이므로 false입니다.
    pub fn new(
        source_key: impl Into<String>,
        time: Option<DateTime<Utc>>,
        severity: Severity,
        details: IncidentDetails,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_key: source_key.into(),
            time,
            severity,
            blacklisted: false,
            details,
        }
    }

    /// 종류 태그를 반환합니다.
    pub fn kind(&self) -> IncidentKind {
        self.details.kind()
    }

    /// 중복 제거 식별자 `(kind, source_key, time)`을 반환합니다.
    ///
    /// `time`이 없으면 빈 문자열 센티널을 사용하므로, 시각이 둘 다 없는
    /// 같은 종류/키의 인시던트는 서로 충돌(중복)합니다.
    pub fn dedup_key(&self) -> (IncidentKind, String, String) {
        (
            self.kind(),
            self.source_key.clone(),
            self.time.map(|t| t.to_rfc3339()).unwrap_or_default(),
        )
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.kind(), self.source_key)?;
        if let Some(t) = self.time {
            write!(f, " at {}", t.to_rfc3339())?;
        }
        if self.blacklisted {
            write!(f, " (blacklisted)")?;
        }
        Ok(())
    }
}
