//! 이벤트 모델 — 파서가 생성하고 분석 엔진이 소비하는 정규화 레코드
//!
//! 로그 소스별로 구체 타입이 하나씩 있습니다 ([`HttpEvent`], [`AuthEvent`]).
//! 엔진은 [`SourceEvent`] trait을 통해 타임스탬프와 그룹핑 키만 읽고,
//! 탐지기별 필드는 각 탐지기가 구체 타입에서 직접 읽습니다.
//! 이벤트는 파싱 시 한 번 생성된 뒤 불변입니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 윈도우 카운팅을 위한 이벤트 공통 인터페이스
///
/// `source_key()`가 `None`이면 출처를 특정할 수 없는 이벤트로,
/// 윈도우 카운팅에서 제외됩니다 (예: IP가 없는 auth.log 라인).
pub trait SourceEvent {
    /// 이벤트 발생 시각
    fn timestamp(&self) -> DateTime<Utc>;
    /// 그룹핑 키 (보통 출발지 IP)
    fn source_key(&self) -> Option<&str>;
}

/// Apache combined 형식 접근 로그 한 줄의 정규화 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEvent {
    /// 출발지 IP
    pub ip: String,
    /// 요청 시각
    pub time: DateTime<Utc>,
    /// HTTP 메서드 (GET, POST 등)
    pub method: Option<String>,
    /// 요청 엔드포인트 (경로)
    pub endpoint: Option<String>,
    /// 프로토콜 (HTTP/1.1 등)
    pub protocol: Option<String>,
    /// 응답 상태 코드
    pub status: u16,
    /// 응답 크기 (바이트, 미기록 시 0)
    pub size: u64,
    /// Referer 헤더
    pub referer: String,
    /// User-Agent 헤더
    pub agent: String,
    /// 원본 요청 라인
    pub raw_request: String,
}

impl SourceEvent for HttpEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }

    fn source_key(&self) -> Option<&str> {
        Some(&self.ip)
    }
}

/// SSH auth.log 스타일 인증 로그 한 줄의 정규화 레코드
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// 이벤트 시각 (auth.log에는 연도가 없어 파서가 기준 연도로 복원)
    pub time: DateTime<Utc>,
    /// 호스트명
    pub host: String,
    /// 서비스명 (sshd 등)
    pub service: String,
    /// 로그 메시지
    pub message: String,
    /// 메시지에서 추출한 출발지 IP (없을 수 있음)
    pub ip: Option<String>,
    /// 메시지에서 추출한 사용자명 (없을 수 있음)
    pub user: Option<String>,
}

impl SourceEvent for AuthEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.time
    }

    fn source_key(&self) -> Option<&str> {
        self.ip.as_deref()
    }
}
