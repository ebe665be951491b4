//! 무차별 대입 탐지기 — HTTP 실패 응답 / SSH 인증 실패
//!
//! 두 탐지기 모두 실패 조건으로 이벤트를 필터링한 뒤 슬라이딩 윈도우
//! 카운터를 돌리고, 키별 최대 카운트가 임계값 이상이면 인시던트를
//! 생성합니다. 인시던트의 `time`은 최대 카운트에 처음 도달한 시각입니다.

use chrono::Duration;

use logvigil_core::event::{AuthEvent, HttpEvent};
use logvigil_core::types::{Incident, IncidentDetails, Severity};

use super::peak;
use crate::window::sliding_window_counts_for;

/// HTTP 상태 코드 기반 무차별 대입 탐지기
///
/// 지정한 실패 상태 코드(예: 401)의 응답이 슬라이딩 윈도우 안에서
/// 임계값 이상 반복되는 IP를 찾습니다.
#[derive(Debug, Clone)]
pub struct HttpBruteForceDetector {
    /// 실패로 간주할 상태 코드
    status_code: u16,
    /// 윈도우 내 최소 발생 건수
    threshold: u64,
    /// 슬라이딩 윈도우 길이
    window: Duration,
}

impl HttpBruteForceDetector {
    /// 새 탐지기를 생성합니다.
    pub fn new(status_code: u16, threshold: u64, window: Duration) -> Self {
        Self {
            status_code,
            threshold,
            window,
        }
    }

    /// 이벤트 집합에서 무차별 대입 인시던트를 탐지합니다.
    pub fn detect(&self, events: &[HttpEvent]) -> Vec<Incident> {
        let failures = events.iter().filter(|e| e.status == self.status_code);
        let counts = sliding_window_counts_for(failures, self.window);

        let mut incidents = Vec::new();
        for (ip, series) in &counts {
            let Some((max_count, time)) = peak(series) else {
                continue;
            };
            if max_count >= self.threshold {
                tracing::debug!(
                    ip = %ip,
                    max_count,
                    threshold = self.threshold,
                    "http brute force detected"
                );
                incidents.push(Incident::new(
                    ip.clone(),
                    Some(time),
                    Severity::High,
                    IncidentDetails::HttpBruteForce {
                        status_code: self.status_code,
                        max_count,
                    },
                ));
            }
        }
        incidents
    }
}

/// SSH 인증 실패 무차별 대입 탐지기
///
/// 메시지에 실패 키워드(기본 "Failed password")가 포함된 이벤트를
/// 대상으로 하며, IP를 추출할 수 없는 라인은 그룹핑이 불가능하므로
/// 제외합니다.
#[derive(Debug, Clone)]
pub struct SshBruteForceDetector {
    /// 실패 판정 키워드
    keyword: String,
    /// 윈도우 내 최소 실패 수
    threshold: u64,
    /// 슬라이딩 윈도우 길이
    window: Duration,
}

impl SshBruteForceDetector {
    /// 새 탐지기를 생성합니다.
    pub fn new(keyword: impl Into<String>, threshold: u64, window: Duration) -> Self {
        Self {
            keyword: keyword.into(),
            threshold,
            window,
        }
    }

    /// 인증 이벤트 집합에서 무차별 대입 인시던트를 탐지합니다.
    pub fn detect(&self, events: &[AuthEvent]) -> Vec<Incident> {
        let failures = events.iter().filter(|e| e.message.contains(&self.keyword));
        let counts = sliding_window_counts_for(failures, self.window);

        let mut incidents = Vec::new();
        for (ip, series) in &counts {
            let Some((max_failed, time)) = peak(series) else {
                continue;
            };
            if max_failed >= self.threshold {
                tracing::debug!(
                    ip = %ip,
                    max_failed,
                    threshold = self.threshold,
                    "ssh brute force detected"
                );
                incidents.push(Incident::new(
                    ip.clone(),
                    Some(time),
                    Severity::High,
                    IncidentDetails::SshBruteForce { max_failed },
                ));
            }
        }
        incidents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use logvigil_core::types::IncidentKind;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn http_event(ip: &str, secs: i64, status: u16) -> HttpEvent {
        HttpEvent {
            ip: ip.to_owned(),
            time: t(secs),
            method: Some("GET".to_owned()),
            endpoint: Some("/login".to_owned()),
            protocol: Some("HTTP/1.1".to_owned()),
            status,
            size: 0,
            referer: "-".to_owned(),
            agent: "-".to_owned(),
            raw_request: "GET /login HTTP/1.1".to_owned(),
        }
    }

    fn auth_event(ip: Option<&str>, secs: i64, message: &str) -> AuthEvent {
        AuthEvent {
            time: t(secs),
            host: "server-01".to_owned(),
            service: "sshd".to_owned(),
            message: message.to_owned(),
            ip: ip.map(str::to_owned),
            user: None,
        }
    }

    #[test]
    fn emits_incident_at_exact_threshold() {
        let detector = HttpBruteForceDetector::new(401, 3, Duration::minutes(5));
        let events: Vec<_> = (0..3).map(|i| http_event("10.0.0.1", i, 401)).collect();
        let incidents = detector.detect(&events);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind(), IncidentKind::HttpBruteForce);
        assert_eq!(
            incidents[0].details,
            IncidentDetails::HttpBruteForce {
                status_code: 401,
                max_count: 3
            }
        );
    }

    #[test]
    fn below_threshold_emits_nothing() {
        let detector = HttpBruteForceDetector::new(401, 4, Duration::minutes(5));
        let events: Vec<_> = (0..3).map(|i| http_event("10.0.0.1", i, 401)).collect();
        assert!(detector.detect(&events).is_empty());
    }

    #[test]
    fn non_matching_status_is_ignored() {
        let detector = HttpBruteForceDetector::new(401, 2, Duration::minutes(5));
        let events = vec![
            http_event("10.0.0.1", 0, 200),
            http_event("10.0.0.1", 1, 200),
            http_event("10.0.0.1", 2, 404),
        ];
        assert!(detector.detect(&events).is_empty());
    }

    #[test]
    fn incident_time_is_first_peak() {
        // 3건이 윈도우에 모이는 최초 시각은 세 번째 이벤트 시각
        let detector = HttpBruteForceDetector::new(401, 3, Duration::minutes(5));
        let events: Vec<_> = (0..5).map(|i| http_event("10.0.0.1", i, 401)).collect();
        let incidents = detector.detect(&events);
        // 최대 카운트 5는 t=4에서 처음이자 마지막으로 도달
        assert_eq!(incidents[0].time, Some(t(4)));
    }

    #[test]
    fn empty_input_yields_no_incidents() {
        let detector = HttpBruteForceDetector::new(401, 1, Duration::minutes(5));
        assert!(detector.detect(&[]).is_empty());
    }

    #[test]
    fn window_eviction_prevents_slow_attempts() {
        // 10분 간격 실패 3건, 윈도우 5분: 최대 카운트는 1
        let detector = HttpBruteForceDetector::new(401, 2, Duration::minutes(5));
        let events = vec![
            http_event("10.0.0.1", 0, 401),
            http_event("10.0.0.1", 600, 401),
            http_event("10.0.0.1", 1200, 401),
        ];
        assert!(detector.detect(&events).is_empty());
    }

    #[test]
    fn ssh_detector_matches_keyword() {
        let detector = SshBruteForceDetector::new("Failed password", 2, Duration::minutes(10));
        let events = vec![
            auth_event(Some("203.0.113.5"), 0, "Failed password for root"),
            auth_event(Some("203.0.113.5"), 5, "Failed password for admin"),
            auth_event(Some("203.0.113.5"), 10, "Accepted password for deploy"),
        ];
        let incidents = detector.detect(&events);
        assert_eq!(incidents.len(), 1);
        assert_eq!(incidents[0].kind(), IncidentKind::SshBruteForce);
        assert_eq!(
            incidents[0].details,
            IncidentDetails::SshBruteForce { max_failed: 2 }
        );
    }

    #[test]
    fn ssh_detector_drops_events_without_ip() {
        let detector = SshBruteForceDetector::new("Failed password", 1, Duration::minutes(10));
        let events = vec![auth_event(None, 0, "Failed password for root")];
        assert!(detector.detect(&events).is_empty());
    }

    #[test]
    fn detects_multiple_keys_in_sorted_order() {
        let detector = HttpBruteForceDetector::new(401, 2, Duration::minutes(5));
        let events = vec![
            http_event("9.9.9.9", 0, 401),
            http_event("9.9.9.9", 1, 401),
            http_event("1.1.1.1", 0, 401),
            http_event("1.1.1.1", 1, 401),
        ];
        let incidents = detector.detect(&events);
        assert_eq!(incidents.len(), 2);
        assert_eq!(incidents[0].source_key, "1.1.1.1");
        assert_eq!(incidents[1].source_key, "9.9.9.9");
    }
}
