//! 엔드포인트 스캔 탐지기 — 고유 엔드포인트 접근 폭 기반
//!
//! 키별로 접근한 서로 다른 엔드포인트 수를 세어 임계값 이상이면
//! 인시던트를 냅니다. 시간 차원이 없는 단순 휴리스틱이므로 인시던트에
//! 자연스러운 피크 시각이 없고 `time`은 항상 `None`입니다.

use std::collections::{BTreeMap, BTreeSet};

use logvigil_core::event::HttpEvent;
use logvigil_core::types::{Incident, IncidentDetails, Severity};

/// 엔드포인트 스캔 탐지기
#[derive(Debug, Clone)]
pub struct EndpointScanDetector {
    /// 스캔으로 간주할 고유 엔드포인트 최소 개수
    threshold: u64,
}

impl EndpointScanDetector {
    /// 새 탐지기를 생성합니다.
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    /// 이벤트 집합에서 스캔 인시던트를 탐지합니다.
    ///
    /// 엔드포인트가 기록되지 않은 이벤트는 세지 않습니다.
    pub fn detect(&self, events: &[HttpEvent]) -> Vec<Incident> {
        let mut endpoints: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for event in events {
            if let Some(endpoint) = event.endpoint.as_deref() {
                endpoints.entry(&event.ip).or_default().insert(endpoint);
            }
        }

        let mut incidents = Vec::new();
        for (ip, set) in &endpoints {
            let distinct = set.len() as u64;
            if distinct >= self.threshold {
                tracing::debug!(
                    ip = %ip,
                    distinct,
                    threshold = self.threshold,
                    "endpoint scan detected"
                );
                incidents.push(Incident::new(
                    *ip,
                    None,
                    Severity::Medium,
                    IncidentDetails::EndpointScan {
                        distinct_endpoints: distinct,
                    },
                ));
            }
        }
        incidents
    }
}
