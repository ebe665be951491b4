//! 요청 폭주(DoS 유사) 탐지기 — 고정 bin 분당 요청 수
//!
//! 이벤트를 bin 경계에 내림 정렬된(floor-aligned) 고정 크기 bin으로
//! 나누고, 키별 피크 bin의 요청 수가 임계값 이상이면 인시던트를 냅니다.
//!
//! 의도적으로 슬라이딩 윈도우가 아닙니다. 한 이벤트가 두 bin에 겹쳐
//! 세어지는 일은 없지만, bin 경계에 걸친 버스트는 실제 슬라이딩 측정보다
//! 적게 셀 수 있습니다. 이는 수용된 휴리스틱 트레이드오프이며 무차별 대입
//! 탐지기의 슬라이딩 방식과 통일하지 않습니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use logvigil_core::event::HttpEvent;
use logvigil_core::types::{Incident, IncidentDetails, Severity};

/// 요청 폭주 탐지기
#[derive(Debug, Clone)]
pub struct FloodDetector {
    /// bin당 최소 요청 수 임계값
    rate_threshold: u64,
    /// bin 크기
    bin: Duration,
}

impl FloodDetector {
    /// 새 탐지기를 생성합니다. 통상 bin은 1분입니다.
    pub fn new(rate_threshold: u64, bin: Duration) -> Self {
        Self {
            rate_threshold,
            bin,
        }
    }

    /// 이벤트 집합에서 요청 폭주 인시던트를 탐지합니다.
    pub fn detect(&self, events: &[HttpEvent]) -> Vec<Incident> {
        let bin_secs = self.bin.num_seconds().max(1);

        // 키별 -> bin 시작 epoch 초 -> 요청 수
        let mut bins: BTreeMap<&str, BTreeMap<i64, u64>> = BTreeMap::new();
        for event in events {
            let secs = event.time.timestamp();
            let floored = secs.div_euclid(bin_secs) * bin_secs;
            *bins.entry(&event.ip).or_default().entry(floored).or_insert(0) += 1;
        }

        let mut incidents = Vec::new();
        for (ip, per_bin) in &bins {
            // 피크 bin: 최대 요청 수, 동률이면 이른 bin (BTreeMap 순회 순서)
            let Some((&bin_start, &count)) = per_bin
                .iter()
                .max_by_key(|(start, count)| (**count, std::cmp::Reverse(**start)))
            else {
                continue;
            };
            if count >= self.rate_threshold {
                tracing::debug!(
                    ip = %ip,
                    requests = count,
                    threshold = self.rate_threshold,
                    "request flood detected"
                );
                incidents.push(Incident::new(
                    *ip,
                    DateTime::<Utc>::from_timestamp(bin_start, 0),
                    Severity::High,
                    IncidentDetails::RequestFlood {
                        requests_in_minute: count,
                    },
                ));
            }
        }
        incidents
    }
}
