//! 분석 엔진 — 탐지/병합/보강의 전체 흐름 오케스트레이션
//!
//! [`AnalysisEngine`]은 설정에서 탐지기들을 구성하고, 한 번의 배치 실행으로
//! 탐지 -> 병합 -> 블랙리스트 보강을 수행합니다. 이미 적재된 유한한 이벤트
//! 집합에 대한 단일 패스 오프라인 계산이므로 중단/타임아웃 의미론이
//! 없습니다.
//!
//! # 내부 흐름
//! ```text
//! HttpEvent/AuthEvent -> Detectors -> merge_incidents -> Blacklist::annotate
//! ```

use chrono::Duration;

use logvigil_core::config::VigilConfig;
use logvigil_core::error::VigilError;
use logvigil_core::event::{AuthEvent, HttpEvent};
use logvigil_core::types::Incident;

use crate::blacklist::Blacklist;
use crate::detector::{
    EndpointScanDetector, FloodDetector, HttpBruteForceDetector, SshBruteForceDetector,
};
use crate::merge::merge_incidents;

/// 분석 엔진
///
/// 설정에서 한 번 구성되면 실행 동안 불변입니다.
pub struct AnalysisEngine {
    http_brute: HttpBruteForceDetector,
    ssh_brute: SshBruteForceDetector,
    flood: FloodDetector,
    scan: EndpointScanDetector,
}

impl AnalysisEngine {
    /// 설정에서 엔진을 구성합니다.
    ///
    /// 임계값/윈도우가 유효하지 않으면 어떤 이벤트도 처리하기 전에
    /// 에러를 반환합니다.
    pub fn from_config(config: &VigilConfig) -> Result<Self, VigilError> {
        config.validate()?;
        Ok(Self {
            http_brute: HttpBruteForceDetector::new(
                config.http.failure_status,
                config.http.brute_force_threshold,
                Duration::minutes(config.http.brute_force_window_mins as i64),
            ),
            ssh_brute: SshBruteForceDetector::new(
                config.ssh.failure_keyword.clone(),
                config.ssh.failed_threshold,
                Duration::minutes(config.ssh.window_mins as i64),
            ),
            flood: FloodDetector::new(
                config.http.flood_requests_per_minute,
                Duration::seconds(config.http.flood_bin_secs as i64),
            ),
            scan: EndpointScanDetector::new(config.scan.distinct_endpoint_threshold),
        })
    }

    /// 전체 분석을 실행합니다.
    ///
    /// 반환 목록은 중복 제거와 블랙리스트 보강이 끝난 최종 인시던트
    /// 컬렉션으로, 이후 리포팅에서 읽기 전용으로 사용됩니다.
    pub fn run(
        &self,
        http_events: &[HttpEvent],
        auth_events: &[AuthEvent],
        blacklist: &Blacklist,
    ) -> Vec<Incident> {
        tracing::info!(
            http_events = http_events.len(),
            auth_events = auth_events.len(),
            blacklist_entries = blacklist.len(),
            "starting analysis run"
        );

        let lists = vec![
            self.http_brute.detect(http_events),
            self.flood.detect(http_events),
            self.scan.detect(http_events),
            self.ssh_brute.detect(auth_events),
        ];

        let mut incidents = merge_incidents(lists);
        blacklist.annotate(&mut incidents);

        tracing::info!(incidents = incidents.len(), "analysis run complete");
        incidents
    }
}
