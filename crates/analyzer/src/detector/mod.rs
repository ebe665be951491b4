//! 탐지기 — 이벤트 집합을 인시던트로 줄이는 독립 정책들
//!
//! 모든 탐지기는 같은 골격을 공유합니다: 이벤트를 필터링/그룹핑하고,
//! (해당되는 경우) 슬라이딩 윈도우 카운터를 돌린 뒤, 피크 통계 하나로
//! 줄여 임계값과 비교합니다. 임계값 비교는 항상 `>=`이며, 피크가
//! 임계값과 정확히 같아도 인시던트를 냅니다.
//!
//! 필터링 후 이벤트가 없으면 에러가 아니라 빈 결과입니다.

mod brute_force;
mod flood;
mod scan;

pub use brute_force::{HttpBruteForceDetector, SshBruteForceDetector};
pub use flood::FloodDetector;
pub use scan::EndpointScanDetector;

use chrono::{DateTime, Utc};

use crate::window::WindowCount;

/// 윈도우 카운트 수열의 피크를 찾습니다.
///
/// 반환값은 `(최대 카운트, 최대에 처음 도달한 시각)`입니다.
/// 슬라이딩 윈도우 최대치는 여러 시각에서 반복될 수 있으므로
/// 가장 이른 도달 시각으로 고정합니다.
pub(crate) fn peak(counts: &[WindowCount]) -> Option<(u64, DateTime<Utc>)> {
    let mut best: Option<(u64, DateTime<Utc>)> = None;
    for wc in counts {
        match best {
            Some((max, _)) if wc.count <= max => {}
            _ => best = Some((wc.count, wc.time)),
        }
    }
    best
}
