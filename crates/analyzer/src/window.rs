//! 슬라이딩 타임 윈도우 카운터 — 키별 트레일링 윈도우 이벤트 수 계산
//!
//! 모든 이벤트에 대해, 같은 키의 이벤트 중 해당 이벤트 시각에서 끝나는
//! 트레일링 윈도우 `(t - W, t]` 안에 드는 개수를 계산합니다.
//! 윈도우는 인과적(미래를 보지 않음)이며 양 끝이 닫혀 있습니다
//! (`시간차 <= W`, 미만이 아님).
//!
//! 키별로 시각 오름차순 정렬(동일 시각은 입력 순서 유지) 후 투 포인터로
//! 한 번 훑으므로, 정렬 O(n log n) + 스캔 O(n)입니다.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use logvigil_core::event::SourceEvent;

/// 이벤트 하나의 윈도우 카운트
///
/// `count`는 현재 이벤트를 포함하여, 같은 키에서 윈도우 안에 든 이벤트 수입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// 이벤트 시각 (윈도우의 오른쪽 끝)
    pub time: DateTime<Utc>,
    /// 윈도우 내 같은 키 이벤트 수 (자기 자신 포함, 항상 >= 1)
    pub count: u64,
}

/// `(키, 시각)` 쌍에 대해 키별 윈도우 카운트 수열을 계산합니다.
///
/// 반환 맵은 키 오름차순으로 정렬되어 있어 (BTreeMap) 순회 결과가
/// 결정적입니다. 빈 입력은 빈 맵을 돌려줍니다.
pub fn sliding_window_counts<'a, I>(
    pairs: I,
    window: Duration,
) -> BTreeMap<String, Vec<WindowCount>>
where
    I: IntoIterator<Item = (&'a str, DateTime<Utc>)>,
{
    let mut grouped: BTreeMap<String, Vec<DateTime<Utc>>> = BTreeMap::new();
    for (key, time) in pairs {
        grouped.entry(key.to_owned()).or_default().push(time);
    }

    grouped
        .into_iter()
        .map(|(key, mut times)| {
            // 안정 정렬: 동일 시각은 입력 순서를 유지
            times.sort_by_key(|t| *t);
            (key, scan_counts(&times, window))
        })
        .collect()
}

/// [`SourceEvent`]를 구현한 이벤트 슬라이스에 대한 편의 래퍼
///
/// `source_key()`가 `None`인 이벤트(출처 불명)는 건너뜁니다.
pub fn sliding_window_counts_for<'a, E, I>(
    events: I,
    window: Duration,
) -> BTreeMap<String, Vec<WindowCount>>
where
    E: SourceEvent + 'a,
    I: IntoIterator<Item = &'a E>,
{
    sliding_window_counts(
        events
            .into_iter()
            .filter_map(|e| e.source_key().map(|key| (key, e.timestamp()))),
        window,
    )
}

/// 정렬된 시각 수열에 대한 투 포인터 스캔
fn scan_counts(times: &[DateTime<Utc>], window: Duration) -> Vec<WindowCount> {
    let mut counts = Vec::with_capacity(times.len());
    let mut left = 0;
    for right in 0..times.len() {
        while times[right] - times[left] > window {
            left += 1;
        }
        counts.push(WindowCount {
            time: times[right],
            count: (right - left + 1) as u64,
        });
    }
    counts
}
