//! 인시던트 병합기 — 탐지기별 목록의 결합과 중복 제거
//!
//! 여러 탐지기가 낸 인시던트 목록을 최초 등장 순서를 보존하며 이어붙인 뒤
//! `(kind, source_key, time)` 식별자로 중복을 제거합니다. 같은 식별자가
//! 여러 번 나오면 첫 번째 것만 남습니다. 입력이 같으면 출력 순서도 항상
//! 같습니다.

use std::collections::HashSet;

use logvigil_core::types::Incident;

/// 인시던트 목록들을 병합하고 중복을 제거합니다.
///
/// `time`이 없는 인시던트는 빈 문자열 센티널로 비교하므로, 시각이 둘 다
/// 없는 같은 종류/키의 인시던트는 중복으로 처리됩니다.
pub fn merge_incidents<I>(lists: I) -> Vec<Incident>
where
    I: IntoIterator<Item = Vec<Incident>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for list in lists {
        for incident in list {
            if seen.insert(incident.dedup_key()) {
                merged.push(incident);
            } else {
                tracing::debug!(
                    kind = %incident.kind(),
                    source_key = %incident.source_key,
                    "duplicate incident dropped"
                );
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use logvigil_core::types::{IncidentDetails, Severity};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn brute(ip: &str, time: Option<DateTime<Utc>>, max_count: u64) -> Incident {
        Incident::new(
            ip,
            time,
            Severity::High,
            IncidentDetails::HttpBruteForce {
                status_code: 401,
                max_count,
            },
        )
    }

    fn scan(ip: &str, distinct: u64) -> Incident {
        Incident::new(
            ip,
            None,
            Severity::Medium,
            IncidentDetails::EndpointScan {
                distinct_endpoints: distinct,
            },
        )
    }

    #[test]
    fn empty_lists_merge_to_empty() {
        let merged = merge_incidents([Vec::new(), Vec::new()]);
        assert!(merged.is_empty());
    }

    #[test]
    fn preserves_first_seen_order() {
        let merged = merge_incidents([
            vec![brute("b", Some(t(0)), 5)],
            vec![scan("a", 60), brute("c", Some(t(1)), 7)],
        ]);
        let keys: Vec<_> = merged.iter().map(|i| i.source_key.clone()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_keeps_first_occurrence() {
        // 같은 식별자, 다른 지표: 첫 목록의 값이 남아야 한다
        let merged = merge_incidents([
            vec![brute("1.2.3.4", Some(t(0)), 25)],
            vec![brute("1.2.3.4", Some(t(0)), 99)],
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].details,
            IncidentDetails::HttpBruteForce {
                status_code: 401,
                max_count: 25
            }
        );
    }

    #[test]
    fn different_times_are_not_duplicates() {
        let merged = merge_incidents([
            vec![brute("1.2.3.4", Some(t(0)), 25)],
            vec![brute("1.2.3.4", Some(t(1)), 25)],
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn different_kinds_are_not_duplicates() {
        let merged = merge_incidents([vec![brute("1.2.3.4", None, 25)], vec![scan("1.2.3.4", 60)]]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn both_missing_times_collide() {
        let merged = merge_incidents([vec![scan("1.2.3.4", 60)], vec![scan("1.2.3.4", 70)]]);
        assert_eq!(merged.len(), 1);
        assert_eq!(
            merged[0].details,
            IncidentDetails::EndpointScan {
                distinct_endpoints: 60
            }
        );
    }

    #[test]
    fn merge_is_deterministic() {
        let build = || {
            vec![
                vec![brute("b", Some(t(0)), 5), scan("a", 60)],
                vec![brute("a", Some(t(3)), 9), scan("a", 61)],
            ]
        };
        let first: Vec<_> = merge_incidents(build())
            .iter()
            .map(Incident::dedup_key)
            .collect();
        let second: Vec<_> = merge_incidents(build())
            .iter()
            .map(Incident::dedup_key)
            .collect();
        assert_eq!(first, second);
    }
}
