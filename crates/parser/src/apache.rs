//! Apache combined 형식 접근 로그 파서
//!
//! ```text
//! 127.0.0.1 - frank [10/Oct/2025:13:55:36 +0000] "GET /index.html HTTP/1.1" 200 2326 "-" "Mozilla/5.0"
//! ```
//!
//! 형식에 맞지 않는 라인은 에러로 중단하지 않고 건너뜁니다. 실제 로그에는
//! 잘린 라인이나 비표준 라인이 섞여 있는 것이 보통이기 때문입니다.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use logvigil_core::error::{ParseError, VigilError};
use logvigil_core::event::HttpEvent;

/// Apache combined 로그 라인 정규식
static APACHE_COMBINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^(?P<ip>\S+) (?P<ident>\S*) (?P<userid>\S*) \[(?P<time>[^\]]+)\] "(?P<request>[^"]+)" (?P<status>\d{3}) (?P<size>\S+) "(?P<referer>[^"]*)" "(?P<agent>[^"]*)""#,
    )
    .expect("apache combined regex is valid")
});

/// 타임존 포함 Apache 타임스탬프 형식 (예: 10/Oct/2025:13:55:36 +0000)
const APACHE_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
/// 타임존 없는 폴백 형식 — UTC로 간주
const APACHE_TIME_FORMAT_NAIVE: &str = "%d/%b/%Y:%H:%M:%S";

/// 로그 라인 하나를 [`HttpEvent`]로 파싱합니다.
pub fn parse_line(line: &str, line_no: usize) -> Result<HttpEvent, ParseError> {
    let caps = APACHE_COMBINED
        .captures(line)
        .ok_or_else(|| ParseError::Failed {
            format: "apache".to_owned(),
            line: line_no,
            reason: "line does not match combined log format".to_owned(),
        })?;

    let time = parse_timestamp(&caps["time"]).map_err(|reason| ParseError::Failed {
        format: "apache".to_owned(),
        line: line_no,
        reason,
    })?;

    // "GET /index.html HTTP/1.1" 형태가 아니면 세 필드 모두 None
    let request = &caps["request"];
    let mut parts = request.split_whitespace();
    let (method, endpoint, protocol) = match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(e), Some(p)) => (
            Some(m.to_owned()),
            Some(e.to_owned()),
            Some(p.to_owned()),
        ),
        _ => (None, None, None),
    };

    let status: u16 = caps["status"].parse().map_err(|_| ParseError::Failed {
        format: "apache".to_owned(),
        line: line_no,
        reason: format!("invalid status code: '{}'", &caps["status"]),
    })?;

    // 크기가 "-"이거나 숫자가 아니면 0
    let size: u64 = caps["size"].parse().unwrap_or(0);

    Ok(HttpEvent {
        ip: caps["ip"].to_owned(),
        time,
        method,
        endpoint,
        protocol,
        status,
        size,
        referer: caps["referer"].to_owned(),
        agent: caps["agent"].to_owned(),
        raw_request: request.to_owned(),
    })
}

/// Apache 타임스탬프를 파싱합니다.
///
/// 타임존이 포함된 형식을 먼저 시도하고, 실패하면 첫 토큰을 타임존 없는
/// 형식으로 파싱해 UTC로 간주합니다.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_str(raw, APACHE_TIME_FORMAT) {
        return Ok(t.with_timezone(&Utc));
    }
    let first_token = raw.split_whitespace().next().unwrap_or(raw);
    NaiveDateTime::parse_from_str(first_token, APACHE_TIME_FORMAT_NAIVE)
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp '{raw}': {e}"))
}

/// 여러 라인을 파싱합니다. 실패한 라인은 건너뛰고 로그만 남깁니다.
///
/// 반환 목록은 시각 오름차순으로 정렬됩니다 (동일 시각은 입력 순서 유지).
pub fn parse_lines(content: &str) -> Vec<HttpEvent> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, idx + 1) {
            Ok(event) => events.push(event),
            Err(e) => {
                skipped += 1;
                tracing::debug!(error = %e, "skipping malformed apache log line");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            parsed = events.len(),
            "some apache log lines could not be parsed"
        );
    }

    events.sort_by_key(|e| e.time);
    events
}

/// 파일에서 Apache 접근 로그를 파싱합니다.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<HttpEvent>, VigilError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let events = parse_lines(&content);
    tracing::info!(path = %path.display(), events = events.len(), "apache log parsed");
    Ok(events)
}
