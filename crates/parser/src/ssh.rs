//! SSH auth.log 스타일 인증 로그 파서
//!
//! ```text
//! Oct 10 13:55:36 server-01 sshd[1234]: Failed password for root from 203.0.113.5 port 22 ssh2
//! ```
//!
//! auth.log 타임스탬프에는 연도가 없으므로 호출자가 기준 연도를 명시적으로
//! 넘깁니다. 파서 내부에서 시스템 시계를 읽지 않으므로, 같은 입력과 같은
//! 기준 연도는 언제 실행해도 같은 이벤트를 만듭니다. 타임스탬프를 복원할
//! 수 없는 라인(존재하지 않는 날짜 등)은 건너뜁니다.

use std::path::Path;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use logvigil_core::error::{ParseError, VigilError};
use logvigil_core::event::AuthEvent;

/// syslog 프리픽스 정규식: `MMM DD HH:MM:SS host service[pid]: msg`
static SSH_AUTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<month>\w{3})\s+(?P<day>\d{1,2})\s+(?P<time>\d{2}:\d{2}:\d{2})\s+(?P<host>\S+)\s+(?P<service>[\w\-/]+)\[\d+\]:\s+(?P<msg>.*)",
    )
    .expect("ssh auth regex is valid")
});

/// 메시지 안의 IPv4 주소
static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:\.\d{1,3}){3})").expect("ipv4 regex is valid")
});

/// "for <user> " 패턴의 사용자명
static USER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"for (\S+)\s").expect("user regex is valid"));

/// 월 이름 약어를 월 번호로 변환합니다.
fn month_number(name: &str) -> Option<u32> {
    match name {
        "Jan" => Some(1),
        "Feb" => Some(2),
        "Mar" => Some(3),
        "Apr" => Some(4),
        "May" => Some(5),
        "Jun" => Some(6),
        "Jul" => Some(7),
        "Aug" => Some(8),
        "Sep" => Some(9),
        "Oct" => Some(10),
        "Nov" => Some(11),
        "Dec" => Some(12),
        _ => None,
    }
}

/// 로그 라인 하나를 [`AuthEvent`]로 파싱합니다.
///
/// `reference_year`는 연도 없는 타임스탬프의 복원에 사용됩니다.
pub fn parse_line(line: &str, reference_year: i32, line_no: usize) -> Result<AuthEvent, ParseError> {
    let caps = SSH_AUTH.captures(line).ok_or_else(|| ParseError::Failed {
        format: "ssh_auth".to_owned(),
        line: line_no,
        reason: "line does not match auth.log format".to_owned(),
    })?;

    let time = build_timestamp(&caps["month"], &caps["day"], &caps["time"], reference_year)
        .ok_or_else(|| ParseError::Failed {
            format: "ssh_auth".to_owned(),
            line: line_no,
            reason: format!(
                "cannot build timestamp from '{} {} {}' in year {}",
                &caps["month"], &caps["day"], &caps["time"], reference_year
            ),
        })?;

    let message = caps["msg"].to_owned();
    let ip = IPV4
        .captures(&message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned());
    let user = USER
        .captures(&message)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_owned());

    Ok(AuthEvent {
        time,
        host: caps["host"].to_owned(),
        service: caps["service"].to_owned(),
        message,
        ip,
        user,
    })
}

/// 월/일/시각 문자열과 기준 연도로 UTC 타임스탬프를 만듭니다.
fn build_timestamp(month: &str, day: &str, time: &str, year: i32) -> Option<DateTime<Utc>> {
    let month = month_number(month)?;
    let day: u32 = day.parse().ok()?;

    let mut parts = time.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = parts.next()?.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
}

/// 여러 라인을 파싱합니다. 실패한 라인은 건너뛰고 로그만 남깁니다.
///
/// 반환 목록은 시각 오름차순으로 정렬됩니다.
pub fn parse_lines(content: &str, reference_year: i32) -> Vec<AuthEvent> {
    let mut events = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line, reference_year, idx + 1) {
            Ok(event) => events.push(event),
            Err(e) => {
                skipped += 1;
                tracing::debug!(error = %e, "skipping malformed auth log line");
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            parsed = events.len(),
            "some auth log lines could not be parsed"
        );
    }

    events.sort_by_key(|e| e.time);
    events
}

/// 파일에서 SSH 인증 로그를 파싱합니다.
pub fn parse_file(path: impl AsRef<Path>, reference_year: i32) -> Result<Vec<AuthEvent>, VigilError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let events = parse_lines(&content, reference_year);
    tracing::info!(path = %path.display(), events = events.len(), "ssh auth log parsed");
    Ok(events)
}
