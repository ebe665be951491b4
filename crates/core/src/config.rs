//! 설정 관리 — logvigil.toml 파싱 및 런타임 설정
//!
//! [`VigilConfig`]는 모든 탐지기와 리포트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGVIGIL_HTTP_FAILURE_STATUS=401` 형식)
//! 3. 설정 파일 (`logvigil.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # fn example() -> Result<(), logvigil_core::error::VigilError> {
//! use logvigil_core::config::VigilConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = VigilConfig::load("logvigil.toml")?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = VigilConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, VigilError};

/// Logvigil 통합 설정
///
/// `logvigil.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VigilConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// HTTP 접근 로그 탐지 설정
    #[serde(default)]
    pub http: HttpConfig,
    /// SSH 인증 로그 탐지 설정
    #[serde(default)]
    pub ssh: SshConfig,
    /// 엔드포인트 스캔 탐지 설정
    #[serde(default)]
    pub scan: ScanConfig,
    /// 블랙리스트 설정
    #[serde(default)]
    pub blacklist: BlacklistConfig,
    /// 리포트 출력 설정
    #[serde(default)]
    pub report: ReportConfig,
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 출력 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// HTTP 접근 로그 탐지 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 무차별 대입으로 간주할 실패 상태 코드
    pub failure_status: u16,
    /// 무차별 대입 임계값 (윈도우 내 최소 발생 건수)
    pub brute_force_threshold: u64,
    /// 무차별 대입 슬라이딩 윈도우 (분)
    pub brute_force_window_mins: u64,
    /// 요청 폭주 임계값 (분당 요청 수)
    pub flood_requests_per_minute: u64,
    /// 요청 폭주 고정 bin 크기 (초)
    pub flood_bin_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            failure_status: 401,
            brute_force_threshold: 20,
            brute_force_window_mins: 5,
            flood_requests_per_minute: 120,
            flood_bin_secs: 60,
        }
    }
}

/// SSH 인증 로그 탐지 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SshConfig {
    /// 실패 판정 키워드 (메시지 부분 문자열)
    pub failure_keyword: String,
    /// 실패 임계값 (윈도우 내 최소 실패 수)
    pub failed_threshold: u64,
    /// 슬라이딩 윈도우 (분)
    pub window_mins: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            failure_keyword: "Failed password".to_owned(),
            failed_threshold: 10,
            window_mins: 10,
        }
    }
}

/// 엔드포인트 스캔 탐지 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// 스캔으로 간주할 고유 엔드포인트 최소 개수
    pub distinct_endpoint_threshold: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            distinct_endpoint_threshold: 50,
        }
    }
}

/// 블랙리스트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlacklistConfig {
    /// 블랙리스트 대조 활성화 여부
    pub enabled: bool,
    /// 로컬 블랙리스트 파일 경로 (한 줄에 키 하나)
    pub path: String,
}

impl Default for BlacklistConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "blacklist.txt".to_owned(),
        }
    }
}

/// 리포트 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 출력 디렉토리
    pub out_dir: String,
    /// 출력 파일 기본 이름
    pub base_name: String,
    /// 내보내기 형식 (json, csv)
    pub formats: Vec<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            out_dir: "reports".to_owned(),
            base_name: "incidents".to_owned(),
            formats: vec!["json".to_owned(), "csv".to_owned()],
        }
    }
}

impl VigilConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    ///
    /// 검증은 하지 않습니다. 환경변수가 파일 값을 고칠 수 있도록
    /// [`load`](Self::load)가 오버라이드 적용 후에 검증합니다.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VigilError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                VigilError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, VigilError> {
        toml::from_str(toml_str).map_err(|e| {
            VigilError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGVIGIL_{SECTION}_{FIELD}`
    /// 예: `LOGVIGIL_HTTP_FAILURE_STATUS=403`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGVIGIL_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGVIGIL_GENERAL_LOG_FORMAT");

        // HTTP
        override_u16(&mut self.http.failure_status, "LOGVIGIL_HTTP_FAILURE_STATUS");
        override_u64(
            &mut self.http.brute_force_threshold,
            "LOGVIGIL_HTTP_BRUTE_FORCE_THRESHOLD",
        );
        override_u64(
            &mut self.http.brute_force_window_mins,
            "LOGVIGIL_HTTP_BRUTE_FORCE_WINDOW_MINS",
        );
        override_u64(
            &mut self.http.flood_requests_per_minute,
            "LOGVIGIL_HTTP_FLOOD_REQUESTS_PER_MINUTE",
        );
        override_u64(&mut self.http.flood_bin_secs, "LOGVIGIL_HTTP_FLOOD_BIN_SECS");

        // SSH
        override_string(
            &mut self.ssh.failure_keyword,
            "LOGVIGIL_SSH_FAILURE_KEYWORD",
        );
        override_u64(
            &mut self.ssh.failed_threshold,
            "LOGVIGIL_SSH_FAILED_THRESHOLD",
        );
        override_u64(&mut self.ssh.window_mins, "LOGVIGIL_SSH_WINDOW_MINS");

        // Scan
        override_u64(
            &mut self.scan.distinct_endpoint_threshold,
            "LOGVIGIL_SCAN_DISTINCT_ENDPOINT_THRESHOLD",
        );

        // Blacklist
        override_bool(&mut self.blacklist.enabled, "LOGVIGIL_BLACKLIST_ENABLED");
        override_string(&mut self.blacklist.path, "LOGVIGIL_BLACKLIST_PATH");

        // Report
        override_string(&mut self.report.out_dir, "LOGVIGIL_REPORT_OUT_DIR");
        override_string(&mut self.report.base_name, "LOGVIGIL_REPORT_BASE_NAME");
        override_csv(&mut self.report.formats, "LOGVIGIL_REPORT_FORMATS");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 임계값/윈도우가 0이면 탐지기가 의미 있는 출력을 낼 수 없으므로
    /// 분석 시작 전에 에러로 보고합니다.
    pub fn validate(&self) -> Result<(), VigilError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 양수 임계값/윈도우 검증
        require_positive(self.http.failure_status as u64, "http.failure_status")?;
        require_positive(self.http.brute_force_threshold, "http.brute_force_threshold")?;
        require_positive(
            self.http.brute_force_window_mins,
            "http.brute_force_window_mins",
        )?;
        require_positive(
            self.http.flood_requests_per_minute,
            "http.flood_requests_per_minute",
        )?;
        require_positive(self.http.flood_bin_secs, "http.flood_bin_secs")?;
        require_positive(self.ssh.failed_threshold, "ssh.failed_threshold")?;
        require_positive(self.ssh.window_mins, "ssh.window_mins")?;
        require_positive(
            self.scan.distinct_endpoint_threshold,
            "scan.distinct_endpoint_threshold",
        )?;

        if self.ssh.failure_keyword.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "ssh.failure_keyword".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        // report.formats 검증
        let valid_export = ["json", "csv"];
        for format in &self.report.formats {
            if !valid_export.contains(&format.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: "report.formats".to_owned(),
                    reason: format!(
                        "unknown format '{}', must be one of: {}",
                        format,
                        valid_export.join(", ")
                    ),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// 0이 아닌 값을 요구합니다.
fn require_positive(value: u64, field: &str) -> Result<(), VigilError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_owned(),
            reason: "must be greater than 0".to_owned(),
        }
        .into());
    }
    Ok(())
}

/// 환경변수가 있으면 String 필드를 오버라이드합니다.
fn override_string(target: &mut String, env_key: &str) {
    if let Ok(value) = std::env::var(env_key) {
        *target = value;
    }
}

/// 환경변수가 있으면 bool 필드를 오버라이드합니다.
fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(value) = std::env::var(env_key) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(env = env_key, value = %value, "invalid bool in env override, ignoring"),
        }
    }
}

/// 환경변수가 있으면 u16 필드를 오버라이드합니다.
fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(value) = std::env::var(env_key) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(env = env_key, value = %value, "invalid u16 in env override, ignoring"),
        }
    }
}

/// 환경변수가 있으면 u64 필드를 오버라이드합니다.
fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(value) = std::env::var(env_key) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(env = env_key, value = %value, "invalid u64 in env override, ignoring"),
        }
    }
}

/// 환경변수가 있으면 쉼표 구분 목록 필드를 오버라이드합니다.
fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(value) = std::env::var(env_key) {
        *target = value
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VigilConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn default_thresholds_match_original_tool() {
        let config = VigilConfig::default();
        assert_eq!(config.http.failure_status, 401);
        assert_eq!(config.http.brute_force_threshold, 20);
        assert_eq!(config.http.brute_force_window_mins, 5);
        assert_eq!(config.http.flood_requests_per_minute, 120);
        assert_eq!(config.ssh.failed_threshold, 10);
        assert_eq!(config.ssh.window_mins, 10);
        assert_eq!(config.scan.distinct_endpoint_threshold, 50);
    }

    #[test]
    fn parse_partial_toml_uses_defaults() {
        let config = VigilConfig::parse(
            r#"
            [http]
            failure_status = 403
            brute_force_threshold = 5
            brute_force_window_mins = 5
            flood_requests_per_minute = 120
            flood_bin_secs = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.http.failure_status, 403);
        assert_eq!(config.http.brute_force_threshold, 5);
        // 다른 섹션은 기본값
        assert_eq!(config.ssh.failed_threshold, 10);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn parse_rejects_invalid_toml() {
        assert!(VigilConfig::parse("not [valid toml").is_err());
    }

    #[test]
    fn validate_rejects_zero_threshold() {
        let mut config = VigilConfig::default();
        config.http.brute_force_threshold = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("brute_force_threshold"));
    }

    #[test]
    fn validate_rejects_zero_window() {
        let mut config = VigilConfig::default();
        config.ssh.window_mins = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_bin() {
        let mut config = VigilConfig::default();
        config.http.flood_bin_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_log_level() {
        let mut config = VigilConfig::default();
        config.general.log_level = "verbose".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_export_format() {
        let mut config = VigilConfig::default();
        config.report.formats = vec!["xml".to_owned()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_failure_keyword() {
        let mut config = VigilConfig::default();
        config.ssh.failure_keyword.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_missing_returns_file_not_found() {
        let err = VigilConfig::from_file("/nonexistent/logvigil.toml").unwrap_err();
        assert!(matches!(
            err,
            VigilError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn from_file_reads_toml() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ssh]\nfailure_keyword = \"Invalid user\"\nfailed_threshold = 3\nwindow_mins = 1").unwrap();
        let config = VigilConfig::from_file(file.path()).unwrap();
        assert_eq!(config.ssh.failure_keyword, "Invalid user");
        assert_eq!(config.ssh.failed_threshold, 3);
    }

    #[test]
    fn from_file_defers_validation() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[http]\nbrute_force_threshold = 0").unwrap();
        // 파일 값이 잘못돼도 로드는 성공하고, 검증에서만 걸린다
        let config = VigilConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http.brute_force_threshold, 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn env_override_corrects_invalid_file_value() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ssh]\nfailed_threshold = 0").unwrap();

        // 이 환경변수는 다른 테스트가 읽지 않는다
        unsafe { std::env::set_var("LOGVIGIL_SSH_FAILED_THRESHOLD", "7") };
        let result = VigilConfig::load(file.path());
        unsafe { std::env::remove_var("LOGVIGIL_SSH_FAILED_THRESHOLD") };

        let config = result.unwrap();
        assert_eq!(config.ssh.failed_threshold, 7);
    }
}
