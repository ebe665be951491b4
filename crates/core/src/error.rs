//! 에러 타입 — 도메인별 에러 정의

/// Logvigil 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum VigilError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 분석 엔진 에러
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
///
/// 임계값/윈도우 누락이나 0 이하 값은 탐지기가 의미 있는 결과를 낼 수 없으므로
/// 분석 시작 전에 치명적 에러로 보고합니다.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 분석 엔진 에러
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// 탐지기 구성 실패
    #[error("detector setup failed: {detector}: {reason}")]
    DetectorSetup { detector: String, reason: String },

    /// 블랙리스트 로딩 실패 (파일 없음 외의 I/O 에러)
    #[error("blacklist load failed: {path}: {reason}")]
    BlacklistLoad { path: String, reason: String },
}

/// 파싱 에러
///
/// 개별 로그 라인의 파싱 실패는 skip-and-continue 정책이므로
/// 이 에러가 전체 실행을 중단시키지는 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 지원하지 않는 형식
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// 라인 파싱 실패
    #[error("parse failed: {format} line {line}: {reason}")]
    Failed {
        format: String,
        line: usize,
        reason: String,
    },
}
