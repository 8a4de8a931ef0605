//! tracing 기반 로깅 초기화.
//!
//! 평가기는 항목별 계산을 `debug`, 집계 결과를 `info`, 고장 모델 판정을 `warn`으로 기록합니다.
//! 로그는 stderr로만 출력합니다. stdout은 CLI의 JSON 결과 전용입니다.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::config::LoggingConfig;
use crate::error::{ScoringError, ScoringResult};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 여러 줄, 색상 포함 (개발용)
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집용)
    Json,
    /// 한 줄 텍스트
    Compact,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(ScoringError::Config(format!("알 수 없는 로그 형식: {other}"))),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 필터 지시문 (예: "info", "evaluator_engine=debug")
    pub level: String,
    pub format: LogFormat,
    /// span 생성/종료 이벤트 출력 (인증서 단위 소요 시간 확인용)
    pub with_span_events: bool,
    /// 파일명과 줄 번호 출력
    pub with_file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            with_span_events: false,
            with_file: false,
        }
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// 설정 파일의 `[logging]` 섹션에서 생성합니다.
    pub fn from_app_config(config: &LoggingConfig) -> ScoringResult<Self> {
        Ok(Self::new(config.level.clone()).with_format(config.format.parse()?))
    }

    /// `RUST_LOG`, `LOG_FORMAT` 환경 변수에서 생성합니다. 잘못된 형식은 pretty로 대체됩니다.
    pub fn from_env() -> Self {
        let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let format = std::env::var("LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        Self::new(level).with_format(format)
    }

    fn span_events(&self) -> FmtSpan {
        if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.with_file)
            .with_line_number(self.with_file)
            .with_span_events(self.span_events());

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// 전역 subscriber를 설치합니다.
///
/// `RUST_LOG`가 설정되어 있으면 `config.level`보다 우선합니다.
/// 이미 설치된 subscriber가 있으면 `Config` 에러입니다.
///
/// ```no_run
/// use evaluator_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("evaluator_engine=debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> ScoringResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ScoringError::Config(format!("잘못된 로그 필터 '{}': {e}", config.level)))?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(env_filter)
        .try_init()
        .map_err(|e| ScoringError::Config(format!("로깅 초기화 실패: {e}")))?;

    tracing::info!(format = %config.format, level = %config.level, "Logging initialized");
    Ok(())
}

/// 환경 변수 기반 [`init_logging`].
pub fn init_logging_from_env() -> ScoringResult<()> {
    init_logging(LogConfig::from_env())
}

/// 평가 대상(인증서 ID 등)을 필드로 갖는 span.
#[macro_export]
macro_rules! evaluation_span {
    ($name:expr, $subject:expr) => {
        tracing::info_span!($name, subject = %$subject)
    };
    ($name:expr, $subject:expr, $kind:expr) => {
        tracing::info_span!($name, subject = %$subject, kind = %$kind)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_round_trip_names() {
        for format in [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact] {
            assert_eq!(format.as_str().parse::<LogFormat>().unwrap(), format);
        }
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!(matches!("xml".parse::<LogFormat>(), Err(ScoringError::Config(_))));
    }

    #[test]
    fn test_from_app_config() {
        let config = LogConfig::from_app_config(&LoggingConfig {
            level: "debug".to_string(),
            format: "compact".to_string(),
        })
        .unwrap();
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Compact);
        assert!(!config.with_span_events);
    }

    #[test]
    fn test_from_app_config_rejects_unknown_format() {
        let result = LogConfig::from_app_config(&LoggingConfig {
            level: "info".to_string(),
            format: "yaml".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_span_events() {
        assert_eq!(LogConfig::default().span_events(), FmtSpan::NONE);
        let config = LogConfig::new("info").with_span_events(true);
        assert_eq!(config.span_events(), FmtSpan::NEW | FmtSpan::CLOSE);
    }
}
