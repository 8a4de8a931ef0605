//! 평가 엔진의 에러 타입.
//!
//! 점수 계산기는 입력 레코드가 이미 검증되었다고 가정합니다.
//! 전제 조건이 깨진 입력은 암묵적인 패닉 대신 이 모듈의 에러로 보고됩니다.

use thiserror::Error;

/// 점수 계산 에러.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    /// 최대 점수가 음수인 보정 구간
    #[error("잘못된 점수 구간: max_points={max_points}")]
    InvalidBand { max_points: String },

    /// NaN 또는 무한대 입력
    #[error("유한하지 않은 값: {field}")]
    NonFinite { field: String },

    /// 허용 범위를 벗어난 신호 값
    #[error("범위 초과: {field}={value} (허용 {min}..={max})")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// 범위 안이지만 정의되지 않은 신호 값 (예: 거래량 방향 0)
    #[error("정의되지 않은 신호 값: {field}={value}")]
    InvalidSignal { field: String, value: i64 },

    /// 가중치 맵에 기준 항목 누락
    #[error("가중치 누락: {0}")]
    MissingWeight(String),

    /// 음수 또는 유한하지 않은 가중치
    #[error("잘못된 가중치: {id}={value}")]
    InvalidWeight { id: String, value: f64 },

    /// 평가에 필요한 데이터 누락
    #[error("데이터 누락: {0}")]
    MissingData(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 점수 계산 작업을 위한 Result 타입.
pub type ScoringResult<T> = Result<T, ScoringError>;

impl ScoringError {
    /// 입력 레코드의 전제 조건 위반인지 확인합니다.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            ScoringError::NonFinite { .. }
                | ScoringError::OutOfRange { .. }
                | ScoringError::InvalidSignal { .. }
                | ScoringError::MissingWeight(_)
                | ScoringError::InvalidWeight { .. }
                | ScoringError::MissingData(_)
        )
    }

    /// 범위 초과 에러를 생성합니다.
    pub fn out_of_range(field: impl Into<String>, value: i64, min: i64, max: i64) -> Self {
        ScoringError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }
}

impl From<config::ConfigError> for ScoringError {
    fn from(err: config::ConfigError) -> Self {
        ScoringError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_violation() {
        let err = ScoringError::MissingWeight("trend_sum".to_string());
        assert!(err.is_precondition_violation());

        let err = ScoringError::Config("bad file".to_string());
        assert!(!err.is_precondition_violation());
    }

    #[test]
    fn test_out_of_range_message() {
        let err = ScoringError::out_of_range("prediction_state", 13, -12, 12);
        assert_eq!(
            err.to_string(),
            "범위 초과: prediction_state=13 (허용 -12..=12)"
        );
    }
}
