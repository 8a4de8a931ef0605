//! 설정 관리.
//!
//! 이 모듈은 평가 엔진의 애플리케이션 설정을 정의하고 로드합니다.
//! 보정 상수, 고장 판정 기준, 기본 건강도 가중치를 모두 여기서 주입합니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{BrokenModelThresholds, EvaluationCalibration, HealthWeights};
use crate::error::{ScoringError, ScoringResult};
use crate::logging::LogFormat;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 모델 평가 보정 상수
    pub calibration: EvaluationCalibration,
    /// 분류 모델 고장 판정 기준
    pub broken_model: BrokenModelThresholds,
    /// 스냅샷에 가중치가 없을 때 사용할 기본 건강도 가중치
    pub health_weights: HealthWeights,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `EVALUATOR__CALIBRATION__ACCURACY_BEST=70` 형식으로 파일 값을 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("EVALUATOR")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> Result<Self, config::ConfigError> {
        Self::load("config/default.toml")
    }

    /// 설정 값의 일관성을 검증합니다.
    pub fn validate(&self) -> ScoringResult<()> {
        self.logging.format.parse::<LogFormat>()?;
        self.health_weights.validate()?;

        let c = &self.calibration;
        let pairs = [
            ("loss_improvement", c.loss_improvement_worst, c.loss_improvement_best),
            ("points", c.points_worst, c.points_best),
            ("accuracy", c.accuracy_worst, c.accuracy_best),
            ("profit", c.profit_worst, c.profit_best),
        ];
        for (name, worst, best) in pairs {
            if !(best > worst) {
                return Err(ScoringError::Config(format!(
                    "calibration.{name}: best({best})는 worst({worst})보다 커야 합니다"
                )));
            }
        }

        let limits = [
            ("loss_worsening_max_diff", c.loss_worsening_max_diff),
            ("loss_vs_val_loss_max_diff", c.loss_vs_val_loss_max_diff),
            ("predictions_vs_outcomes_max_diff", c.predictions_vs_outcomes_max_diff),
            ("prediction_neutrality_max_diff", c.prediction_neutrality_max_diff),
            ("training_improvement_target", c.training_improvement_target),
        ];
        for (name, value) in limits {
            if !(value > 0.0) {
                return Err(ScoringError::Config(format!(
                    "calibration.{name}는 0보다 커야 합니다: {value}"
                )));
            }
        }

        Ok(())
    }
}
