//! 학습 파이프라인이 생성한 모델 인증서(certificate) 레코드.
//!
//! 구조 검증(필드 존재/타입)은 인증서를 읽어 들이는 쪽에서 끝난 상태라고 가정합니다.
//! 평가에 필요한 값이 비어 있으면 `MissingData` 에러로 보고합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ScoringError, ScoringResult};

/// 에포크별 학습 기록.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
    #[serde(default)]
    pub accuracy: Vec<f64>,
    #[serde(default)]
    pub val_accuracy: Vec<f64>,
}

impl TrainingHistory {
    fn bounds(series: &[f64], name: &str) -> ScoringResult<(f64, f64)> {
        match (series.first(), series.last()) {
            (Some(first), Some(last)) => Ok((*first, *last)),
            _ => Err(ScoringError::MissingData(format!("training_history.{name}"))),
        }
    }

    /// 첫 에포크와 마지막 에포크의 loss.
    pub fn loss_bounds(&self) -> ScoringResult<(f64, f64)> {
        Self::bounds(&self.loss, "loss")
    }

    /// 첫 에포크와 마지막 에포크의 val_loss.
    pub fn val_loss_bounds(&self) -> ScoringResult<(f64, f64)> {
        Self::bounds(&self.val_loss, "val_loss")
    }

    /// 첫 에포크와 마지막 에포크의 accuracy.
    pub fn accuracy_bounds(&self) -> ScoringResult<(f64, f64)> {
        Self::bounds(&self.accuracy, "accuracy")
    }

    /// 첫 에포크와 마지막 에포크의 val_accuracy.
    pub fn val_accuracy_bounds(&self) -> ScoringResult<(f64, f64)> {
        Self::bounds(&self.val_accuracy, "val_accuracy")
    }

    /// 학습된 에포크 수.
    pub fn epochs(&self) -> usize {
        self.loss.len()
    }
}

/// 예측 방향별 탐색(discovery) 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Discovery {
    /// 전체 정확도 (비율 또는 퍼센트)
    pub accuracy: f64,
    /// 상승 예측 정확도
    pub increase_accuracy: f64,
    /// 하락 예측 정확도
    pub decrease_accuracy: f64,
    /// 상승 예측 수
    pub increase_predictions: u64,
    /// 실제 상승 수
    pub increase_outcomes: u64,
    /// 하락 예측 수
    pub decrease_predictions: u64,
    /// 실제 하락 수
    pub decrease_outcomes: u64,
    /// 중립 예측 수
    pub neutral_predictions: u64,
    /// 획득 포인트 합계
    pub points: f64,
    /// 포지션별 포인트 중앙값
    pub points_median: f64,
}

impl Discovery {
    /// 중립이 아닌 예측 수 (포지션 수).
    pub fn non_neutral_predictions(&self) -> u64 {
        self.increase_predictions
            .saturating_add(self.decrease_predictions)
    }
}

/// 백테스트 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backtest {
    /// 총 수익률 (%)
    pub profit: f64,
    /// 수수료 합계 (%)
    #[serde(default)]
    pub fees: f64,
    /// 포지션 정확도
    pub accuracy: f64,
    /// 획득 포인트 합계
    pub points: f64,
    /// 전체 포지션 수
    pub positions: u64,
    #[serde(default)]
    pub increase_positions: u64,
    #[serde(default)]
    pub decrease_positions: u64,
    #[serde(default)]
    pub increase_outcomes: u64,
    #[serde(default)]
    pub decrease_outcomes: u64,
}

impl Backtest {
    /// 수수료를 제외한 순수익률 (%).
    pub fn net_profit(&self) -> f64 {
        self.profit - self.fees
    }
}

/// 회귀 모델의 테스트 데이터셋 평가.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionTestEvaluation {
    pub mae: f64,
    pub mse: f64,
}

/// 분류 모델의 테스트 데이터셋 평가.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTestEvaluation {
    pub loss: f64,
    pub accuracy: f64,
}

/// 회귀 학습 인증서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionCertificate {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// 조기 종료된 학습 여부
    #[serde(default)]
    pub early_stopped: bool,
    pub training_history: TrainingHistory,
    pub test_evaluation: RegressionTestEvaluation,
    #[serde(default)]
    pub backtest: Option<Backtest>,
}

/// 분류 학습 인증서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationCertificate {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub early_stopped: bool,
    pub training_history: TrainingHistory,
    pub test_evaluation: ClassificationTestEvaluation,
    pub classification_evaluation: Discovery,
}

/// 회귀/분류 모델 조합으로 구성된 예측 모델 인증서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionModelCertificate {
    pub id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// 구성 회귀 모델 ID
    #[serde(default)]
    pub regressions: Vec<String>,
    /// 구성 분류 모델 ID
    #[serde(default)]
    pub classifications: Vec<String>,
    pub discovery: Discovery,
    #[serde(default)]
    pub backtest: Option<Backtest>,
}

/// 인증서 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificateKind {
    Regression,
    Classification,
    PredictionModel,
}

impl CertificateKind {
    /// 문자열 표현.
    pub fn as_str(&self) -> &'static str {
        match self {
            CertificateKind::Regression => "regression",
            CertificateKind::Classification => "classification",
            CertificateKind::PredictionModel => "prediction-model",
        }
    }
}

impl fmt::Display for CertificateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 종류별 인증서.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelCertificate {
    Regression(RegressionCertificate),
    Classification(ClassificationCertificate),
    PredictionModel(PredictionModelCertificate),
}

impl ModelCertificate {
    /// 종류를 지정해 JSON 값에서 인증서를 읽습니다.
    pub fn from_value(kind: CertificateKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            CertificateKind::Regression => Self::Regression(serde_json::from_value(value)?),
            CertificateKind::Classification => Self::Classification(serde_json::from_value(value)?),
            CertificateKind::PredictionModel => {
                Self::PredictionModel(serde_json::from_value(value)?)
            }
        })
    }

    pub fn kind(&self) -> CertificateKind {
        match self {
            Self::Regression(_) => CertificateKind::Regression,
            Self::Classification(_) => CertificateKind::Classification,
            Self::PredictionModel(_) => CertificateKind::PredictionModel,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Regression(cert) => &cert.id,
            Self::Classification(cert) => &cert.id,
            Self::PredictionModel(cert) => &cert.id,
        }
    }

    /// 조기 종료된 학습인지 확인합니다. 예측 모델은 학습 기록이 없으므로 항상 false입니다.
    pub fn early_stopped(&self) -> bool {
        match self {
            Self::Regression(cert) => cert.early_stopped,
            Self::Classification(cert) => cert.early_stopped,
            Self::PredictionModel(_) => false,
        }
    }
}
