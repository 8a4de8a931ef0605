//! 선언적 평가 템플릿.
//!
//! 카테고리 목록 → 항목 목록 → 평가 함수 + 파라미터로 구성됩니다.
//! 평가 함수는 태그된 enum이므로 알 수 없는 함수 이름은 역직렬화 단계에서 거부됩니다.
//!
//! ```json
//! {
//!   "name": "Training",
//!   "description": "Training history",
//!   "items": [{
//!     "name": "Loss Improvement",
//!     "description": "First vs last epoch loss",
//!     "evaluation": {
//!       "function": "evaluateLossImprovement",
//!       "params": { "first": 0.9, "last": 0.5, "max_points": 10 }
//!     }
//!   }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// 평가 함수와 파라미터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", content = "params")]
pub enum EvaluationFunction {
    /// 첫 에포크 대비 마지막 에포크 손실 개선
    #[serde(rename = "evaluateLossImprovement")]
    LossImprovement { first: f64, last: f64, max_points: f64 },

    /// 최종 loss 대비 최종 val_loss
    #[serde(rename = "evaluateLossVsValLoss")]
    LossVsValLoss {
        final_loss: f64,
        final_val_loss: f64,
        max_points: f64,
    },

    /// 테스트 데이터셋 오차 (보정 구간은 파라미터로 전달)
    #[serde(rename = "evaluateTestDatasetLoss")]
    TestDatasetLoss {
        value: f64,
        worst: f64,
        best: f64,
        max_points: f64,
    },

    /// 백테스트/탐색에서 획득한 포인트
    #[serde(rename = "evaluatePoints")]
    Points { received: f64, max_points: f64 },

    /// 정확도 (비율 또는 퍼센트)
    #[serde(rename = "evaluateAccuracy")]
    Accuracy { accuracy: f64, max_points: f64 },

    /// 예측 수와 실제 결과 수의 균형
    #[serde(rename = "evaluatePredictionsVsOutcomes")]
    PredictionsVsOutcomes {
        predictions: f64,
        outcomes: f64,
        max_points: f64,
    },

    /// 백테스트 수익률 (%)
    #[serde(rename = "evaluateProfit")]
    Profit { profit: f64, max_points: f64 },

    /// 비중립 예측과 중립 예측의 균형
    #[serde(rename = "evaluatePredictionNeutrality")]
    PredictionNeutrality {
        non_neutral: f64,
        neutral: f64,
        max_points: f64,
    },
}

impl EvaluationFunction {
    /// 원래 템플릿에서 사용하는 함수 이름.
    pub fn function_name(&self) -> &'static str {
        match self {
            EvaluationFunction::LossImprovement { .. } => "evaluateLossImprovement",
            EvaluationFunction::LossVsValLoss { .. } => "evaluateLossVsValLoss",
            EvaluationFunction::TestDatasetLoss { .. } => "evaluateTestDatasetLoss",
            EvaluationFunction::Points { .. } => "evaluatePoints",
            EvaluationFunction::Accuracy { .. } => "evaluateAccuracy",
            EvaluationFunction::PredictionsVsOutcomes { .. } => "evaluatePredictionsVsOutcomes",
            EvaluationFunction::Profit { .. } => "evaluateProfit",
            EvaluationFunction::PredictionNeutrality { .. } => "evaluatePredictionNeutrality",
        }
    }

    /// 이 항목의 최대 점수.
    pub fn max_points(&self) -> f64 {
        match self {
            EvaluationFunction::LossImprovement { max_points, .. }
            | EvaluationFunction::LossVsValLoss { max_points, .. }
            | EvaluationFunction::TestDatasetLoss { max_points, .. }
            | EvaluationFunction::Points { max_points, .. }
            | EvaluationFunction::Accuracy { max_points, .. }
            | EvaluationFunction::PredictionsVsOutcomes { max_points, .. }
            | EvaluationFunction::Profit { max_points, .. }
            | EvaluationFunction::PredictionNeutrality { max_points, .. } => *max_points,
        }
    }
}

/// 평가 항목 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemConfig {
    pub name: String,
    pub description: String,
    pub evaluation: EvaluationFunction,
}

impl ItemConfig {
    /// 새 항목 설정을 생성합니다.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        evaluation: EvaluationFunction,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            evaluation,
        }
    }

    /// 이름에서 파생한 항목 ID (소문자 snake_case).
    pub fn id(&self) -> String {
        let mut id = String::with_capacity(self.name.len());
        let mut pending_separator = false;
        for ch in self.name.chars() {
            if ch.is_alphanumeric() {
                if pending_separator && !id.is_empty() {
                    id.push('_');
                }
                pending_separator = false;
                id.extend(ch.to_lowercase());
            } else {
                pending_separator = true;
            }
        }
        id
    }
}

/// 평가 카테고리 설정.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub description: String,
    pub items: Vec<ItemConfig>,
}

impl CategoryConfig {
    /// 새 카테고리 설정을 생성합니다.
    pub fn new(name: impl Into<String>, description: impl Into<String>, items: Vec<ItemConfig>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_from_name() {
        let item = ItemConfig::new(
            "Loss vs. Val Loss",
            "",
            EvaluationFunction::Points {
                received: 1.0,
                max_points: 1.0,
            },
        );
        assert_eq!(item.id(), "loss_vs_val_loss");
    }

    #[test]
    fn test_evaluation_function_from_json() {
        let json = r#"{
            "function": "evaluateAccuracy",
            "params": { "accuracy": 0.55, "max_points": 10 }
        }"#;
        let function: EvaluationFunction = serde_json::from_str(json).unwrap();
        assert_eq!(
            function,
            EvaluationFunction::Accuracy {
                accuracy: 0.55,
                max_points: 10.0
            }
        );
        assert_eq!(function.function_name(), "evaluateAccuracy");
        assert_eq!(function.max_points(), 10.0);
    }

    #[test]
    fn test_unknown_function_rejected() {
        let json = r#"{ "function": "evaluateVibes", "params": {} }"#;
        assert!(serde_json::from_str::<EvaluationFunction>(json).is_err());
    }
}
