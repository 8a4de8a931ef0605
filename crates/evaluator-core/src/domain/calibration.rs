//! 점수 보정 상수.
//!
//! 모든 worst/best/최대 차이 값은 하드코딩 대신 이 구조체로 주입됩니다.
//! 설정 파일에서 일부만 지정하면 나머지는 기본값을 사용합니다.

use serde::{Deserialize, Serialize};

/// 모델 평가(EBE) 보정 상수.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationCalibration {
    /// 손실 개선율(%) 최악 기준 (기본값: 0.01)
    pub loss_improvement_worst: f64,
    /// 손실 개선율(%) 최선 기준 (기본값: 2)
    pub loss_improvement_best: f64,
    /// 손실 악화율(%) 허용 한도 (기본값: 1)
    pub loss_worsening_max_diff: f64,
    /// val_loss 초과율(%) 허용 한도 (기본값: 3)
    pub loss_vs_val_loss_max_diff: f64,
    /// 포인트 최악 기준 (기본값: 1)
    pub points_worst: f64,
    /// 포인트 최선 기준 (기본값: 25)
    pub points_best: f64,
    /// 정확도(%) 최악 기준 (기본값: 45)
    pub accuracy_worst: f64,
    /// 정확도(%) 최선 기준 (기본값: 60)
    pub accuracy_best: f64,
    /// 예측/결과 불균형(%) 허용 한도 (기본값: 50)
    pub predictions_vs_outcomes_max_diff: f64,
    /// 중립 예측 초과율(%) 허용 한도 (기본값: 50)
    pub prediction_neutrality_max_diff: f64,
    /// 수익률(%) 최악 기준 (기본값: 0)
    pub profit_worst: f64,
    /// 수익률(%) 최선 기준 (기본값: 25)
    pub profit_best: f64,
    /// 회귀 MAE 최악 기준 (기본값: 0.05)
    pub regression_mae_worst: f64,
    /// 회귀 MAE 최선 기준 (기본값: 0)
    pub regression_mae_best: f64,
    /// 회귀 MSE 최악 기준 (기본값: 0.005)
    pub regression_mse_worst: f64,
    /// 회귀 MSE 최선 기준 (기본값: 0)
    pub regression_mse_best: f64,
    /// 분류 학습 항목의 상대 개선 목표 (기본값: 0.1 = 10%)
    pub training_improvement_target: f64,
}

impl Default for EvaluationCalibration {
    fn default() -> Self {
        Self {
            loss_improvement_worst: 0.01,
            loss_improvement_best: 2.0,
            loss_worsening_max_diff: 1.0,
            loss_vs_val_loss_max_diff: 3.0,
            points_worst: 1.0,
            points_best: 25.0,
            accuracy_worst: 45.0,
            accuracy_best: 60.0,
            predictions_vs_outcomes_max_diff: 50.0,
            prediction_neutrality_max_diff: 50.0,
            profit_worst: 0.0,
            profit_best: 25.0,
            regression_mae_worst: 0.05,
            regression_mae_best: 0.0,
            regression_mse_worst: 0.005,
            regression_mse_best: 0.0,
            training_improvement_target: 0.1,
        }
    }
}

/// 분류 모델 "고장(broken)" 판정 기준.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokenModelThresholds {
    /// 포인트 중앙값 하한 (기본값: -40)
    pub min_points_median: f64,
    /// 비중립 포지션 수 하한 (기본값: 100)
    pub min_non_neutral_positions: u64,
    /// 정확도(%) 하한, 이 값 이하이면 고장 (기본값: 40)
    pub min_accuracy: f64,
    /// 예측/결과 불균형(%) 상한, 이 값 이상이면 고장 (기본값: 20)
    pub max_imbalance: f64,
}

impl Default for BrokenModelThresholds {
    fn default() -> Self {
        Self {
            min_points_median: -40.0,
            min_non_neutral_positions: 100,
            min_accuracy: 40.0,
            max_imbalance: 20.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_calibration_uses_defaults() {
        let calibration: EvaluationCalibration =
            serde_json::from_str(r#"{ "accuracy_best": 70.0 }"#).unwrap();
        assert_eq!(calibration.accuracy_best, 70.0);
        assert_eq!(calibration.accuracy_worst, 45.0);
        assert_eq!(calibration.points_best, 25.0);
    }

    #[test]
    fn test_broken_thresholds_default() {
        let thresholds = BrokenModelThresholds::default();
        assert_eq!(thresholds.min_points_median, -40.0);
        assert_eq!(thresholds.min_non_neutral_positions, 100);
    }
}
