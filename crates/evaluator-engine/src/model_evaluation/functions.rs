//! EBE 평가 함수.
//!
//! 모든 함수는 `(점수, 최대 점수, 상태 설명)`을 반환하는 순수 함수이며
//! worst/best 값은 [`EvaluationCalibration`]에서 가져옵니다.

use rust_decimal::Decimal;

use evaluator_core::{
    abs_percent_change, normalize_percentage, to_decimal, DecimalExt, EvaluationCalibration,
    EvaluationFunction, ScoreBand, ScoringResult,
};

use super::ModelEvaluationScorer;
use crate::point_scaler::PointScaler;

/// 평가 함수 하나의 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemScore {
    pub points: Decimal,
    pub max_points: Decimal,
    pub state: Option<String>,
}

impl ItemScore {
    fn new(points: Decimal, band: &ScoreBand, state: String) -> Self {
        Self {
            points,
            max_points: band.max_points(),
            state: Some(state),
        }
    }

    /// 만점.
    fn full(band: &ScoreBand, state: String) -> Self {
        Self::new(band.max_points(), band, state)
    }
}

/// 보정 구간 생성 헬퍼.
fn band(worst: f64, best: f64, max_points: f64, field: &str) -> ScoringResult<ScoreBand> {
    ScoreBand::new(
        to_decimal(worst, field)?,
        to_decimal(best, field)?,
        to_decimal(max_points, field)?,
    )
}

impl ModelEvaluationScorer {
    /// 평가 함수를 실행합니다.
    pub fn run(&self, function: &EvaluationFunction) -> ScoringResult<ItemScore> {
        let c = &self.calibration;
        match *function {
            EvaluationFunction::LossImprovement {
                first,
                last,
                max_points,
            } => loss_improvement(c, first, last, max_points),
            EvaluationFunction::LossVsValLoss {
                final_loss,
                final_val_loss,
                max_points,
            } => loss_vs_val_loss(c, final_loss, final_val_loss, max_points),
            EvaluationFunction::TestDatasetLoss {
                value,
                worst,
                best,
                max_points,
            } => test_dataset_loss(value, worst, best, max_points),
            EvaluationFunction::Points {
                received,
                max_points,
            } => points(c, received, max_points),
            EvaluationFunction::Accuracy {
                accuracy,
                max_points,
            } => self::accuracy(c, accuracy, max_points),
            EvaluationFunction::PredictionsVsOutcomes {
                predictions,
                outcomes,
                max_points,
            } => predictions_vs_outcomes(c, predictions, outcomes, max_points),
            EvaluationFunction::Profit { profit, max_points } => self::profit(c, profit, max_points),
            EvaluationFunction::PredictionNeutrality {
                non_neutral,
                neutral,
                max_points,
            } => prediction_neutrality(c, non_neutral, neutral, max_points),
        }
    }
}

/// 첫 에포크 대비 마지막 에포크 손실.
///
/// 개선되었으면 개선율을 `(worst, best)` 구간으로, 악화(또는 동일)되었으면
/// 악화율을 `(max_diff, 0)` 구간으로 환산합니다.
pub fn loss_improvement(
    c: &EvaluationCalibration,
    first: f64,
    last: f64,
    max_points: f64,
) -> ScoringResult<ItemScore> {
    let first = to_decimal(first, "loss.first")?;
    let last = to_decimal(last, "loss.last")?;
    let change = abs_percent_change(first, last);

    if last < first {
        let band = band(c.loss_improvement_worst, c.loss_improvement_best, max_points, "loss_improvement")?;
        Ok(ItemScore::new(
            PointScaler::scale(change, &band),
            &band,
            format!("Improved by {}", change.round_points().to_percentage_string()),
        ))
    } else {
        let band = band(c.loss_worsening_max_diff, 0.0, max_points, "loss_improvement")?;
        Ok(ItemScore::new(
            PointScaler::scale(change, &band),
            &band,
            format!("Worsened by {}", change.round_points().to_percentage_string()),
        ))
    }
}

/// 최종 loss 대비 최종 val_loss.
///
/// val_loss가 더 낮으면 만점, 아니면 초과율을 `(max_diff, 0)` 구간으로 환산합니다.
pub fn loss_vs_val_loss(
    c: &EvaluationCalibration,
    final_loss: f64,
    final_val_loss: f64,
    max_points: f64,
) -> ScoringResult<ItemScore> {
    let loss = to_decimal(final_loss, "final_loss")?;
    let val_loss = to_decimal(final_val_loss, "final_val_loss")?;
    let band = band(c.loss_vs_val_loss_max_diff, 0.0, max_points, "loss_vs_val_loss")?;

    if val_loss < loss {
        return Ok(ItemScore::full(&band, "Val loss below loss".to_string()));
    }
    let excess = abs_percent_change(loss, val_loss);
    Ok(ItemScore::new(
        PointScaler::scale(excess, &band),
        &band,
        format!("Val loss exceeds loss by {}", excess.round_points().to_percentage_string()),
    ))
}

/// 테스트 데이터셋 오차. 오차의 절대값을 주어진 구간으로 환산합니다.
pub fn test_dataset_loss(value: f64, worst: f64, best: f64, max_points: f64) -> ScoringResult<ItemScore> {
    let value = to_decimal(value, "test_dataset_loss")?.abs();
    let band = band(worst, best, max_points, "test_dataset_loss")?;
    Ok(ItemScore::new(
        PointScaler::scale(value, &band),
        &band,
        format!("{value}"),
    ))
}

/// 백테스트/탐색에서 획득한 포인트.
pub fn points(c: &EvaluationCalibration, received: f64, max_points: f64) -> ScoringResult<ItemScore> {
    let received = to_decimal(received, "points")?;
    let band = band(c.points_worst, c.points_best, max_points, "points")?;
    Ok(ItemScore::new(
        PointScaler::scale(received, &band),
        &band,
        format!("{} points", received.round_points()),
    ))
}

/// 정확도. 1 이하의 값은 비율로 보고 퍼센트로 변환합니다.
pub fn accuracy(c: &EvaluationCalibration, accuracy: f64, max_points: f64) -> ScoringResult<ItemScore> {
    let accuracy = normalize_percentage(to_decimal(accuracy, "accuracy")?);
    let band = band(c.accuracy_worst, c.accuracy_best, max_points, "accuracy")?;
    Ok(ItemScore::new(
        PointScaler::scale(accuracy, &band),
        &band,
        accuracy.round_points().to_percentage_string(),
    ))
}

/// 예측 수와 실제 결과 수의 차이율을 `(max_diff, 0)` 구간으로 환산합니다.
pub fn predictions_vs_outcomes(
    c: &EvaluationCalibration,
    predictions: f64,
    outcomes: f64,
    max_points: f64,
) -> ScoringResult<ItemScore> {
    let predictions = to_decimal(predictions, "predictions")?;
    let outcomes = to_decimal(outcomes, "outcomes")?;
    let diff = abs_percent_change(predictions, outcomes);
    let band = band(c.predictions_vs_outcomes_max_diff, 0.0, max_points, "predictions_vs_outcomes")?;
    Ok(ItemScore::new(
        PointScaler::scale(diff, &band),
        &band,
        format!(
            "{predictions} predictions vs {outcomes} outcomes ({})",
            diff.round_points().to_percentage_string()
        ),
    ))
}

/// 백테스트 수익률(%).
pub fn profit(c: &EvaluationCalibration, profit: f64, max_points: f64) -> ScoringResult<ItemScore> {
    let profit = to_decimal(profit, "profit")?;
    let band = band(c.profit_worst, c.profit_best, max_points, "profit")?;
    Ok(ItemScore::new(
        PointScaler::scale(profit, &band),
        &band,
        profit.round_points().to_percentage_string(),
    ))
}

/// 비중립 예측이 중립 예측 이상이면 만점, 아니면 부족율을 `(max_diff, 0)` 구간으로 환산합니다.
pub fn prediction_neutrality(
    c: &EvaluationCalibration,
    non_neutral: f64,
    neutral: f64,
    max_points: f64,
) -> ScoringResult<ItemScore> {
    let non_neutral = to_decimal(non_neutral, "non_neutral")?;
    let neutral = to_decimal(neutral, "neutral")?;
    let band = band(c.prediction_neutrality_max_diff, 0.0, max_points, "prediction_neutrality")?;

    if non_neutral >= neutral {
        return Ok(ItemScore::full(
            &band,
            format!("{non_neutral} non-neutral vs {neutral} neutral"),
        ));
    }
    let shortfall = abs_percent_change(neutral, non_neutral);
    Ok(ItemScore::new(
        PointScaler::scale(shortfall, &band),
        &band,
        format!(
            "{non_neutral} non-neutral vs {neutral} neutral ({} short)",
            shortfall.round_points().to_percentage_string()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evaluator_core::ScoringError;
    use rust_decimal_macros::dec;

    fn calibration() -> EvaluationCalibration {
        EvaluationCalibration::default()
    }

    #[test]
    fn test_loss_improvement() {
        let c = calibration();
        // 1% 개선 → 1 * 10 / 2 = 5
        let score = loss_improvement(&c, 1.0, 0.99, 10.0).unwrap();
        assert_eq!(score.points, dec!(5));
        assert_eq!(score.max_points, dec!(10));

        // 2% 이상 개선 → 만점
        assert_eq!(loss_improvement(&c, 1.0, 0.5, 10.0).unwrap().points, dec!(10));

        // 1% 이상 악화 → 0점
        let score = loss_improvement(&c, 1.0, 1.02, 10.0).unwrap();
        assert_eq!(score.points, dec!(0));
        assert!(score.state.unwrap().starts_with("Worsened"));

        // 동일 → 악화율 0 → 만점
        assert_eq!(loss_improvement(&c, 1.0, 1.0, 10.0).unwrap().points, dec!(10));
    }

    #[test]
    fn test_loss_vs_val_loss() {
        let c = calibration();
        assert_eq!(loss_vs_val_loss(&c, 0.5, 0.4, 10.0).unwrap().points, dec!(10));
        // 3% 이상 초과 → 0점
        assert_eq!(loss_vs_val_loss(&c, 1.0, 1.05, 10.0).unwrap().points, dec!(0));
        // 1.5% 초과: 3 / 1.5 = 2 → 10 / 9
        assert_eq!(loss_vs_val_loss(&c, 1.0, 1.015, 10.0).unwrap().points, dec!(1.11));
    }

    #[test]
    fn test_test_dataset_loss() {
        // MAE 0.025, worst 0.05 → 비율 1/2 → 35 / 9
        let score = test_dataset_loss(0.025, 0.05, 0.0, 35.0).unwrap();
        assert_eq!(score.points, dec!(3.89));
        assert_eq!(test_dataset_loss(0.001, 0.05, 0.0, 35.0).unwrap().points, dec!(35));
        assert_eq!(test_dataset_loss(0.06, 0.05, 0.0, 35.0).unwrap().points, dec!(0));
    }

    #[test]
    fn test_points() {
        let c = calibration();
        assert_eq!(points(&c, 12.5, 10.0).unwrap().points, dec!(5));
        assert_eq!(points(&c, -3.0, 10.0).unwrap().points, dec!(0));
        assert_eq!(points(&c, 40.0, 10.0).unwrap().points, dec!(10));
    }

    #[test]
    fn test_accuracy_fraction_and_percent_match() {
        let c = calibration();
        let fraction = accuracy(&c, 0.55, 10.0).unwrap();
        let percent = accuracy(&c, 55.0, 10.0).unwrap();
        assert_eq!(fraction, percent);
        // 55 * 10 / 60 = 9.1666 → 9.17
        assert_eq!(fraction.points, dec!(9.17));
    }

    #[test]
    fn test_accuracy_zero_anchored() {
        let c = EvaluationCalibration {
            accuracy_worst: 45.0,
            accuracy_best: 60.0,
            ..calibration()
        };
        assert_eq!(accuracy(&c, 52.5, 60.0).unwrap().points, dec!(52.5));
    }

    #[test]
    fn test_predictions_vs_outcomes() {
        let c = calibration();
        assert_eq!(predictions_vs_outcomes(&c, 100.0, 100.0, 10.0).unwrap().points, dec!(10));
        // 25% 차이: 50 / 25 = 2 → 10 / 9
        assert_eq!(predictions_vs_outcomes(&c, 100.0, 125.0, 10.0).unwrap().points, dec!(1.11));
        assert_eq!(predictions_vs_outcomes(&c, 100.0, 200.0, 10.0).unwrap().points, dec!(0));
        assert_eq!(predictions_vs_outcomes(&c, 0.0, 10.0, 10.0).unwrap().points, dec!(0));
    }

    #[test]
    fn test_profit() {
        let c = calibration();
        assert_eq!(profit(&c, 10.0, 20.0).unwrap().points, dec!(8));
        assert_eq!(profit(&c, -5.0, 20.0).unwrap().points, dec!(0));
        assert_eq!(profit(&c, 30.0, 20.0).unwrap().points, dec!(20));
    }

    #[test]
    fn test_prediction_neutrality() {
        let c = calibration();
        assert_eq!(prediction_neutrality(&c, 200.0, 100.0, 10.0).unwrap().points, dec!(10));
        // 부족율 60% → 0점
        assert_eq!(prediction_neutrality(&c, 40.0, 100.0, 10.0).unwrap().points, dec!(0));
        // 부족율 5%: 50 / 5 = 10 → 10 / 1.5
        assert_eq!(prediction_neutrality(&c, 95.0, 100.0, 10.0).unwrap().points, dec!(6.67));
    }

    #[test]
    fn test_non_finite_input() {
        let c = calibration();
        assert!(matches!(
            accuracy(&c, f64::NAN, 10.0),
            Err(ScoringError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_run_dispatch() {
        let scorer = ModelEvaluationScorer::default();
        let score = scorer
            .run(&EvaluationFunction::Profit {
                profit: 12.5,
                max_points: 20.0,
            })
            .unwrap();
        assert_eq!(score.points, dec!(10));
    }
}
