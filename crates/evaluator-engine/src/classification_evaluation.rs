//! 분류 학습 인증서 평가.
//!
//! 고정된 세 카테고리로 평가합니다.
//!
//! - **Training** (30): 손실/정확도의 상대 개선과 학습/검증 격차
//! - **Test Dataset Evaluation** (20): 테스트 정확도, 테스트 손실 vs 최종 검증 손실
//! - **Classification Evaluation** (50): 방향별 정확도와 예측/결과 균형, 포인트 중앙값, 중립성
//!
//! 모델이 고장(broken)으로 판정되면 Classification Evaluation의 모든 항목이 0점이 됩니다.
//! 이는 에러가 아니라 설명이 붙은 정상 결과입니다. 나머지 두 카테고리는 영향을 받지 않습니다.
//!
//! 상태 등급은 4단계(`Warning` 없음)를 사용합니다.

use rust_decimal::Decimal;
use std::fmt;
use tracing::{debug, info, warn};

use evaluator_core::{
    abs_percent_change, normalize_percentage, percent_change, to_decimal, BrokenModelThresholds,
    CategoryConfig, ClassificationCertificate, EvaluationCalibration, Evaluation,
    EvaluationCategory, EvaluationFunction, ItemConfig, ScoreBand, ScoredItem, ScoringResult,
    StateClass,
};

use crate::model_evaluation::{
    build_category, build_evaluation, scored_item, ItemScore, ModelEvaluationScorer,
};
use crate::point_scaler::PointScaler;
use crate::state_classifier::StateClassifier;

/// Training 카테고리 이름.
pub const TRAINING: &str = "Training";
/// Test Dataset Evaluation 카테고리 이름.
pub const TEST_DATASET_EVALUATION: &str = "Test Dataset Evaluation";
/// Classification Evaluation 카테고리 이름.
pub const CLASSIFICATION_EVALUATION: &str = "Classification Evaluation";

/// Training 항목당 최대 점수.
const TRAINING_ITEM_POINTS: i64 = 5;

/// 예측 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    General,
    Increase,
    Decrease,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::General => write!(f, "general"),
            Direction::Increase => write!(f, "increase"),
            Direction::Decrease => write!(f, "decrease"),
        }
    }
}

/// 고장 판정 사유.
#[derive(Debug, Clone, PartialEq)]
pub enum BrokenReason {
    /// 포인트 중앙값이 하한 미만
    PointsMedian { value: Decimal, min: Decimal },
    /// 비중립 포지션 수가 하한 미만
    InsufficientPositions { count: u64, min: u64 },
    /// 정확도(%)가 하한 이하
    LowAccuracy {
        direction: Direction,
        value: Decimal,
        min: Decimal,
    },
    /// 예측/결과 불균형(%)이 상한 이상
    Imbalance {
        direction: Direction,
        value: Decimal,
        max: Decimal,
    },
}

impl fmt::Display for BrokenReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokenReason::PointsMedian { value, min } => {
                write!(f, "points median {value} is below {min}")
            }
            BrokenReason::InsufficientPositions { count, min } => {
                write!(f, "{count} non-neutral positions, at least {min} required")
            }
            BrokenReason::LowAccuracy {
                direction,
                value,
                min,
            } => write!(f, "{direction} accuracy {value}% is at or below {min}%"),
            BrokenReason::Imbalance {
                direction,
                value,
                max,
            } => write!(
                f,
                "{direction} predictions vs outcomes differ by {value}%, limit {max}%"
            ),
        }
    }
}

/// 분류 학습 인증서 평가기.
#[derive(Debug, Clone, Default)]
pub struct ClassificationEvaluationScorer {
    ebe: ModelEvaluationScorer,
    thresholds: BrokenModelThresholds,
}

impl ClassificationEvaluationScorer {
    /// 보정 상수와 고장 판정 기준으로 평가기를 생성합니다.
    pub fn new(calibration: EvaluationCalibration, thresholds: BrokenModelThresholds) -> Self {
        Self {
            ebe: ModelEvaluationScorer::new(calibration),
            thresholds,
        }
    }

    /// 고장 판정 기준.
    pub fn thresholds(&self) -> &BrokenModelThresholds {
        &self.thresholds
    }

    /// 인증서 전체를 평가합니다.
    pub fn evaluate(&self, cert: &ClassificationCertificate) -> ScoringResult<Evaluation> {
        let _span = evaluator_core::evaluation_span!("classification_evaluation", cert.id).entered();

        let categories = vec![
            self.evaluate_training_category(cert)?,
            self.evaluate_test_dataset_category(cert)?,
            self.evaluate_classification_category(cert)?,
        ];
        let evaluation = build_evaluation(categories, StateClassifier::classify_four_tier);

        info!(
            certificate = %cert.id,
            points = %evaluation.points,
            max_points = %evaluation.max_points,
            state_class = %evaluation.state_class,
            "Classification certificate evaluated"
        );

        Ok(evaluation)
    }

    /// 고장 여부를 판정합니다. 처음 발견된 사유를 반환합니다.
    pub fn is_broken(&self, cert: &ClassificationCertificate) -> ScoringResult<Option<BrokenReason>> {
        let discovery = &cert.classification_evaluation;
        let t = &self.thresholds;

        let points_median = to_decimal(discovery.points_median, "points_median")?;
        let min_median = to_decimal(t.min_points_median, "min_points_median")?;
        if points_median < min_median {
            return Ok(Some(BrokenReason::PointsMedian {
                value: points_median,
                min: min_median,
            }));
        }

        let count = discovery.non_neutral_predictions();
        if count < t.min_non_neutral_positions {
            return Ok(Some(BrokenReason::InsufficientPositions {
                count,
                min: t.min_non_neutral_positions,
            }));
        }

        let min_accuracy = to_decimal(t.min_accuracy, "min_accuracy")?;
        for (direction, accuracy) in [
            (Direction::General, discovery.accuracy),
            (Direction::Increase, discovery.increase_accuracy),
            (Direction::Decrease, discovery.decrease_accuracy),
        ] {
            let value = normalize_percentage(to_decimal(accuracy, "accuracy")?);
            if value <= min_accuracy {
                return Ok(Some(BrokenReason::LowAccuracy {
                    direction,
                    value,
                    min: min_accuracy,
                }));
            }
        }

        let max_imbalance = to_decimal(t.max_imbalance, "max_imbalance")?;
        for (direction, predictions, outcomes) in [
            (
                Direction::Increase,
                discovery.increase_predictions,
                discovery.increase_outcomes,
            ),
            (
                Direction::Decrease,
                discovery.decrease_predictions,
                discovery.decrease_outcomes,
            ),
        ] {
            let value = abs_percent_change(Decimal::from(predictions), Decimal::from(outcomes));
            if value >= max_imbalance {
                return Ok(Some(BrokenReason::Imbalance {
                    direction,
                    value: value.round_dp(2),
                    max: max_imbalance,
                }));
            }
        }

        Ok(None)
    }

    /// Training 카테고리.
    pub fn evaluate_training_category(
        &self,
        cert: &ClassificationCertificate,
    ) -> ScoringResult<EvaluationCategory> {
        let history = &cert.training_history;
        let (first_loss, last_loss) = history.loss_bounds()?;
        let (first_val_loss, last_val_loss) = history.val_loss_bounds()?;
        let (first_accuracy, last_accuracy) = history.accuracy_bounds()?;
        let (first_val_accuracy, last_val_accuracy) = history.val_accuracy_bounds()?;

        let band = self.training_band()?;
        let items = vec![
            training_item(
                "loss_improvement",
                "Loss Improvement",
                -relative_change(first_loss, last_loss, "loss")?,
                &band,
            ),
            training_item(
                "val_loss_improvement",
                "Val Loss Improvement",
                -relative_change(first_val_loss, last_val_loss, "val_loss")?,
                &band,
            ),
            training_item(
                "accuracy_improvement",
                "Accuracy Improvement",
                relative_change(first_accuracy, last_accuracy, "accuracy")?,
                &band,
            ),
            training_item(
                "val_accuracy_improvement",
                "Val Accuracy Improvement",
                relative_change(first_val_accuracy, last_val_accuracy, "val_accuracy")?,
                &band,
            ),
            training_item(
                "train_vs_val_loss",
                "Train vs Val Loss",
                band.best_value() - relative_change(last_loss, last_val_loss, "loss")?.abs(),
                &band,
            ),
            training_item(
                "train_vs_val_accuracy",
                "Train vs Val Accuracy",
                band.best_value()
                    - relative_change(last_accuracy, last_val_accuracy, "accuracy")?.abs(),
                &band,
            ),
        ];

        Ok(build_category(
            TRAINING,
            "Relative improvement and train/validation gap across the training epochs",
            items,
            StateClassifier::classify_four_tier,
        ))
    }

    /// Test Dataset Evaluation 카테고리.
    pub fn evaluate_test_dataset_category(
        &self,
        cert: &ClassificationCertificate,
    ) -> ScoringResult<EvaluationCategory> {
        let (_, last_val_loss) = cert.training_history.val_loss_bounds()?;
        let config = CategoryConfig::new(
            TEST_DATASET_EVALUATION,
            "Held-out test dataset against the final validation epoch",
            vec![
                ItemConfig::new(
                    "Test Accuracy",
                    "Accuracy of the test dataset predictions",
                    EvaluationFunction::Accuracy {
                        accuracy: cert.test_evaluation.accuracy,
                        max_points: 10.0,
                    },
                ),
                ItemConfig::new(
                    "Test Loss vs Val Loss",
                    "Test dataset loss vs final validation loss",
                    EvaluationFunction::LossVsValLoss {
                        final_loss: last_val_loss,
                        final_val_loss: cert.test_evaluation.loss,
                        max_points: 10.0,
                    },
                ),
            ],
        );
        self.evaluate_config(&config)
    }

    /// Classification Evaluation 카테고리. 고장 판정 시 모든 항목이 0점입니다.
    pub fn evaluate_classification_category(
        &self,
        cert: &ClassificationCertificate,
    ) -> ScoringResult<EvaluationCategory> {
        let config = classification_config(cert);

        let Some(reason) = self.is_broken(cert)? else {
            return self.evaluate_config(&config);
        };

        warn!(certificate = %cert.id, reason = %reason, "Classification model is broken");

        let state = format!("Broken model: {reason}");
        let mut items = Vec::with_capacity(config.items.len());
        for item in &config.items {
            let max_points = to_decimal(item.evaluation.max_points(), "max_points")?;
            items.push(vetoed_item(item, max_points, &state));
        }
        Ok(build_category(
            &config.name,
            &config.description,
            items,
            StateClassifier::classify_four_tier,
        ))
    }

    fn evaluate_config(&self, config: &CategoryConfig) -> ScoringResult<EvaluationCategory> {
        let mut items = Vec::with_capacity(config.items.len());
        for item in &config.items {
            items.push(
                self.ebe
                    .evaluate_item(item, StateClassifier::classify_four_tier)?,
            );
        }
        Ok(build_category(
            &config.name,
            &config.description,
            items,
            StateClassifier::classify_four_tier,
        ))
    }

    fn training_band(&self) -> ScoringResult<ScoreBand> {
        let target = to_decimal(
            self.ebe.calibration().training_improvement_target,
            "training_improvement_target",
        )?;
        ScoreBand::new(Decimal::ZERO, target, Decimal::from(TRAINING_ITEM_POINTS))
    }
}

fn classification_config(cert: &ClassificationCertificate) -> CategoryConfig {
    let discovery = &cert.classification_evaluation;
    let accuracy = |name: &str, description: &str, accuracy: f64, max_points: f64| {
        ItemConfig::new(
            name,
            description,
            EvaluationFunction::Accuracy {
                accuracy,
                max_points,
            },
        )
    };

    CategoryConfig::new(
        CLASSIFICATION_EVALUATION,
        "Directional classification over the evaluation period",
        vec![
            accuracy(
                "Accuracy",
                "General accuracy of non-neutral predictions",
                discovery.accuracy,
                10.0,
            ),
            accuracy(
                "Increase Accuracy",
                "Accuracy of increase predictions",
                discovery.increase_accuracy,
                8.0,
            ),
            accuracy(
                "Decrease Accuracy",
                "Accuracy of decrease predictions",
                discovery.decrease_accuracy,
                8.0,
            ),
            ItemConfig::new(
                "Increase Predictions vs Outcomes",
                "Predicted increases vs realized increases",
                EvaluationFunction::PredictionsVsOutcomes {
                    predictions: discovery.increase_predictions as f64,
                    outcomes: discovery.increase_outcomes as f64,
                    max_points: 6.0,
                },
            ),
            ItemConfig::new(
                "Decrease Predictions vs Outcomes",
                "Predicted decreases vs realized decreases",
                EvaluationFunction::PredictionsVsOutcomes {
                    predictions: discovery.decrease_predictions as f64,
                    outcomes: discovery.decrease_outcomes as f64,
                    max_points: 6.0,
                },
            ),
            ItemConfig::new(
                "Points Median",
                "Median points per position",
                EvaluationFunction::Points {
                    received: discovery.points_median,
                    max_points: 6.0,
                },
            ),
            ItemConfig::new(
                "Prediction Neutrality",
                "Non-neutral vs neutral predictions",
                EvaluationFunction::PredictionNeutrality {
                    non_neutral: discovery.non_neutral_predictions() as f64,
                    neutral: discovery.neutral_predictions as f64,
                    max_points: 6.0,
                },
            ),
        ],
    )
}

/// `from` 대비 `to`의 상대 변화 (비율, 1 = 100%).
fn relative_change(from: f64, to: f64, field: &str) -> ScoringResult<Decimal> {
    let from = to_decimal(from, field)?;
    let to = to_decimal(to, field)?;
    Ok(percent_change(from, to) / Decimal::ONE_HUNDRED)
}

fn training_item(id: &str, name: &str, value: Decimal, band: &ScoreBand) -> ScoredItem {
    let points = PointScaler::scale(value, band);
    debug!(item = id, value = %value, points = %points, "Training item scored");

    scored_item(
        id,
        name,
        ItemScore {
            points,
            max_points: band.max_points(),
            state: Some(format!("{:.2}%", value * Decimal::ONE_HUNDRED)),
        },
        StateClassifier::classify_four_tier,
    )
}

fn vetoed_item(item: &ItemConfig, max_points: Decimal, state: &str) -> ScoredItem {
    ScoredItem {
        id: item.id(),
        name: item.name.clone(),
        points: Decimal::ZERO,
        max_points,
        percentage: Decimal::ZERO,
        state: Some(state.to_string()),
        state_class: StateClass::Error,
    }
}
