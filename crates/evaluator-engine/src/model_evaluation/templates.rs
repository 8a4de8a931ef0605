//! 인증서 종류별 기본 평가 템플릿.
//!
//! 검증된 인증서 레코드를 카테고리 설정 목록으로 변환합니다. 각 템플릿의 최대 점수 합계는 100입니다.
//!
//! | 종류 | 카테고리 (점수) |
//! |------|-----------------|
//! | 회귀 | Training (30), Test Dataset (70) |
//! | 분류 | Training (30), Test Dataset (20), Discovery (50) |
//! | 예측 모델 | Discovery (60), Backtest (40, 백테스트가 있을 때만) |

use evaluator_core::{
    Backtest, CategoryConfig, ClassificationCertificate, Discovery, EvaluationCalibration,
    EvaluationFunction, ItemConfig, PredictionModelCertificate, RegressionCertificate,
    ScoringResult, TrainingHistory,
};

/// Training 카테고리 이름.
pub const TRAINING: &str = "Training";
/// Test Dataset 카테고리 이름.
pub const TEST_DATASET: &str = "Test Dataset";
/// Discovery 카테고리 이름.
pub const DISCOVERY: &str = "Discovery";
/// Backtest 카테고리 이름.
pub const BACKTEST: &str = "Backtest";

/// 회귀 모델 템플릿.
pub fn regression_template(
    cert: &RegressionCertificate,
    calibration: &EvaluationCalibration,
) -> ScoringResult<Vec<CategoryConfig>> {
    let test = &cert.test_evaluation;
    Ok(vec![
        training_category(&cert.training_history)?,
        CategoryConfig::new(
            TEST_DATASET,
            "Error measured on the held-out test dataset",
            vec![
                ItemConfig::new(
                    "Mean Absolute Error",
                    "MAE of the test dataset predictions",
                    EvaluationFunction::TestDatasetLoss {
                        value: test.mae,
                        worst: calibration.regression_mae_worst,
                        best: calibration.regression_mae_best,
                        max_points: 35.0,
                    },
                ),
                ItemConfig::new(
                    "Mean Squared Error",
                    "MSE of the test dataset predictions",
                    EvaluationFunction::TestDatasetLoss {
                        value: test.mse,
                        worst: calibration.regression_mse_worst,
                        best: calibration.regression_mse_best,
                        max_points: 35.0,
                    },
                ),
            ],
        ),
    ])
}

/// 분류 모델 템플릿.
pub fn classification_template(cert: &ClassificationCertificate) -> ScoringResult<Vec<CategoryConfig>> {
    let discovery = &cert.classification_evaluation;
    Ok(vec![
        training_category(&cert.training_history)?,
        CategoryConfig::new(
            TEST_DATASET,
            "Accuracy measured on the held-out test dataset",
            vec![ItemConfig::new(
                "Test Accuracy",
                "Accuracy of the test dataset predictions",
                EvaluationFunction::Accuracy {
                    accuracy: cert.test_evaluation.accuracy,
                    max_points: 20.0,
                },
            )],
        ),
        CategoryConfig::new(
            DISCOVERY,
            "Directional predictions over the discovery period",
            vec![
                ItemConfig::new(
                    "Accuracy",
                    "General accuracy of non-neutral predictions",
                    EvaluationFunction::Accuracy {
                        accuracy: discovery.accuracy,
                        max_points: 15.0,
                    },
                ),
                increase_balance_item(discovery, 10.0),
                decrease_balance_item(discovery, 10.0),
                neutrality_item(discovery, 15.0),
            ],
        ),
    ])
}

/// 예측 모델 템플릿. 백테스트가 없으면 Backtest 카테고리를 생략합니다.
pub fn prediction_model_template(cert: &PredictionModelCertificate) -> Vec<CategoryConfig> {
    let discovery = &cert.discovery;
    let mut categories = vec![CategoryConfig::new(
        DISCOVERY,
        "Directional predictions over the discovery period",
        vec![
            ItemConfig::new(
                "Accuracy",
                "General accuracy of non-neutral predictions",
                EvaluationFunction::Accuracy {
                    accuracy: discovery.accuracy,
                    max_points: 20.0,
                },
            ),
            increase_balance_item(discovery, 10.0),
            decrease_balance_item(discovery, 10.0),
            neutrality_item(discovery, 10.0),
            ItemConfig::new(
                "Points",
                "Points collected by the discovery positions",
                EvaluationFunction::Points {
                    received: discovery.points,
                    max_points: 10.0,
                },
            ),
        ],
    )];

    if let Some(backtest) = &cert.backtest {
        categories.push(backtest_category(backtest));
    }
    categories
}

fn training_category(history: &TrainingHistory) -> ScoringResult<CategoryConfig> {
    let (first_loss, last_loss) = history.loss_bounds()?;
    let (first_val_loss, last_val_loss) = history.val_loss_bounds()?;

    Ok(CategoryConfig::new(
        TRAINING,
        "Loss progression across the training epochs",
        vec![
            ItemConfig::new(
                "Loss Improvement",
                "First vs last epoch loss",
                EvaluationFunction::LossImprovement {
                    first: first_loss,
                    last: last_loss,
                    max_points: 10.0,
                },
            ),
            ItemConfig::new(
                "Val Loss Improvement",
                "First vs last epoch validation loss",
                EvaluationFunction::LossImprovement {
                    first: first_val_loss,
                    last: last_val_loss,
                    max_points: 10.0,
                },
            ),
            ItemConfig::new(
                "Loss vs Val Loss",
                "Final loss vs final validation loss",
                EvaluationFunction::LossVsValLoss {
                    final_loss: last_loss,
                    final_val_loss: last_val_loss,
                    max_points: 10.0,
                },
            ),
        ],
    ))
}

fn backtest_category(backtest: &Backtest) -> CategoryConfig {
    CategoryConfig::new(
        BACKTEST,
        "Simulated trading with the model's predictions",
        vec![
            ItemConfig::new(
                "Profit",
                "Net profit after fees",
                EvaluationFunction::Profit {
                    profit: backtest.net_profit(),
                    max_points: 20.0,
                },
            ),
            ItemConfig::new(
                "Accuracy",
                "Share of positions closed in profit",
                EvaluationFunction::Accuracy {
                    accuracy: backtest.accuracy,
                    max_points: 10.0,
                },
            ),
            ItemConfig::new(
                "Points",
                "Points collected by the backtest positions",
                EvaluationFunction::Points {
                    received: backtest.points,
                    max_points: 10.0,
                },
            ),
        ],
    )
}

fn increase_balance_item(discovery: &Discovery, max_points: f64) -> ItemConfig {
    ItemConfig::new(
        "Increase Predictions vs Outcomes",
        "Predicted increases vs realized increases",
        EvaluationFunction::PredictionsVsOutcomes {
            predictions: discovery.increase_predictions as f64,
            outcomes: discovery.increase_outcomes as f64,
            max_points,
        },
    )
}

fn decrease_balance_item(discovery: &Discovery, max_points: f64) -> ItemConfig {
    ItemConfig::new(
        "Decrease Predictions vs Outcomes",
        "Predicted decreases vs realized decreases",
        EvaluationFunction::PredictionsVsOutcomes {
            predictions: discovery.decrease_predictions as f64,
            outcomes: discovery.decrease_outcomes as f64,
            max_points,
        },
    )
}

fn neutrality_item(discovery: &Discovery, max_points: f64) -> ItemConfig {
    ItemConfig::new(
        "Prediction Neutrality",
        "Non-neutral vs neutral predictions",
        EvaluationFunction::PredictionNeutrality {
            non_neutral: discovery.non_neutral_predictions() as f64,
            neutral: discovery.neutral_predictions as f64,
            max_points,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use evaluator_core::{ClassificationTestEvaluation, RegressionTestEvaluation, ScoringError};

    fn total_max_points(categories: &[CategoryConfig]) -> f64 {
        categories
            .iter()
            .flat_map(|c| c.items.iter())
            .map(|i| i.evaluation.max_points())
            .sum()
    }

    fn history() -> TrainingHistory {
        TrainingHistory {
            loss: vec![0.9, 0.6],
            val_loss: vec![0.95, 0.7],
            ..Default::default()
        }
    }

    #[test]
    fn test_regression_template_budget() {
        let cert = RegressionCertificate {
            id: "REG".to_string(),
            created_at: None,
            early_stopped: false,
            training_history: history(),
            test_evaluation: RegressionTestEvaluation { mae: 0.01, mse: 0.001 },
            backtest: None,
        };
        let categories = regression_template(&cert, &EvaluationCalibration::default()).unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(total_max_points(&categories), 100.0);
    }

    #[test]
    fn test_classification_template_budget() {
        let cert = ClassificationCertificate {
            id: "CLS".to_string(),
            created_at: None,
            early_stopped: false,
            training_history: history(),
            test_evaluation: ClassificationTestEvaluation {
                loss: 0.6,
                accuracy: 0.58,
            },
            classification_evaluation: Discovery::default(),
        };
        let categories = classification_template(&cert).unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec![TRAINING, TEST_DATASET, DISCOVERY]);
        assert_eq!(total_max_points(&categories), 100.0);
    }

    #[test]
    fn test_prediction_model_backtest_is_optional() {
        let mut cert = PredictionModelCertificate {
            id: "PM".to_string(),
            created_at: None,
            regressions: vec![],
            classifications: vec![],
            discovery: Discovery::default(),
            backtest: None,
        };
        assert_eq!(prediction_model_template(&cert).len(), 1);

        cert.backtest = Some(Backtest::default());
        let categories = prediction_model_template(&cert);
        assert_eq!(categories.len(), 2);
        assert_eq!(total_max_points(&categories), 100.0);
    }

    #[test]
    fn test_empty_history_is_missing_data() {
        let cert = RegressionCertificate {
            id: "REG".to_string(),
            created_at: None,
            early_stopped: false,
            training_history: TrainingHistory::default(),
            test_evaluation: RegressionTestEvaluation::default(),
            backtest: None,
        };
        assert!(matches!(
            regression_template(&cert, &EvaluationCalibration::default()),
            Err(ScoringError::MissingData(_))
        ));
    }
}
