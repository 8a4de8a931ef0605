//! 인증서 순위 산출.
//!
//! 선택한 지표(order value)로 인증서를 정렬합니다. 손실 계열 지표는 오름차순,
//! 나머지는 내림차순입니다. 조기 종료된 학습과 지표 값이 없거나 0 이하인 인증서는
//! 순위에서 제외됩니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use evaluator_core::{
    normalize_percentage, to_decimal, Discovery, ModelCertificate, ScoringResult,
};

use crate::model_evaluation::ModelEvaluationScorer;

/// 정렬 기준 지표.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// 회귀 테스트 MAE
    Mae,
    /// 회귀 테스트 MSE
    Mse,
    /// 분류 테스트 손실
    TestLoss,
    /// 분류 테스트 정확도 (%)
    TestAccuracy,
    /// EBE 평가 점수
    EbePoints,
    /// 탐색 정확도 (%)
    DiscoveryAccuracy,
    /// 탐색 포인트 중앙값
    DiscoveryPointsMedian,
    /// 백테스트 순수익률 (%)
    BacktestProfit,
}

impl OrderBy {
    /// 값이 작을수록 앞 순위인지 여부.
    pub fn ascending(&self) -> bool {
        matches!(self, OrderBy::Mae | OrderBy::Mse | OrderBy::TestLoss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Mae => "mae",
            OrderBy::Mse => "mse",
            OrderBy::TestLoss => "test_loss",
            OrderBy::TestAccuracy => "test_accuracy",
            OrderBy::EbePoints => "ebe_points",
            OrderBy::DiscoveryAccuracy => "discovery_accuracy",
            OrderBy::DiscoveryPointsMedian => "discovery_points_median",
            OrderBy::BacktestProfit => "backtest_profit",
        }
    }

    /// 인증서의 지표 값. 해당 종류에 없는 지표이면 `None`입니다.
    pub fn order_value(
        &self,
        certificate: &ModelCertificate,
        scorer: &ModelEvaluationScorer,
    ) -> ScoringResult<Option<Decimal>> {
        let raw = match (self, certificate) {
            (OrderBy::Mae, ModelCertificate::Regression(cert)) => Some(cert.test_evaluation.mae),
            (OrderBy::Mse, ModelCertificate::Regression(cert)) => Some(cert.test_evaluation.mse),
            (OrderBy::TestLoss, ModelCertificate::Classification(cert)) => {
                Some(cert.test_evaluation.loss)
            }
            (OrderBy::TestAccuracy, ModelCertificate::Classification(cert)) => {
                let accuracy = to_decimal(cert.test_evaluation.accuracy, "test_evaluation.accuracy")?;
                return Ok(Some(normalize_percentage(accuracy)));
            }
            (OrderBy::EbePoints, _) => {
                return Ok(Some(scorer.evaluate_certificate(certificate)?.points));
            }
            (OrderBy::DiscoveryAccuracy, _) => match discovery(certificate) {
                Some(discovery) => {
                    let accuracy = to_decimal(discovery.accuracy, "discovery.accuracy")?;
                    return Ok(Some(normalize_percentage(accuracy)));
                }
                None => None,
            },
            (OrderBy::DiscoveryPointsMedian, _) => discovery(certificate).map(|d| d.points_median),
            (OrderBy::BacktestProfit, ModelCertificate::Regression(cert)) => {
                cert.backtest.as_ref().map(|b| b.net_profit())
            }
            (OrderBy::BacktestProfit, ModelCertificate::PredictionModel(cert)) => {
                cert.backtest.as_ref().map(|b| b.net_profit())
            }
            _ => None,
        };

        raw.map(|value| to_decimal(value, self.as_str())).transpose()
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn discovery(certificate: &ModelCertificate) -> Option<&Discovery> {
    match certificate {
        ModelCertificate::Regression(_) => None,
        ModelCertificate::Classification(cert) => Some(&cert.classification_evaluation),
        ModelCertificate::PredictionModel(cert) => Some(&cert.discovery),
    }
}

/// 순위가 매겨진 인증서.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCertificate {
    /// 1부터 시작하는 순위
    pub rank: usize,
    pub id: String,
    pub order_value: Decimal,
}

/// 인증서 목록을 정렬해 순위를 매깁니다.
///
/// 같은 값의 인증서는 입력 순서를 유지합니다. 지표 계산에 실패한 인증서는 경고 로그 후 제외됩니다.
pub fn rank_certificates(
    certificates: &[ModelCertificate],
    order_by: OrderBy,
    scorer: &ModelEvaluationScorer,
) -> ScoringResult<Vec<RankedCertificate>> {
    let mut candidates: Vec<(&ModelCertificate, Decimal)> = Vec::with_capacity(certificates.len());
    for certificate in certificates {
        if certificate.early_stopped() {
            debug!(certificate = certificate.id(), "Skipping early-stopped certificate");
            continue;
        }
        match order_by.order_value(certificate, scorer) {
            Ok(Some(value)) if value > Decimal::ZERO => candidates.push((certificate, value)),
            Err(e) => {
                warn!(
                    certificate = certificate.id(),
                    order_by = %order_by,
                    error = %e,
                    "Skipping certificate whose order value could not be computed"
                );
            }
            Ok(value) => {
                debug!(
                    certificate = certificate.id(),
                    order_by = %order_by,
                    value = ?value,
                    "Skipping certificate without a positive order value"
                );
            }
        }
    }

    if order_by.ascending() {
        candidates.sort_by(|a, b| a.1.cmp(&b.1));
    } else {
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
    }

    Ok(candidates
        .into_iter()
        .enumerate()
        .map(|(index, (certificate, order_value))| RankedCertificate {
            rank: index + 1,
            id: certificate.id().to_string(),
            order_value,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evaluator_core::{
        Backtest, PredictionModelCertificate, RegressionCertificate, RegressionTestEvaluation,
        TrainingHistory,
    };
    use rust_decimal_macros::dec;

    fn regression(id: &str, mae: f64, early_stopped: bool) -> ModelCertificate {
        ModelCertificate::Regression(RegressionCertificate {
            id: id.to_string(),
            created_at: None,
            early_stopped,
            training_history: TrainingHistory {
                loss: vec![0.03, 0.02],
                val_loss: vec![0.03, 0.025],
                ..Default::default()
            },
            test_evaluation: RegressionTestEvaluation { mae, mse: mae * mae },
            backtest: None,
        })
    }

    fn prediction_model(id: &str, profit: Option<f64>) -> ModelCertificate {
        ModelCertificate::PredictionModel(PredictionModelCertificate {
            id: id.to_string(),
            created_at: None,
            regressions: vec![],
            classifications: vec![],
            discovery: Discovery::default(),
            backtest: profit.map(|profit| Backtest {
                profit,
                ..Default::default()
            }),
        })
    }

    #[test]
    fn test_loss_metrics_ascending() {
        assert!(OrderBy::Mae.ascending());
        assert!(OrderBy::TestLoss.ascending());
        assert!(!OrderBy::EbePoints.ascending());
        assert!(!OrderBy::BacktestProfit.ascending());
    }

    #[test]
    fn test_rank_by_mae_filters_and_sorts() {
        let certificates = vec![
            regression("A", 0.03, false),
            regression("B", 0.01, false),
            regression("C", 0.005, true),
            regression("D", 0.0, false),
            regression("E", 0.02, false),
        ];
        let ranked =
            rank_certificates(&certificates, OrderBy::Mae, &ModelEvaluationScorer::default()).unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "E", "A"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[0].order_value, dec!(0.01));
    }

    #[test]
    fn test_rank_by_profit_descending_and_stable() {
        let certificates = vec![
            prediction_model("A", Some(5.0)),
            prediction_model("B", Some(12.0)),
            prediction_model("C", None),
            prediction_model("D", Some(5.0)),
            prediction_model("E", Some(-3.0)),
        ];
        let ranked = rank_certificates(
            &certificates,
            OrderBy::BacktestProfit,
            &ModelEvaluationScorer::default(),
        )
        .unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "D"]);
    }

    #[test]
    fn test_rank_by_ebe_points_skips_unscorable() {
        let mut broken = regression("BROKEN", 0.01, false);
        if let ModelCertificate::Regression(cert) = &mut broken {
            cert.training_history = TrainingHistory::default();
        }
        let certificates = vec![regression("A", 0.01, false), broken, regression("B", 0.02, false)];

        let ranked = rank_certificates(
            &certificates,
            OrderBy::EbePoints,
            &ModelEvaluationScorer::default(),
        )
        .unwrap();
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_inapplicable_metric_is_none() {
        let value = OrderBy::TestLoss
            .order_value(&regression("A", 0.01, false), &ModelEvaluationScorer::default())
            .unwrap();
        assert_eq!(value, None);
    }
}
