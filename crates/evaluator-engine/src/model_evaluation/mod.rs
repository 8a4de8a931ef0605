//! 모델 인증서 평가 (Epoch Builder Evaluation, EBE).
//!
//! 선언적 카테고리 설정 목록을 받아 항목 → 카테고리 → 전체 순서로 점수를 접어 올립니다.
//!
//! ```text
//! [CategoryConfig] ─▶ evaluate_item ─▶ ScoredItem
//!                                    └▶ EvaluationCategory (합계 + 등급)
//!                                          └▶ Evaluation (합계 + 등급)
//! ```
//!
//! 카테고리와 전체의 등급은 하위 항목의 등급이 아니라 새로 합산한 점수로 다시 계산합니다.

mod functions;
pub mod templates;

pub use functions::ItemScore;

use rust_decimal::Decimal;
use tracing::{debug, info};

use evaluator_core::{
    CategoryConfig, EvaluationCalibration, Evaluation, EvaluationCategory, ItemConfig,
    ModelCertificate, ScoredItem, ScoringResult, StateClass,
};

use crate::state_classifier::StateClassifier;

/// 상태 등급 계산 함수 (5단계 또는 4단계).
pub type ClassifyFn = fn(Decimal, Decimal) -> StateClass;

/// 모델 평가기.
///
/// 보정 상수만 보관하므로 `Clone` 후 여러 스레드에서 공유해도 됩니다.
#[derive(Debug, Clone, Default)]
pub struct ModelEvaluationScorer {
    calibration: EvaluationCalibration,
}

impl ModelEvaluationScorer {
    /// 보정 상수로 평가기를 생성합니다.
    pub fn new(calibration: EvaluationCalibration) -> Self {
        Self { calibration }
    }

    /// 현재 보정 상수.
    pub fn calibration(&self) -> &EvaluationCalibration {
        &self.calibration
    }

    /// 카테고리 설정 목록을 평가합니다.
    pub fn evaluate(&self, categories: &[CategoryConfig]) -> ScoringResult<Evaluation> {
        self.evaluate_with(categories, StateClassifier::classify)
    }

    /// 등급 함수를 지정해 평가합니다.
    pub fn evaluate_with(
        &self,
        categories: &[CategoryConfig],
        classify: ClassifyFn,
    ) -> ScoringResult<Evaluation> {
        let mut evaluated = Vec::with_capacity(categories.len());
        for category in categories {
            evaluated.push(self.evaluate_category(category, classify)?);
        }
        let evaluation = build_evaluation(evaluated, classify);

        info!(
            points = %evaluation.points,
            max_points = %evaluation.max_points,
            state_class = %evaluation.state_class,
            categories = evaluation.categories.len(),
            "Model evaluation completed"
        );

        Ok(evaluation)
    }

    /// 인증서 종류에 맞는 템플릿을 만들어 평가합니다.
    pub fn evaluate_certificate(&self, certificate: &ModelCertificate) -> ScoringResult<Evaluation> {
        let _span = evaluator_core::evaluation_span!(
            "evaluate_certificate",
            certificate.id(),
            certificate.kind()
        )
        .entered();

        let categories = match certificate {
            ModelCertificate::Regression(cert) => templates::regression_template(cert, &self.calibration)?,
            ModelCertificate::Classification(cert) => templates::classification_template(cert)?,
            ModelCertificate::PredictionModel(cert) => templates::prediction_model_template(cert),
        };
        self.evaluate(&categories)
    }

    fn evaluate_category(
        &self,
        category: &CategoryConfig,
        classify: ClassifyFn,
    ) -> ScoringResult<EvaluationCategory> {
        let mut items = Vec::with_capacity(category.items.len());
        for item in &category.items {
            items.push(self.evaluate_item(item, classify)?);
        }
        Ok(build_category(&category.name, &category.description, items, classify))
    }

    /// 항목 하나를 평가합니다.
    pub fn evaluate_item(&self, item: &ItemConfig, classify: ClassifyFn) -> ScoringResult<ScoredItem> {
        let score = self.run(&item.evaluation)?;

        debug!(
            item = %item.name,
            function = item.evaluation.function_name(),
            points = %score.points,
            max_points = %score.max_points,
            "Evaluation item scored"
        );

        Ok(scored_item(item.id(), &item.name, score, classify))
    }
}

/// 항목 점수로 `ScoredItem`을 만듭니다.
pub(crate) fn scored_item(
    id: impl Into<String>,
    name: &str,
    score: ItemScore,
    classify: ClassifyFn,
) -> ScoredItem {
    ScoredItem {
        id: id.into(),
        name: name.to_string(),
        points: score.points,
        max_points: score.max_points,
        percentage: StateClassifier::percentage(score.points, score.max_points),
        state: score.state,
        state_class: classify(score.points, score.max_points),
    }
}

/// 항목 목록을 합산해 카테고리를 만듭니다.
pub(crate) fn build_category(
    name: &str,
    description: &str,
    items: Vec<ScoredItem>,
    classify: ClassifyFn,
) -> EvaluationCategory {
    let points: Decimal = items.iter().map(|item| item.points).sum();
    let max_points: Decimal = items.iter().map(|item| item.max_points).sum();

    EvaluationCategory {
        name: name.to_string(),
        description: description.to_string(),
        items,
        points,
        max_points,
        state_class: classify(points, max_points),
    }
}

/// 카테고리 목록을 합산해 전체 평가를 만듭니다.
pub(crate) fn build_evaluation(categories: Vec<EvaluationCategory>, classify: ClassifyFn) -> Evaluation {
    let points: Decimal = categories.iter().map(|category| category.points).sum();
    let max_points: Decimal = categories.iter().map(|category| category.max_points).sum();

    Evaluation {
        points,
        max_points,
        state_class: classify(points, max_points),
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evaluator_core::EvaluationFunction;
    use rust_decimal_macros::dec;

    fn accuracy_item(name: &str, accuracy: f64, max_points: f64) -> ItemConfig {
        ItemConfig::new(
            name,
            "",
            EvaluationFunction::Accuracy {
                accuracy,
                max_points,
            },
        )
    }

    #[test]
    fn test_evaluate_aggregates_upward() {
        let categories = vec![
            CategoryConfig::new(
                "Discovery",
                "",
                vec![
                    accuracy_item("General Accuracy", 0.60, 10.0),
                    accuracy_item("Increase Accuracy", 0.30, 10.0),
                ],
            ),
            CategoryConfig::new("Backtest", "", vec![accuracy_item("Accuracy", 54.0, 20.0)]),
        ];

        let evaluation = ModelEvaluationScorer::default().evaluate(&categories).unwrap();

        let discovery = evaluation.category("Discovery").unwrap();
        assert_eq!(discovery.points, dec!(10));
        assert_eq!(discovery.max_points, dec!(20));
        assert_eq!(discovery.state_class, StateClass::Neutral);
        assert_eq!(discovery.items[1].state_class, StateClass::Error);
        assert_eq!(discovery.items[0].id, "general_accuracy");

        let backtest = evaluation.category("Backtest").unwrap();
        // 54 * 20 / 60 = 18
        assert_eq!(backtest.points, dec!(18));

        assert_eq!(evaluation.points, dec!(28));
        assert_eq!(evaluation.max_points, dec!(40));
        assert_eq!(evaluation.state_class, StateClass::Decent);
    }

    #[test]
    fn test_evaluate_empty_template() {
        let evaluation = ModelEvaluationScorer::default().evaluate(&[]).unwrap();
        assert_eq!(evaluation.points, dec!(0));
        assert_eq!(evaluation.max_points, dec!(0));
        assert_eq!(evaluation.state_class, StateClass::Error);
    }

    #[test]
    fn test_evaluate_rejects_negative_max_points() {
        let categories = vec![CategoryConfig::new(
            "Broken",
            "",
            vec![accuracy_item("Accuracy", 0.5, -1.0)],
        )];
        assert!(ModelEvaluationScorer::default().evaluate(&categories).is_err());
    }

    #[test]
    fn test_four_tier_classification() {
        let categories = vec![CategoryConfig::new(
            "Discovery",
            "",
            vec![accuracy_item("Accuracy", 0.15, 60.0)],
        )];
        // 15 <= 45 → 0점 → Error (4단계에서도 Error)
        let evaluation = ModelEvaluationScorer::default()
            .evaluate_with(&categories, StateClassifier::classify_four_tier)
            .unwrap();
        assert_eq!(evaluation.state_class, StateClass::Error);
    }
}
