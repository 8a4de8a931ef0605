//! 모델 인증서 평가 명령어.
//!
//! ```bash
//! # 종류별 기본 템플릿으로 평가
//! evaluator certificate --kind regression REG_20240301.json
//!
//! # 분류 학습 평가 (고장 판정 포함)
//! evaluator classification CLS_20240301.json
//! ```

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use evaluator_core::{AppConfig, CertificateKind, ClassificationCertificate, Evaluation, ModelCertificate};
use evaluator_engine::{ClassificationEvaluationScorer, ModelEvaluationScorer};

use super::read_json;

/// 인증서를 종류별 템플릿으로 평가합니다.
pub fn run_certificate(config: &AppConfig, kind: CertificateKind, path: &Path) -> Result<Evaluation> {
    let value: serde_json::Value = read_json(path)?;
    let certificate = ModelCertificate::from_value(kind, value)
        .with_context(|| format!("{} is not a valid {kind} certificate", path.display()))?;

    info!(id = certificate.id(), kind = %kind, "Evaluating certificate");

    ModelEvaluationScorer::new(config.calibration.clone())
        .evaluate_certificate(&certificate)
        .with_context(|| format!("Evaluation failed for certificate {}", certificate.id()))
}

/// 분류 학습 인증서를 평가합니다.
pub fn run_classification(config: &AppConfig, path: &Path) -> Result<Evaluation> {
    let certificate: ClassificationCertificate = read_json(path)?;
    info!(id = %certificate.id, "Evaluating classification certificate");

    ClassificationEvaluationScorer::new(config.calibration.clone(), config.broken_model.clone())
        .evaluate(&certificate)
        .with_context(|| format!("Evaluation failed for certificate {}", certificate.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_run_regression_certificate() {
        let path = write_temp(
            "regression.json",
            r#"{
                "id": "REG_1",
                "training_history": { "loss": [0.02, 0.015], "val_loss": [0.021, 0.014] },
                "test_evaluation": { "mae": 0.001, "mse": 0.00001 }
            }"#,
        );
        let evaluation =
            run_certificate(&AppConfig::default(), CertificateKind::Regression, &path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(evaluation.max_points, dec!(100));
        // 25% 개선 두 항목 + val_loss < loss + MAE/MSE 만점
        assert_eq!(evaluation.points, dec!(100));
    }

    #[test]
    fn test_run_certificate_wrong_kind() {
        let path = write_temp(
            "wrong-kind.json",
            r#"{ "id": "PM_1", "discovery": { "accuracy": 0.6 } }"#,
        );
        let result = run_certificate(&AppConfig::default(), CertificateKind::Regression, &path);
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }
}
