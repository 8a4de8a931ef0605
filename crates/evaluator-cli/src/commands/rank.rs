//! 인증서 순위 명령어.
//!
//! ```bash
//! evaluator rank --kind regression --order-by mae certificates.json
//! ```

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

use evaluator_core::{AppConfig, CertificateKind, ModelCertificate};
use evaluator_engine::{rank_certificates, ModelEvaluationScorer, OrderBy, RankedCertificate};

use super::read_json;

/// 순위 출력.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankReport {
    pub order_by: OrderBy,
    pub ascending: bool,
    /// 입력 인증서 수 (제외된 인증서 포함)
    pub total: usize,
    pub certificates: Vec<RankedCertificate>,
}

/// 인증서 배열 파일을 읽어 순위를 매깁니다.
pub fn run_rank(
    config: &AppConfig,
    kind: CertificateKind,
    order_by: OrderBy,
    path: &Path,
) -> Result<RankReport> {
    let values: Vec<serde_json::Value> = read_json(path)?;
    let total = values.len();

    let certificates = values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            ModelCertificate::from_value(kind, value)
                .with_context(|| format!("Certificate #{index} is not a valid {kind} certificate"))
        })
        .collect::<Result<Vec<_>>>()?;

    let scorer = ModelEvaluationScorer::new(config.calibration.clone());
    let ranked = rank_certificates(&certificates, order_by, &scorer)?;

    info!(
        order_by = %order_by,
        total,
        ranked = ranked.len(),
        "Certificates ranked"
    );

    Ok(RankReport {
        order_by,
        ascending: order_by.ascending(),
        total,
        certificates: ranked,
    })
}
