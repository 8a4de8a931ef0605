//! CLI 명령어 구현 모듈.

pub mod certificate;
pub mod health;
pub mod rank;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

use evaluator_core::CertificateKind;
use evaluator_engine::OrderBy;

/// 인증서 종류 인자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Regression,
    Classification,
    PredictionModel,
}

impl From<KindArg> for CertificateKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Regression => CertificateKind::Regression,
            KindArg::Classification => CertificateKind::Classification,
            KindArg::PredictionModel => CertificateKind::PredictionModel,
        }
    }
}

/// 정렬 기준 인자.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderByArg {
    Mae,
    Mse,
    TestLoss,
    TestAccuracy,
    EbePoints,
    DiscoveryAccuracy,
    DiscoveryPointsMedian,
    BacktestProfit,
}

impl From<OrderByArg> for OrderBy {
    fn from(order_by: OrderByArg) -> Self {
        match order_by {
            OrderByArg::Mae => OrderBy::Mae,
            OrderByArg::Mse => OrderBy::Mse,
            OrderByArg::TestLoss => OrderBy::TestLoss,
            OrderByArg::TestAccuracy => OrderBy::TestAccuracy,
            OrderByArg::EbePoints => OrderBy::EbePoints,
            OrderByArg::DiscoveryAccuracy => OrderBy::DiscoveryAccuracy,
            OrderByArg::DiscoveryPointsMedian => OrderBy::DiscoveryPointsMedian,
            OrderByArg::BacktestProfit => OrderBy::BacktestProfit,
        }
    }
}

/// JSON 파일을 읽어 역직렬화합니다.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// 결과를 보기 좋은 JSON 문자열로 변환합니다.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}
