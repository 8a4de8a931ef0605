//! 점수 결과 타입.
//!
//! - `ScoreBand` - 원시 지표를 점수로 환산하기 위한 보정 구간
//! - `StateClass` - 달성률에 따른 정성적 상태 등급
//! - `ScoredItem` - 단일 기준의 평가 결과
//! - `EvaluationCategory` / `Evaluation` - 항목 → 카테고리 → 전체 집계 결과
//!
//! 결과 타입은 UI가 그대로 소비하므로 camelCase로 직렬화됩니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ScoringError, ScoringResult};

/// 점수 보정 구간 (worst, best, max_points).
///
/// `best > worst`이면 높을수록 좋은 지표, 그렇지 않으면 낮을수록 좋은 지표(손실 등)로
/// 해석됩니다. `max_points`가 음수인 구간은 생성할 수 없습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBand {
    worst_value: Decimal,
    best_value: Decimal,
    max_points: Decimal,
}

impl ScoreBand {
    /// 새 보정 구간을 생성합니다.
    pub fn new(worst_value: Decimal, best_value: Decimal, max_points: Decimal) -> ScoringResult<Self> {
        if max_points < Decimal::ZERO {
            return Err(ScoringError::InvalidBand {
                max_points: max_points.to_string(),
            });
        }
        Ok(Self {
            worst_value,
            best_value,
            max_points,
        })
    }

    /// 최악 기준값.
    pub fn worst_value(&self) -> Decimal {
        self.worst_value
    }

    /// 최선 기준값.
    pub fn best_value(&self) -> Decimal {
        self.best_value
    }

    /// 최대 점수.
    pub fn max_points(&self) -> Decimal {
        self.max_points
    }

    /// 높을수록 좋은 지표인지 확인합니다.
    pub fn is_higher_better(&self) -> bool {
        self.best_value > self.worst_value
    }
}

/// 달성률 기반 상태 등급.
///
/// 선언 순서가 곧 등급 순서입니다 (`Error` < ... < `Optimal`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateClass {
    /// 20% 미만
    Error,
    /// 20% 이상
    Warning,
    /// 40% 이상
    Neutral,
    /// 60% 이상
    Decent,
    /// 80% 이상
    Optimal,
}

impl StateClass {
    /// UI에서 사용하는 클래스 문자열.
    pub fn as_str(&self) -> &'static str {
        match self {
            StateClass::Error => "error",
            StateClass::Warning => "warning",
            StateClass::Neutral => "neutral",
            StateClass::Decent => "decent",
            StateClass::Optimal => "optimal",
        }
    }
}

impl fmt::Display for StateClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 단일 평가 기준의 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    /// 기준 ID
    pub id: String,
    /// 표시 이름
    pub name: String,
    /// 획득 점수 (0 ~ max_points)
    pub points: Decimal,
    /// 최대 점수
    pub max_points: Decimal,
    /// 달성률 (%)
    pub percentage: Decimal,
    /// 상태 설명 문자열
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// 상태 등급
    pub state_class: StateClass,
}

/// 평가 카테고리 (항목 묶음).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationCategory {
    pub name: String,
    pub description: String,
    pub items: Vec<ScoredItem>,
    /// 항목 점수 합계
    pub points: Decimal,
    /// 항목 최대 점수 합계
    pub max_points: Decimal,
    pub state_class: StateClass,
}

/// 전체 평가 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    /// 카테고리 점수 합계
    pub points: Decimal,
    /// 카테고리 최대 점수 합계
    pub max_points: Decimal,
    pub state_class: StateClass,
    pub categories: Vec<EvaluationCategory>,
}

impl Evaluation {
    /// 이름으로 카테고리를 찾습니다.
    pub fn category(&self, name: &str) -> Option<&EvaluationCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}
