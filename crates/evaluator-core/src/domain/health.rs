//! 포지션 건강도(Position Health) 입력 및 결과 타입.
//!
//! 외부 수집기가 예측, 시장 상태, 가중치를 모두 조회한 뒤 하나의 스냅샷으로
//! 전달합니다. 스냅샷은 매 평가마다 새로 만들어지며 평가기는 이를 변경하지 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{ScoringError, ScoringResult};
use crate::types::{PositionSide, ScoredItem};

/// 건강도 평가 기준.
///
/// 선언 순서가 결과 항목의 순서입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCriterion {
    TrendSum,
    TrendState,
    #[serde(rename = "ta_15m")]
    Ta15m,
    #[serde(rename = "ta_30m")]
    Ta30m,
    #[serde(rename = "ta_1h")]
    Ta1h,
    #[serde(rename = "ta_2h")]
    Ta2h,
    #[serde(rename = "ta_4h")]
    Ta4h,
    #[serde(rename = "ta_1d")]
    Ta1d,
    OpenInterest,
    OpenInterestState,
    LongShortRatio,
    LongShortRatioState,
    VolumeDirection,
}

impl HealthCriterion {
    /// 모든 기준 (결과 순서).
    pub const ALL: [HealthCriterion; 13] = [
        HealthCriterion::TrendSum,
        HealthCriterion::TrendState,
        HealthCriterion::Ta15m,
        HealthCriterion::Ta30m,
        HealthCriterion::Ta1h,
        HealthCriterion::Ta2h,
        HealthCriterion::Ta4h,
        HealthCriterion::Ta1d,
        HealthCriterion::OpenInterest,
        HealthCriterion::OpenInterestState,
        HealthCriterion::LongShortRatio,
        HealthCriterion::LongShortRatioState,
        HealthCriterion::VolumeDirection,
    ];

    /// 가중치 맵에서 사용하는 기준 ID.
    pub fn id(&self) -> &'static str {
        match self {
            HealthCriterion::TrendSum => "trend_sum",
            HealthCriterion::TrendState => "trend_state",
            HealthCriterion::Ta15m => "ta_15m",
            HealthCriterion::Ta30m => "ta_30m",
            HealthCriterion::Ta1h => "ta_1h",
            HealthCriterion::Ta2h => "ta_2h",
            HealthCriterion::Ta4h => "ta_4h",
            HealthCriterion::Ta1d => "ta_1d",
            HealthCriterion::OpenInterest => "open_interest",
            HealthCriterion::OpenInterestState => "open_interest_state",
            HealthCriterion::LongShortRatio => "long_short_ratio",
            HealthCriterion::LongShortRatioState => "long_short_ratio_state",
            HealthCriterion::VolumeDirection => "volume_direction",
        }
    }

    /// 표시 이름.
    pub fn name(&self) -> &'static str {
        match self {
            HealthCriterion::TrendSum => "Trend Sum",
            HealthCriterion::TrendState => "Trend State",
            HealthCriterion::Ta15m => "Technical Analysis 15m",
            HealthCriterion::Ta30m => "Technical Analysis 30m",
            HealthCriterion::Ta1h => "Technical Analysis 1h",
            HealthCriterion::Ta2h => "Technical Analysis 2h",
            HealthCriterion::Ta4h => "Technical Analysis 4h",
            HealthCriterion::Ta1d => "Technical Analysis 1d",
            HealthCriterion::OpenInterest => "Open Interest",
            HealthCriterion::OpenInterestState => "Open Interest State",
            HealthCriterion::LongShortRatio => "Long/Short Ratio",
            HealthCriterion::LongShortRatioState => "Long/Short Ratio State",
            HealthCriterion::VolumeDirection => "Volume Direction",
        }
    }
}

impl fmt::Display for HealthCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// 기준별 가중치.
///
/// 가중치가 곧 해당 기준의 최대 점수입니다. 외부 설정에서 주어지며
/// 모든 기준에 대해 0 이상의 값이 있어야 합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWeights {
    pub trend_sum: f64,
    pub trend_state: f64,
    pub ta_15m: f64,
    pub ta_30m: f64,
    pub ta_1h: f64,
    pub ta_2h: f64,
    pub ta_4h: f64,
    pub ta_1d: f64,
    pub open_interest: f64,
    pub open_interest_state: f64,
    pub long_short_ratio: f64,
    pub long_short_ratio_state: f64,
    pub volume_direction: f64,
}

impl Default for HealthWeights {
    fn default() -> Self {
        // 합계 100
        Self {
            trend_sum: 20.0,
            trend_state: 15.0,
            ta_15m: 5.0,
            ta_30m: 5.0,
            ta_1h: 5.0,
            ta_2h: 5.0,
            ta_4h: 5.0,
            ta_1d: 5.0,
            open_interest: 8.0,
            open_interest_state: 5.0,
            long_short_ratio: 7.0,
            long_short_ratio_state: 5.0,
            volume_direction: 10.0,
        }
    }
}

impl HealthWeights {
    /// 기준의 가중치를 반환합니다.
    pub fn get(&self, criterion: HealthCriterion) -> f64 {
        match criterion {
            HealthCriterion::TrendSum => self.trend_sum,
            HealthCriterion::TrendState => self.trend_state,
            HealthCriterion::Ta15m => self.ta_15m,
            HealthCriterion::Ta30m => self.ta_30m,
            HealthCriterion::Ta1h => self.ta_1h,
            HealthCriterion::Ta2h => self.ta_2h,
            HealthCriterion::Ta4h => self.ta_4h,
            HealthCriterion::Ta1d => self.ta_1d,
            HealthCriterion::OpenInterest => self.open_interest,
            HealthCriterion::OpenInterestState => self.open_interest_state,
            HealthCriterion::LongShortRatio => self.long_short_ratio,
            HealthCriterion::LongShortRatioState => self.long_short_ratio_state,
            HealthCriterion::VolumeDirection => self.volume_direction,
        }
    }

    fn slot(&mut self, criterion: HealthCriterion) -> &mut f64 {
        match criterion {
            HealthCriterion::TrendSum => &mut self.trend_sum,
            HealthCriterion::TrendState => &mut self.trend_state,
            HealthCriterion::Ta15m => &mut self.ta_15m,
            HealthCriterion::Ta30m => &mut self.ta_30m,
            HealthCriterion::Ta1h => &mut self.ta_1h,
            HealthCriterion::Ta2h => &mut self.ta_2h,
            HealthCriterion::Ta4h => &mut self.ta_4h,
            HealthCriterion::Ta1d => &mut self.ta_1d,
            HealthCriterion::OpenInterest => &mut self.open_interest,
            HealthCriterion::OpenInterestState => &mut self.open_interest_state,
            HealthCriterion::LongShortRatio => &mut self.long_short_ratio,
            HealthCriterion::LongShortRatioState => &mut self.long_short_ratio_state,
            HealthCriterion::VolumeDirection => &mut self.volume_direction,
        }
    }

    /// 기준 ID → 가중치 맵에서 생성합니다.
    ///
    /// 맵에 없는 기준이 있으면 `MissingWeight` 에러입니다. 알 수 없는 키는 무시됩니다.
    pub fn from_map(map: &HashMap<String, f64>) -> ScoringResult<Self> {
        let mut weights = Self::default();
        for criterion in HealthCriterion::ALL {
            let value = map
                .get(criterion.id())
                .copied()
                .ok_or_else(|| ScoringError::MissingWeight(criterion.id().to_string()))?;
            *weights.slot(criterion) = value;
        }
        weights.validate()?;
        Ok(weights)
    }

    /// 모든 가중치가 유한하고 0 이상인지 검증합니다.
    pub fn validate(&self) -> ScoringResult<()> {
        for criterion in HealthCriterion::ALL {
            let value = self.get(criterion);
            if !value.is_finite() || value < 0.0 {
                return Err(ScoringError::InvalidWeight {
                    id: criterion.id().to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// 가중치 합계 (최대 HP).
    pub fn total(&self) -> f64 {
        HealthCriterion::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// 인터벌별 기술적 분석 종합 점수 (-2 ~ 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalAnalysisScores {
    #[serde(rename = "15m")]
    pub m15: i8,
    #[serde(rename = "30m")]
    pub m30: i8,
    #[serde(rename = "1h")]
    pub h1: i8,
    #[serde(rename = "2h")]
    pub h2: i8,
    #[serde(rename = "4h")]
    pub h4: i8,
    #[serde(rename = "1d")]
    pub d1: i8,
}

impl TechnicalAnalysisScores {
    /// (기준, 점수) 쌍을 인터벌 순서대로 반환합니다.
    pub fn by_criterion(&self) -> [(HealthCriterion, i8); 6] {
        [
            (HealthCriterion::Ta15m, self.m15),
            (HealthCriterion::Ta30m, self.m30),
            (HealthCriterion::Ta1h, self.h1),
            (HealthCriterion::Ta2h, self.h2),
            (HealthCriterion::Ta4h, self.h4),
            (HealthCriterion::Ta1d, self.d1),
        ]
    }
}

/// 포지션 진입 시점 기준값과 현재값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesReference {
    /// 포지션 오픈 시점의 값
    pub opening: f64,
    /// 시리즈의 마지막 값
    pub current: f64,
}

/// 거래량 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSignal {
    /// 거래량 강도 (0: 낮음, 1: 보통, 2: 높음)
    pub state: i8,
    /// 거래량 방향 (-2, -1, 1, 2)
    pub direction: i8,
}

/// 포지션 건강도 평가 입력 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionHealthInput {
    pub side: PositionSide,
    /// 포지션 오픈 시점의 트렌드 합계
    pub open_trend_sum: f64,
    /// 현재 트렌드 합계
    pub current_trend_sum: f64,
    /// 예측 상태 (-12 ~ 12)
    pub prediction_state: i8,
    /// 예측 상태 강도 (-2 ~ 2)
    pub prediction_state_intensity: i8,
    pub technical_analysis: TechnicalAnalysisScores,
    pub open_interest: SeriesReference,
    /// 미결제약정 상태 (-2 ~ 2)
    pub open_interest_state: i8,
    pub long_short_ratio: SeriesReference,
    /// 롱/숏 비율 상태 (-2 ~ 2)
    pub long_short_ratio_state: i8,
    pub volume: VolumeSignal,
    pub weights: HealthWeights,
}

/// 포지션 건강도 평가 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionHealthResult {
    /// 기준별 결과 (`HealthCriterion::ALL` 순서)
    pub items: Vec<ScoredItem>,
    /// 항목 점수 합계
    #[serde(rename = "totalHP")]
    pub total_hp: Decimal,
}

impl PositionHealthResult {
    /// 기준 ID로 항목을 찾습니다.
    pub fn item(&self, criterion: HealthCriterion) -> Option<&ScoredItem> {
        self.items.iter().find(|i| i.id == criterion.id())
    }
}
