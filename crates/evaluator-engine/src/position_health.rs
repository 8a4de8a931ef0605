//! 포지션 건강도(HP) 계산기.
//!
//! 열린 LONG/SHORT 포지션이 여전히 유리한 조건에 놓여 있는지를 13개 기준으로 평가합니다.
//!
//! # 기준
//!
//! 1. **Trend Sum**: 오픈 시점 대비 트렌드 합계 변화율 (51단계 계단)
//! 2. **Trend State**: (예측 상태, 강도) 조회 테이블
//! 3. **Technical Analysis** ×6: 인터벌별 오실레이터 종합 점수 (15m, 30m, 1h, 2h, 4h, 1d)
//! 4. **Open Interest**: 오픈 시점 대비 미결제약정 변화율 (0.5% ~ 10%, 20단계)
//! 5. **Open Interest State**: -2 ~ 2 상태 지표
//! 6. **Long/Short Ratio**: 오픈 시점 대비 롱/숏 비율 변화율 (1% ~ 20%, 20단계)
//! 7. **Long/Short Ratio State**: -2 ~ 2 상태 지표
//! 8. **Volume Direction**: (거래량 강도, 방향) 행렬
//!
//! 각 기준은 포지션 방향으로 정렬된 점수 `score ∈ [0, 1]`을 만들고,
//! `points = weight * score`, `max_points = weight`, `percentage = score * 100`이 됩니다.
//! 총 HP는 항목 점수의 단순 합입니다.
//!
//! 모든 방향성 신호는 "상승 = 양수" 기준이며 SHORT 포지션에서는 부호를 뒤집어 평가합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use evaluator_core::{
    percent_change, to_decimal, DecimalExt, HealthCriterion, PositionHealthInput,
    PositionHealthResult, PositionSide, ScoredItem, ScoringError, ScoringResult, SeriesReference,
    VolumeSignal,
};

use crate::staircase::Staircase;
use crate::state_classifier::StateClassifier;

/// 트렌드 합계 변화율(%) 계단: 방향별 25단계, 단계당 0.02.
pub const TREND_SUM_STAIRCASE: Staircase = Staircase::new(
    &[
        dec!(2), dec!(4), dec!(6), dec!(8), dec!(10),
        dec!(13), dec!(16), dec!(19), dec!(22), dec!(25),
        dec!(30), dec!(35), dec!(40), dec!(45), dec!(50),
        dec!(60), dec!(70), dec!(80), dec!(90), dec!(100),
        dec!(125), dec!(150), dec!(175), dec!(200), dec!(250),
    ],
    dec!(0.02),
);

/// 미결제약정 변화율(%) 계단: 0.5% ~ 10%, 단계당 0.025.
pub const OPEN_INTEREST_STAIRCASE: Staircase = Staircase::new(
    &[
        dec!(0.5), dec!(1), dec!(1.5), dec!(2), dec!(2.5),
        dec!(3), dec!(3.5), dec!(4), dec!(4.5), dec!(5),
        dec!(5.5), dec!(6), dec!(6.5), dec!(7), dec!(7.5),
        dec!(8), dec!(8.5), dec!(9), dec!(9.5), dec!(10),
    ],
    dec!(0.025),
);

/// 롱/숏 비율 변화율(%) 계단: 1% ~ 20%, 단계당 0.025.
pub const LONG_SHORT_RATIO_STAIRCASE: Staircase = Staircase::new(
    &[
        dec!(1), dec!(2), dec!(3), dec!(4), dec!(5),
        dec!(6), dec!(7), dec!(8), dec!(9), dec!(10),
        dec!(11), dec!(12), dec!(13), dec!(14), dec!(15),
        dec!(16), dec!(17), dec!(18), dec!(19), dec!(20),
    ],
    dec!(0.025),
);

/// 유리한 예측 상태의 점수 테이블.
///
/// 행: 상태 크기 1 ~ 8, 9 이상. 열: 정렬된 강도 -2, -1, 0, 1, 2.
/// 불리한 상태는 `1 - FAVORABLE[|state|][-intensity]`로 대칭 처리합니다.
const TREND_STATE_FAVORABLE: [[Decimal; 5]; 9] = [
    [dec!(0.50), dec!(0.55), dec!(0.55), dec!(0.60), dec!(0.60)],
    [dec!(0.55), dec!(0.55), dec!(0.60), dec!(0.65), dec!(0.65)],
    [dec!(0.55), dec!(0.60), dec!(0.65), dec!(0.70), dec!(0.70)],
    [dec!(0.60), dec!(0.65), dec!(0.70), dec!(0.75), dec!(0.75)],
    [dec!(0.60), dec!(0.65), dec!(0.70), dec!(0.75), dec!(0.80)],
    [dec!(0.65), dec!(0.70), dec!(0.75), dec!(0.80), dec!(0.85)],
    [dec!(0.65), dec!(0.70), dec!(0.80), dec!(0.85), dec!(0.90)],
    [dec!(0.70), dec!(0.75), dec!(0.85), dec!(0.90), dec!(0.95)],
    [dec!(0.70), dec!(0.80), dec!(0.90), dec!(0.95), dec!(1.00)],
];

/// 예측 상태가 0일 때 강도별 점수 (정렬된 강도 -2 ~ 2).
const TREND_STATE_NEUTRAL: [Decimal; 5] =
    [dec!(0.40), dec!(0.45), dec!(0.50), dec!(0.55), dec!(0.60)];

/// -2 ~ 2 신호의 점수 (정렬된 값 -2 ~ 2).
const SIGNAL_SCORES: [Decimal; 5] = [dec!(0), dec!(0.25), dec!(0.5), dec!(0.75), dec!(1)];

/// 거래량 행렬. 행: 강도 0 ~ 2. 열: 정렬된 방향 -2, -1, 1, 2.
const VOLUME_DIRECTION_SCORES: [[Decimal; 4]; 3] = [
    [dec!(0.40), dec!(0.45), dec!(0.55), dec!(0.60)],
    [dec!(0.25), dec!(0.35), dec!(0.65), dec!(0.75)],
    [dec!(0.00), dec!(0.15), dec!(0.85), dec!(1.00)],
];

/// 예측 상태 허용 범위.
pub const PREDICTION_STATE_RANGE: (i8, i8) = (-12, 12);

/// 기준별 점수와 상태 설명.
struct CriterionScore {
    score: Decimal,
    state: String,
}

/// 포지션 건강도 계산기.
///
/// 상태를 갖지 않으므로 여러 스레드에서 동시에 사용해도 안전합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionHealthScorer;

impl PositionHealthScorer {
    /// 새 계산기를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 스냅샷의 건강도를 계산합니다.
    ///
    /// # 에러
    ///
    /// - 가중치가 음수이거나 유한하지 않음
    /// - 신호 값이 허용 범위를 벗어남
    /// - 트렌드 합계/시리즈 값이 유한하지 않음
    pub fn evaluate(&self, input: &PositionHealthInput) -> ScoringResult<PositionHealthResult> {
        input.weights.validate()?;
        let side = input.side;

        let mut scores: Vec<(HealthCriterion, CriterionScore)> =
            Vec::with_capacity(HealthCriterion::ALL.len());

        scores.push((
            HealthCriterion::TrendSum,
            Self::trend_sum(side, input.open_trend_sum, input.current_trend_sum)?,
        ));
        scores.push((
            HealthCriterion::TrendState,
            Self::trend_state(side, input.prediction_state, input.prediction_state_intensity)?,
        ));
        for (criterion, value) in input.technical_analysis.by_criterion() {
            scores.push((criterion, Self::signal(side, value, criterion.id())?));
        }
        scores.push((
            HealthCriterion::OpenInterest,
            Self::series_change(side, &input.open_interest, &OPEN_INTEREST_STAIRCASE, "open_interest")?,
        ));
        scores.push((
            HealthCriterion::OpenInterestState,
            Self::signal(side, input.open_interest_state, "open_interest_state")?,
        ));
        scores.push((
            HealthCriterion::LongShortRatio,
            Self::series_change(
                side,
                &input.long_short_ratio,
                &LONG_SHORT_RATIO_STAIRCASE,
                "long_short_ratio",
            )?,
        ));
        scores.push((
            HealthCriterion::LongShortRatioState,
            Self::signal(side, input.long_short_ratio_state, "long_short_ratio_state")?,
        ));
        scores.push((
            HealthCriterion::VolumeDirection,
            Self::volume_direction(side, input.volume)?,
        ));

        let mut items = Vec::with_capacity(scores.len());
        for (criterion, criterion_score) in scores {
            let weight = to_decimal(input.weights.get(criterion), criterion.id())?;
            items.push(Self::weighted_item(criterion, weight, criterion_score));
        }

        let total_hp: Decimal = items.iter().map(|item| item.points).sum();

        info!(
            side = %side,
            total_hp = %total_hp,
            max_hp = input.weights.total(),
            "Position health evaluated"
        );

        Ok(PositionHealthResult { items, total_hp })
    }

    fn weighted_item(criterion: HealthCriterion, weight: Decimal, scored: CriterionScore) -> ScoredItem {
        let points = (weight * scored.score).round_points().min(weight);
        let percentage = (scored.score * Decimal::ONE_HUNDRED).round_points();

        debug!(
            criterion = criterion.id(),
            score = %scored.score,
            points = %points,
            state = %scored.state,
            "Health criterion scored"
        );

        ScoredItem {
            id: criterion.id().to_string(),
            name: criterion.name().to_string(),
            points,
            max_points: weight,
            percentage,
            state: Some(scored.state),
            state_class: StateClassifier::from_percentage(percentage),
        }
    }

    // ================================================================================================
    // 기준별 점수
    // ================================================================================================

    /// 1. 트렌드 합계 점수.
    ///
    /// 오픈 시점 대비 변화율을 포지션 방향으로 정렬해 51단계 계단에 대입합니다.
    pub fn trend_sum_score(side: PositionSide, open: f64, current: f64) -> ScoringResult<Decimal> {
        Ok(Self::trend_sum(side, open, current)?.score)
    }

    fn trend_sum(side: PositionSide, open: f64, current: f64) -> ScoringResult<CriterionScore> {
        let open = to_decimal(open, "open_trend_sum")?;
        let current = to_decimal(current, "current_trend_sum")?;
        let alteration = percent_change(open, current);
        let aligned = side.align(alteration);

        Ok(CriterionScore {
            score: TREND_SUM_STAIRCASE.score(aligned),
            state: format!("{}{}", sign_prefix(alteration), alteration.round_points().to_percentage_string()),
        })
    }

    /// 2. 트렌드 상태 점수.
    pub fn trend_state_score(side: PositionSide, state: i8, intensity: i8) -> ScoringResult<Decimal> {
        Ok(Self::trend_state(side, state, intensity)?.score)
    }

    fn trend_state(side: PositionSide, state: i8, intensity: i8) -> ScoringResult<CriterionScore> {
        check_range("prediction_state", state, PREDICTION_STATE_RANGE.0, PREDICTION_STATE_RANGE.1)?;
        check_range("prediction_state_intensity", intensity, -2, 2)?;

        let aligned_state = side.align_signal(state);
        let aligned_intensity = side.align_signal(intensity);

        let score = if aligned_state == 0 {
            TREND_STATE_NEUTRAL[intensity_column(aligned_intensity)]
        } else if aligned_state > 0 {
            favorable_trend_state(aligned_state, aligned_intensity)
        } else {
            Decimal::ONE - favorable_trend_state(-aligned_state, -aligned_intensity)
        };

        Ok(CriterionScore {
            score,
            state: format!("state {state}, intensity {intensity}"),
        })
    }

    /// 3/5/7. -2 ~ 2 신호 점수 (기술적 분석, 미결제약정 상태, 롱/숏 비율 상태).
    pub fn signal_score(side: PositionSide, value: i8, field: &str) -> ScoringResult<Decimal> {
        Ok(Self::signal(side, value, field)?.score)
    }

    fn signal(side: PositionSide, value: i8, field: &str) -> ScoringResult<CriterionScore> {
        check_range(field, value, -2, 2)?;
        let aligned = side.align_signal(value);
        Ok(CriterionScore {
            score: SIGNAL_SCORES[intensity_column(aligned)],
            state: signal_label(value).to_string(),
        })
    }

    /// 4. 미결제약정 변화 점수.
    pub fn open_interest_score(side: PositionSide, series: &SeriesReference) -> ScoringResult<Decimal> {
        Ok(Self::series_change(side, series, &OPEN_INTEREST_STAIRCASE, "open_interest")?.score)
    }

    /// 6. 롱/숏 비율 변화 점수.
    pub fn long_short_ratio_score(side: PositionSide, series: &SeriesReference) -> ScoringResult<Decimal> {
        Ok(Self::series_change(side, series, &LONG_SHORT_RATIO_STAIRCASE, "long_short_ratio")?.score)
    }

    fn series_change(
        side: PositionSide,
        series: &SeriesReference,
        staircase: &Staircase,
        field: &str,
    ) -> ScoringResult<CriterionScore> {
        let opening = to_decimal(series.opening, field)?;
        let current = to_decimal(series.current, field)?;
        let change = percent_change(opening, current);

        Ok(CriterionScore {
            score: staircase.score(side.align(change)),
            state: format!("{}{}", sign_prefix(change), change.round_points().to_percentage_string()),
        })
    }

    /// 8. 거래량 방향 점수.
    pub fn volume_direction_score(side: PositionSide, volume: VolumeSignal) -> ScoringResult<Decimal> {
        Ok(Self::volume_direction(side, volume)?.score)
    }

    fn volume_direction(side: PositionSide, volume: VolumeSignal) -> ScoringResult<CriterionScore> {
        check_range("volume.state", volume.state, 0, 2)?;
        check_range("volume.direction", volume.direction, -2, 2)?;
        let column = match side.align_signal(volume.direction) {
            -2 => 0,
            -1 => 1,
            1 => 2,
            2 => 3,
            _ => {
                return Err(ScoringError::InvalidSignal {
                    field: "volume.direction".to_string(),
                    value: volume.direction as i64,
                })
            }
        };

        Ok(CriterionScore {
            score: VOLUME_DIRECTION_SCORES[volume.state as usize][column],
            state: format!("volume {}, direction {}", volume.state, volume.direction),
        })
    }
}

fn check_range(field: &str, value: i8, min: i8, max: i8) -> ScoringResult<()> {
    if value < min || value > max {
        return Err(ScoringError::out_of_range(field, value as i64, min as i64, max as i64));
    }
    Ok(())
}

/// -2 ~ 2 값을 0 ~ 4 열 인덱스로 변환합니다. 호출 전에 범위가 검증되어 있어야 합니다.
fn intensity_column(value: i8) -> usize {
    (value + 2) as usize
}

fn favorable_trend_state(magnitude: i8, aligned_intensity: i8) -> Decimal {
    let row = (magnitude.min(9) - 1) as usize;
    TREND_STATE_FAVORABLE[row][intensity_column(aligned_intensity)]
}

fn signal_label(value: i8) -> &'static str {
    match value {
        2 => "strong buy",
        1 => "buy",
        0 => "neutral",
        -1 => "sell",
        _ => "strong sell",
    }
}

fn sign_prefix(value: Decimal) -> &'static str {
    if value > Decimal::ZERO {
        "+"
    } else {
        ""
    }
}
