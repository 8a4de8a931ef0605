//! 원시 지표 → 점수 환산기.
//!
//! 보정 구간(`ScoreBand`)의 방향에 따라 두 가지 방식으로 환산합니다.
//!
//! # 높을수록 좋은 지표 (`best > worst`)
//!
//! - `value <= worst` → 0점
//! - `value >= best` → 만점
//! - 그 사이 → `value * max_points / best`
//!
//! 보간은 `worst`가 아니라 **0에서 시작**합니다. 따라서 `worst` 바로 위의 값도
//! `worst / best` 비율만큼의 점수를 받습니다. 기존 점수와의 호환을 위해 유지하는 공식입니다.
//!
//! # 낮을수록 좋은 지표 (`best <= worst`, 손실 등)
//!
//! `value / worst` 비율을 29단계 고정 테이블로 환산합니다. `value >= worst`이면 0점,
//! `value < worst / 14`이면 만점입니다.
//!
//! 결과는 항상 `[0, max_points]` 범위이며 소수점 2자리로 반올림됩니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use evaluator_core::{to_decimal, DecimalExt, ScoreBand, ScoringResult};

/// 낮을수록 좋은 지표의 환산 테이블.
///
/// `(worst 나눗셈 계수, 만점 나눗셈 계수)`. `value >= worst / 계수`를 만족하는 첫 행의
/// `max_points / 만점 계수`가 점수입니다. 임계값이 내림차순이 되도록 계수는 오름차순입니다.
pub const LOWER_IS_BETTER_TABLE: [(Decimal, Decimal); 29] = [
    (dec!(1.1), dec!(30)),
    (dec!(1.2), dec!(25)),
    (dec!(1.3), dec!(20)),
    (dec!(1.4), dec!(17)),
    (dec!(1.5), dec!(15)),
    (dec!(1.6), dec!(13)),
    (dec!(1.7), dec!(12)),
    (dec!(1.8), dec!(11)),
    (dec!(1.9), dec!(10)),
    (dec!(2), dec!(9)),
    (dec!(2.25), dec!(8)),
    (dec!(2.5), dec!(7)),
    (dec!(2.75), dec!(6)),
    (dec!(3), dec!(5.5)),
    (dec!(3.5), dec!(5)),
    (dec!(4), dec!(4.5)),
    (dec!(4.5), dec!(4)),
    (dec!(5), dec!(3.5)),
    (dec!(5.5), dec!(3)),
    (dec!(6), dec!(2.75)),
    (dec!(6.5), dec!(2.5)),
    (dec!(7), dec!(2.25)),
    (dec!(8), dec!(2)),
    (dec!(9), dec!(1.75)),
    (dec!(10), dec!(1.5)),
    (dec!(11), dec!(1.35)),
    (dec!(12), dec!(1.2)),
    (dec!(13), dec!(1.1)),
    (dec!(14), dec!(1.01)),
];

/// 점수 환산기.
pub struct PointScaler;

impl PointScaler {
    /// 값을 보정 구간에 따라 점수로 환산합니다.
    pub fn scale(value: Decimal, band: &ScoreBand) -> Decimal {
        let max_points = band.max_points();
        if max_points.is_zero() {
            return Decimal::ZERO;
        }

        let points = if band.is_higher_better() {
            Self::scale_higher_is_better(value, band)
        } else {
            Self::scale_lower_is_better(value, band)
        };

        // 반올림 후 clamp: 소수점 3자리 이상 max_points도 상한을 넘지 않음
        points.round_points().max(Decimal::ZERO).min(max_points)
    }

    /// f64 입력용 편의 함수.
    ///
    /// 비유한 입력은 `NonFinite`, 음수 `max_points`는 `InvalidBand` 에러입니다.
    pub fn calculate_points(
        value: f64,
        worst: f64,
        best: f64,
        max_points: f64,
        field: &str,
    ) -> ScoringResult<Decimal> {
        let band = ScoreBand::new(
            to_decimal(worst, field)?,
            to_decimal(best, field)?,
            to_decimal(max_points, field)?,
        )?;
        Ok(Self::scale(to_decimal(value, field)?, &band))
    }

    fn scale_higher_is_better(value: Decimal, band: &ScoreBand) -> Decimal {
        let (worst, best, max_points) = (band.worst_value(), band.best_value(), band.max_points());

        if value <= worst {
            Decimal::ZERO
        } else if value >= best {
            max_points
        } else if best > Decimal::ZERO {
            value * max_points / best
        } else {
            // 0 기준 보간이 불가능한 음수 구간은 worst 기준으로 보간
            (value - worst) * max_points / (best - worst)
        }
    }

    fn scale_lower_is_better(value: Decimal, band: &ScoreBand) -> Decimal {
        let (worst, best, max_points) = (band.worst_value(), band.best_value(), band.max_points());

        if worst <= Decimal::ZERO {
            return if value <= best { max_points } else { Decimal::ZERO };
        }
        if value >= worst {
            return Decimal::ZERO;
        }

        LOWER_IS_BETTER_TABLE
            .iter()
            .find(|(worst_divisor, _)| value >= worst / *worst_divisor)
            .map(|(_, points_divisor)| max_points / *points_divisor)
            .unwrap_or(max_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::FromPrimitive;

    fn band(worst: Decimal, best: Decimal, max_points: Decimal) -> ScoreBand {
        ScoreBand::new(worst, best, max_points).unwrap()
    }

    #[test]
    fn test_higher_is_better_zero_anchored() {
        let b = band(dec!(45), dec!(60), dec!(60));
        assert_eq!(PointScaler::scale(dec!(52.5), &b), dec!(52.5));
        assert_eq!(PointScaler::scale(dec!(45), &b), dec!(0));
        assert_eq!(PointScaler::scale(dec!(60), &b), dec!(60));
        assert_eq!(PointScaler::scale(dec!(75), &b), dec!(60));
        // worst 바로 위도 0이 아닌 점수 (0 기준 보간)
        assert_eq!(PointScaler::scale(dec!(45.01), &b), dec!(45.01));
    }

    #[test]
    fn test_higher_is_better_rounding() {
        let b = band(dec!(1), dec!(25), dec!(10));
        // 7 * 10 / 25 = 2.8
        assert_eq!(PointScaler::scale(dec!(7), &b), dec!(2.8));
        // 3 * 10 / 7 = 4.2857... → 4.29
        let b = band(dec!(0), dec!(7), dec!(10));
        assert_eq!(PointScaler::scale(dec!(3), &b), dec!(4.29));
    }

    #[test]
    fn test_higher_is_better_negative_best() {
        let b = band(dec!(-10), dec!(0), dec!(10));
        assert_eq!(PointScaler::scale(dec!(-5), &b), dec!(5));
    }

    #[test]
    fn test_lower_is_better_table_edges() {
        let b = band(dec!(1), dec!(0), dec!(30));
        assert_eq!(PointScaler::scale(dec!(1), &b), dec!(0));
        assert_eq!(PointScaler::scale(dec!(2), &b), dec!(0));
        // 1 / 1.1 = 0.9090..., 0.95 >= 0.909 → 30 / 30
        assert_eq!(PointScaler::scale(dec!(0.95), &b), dec!(1));
        // 0.5 = 1 / 2 → 30 / 9
        assert_eq!(PointScaler::scale(dec!(0.5), &b), dec!(3.33));
        // 1 / 14 = 0.0714... → 30 / 1.01 = 29.70
        assert_eq!(PointScaler::scale(dec!(0.072), &b), dec!(29.70));
        // 1 / 14 미만 → 만점
        assert_eq!(PointScaler::scale(dec!(0.07), &b), dec!(30));
        assert_eq!(PointScaler::scale(dec!(0), &b), dec!(30));
    }

    #[test]
    fn test_lower_is_better_table_is_sorted() {
        for pair in LOWER_IS_BETTER_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 > pair[1].1);
        }
        assert_eq!(LOWER_IS_BETTER_TABLE[0], (dec!(1.1), dec!(30)));
        assert_eq!(LOWER_IS_BETTER_TABLE[28], (dec!(14), dec!(1.01)));
    }

    #[test]
    fn test_lower_is_better_zero_worst() {
        let b = band(dec!(0), dec!(0), dec!(10));
        assert_eq!(PointScaler::scale(dec!(0), &b), dec!(10));
        assert_eq!(PointScaler::scale(dec!(0.1), &b), dec!(0));
    }

    #[test]
    fn test_zero_max_points() {
        let b = band(dec!(45), dec!(60), dec!(0));
        assert_eq!(PointScaler::scale(dec!(59), &b), dec!(0));
    }

    #[test]
    fn test_fractional_max_points_not_exceeded() {
        let b = band(dec!(0), dec!(1), dec!(0.335));
        assert_eq!(PointScaler::scale(dec!(5), &b), dec!(0.335));
        assert_eq!(PointScaler::scale(dec!(0.5), &b), dec!(0.17));

        let b = band(dec!(1), dec!(0), dec!(0.335));
        assert_eq!(PointScaler::scale(dec!(0), &b), dec!(0.335));
    }

    #[test]
    fn test_calculate_points_rejects_invalid_input() {
        assert!(PointScaler::calculate_points(f64::NAN, 0.0, 1.0, 10.0, "x").is_err());
        assert!(PointScaler::calculate_points(0.5, 0.0, 1.0, -10.0, "x").is_err());
        assert_eq!(
            PointScaler::calculate_points(0.05, 0.0, 0.1, 5.0, "x").unwrap(),
            dec!(2.5)
        );
    }

    proptest! {
        #[test]
        fn prop_higher_is_better_monotonic(a in 0.0f64..60.0, b in 0.0f64..60.0) {
            let band = band(dec!(45), dec!(60), dec!(10));
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Decimal::from_f64(lo).unwrap();
            let hi = Decimal::from_f64(hi).unwrap();
            prop_assert!(PointScaler::scale(lo, &band) <= PointScaler::scale(hi, &band));
        }

        #[test]
        fn prop_lower_is_better_non_increasing(a in 0.0f64..2.0, b in 0.0f64..2.0) {
            let band = band(dec!(1), dec!(0), dec!(10));
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let lo = Decimal::from_f64(lo).unwrap();
            let hi = Decimal::from_f64(hi).unwrap();
            prop_assert!(PointScaler::scale(lo, &band) >= PointScaler::scale(hi, &band));
        }

        #[test]
        fn prop_bounded(value in -100.0f64..100.0, worst in -50.0f64..50.0, best in -50.0f64..50.0, max in 0.0f64..100.0) {
            let max_points = Decimal::from_f64(max).unwrap();
            let band = band(
                Decimal::from_f64(worst).unwrap(),
                Decimal::from_f64(best).unwrap(),
                max_points,
            );
            let points = PointScaler::scale(Decimal::from_f64(value).unwrap(), &band);
            prop_assert!(points >= Decimal::ZERO);
            prop_assert!(points <= max_points);
        }
    }
}
