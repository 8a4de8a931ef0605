//! 달성률 → 상태 등급 분류.
//!
//! `percent = points / max_points * 100`을 고정 임계값(80/60/40/20)으로 나눕니다.
//! `max_points == 0`이면 달성률 0으로 보고 `Error`입니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use evaluator_core::{DecimalExt, StateClass};

/// `Optimal` 하한 (%)
pub const OPTIMAL_THRESHOLD: Decimal = dec!(80);
/// `Decent` 하한 (%)
pub const DECENT_THRESHOLD: Decimal = dec!(60);
/// `Neutral` 하한 (%)
pub const NEUTRAL_THRESHOLD: Decimal = dec!(40);
/// `Warning` 하한 (%)
pub const WARNING_THRESHOLD: Decimal = dec!(20);

/// 상태 등급 분류기.
pub struct StateClassifier;

impl StateClassifier {
    /// 점수와 최대 점수로 5단계 등급을 계산합니다.
    pub fn classify(points: Decimal, max_points: Decimal) -> StateClass {
        Self::from_percentage(Self::raw_percentage(points, max_points))
    }

    /// 분류 학습 평가에서 사용하는 4단계 등급 (`Warning` 없이 `Error`로 통합).
    pub fn classify_four_tier(points: Decimal, max_points: Decimal) -> StateClass {
        Self::four_tier(Self::classify(points, max_points))
    }

    /// 달성률(%)로 5단계 등급을 계산합니다.
    pub fn from_percentage(percent: Decimal) -> StateClass {
        if percent >= OPTIMAL_THRESHOLD {
            StateClass::Optimal
        } else if percent >= DECENT_THRESHOLD {
            StateClass::Decent
        } else if percent >= NEUTRAL_THRESHOLD {
            StateClass::Neutral
        } else if percent >= WARNING_THRESHOLD {
            StateClass::Warning
        } else {
            StateClass::Error
        }
    }

    /// 5단계 등급을 4단계로 변환합니다.
    pub fn four_tier(class: StateClass) -> StateClass {
        match class {
            StateClass::Warning => StateClass::Error,
            other => other,
        }
    }

    /// 표시용 달성률 (소수점 2자리).
    pub fn percentage(points: Decimal, max_points: Decimal) -> Decimal {
        Self::raw_percentage(points, max_points).round_points()
    }

    fn raw_percentage(points: Decimal, max_points: Decimal) -> Decimal {
        if max_points.is_zero() {
            return Decimal::ZERO;
        }
        debug_assert!(
            points <= max_points,
            "points({points}) must not exceed max_points({max_points})"
        );
        points / max_points * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        assert_eq!(StateClassifier::classify(dec!(80), dec!(100)), StateClass::Optimal);
        assert_eq!(StateClassifier::classify(dec!(79.999), dec!(100)), StateClass::Decent);
        assert_eq!(StateClassifier::classify(dec!(60), dec!(100)), StateClass::Decent);
        assert_eq!(StateClassifier::classify(dec!(40), dec!(100)), StateClass::Neutral);
        assert_eq!(StateClassifier::classify(dec!(20), dec!(100)), StateClass::Warning);
        assert_eq!(StateClassifier::classify(dec!(19.99), dec!(100)), StateClass::Error);
        assert_eq!(StateClassifier::classify(dec!(0), dec!(100)), StateClass::Error);
    }

    #[test]
    fn test_zero_max_points_is_error() {
        assert_eq!(StateClassifier::classify(dec!(0), dec!(0)), StateClass::Error);
        assert_eq!(StateClassifier::percentage(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn test_scaled_max_points() {
        assert_eq!(StateClassifier::classify(dec!(8), dec!(10)), StateClass::Optimal);
        assert_eq!(StateClassifier::percentage(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn test_four_tier() {
        assert_eq!(
            StateClassifier::classify_four_tier(dec!(25), dec!(100)),
            StateClass::Error
        );
        assert_eq!(
            StateClassifier::classify_four_tier(dec!(45), dec!(100)),
            StateClass::Neutral
        );
    }
}
