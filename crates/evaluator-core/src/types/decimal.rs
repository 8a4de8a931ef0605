//! 점수 계산을 위한 Decimal 유틸리티.
//!
//! 점수 계산은 긴 나눗셈 체인을 거치므로 이진 부동소수점 오차를 피하기 위해
//! 모든 점수와 비율을 `Decimal`로 다룹니다.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ScoringError, ScoringResult};

/// 점수 타입 (소수점 2자리로 반올림됨).
pub type Points = Decimal;

/// 점수 반올림 자릿수.
pub const POINTS_DP: u32 = 2;

/// Decimal 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 점수 자릿수(2자리)로 반올림합니다. 0.5는 0에서 멀어지는 방향으로 올립니다.
    fn round_points(&self) -> Decimal;

    /// 퍼센트 문자열로 변환합니다 (예: "5.25%").
    fn to_percentage_string(&self) -> String;

    /// 로그 출력용 f64 변환. 변환할 수 없으면 0.0.
    fn to_f64_lossy(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn round_points(&self) -> Decimal {
        self.round_dp_with_strategy(POINTS_DP, RoundingStrategy::MidpointAwayFromZero)
    }

    fn to_percentage_string(&self) -> String {
        format!("{:.2}%", self)
    }

    fn to_f64_lossy(&self) -> f64 {
        self.to_f64().unwrap_or(0.0)
    }
}

/// 레코드의 f64 값을 Decimal로 변환합니다.
///
/// NaN, 무한대, Decimal 범위를 벗어난 값은 `NonFinite` 에러입니다.
pub fn to_decimal(value: f64, field: &str) -> ScoringResult<Decimal> {
    if !value.is_finite() {
        return Err(ScoringError::NonFinite {
            field: field.to_string(),
        });
    }
    Decimal::from_f64(value).ok_or_else(|| ScoringError::NonFinite {
        field: field.to_string(),
    })
}

/// `from` 대비 `to`의 변화율(%)을 계산합니다.
///
/// 기준값의 부호와 무관하게 `|from|`으로 나누므로, 음수 기준값에서도
/// 값이 커지면 양의 변화율이 됩니다. 기준값이 0이면 `to`의 부호에 따라
/// ±100 (둘 다 0이면 0)입니다.
pub fn percent_change(from: Decimal, to: Decimal) -> Decimal {
    if from.is_zero() {
        return if to.is_zero() {
            Decimal::ZERO
        } else if to.is_sign_negative() {
            -Decimal::ONE_HUNDRED
        } else {
            Decimal::ONE_HUNDRED
        };
    }
    (to - from) / from.abs() * Decimal::ONE_HUNDRED
}

/// 변화율의 절대값(%).
pub fn abs_percent_change(from: Decimal, to: Decimal) -> Decimal {
    percent_change(from, to).abs()
}

/// 비율(0~1)로 주어진 값을 퍼센트로 정규화합니다.
///
/// 값이 1 이하이면 비율로 간주하여 100을 곱합니다.
pub fn normalize_percentage(value: Decimal) -> Decimal {
    if value <= Decimal::ONE {
        value * Decimal::ONE_HUNDRED
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_points() {
        assert_eq!(dec!(1.005).round_points(), dec!(1.01));
        assert_eq!(dec!(2.344).round_points(), dec!(2.34));
        assert_eq!(dec!(-1.005).round_points(), dec!(-1.01));
    }

    #[test]
    fn test_to_decimal_rejects_nan() {
        assert!(to_decimal(f64::NAN, "loss").is_err());
        assert!(to_decimal(f64::INFINITY, "loss").is_err());
        assert_eq!(to_decimal(0.55, "accuracy").unwrap(), dec!(0.55));
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(dec!(2), dec!(3)), dec!(50));
        assert_eq!(percent_change(dec!(-2), dec!(-1)), dec!(50));
        assert_eq!(percent_change(dec!(-2), dec!(-3)), dec!(-50));
        assert_eq!(percent_change(dec!(0), dec!(-3)), dec!(-100));
        assert_eq!(percent_change(dec!(0), dec!(0)), dec!(0));
        assert_eq!(abs_percent_change(dec!(4), dec!(3)), dec!(25));
    }

    #[test]
    fn test_normalize_percentage() {
        assert_eq!(normalize_percentage(dec!(0.55)), dec!(55.00));
        assert_eq!(normalize_percentage(dec!(55)), dec!(55));
        assert_eq!(normalize_percentage(dec!(1)), dec!(100));
    }
}
