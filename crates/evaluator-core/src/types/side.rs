//! 포지션 방향.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 평가 대상 포지션의 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// 롱 (상승에 베팅)
    Long,
    /// 숏 (하락에 베팅)
    Short,
}

impl PositionSide {
    /// 반대 방향을 반환합니다.
    pub fn opposite(&self) -> Self {
        match self {
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }

    /// 상승 방향 기준 신호를 이 포지션 기준으로 정렬합니다 (숏이면 부호 반전).
    pub fn align(&self, value: Decimal) -> Decimal {
        match self {
            PositionSide::Long => value,
            PositionSide::Short => -value,
        }
    }

    /// 정수 신호 버전의 [`align`](Self::align).
    pub fn align_signal(&self, value: i8) -> i8 {
        match self {
            PositionSide::Long => value,
            PositionSide::Short => value.saturating_neg(),
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "LONG"),
            PositionSide::Short => write!(f, "SHORT"),
        }
    }
}
