//! 대칭 계단 함수.
//!
//! 중립 점수 0.5를 중심으로, 포지션 방향으로 정렬된 변화량의 절대값이 넘어선
//! 임계값 개수만큼 `step`씩 점수를 올리거나(유리한 방향) 내립니다.
//! 임계값은 오름차순 배열이며 `partition_point`(이진 탐색)로 넘어선 개수를 셉니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// 중립 점수.
pub const NEUTRAL_SCORE: Decimal = dec!(0.5);

/// 대칭 계단 함수.
#[derive(Debug, Clone, Copy)]
pub struct Staircase {
    thresholds: &'static [Decimal],
    step: Decimal,
}

impl Staircase {
    /// 임계값(오름차순)과 단계별 점수 폭으로 생성합니다.
    pub const fn new(thresholds: &'static [Decimal], step: Decimal) -> Self {
        Self { thresholds, step }
    }

    /// 넘어선 임계값 개수.
    pub fn steps_crossed(&self, magnitude: Decimal) -> usize {
        self.thresholds.partition_point(|t| *t <= magnitude)
    }

    /// 정렬된 변화량의 점수 (0 ~ 1).
    pub fn score(&self, aligned_change: Decimal) -> Decimal {
        let steps = Decimal::from(self.steps_crossed(aligned_change.abs()));
        let delta = self.step * steps;
        let score = if aligned_change.is_sign_negative() {
            NEUTRAL_SCORE - delta
        } else {
            NEUTRAL_SCORE + delta
        };
        score.max(Decimal::ZERO).min(Decimal::ONE)
    }

    /// 임계값 개수.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// 임계값이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}
