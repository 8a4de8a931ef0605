//! 평가 CLI 도구 모음.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 포지션 건강도 계산
//! - 모델 인증서 평가 (회귀, 분류, 예측 모델)
//! - 분류 학습 인증서 평가 (고장 판정 포함)
//! - 인증서 순위 산출

pub mod commands;

pub use commands::*;
