//! # Evaluator Core
//!
//! 예측 모델 평가 엔진의 핵심 타입을 제공합니다.
//!
//! 이 크레이트는 평가 엔진 전반에서 사용되는 기본 타입을 제공합니다:
//! - 점수 결과 타입 (점수 구간, 상태 등급, 항목/카테고리/전체 평가)
//! - 포지션 건강도 입력 스냅샷과 가중치
//! - 학습 인증서 레코드 (회귀, 분류, 예측 모델)
//! - 선언적 평가 템플릿
//! - 보정 상수와 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
