//! 평가 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 원시 지표 → 점수 환산 ([`PointScaler`])
//! - 달성률 → 상태 등급 분류 ([`StateClassifier`])
//! - 열린 포지션의 건강도 계산 ([`PositionHealthScorer`])
//! - 선언적 템플릿 기반 모델 인증서 평가 ([`ModelEvaluationScorer`])
//! - 고장 판정이 포함된 분류 학습 평가 ([`ClassificationEvaluationScorer`])
//! - 인증서 순위 산출 ([`rank_certificates`])
//!
//! 모든 계산기는 입력만 읽고 새 결과를 반환하는 동기 순수 함수입니다.

pub mod classification_evaluation;
pub mod model_evaluation;
pub mod point_scaler;
pub mod position_health;
pub mod ranking;
pub mod staircase;
pub mod state_classifier;

pub use classification_evaluation::{BrokenReason, ClassificationEvaluationScorer, Direction};
pub use model_evaluation::{templates, ItemScore, ModelEvaluationScorer};
pub use point_scaler::PointScaler;
pub use position_health::PositionHealthScorer;
pub use ranking::{rank_certificates, OrderBy, RankedCertificate};
pub use staircase::Staircase;
pub use state_classifier::StateClassifier;
