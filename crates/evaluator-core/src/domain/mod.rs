//! 평가 엔진이 소비하는 레코드와 설정 모델.

mod calibration;
mod certificate;
mod evaluation_config;
mod health;

pub use calibration::*;
pub use certificate::*;
pub use evaluation_config::*;
pub use health::*;
