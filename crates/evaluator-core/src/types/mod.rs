//! 평가 엔진 전반에서 사용되는 공통 타입.

mod decimal;
mod score;
mod side;

pub use decimal::*;
pub use score::*;
pub use side::*;
