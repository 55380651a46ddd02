//! 공통 값 타입.

pub mod date;
pub mod decimal;

pub use date::*;
pub use decimal::*;
