//! 손익 대시보드 터미널 프런트엔드.
//!
//! 이 crate는 다음 기능을 제공합니다:
//! - 요약 지표 출력 (`pnl summary`)
//! - 시계열 차트 데이터 출력 (`pnl chart`)
//! - 월 캘린더 출력 (`pnl calendar`)
//! - 전체 대시보드 그리드 출력 (`pnl dashboard`)

pub mod commands;

pub use commands::*;
