//! 대시보드 도메인 모델.
//!
//! - `report`: `/api/pnl` 응답 계약
//! - `metric`: 요약 지표 포매터
//! - `series`: 차트 시리즈 변환
//! - `calendar`: 캘린더 셀 분류
//! - `layout`: 대시보드 그리드 구성

pub mod calendar;
pub mod layout;
pub mod metric;
pub mod report;
pub mod series;

pub use calendar::*;
pub use layout::*;
pub use metric::*;
pub use report::*;
pub use series::*;
