//! # PnL Core
//!
//! 손익 대시보드의 핵심 도메인 모델 및 표시용 변환 로직을 제공합니다.
//!
//! 이 크레이트는 대시보드 전반에서 사용되는 기본 타입을 제공합니다:
//! - `/api/pnl` 응답 리포트 모델
//! - 요약 지표 포매터 (Profit Factor 포함)
//! - 차트 시리즈 변환
//! - 캘린더 셀 분류
//! - 대시보드 그리드 구성
//! - 설정 관리
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
