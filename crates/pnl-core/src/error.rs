//! 대시보드 코어의 에러 타입.

use thiserror::Error;

/// 핵심 대시보드 에러.
#[derive(Debug, Error)]
pub enum PnlError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 날짜 파싱 에러
    #[error("잘못된 날짜: {0}")]
    InvalidDate(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 코어 작업을 위한 Result 타입.
pub type PnlResult<T> = Result<T, PnlError>;

impl From<serde_json::Error> for PnlError {
    fn from(err: serde_json::Error) -> Self {
        PnlError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for PnlError {
    fn from(err: config::ConfigError) -> Self {
        PnlError::Config(err.to_string())
    }
}
