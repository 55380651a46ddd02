//! 클라이언트 오류 타입.

use std::time::Duration;

use thiserror::Error;

/// 리포트 조회 오류.
///
/// 공유 요청의 모든 구독자에게 같은 결과를 전달하기 위해 `Clone`을 구현합니다.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// 연결 실패 등 전송 오류
    #[error("Network error: {0}")]
    Network(String),

    /// 요청 타임아웃
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// 성공이 아닌 HTTP 상태
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON이 아니거나 계약과 맞지 않는 본문
    #[error("Decode error: {0}")]
    Decode(String),

    /// `type`으로 요청한 필드가 응답에 없음
    #[error("Missing field in response: {0}")]
    MissingField(String),

    /// 설정 오류
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// 재시도하면 성공할 수 있는 오류인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Network(_) | ClientError::Timeout(_) => true,
            ClientError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
