//! `/api/pnl` HTTP 클라이언트.
//!
//! 위젯 하나당 요청 하나를 보내며, 재시도하지 않습니다. 실패는 [`ClientError`]로
//! 반환되고 위젯 쪽에서 로그를 남긴 뒤 기본 상태를 유지합니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use pnl_client::{FetcherConfig, PnlFetcher};
//! use pnl_core::SeriesKind;
//!
//! let fetcher = PnlFetcher::new(FetcherConfig::new("http://localhost:5000", "orders.csv"))?;
//! let report = fetcher.fetch_report(Some(SeriesKind::ByDay)).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pnl_core::{ApiSettings, PnLReport, SeriesKind};
use tracing::{debug, instrument, warn};

use crate::error::{ClientError, ClientResult};

/// 리포트 엔드포인트 경로.
pub const PNL_PATH: &str = "/api/pnl";

/// 리포트를 제공하는 소스.
///
/// HTTP 조회기와 공유 요청 캐시가 같은 인터페이스로 위젯에 연결됩니다.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// 백엔드가 읽을 거래 기록 파일 이름.
    fn file_name(&self) -> &str;

    /// 리포트를 가져옵니다. `kind`가 있으면 해당 시리즈 필드로 범위를 좁혀 요청합니다.
    async fn load(&self, kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>>;
}

/// 조회기 설정.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// API 기본 URL (예: `http://localhost:5000`)
    pub base_url: String,
    /// 거래 기록 파일 이름
    pub file_name: String,
    /// 요청 타임아웃
    pub timeout: Duration,
}

impl FetcherConfig {
    pub fn new(base_url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            file_name: file_name.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 설정 파일의 `[api]` 섹션에서 생성합니다.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            file_name: settings.file_name.clone(),
            timeout: settings.timeout(),
        }
    }
}

/// 손익 리포트 HTTP 조회기.
#[derive(Clone)]
pub struct PnlFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl PnlFetcher {
    /// 새 조회기를 생성합니다.
    pub fn new(config: FetcherConfig) -> ClientResult<Self> {
        if config.file_name.trim().is_empty() {
            return Err(ClientError::Config("file_name must not be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client build failed: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// 리포트 엔드포인트 URL.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), PNL_PATH)
    }

    /// 리포트를 조회합니다.
    ///
    /// `kind`가 주어지면 `type` 쿼리 파라미터로 전달하고, 응답에 같은 이름의 필드가
    /// 있어야 합니다.
    #[instrument(skip(self), fields(file_name = %self.config.file_name))]
    pub async fn fetch_report(&self, kind: Option<SeriesKind>) -> ClientResult<PnLReport> {
        let url = self.endpoint();

        let mut query = vec![("file_name", self.config.file_name.as_str())];
        if let Some(kind) = kind {
            query.push(("type", kind.field_name()));
        }

        debug!(url = %url, "Requesting P&L report");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        let body: serde_json::Value = serde_json::from_str(&text)?;

        match kind {
            Some(kind) => {
                if body.get(kind.field_name()).is_none() {
                    return Err(ClientError::MissingField(kind.field_name().to_string()));
                }
            }
            None => {
                for field in PnLReport::missing_fields(&body) {
                    warn!(field, "Report field missing, using default");
                }
            }
        }

        let report: PnLReport = serde_json::from_value(body)?;

        debug!(
            cumulative_points = report.cumulative_pnl.len(),
            daily_points = report.pnl_by_day.len(),
            "P&L report received"
        );

        Ok(report)
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.config.timeout)
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ReportSource for PnlFetcher {
    fn file_name(&self) -> &str {
        &self.config.file_name
    }

    async fn load(&self, kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>> {
        self.fetch_report(kind).await.map(Arc::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let fetcher = PnlFetcher::new(FetcherConfig::new("http://localhost:5000/", "orders.csv"))
            .unwrap();
        assert_eq!(fetcher.endpoint(), "http://localhost:5000/api/pnl");
    }

    #[test]
    fn test_empty_file_name_rejected() {
        let result = PnlFetcher::new(FetcherConfig::new("http://localhost:5000", "  "));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_config_from_settings() {
        let settings = ApiSettings {
            base_url: "http://stats:8080".to_string(),
            file_name: "march.csv".to_string(),
            timeout_secs: 3,
        };
        let config = FetcherConfig::from_settings(&settings);
        assert_eq!(config.file_name, "march.csv");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
