//! 설정 관리.
//!
//! 설정 파일(TOML)과 `PNL__` 접두사 환경 변수를 합쳐 애플리케이션 설정을 만듭니다.
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:5000"
//! file_name = "orders.csv"
//! timeout_secs = 10
//!
//! [cache]
//! ttl_secs = 0
//!
//! [logging]
//! level = "info"
//! format = "compact"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::PnlResult;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 통계 API 설정
    #[serde(default)]
    pub api: ApiSettings,
    /// 요청 캐시 설정
    #[serde(default)]
    pub cache: CacheSettings,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// 통계 API 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiSettings {
    /// API 기본 URL (경로 제외)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 백엔드가 읽을 거래 기록 파일 이름
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}
fn default_file_name() -> String {
    "orders.csv".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            file_name: default_file_name(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiSettings {
    /// 요청 타임아웃.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 요청 캐시 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheSettings {
    /// 완료된 응답을 재사용할 시간 (초). 0이면 진행 중 요청만 공유합니다.
    #[serde(default)]
    pub ttl_secs: u64,
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> PnlResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("PNL")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> PnlResult<Self> {
        Self::load("config/default.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.file_name, "orders.csv");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.cache.ttl(), Duration::ZERO);
        assert_eq!(config.logging.format, "compact");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist.toml").unwrap();
        assert_eq!(config.api.file_name, "orders.csv");
    }

    #[test]
    fn test_partial_toml() {
        let raw = r#"
            [api]
            file_name = "march.csv"

            [cache]
            ttl_secs = 30
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.file_name, "march.csv");
        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.cache.ttl_secs, 30);
    }
}
