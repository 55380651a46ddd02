//! 위젯 간 공유 요청 캐시.
//!
//! 같은 `(file_name, type)` 키에 대해 진행 중인 요청은 최대 하나이며, 동시에 요청한
//! 모든 위젯이 같은 결과를 받습니다.
//!
//! # 동작 흐름
//!
//! ```text
//! get(kind)
//!    │
//!    ▼
//! ┌──────────────────────┐
//! │ 키에 해당하는 항목?    │
//! └──────────┬───────────┘
//!   진행 중 / 신선함 │ 없음 / 만료 / 실패
//!            │      │
//!            │      ▼
//!            │  ┌──────────────────┐
//!            │  │ 새 공유 요청 등록  │
//!            │  └────────┬─────────┘
//!            ▼           ▼
//!      ┌───────────────────────┐
//!      │ 공유 Future 대기        │
//!      └──────────┬────────────┘
//!                 ▼
//!    실패 또는 TTL 0이면 항목 제거
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use pnl_core::{PnLReport, SeriesKind};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::error::ClientResult;
use crate::fetcher::ReportSource;

/// 조회 결과와 완료 시각.
type LoadOutcome = (ClientResult<Arc<PnLReport>>, Instant);
type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

/// 요청 식별 키.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub file_name: String,
    pub kind: Option<SeriesKind>,
}

impl RequestKey {
    pub fn new(file_name: impl Into<String>, kind: Option<SeriesKind>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
        }
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Some(kind) => write!(f, "{}:{}", self.file_name, kind.field_name()),
            None => write!(f, "{}", self.file_name),
        }
    }
}

struct CacheEntry {
    id: u64,
    load: SharedLoad,
}

/// 캐시 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// 기존 요청을 공유한 횟수
    pub hits: u64,
    /// 새 요청을 시작한 횟수
    pub misses: u64,
    /// 현재 보관 중인 항목 수
    pub entries: usize,
}

/// 키 기반 공유 요청 캐시.
pub struct SharedRequestCache<S> {
    source: Arc<S>,
    /// 완료된 응답을 재사용할 시간 (0이면 진행 중 요청만 공유)
    ttl: Duration,
    entries: Mutex<HashMap<RequestKey, CacheEntry>>,
    next_id: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: ReportSource + 'static> SharedRequestCache<S> {
    /// 진행 중 요청만 공유하는 캐시를 생성합니다.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            ttl: Duration::ZERO,
            entries: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// 완료된 응답 재사용 시간을 설정합니다.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// 리포트를 조회합니다. 같은 키의 요청이 진행 중이면 그 결과를 함께 기다립니다.
    pub async fn get(&self, kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>> {
        let key = RequestKey::new(self.source.file_name(), kind);

        let (id, load) = {
            let mut entries = self.entries.lock().await;
            match entries.get(&key) {
                Some(entry) if self.is_reusable(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key, "Sharing pending or fresh request");
                    (entry.id, entry.load.clone())
                }
                _ => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                    let source = Arc::clone(&self.source);
                    let load = async move {
                        let result = source.load(kind).await;
                        (result, Instant::now())
                    }
                    .boxed()
                    .shared();

                    debug!(key = %key, "Starting shared request");
                    entries.insert(
                        key.clone(),
                        CacheEntry {
                            id,
                            load: load.clone(),
                        },
                    );
                    (id, load)
                }
            }
        };

        let (result, _) = load.await;

        if result.is_err() || self.ttl.is_zero() {
            let mut entries = self.entries.lock().await;
            if entries.get(&key).is_some_and(|entry| entry.id == id) {
                entries.remove(&key);
            }
        }

        result
    }

    /// 모든 항목을 비웁니다.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    /// 캐시 통계.
    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.lock().await.len(),
        }
    }

    fn is_reusable(&self, entry: &CacheEntry) -> bool {
        match entry.load.peek() {
            None => true,
            Some((Ok(_), completed_at)) => completed_at.elapsed() < self.ttl,
            Some((Err(_), _)) => false,
        }
    }
}

#[async_trait]
impl<S: ReportSource + 'static> ReportSource for SharedRequestCache<S> {
    fn file_name(&self) -> &str {
        self.source.file_name()
    }

    async fn load(&self, kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>> {
        self.get(kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;

    /// 호출 횟수를 세고 일정 시간 뒤 응답하는 소스.
    struct SlowSource {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl SlowSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: false,
            }
        }

        fn failing_first() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ReportSource for SlowSource {
        fn file_name(&self) -> &str {
            "orders.csv"
        }

        async fn load(&self, _kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;

            if self.fail_first && call == 0 {
                return Err(ClientError::Network("connection refused".to_string()));
            }

            Ok(Arc::new(PnLReport {
                total_pnl: dec!(100),
                ..Default::default()
            }))
        }
    }

    #[test]
    fn test_request_key_fingerprint() {
        assert_eq!(RequestKey::new("orders.csv", None).to_string(), "orders.csv");
        assert_eq!(
            RequestKey::new("orders.csv", Some(SeriesKind::Cumulative)).to_string(),
            "orders.csv:Cumulative_PnL"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_requests_share_one_load() {
        let source = Arc::new(SlowSource::new());
        let cache = SharedRequestCache::new(Arc::clone(&source));

        let (a, b, c) = tokio::join!(cache.get(None), cache.get(None), cache.get(None));

        assert_eq!(source.calls(), 1);
        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(c.unwrap().total_pnl, dec!(100));

        let stats = cache.stats().await;
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.entries, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_kinds_are_separate_keys() {
        let source = Arc::new(SlowSource::new());
        let cache = SharedRequestCache::new(Arc::clone(&source));

        let (_, _) = tokio::join!(
            cache.get(Some(SeriesKind::Cumulative)),
            cache.get(Some(SeriesKind::ByDay))
        );

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_does_not_keep_completed_results() {
        let source = Arc::new(SlowSource::new());
        let cache = SharedRequestCache::new(Arc::clone(&source));

        cache.get(None).await.unwrap();
        cache.get(None).await.unwrap();

        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_reuses_until_expiry() {
        let source = Arc::new(SlowSource::new());
        let cache = SharedRequestCache::new(Arc::clone(&source)).with_ttl(Duration::from_secs(60));

        cache.get(None).await.unwrap();
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_counts_from_completion() {
        let source = Arc::new(SlowSource::new());
        let cache = SharedRequestCache::new(Arc::clone(&source)).with_ttl(Duration::from_millis(60));

        // 50ms 걸리는 조회가 끝난 뒤 40ms 경과: 시작 기준으로는 90ms
        cache.get(None).await.unwrap();
        tokio::time::advance(Duration::from_millis(40)).await;
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 1);

        tokio::time::advance(Duration::from_millis(30)).await;
        cache.get(None).await.unwrap();
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_load_is_evicted() {
        let source = Arc::new(SlowSource::failing_first());
        let cache = SharedRequestCache::new(Arc::clone(&source)).with_ttl(Duration::from_secs(60));

        assert!(cache.get(None).await.is_err());
        assert_eq!(cache.stats().await.entries, 0);

        let report = cache.get(None).await.unwrap();
        assert_eq!(report.total_pnl, dec!(100));
        assert_eq!(source.calls(), 2);
    }
}
