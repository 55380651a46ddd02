//! 손익 리포트 조회 및 위젯 수명 관리.
//!
//! 이 crate는 다음을 제공합니다:
//! - `/api/pnl` HTTP 조회 (`PnlFetcher`)
//! - 같은 리포트를 요청하는 위젯 간 요청 공유 (`SharedRequestCache`)
//! - 언마운트 이후 상태 갱신을 막는 위젯 수명 관리 (`MountedWidget`)

pub mod cache;
pub mod error;
pub mod fetcher;
pub mod widget;

pub use cache::{CacheStats, RequestKey, SharedRequestCache};
pub use error::{ClientError, ClientResult};
pub use fetcher::{FetcherConfig, PnlFetcher, ReportSource};
pub use widget::{
    mount, CalendarWidget, ChartWidget, LoadStatus, MountedWidget, PnlWidget, SummaryWidget,
    WidgetState,
};
