//! 위젯 수명 관리.
//!
//! 위젯은 마운트될 때 요청 하나를 시작하고, 결과를 받으면 자신의 뷰를 계산해 상태에 반영합니다.
//! 언마운트 이후에는 요청이 늦게 끝나더라도 상태가 바뀌지 않습니다.
//!
//! - `unmount()`는 상태 쓰기 락을 잡은 채로 취소 토큰을 취소합니다.
//! - 조회 태스크는 같은 쓰기 락을 잡은 뒤 토큰을 다시 확인하고 나서야 상태를 바꿉니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pnl_core::{
    summarize, widget_span, CalendarMonth, ChartSeries, DailyValues, DerivedMetric, PnLReport,
    PnlResult, SeriesKind,
};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn, Instrument};

use crate::fetcher::ReportSource;

/// 위젯 로딩 상태.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// 응답 대기 중
    Pending,
    /// 뷰가 반영됨
    Loaded,
    /// 조회 실패 (뷰는 초기값 유지)
    Failed(String),
    /// 응답 전에 언마운트됨
    Cancelled,
}

/// 위젯 상태.
#[derive(Debug, Clone)]
pub struct WidgetState<V> {
    pub status: LoadStatus,
    pub view: V,
    /// 마지막으로 뷰가 반영된 시각
    pub updated_at: Option<DateTime<Utc>>,
}

/// 리포트에서 자신의 뷰를 계산하는 위젯.
pub trait PnlWidget: Send + Sync + 'static {
    /// 위젯 뷰 모델
    type View: Clone + Send + Sync + 'static;

    /// 로그용 이름
    fn name(&self) -> &'static str;

    /// 요청할 시리즈 종류 (`None`이면 전체 리포트)
    fn request_kind(&self) -> Option<SeriesKind>;

    /// 응답 전 또는 실패 시 표시할 초기 뷰
    fn initial_view(&self) -> Self::View;

    /// 리포트에서 뷰를 계산합니다.
    fn derive(&self, report: &PnLReport) -> Self::View;
}

/// 요약 행 위젯.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryWidget;

impl PnlWidget for SummaryWidget {
    type View = Vec<DerivedMetric>;

    fn name(&self) -> &'static str {
        "summary"
    }

    fn request_kind(&self) -> Option<SeriesKind> {
        None
    }

    fn initial_view(&self) -> Self::View {
        summarize(&PnLReport::default())
    }

    fn derive(&self, report: &PnLReport) -> Self::View {
        summarize(report)
    }
}

/// 시계열 차트 위젯.
#[derive(Debug, Clone, Copy)]
pub struct ChartWidget {
    pub kind: SeriesKind,
}

impl ChartWidget {
    pub fn new(kind: SeriesKind) -> Self {
        Self { kind }
    }
}

impl PnlWidget for ChartWidget {
    type View = ChartSeries;

    fn name(&self) -> &'static str {
        match self.kind {
            SeriesKind::Cumulative => "chart.cumulative",
            SeriesKind::ByDay => "chart.by_day",
        }
    }

    fn request_kind(&self) -> Option<SeriesKind> {
        Some(self.kind)
    }

    fn initial_view(&self) -> Self::View {
        ChartSeries::empty(self.kind)
    }

    fn derive(&self, report: &PnLReport) -> Self::View {
        ChartSeries::from_values(self.kind, report.series(self.kind))
    }
}

/// 캘린더 위젯.
///
/// 일별 손익 맵만 보관하고, 셀 스타일은 표시할 월이 정해질 때 계산합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarWidget;

impl CalendarWidget {
    /// 보관 중인 맵으로 월 뷰를 만듭니다.
    pub fn month(pnl_by_day: &DailyValues, year: i32, month: u32) -> PnlResult<CalendarMonth> {
        CalendarMonth::build(year, month, pnl_by_day)
    }
}

impl PnlWidget for CalendarWidget {
    type View = DailyValues;

    fn name(&self) -> &'static str {
        "calendar"
    }

    fn request_kind(&self) -> Option<SeriesKind> {
        None
    }

    fn initial_view(&self) -> Self::View {
        DailyValues::new()
    }

    fn derive(&self, report: &PnLReport) -> Self::View {
        report.pnl_by_day.clone()
    }
}

/// 마운트된 위젯.
///
/// 드롭되면 취소 토큰을 취소합니다. 상태 불변을 보장하려면 `unmount()`를 호출하세요.
pub struct MountedWidget<W: PnlWidget> {
    widget: Arc<W>,
    state: Arc<RwLock<WidgetState<W::View>>>,
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// 위젯을 마운트하고 조회를 시작합니다.
///
/// tokio 런타임 안에서 호출해야 합니다.
pub fn mount<W: PnlWidget>(widget: W, source: Arc<dyn ReportSource>) -> MountedWidget<W> {
    let widget = Arc::new(widget);
    let state = Arc::new(RwLock::new(WidgetState {
        status: LoadStatus::Pending,
        view: widget.initial_view(),
        updated_at: None,
    }));
    let token = CancellationToken::new();

    let span = match widget.request_kind() {
        Some(kind) => widget_span!(widget.name(), source.file_name(), kind),
        None => widget_span!(widget.name(), source.file_name()),
    };

    let task = tokio::spawn(
        run_fetch(
            Arc::clone(&widget),
            source,
            Arc::clone(&state),
            token.clone(),
        )
        .instrument(span),
    );

    MountedWidget {
        widget,
        state,
        token,
        task: Some(task),
    }
}

async fn run_fetch<W: PnlWidget>(
    widget: Arc<W>,
    source: Arc<dyn ReportSource>,
    state: Arc<RwLock<WidgetState<W::View>>>,
    token: CancellationToken,
) {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!("Widget unmounted before request completed");
            return;
        }
        result = source.load(widget.request_kind()) => result,
    };

    let mut state = state.write().await;
    if token.is_cancelled() {
        debug!("Discarding response for unmounted widget");
        return;
    }

    match result {
        Ok(report) => {
            state.view = widget.derive(&report);
            state.status = LoadStatus::Loaded;
            state.updated_at = Some(Utc::now());
            debug!("Widget view updated");
        }
        Err(e) => {
            error!(error = %e, retryable = e.is_retryable(), "Failed to load P&L report");
            state.status = LoadStatus::Failed(e.to_string());
        }
    }
}

impl<W: PnlWidget> MountedWidget<W> {
    pub fn widget(&self) -> &W {
        &self.widget
    }

    /// 아직 언마운트되지 않았는지 여부.
    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// 현재 상태 스냅샷.
    pub async fn snapshot(&self) -> WidgetState<W::View> {
        self.state.read().await.clone()
    }

    /// 현재 뷰.
    pub async fn view(&self) -> W::View {
        self.state.read().await.view.clone()
    }

    /// 조회 태스크가 끝날 때까지 기다린 뒤 상태를 반환합니다.
    pub async fn settled(&mut self) -> WidgetState<W::View> {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(widget = self.widget.name(), error = %e, "Widget task aborted");
            }
        }
        self.snapshot().await
    }

    /// 위젯을 언마운트합니다.
    ///
    /// 이 호출이 끝난 뒤에는 조회 결과가 상태에 반영되지 않습니다.
    pub async fn unmount(&self) {
        let mut state = self.state.write().await;
        if self.token.is_cancelled() {
            return;
        }

        self.token.cancel();
        if state.status == LoadStatus::Pending {
            state.status = LoadStatus::Cancelled;
        }
        debug!(widget = self.widget.name(), "Widget unmounted");
    }
}

impl<W: PnlWidget> Drop for MountedWidget<W> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
