//! 전체 대시보드 출력.
//!
//! 요약, 누적 차트, 일별 차트, 캘린더 위젯을 같은 소스에 마운트하고
//! 결과를 고정 그리드로 배치합니다.

use std::sync::Arc;

use anyhow::Result;
use pnl_client::{mount, CalendarWidget, ChartWidget, ReportSource, SummaryWidget};
use pnl_core::{DashboardLayout, SeriesKind, Tile};
use tracing::info;

use super::calendar::format_calendar_table;
use super::chart::format_chart_table;
use super::summary::format_summary_table;
use super::{format_json, resolve_month, status_note, OutputFormat};

/// 대시보드 출력 설정.
#[derive(Debug, Clone, Copy)]
pub struct DashboardConfig {
    /// 캘린더에 표시할 월
    pub month: Option<(i32, u32)>,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 모든 위젯을 마운트하고 대시보드를 구성합니다.
///
/// 반환된 레이아웃과 함께 실패한 위젯의 경고 문구를 돌려줍니다.
pub async fn build_dashboard(
    source: Arc<dyn ReportSource>,
    month: Option<(i32, u32)>,
) -> Result<(DashboardLayout, Vec<String>)> {
    let mut summary = mount(SummaryWidget, Arc::clone(&source));
    let mut cumulative = mount(ChartWidget::new(SeriesKind::Cumulative), Arc::clone(&source));
    let mut by_day = mount(ChartWidget::new(SeriesKind::ByDay), Arc::clone(&source));
    let mut calendar = mount(CalendarWidget, source);

    let (summary, cumulative, by_day, calendar) = tokio::join!(
        summary.settled(),
        cumulative.settled(),
        by_day.settled(),
        calendar.settled()
    );

    let notes: Vec<String> = [
        status_note("summary", &summary),
        status_note("chart.cumulative", &cumulative),
        status_note("chart.by_day", &by_day),
        status_note("calendar", &calendar),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (year, month) = resolve_month(month, &calendar.view);
    let calendar_month = CalendarWidget::month(&calendar.view, year, month)?;

    let layout = DashboardLayout::compose(
        summary.view,
        vec![cumulative.view, by_day.view],
        calendar_month,
    );

    info!(
        tiles = layout.tiles().count(),
        failed_widgets = notes.len(),
        "Dashboard composed"
    );

    Ok((layout, notes))
}

/// 대시보드를 출력 문자열로 만듭니다.
pub async fn run_dashboard(
    source: Arc<dyn ReportSource>,
    config: DashboardConfig,
) -> Result<String> {
    let (layout, notes) = build_dashboard(source, config.month).await?;

    match config.format {
        OutputFormat::Json => format_json(&layout),
        OutputFormat::Table => {
            let mut output = format_dashboard_table(&layout);
            for note in notes {
                output.push('\n');
                output.push_str(&note);
            }
            Ok(output)
        }
    }
}

/// 테이블 형식 출력. 행 순서대로 각 타일을 출력합니다.
pub fn format_dashboard_table(layout: &DashboardLayout) -> String {
    let mut sections = Vec::new();

    for row in &layout.rows {
        let metrics: Vec<_> = row
            .iter()
            .filter_map(|tile| match tile {
                Tile::Metric(metric) => Some(metric.clone()),
                _ => None,
            })
            .collect();
        if !metrics.is_empty() {
            sections.push(format_summary_table(&metrics));
        }

        for tile in row {
            match tile {
                Tile::Metric(_) => {}
                Tile::Chart { series, .. } => sections.push(format_chart_table(series)),
                Tile::Calendar(month) => sections.push(format_calendar_table(month)),
            }
        }
    }

    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pnl_client::{ClientError, ClientResult, SharedRequestCache};
    use pnl_core::{MetricKind, PnLReport};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSource {
        report: Option<Arc<PnLReport>>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn new(report: Option<PnLReport>) -> Arc<Self> {
            Arc::new(Self {
                report: report.map(Arc::new),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReportSource for FixedSource {
        fn file_name(&self) -> &str {
            "orders.csv"
        }

        async fn load(&self, _kind: Option<SeriesKind>) -> ClientResult<Arc<PnLReport>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.report
                .clone()
                .ok_or_else(|| ClientError::Network("connection refused".to_string()))
        }
    }

    fn sample_report() -> PnLReport {
        let mut report = PnLReport {
            total_pnl: dec!(490),
            total_trades: 3,
            average_winner: dec!(295),
            average_winner_total_trades: 2,
            average_loser: dec!(-100),
            average_loser_total_trades: 1,
            ..Default::default()
        };
        for (date, daily, cumulative) in [
            ("03/01/2024", dec!(-100), dec!(-100)),
            ("03/02/2024", dec!(400), dec!(300)),
            ("03/04/2024", dec!(190), dec!(490)),
        ] {
            report.pnl_by_day.insert(date.to_string(), daily);
            report.cumulative_pnl.insert(date.to_string(), cumulative);
        }
        report
    }

    #[tokio::test]
    async fn test_dashboard_composes_all_widgets() {
        let fixed = FixedSource::new(Some(sample_report()));
        let cache = SharedRequestCache::new(Arc::clone(&fixed))
            .with_ttl(std::time::Duration::from_secs(60));

        let (layout, notes) = build_dashboard(Arc::new(cache), None).await.unwrap();

        assert!(notes.is_empty());
        assert_eq!(layout.rows.len(), 3);
        assert_eq!(layout.rows[0].len(), 5);
        // 요약과 캘린더는 전체 리포트 요청을 공유
        assert_eq!(fixed.calls.load(Ordering::SeqCst), 3);

        match &layout.rows[0][4] {
            Tile::Metric(metric) => {
                assert_eq!(metric.kind, MetricKind::ProfitFactor);
                assert_eq!(metric.display_value, "-2.95");
            }
            other => panic!("unexpected tile: {other:?}"),
        }
        match &layout.rows[2][0] {
            Tile::Calendar(month) => {
                assert_eq!((month.year, month.month), (2024, 3));
                assert_eq!(month.summary.net_pnl, dec!(490));
            }
            other => panic!("unexpected tile: {other:?}"),
        }

        let table = format_dashboard_table(&layout);
        assert!(table.contains("Daily Net Cumulative P&L (area)"));
        assert!(table.contains("Net Daily P&L (histogram)"));
        assert!(table.contains("March 2024"));
    }

    #[tokio::test]
    async fn test_dashboard_degrades_on_failure() {
        let source = FixedSource::new(None);

        let (layout, notes) = build_dashboard(source, Some((2024, 2))).await.unwrap();

        assert_eq!(notes.len(), 4);
        assert!(notes[0].starts_with("[summary] data unavailable"));
        assert_eq!(layout.tiles().count(), 8);
        match &layout.rows[2][0] {
            Tile::Calendar(month) => {
                assert_eq!(month.month, 2);
                assert_eq!(month.summary.green_days, 0);
            }
            other => panic!("unexpected tile: {other:?}"),
        }
    }
}
