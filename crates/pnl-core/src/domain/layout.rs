//! 대시보드 그리드 구성.
//!
//! 요약 지표, 차트, 캘린더를 고정된 3행 그리드로 배치합니다.
//!
//! ```text
//! ┌────────┬────────┬────────┬────────┬────────┐
//! │ P&L    │ Winner │ Loser  │ Size   │ PF     │  row 1
//! ├────────┴────────┴──┬─────┴────────┴────────┤
//! │ Cumulative P&L     │ Daily P&L             │  row 2
//! ├────────────────────┴───────────────────────┤
//! │ Calendar                                   │  row 3
//! └────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use super::calendar::CalendarMonth;
use super::metric::DerivedMetric;
use super::series::ChartSeries;

/// 그리드 타일.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tile {
    /// 요약 지표 박스
    Metric(DerivedMetric),
    /// 시계열 차트
    Chart { label: String, series: ChartSeries },
    /// 월 캘린더
    Calendar(CalendarMonth),
}

/// 대시보드 그리드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardLayout {
    pub rows: Vec<Vec<Tile>>,
}

impl DashboardLayout {
    /// 위젯 뷰들을 고정 그리드로 배치합니다.
    ///
    /// 차트는 전달된 순서대로 두 번째 행에 놓입니다.
    pub fn compose(
        metrics: Vec<DerivedMetric>,
        charts: Vec<ChartSeries>,
        calendar: CalendarMonth,
    ) -> Self {
        let metric_row = metrics.into_iter().map(Tile::Metric).collect();

        let chart_row = charts
            .into_iter()
            .map(|series| Tile::Chart {
                label: series.kind.label().to_string(),
                series,
            })
            .collect();

        Self {
            rows: vec![metric_row, chart_row, vec![Tile::Calendar(calendar)]],
        }
    }

    /// 모든 타일을 행 순서대로 순회합니다.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.rows.iter().flatten()
    }
}
