//! 시계열 차트 데이터 출력.

use std::sync::Arc;

use anyhow::Result;
use pnl_client::{mount, ChartWidget, ReportSource};
use pnl_core::{ChartSeries, DecimalExt, PointColor, SeriesKind, SeriesStyle};
use tracing::info;

use super::{format_json, status_note, OutputFormat};

/// 차트 출력 설정.
#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    /// 시리즈 종류
    pub kind: SeriesKind,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 차트 위젯을 마운트하고 결과를 출력 문자열로 만듭니다.
pub async fn run_chart(source: Arc<dyn ReportSource>, config: ChartConfig) -> Result<String> {
    let mut widget = mount(ChartWidget::new(config.kind), source);
    let state = widget.settled().await;

    info!(kind = %config.kind, points = state.view.points.len(), "Chart series ready");

    match config.format {
        OutputFormat::Json => format_json(&state.view),
        OutputFormat::Table => {
            let mut output = format_chart_table(&state.view);
            if let Some(note) = status_note(&config.kind.to_string(), &state) {
                output.push('\n');
                output.push_str(&note);
            }
            Ok(output)
        }
    }
}

fn style_name(style: SeriesStyle) -> &'static str {
    match style {
        SeriesStyle::Area => "area",
        SeriesStyle::Histogram => "histogram",
    }
}

fn color_name(color: PointColor) -> &'static str {
    match color {
        PointColor::Gain => "gain",
        PointColor::Loss => "loss",
    }
}

/// 테이블 형식 출력.
pub fn format_chart_table(series: &ChartSeries) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({})\n",
        series.kind.label(),
        style_name(series.style)
    ));
    output.push_str(&format!("{:<12} {:>14} {:<6}\n", "DATE", "VALUE", "COLOR"));
    output.push_str(&"-".repeat(34));
    output.push('\n');

    for point in &series.points {
        output.push_str(&format!(
            "{:<12} {:>14} {:<6}\n",
            point.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", point.value.round2()),
            color_name(point.color)
        ));
    }

    // 요약
    output.push('\n');
    match series.value_range() {
        Some((low, high)) => output.push_str(&format!(
            "Points: {}, range: {:.2} ~ {:.2}\n",
            series.points.len(),
            low.round2(),
            high.round2()
        )),
        None => output.push_str("Points: 0\n"),
    }

    output
}
