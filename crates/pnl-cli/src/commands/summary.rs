//! 요약 지표 출력.

use std::sync::Arc;

use anyhow::Result;
use pnl_client::{mount, ReportSource, SummaryWidget};
use pnl_core::DerivedMetric;
use tracing::info;

use super::{format_json, status_note, OutputFormat};

/// 요약 위젯을 마운트하고 결과를 출력 문자열로 만듭니다.
pub async fn run_summary(source: Arc<dyn ReportSource>, format: OutputFormat) -> Result<String> {
    let mut widget = mount(SummaryWidget, source);
    let state = widget.settled().await;

    info!(metrics = state.view.len(), "Summary ready");

    match format {
        OutputFormat::Json => format_json(&state.view),
        OutputFormat::Table => {
            let mut output = format_summary_table(&state.view);
            if let Some(note) = status_note("summary", &state) {
                output.push('\n');
                output.push_str(&note);
            }
            Ok(output)
        }
    }
}

/// 테이블 형식 출력.
pub fn format_summary_table(metrics: &[DerivedMetric]) -> String {
    let mut output = String::new();

    // 헤더
    output.push_str(&format!(
        "{:<24} {:>14} {:<9} {}\n",
        "METRIC", "VALUE", "SIGN", "DETAIL"
    ));
    output.push_str(&"-".repeat(72));
    output.push('\n');

    for metric in metrics {
        output.push_str(&format!(
            "{:<24} {:>14} {:<9} {}\n",
            metric.label,
            metric.display_value,
            metric.sign.class_name(),
            metric.secondary_display().unwrap_or_default()
        ));
    }

    output
}
