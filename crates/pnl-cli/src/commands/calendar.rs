//! 월 캘린더 출력.

use std::sync::Arc;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use pnl_client::{mount, CalendarWidget, ReportSource};
use pnl_core::{CalendarCell, CalendarMonth, DecimalExt, Sign};
use rust_decimal::Decimal;
use tracing::info;

use super::{format_json, resolve_month, status_note, OutputFormat};

const CELL_WIDTH: usize = 11;
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// 캘린더 출력 설정.
#[derive(Debug, Clone, Copy)]
pub struct CalendarConfig {
    /// 표시할 월 (없으면 데이터의 마지막 월)
    pub month: Option<(i32, u32)>,
    /// 출력 형식
    pub format: OutputFormat,
}

/// 캘린더 위젯을 마운트하고 결과를 출력 문자열로 만듭니다.
pub async fn run_calendar(source: Arc<dyn ReportSource>, config: CalendarConfig) -> Result<String> {
    let mut widget = mount(CalendarWidget, source);
    let state = widget.settled().await;

    let (year, month) = resolve_month(config.month, &state.view);
    let calendar = CalendarWidget::month(&state.view, year, month)?;

    info!(
        year,
        month,
        green_days = calendar.summary.green_days,
        red_days = calendar.summary.red_days,
        "Calendar ready"
    );

    match config.format {
        OutputFormat::Json => format_json(&calendar),
        OutputFormat::Table => {
            let mut output = format_calendar_table(&calendar);
            if let Some(note) = status_note("calendar", &state) {
                output.push('\n');
                output.push_str(&note);
            }
            Ok(output)
        }
    }
}

fn signed_label(pnl: Decimal) -> String {
    if pnl > Decimal::ZERO {
        format!("+{:.2}", pnl.round2())
    } else {
        format!("{:.2}", pnl.round2())
    }
}

fn cell_text(cell: &CalendarCell) -> String {
    if !cell.in_month {
        return " ".repeat(CELL_WIDTH);
    }

    let label = cell.style.pnl_label.map(signed_label).unwrap_or_default();
    format!(
        "{:>2} {:>width$}",
        cell.style.date.day(),
        label,
        width = CELL_WIDTH - 3
    )
}

/// 테이블 형식 출력.
pub fn format_calendar_table(calendar: &CalendarMonth) -> String {
    let mut output = String::new();

    let title = NaiveDate::from_ymd_opt(calendar.year, calendar.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", calendar.year, calendar.month));
    output.push_str(&title);
    output.push('\n');

    let header: Vec<String> = WEEKDAYS
        .iter()
        .map(|d| format!("{:>width$}", d, width = CELL_WIDTH))
        .collect();
    output.push_str(header.join(" ").trim_end());
    output.push('\n');
    output.push_str(&"-".repeat(CELL_WIDTH * 7 + 6));
    output.push('\n');

    for week in calendar.weeks() {
        let row: Vec<String> = week.iter().map(cell_text).collect();
        output.push_str(row.join(" ").trim_end());
        output.push('\n');
    }

    // 요약
    let summary = &calendar.summary;
    output.push('\n');
    output.push_str(&format!(
        "Net: {}{} | Green days: {} | Red days: {}",
        if Sign::of(summary.net_pnl) == Sign::Negative {
            "-"
        } else {
            ""
        },
        summary.net_pnl.to_currency_string(),
        summary.green_days,
        summary.red_days
    ));
    if let Some(best) = summary.best_day {
        output.push_str(&format!(" | Best: {}", best));
    }
    if let Some(worst) = summary.worst_day {
        output.push_str(&format!(" | Worst: {}", worst));
    }
    output.push('\n');

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pnl_core::DailyValues;
    use rust_decimal_macros::dec;

    fn march() -> CalendarMonth {
        let mut values = DailyValues::new();
        values.insert("03/01/2024".to_string(), dec!(-100));
        values.insert("03/02/2024".to_string(), dec!(400));
        values.insert("2024-03-04".to_string(), dec!(190));
        values.insert("03/05/2024".to_string(), dec!(0));
        CalendarMonth::build(2024, 3, &values).unwrap()
    }

    #[test]
    fn test_table_layout() {
        let table = format_calendar_table(&march());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "March 2024");
        assert!(lines[1].trim_start().starts_with("Sun"));
        // 2024-03-01은 금요일
        assert_eq!(lines[3].trim(), "1  -100.00  2  +400.00");
        assert!(lines[4].contains(" 4  +190.00"));
        assert!(lines[4].contains(" 5 "));
        assert!(!lines[4].contains(" 0.00"));
        assert_eq!(lines.len(), 3 + 6 + 2);
    }

    #[test]
    fn test_summary_line() {
        let table = format_calendar_table(&march());
        let last = table.lines().last().unwrap();
        assert_eq!(
            last,
            "Net: $490.00 | Green days: 2 | Red days: 1 | Best: 2024-03-02 | Worst: 2024-03-01"
        );
    }

    #[test]
    fn test_negative_net() {
        let mut values = DailyValues::new();
        values.insert("04/10/2024".to_string(), dec!(-12.345));
        let table = format_calendar_table(&CalendarMonth::build(2024, 4, &values).unwrap());
        assert!(table.contains("Net: -$12.35"));
        assert!(table.contains(" -12.34"));
    }
}
