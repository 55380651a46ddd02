//! 캘린더 셀 분류.
//!
//! 화면에 보이는 날짜마다 호출되어 해당 일의 손익 부호로 배경색을 정합니다.
//! 월 그리드는 일요일 시작 6주(42칸)입니다.

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::report::DailyValues;
use crate::error::{PnlError, PnlResult};
use crate::types::{iso_date_key, wire_date_key};

/// 월 그리드 칸 수 (7일 × 6주).
pub const MONTH_GRID_CELLS: usize = 42;

/// 셀 배경색.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellColor {
    Gain,
    Loss,
    Neutral,
}

impl CellColor {
    /// 손익 값의 배경색. 0은 `Neutral`입니다.
    pub fn of(pnl: Decimal) -> Self {
        if pnl > Decimal::ZERO {
            CellColor::Gain
        } else if pnl < Decimal::ZERO {
            CellColor::Loss
        } else {
            CellColor::Neutral
        }
    }

    /// CSS 색상 값.
    pub fn css(&self) -> &'static str {
        match self {
            CellColor::Gain => "#59C0A4",
            CellColor::Loss => "#F6BFBE",
            CellColor::Neutral => "transparent",
        }
    }
}

/// 캘린더 셀 스타일.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCellStyle {
    pub date: NaiveDate,
    pub background: CellColor,
    /// 0이 아닌 날에만 표시하는 손익 값
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl_label: Option<Decimal>,
}

/// 날짜 하나의 셀 스타일을 계산합니다.
///
/// `MM/DD/YYYY` 키로 조회하고, 없으면 ISO 키로 한 번 더 조회합니다. 둘 다 없으면 0입니다.
pub fn classify_day(date: NaiveDate, pnl_by_day: &DailyValues) -> CalendarCellStyle {
    let pnl = pnl_by_day
        .get(&wire_date_key(date))
        .or_else(|| pnl_by_day.get(&iso_date_key(date)))
        .copied()
        .unwrap_or(Decimal::ZERO);

    CalendarCellStyle {
        date,
        background: CellColor::of(pnl),
        pnl_label: (!pnl.is_zero()).then_some(pnl),
    }
}

/// 월 보기에 표시되는 42일을 반환합니다.
///
/// 해당 월 1일이 속한 주의 일요일부터 시작합니다.
pub fn month_grid(year: i32, month: u32) -> PnlResult<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| PnlError::InvalidDate(format!("{:04}-{:02}", year, month)))?;
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));

    Ok(start.iter_days().take(MONTH_GRID_CELLS).collect())
}

/// 월 그리드의 한 칸.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    #[serde(flatten)]
    pub style: CalendarCellStyle,
    /// 보고 있는 월에 속한 날인지 여부
    pub in_month: bool,
}

/// 월 요약.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// 월 순손익
    pub net_pnl: Decimal,
    /// 수익일 수
    pub green_days: usize,
    /// 손실일 수
    pub red_days: usize,
    /// 최대 수익일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_day: Option<NaiveDate>,
    /// 최대 손실일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worst_day: Option<NaiveDate>,
}

/// 한 달 캘린더 뷰.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
    pub summary: MonthSummary,
}

impl CalendarMonth {
    /// 월 그리드의 모든 칸을 분류하고 월 요약을 계산합니다.
    pub fn build(year: i32, month: u32, pnl_by_day: &DailyValues) -> PnlResult<Self> {
        let cells: Vec<CalendarCell> = month_grid(year, month)?
            .into_iter()
            .map(|date| CalendarCell {
                style: classify_day(date, pnl_by_day),
                in_month: date.month() == month,
            })
            .collect();

        let summary = summarize_month(&cells);

        Ok(Self {
            year,
            month,
            cells,
            summary,
        })
    }

    /// 주 단위로 나눈 칸.
    pub fn weeks(&self) -> impl Iterator<Item = &[CalendarCell]> {
        self.cells.chunks(7)
    }
}

fn summarize_month(cells: &[CalendarCell]) -> MonthSummary {
    let mut summary = MonthSummary::default();
    let mut best: Option<(NaiveDate, Decimal)> = None;
    let mut worst: Option<(NaiveDate, Decimal)> = None;

    for cell in cells.iter().filter(|c| c.in_month) {
        let Some(pnl) = cell.style.pnl_label else {
            continue;
        };

        summary.net_pnl += pnl;
        match cell.style.background {
            CellColor::Gain => summary.green_days += 1,
            CellColor::Loss => summary.red_days += 1,
            CellColor::Neutral => {}
        }

        if pnl > Decimal::ZERO && best.map_or(true, |(_, b)| pnl > b) {
            best = Some((cell.style.date, pnl));
        }
        if pnl < Decimal::ZERO && worst.map_or(true, |(_, w)| pnl < w) {
            worst = Some((cell.style.date, pnl));
        }
    }

    summary.best_day = best.map(|(d, _)| d);
    summary.worst_day = worst.map(|(d, _)| d);
    summary
}
