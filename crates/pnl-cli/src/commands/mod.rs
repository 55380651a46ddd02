//! CLI 명령어 구현 모듈.

pub mod calendar;
pub mod chart;
pub mod dashboard;
pub mod summary;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use pnl_client::{LoadStatus, WidgetState};
use pnl_core::{parse_date_key, DailyValues};
use serde::Serialize;
use tracing::warn;

/// 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(anyhow::anyhow!("Invalid format: {}. Use: table, json", s)),
        }
    }
}

/// `YYYY-MM` 형식의 월을 파싱합니다.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month: {}. Use YYYY-MM", s))?;
    Ok((first.year(), first.month()))
}

/// 표시할 월을 결정합니다.
///
/// 지정된 월이 없으면 데이터의 마지막 날짜가 속한 월, 데이터도 없으면 이번 달입니다.
pub fn resolve_month(requested: Option<(i32, u32)>, pnl_by_day: &DailyValues) -> (i32, u32) {
    if let Some(month) = requested {
        return month;
    }

    let latest = pnl_by_day
        .keys()
        .filter_map(|key| parse_date_key(key).ok())
        .max()
        .unwrap_or_else(|| Local::now().date_naive());

    (latest.year(), latest.month())
}

/// 실패한 위젯이면 경고 문구를 반환합니다.
///
/// 실패해도 위젯은 초기 뷰를 유지하므로 출력은 계속합니다.
pub(crate) fn status_note<V>(name: &str, state: &WidgetState<V>) -> Option<String> {
    match &state.status {
        LoadStatus::Loaded => None,
        LoadStatus::Failed(reason) => {
            warn!(widget = name, "Rendering default view after failed load");
            Some(format!("[{}] data unavailable: {}", name, reason))
        }
        LoadStatus::Pending | LoadStatus::Cancelled => {
            Some(format!("[{}] data not loaded", name))
        }
    }
}

/// JSON 형식 출력.
pub(crate) fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize to JSON")
}
