//! 차트 시리즈 변환.
//!
//! 날짜 키 맵을 날짜 오름차순의 [`SeriesPoint`] 목록으로 바꿉니다.
//! 백엔드가 보내는 키 순서에 의존하지 않고 파싱한 날짜로 다시 정렬합니다.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::report::DailyValues;
use crate::error::PnlError;
use crate::types::parse_date_key;

/// 시리즈 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    /// 누적 손익 (연속 영역 차트)
    Cumulative,
    /// 일별 손익 (막대 히스토그램)
    ByDay,
}

impl SeriesKind {
    /// 응답 필드 이름이자 `type` 쿼리 파라미터 값.
    pub fn field_name(&self) -> &'static str {
        match self {
            SeriesKind::Cumulative => "Cumulative_PnL",
            SeriesKind::ByDay => "PnL_By_Day",
        }
    }

    /// 차트 렌더링 스타일.
    pub fn style(&self) -> SeriesStyle {
        match self {
            SeriesKind::Cumulative => SeriesStyle::Area,
            SeriesKind::ByDay => SeriesStyle::Histogram,
        }
    }

    /// 대시보드 타일 레이블.
    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Cumulative => "Daily Net Cumulative P&L",
            SeriesKind::ByDay => "Net Daily P&L",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Cumulative => write!(f, "cumulative"),
            SeriesKind::ByDay => write!(f, "by_day"),
        }
    }
}

impl FromStr for SeriesKind {
    type Err = PnlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cumulative_PnL" => return Ok(SeriesKind::Cumulative),
            "PnL_By_Day" => return Ok(SeriesKind::ByDay),
            _ => {}
        }

        match s.to_lowercase().replace('-', "_").as_str() {
            "cumulative" => Ok(SeriesKind::Cumulative),
            "by_day" | "daily" => Ok(SeriesKind::ByDay),
            _ => Err(PnlError::InvalidInput(format!(
                "Unknown series kind: {}. Use: cumulative, by_day",
                s
            ))),
        }
    }
}

/// 차트 렌더링 스타일.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesStyle {
    /// 0 기준선 위/아래를 구분하는 연속 영역
    Area,
    /// 개별 색상의 막대
    Histogram,
}

/// 포인트 색상.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointColor {
    Gain,
    Loss,
}

impl PointColor {
    /// 값의 색상을 분류합니다. 0은 `Gain`입니다.
    pub fn of(value: Decimal) -> Self {
        if value >= Decimal::ZERO {
            PointColor::Gain
        } else {
            PointColor::Loss
        }
    }
}

/// 시리즈 데이터 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// 날짜 (`YYYY-MM-DD`로 직렬화)
    pub date: NaiveDate,
    /// 값
    pub value: Decimal,
    /// 색상
    pub color: PointColor,
}

/// 차트 하나에 들어갈 시리즈.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    pub style: SeriesStyle,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    /// 빈 시리즈.
    pub fn empty(kind: SeriesKind) -> Self {
        Self {
            kind,
            style: kind.style(),
            points: Vec::new(),
        }
    }

    /// 날짜 키 맵에서 시리즈를 만듭니다.
    pub fn from_values(kind: SeriesKind, values: &DailyValues) -> Self {
        Self {
            kind,
            style: kind.style(),
            points: shape_series(values),
        }
    }

    /// 값의 범위 (최소, 최대). 빈 시리즈면 `None`.
    pub fn value_range(&self) -> Option<(Decimal, Decimal)> {
        let first = self.points.first()?.value;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (lo.min(p.value), hi.max(p.value))
        }))
    }
}

/// 날짜 키 맵을 날짜 오름차순 포인트 목록으로 변환합니다.
///
/// 파싱할 수 없는 키는 경고 로그를 남기고 건너뜁니다. 같은 날짜로 파싱되는 키들은
/// 맵의 키 문자열 순서를 유지합니다.
pub fn shape_series(values: &DailyValues) -> Vec<SeriesPoint> {
    let mut points: Vec<SeriesPoint> = values
        .iter()
        .filter_map(|(key, value)| match parse_date_key(key) {
            Ok(date) => Some(SeriesPoint {
                date,
                value: *value,
                color: PointColor::of(*value),
            }),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Skipping series point with bad date key");
                None
            }
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}
