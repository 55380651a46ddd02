//! 날짜 키 처리.
//!
//! 백엔드는 `MM/DD/YYYY` 형식의 날짜 키를 보냅니다. ISO `YYYY-MM-DD` 키도 받아들이며,
//! 크레이트 내부에서는 항상 `NaiveDate`로 다룹니다.

use chrono::NaiveDate;

use crate::error::{PnlError, PnlResult};

/// 백엔드 응답의 날짜 키 형식.
pub const WIRE_DATE_FORMAT: &str = "%m/%d/%Y";

/// 차트 시리즈의 정규 날짜 형식.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 날짜 키를 파싱합니다.
///
/// `MM/DD/YYYY`를 먼저 시도하고, 실패하면 `YYYY-MM-DD`를 시도합니다.
/// 앞뒤 공백과 시각 부분(`"08/28/2023 13:58:39 EDT"`, `"2024-01-01T00:00:00Z"`)은
/// 무시하고, 키에 적힌 날짜를 그대로 사용합니다.
pub fn parse_date_key(key: &str) -> PnlResult<NaiveDate> {
    let date_part = key
        .trim()
        .split(|c: char| c.is_whitespace() || c == 'T')
        .next()
        .unwrap_or_default();

    NaiveDate::parse_from_str(date_part, WIRE_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT))
        .map_err(|_| PnlError::InvalidDate(key.to_string()))
}

/// 캘린더 조회용 키 (`MM/DD/YYYY`).
pub fn wire_date_key(date: NaiveDate) -> String {
    date.format(WIRE_DATE_FORMAT).to_string()
}

/// 차트용 정규 키 (`YYYY-MM-DD`).
pub fn iso_date_key(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
