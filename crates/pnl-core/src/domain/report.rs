//! `/api/pnl` 응답 리포트.
//!
//! 필드 이름은 백엔드가 보내는 키를 그대로 따릅니다. 누락된 필드는 0 또는 빈 맵으로
//! 채워지며, 어떤 필드가 빠졌는지는 [`PnLReport::missing_fields`]로 확인합니다.

use std::collections::BTreeMap;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use super::series::SeriesKind;

/// 날짜 키 → 손익 값 맵.
pub type DailyValues = BTreeMap<String, Decimal>;

/// 손익 통계 리포트.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PnLReport {
    /// 전체 손익
    #[serde(rename = "Total_PnL")]
    pub total_pnl: Decimal,
    /// 전체 거래 수
    #[serde(rename = "Total_Trades", deserialize_with = "deserialize_count")]
    pub total_trades: u64,
    /// 평균 수익 거래
    #[serde(rename = "Average_Winner")]
    pub average_winner: Decimal,
    /// 수익 거래 수
    #[serde(rename = "Average_Winner_Total_Trades", deserialize_with = "deserialize_count")]
    pub average_winner_total_trades: u64,
    /// 평균 손실 거래 (음수)
    #[serde(rename = "Average_Loser")]
    pub average_loser: Decimal,
    /// 손실 거래 수
    #[serde(rename = "Average_Loser_Total_Trades", deserialize_with = "deserialize_count")]
    pub average_loser_total_trades: u64,
    /// 평균 계약 수
    #[serde(rename = "Average_Contract_Size")]
    pub average_contract_size: Decimal,
    /// 평균 계약 수 변화량
    #[serde(rename = "Average_Contract_Size_Change")]
    pub average_contract_size_change: Decimal,
    /// 누적 손익 (날짜 키)
    #[serde(rename = "Cumulative_PnL")]
    pub cumulative_pnl: DailyValues,
    /// 일별 손익 (날짜 키)
    #[serde(rename = "PnL_By_Day")]
    pub pnl_by_day: DailyValues,
}

/// 거래 수 필드. `12`와 `12.0` 모두 받아들입니다.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = <Decimal as Deserialize>::deserialize(deserializer)?;
    if !value.fract().is_zero() {
        return Err(de::Error::custom(format!(
            "expected a whole trade count, got {}",
            value
        )));
    }
    value
        .to_u64()
        .ok_or_else(|| de::Error::custom(format!("trade count out of range: {}", value)))
}

impl PnLReport {
    /// 응답 계약에 정의된 모든 필드 이름.
    pub const FIELD_NAMES: [&'static str; 10] = [
        "Total_PnL",
        "Total_Trades",
        "Average_Winner",
        "Average_Winner_Total_Trades",
        "Average_Loser",
        "Average_Loser_Total_Trades",
        "Average_Contract_Size",
        "Average_Contract_Size_Change",
        "Cumulative_PnL",
        "PnL_By_Day",
    ];

    /// 응답 본문에서 빠진 필드 이름을 반환합니다.
    ///
    /// 본문이 객체가 아니면 모든 필드가 빠진 것으로 봅니다.
    pub fn missing_fields(body: &serde_json::Value) -> Vec<&'static str> {
        let Some(object) = body.as_object() else {
            return Self::FIELD_NAMES.to_vec();
        };

        Self::FIELD_NAMES
            .iter()
            .copied()
            .filter(|name| !object.contains_key(*name))
            .collect()
    }

    /// 시리즈 종류에 해당하는 날짜별 맵.
    pub fn series(&self, kind: SeriesKind) -> &DailyValues {
        match kind {
            SeriesKind::Cumulative => &self.cumulative_pnl,
            SeriesKind::ByDay => &self.pnl_by_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_deserialize_full_report() {
        let body = json!({
            "Total_PnL": 1234.56,
            "Total_Trades": 42,
            "Average_Winner": 300,
            "Average_Winner_Total_Trades": 25,
            "Average_Loser": -150,
            "Average_Loser_Total_Trades": 17,
            "Average_Contract_Size": 3.5,
            "Average_Contract_Size_Change": -0.25,
            "Cumulative_PnL": {"01/02/2024": 100, "01/03/2024": 50},
            "PnL_By_Day": {"01/02/2024": 100, "01/03/2024": -50}
        });

        let report: PnLReport = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(report.total_pnl, dec!(1234.56));
        assert_eq!(report.total_trades, 42);
        assert_eq!(report.average_loser, dec!(-150));
        assert_eq!(report.average_contract_size_change, dec!(-0.25));
        assert_eq!(report.pnl_by_day["01/03/2024"], dec!(-50));
        assert!(PnLReport::missing_fields(&body).is_empty());
    }

    #[test]
    fn test_partial_report_defaults_missing_fields() {
        // 백엔드가 세 필드만 보내는 경우
        let body = json!({
            "Total_PnL": -20.5,
            "PnL_By_Day": {"03/05/2024": -10},
            "Cumulative_PnL": {}
        });

        let report: PnLReport = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(report.total_pnl, dec!(-20.5));
        assert_eq!(report.total_trades, 0);
        assert_eq!(report.average_winner, Decimal::ZERO);
        assert!(report.cumulative_pnl.is_empty());

        let missing = PnLReport::missing_fields(&body);
        assert_eq!(missing.len(), 7);
        assert!(missing.contains(&"Average_Loser"));
        assert!(!missing.contains(&"PnL_By_Day"));
    }

    #[test]
    fn test_float_trade_counts_accepted() {
        let body = json!({
            "Total_PnL": 5,
            "Total_Trades": 12.0,
            "Average_Winner_Total_Trades": 7,
            "Average_Loser_Total_Trades": 5.0,
            "PnL_By_Day": {"03/05/2024": -10}
        });

        let report: PnLReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.total_trades, 12);
        assert_eq!(report.average_winner_total_trades, 7);
        assert_eq!(report.average_loser_total_trades, 5);
        assert_eq!(report.pnl_by_day.len(), 1);
    }

    #[test]
    fn test_fractional_or_negative_trade_count_rejected() {
        assert!(serde_json::from_value::<PnLReport>(json!({"Total_Trades": 12.5})).is_err());
        assert!(serde_json::from_value::<PnLReport>(json!({"Total_Trades": -1})).is_err());
    }

    #[test]
    fn test_missing_fields_of_non_object() {
        assert_eq!(PnLReport::missing_fields(&json!([1, 2])).len(), 10);
    }

    #[test]
    fn test_series_selector() {
        let mut report = PnLReport::default();
        report.pnl_by_day.insert("01/02/2024".to_string(), dec!(5));

        assert_eq!(report.series(SeriesKind::ByDay).len(), 1);
        assert!(report.series(SeriesKind::Cumulative).is_empty());
    }
}
