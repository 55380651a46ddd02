//! 요약 지표 포매터.
//!
//! 리포트 하나를 요약 행에 표시할 고정 순서의 [`DerivedMetric`] 목록으로 변환합니다.
//!
//! | 순서 | 지표 | 값 | 보조 값 |
//! |---|---|---|---|
//! | 1 | Overall P&L | `Total_PnL` | `Total_Trades` |
//! | 2 | Average Winner | `Average_Winner` | `Average_Winner_Total_Trades` |
//! | 3 | Average Loser | `Average_Loser` | `Average_Loser_Total_Trades` |
//! | 4 | Average Contract Size | `Average_Contract_Size` | `Average_Contract_Size_Change` |
//! | 5 | Profit Factor | `round2(Average_Winner / Average_Loser)` | - |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::report::PnLReport;
use crate::types::{DecimalExt, Sign};

/// 값을 계산할 수 없을 때 표시하는 문자열.
pub const NOT_AVAILABLE: &str = "N/A";

/// 요약 지표 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    OverallPnl,
    AverageWinner,
    AverageLoser,
    AverageContractSize,
    ProfitFactor,
}

impl MetricKind {
    /// 요약 행 표시 순서.
    pub const ORDER: [MetricKind; 5] = [
        MetricKind::OverallPnl,
        MetricKind::AverageWinner,
        MetricKind::AverageLoser,
        MetricKind::AverageContractSize,
        MetricKind::ProfitFactor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::OverallPnl => "Total P&L",
            MetricKind::AverageWinner => "Average winning trade",
            MetricKind::AverageLoser => "Average losing trade",
            MetricKind::AverageContractSize => "Average contract size",
            MetricKind::ProfitFactor => "Profit factor",
        }
    }

    /// 통화로 표시하는 지표인지 여부.
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            MetricKind::OverallPnl | MetricKind::AverageWinner | MetricKind::AverageLoser
        )
    }
}

/// 요약 타일 하나의 뷰 모델.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetric {
    /// 지표 종류
    pub kind: MetricKind,
    /// 표시 레이블
    pub label: String,
    /// 값 (`None`이면 계산 불가, `N/A`로 표시)
    pub value: Option<Decimal>,
    /// 화면 표시 문자열
    pub display_value: String,
    /// 부호 스타일
    pub sign: Sign,
    /// 보조 값 (거래 수, 변화량 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Decimal>,
}

impl DerivedMetric {
    /// 값이 있는 지표를 생성합니다.
    pub fn new(kind: MetricKind, value: Decimal, secondary: Option<Decimal>) -> Self {
        let display_value = if kind.is_monetary() {
            value.to_currency_string()
        } else if kind == MetricKind::ProfitFactor {
            format!("{:.2}", value)
        } else {
            format!("{:.2}", value.abs().round2())
        };

        Self {
            kind,
            label: kind.label().to_string(),
            value: Some(value),
            display_value,
            sign: Sign::of(value),
            secondary,
        }
    }

    /// 계산할 수 없는 지표를 생성합니다.
    pub fn unavailable(kind: MetricKind) -> Self {
        Self {
            kind,
            label: kind.label().to_string(),
            value: None,
            display_value: NOT_AVAILABLE.to_string(),
            sign: Sign::Positive,
            secondary: None,
        }
    }

    /// 보조 값의 부호 스타일.
    pub fn secondary_sign(&self) -> Option<Sign> {
        self.secondary.map(Sign::of)
    }

    /// 보조 값 표시 문자열.
    ///
    /// 거래 수는 정수로, 계약 수 변화량은 부호를 뗀 소수 둘째 자리로 표시합니다.
    pub fn secondary_display(&self) -> Option<String> {
        let secondary = self.secondary?;
        Some(match self.kind {
            MetricKind::OverallPnl => format!("Trades in total: {}", secondary.trunc()),
            MetricKind::AverageWinner | MetricKind::AverageLoser => {
                format!("{} trades", secondary.trunc())
            }
            MetricKind::AverageContractSize => format!("{:.2}", secondary.abs().round2()),
            MetricKind::ProfitFactor => format!("{:.2}", secondary),
        })
    }
}

/// Profit Factor를 계산합니다.
///
/// `Average_Loser`가 0이면 `None`을 반환합니다.
pub fn profit_factor(average_winner: Decimal, average_loser: Decimal) -> Option<Decimal> {
    average_winner.checked_div(average_loser).map(|ratio| ratio.round2())
}

/// 리포트에서 요약 지표 목록을 만듭니다.
pub fn summarize(report: &PnLReport) -> Vec<DerivedMetric> {
    MetricKind::ORDER
        .iter()
        .map(|kind| derive_metric(*kind, report))
        .collect()
}

fn derive_metric(kind: MetricKind, report: &PnLReport) -> DerivedMetric {
    match kind {
        MetricKind::OverallPnl => DerivedMetric::new(
            kind,
            report.total_pnl,
            Some(Decimal::from(report.total_trades)),
        ),
        MetricKind::AverageWinner => DerivedMetric::new(
            kind,
            report.average_winner,
            Some(Decimal::from(report.average_winner_total_trades)),
        ),
        MetricKind::AverageLoser => DerivedMetric::new(
            kind,
            report.average_loser,
            Some(Decimal::from(report.average_loser_total_trades)),
        ),
        MetricKind::AverageContractSize => DerivedMetric::new(
            kind,
            report.average_contract_size,
            Some(report.average_contract_size_change),
        ),
        MetricKind::ProfitFactor => {
            match profit_factor(report.average_winner, report.average_loser) {
                Some(value) => DerivedMetric::new(kind, value, None),
                None => {
                    tracing::debug!(
                        average_winner = %report.average_winner,
                        "Profit factor unavailable: average loser is zero"
                    );
                    DerivedMetric::unavailable(kind)
                }
            }
        }
    }
}
