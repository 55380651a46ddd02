//! 표시용 Decimal 유틸리티.
//!
//! 손익 값은 모두 `Decimal`로 다루며, 화면에는 부호를 떼고 별도의 부호 클래스로 색을 입힙니다.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// 손익 금액 타입.
pub type Amount = Decimal;

/// 값의 부호 분류. 0은 `Positive`입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// 값의 부호를 분류합니다.
    pub fn of(value: Decimal) -> Self {
        if value < Decimal::ZERO {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    /// 스타일 클래스 이름.
    pub fn class_name(&self) -> &'static str {
        match self {
            Sign::Positive => "positive",
            Sign::Negative => "negative",
        }
    }
}

/// Decimal 표시 연산을 위한 확장 트레이트.
pub trait DecimalExt {
    /// 소수점 둘째 자리로 반올림합니다 (`round(x * 100) / 100`).
    ///
    /// 중간값은 양의 무한대 방향으로 올립니다 (`-2.345` → `-2.34`, `2.345` → `2.35`).
    fn round2(&self) -> Decimal;

    /// 부호를 뗀 통화 문자열 (예: `-1234.5` → `"$1,234.50"`).
    fn to_currency_string(&self) -> String;
}

impl DecimalExt for Decimal {
    fn round2(&self) -> Decimal {
        let half = Decimal::new(5, 1);
        self.checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_add(half))
            .map(|shifted| shifted.floor() / Decimal::ONE_HUNDRED)
            // 100배 하면 넘치는 크기에서는 소수부가 의미 없음
            .unwrap_or_else(|| self.round_dp_with_strategy(2, RoundingStrategy::ToPositiveInfinity))
    }

    fn to_currency_string(&self) -> String {
        format!("${}", group_thousands(&format!("{:.2}", self.abs().round2())))
    }
}

/// `"1234567.89"` → `"1,234,567.89"`.
fn group_thousands(plain: &str) -> String {
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}
