use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ledger row recovered from a single statement line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    /// Statement-local `MM/DD`; rows never print the year.
    pub date: String,
    pub description: String,
    /// Negative means outflow (spend); positive means deposit or refund.
    pub amount: Decimal,
    /// Running balance after this row, when the layout carries one.
    pub balance: Option<Decimal>,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: Decimal,
        balance: Option<Decimal>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            balance,
        }
    }

    /// Returns true for outflows only; zero is not spend.
    pub fn is_spend(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Absolute spend for outflows, `None` for deposits.
    pub fn spend(&self) -> Option<Decimal> {
        self.is_spend().then(|| self.amount.abs())
    }

    /// Resolve the `MM/DD` date against a statement year.
    pub fn date_in_year(&self, year: i32) -> Option<NaiveDate> {
        let mut it = self.date.get(..5)?.split('/');
        let m: u32 = it.next()?.parse().ok()?;
        let d: u32 = it.next()?.parse().ok()?;
        NaiveDate::from_ymd_opt(year, m, d)
    }
}
