use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The direction of a transaction. The sign of a transaction's value is
/// derived from this alone; amounts are always recorded as non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Income,
}

impl TransactionType {
    /// Applies the sign convention: expenses are negative, income is positive.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Expense => -amount,
            TransactionType::Income => amount,
        }
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" => Ok(TransactionType::Expense),
            "income" => Ok(TransactionType::Income),
            other => Err(CoreError::InvalidInput(
                "type".to_string(),
                format!("expected \"expense\" or \"income\", got \"{}\"", other),
            )),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::Expense => write!(f, "expense"),
            TransactionType::Income => write!(f, "income"),
        }
    }
}

/// The unit a series is bucketed into before trend fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Month,
}

impl Period {
    /// Returns the date that identifies the bucket `date` falls into.
    /// Days are their own bucket; months are keyed by their first day.
    pub fn bucket(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Period::Day => date,
            Period::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Returns the bucket `steps` periods after `start`, or `None` on calendar overflow.
    pub fn advance(&self, start: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Period::Day => start.checked_add_days(Days::new(u64::from(steps))),
            Period::Month => start.checked_add_months(Months::new(steps)),
        }
    }

    /// Converts a horizon expressed in days into a number of whole periods.
    /// A partial month counts as a full one.
    pub fn periods_in_days(&self, days: usize) -> usize {
        match self {
            Period::Day => days,
            Period::Month => days.div_ceil(30),
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" => Ok(Period::Day),
            "month" | "monthly" => Ok(Period::Month),
            other => Err(CoreError::InvalidInput(
                "period".to_string(),
                format!("expected \"day\" or \"month\", got \"{}\"", other),
            )),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => write!(f, "day"),
            Period::Month => write!(f, "month"),
        }
    }
}
