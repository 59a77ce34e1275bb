use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::enums::TransactionType;
use crate::error::CoreError;

/// A transaction exactly as a caller submitted it.
///
/// Every field is optional and loosely typed so that a malformed record is
/// reported as invalid input by the normalizer instead of failing the whole
/// request body at deserialization time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// A JSON number or numeric string. `cost` is accepted for older clients.
    #[serde(default, alias = "cost")]
    pub amount: Option<Value>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl RawTransaction {
    /// Validates every field and produces a strongly-typed `Transaction`.
    pub fn validate(&self) -> Result<Transaction, CoreError> {
        let amount = match &self.amount {
            None | Some(Value::Null) => {
                return Err(CoreError::InvalidInput("amount".to_string(), "missing".to_string()));
            }
            Some(value) => parse_amount(value)?,
        };

        let kind = match self.kind.as_deref() {
            None => {
                return Err(CoreError::InvalidInput("type".to_string(), "missing".to_string()));
            }
            Some(kind) => TransactionType::from_str(kind)?,
        };

        let date = match self.date.as_deref() {
            None => {
                return Err(CoreError::InvalidInput("date".to_string(), "missing".to_string()));
            }
            Some(date) => parse_transaction_date(date)?,
        };

        let mut transaction = Transaction::new(amount, kind, date)?;
        transaction.description = self.description.clone();
        transaction.category = self.category.clone();
        Ok(transaction)
    }
}

/// A validated income or expense record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    /// Creates a transaction, rejecting negative amounts.
    pub fn new(amount: Decimal, kind: TransactionType, date: NaiveDate) -> Result<Self, CoreError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(CoreError::InvalidInput(
                "amount".to_string(),
                format!("must not be negative, got {}", amount),
            ));
        }
        Ok(Self {
            amount,
            kind,
            date,
            description: None,
            category: None,
        })
    }

    /// The amount with the sign implied by the transaction type.
    pub fn signed_value(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    pub fn to_signed(&self) -> SignedRecord {
        SignedRecord {
            value: self.signed_value(),
            date: self.date,
        }
    }
}

/// A transaction reduced to its signed value and calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedRecord {
    pub value: Decimal,
    pub date: NaiveDate,
}

/// The net signed value of every record falling into one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatePoint {
    pub date: NaiveDate,
    pub net_value: Decimal,
}

/// Parses a transaction date.
///
/// Accepts a plain `YYYY-MM-DD` date, or a date-time whose date part is
/// followed by a space or `T`. The time of day is discarded.
pub fn parse_transaction_date(input: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = input.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        CoreError::InvalidInput("date".to_string(), format!("cannot parse \"{}\": {}", input, e))
    })
}

fn parse_amount(value: &Value) -> Result<Decimal, CoreError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(CoreError::InvalidInput(
                "amount".to_string(),
                format!("expected a number, got {}", other),
            ));
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            CoreError::InvalidInput("amount".to_string(), format!("\"{}\" is not numeric", text))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw(value: Value) -> RawTransaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn validates_a_complete_record() {
        let txn = raw(json!({
            "amount": 12.5,
            "type": "expense",
            "date": "2024-03-05",
            "category": "food"
        }))
        .validate()
        .unwrap();

        assert_eq!(txn.amount, dec!(12.5));
        assert_eq!(txn.kind, TransactionType::Expense);
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(txn.category.as_deref(), Some("food"));
        assert_eq!(txn.signed_value(), dec!(-12.5));
    }

    #[test]
    fn accepts_legacy_cost_and_numeric_strings() {
        let txn = raw(json!({"cost": "40.10", "type": "income", "date": "2024-03-05 14:22:01"}))
            .validate()
            .unwrap();
        assert_eq!(txn.amount, dec!(40.10));
        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn rejects_missing_and_malformed_fields() {
        assert!(raw(json!({"type": "income", "date": "2024-01-01"})).validate().is_err());
        assert!(raw(json!({"amount": 1, "date": "2024-01-01"})).validate().is_err());
        assert!(raw(json!({"amount": 1, "type": "income"})).validate().is_err());
        assert!(raw(json!({"amount": -1, "type": "income", "date": "2024-01-01"})).validate().is_err());
        assert!(raw(json!({"amount": "ten", "type": "income", "date": "2024-01-01"})).validate().is_err());
        assert!(raw(json!({"amount": true, "type": "income", "date": "2024-01-01"})).validate().is_err());
        assert!(raw(json!({"amount": 1, "type": "income", "date": "01/02/2024"})).validate().is_err());
        assert!(raw(json!({"amount": 1, "type": "income", "date": "2024-02-30"})).validate().is_err());
    }

    #[test]
    fn parses_scientific_amounts() {
        let txn = raw(json!({"amount": 1e3, "type": "income", "date": "2024-01-01"}))
            .validate()
            .unwrap();
        assert_eq!(txn.amount, dec!(1000));
    }

    #[test]
    fn date_time_forms_keep_the_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(parse_transaction_date("2024-06-01").unwrap(), expected);
        assert_eq!(parse_transaction_date("2024-06-01T08:00:00Z").unwrap(), expected);
        assert_eq!(parse_transaction_date(" 2024-06-01 23:59 ").unwrap(), expected);
        assert!(parse_transaction_date("").is_err());
    }
}
