use core_types::{RawTransaction, SignedRecord, Transaction};

use crate::error::AnalyticsError;

/// Validates submitted transactions and converts them to signed records.
///
/// The output preserves input order. The first invalid record fails the whole
/// batch; the error names its zero-based position.
pub fn normalize(transactions: &[RawTransaction]) -> Result<Vec<SignedRecord>, AnalyticsError> {
    let records = transactions
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.validate().map(|txn| txn.to_signed()).map_err(|e| {
                tracing::warn!(index, error = %e, "Rejected transaction.");
                AnalyticsError::InvalidInput(format!("transaction {}: {}", index, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(records = records.len(), "Normalized transactions.");
    Ok(records)
}

/// Converts already-typed transactions. Only the non-negative amount rule can fail here.
pub fn normalize_typed(transactions: &[Transaction]) -> Result<Vec<SignedRecord>, AnalyticsError> {
    transactions
        .iter()
        .enumerate()
        .map(|(index, txn)| {
            if txn.amount.is_sign_negative() && !txn.amount.is_zero() {
                return Err(AnalyticsError::InvalidInput(format!(
                    "transaction {}: amount must not be negative, got {}",
                    index, txn.amount
                )));
            }
            Ok(txn.to_signed())
        })
        .collect()
}
