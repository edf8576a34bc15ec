//! Whitespace normalization for transaction text.

use crate::types::Transaction;

/// Trim and collapse every whitespace run to a single space.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join fragments with single spaces, dropping empty ones.
pub fn join_normalized<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize `details` and every `descriptions` entry of a transaction.
pub fn normalize_transaction(mut tx: Transaction) -> Transaction {
    tx.details = normalize(&tx.details);
    tx.descriptions = tx
        .descriptions
        .iter()
        .map(|d| normalize(d))
        .filter(|d| !d.is_empty())
        .collect();
    tx
}
