//! Balance validator: cross-checks the running balance printed on each row.

use rust_decimal::Decimal;

use crate::types::{Diagnostic, Transaction};

/// Walk the transactions and report every row whose printed balance does not
/// follow from the previous balance and its signed amount.
///
/// Each row is checked against the *printed* balance before it, so one bad
/// row produces one diagnostic rather than a cascade.
pub fn validate(transactions: &[Transaction], opening_balance: Option<Decimal>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut previous = opening_balance;

    for (index, tx) in transactions.iter().enumerate() {
        if let Some(prev) = previous {
            let expected = prev + tx.signed_amount();
            if expected != tx.balance {
                diagnostics.push(Diagnostic::BalanceMismatch {
                    index,
                    expected,
                    actual: tx.balance,
                });
            }
        }
        previous = Some(tx.balance);
    }

    diagnostics
}

/// Report rows dated earlier than the row before them.
pub fn check_dates(transactions: &[Transaction]) -> Vec<Diagnostic> {
    transactions
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[1].date < pair[0].date)
        .map(|(i, pair)| Diagnostic::DateOutOfOrder {
            index: i + 1,
            previous: pair[0].date,
            date: pair[1].date,
        })
        .collect()
}

/// Compare a printed closing balance with the last running balance.
pub fn check_closing(transactions: &[Transaction], closing: Decimal) -> Option<Diagnostic> {
    let last = transactions.last()?.balance;
    (last != closing).then_some(Diagnostic::ClosingBalanceMismatch {
        expected: last,
        actual: closing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sign;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(day: u32, amount: Decimal, sign: Sign, balance: Decimal) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            details: "X".into(),
            descriptions: vec![],
            amount,
            sign,
            balance,
        }
    }

    #[test]
    fn test_consistent_sequence_has_no_diagnostics() {
        let txs = vec![
            tx(2, dec!(25.50), Sign::Debit, dec!(74.50)),
            tx(3, dec!(500.00), Sign::Credit, dec!(574.50)),
        ];
        assert!(validate(&txs, Some(dec!(100.00))).is_empty());
    }

    #[test]
    fn test_mismatch_is_reported_once_and_processing_continues() {
        let txs = vec![
            tx(2, dec!(25.50), Sign::Debit, dec!(74.50)),
            // A skipped line upstream: printed balance jumps.
            tx(3, dec!(10.00), Sign::Debit, dec!(60.00)),
            tx(4, dec!(5.00), Sign::Credit, dec!(65.00)),
        ];
        let diags = validate(&txs, Some(dec!(100.00)));
        assert_eq!(
            diags,
            vec![Diagnostic::BalanceMismatch {
                index: 1,
                expected: dec!(64.50),
                actual: dec!(60.00),
            }]
        );
    }

    #[test]
    fn test_first_row_unchecked_without_opening_balance() {
        let txs = vec![
            tx(2, dec!(25.50), Sign::Debit, dec!(999.99)),
            tx(3, dec!(0.01), Sign::Credit, dec!(1000.00)),
        ];
        assert!(validate(&txs, None).is_empty());

        let diags = validate(&txs, Some(dec!(0.00)));
        assert!(matches!(diags[0], Diagnostic::BalanceMismatch { index: 0, .. }));
    }

    #[test]
    fn test_date_regression() {
        let txs = vec![
            tx(5, dec!(1.00), Sign::Debit, dec!(9.00)),
            tx(4, dec!(1.00), Sign::Debit, dec!(8.00)),
            tx(4, dec!(1.00), Sign::Debit, dec!(7.00)),
        ];
        let diags = check_dates(&txs);
        assert_eq!(diags.len(), 1);
        assert!(matches!(diags[0], Diagnostic::DateOutOfOrder { index: 1, .. }));
    }

    #[test]
    fn test_closing_balance_check() {
        let txs = vec![tx(2, dec!(1.00), Sign::Debit, dec!(9.00))];
        assert_eq!(check_closing(&txs, dec!(9.00)), None);
        assert_eq!(
            check_closing(&txs, dec!(8.00)),
            Some(Diagnostic::ClosingBalanceMismatch {
                expected: dec!(9.00),
                actual: dec!(8.00),
            })
        );
    }
}
