use chrono::NaiveDate;
use passbook_ingest::text::lines_from_text;
use passbook_ingest::{
    normalize, parse_statement, Diagnostic, LineCategory, ParseError, Sign, Statement,
    StatementLayout, StatementParser, TextLine,
};
use rust_decimal_macros::dec;

fn lines(texts: &[&str]) -> Vec<TextLine> {
    texts
        .iter()
        .enumerate()
        .map(|(i, t)| TextLine::new(*t, 1, i as f32 * 12.0))
        .collect()
}

fn parse_day_month(texts: &[&str]) -> Result<Statement, ParseError> {
    parse_statement(&lines(texts), &StatementLayout::day_month(2024))
}

/// Running-balance equation holds wherever no mismatch was reported.
fn assert_balance_invariant(stmt: &Statement) {
    let mut previous = stmt.opening_balance;
    for (i, tx) in stmt.transactions.iter().enumerate() {
        if let Some(prev) = previous {
            if !stmt.has_balance_mismatch_at(i) {
                assert_eq!(tx.balance, prev + tx.signed_amount(), "row {i}");
            }
        }
        previous = Some(tx.balance);
    }
}

#[test]
fn test_end_to_end_example() {
    let stmt = parse_day_month(&[
        "01/01 OPENING BALANCE 100.00",
        "02/01 GROCERY STORE -25.50 74.50",
        "PURCHASE REF 1234",
        "03/01 SALARY CREDIT +500.00 574.50",
    ])
    .unwrap();

    assert_eq!(stmt.opening_balance, Some(dec!(100.00)));
    assert_eq!(stmt.transactions.len(), 2);
    assert!(stmt.diagnostics.is_empty());

    let grocery = &stmt.transactions[0];
    assert_eq!(grocery.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    assert_eq!(grocery.details, "GROCERY STORE");
    assert_eq!(grocery.descriptions, vec!["PURCHASE REF 1234".to_string()]);
    assert_eq!(grocery.amount, dec!(25.50));
    assert_eq!(grocery.sign, Sign::Debit);
    assert_eq!(grocery.balance, dec!(74.50));

    let salary = &stmt.transactions[1];
    assert_eq!(salary.details, "SALARY CREDIT");
    assert!(salary.descriptions.is_empty());
    assert_eq!(salary.amount, dec!(500.00));
    assert_eq!(salary.sign, Sign::Credit);
    assert_eq!(salary.balance, dec!(574.50));

    assert_eq!(stmt.closing_balance, dec!(574.50));
    assert_eq!(
        grocery.display_details(),
        "GROCERY STORE PURCHASE REF 1234"
    );
    assert_balance_invariant(&stmt);
}

#[test]
fn test_maybank_style_multi_page_statement() {
    let text = "\
MAYBANK ISLAMIC BERHAD
ENTRY DATE   TRANSACTION DESCRIPTION         TRANSACTION AMOUNT   STATEMENT BALANCE
             BEGINNING BALANCE                                          5,000.00
01/03/24     TRANSFER FROM A/C                        1,000.00+         6,000.00
             JOHN   DOE
             *
05/03/24     SALE DEBIT                                  45.90-         5,954.10
             TESCO   STORES
Page 1 of 2
\u{000C}ENTRY DATE   TRANSACTION DESCRIPTION         TRANSACTION AMOUNT   STATEMENT BALANCE
             KUALA LUMPUR
28/03/24     PROFIT PAID                                  1.20+         5,955.30
             ENDING BALANCE :                                           5,955.30
             TOTAL DEBIT :                                                 45.90
";
    let parser = StatementParser::new(StatementLayout::default()).unwrap();
    let stmt = parser.parse(&lines_from_text(text)).unwrap();

    assert_eq!(stmt.opening_balance, Some(dec!(5000.00)));
    assert_eq!(stmt.closing_balance, dec!(5955.30));
    assert_eq!(stmt.transactions.len(), 3);
    assert!(stmt.diagnostics.is_empty(), "{:?}", stmt.diagnostics);

    // The entry split by the page break keeps its trailing line.
    let sale = &stmt.transactions[1];
    assert_eq!(sale.details, "SALE DEBIT");
    assert_eq!(
        sale.descriptions,
        vec!["TESCO STORES".to_string(), "KUALA LUMPUR".to_string()]
    );
    assert_eq!(sale.sign, Sign::Debit);

    assert_eq!(stmt.transactions[0].descriptions, vec!["JOHN DOE".to_string()]);
    assert_eq!(stmt.total(Sign::Credit), dec!(1001.20));
    assert_eq!(stmt.total(Sign::Debit), dec!(45.90));
    assert_balance_invariant(&stmt);
}

#[test]
fn test_transaction_count_matches_start_lines() {
    let texts = [
        "02/01 A -1.00 99.00",
        "02/01 B -1.00 98.00",
        "x",
        "03/01 C +2.00 100.00",
        "04/01 D -0.50 99.50",
    ];
    let layout = StatementLayout::day_month(2024);
    let parser = StatementParser::new(layout).unwrap();
    let starts = parser
        .classify(lines(&texts))
        .filter(|c| c.category == LineCategory::TransactionStart)
        .count();

    let stmt = parser.parse(&lines(&texts)).unwrap();
    assert_eq!(stmt.transactions.len(), starts);
    let details: Vec<_> = stmt.transactions.iter().map(|t| t.details.as_str()).collect();
    assert_eq!(details, vec!["A", "B", "C", "D"]);
}

#[test]
fn test_balance_mismatch_does_not_abort() {
    let stmt = parse_day_month(&[
        "OPENING BALANCE 100.00",
        "02/01 A -10.00 90.00",
        "03/01 B -10.00 70.00",
        "04/01 C +5.00 75.00",
    ])
    .unwrap();
    assert_eq!(stmt.transactions.len(), 3);
    assert_eq!(
        stmt.diagnostics,
        vec![Diagnostic::BalanceMismatch {
            index: 1,
            expected: dec!(80.00),
            actual: dec!(70.00),
        }]
    );
    assert_balance_invariant(&stmt);
}

#[test]
fn test_no_date_lines_is_empty_statement() {
    let err = parse_day_month(&["ACCOUNT STATEMENT", "Nothing here", "Page 1 of 1"]).unwrap_err();
    assert!(matches!(err, ParseError::EmptyStatement));
}

#[test]
fn test_two_decimal_points_is_field_error() {
    let err = parse_day_month(&["02/01 GROCERY STORE -25.50.00 74.50"]).unwrap_err();
    match err {
        ParseError::FieldParse { location, .. } => assert_eq!(location.page, 1),
        other => panic!("expected field error, got {other:?}"),
    }
}

#[test]
fn test_lines_after_closing_balance_are_ignored() {
    let stmt = parse_day_month(&[
        "02/01 A -1.00 99.00",
        "CLOSING BALANCE 99.00",
        "05/01 NOT A ROW garbage",
    ])
    .unwrap();
    assert_eq!(stmt.transactions.len(), 1);
}

#[test]
fn test_label_phrases_inside_rows_are_kept() {
    let stmt = parse_day_month(&[
        "OPENING BALANCE 100.00",
        "02/01 GROCERY STORE -25.50 74.50",
        "03/01 TOTAL CREDIT CARD PAYMENT -4.50 70.00",
        "REF ACCOUNT CLOSING BALANCE TRANSFER",
        "04/01 SALARY +500.00 570.00",
    ])
    .unwrap();

    let details: Vec<_> = stmt.transactions.iter().map(|t| t.details.as_str()).collect();
    assert_eq!(details, vec!["GROCERY STORE", "TOTAL CREDIT CARD PAYMENT", "SALARY"]);
    assert_eq!(
        stmt.transactions[1].descriptions,
        vec!["REF ACCOUNT CLOSING BALANCE TRANSFER".to_string()]
    );
    assert_eq!(stmt.closing_balance, dec!(570.00));
    assert!(stmt.diagnostics.is_empty(), "{:?}", stmt.diagnostics);
    assert_balance_invariant(&stmt);
}

#[test]
fn test_backdated_row_is_reported_not_moved() {
    let stmt = parse_day_month(&[
        "31/03 A -1.00 99.00",
        "28/02 B -1.00 98.00",
        "01/04 C -1.00 97.00",
    ])
    .unwrap();

    let dates: Vec<_> = stmt.transactions.iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
        ]
    );
    assert_eq!(
        stmt.diagnostics,
        vec![Diagnostic::DateOutOfOrder {
            index: 1,
            previous: NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 2, 28).unwrap(),
        }]
    );
}

#[test]
fn test_statement_serializes_for_callers() {
    let stmt = parse_day_month(&["02/01 A -1.00 99.00"]).unwrap();
    let json = serde_json::to_value(&stmt).unwrap();
    assert_eq!(json["transactions"][0]["amount"], "1.00");
    assert_eq!(json["transactions"][0]["sign"], "Debit");
}

#[test]
fn test_normalize_is_idempotent() {
    for s in ["", "  ", "a", " a  b\t\nc ", "\u{2003}wide\u{2003}space"] {
        assert_eq!(normalize(&normalize(s)), normalize(s));
    }
}
