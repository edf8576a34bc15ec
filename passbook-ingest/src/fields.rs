//! Field parser: turns a raw transaction block into a typed `Transaction`.
//!
//! Start line shape, read from the right:
//!   <date> <details ...> <amount>[+|-] [<marker>] <balance>

use chrono::{Datelike, NaiveDate};

use crate::amount::{looks_numeric, parse_fixed_point, split_sign};
use crate::error::{FieldErrorKind, ParseError, Result};
use crate::layout::CompiledLayout;
use crate::types::{RawTransactionBlock, Sign, TextLine, Transaction};

/// Parses the blocks of one document in order.
///
/// Holds the previous date so that year-less dates can roll over Dec -> Jan.
pub struct FieldParser<'a> {
    layout: &'a CompiledLayout,
    year: Option<i32>,
    previous: Option<NaiveDate>,
}

impl<'a> FieldParser<'a> {
    pub fn new(layout: &'a CompiledLayout) -> Self {
        Self {
            layout,
            year: layout.layout().statement_year,
            previous: None,
        }
    }

    pub fn parse_block(&mut self, block: &RawTransactionBlock) -> Result<Transaction> {
        let layout = self.layout;
        let line = &block.start().line;
        let fail = |reason| ParseError::field(reason, line);

        let tokens: Vec<&str> = line.text.split_whitespace().collect();
        let (date_token, rest) = tokens.split_first().ok_or_else(|| fail(FieldErrorKind::MissingDate))?;
        let date = self.parse_date(date_token, line)?;

        let numbers = &layout.layout().numbers;
        let (balance_token, rest) = match rest.split_last() {
            Some((last, rest)) if looks_numeric(last, numbers) => (*last, rest),
            _ => return Err(fail(FieldErrorKind::MissingBalance)),
        };
        let (body, sign) = split_sign(balance_token).map_err(fail)?;
        if sign.is_some() {
            return Err(fail(FieldErrorKind::MalformedNumber {
                token: balance_token.to_string(),
                problem: "balance must not carry a sign",
            }));
        }
        let balance = parse_fixed_point(body, numbers).map_err(fail)?;

        // Optional stand-alone marker between amount and balance.
        let (marker, rest) = match rest.split_last() {
            Some((last, rest)) if layout.credit_marker(last) => (Some(Sign::Credit), rest),
            Some((last, rest)) if layout.debit_marker(last) => (Some(Sign::Debit), rest),
            _ => (None, rest),
        };

        let (amount_token, detail_tokens) = match rest.split_last() {
            Some((last, rest)) if looks_numeric(last, numbers) => (*last, rest),
            _ => return Err(fail(FieldErrorKind::MissingAmount)),
        };
        let (body, attached) = split_sign(amount_token).map_err(fail)?;
        let amount = parse_fixed_point(body, numbers).map_err(fail)?;
        let sign = match (attached, marker) {
            (Some(a), Some(m)) if a != m => {
                return Err(fail(FieldErrorKind::ConflictingSign(amount_token.to_string())));
            }
            // Statements mark credits explicitly and leave debits bare, so an
            // unmarked amount is a debit. Revisit against new sample documents.
            (a, m) => a.or(m).unwrap_or(Sign::Debit),
        };

        let mut descriptions: Vec<String> = block
            .continuations()
            .iter()
            .map(|c| c.line.text.clone())
            .collect();
        let details = if detail_tokens.is_empty() {
            if descriptions.is_empty() {
                return Err(fail(FieldErrorKind::MissingDetails));
            }
            descriptions.remove(0)
        } else {
            detail_tokens.join(" ")
        };

        Ok(Transaction {
            date,
            details,
            descriptions,
            amount,
            sign,
            balance,
        })
    }

    fn parse_date(&mut self, token: &str, line: &TextLine) -> Result<NaiveDate> {
        let invalid = || ParseError::field(FieldErrorKind::InvalidDate(token.to_string()), line);
        let (day, month, year) = self.layout.date_parts(token).ok_or_else(invalid)?;

        let date = match year {
            Some(year) => NaiveDate::from_ymd_opt(year, month, day),
            None => {
                let mut year = self.year.ok_or_else(invalid)?;
                // Only a Dec -> Jan wrap moves the year; any other backwards
                // month is left for the date-order check to report.
                if let Some(prev) = self.previous {
                    if prev.month() == 12 && month == 1 && year <= prev.year() {
                        year = prev.year() + 1;
                        self.year = Some(year);
                    }
                }
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
        .ok_or_else(invalid)?;

        self.previous = Some(date);
        Ok(date)
    }
}
