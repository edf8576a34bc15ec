use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::normalize::join_normalized;

/// One line of extracted statement text.
///
/// `page` and `y` only describe where the line came from; the pipeline relies
/// on the order lines are handed in, never on these coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub page: u32,
    pub y: f32,
}

impl TextLine {
    pub fn new(text: impl Into<String>, page: u32, y: f32) -> Self {
        Self {
            text: text.into(),
            page,
            y,
        }
    }
}

/// Header/footer markers recognised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryKind {
    OpeningBalance,
    ClosingBalance,
    /// Page numbers, repeated column headers and other per-page furniture.
    PageMarker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineCategory {
    TransactionStart,
    Continuation,
    Noise,
    StatementBoundary(BoundaryKind),
}

impl LineCategory {
    /// True while a transaction block is open.
    pub fn is_in_block(self) -> bool {
        matches!(self, LineCategory::TransactionStart | LineCategory::Continuation)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub line: TextLine,
    pub category: LineCategory,
}

/// The lines of one ledger entry: a start line followed by its continuations.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransactionBlock {
    start: ClassifiedLine,
    continuations: Vec<ClassifiedLine>,
}

impl RawTransactionBlock {
    pub fn new(start: ClassifiedLine) -> Self {
        debug_assert_eq!(start.category, LineCategory::TransactionStart);
        Self {
            start,
            continuations: Vec::new(),
        }
    }

    pub fn push(&mut self, line: ClassifiedLine) {
        self.continuations.push(line);
    }

    pub fn start(&self) -> &ClassifiedLine {
        &self.start
    }

    pub fn continuations(&self) -> &[ClassifiedLine] {
        &self.continuations
    }

    /// Number of lines in the block, start line included.
    pub fn line_count(&self) -> usize {
        1 + self.continuations.len()
    }
}

/// Direction of a transaction relative to the account balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    /// Money out; decreases the balance.
    Debit,
    /// Money in; increases the balance.
    Credit,
}

impl Sign {
    /// Prefix used when rendering a signed amount.
    pub fn symbol(self) -> char {
        match self {
            Sign::Debit => '-',
            Sign::Credit => '+',
        }
    }

    /// Apply this direction to a non-negative amount.
    pub fn apply(self, amount: Decimal) -> Decimal {
        match self {
            Sign::Debit => -amount,
            Sign::Credit => amount,
        }
    }
}

/// A parsed, normalized statement entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Primary label from the start line.
    pub details: String,
    /// Supplementary text, one entry per continuation line.
    pub descriptions: Vec<String>,
    /// Always non-negative, two fraction digits.
    pub amount: Decimal,
    pub sign: Sign,
    /// Running balance after this entry, two fraction digits.
    pub balance: Decimal,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        self.sign.apply(self.amount)
    }

    /// Details and descriptions joined into a single normalized line.
    pub fn display_details(&self) -> String {
        join_normalized(
            std::iter::once(self.details.as_str()).chain(self.descriptions.iter().map(String::as_str)),
        )
    }
}

/// Non-fatal anomalies found while validating a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// The printed balance at `index` does not follow from the previous one.
    BalanceMismatch {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },
    /// The printed closing balance differs from the last running balance.
    ClosingBalanceMismatch { expected: Decimal, actual: Decimal },
    /// The date at `index` is earlier than the one before it.
    DateOutOfOrder {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub opening_balance: Option<Decimal>,
    pub transactions: Vec<Transaction>,
    /// Printed closing balance, or the last running balance when none was printed.
    pub closing_balance: Decimal,
    pub diagnostics: Vec<Diagnostic>,
}

impl Statement {
    pub fn has_balance_mismatch_at(&self, index: usize) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::BalanceMismatch { index: i, .. } if *i == index))
    }

    pub fn total(&self, sign: Sign) -> Decimal {
        self.transactions
            .iter()
            .filter(|t| t.sign == sign)
            .map(|t| t.amount)
            .sum()
    }
}
