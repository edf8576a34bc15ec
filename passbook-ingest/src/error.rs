//! Error types for statement parsing.

use std::fmt;

use thiserror::Error;

use crate::types::TextLine;

/// Where in the extracted text a field error was found.
#[derive(Debug, Clone, PartialEq)]
pub struct LineLocation {
    pub page: u32,
    pub y: f32,
    pub text: String,
}

impl From<&TextLine> for LineLocation {
    fn from(line: &TextLine) -> Self {
        Self {
            page: line.page,
            y: line.y,
            text: line.text.clone(),
        }
    }
}

impl fmt::Display for LineLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {}, y {}: `{}`", self.page, self.y, self.text.trim())
    }
}

/// Why a transaction block could not be turned into a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldErrorKind {
    #[error("line does not start with a date token")]
    MissingDate,

    #[error("`{0}` is not a valid date in the statement date format")]
    InvalidDate(String),

    #[error("no amount token before the balance")]
    MissingAmount,

    #[error("no balance token at the end of the line")]
    MissingBalance,

    #[error("malformed numeric token `{token}`: {problem}")]
    MalformedNumber { token: String, problem: &'static str },

    #[error("amount `{0}` carries both a credit and a debit marker")]
    ConflictingSign(String),

    #[error("transaction has no details text")]
    MissingDetails,
}

/// Text extraction failed before parsing started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("text extraction failed: {message}")]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A statement layout that cannot be used for parsing.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("date format has no year and no statement year is set")]
    MissingStatementYear,

    #[error("decimal and thousands separators are both `{0}`")]
    AmbiguousSeparators(char),

    #[error("invalid page marker pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Fatal errors for one document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("field parse error at {location}: {reason}")]
    FieldParse {
        reason: FieldErrorKind,
        location: LineLocation,
    },

    #[error("no transactions found in statement")]
    EmptyStatement,

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("invalid statement layout: {0}")]
    Layout(#[from] LayoutError),
}

impl ParseError {
    pub(crate) fn field(reason: FieldErrorKind, line: &TextLine) -> Self {
        ParseError::FieldParse {
            reason,
            location: line.into(),
        }
    }
}

/// Result type alias for parsing operations.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;
