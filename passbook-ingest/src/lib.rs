//! passbook-ingest: turns the extracted text of a bank statement into
//! validated, ordered transactions.
//!
//! Pipeline: classifier -> reconstructor -> field parser -> validator ->
//! normalizer, driven by the assembler. Every stage is a pure function of the
//! document's lines, so independent documents can be parsed in parallel.
//!
//! ```
//! use passbook_ingest::{parse_statement, text::lines_from_text, Sign, StatementLayout};
//!
//! let text = "01/01 OPENING BALANCE 100.00\n02/01 GROCERY STORE -25.50 74.50\n";
//! let stmt = parse_statement(&lines_from_text(text), &StatementLayout::day_month(2024)).unwrap();
//! assert_eq!(stmt.transactions[0].sign, Sign::Debit);
//! assert!(stmt.diagnostics.is_empty());
//! ```

pub mod amount;
pub mod assembler;
pub mod classifier;
pub mod error;
pub mod fields;
pub mod layout;
pub mod normalize;
pub mod reconstructor;
pub mod text;
pub mod types;
pub mod validator;

pub use assembler::{parse_statement, StatementParser};
pub use error::{ExtractionError, FieldErrorKind, LayoutError, LineLocation, ParseError, Result};
pub use layout::{DateFormat, DateOrder, NumberFormat, StatementLayout, YearStyle};
pub use normalize::normalize;
pub use types::{
    BoundaryKind, ClassifiedLine, Diagnostic, LineCategory, RawTransactionBlock, Sign, Statement,
    TextLine, Transaction,
};
