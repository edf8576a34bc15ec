//! Statement assembler: runs the pipeline over one document.

use rust_decimal::Decimal;

use crate::amount::{looks_numeric, parse_fixed_point, split_sign};
use crate::classifier::Classifier;
use crate::error::{ExtractionError, ParseError, Result};
use crate::fields::FieldParser;
use crate::layout::{CompiledLayout, StatementLayout};
use crate::normalize::normalize_transaction;
use crate::reconstructor::Reconstructor;
use crate::types::{Statement, TextLine};
use crate::validator;

/// A compiled statement layout. Holds no per-document state, so one parser
/// can be shared across threads and reused for any number of documents.
#[derive(Debug, Clone)]
pub struct StatementParser {
    layout: CompiledLayout,
}

impl StatementParser {
    pub fn new(layout: StatementLayout) -> Result<Self> {
        Ok(Self {
            layout: CompiledLayout::new(layout)?,
        })
    }

    pub fn layout(&self) -> &StatementLayout {
        self.layout.layout()
    }

    /// Classify lines without parsing them; useful to debug a layout.
    pub fn classify<I>(&self, lines: I) -> Classifier<'_, I::IntoIter>
    where
        I: IntoIterator<Item = TextLine>,
    {
        Classifier::new(lines, &self.layout)
    }

    /// Parse the output of an extractor, passing its failure through.
    pub fn parse_extracted(
        &self,
        extracted: std::result::Result<Vec<TextLine>, ExtractionError>,
    ) -> Result<Statement> {
        self.parse(&extracted?)
    }

    pub fn parse(&self, lines: &[TextLine]) -> Result<Statement> {
        let classified = Classifier::new(lines.iter().cloned(), &self.layout);
        let mut blocks = Reconstructor::new(classified);
        let mut fields = FieldParser::new(&self.layout);

        let mut transactions = Vec::new();
        for block in blocks.by_ref() {
            transactions.push(fields.parse_block(&block)?);
        }
        if transactions.is_empty() {
            return Err(ParseError::EmptyStatement);
        }

        let boundaries = blocks.into_boundaries();
        let opening_balance = self.boundary_amount(boundaries.opening.as_ref())?;
        let printed_closing = self.boundary_amount(boundaries.closing.as_ref())?;

        let mut diagnostics = validator::validate(&transactions, opening_balance);
        diagnostics.extend(validator::check_dates(&transactions));

        let last_balance = transactions.last().map(|t| t.balance).unwrap_or_default();
        let closing_balance = match printed_closing {
            Some(closing) => {
                diagnostics.extend(validator::check_closing(&transactions, closing));
                closing
            }
            None => last_balance,
        };

        Ok(Statement {
            opening_balance,
            transactions: transactions.into_iter().map(normalize_transaction).collect(),
            closing_balance,
            diagnostics,
        })
    }

    /// Amount printed at the end of an opening/closing balance line, if any.
    fn boundary_amount(&self, line: Option<&TextLine>) -> Result<Option<Decimal>> {
        let Some(line) = line else {
            return Ok(None);
        };
        let numbers = &self.layout.layout().numbers;
        let Some(token) = line.text.split_whitespace().last() else {
            return Ok(None);
        };
        if !looks_numeric(token, numbers) {
            return Ok(None);
        }
        let (body, _) = split_sign(token).map_err(|reason| ParseError::field(reason, line))?;
        parse_fixed_point(body, numbers)
            .map(Some)
            .map_err(|reason| ParseError::field(reason, line))
    }
}

/// Parse one document's lines with the given layout.
pub fn parse_statement(lines: &[TextLine], layout: &StatementLayout) -> Result<Statement> {
    StatementParser::new(layout.clone())?.parse(lines)
}
