//! Line classifier: tags each extracted line with its role in the statement.

use crate::layout::CompiledLayout;
use crate::types::{BoundaryKind, ClassifiedLine, LineCategory, TextLine};

/// Classify one line given the category of the line before it.
///
/// Boundary markers are checked before dates so that a dated
/// `01/01 OPENING BALANCE 100.00` row is a boundary, not a transaction.
/// Labels only count at the start of a line, so row text that mentions one
/// stays a row.
pub fn classify(
    line: &TextLine,
    previous: Option<LineCategory>,
    layout: &CompiledLayout,
) -> LineCategory {
    let text = line.text.trim();
    if text.is_empty() {
        return LineCategory::Noise;
    }

    if let Some(kind) = layout.boundary_kind(text) {
        return LineCategory::StatementBoundary(kind);
    }

    let mut tokens = text.split_whitespace();
    let starts_with_date = tokens.next().is_some_and(|t| layout.is_date_token(t));
    if starts_with_date && tokens.any(|t| !layout.is_date_token(t)) {
        return LineCategory::TransactionStart;
    }

    let in_block = previous.is_some_and(LineCategory::is_in_block);
    if in_block && text.chars().any(char::is_alphanumeric) {
        LineCategory::Continuation
    } else {
        LineCategory::Noise
    }
}

/// Iterator adapter classifying a stream of lines.
///
/// Noise and page markers do not change the context passed to the next line,
/// so an entry split by a page break keeps collecting continuations.
pub struct Classifier<'a, I> {
    lines: I,
    layout: &'a CompiledLayout,
    context: Option<LineCategory>,
}

impl<'a, I> Classifier<'a, I>
where
    I: Iterator<Item = TextLine>,
{
    pub fn new(lines: impl IntoIterator<IntoIter = I>, layout: &'a CompiledLayout) -> Self {
        Self {
            lines: lines.into_iter(),
            layout,
            context: None,
        }
    }
}

impl<I> Iterator for Classifier<'_, I>
where
    I: Iterator<Item = TextLine>,
{
    type Item = ClassifiedLine;

    fn next(&mut self) -> Option<ClassifiedLine> {
        let line = self.lines.next()?;
        let category = classify(&line, self.context, self.layout);
        match category {
            LineCategory::Noise | LineCategory::StatementBoundary(BoundaryKind::PageMarker) => {}
            _ => self.context = Some(category),
        }
        Some(ClassifiedLine { line, category })
    }
}
