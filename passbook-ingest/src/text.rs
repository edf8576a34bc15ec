//! Turning extracted page text into `TextLine`s.
//!
//! PDF-to-text tools emit pages separated by form feed (`\x0C`); each page's
//! lines are numbered from the top so `y` grows down the page.

use crate::types::TextLine;

const PAGE_BREAK: char = '\u{000C}';

/// Lines of a whole document, pages separated by form feeds. Pages are numbered from 1.
pub fn lines_from_text(text: &str) -> Vec<TextLine> {
    let pages: Vec<&str> = text.split(PAGE_BREAK).collect();
    lines_from_pages(&pages)
}

/// Lines of a document already split into pages. Blank pages are skipped but keep their number.
pub fn lines_from_pages<S: AsRef<str>>(pages: &[S]) -> Vec<TextLine> {
    pages
        .iter()
        .enumerate()
        .filter(|(_, page)| !page.as_ref().trim().is_empty())
        .flat_map(|(idx, page)| {
            page.as_ref()
                .lines()
                .enumerate()
                .map(move |(row, line)| TextLine::new(line, (idx + 1) as u32, row as f32))
        })
        .collect()
}
