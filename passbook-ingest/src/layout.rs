//! Statement layout: the fixed format assumptions a statement is parsed with.
//!
//! Default layout follows a Maybank savings/current account statement:
//!   ENTRY DATE   TRANSACTION DESCRIPTION          TRANSACTION AMOUNT   STATEMENT BALANCE
//!   01/03/24     TRANSFER FROM A/C                          1,000.00+            5,000.00
//!                JOHN DOE

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::normalize::normalize;
use crate::types::BoundaryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    DayMonth,
    MonthDay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearStyle {
    /// `dd/mm`; the year comes from `StatementLayout::statement_year`.
    None,
    /// `dd/mm/yy`, read as 20yy.
    TwoDigit,
    /// `dd/mm/yyyy`
    FourDigit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormat {
    pub order: DateOrder,
    pub year: YearStyle,
    pub separator: char,
}

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            order: DateOrder::DayMonth,
            year: YearStyle::TwoDigit,
            separator: '/',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub thousands_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            thousands_separator: ',',
        }
    }
}

/// Stand-alone tokens that mark an amount's direction, e.g. `25.00 DR`.
///
/// `+`/`-` attached to the amount are always recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignMarkers {
    pub credit: Vec<String>,
    pub debit: Vec<String>,
}

impl Default for SignMarkers {
    fn default() -> Self {
        Self {
            credit: vec!["CR".into(), "C".into(), "+".into()],
            debit: vec!["DR".into(), "D".into(), "-".into()],
        }
    }
}

/// Header/footer labels, matched case-insensitively against whitespace-normalized lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryLabels {
    pub opening_balance: Vec<String>,
    pub closing_balance: Vec<String>,
    /// Repeated column headers and footer furniture.
    pub headers: Vec<String>,
    /// Regexes for page-number lines.
    pub page_patterns: Vec<String>,
}

impl Default for BoundaryLabels {
    fn default() -> Self {
        let owned = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect();
        Self {
            opening_balance: owned(&[
                "OPENING BALANCE",
                "BEGINNING BALANCE",
                "BALANCE B/F",
                "BALANCE BROUGHT FORWARD",
                "BAKI MULA",
            ]),
            closing_balance: owned(&[
                "CLOSING BALANCE",
                "ENDING BALANCE",
                "BALANCE C/F",
                "BAKI AKHIR",
            ]),
            headers: owned(&[
                "ENTRY DATE",
                "TRANSACTION DESCRIPTION",
                "STATEMENT BALANCE",
                "TARIKH MASUK",
                "DATE DESCRIPTION",
                "TOTAL DEBIT",
                "TOTAL CREDIT",
            ]),
            page_patterns: owned(&[
                r"(?i)^page\s*\d+(\s*(of|/)\s*\d+)?$",
                r"^\d+\s*/\s*\d+$",
                r"(?i)^muka\s*surat\s*\d+",
            ]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StatementLayout {
    pub date: DateFormat,
    /// Year for date formats that print none. Rolls forward on a Dec -> Jan wrap.
    pub statement_year: Option<i32>,
    pub numbers: NumberFormat,
    pub signs: SignMarkers,
    pub boundaries: BoundaryLabels,
}

impl StatementLayout {
    /// `dd/mm` rows with the year supplied separately.
    pub fn day_month(statement_year: i32) -> Self {
        Self {
            date: DateFormat {
                order: DateOrder::DayMonth,
                year: YearStyle::None,
                separator: '/',
            },
            statement_year: Some(statement_year),
            ..Self::default()
        }
    }
}

/// A layout with its patterns compiled, ready for one or many parses.
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    layout: StatementLayout,
    date_re: Regex,
    page_res: Vec<Regex>,
    opening: Vec<String>,
    closing: Vec<String>,
    headers: Vec<String>,
}

impl CompiledLayout {
    pub fn new(layout: StatementLayout) -> Result<Self, LayoutError> {
        if layout.date.year == YearStyle::None && layout.statement_year.is_none() {
            return Err(LayoutError::MissingStatementYear);
        }
        if layout.numbers.decimal_separator == layout.numbers.thousands_separator {
            return Err(LayoutError::AmbiguousSeparators(layout.numbers.decimal_separator));
        }

        let sep = regex::escape(&layout.date.separator.to_string());
        let year = match layout.date.year {
            YearStyle::None => String::new(),
            YearStyle::TwoDigit => format!("{sep}(?P<year>\\d{{2}})"),
            YearStyle::FourDigit => format!("{sep}(?P<year>\\d{{4}})"),
        };
        let (first, second) = match layout.date.order {
            DateOrder::DayMonth => ("day", "month"),
            DateOrder::MonthDay => ("month", "day"),
        };
        let date_pattern = format!(r"^(?P<{first}>\d{{2}}){sep}(?P<{second}>\d{{2}}){year}$");
        let date_re = Regex::new(&date_pattern).map_err(|source| LayoutError::InvalidPattern {
            pattern: date_pattern.clone(),
            source,
        })?;

        let page_res = layout
            .boundaries
            .page_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|source| LayoutError::InvalidPattern {
                    pattern: p.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let upper = |labels: &[String]| {
            labels
                .iter()
                .map(|l| normalize(l).to_uppercase())
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
        };

        Ok(Self {
            opening: upper(&layout.boundaries.opening_balance),
            closing: upper(&layout.boundaries.closing_balance),
            headers: upper(&layout.boundaries.headers),
            layout,
            date_re,
            page_res,
        })
    }

    pub fn layout(&self) -> &StatementLayout {
        &self.layout
    }

    pub fn is_date_token(&self, token: &str) -> bool {
        self.date_re.is_match(token)
    }

    /// Split a date token into (day, month, year) components, exact match only.
    pub(crate) fn date_parts(&self, token: &str) -> Option<(u32, u32, Option<i32>)> {
        let caps = self.date_re.captures(token)?;
        let day = caps["day"].parse().ok()?;
        let month = caps["month"].parse().ok()?;
        let year = match caps.name("year") {
            Some(y) => {
                let y: i32 = y.as_str().parse().ok()?;
                Some(if self.layout.date.year == YearStyle::TwoDigit { 2000 + y } else { y })
            }
            None => None,
        };
        Some((day, month, year))
    }

    /// Which header/footer marker, if any, the line is.
    ///
    /// A label must open the line, or directly follow a leading date token
    /// for opening/closing balances. Dated lines are never page furniture.
    pub fn boundary_kind(&self, text: &str) -> Option<BoundaryKind> {
        let line = normalize(text);
        let upper = line.to_uppercase();
        let (dated, rest) = match upper.split_once(' ') {
            Some((first, rest)) if self.is_date_token(first) => (true, rest),
            _ => (false, upper.as_str()),
        };
        let leads = |labels: &[String]| labels.iter().any(|l| starts_with_label(rest, l));

        if leads(&self.closing) {
            Some(BoundaryKind::ClosingBalance)
        } else if leads(&self.opening) {
            Some(BoundaryKind::OpeningBalance)
        } else if dated {
            None
        } else if leads(&self.headers) || self.page_res.iter().any(|re| re.is_match(&line)) {
            Some(BoundaryKind::PageMarker)
        } else {
            None
        }
    }

    pub(crate) fn credit_marker(&self, token: &str) -> bool {
        self.layout.signs.credit.iter().any(|m| m.eq_ignore_ascii_case(token))
    }

    pub(crate) fn debit_marker(&self, token: &str) -> bool {
        self.layout.signs.debit.iter().any(|m| m.eq_ignore_ascii_case(token))
    }
}

/// `label` opens `text` and ends on a word boundary.
fn starts_with_label(text: &str, label: &str) -> bool {
    text.strip_prefix(label)
        .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
}
