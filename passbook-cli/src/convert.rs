//! Statement text to CSV conversion.
//!
//! Output format, one quoted row per transaction:
//!   "Date","Details","Amount","Balance"
//!   "02/01/2024","GROCERY STORE PURCHASE REF 1234","-25.50","74.50"

use anyhow::{bail, Context, Result};
use passbook_ingest::text::lines_from_text;
use passbook_ingest::{Diagnostic, ExtractionError, Statement, StatementParser, TextLine};
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

use crate::config::OutputSection;

const CSV_HEADER: [&str; 4] = ["Date", "Details", "Amount", "Balance"];

/// Read pre-extracted statement text (pages separated by form feeds).
pub fn read_lines(path: &Path) -> Result<Vec<TextLine>, ExtractionError> {
    let bytes = fs::read(path)
        .map_err(|e| ExtractionError::new(format!("reading {}: {e}", path.display())))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| ExtractionError::new(format!("{} is not UTF-8 text", path.display())))?;
    Ok(lines_from_text(&text))
}

/// Render a statement as CSV, every cell quoted.
pub fn write_csv<W: Write>(stmt: &Statement, output: &OutputSection, writer: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(CSV_HEADER)?;
    for tx in &stmt.transactions {
        let mut date = String::new();
        write!(date, "{}", tx.date.format(&output.date_format))
            .with_context(|| format!("invalid date format {:?}", output.date_format))?;
        wtr.write_record([
            date,
            tx.display_details(),
            format!("{}{}", tx.sign.symbol(), tx.amount),
            tx.balance.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `<out_dir or input dir>/<prefix><input stem>.csv`
pub fn output_path(input: &Path, out_dir: Option<&Path>, prefix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string());
    let dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{prefix}{stem}.csv"))
}

fn log_diagnostics(input: &Path, stmt: &Statement) {
    for d in &stmt.diagnostics {
        match d {
            Diagnostic::BalanceMismatch {
                index,
                expected,
                actual,
            } => warn!(
                file = %input.display(),
                row = index + 1,
                %expected,
                %actual,
                "running balance mismatch; a line may have been skipped during extraction"
            ),
            Diagnostic::ClosingBalanceMismatch { expected, actual } => warn!(
                file = %input.display(),
                %expected,
                %actual,
                "closing balance differs from last running balance"
            ),
            Diagnostic::DateOutOfOrder {
                index,
                previous,
                date,
            } => warn!(
                file = %input.display(),
                row = index + 1,
                %previous,
                %date,
                "transaction dated before the previous one"
            ),
        }
    }
}

/// Parse one input and write its CSV, returning the output path.
pub fn convert_file(
    parser: &StatementParser,
    input: &Path,
    out_dir: Option<&Path>,
    output: &OutputSection,
) -> Result<PathBuf> {
    let stmt = parser
        .parse_extracted(read_lines(input))
        .with_context(|| format!("parsing {}", input.display()))?;
    log_diagnostics(input, &stmt);

    let out = output_path(input, out_dir, &output.file_prefix);
    let file = fs::File::create(&out).with_context(|| format!("create {}", out.display()))?;
    write_csv(&stmt, output, file).with_context(|| format!("write {}", out.display()))?;

    info!(
        file = %input.display(),
        output = %out.display(),
        transactions = stmt.transactions.len(),
        diagnostics = stmt.diagnostics.len(),
        "converted statement"
    );
    Ok(out)
}

/// Convert every input concurrently, one blocking task per document.
pub async fn convert_all(
    parser: StatementParser,
    inputs: Vec<PathBuf>,
    out_dir: Option<PathBuf>,
    output: OutputSection,
) -> Result<Vec<PathBuf>> {
    let parser = Arc::new(parser);
    let output = Arc::new(output);
    let out_dir = out_dir.map(Arc::new);

    let mut tasks = JoinSet::new();
    for input in inputs {
        let parser = Arc::clone(&parser);
        let output = Arc::clone(&output);
        let out_dir = out_dir.clone();
        tasks.spawn_blocking(move || {
            let result = convert_file(&parser, &input, out_dir.as_deref().map(PathBuf::as_path), &output);
            (input, result)
        });
    }

    let mut written = Vec::new();
    let mut failed = 0usize;
    while let Some(joined) = tasks.join_next().await {
        let (input, result) = joined.context("conversion task panicked")?;
        match result {
            Ok(out) => written.push(out),
            Err(e) => {
                failed += 1;
                error!(file = %input.display(), "{e:#}");
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} statements failed to convert", failed + written.len());
    }
    Ok(written)
}

/// Print each line's category; used to tune a layout against a new statement.
pub fn inspect_file(parser: &StatementParser, input: &Path) -> Result<()> {
    let lines = read_lines(input).with_context(|| format!("reading {}", input.display()))?;
    for classified in parser.classify(lines) {
        let category = format!("{:?}", classified.category);
        println!(
            "{:>3} {:>5} {:<32} {}",
            classified.line.page, classified.line.y, category, classified.line.text
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use passbook_ingest::{Sign, Transaction};
    use rust_decimal_macros::dec;

    fn statement() -> Statement {
        Statement {
            opening_balance: Some(dec!(100.00)),
            transactions: vec![
                Transaction {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                    details: "GROCERY STORE".into(),
                    descriptions: vec!["PURCHASE REF 1234".into()],
                    amount: dec!(25.50),
                    sign: Sign::Debit,
                    balance: dec!(74.50),
                },
                Transaction {
                    date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                    details: "SALARY \"MARCH\"".into(),
                    descriptions: vec![],
                    amount: dec!(500.00),
                    sign: Sign::Credit,
                    balance: dec!(574.50),
                },
            ],
            closing_balance: dec!(574.50),
            diagnostics: vec![],
        }
    }

    #[test]
    fn test_write_csv_quotes_every_cell() {
        let mut buf = Vec::new();
        write_csv(&statement(), &OutputSection::default(), &mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert_eq!(
            csv,
            "\"Date\",\"Details\",\"Amount\",\"Balance\"\n\
             \"02/01/2024\",\"GROCERY STORE PURCHASE REF 1234\",\"-25.50\",\"74.50\"\n\
             \"03/01/2024\",\"SALARY \"\"MARCH\"\"\",\"+500.00\",\"574.50\"\n"
        );
    }

    #[test]
    fn test_date_format_is_configurable() {
        let output = OutputSection {
            date_format: "%Y-%m-%d".into(),
            ..OutputSection::default()
        };
        let mut buf = Vec::new();
        write_csv(&statement(), &output, &mut buf).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\"2024-01-02\""));
    }

    #[test]
    fn test_bad_date_format_is_an_error() {
        let output = OutputSection {
            date_format: "%Q".into(),
            ..OutputSection::default()
        };
        let mut buf = Vec::new();
        let err = write_csv(&statement(), &output, &mut buf).unwrap_err();
        assert!(err.to_string().contains("%Q"));
    }

    #[test]
    fn test_output_path() {
        let input = Path::new("/tmp/in/march.txt");
        assert_eq!(
            output_path(input, None, &OutputSection::default().file_prefix),
            PathBuf::from("/tmp/in/maybankconverter_march.csv")
        );
        assert_eq!(
            output_path(input, Some(Path::new("/out")), "mb_"),
            PathBuf::from("/out/mb_march.csv")
        );
    }

    #[test]
    fn test_missing_input_is_extraction_error() {
        let err = read_lines(Path::new("/nonexistent/passbook/input.txt")).unwrap_err();
        assert!(err.message.contains("input.txt"));
    }
}
