//! Build a [`Statement`] from one PDF file.

use anyhow::{Context, Result};
use bankscope_core::Statement;
use std::path::Path;
use tracing::info;

use crate::error::ParseError;
use crate::extract::{Page, extract_pages};
use crate::parser::parse_lines;

/// Extract and parse one statement file. Any failure aborts with the file
/// path attached.
pub fn process_statement(path: impl AsRef<Path>, default_year: i32) -> Result<Statement> {
    let path = path.as_ref();
    let pages = extract_pages(path)?;
    let statement = statement_from_pages(path, &pages, default_year)
        .with_context(|| format!("parsing {}", path.display()))?;

    let debits = statement
        .transactions
        .iter()
        .filter(|t| t.is_debit())
        .count();
    info!(
        path = %path.display(),
        pages = pages.len(),
        transactions = statement.len(),
        debits,
        net = %statement.net_total(),
        "processed statement"
    );
    Ok(statement)
}

/// Parse already-extracted pages, in page order then line order.
pub fn statement_from_pages(
    source: impl AsRef<Path>,
    pages: &[Page],
    default_year: i32,
) -> Result<Statement, ParseError> {
    let mut statement = Statement::new(source);
    for page in pages {
        for txn in parse_lines(page.lines.iter().map(String::as_str), default_year)? {
            statement.add_transaction(txn);
        }
    }
    Ok(statement)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(number: u32, lines: &[&str]) -> Page {
        Page {
            number,
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_page_then_line_order() {
        let pages = vec![
            page(1, &["HEADER", "05JAN FIRST 1.00", "06JAN SECOND 2.00"]),
            page(2, &["01FEB THIRD (3.00)", "Page 2 of 2"]),
        ];
        let st = statement_from_pages("s.pdf", &pages, 2026).unwrap();
        let descs: Vec<_> = st.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["FIRST", "SECOND", "THIRD"]);
        assert_eq!(st.source, Path::new("s.pdf"));
    }

    #[test]
    fn test_error_on_any_page_fails_statement() {
        let pages = vec![page(1, &["05JAN OK 1.00"]), page(2, &["06JAN"])];
        assert_eq!(
            statement_from_pages("s.pdf", &pages, 2026).unwrap_err(),
            ParseError::MissingAmount("06JAN".into())
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = process_statement("/nonexistent/statement.pdf", 2026).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/statement.pdf"));
    }
}
