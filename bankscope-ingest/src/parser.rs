//! Fixed-layout transaction line parser.
//!
//! Expected extracted-text rows:
//!   05JAN     GROCERY MART                 45.67
//!   12FEB     ATM WITHDRAWAL               (100.00)
//!
//! A row qualifies only when it starts with a two-digit day immediately
//! followed by an uppercase three-letter month. Everything else on the page
//! (headers, balances, footers) is ignored.

use bankscope_core::Transaction;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

use crate::error::ParseError;

const DATE_PREFIX: &str = r"^[0-9]{2}[A-Z]{3}";

fn date_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DATE_PREFIX).expect("date prefix pattern"))
}

fn date_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<day>[0-9]{2})(?P<mon>[A-Z]{3})(?P<year>[0-9]{4}|[0-9]{2})?$")
            .expect("date token pattern")
    })
}

pub fn is_transaction_line(line: &str) -> bool {
    date_prefix_re().is_match(line)
}

fn month_number(mon: &str) -> Option<u32> {
    let month = match mon {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Day-first `DDMON[YY|YYYY]`; `default_year` fills a missing year.
fn parse_date(token: &str, default_year: i32) -> Option<NaiveDate> {
    let caps = date_token_re().captures(token)?;
    let day: u32 = caps["day"].parse().ok()?;
    let month = month_number(&caps["mon"])?;
    let year = match caps.name("year") {
        Some(y) if y.as_str().len() == 2 => 2000 + y.as_str().parse::<i32>().ok()?,
        Some(y) => y.as_str().parse().ok()?,
        None => default_year,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `12.34` → 12.34, `(12.34)` → -12.34. Thousands separators are dropped.
fn parse_amount(token: &str) -> Option<Decimal> {
    let (digits, negate) = match token.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (inner, true),
        None => (token, false),
    };
    let value = Decimal::from_str(&digits.replace(',', "")).ok()?;
    Some(if negate { -value } else { value })
}

/// Parse one qualifying line. Callers filter with [`is_transaction_line`] first.
pub fn parse_transaction(line: &str, default_year: i32) -> Result<Transaction, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(ParseError::MissingAmount(line.to_string()));
    }

    let date_str = parts[0];
    let date = parse_date(date_str, default_year).ok_or_else(|| ParseError::InvalidDate {
        token: date_str.to_string(),
        line: line.to_string(),
    })?;

    let amount_str = parts[parts.len() - 1];
    let amount = parse_amount(amount_str).ok_or_else(|| ParseError::InvalidAmount {
        token: amount_str.to_string(),
        line: line.to_string(),
    })?;

    let description = parts[1..parts.len() - 1].join(" ");

    Ok(Transaction {
        date,
        description,
        amount,
    })
}

/// Parse every qualifying line in order, stopping at the first bad one.
pub fn parse_lines<'a, I>(lines: I, default_year: i32) -> Result<Vec<Transaction>, ParseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = Vec::new();
    for line in lines {
        if !is_transaction_line(line) {
            continue;
        }
        debug!(line, "transaction line");
        out.push(parse_transaction(line, default_year)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_line_qualification() {
        assert!(is_transaction_line("05JAN GROCERY MART 45.67"));
        assert!(is_transaction_line("31DEC"));
        assert!(!is_transaction_line(" 05JAN GROCERY MART 45.67"));
        assert!(!is_transaction_line("5JAN GROCERY 1.00"));
        assert!(!is_transaction_line("05Jan GROCERY 1.00"));
        assert!(!is_transaction_line("05 JAN GROCERY 1.00"));
        assert!(!is_transaction_line("BALANCE B/F 1,000.00"));
        assert!(!is_transaction_line("123JAN 1.00"));
        assert!(!is_transaction_line(""));
    }

    #[test]
    fn test_parse_basic_row() {
        let t = parse_transaction("05JAN GROCERY MART 45.67", 2026).unwrap();
        assert_eq!(t.date, ymd(2026, 1, 5));
        assert_eq!(t.description, "GROCERY MART");
        assert_eq!(t.amount, Decimal::new(4567, 2));
    }

    #[test]
    fn test_parenthesized_amount_is_negative() {
        let t = parse_transaction("12FEB ATM WITHDRAWAL (100.00)", 2026).unwrap();
        assert_eq!(t.date, ymd(2026, 2, 12));
        assert_eq!(t.description, "ATM WITHDRAWAL");
        assert_eq!(t.amount, Decimal::new(-10000, 2));

        assert_eq!(parse_amount("(12.34)"), Some(Decimal::new(-1234, 2)));
        assert_eq!(parse_amount("12.34"), Some(Decimal::new(1234, 2)));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_amount("1,234.50"), Some(Decimal::new(123450, 2)));
        assert_eq!(parse_amount("(2,000.00)"), Some(Decimal::new(-200000, 2)));
    }

    #[test]
    fn test_description_whitespace_is_collapsed() {
        let t = parse_transaction("03MAR   NETS   KOPITIAM    PTE LTD   6.80", 2026).unwrap();
        assert_eq!(t.description, "NETS KOPITIAM PTE LTD");
    }

    #[test]
    fn test_empty_description() {
        let t = parse_transaction("03MAR 6.80", 2026).unwrap();
        assert_eq!(t.description, "");
        assert_eq!(t.amount, Decimal::new(680, 2));
    }

    #[test]
    fn test_year_suffix_overrides_default() {
        let long = parse_transaction("05JAN2024 X 1.00", 2026).unwrap();
        assert_eq!(long.date, ymd(2024, 1, 5));

        let short = parse_transaction("05JAN24 X 1.00", 2026).unwrap();
        assert_eq!(short.date, ymd(2024, 1, 5));
    }

    #[test]
    fn test_invalid_date() {
        let err = parse_transaction("31FEB RENT 1.00", 2026).unwrap_err();
        match err {
            ParseError::InvalidDate { token, .. } => assert_eq!(token, "31FEB"),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_transaction("05JAX RENT 1.00", 2026).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));

        let err = parse_transaction("05JANUARY RENT 1.00", 2026).unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));
    }

    #[test]
    fn test_invalid_amount() {
        let err = parse_transaction("05JAN PAGE TOTAL", 2026).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidAmount {
                token: "TOTAL".into(),
                line: "05JAN PAGE TOTAL".into()
            }
        );
        assert!(parse_transaction("05JAN X ()", 2026).is_err());
    }

    #[test]
    fn test_single_token_line_fails_fast() {
        assert_eq!(
            parse_transaction("05JAN", 2026).unwrap_err(),
            ParseError::MissingAmount("05JAN".into())
        );
    }

    #[test]
    fn test_parse_lines_skips_non_transactions() {
        let text = "\
STATEMENT OF ACCOUNT
Date  Description  Amount
05JAN GROCERY MART 45.67
BALANCE C/F 1,000.00
12FEB ATM WITHDRAWAL (100.00)
";
        let txns = parse_lines(text.lines(), 2026).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].description, "GROCERY MART");
        assert_eq!(txns[1].amount, Decimal::new(-10000, 2));
    }

    #[test]
    fn test_parse_lines_stops_on_error() {
        let lines = ["05JAN A 1.00", "06JAN B oops", "07JAN C 2.00"];
        assert!(parse_lines(lines, 2026).is_err());
    }
}
