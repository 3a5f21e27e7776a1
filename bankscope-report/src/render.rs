//! Console and CSV renderings of a [`Report`].

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::Report;

/// Category totals in table order, then every uncategorized transaction.
pub fn write_summary<W: Write>(mut out: W, report: &Report) -> io::Result<()> {
    for t in &report.totals {
        writeln!(out, "{}: {:.2}", t.name, cents(t.total))?;
    }
    for txn in &report.others {
        let amount = cents(txn.amount);
        writeln!(out, "{}: {} - {amount:.2}", txn.date, txn.description)?;
    }
    Ok(())
}

fn cents(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp(2);
    // no "-0.00"
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    kind: &'static str,
    category: &'a str,
    date: String,
    description: &'a str,
    amount: String,
    /// transactions behind a category total; empty on `other` rows
    count: Option<usize>,
}

fn money(amount: Decimal) -> String {
    format!("{:.2}", cents(amount))
}

/// `kind,category,date,description,amount,count` with one `category` row per
/// table category followed by one `other` row per uncategorized transaction.
pub fn write_csv<W: Write>(out: W, report: &Report) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    for t in &report.totals {
        wtr.serialize(CsvRow {
            kind: "category",
            category: &t.name,
            date: String::new(),
            description: "",
            amount: money(t.total),
            count: Some(t.count),
        })?;
    }
    for txn in &report.others {
        wtr.serialize(CsvRow {
            kind: "other",
            category: "",
            date: txn.date.to_string(),
            description: &txn.description,
            amount: money(txn.amount),
            count: None,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_csv(path: impl AsRef<Path>, report: &Report) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(file, report).with_context(|| format!("write {}", path.display()))
}
