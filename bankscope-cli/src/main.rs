use anyhow::{Result, bail};
use bankscope_ingest::{locate_statements, process_statement};
use bankscope_report::{generate_report, save_csv, write_summary};
use chrono::Datelike;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BANKSCOPE_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "bankscope",
    version = VERSION,
    about = "Bank statement processor: categorized spending reports from PDF statements"
)]
struct Cli {
    /// Statement PDFs, or directories searched recursively for them
    #[arg(required = true)]
    target: Vec<PathBuf>,

    /// Also write the report as CSV to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML category table to use instead of the built-in one
    #[arg(short, long)]
    categories: Option<PathBuf>,

    /// Year for transaction dates that omit it (default: current year)
    #[arg(long)]
    year: Option<i32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let statement_paths = locate_statements(&cli.target);
    if statement_paths.is_empty() {
        bail!("No PDF files found in the target path.");
    }
    info!(count = statement_paths.len(), "located statements");

    let table = config::load_categories(cli.categories.as_deref())?;
    let year = cli.year.unwrap_or_else(|| chrono::Local::now().year());

    let statements = statement_paths
        .iter()
        .map(|path| process_statement(path, year))
        .collect::<Result<Vec<_>>>()?;

    let report = generate_report(&statements, &table);
    info!(
        transactions = report.transaction_count(),
        uncategorized = report.others.len(),
        total = %report.grand_total(),
        "report ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&mut out, &report)?;

    if let Some(path) = &cli.output {
        save_csv(path, &report)?;
        writeln!(out, "Report saved to {}", path.display())?;
    }

    Ok(())
}
