//! bankscope-report: keyword categorization, per-category totals, console and CSV output

pub mod render;
pub mod report;

pub use render::{save_csv, write_csv, write_summary};
pub use report::{CategoryTotal, Report, categorize, generate_report};
