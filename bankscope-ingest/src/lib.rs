//! bankscope-ingest: statement discovery, PDF text extraction and transaction line parsing.

pub mod error;
pub mod extract;
pub mod layout;
pub mod locator;
pub mod parser;
pub mod statement;

pub use error::ParseError;
pub use extract::{Page, extract_pages, extract_pages_from_mem};
pub use locator::locate_statements;
pub use parser::{is_transaction_line, parse_lines, parse_transaction};
pub use statement::{process_statement, statement_from_pages};
