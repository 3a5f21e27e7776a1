//! Per-page text extraction from statement PDFs.
//!
//! Lines are rebuilt from glyph positions (see [`crate::layout`]), so a row
//! drawn as separate column cells still comes out as one line.

use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;

use crate::layout::{page_runs, rows};

/// Text lines of one PDF page, top to bottom as rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub lines: Vec<String>,
}

pub fn extract_pages(path: impl AsRef<Path>) -> Result<Vec<Page>> {
    let path = path.as_ref();
    let doc = Document::load(path).with_context(|| format!("loading PDF {}", path.display()))?;
    pages_of(&doc).with_context(|| format!("extracting text from {}", path.display()))
}

pub fn extract_pages_from_mem(bytes: &[u8]) -> Result<Vec<Page>> {
    let doc = Document::load_mem(bytes).context("loading PDF from memory")?;
    pages_of(&doc)
}

fn pages_of(doc: &Document) -> Result<Vec<Page>> {
    let mut pages = Vec::new();
    for (number, page_id) in doc.get_pages() {
        let runs = page_runs(doc, page_id).with_context(|| format!("page {number}"))?;
        pages.push(Page {
            number,
            lines: rows(runs),
        });
    }
    Ok(pages)
}
