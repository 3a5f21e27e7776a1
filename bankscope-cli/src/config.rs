//! Category table loading: embedded default or a user-supplied TOML file.

use anyhow::{Context, Result};
use bankscope_core::CategoryTable;
use std::fs;
use std::path::Path;

const DEFAULT_CATEGORIES: &str = include_str!("default_categories.toml");

pub fn default_categories() -> Result<CategoryTable> {
    parse_categories(DEFAULT_CATEGORIES).context("parse built-in category table")
}

pub fn parse_categories(s: &str) -> Result<CategoryTable> {
    Ok(toml::from_str(s)?)
}

pub fn load_categories(path: Option<&Path>) -> Result<CategoryTable> {
    let Some(p) = path else {
        return default_categories();
    };
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_categories(&s).with_context(|| format!("parse {}", p.display()))
}
