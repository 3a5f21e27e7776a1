//! Category table: an ordered keyword vocabulary for bucketing transactions.
//!
//! Matching is a case-sensitive substring test against the transaction
//! description. Table order decides ties: the first category with any
//! matching keyword wins.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("duplicate category name: {0}")]
    DuplicateName(String),
    #[error("category name must not be empty")]
    EmptyName,
    #[error("category `{0}` has no keywords")]
    NoKeywords(String),
    #[error("category `{0}` contains an empty keyword")]
    EmptyKeyword(String),
}

/// A named spending bucket and the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new<I, S>(name: impl Into<String>, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// True if any keyword appears literally in `description`
    pub fn matches(&self, description: &str) -> bool {
        self.keywords.iter().any(|kw| description.contains(kw.as_str()))
    }
}

/// Validated, ordered list of categories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawTable", into = "RawTable")]
pub struct CategoryTable {
    categories: Vec<Category>,
}

#[derive(Serialize, Deserialize)]
struct RawTable {
    #[serde(default, rename = "category")]
    categories: Vec<Category>,
}

impl TryFrom<RawTable> for CategoryTable {
    type Error = CategoryError;

    fn try_from(raw: RawTable) -> Result<Self, Self::Error> {
        CategoryTable::new(raw.categories)
    }
}

impl From<CategoryTable> for RawTable {
    fn from(table: CategoryTable) -> Self {
        RawTable {
            categories: table.categories,
        }
    }
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Result<Self, CategoryError> {
        let mut seen = HashSet::new();
        for c in &categories {
            if c.name.trim().is_empty() {
                return Err(CategoryError::EmptyName);
            }
            if !seen.insert(c.name.as_str()) {
                return Err(CategoryError::DuplicateName(c.name.clone()));
            }
            if c.keywords.is_empty() {
                return Err(CategoryError::NoKeywords(c.name.clone()));
            }
            // "" would match every description
            if c.keywords.iter().any(|k| k.is_empty()) {
                return Err(CategoryError::EmptyKeyword(c.name.clone()));
            }
        }
        Ok(Self { categories })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// First category, in table order, whose keywords match `description`
    pub fn match_description(&self, description: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.matches(description))
    }
}
