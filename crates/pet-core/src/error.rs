use std::path::PathBuf;

use thiserror::Error;

use crate::item::ItemId;
use crate::pet::Category;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("pet #{index} in {category} has an empty name")]
    EmptyName { category: Category, index: usize },
}

/// Structural violations rejected by the list model.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("item {0} is not a category header")]
    NotAHeader(ItemId),
    #[error("item {0} is a header and cannot be nested under another header")]
    NestedHeader(ItemId),
    #[error("item {0} is already present in the model")]
    Duplicate(ItemId),
}
