//! Static item catalog (the menu)
//!
//! The catalog maps item names to their cost in work units. It is fixed for
//! the lifetime of the process: the scheduler core only ever reads from it.
//! A catalog can be loaded from a YAML file at startup; without one the
//! built-in menu is used.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from loading a catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Catalog is empty")]
    Empty,

    #[error("Item '{0}' has zero cost; every cost must be >= 1")]
    ZeroCost(String),
}

/// Item name to work-unit cost, sorted by name.
///
/// A `BTreeMap` keeps iteration order sorted by item name, which is the
/// order the display snapshot reports the menu in.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: BTreeMap<String, u64>,
}

impl Default for Catalog {
    /// The built-in menu.
    fn default() -> Self {
        let items = [
            ("americano", 2),
            ("latte", 3),
            ("cappuccino", 3),
            ("mocha", 4),
            ("tea", 1),
            ("macchiato", 2),
            ("hot_chocolate", 4),
        ]
        .into_iter()
        .map(|(name, cost)| (name.to_string(), cost))
        .collect();
        Self { items }
    }
}

impl Catalog {
    /// Load a catalog from a YAML file mapping item names to costs.
    ///
    /// The file must contain at least one item and every cost must be
    /// positive; a zero-cost item could never finish a turn.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        debug!(path = %path.display(), "Catalog::load: called");
        let raw = std::fs::read_to_string(path)?;
        let catalog: Catalog = serde_yaml::from_str(&raw)?;
        catalog.validate()?;
        debug!(items = catalog.len(), "Catalog::load: loaded");
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (name, cost) in &self.items {
            if *cost == 0 {
                return Err(CatalogError::ZeroCost(name.clone()));
            }
        }
        Ok(())
    }

    /// Cost of `item` in work units, or `None` for an unknown item.
    pub fn cost(&self, item: &str) -> Option<u64> {
        self.items.get(item).copied()
    }

    /// Number of items on the menu.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.items.iter().map(|(name, cost)| (name.as_str(), *cost))
    }
}
