//! Read-only reference data consulted by the inventory stage.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use simmer_core::InternalError;
use thiserror::Error;

/// Stock level and unit price for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Units available.
    pub stock: u32,
    /// Price per unit.
    pub cost: f64,
}

/// Errors raised by catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The item does not exist in the catalog.
    #[error("item '{0}' is not in the catalog")]
    NotFound(String),
}

// A missing key means the caller fed the harness bad data, not that the
// simulated business rule said no.
impl From<CatalogError> for InternalError {
    fn from(err: CatalogError) -> Self {
        InternalError::new(err.to_string())
    }
}

/// Lookup capability over item reference data.
pub trait Catalog {
    /// Fetch the entry for `name`.
    fn lookup(&self, name: &str) -> Result<CatalogEntry, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for Arc<C> {
    fn lookup(&self, name: &str) -> Result<CatalogEntry, CatalogError> {
        (**self).lookup(name)
    }
}

/// Immutable in-memory catalog.
///
/// Cloning shares the underlying map, so every concurrent run reads the
/// same snapshot and none of them can modify it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: Arc<HashMap<String, CatalogEntry>>,
}

impl InMemoryCatalog {
    /// Build a catalog from `(name, entry)` pairs.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, CatalogEntry)>,
        S: Into<String>,
    {
        Self {
            items: Arc::new(
                items
                    .into_iter()
                    .map(|(name, entry)| (name.into(), entry))
                    .collect(),
            ),
        }
    }

    /// The storefront's stock: sunglasses, pants and bags.
    pub fn storefront() -> Self {
        Self::new([
            ("sunglasses", CatalogEntry { stock: 817, cost: 9.99 }),
            ("pants", CatalogEntry { stock: 236, cost: 7.99 }),
            ("bags", CatalogEntry { stock: 17, cost: 12.99 }),
        ])
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the catalog has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn lookup(&self, name: &str) -> Result<CatalogEntry, CatalogError> {
        self.items
            .get(name)
            .copied()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }
}
