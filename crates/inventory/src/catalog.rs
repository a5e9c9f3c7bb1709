//! Read contracts for the parts catalog and the sales ledger.
//!
//! Catalog CRUD happens elsewhere; this core only reads. Implementations must
//! return consistent snapshots (read-committed or better).

use std::sync::Arc;

use thiserror::Error;

use partstrack_core::PartId;

use crate::{Part, Sale, Supplier};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// A part or sale number is already taken by another record.
    #[error("number already in use: {0}")]
    DuplicateNumber(String),
}

pub trait InventoryCatalog: Send + Sync {
    fn parts(&self) -> Result<Vec<Part>, CatalogError>;
    fn part(&self, id: PartId) -> Result<Option<Part>, CatalogError>;
    fn suppliers(&self) -> Result<Vec<Supplier>, CatalogError>;
}

pub trait SalesLedger: Send + Sync {
    fn sales(&self) -> Result<Vec<Sale>, CatalogError>;
}

impl<C> InventoryCatalog for Arc<C>
where
    C: InventoryCatalog + ?Sized,
{
    fn parts(&self) -> Result<Vec<Part>, CatalogError> {
        (**self).parts()
    }

    fn part(&self, id: PartId) -> Result<Option<Part>, CatalogError> {
        (**self).part(id)
    }

    fn suppliers(&self) -> Result<Vec<Supplier>, CatalogError> {
        (**self).suppliers()
    }
}

impl<L> SalesLedger for Arc<L>
where
    L: SalesLedger + ?Sized,
{
    fn sales(&self) -> Result<Vec<Sale>, CatalogError> {
        (**self).sales()
    }
}
