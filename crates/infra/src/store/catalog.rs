use std::sync::RwLock;

use partstrack_core::PartId;
use partstrack_inventory::{CatalogError, InventoryCatalog, Part, Sale, SalesLedger, Supplier};

use super::POISONED;

#[derive(Debug, Default)]
struct Tables {
    parts: Vec<Part>,
    sales: Vec<Sale>,
    suppliers: Vec<Supplier>,
}

/// In-memory parts catalog and sales ledger.
///
/// Parts and sales keep insertion order; part and sale numbers are unique.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Tables>,
}

fn poisoned<T>(_: T) -> CatalogError {
    CatalogError::Unavailable(POISONED.to_string())
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a part, or replace the one with the same id.
    pub fn upsert_part(&self, part: Part) -> Result<(), CatalogError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        if tables
            .parts
            .iter()
            .any(|p| p.part_number == part.part_number && p.id != part.id)
        {
            return Err(CatalogError::DuplicateNumber(part.part_number));
        }
        match tables.parts.iter_mut().find(|p| p.id == part.id) {
            Some(existing) => *existing = part,
            None => tables.parts.push(part),
        }
        Ok(())
    }

    /// Append a sale. Sales referencing unknown parts are accepted; reports skip them.
    pub fn record_sale(&self, sale: Sale) -> Result<(), CatalogError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        if tables.sales.iter().any(|s| s.sale_number == sale.sale_number) {
            return Err(CatalogError::DuplicateNumber(sale.sale_number));
        }
        tables.sales.push(sale);
        Ok(())
    }

    pub fn upsert_supplier(&self, supplier: Supplier) -> Result<(), CatalogError> {
        let mut tables = self.inner.write().map_err(poisoned)?;
        match tables.suppliers.iter_mut().find(|s| s.id == supplier.id) {
            Some(existing) => *existing = supplier,
            None => tables.suppliers.push(supplier),
        }
        Ok(())
    }
}

impl InventoryCatalog for InMemoryCatalog {
    fn parts(&self) -> Result<Vec<Part>, CatalogError> {
        Ok(self.inner.read().map_err(poisoned)?.parts.clone())
    }

    fn part(&self, id: PartId) -> Result<Option<Part>, CatalogError> {
        Ok(self
            .inner
            .read()
            .map_err(poisoned)?
            .parts
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    /// Suppliers by name.
    fn suppliers(&self) -> Result<Vec<Supplier>, CatalogError> {
        let mut out = self.inner.read().map_err(poisoned)?.suppliers.clone();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }
}

impl SalesLedger for InMemoryCatalog {
    fn sales(&self) -> Result<Vec<Sale>, CatalogError> {
        Ok(self.inner.read().map_err(poisoned)?.sales.clone())
    }
}
