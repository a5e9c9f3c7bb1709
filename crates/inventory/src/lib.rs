//! Inventory domain module.
//!
//! Parts, recorded sales and suppliers as this core reads them, the storage
//! contracts through which they are read, and the pure stock classifier.
//! No IO, no HTTP, no storage.

pub mod catalog;
pub mod part;
pub mod stock;

pub use catalog::{CatalogError, InventoryCatalog, SalesLedger};
pub use part::{Part, Sale, Supplier};
pub use stock::{StockLevel, StockPartition, classify, classify_all, low_stock_alerts, needs_reorder};
