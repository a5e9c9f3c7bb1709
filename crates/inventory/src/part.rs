use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use partstrack_core::{PartId, PrincipalId, SaleId, SupplierId, line_value};

/// A spare part in the catalog.
///
/// Quantities are unsigned, so "never negative" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    /// Unique catalog number.
    pub part_number: String,
    pub part_name: String,
    /// May be empty; reports bucket such parts under `""`.
    #[serde(default)]
    pub category: String,
    pub quantity: u32,
    pub minimum_stock: u32,
    /// Unit price, exact decimal.
    pub price: Decimal,
    #[serde(default)]
    pub supplier_id: Option<SupplierId>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

impl Part {
    /// `quantity × price`; `None` on decimal overflow.
    pub fn stock_value(&self) -> Option<Decimal> {
        line_value(self.quantity, self.price)
    }

    /// Whether the record carries every field reports rely on.
    pub fn is_reportable(&self) -> bool {
        !self.part_number.trim().is_empty()
            && !self.part_name.trim().is_empty()
            && self.price >= Decimal::ZERO
    }
}

impl core::fmt::Display for Part {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} - {}", self.part_number, self.part_name)
    }
}

/// A recorded sale of a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    /// Unique sale number.
    pub sale_number: String,
    pub part_id: PartId,
    pub quantity_sold: u32,
    pub total_price: Decimal,
    #[serde(default)]
    pub employee_id: Option<PrincipalId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
}

impl Sale {
    pub fn is_reportable(&self) -> bool {
        !self.sale_number.trim().is_empty() && self.quantity_sold > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}
