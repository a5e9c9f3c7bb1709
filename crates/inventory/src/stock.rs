//! Stock classification.
//!
//! Pure integer comparisons against each part's own threshold:
//!
//! | quantity                    | level          |
//! |-----------------------------|----------------|
//! | `0`                         | `OutOfStock`   |
//! | `1..=minimum_stock`         | `LowStock`     |
//! | `> minimum_stock`           | `InStock`      |

use serde::{Deserialize, Serialize};

use crate::Part;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLevel {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockLevel {
    pub fn label(&self) -> &'static str {
        match self {
            StockLevel::OutOfStock => "OUT OF STOCK",
            StockLevel::LowStock => "LOW STOCK",
            StockLevel::InStock => "IN STOCK",
        }
    }
}

pub fn classify(part: &Part) -> StockLevel {
    if part.quantity == 0 {
        StockLevel::OutOfStock
    } else if part.quantity <= part.minimum_stock {
        StockLevel::LowStock
    } else {
        StockLevel::InStock
    }
}

/// A part is a reorder candidate unless it is comfortably in stock.
pub fn needs_reorder(part: &Part) -> bool {
    classify(part) != StockLevel::InStock
}

/// Parts split by stock level, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPartition<'a> {
    pub in_stock: Vec<&'a Part>,
    pub low_stock: Vec<&'a Part>,
    pub out_of_stock: Vec<&'a Part>,
}

impl StockPartition<'_> {
    pub fn in_stock_count(&self) -> usize {
        self.in_stock.len()
    }

    pub fn low_stock_count(&self) -> usize {
        self.low_stock.len()
    }

    pub fn out_of_stock_count(&self) -> usize {
        self.out_of_stock.len()
    }

    pub fn total(&self) -> usize {
        self.in_stock.len() + self.low_stock.len() + self.out_of_stock.len()
    }
}

/// Stable partition of `parts` by [`classify`].
pub fn classify_all<'a, I>(parts: I) -> StockPartition<'a>
where
    I: IntoIterator<Item = &'a Part>,
{
    let mut partition = StockPartition::default();
    for part in parts {
        match classify(part) {
            StockLevel::InStock => partition.in_stock.push(part),
            StockLevel::LowStock => partition.low_stock.push(part),
            StockLevel::OutOfStock => partition.out_of_stock.push(part),
        }
    }
    partition
}

/// First `limit` parts at or below their threshold (out-of-stock included),
/// in input order. Feeds the dashboard alert list.
pub fn low_stock_alerts<'a, I>(parts: I, limit: usize) -> Vec<&'a Part>
where
    I: IntoIterator<Item = &'a Part>,
{
    parts
        .into_iter()
        .filter(|p| p.quantity <= p.minimum_stock)
        .take(limit)
        .collect()
}
