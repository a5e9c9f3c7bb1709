//! Demo catalog for local runs.

use chrono::{Duration, Utc};
use tracing::info;

use partstrack_core::{Decimal, PartId, SaleId, SupplierId};
use partstrack_inventory::{CatalogError, Part, Sale, Supplier};

use crate::InMemoryCatalog;

// (number, name, category, quantity, minimum, price in cents)
const PARTS: &[(&str, &str, &str, u32, u32, i64)] = &[
    ("BRK-001", "Brake Pad Set", "Brakes", 24, 10, 4_599),
    ("BRK-002", "Brake Disc", "Brakes", 6, 8, 7_250),
    ("FLT-010", "Oil Filter", "Filters", 0, 15, 899),
    ("FLT-011", "Air Filter", "Filters", 40, 15, 1_450),
    ("ENG-100", "Timing Belt", "Engine", 3, 5, 5_900),
    ("ENG-101", "Spark Plug", "Engine", 120, 50, 525),
    ("ELC-200", "Alternator", "Electrical", 2, 2, 18_900),
    ("MSC-900", "Wiper Blade", "", 18, 10, 1_275),
];

/// Load the demo suppliers, parts and a few sales into `catalog`.
pub fn seed_demo_catalog(catalog: &InMemoryCatalog) -> Result<(), CatalogError> {
    let suppliers = [
        ("Acme Auto Supply", "orders@acme.test"),
        ("Northern Parts Co", "sales@northern.test"),
    ]
    .map(|(name, email)| Supplier {
        id: SupplierId::new(),
        name: name.to_string(),
        email: email.to_string(),
        phone: String::new(),
        address: String::new(),
    });
    for supplier in &suppliers {
        catalog.upsert_supplier(supplier.clone())?;
    }

    let mut parts = Vec::with_capacity(PARTS.len());
    for (i, (number, name, category, quantity, minimum, cents)) in PARTS.iter().enumerate() {
        let part = Part {
            id: PartId::new(),
            part_number: number.to_string(),
            part_name: name.to_string(),
            category: category.to_string(),
            quantity: *quantity,
            minimum_stock: *minimum,
            price: Decimal::new(*cents, 2),
            supplier_id: Some(suppliers[i % suppliers.len()].id),
            location: format!("Aisle {}", i / 3 + 1),
            description: String::new(),
        };
        catalog.upsert_part(part.clone())?;
        parts.push(part);
    }

    let now = Utc::now();
    for (n, (part_index, quantity_sold)) in [(0usize, 4u32), (5, 20), (3, 6), (0, 2), (6, 1)]
        .into_iter()
        .enumerate()
    {
        let part = &parts[part_index];
        catalog.record_sale(Sale {
            id: SaleId::new(),
            sale_number: format!("SALE-{:05}", n + 1),
            part_id: part.id,
            quantity_sold,
            total_price: part.price * Decimal::from(quantity_sold),
            employee_id: None,
            created_at: now - Duration::days(n as i64),
            notes: String::new(),
        })?;
    }

    info!(parts = parts.len(), suppliers = suppliers.len(), "demo catalog seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use partstrack_inventory::{InventoryCatalog, SalesLedger};

    #[test]
    fn seeds_every_table() {
        let catalog = InMemoryCatalog::new();
        seed_demo_catalog(&catalog).unwrap();

        assert_eq!(catalog.parts().unwrap().len(), PARTS.len());
        assert_eq!(catalog.suppliers().unwrap().len(), 2);
        assert_eq!(catalog.sales().unwrap().len(), 5);
    }

    #[test]
    fn seeding_twice_conflicts_on_numbers() {
        let catalog = InMemoryCatalog::new();
        seed_demo_catalog(&catalog).unwrap();
        assert!(matches!(
            seed_demo_catalog(&catalog),
            Err(CatalogError::DuplicateNumber(_))
        ));
    }
}
