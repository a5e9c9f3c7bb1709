//! Purchase-list export.
//!
//! Reorder candidates come from the stock classifier. The administrator
//! attaches a requested quantity per part; only parts with a non-blank
//! request become rows.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use partstrack_core::PartId;
use partstrack_inventory::{Part, needs_reorder};

pub const EXPORT_HEADER: [&str; 3] = ["Part Number", "Part Name", "Quantity To Purchase"];
pub const EXPORT_FILENAME: &str = "purchase_list.csv";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("invalid quantity {quantity:?} for part {part_number}")]
    InvalidQuantity {
        part_number: String,
        quantity: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRow {
    pub part_id: PartId,
    pub part_number: String,
    pub part_name: String,
    /// Trimmed request text; opaque unless strict mode is on.
    pub quantity_to_buy: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PurchaseListExporter {
    strict_quantities: bool,
}

impl PurchaseListExporter {
    pub fn new(strict_quantities: bool) -> Self {
        Self { strict_quantities }
    }

    /// Parts that are low or out of stock, in input order.
    pub fn candidates<'a, I>(&self, parts: I) -> Vec<&'a Part>
    where
        I: IntoIterator<Item = &'a Part>,
    {
        parts.into_iter().filter(|p| needs_reorder(p)).collect()
    }

    /// One row per candidate with a non-blank requested quantity, in candidate order.
    pub fn build_export<'a, I>(
        &self,
        candidates: I,
        requested: &HashMap<PartId, String>,
    ) -> Result<Vec<PurchaseRow>, ExportError>
    where
        I: IntoIterator<Item = &'a Part>,
    {
        let mut rows = Vec::new();
        for part in candidates {
            let Some(quantity) = requested
                .get(&part.id)
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
            else {
                continue;
            };

            if self.strict_quantities && quantity.parse::<u64>().is_err() {
                return Err(ExportError::InvalidQuantity {
                    part_number: part.part_number.clone(),
                    quantity: quantity.to_string(),
                });
            }

            rows.push(PurchaseRow {
                part_id: part.id,
                part_number: part.part_number.clone(),
                part_name: part.part_name.clone(),
                quantity_to_buy: quantity.to_string(),
            });
        }
        debug!(rows = rows.len(), "purchase list built");
        Ok(rows)
    }

    /// Header plus one CRLF-terminated record per row.
    pub fn render_csv(&self, rows: &[PurchaseRow]) -> Vec<u8> {
        let mut out = String::new();
        write_record(&mut out, EXPORT_HEADER.iter().copied());
        for row in rows {
            write_record(
                &mut out,
                [
                    row.part_number.as_str(),
                    row.part_name.as_str(),
                    row.quantity_to_buy.as_str(),
                ],
            );
        }
        out.into_bytes()
    }
}

fn write_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    let needs_quotes = field.contains([',', '"', '\r', '\n']);
    if !needs_quotes {
        out.push_str(field);
        return;
    }
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
}
