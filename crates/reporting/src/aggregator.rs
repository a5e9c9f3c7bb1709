//! Report aggregation over a catalog/ledger snapshot.
//!
//! The free functions are pure and operate on slices. `ReportAggregator`
//! reads a snapshot from the injected stores and composes them.
//!
//! Records lacking required fields (see `Part::is_reportable`,
//! `Sale::is_reportable`) are skipped, never fatal. Sums use exact decimals,
//! so results do not depend on input order. Decimal overflow is reported as
//! `ReportError::AggregationFailure` rather than panicking.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use partstrack_core::{PartId, format_amount};
use partstrack_inventory::{
    CatalogError, InventoryCatalog, Part, Sale, SalesLedger, StockLevel, classify, classify_all,
    low_stock_alerts, needs_reorder,
};

/// Number of entries in top-seller rankings and alert lists.
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("aggregation failed: {0}")]
    AggregationFailure(String),
}

impl From<CatalogError> for ReportError {
    fn from(value: CatalogError) -> Self {
        ReportError::AggregationFailure(value.to_string())
    }
}

fn overflowed(what: &str) -> ReportError {
    error!(total = what, "decimal overflow while aggregating");
    ReportError::AggregationFailure(format!("{what} overflowed"))
}

fn checked_total<I>(values: I, what: &str) -> Result<Decimal, ReportError>
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| v.and_then(|v| acc.checked_add(v)))
        .ok_or_else(|| overflowed(what))
}

// ─────────────────────────────────────────────────────────────────────────────
// Pure aggregations
// ─────────────────────────────────────────────────────────────────────────────

/// Σ quantity × price over reportable parts.
pub fn stock_value(parts: &[Part]) -> Result<Decimal, ReportError> {
    checked_total(
        parts
            .iter()
            .filter(|p| p.is_reportable())
            .map(Part::stock_value),
        "stock value",
    )
}

/// Σ total_price over reportable sales.
pub fn sales_revenue(sales: &[Sale]) -> Result<Decimal, ReportError> {
    checked_total(
        sales
            .iter()
            .filter(|s| s.is_reportable())
            .map(|s| Some(s.total_price)),
        "sales revenue",
    )
}

/// What a top-seller ranking was computed from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingBasis {
    /// Σ quantity sold per part.
    Sales,
    /// Current stock quantity (no sales recorded).
    Stock,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSeller {
    pub part_id: PartId,
    pub part_name: String,
    pub category: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSellers {
    pub basis: RankingBasis,
    pub entries: Vec<TopSeller>,
}

/// Rank parts by units sold, descending; ties by ascending part id.
///
/// Sales referencing a part absent from `parts` are ignored. When no sale
/// contributes, parts are ranked by current quantity instead and `basis` says so.
pub fn top_selling_parts(parts: &[Part], sales: &[Sale], limit: usize) -> TopSellers {
    let by_id: HashMap<PartId, &Part> = parts
        .iter()
        .filter(|p| p.is_reportable())
        .map(|p| (p.id, p))
        .collect();

    let mut sold: BTreeMap<PartId, u64> = BTreeMap::new();
    for sale in sales.iter().filter(|s| s.is_reportable()) {
        if by_id.contains_key(&sale.part_id) {
            *sold.entry(sale.part_id).or_default() += u64::from(sale.quantity_sold);
        }
    }

    if sold.is_empty() {
        debug!("no sales recorded; ranking top parts by stock quantity");
        return TopSellers {
            basis: RankingBasis::Stock,
            entries: rank_by_stock(parts, limit),
        };
    }

    let mut ranked: Vec<(PartId, u64)> = sold.into_iter().collect();
    ranked.sort_by_key(|(id, total)| (Reverse(*total), *id));

    let entries = ranked
        .into_iter()
        .take(limit)
        .filter_map(|(id, quantity)| {
            by_id.get(&id).map(|p| TopSeller {
                part_id: id,
                part_name: p.part_name.clone(),
                category: p.category.trim().to_string(),
                quantity,
            })
        })
        .collect();

    TopSellers {
        basis: RankingBasis::Sales,
        entries,
    }
}

/// Reportable parts by current quantity, descending; ties by ascending id.
fn rank_by_stock(parts: &[Part], limit: usize) -> Vec<TopSeller> {
    let mut ranked: Vec<&Part> = parts.iter().filter(|p| p.is_reportable()).collect();
    ranked.sort_by_key(|p| (Reverse(p.quantity), p.id));
    ranked
        .into_iter()
        .take(limit)
        .map(|p| TopSeller {
            part_id: p.id,
            part_name: p.part_name.clone(),
            category: p.category.trim().to_string(),
            quantity: u64::from(p.quantity),
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    pub count: usize,
    pub total_value: Decimal,
}

/// Part count and stock value per category. Uncategorised parts are kept
/// under the empty-string key.
pub fn category_breakdown(parts: &[Part]) -> Result<HashMap<String, CategoryTotals>, ReportError> {
    let mut out: HashMap<String, CategoryTotals> = HashMap::new();
    for part in parts.iter().filter(|p| p.is_reportable()) {
        let entry = out.entry(part.category.trim().to_string()).or_default();
        entry.count += 1;
        entry.total_value = part
            .stock_value()
            .and_then(|v| entry.total_value.checked_add(v))
            .ok_or_else(|| overflowed("category value"))?;
    }
    Ok(out)
}

// ─────────────────────────────────────────────────────────────────────────────
// Summaries
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct StockStatus {
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total: usize,
}

/// Who a dashboard is rendered for. Only administrators see stock valuation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Audience {
    Admin,
    Employee,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEntry {
    pub part_id: PartId,
    pub part_number: String,
    pub part_name: String,
    pub quantity: u32,
    pub minimum_stock: u32,
    pub level: StockLevel,
}

impl From<&Part> for AlertEntry {
    fn from(p: &Part) -> Self {
        Self {
            part_id: p.id,
            part_number: p.part_number.clone(),
            part_name: p.part_name.clone(),
            quantity: p.quantity,
            minimum_stock: p.minimum_stock,
            level: classify(p),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesSummary {
    pub count: usize,
    /// Two-decimal display string.
    pub revenue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_parts: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    /// Parts at or below their threshold (low + out).
    pub reorder_count: usize,
    /// Two-decimal display string; administrators only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_value: Option<String>,
    pub sales: SalesSummary,
    pub low_stock_alerts: Vec<AlertEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    pub category: String,
    pub count: usize,
    pub total_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsSummary {
    pub stock_status: StockStatus,
    pub total_quantity: u64,
    pub total_stock_value: String,
    pub avg_stock_per_part: String,
    /// By stock value, descending; ties by category name.
    pub categories: Vec<CategoryRow>,
    /// Largest current quantities.
    pub top_parts: Vec<TopSeller>,
}

/// A catalog entry with its current stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartListing {
    #[serde(flatten)]
    pub part: Part,
    pub level: StockLevel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartsOverview {
    pub stock_status: StockStatus,
    /// Two-decimal display string; administrators only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_value: Option<String>,
    /// Catalog order.
    pub parts: Vec<PartListing>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesOverview {
    pub summary: SalesSummary,
    /// Ledger order.
    pub sales: Vec<Sale>,
}

fn stock_status_of(parts: &[Part]) -> StockStatus {
    let partition = classify_all(parts.iter().filter(|p| p.is_reportable()));
    StockStatus {
        in_stock: partition.in_stock_count(),
        low_stock: partition.low_stock_count(),
        out_of_stock: partition.out_of_stock_count(),
        total: partition.total(),
    }
}

/// Reads catalog and ledger snapshots and aggregates them.
#[derive(Debug, Clone)]
pub struct ReportAggregator<C, L> {
    catalog: C,
    ledger: L,
}

impl<C, L> ReportAggregator<C, L>
where
    C: InventoryCatalog,
    L: SalesLedger,
{
    pub fn new(catalog: C, ledger: L) -> Self {
        Self { catalog, ledger }
    }

    fn parts(&self) -> Result<Vec<Part>, ReportError> {
        self.catalog.parts().map_err(|e| {
            error!(error = %e, "failed to read parts catalog");
            ReportError::from(e)
        })
    }

    fn sales(&self) -> Result<Vec<Sale>, ReportError> {
        self.ledger.sales().map_err(|e| {
            error!(error = %e, "failed to read sales ledger");
            ReportError::from(e)
        })
    }

    pub fn stock_status(&self) -> Result<StockStatus, ReportError> {
        Ok(stock_status_of(&self.parts()?))
    }

    pub fn top_sellers(&self, limit: usize) -> Result<TopSellers, ReportError> {
        let parts = self.parts()?;
        let sales = self.sales()?;
        Ok(top_selling_parts(&parts, &sales, limit))
    }

    pub fn dashboard(&self, audience: Audience) -> Result<DashboardSummary, ReportError> {
        let parts = self.parts()?;
        let sales = self.sales()?;
        let status = stock_status_of(&parts);

        let reportable: Vec<&Part> = parts.iter().filter(|p| p.is_reportable()).collect();
        let alerts = low_stock_alerts(reportable.iter().copied(), DEFAULT_LIMIT)
            .into_iter()
            .map(AlertEntry::from)
            .collect();

        let stock_value = match audience {
            Audience::Admin => Some(format_amount(stock_value(&parts)?)),
            Audience::Employee => None,
        };

        Ok(DashboardSummary {
            total_parts: status.total,
            in_stock: status.in_stock,
            low_stock: status.low_stock,
            out_of_stock: status.out_of_stock,
            reorder_count: status.low_stock + status.out_of_stock,
            stock_value,
            sales: SalesSummary {
                count: sales.iter().filter(|s| s.is_reportable()).count(),
                revenue: format_amount(sales_revenue(&sales)?),
            },
            low_stock_alerts: alerts,
        })
    }

    pub fn analytics(&self) -> Result<AnalyticsSummary, ReportError> {
        let parts = self.parts()?;
        let status = stock_status_of(&parts);

        let total_quantity: u64 = parts
            .iter()
            .filter(|p| p.is_reportable())
            .map(|p| u64::from(p.quantity))
            .sum();
        let total_value = stock_value(&parts)?;
        let average = if status.total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(total_quantity) / Decimal::from(status.total as u64)
        };

        let mut breakdown: Vec<(String, CategoryTotals)> =
            category_breakdown(&parts)?.into_iter().collect();
        breakdown.sort_by(|(a_name, a), (b_name, b)| {
            b.total_value
                .cmp(&a.total_value)
                .then_with(|| a_name.cmp(b_name))
        });
        let categories = breakdown
            .into_iter()
            .map(|(category, totals)| CategoryRow {
                category,
                count: totals.count,
                total_value: format_amount(totals.total_value),
            })
            .collect();

        Ok(AnalyticsSummary {
            stock_status: status,
            total_quantity,
            total_stock_value: format_amount(total_value),
            avg_stock_per_part: format_amount(average),
            categories,
            top_parts: rank_by_stock(&parts, DEFAULT_LIMIT),
        })
    }

    /// Every catalog part with its stock level.
    pub fn parts_overview(&self, audience: Audience) -> Result<PartsOverview, ReportError> {
        let parts = self.parts()?;
        let stock_status = stock_status_of(&parts);
        let stock_value = match audience {
            Audience::Admin => Some(format_amount(stock_value(&parts)?)),
            Audience::Employee => None,
        };

        let parts = parts
            .into_iter()
            .map(|part| PartListing {
                level: classify(&part),
                part,
            })
            .collect();

        Ok(PartsOverview {
            stock_status,
            stock_value,
            parts,
        })
    }

    /// Every sale, with count and revenue over the reportable ones.
    pub fn sales_overview(&self) -> Result<SalesOverview, ReportError> {
        let sales = self.sales()?;
        let summary = SalesSummary {
            count: sales.iter().filter(|s| s.is_reportable()).count(),
            revenue: format_amount(sales_revenue(&sales)?),
        };
        Ok(SalesOverview { summary, sales })
    }

    /// Reportable parts that need reordering, in catalog order.
    pub fn reorder_candidates(&self) -> Result<Vec<Part>, ReportError> {
        Ok(self
            .parts()?
            .into_iter()
            .filter(|p| p.is_reportable() && needs_reorder(p))
            .collect())
    }
}
