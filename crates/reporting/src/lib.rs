//! Inventory reporting engine.
//!
//! - `aggregator`: stock value, revenue, top sellers, category breakdown and the
//!   dashboard/analytics summaries built from them
//! - `export`: reorder candidates and the purchase-list CSV
//! - `response`: JSON shapes served to the chart widgets, including their
//!   failure forms

pub mod aggregator;
pub mod export;
pub mod response;

pub use aggregator::{
    AlertEntry, AnalyticsSummary, Audience, CategoryRow, CategoryTotals, DashboardSummary,
    PartListing, PartsOverview, RankingBasis, ReportAggregator, ReportError, SalesOverview,
    SalesSummary, StockStatus, TopSeller, TopSellers,
    category_breakdown, sales_revenue, stock_value, top_selling_parts,
};
pub use export::{EXPORT_FILENAME, EXPORT_HEADER, ExportError, PurchaseListExporter, PurchaseRow};
pub use response::{StockStatusResponse, TopSellersResponse};
