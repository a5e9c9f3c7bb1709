//! JSON bodies for the chart endpoints.
//!
//! Both shapes keep a stable layout on failure so the widgets can still
//! render something.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::aggregator::{RankingBasis, ReportError, StockStatus, TopSellers};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StockStatusResponse {
    Ready {
        in_stock: usize,
        low_stock: usize,
        out_of_stock: usize,
        total: usize,
        timestamp: String,
        success: bool,
    },
    Failed {
        error: String,
        success: bool,
    },
}

impl StockStatusResponse {
    pub fn from_result(result: Result<StockStatus, ReportError>, now: DateTime<Utc>) -> Self {
        match result {
            Ok(status) => StockStatusResponse::Ready {
                in_stock: status.in_stock,
                low_stock: status.low_stock,
                out_of_stock: status.out_of_stock,
                total: status.total,
                timestamp: timestamp(now),
                success: true,
            },
            Err(err) => {
                warn!(error = %err, "stock status unavailable");
                StockStatusResponse::Failed {
                    error: err.to_string(),
                    success: false,
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StockStatusResponse::Ready { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TopSellersResponse {
    Ready {
        labels: Vec<String>,
        quantities: Vec<u64>,
        categories: Vec<String>,
        basis: RankingBasis,
        timestamp: String,
        success: bool,
    },
    Failed {
        error: String,
        labels: Vec<String>,
        quantities: Vec<u64>,
        success: bool,
    },
}

impl TopSellersResponse {
    pub fn from_result(result: Result<TopSellers, ReportError>, now: DateTime<Utc>) -> Self {
        match result {
            Ok(top) if top.entries.is_empty() => TopSellersResponse::Ready {
                labels: vec!["No data".to_string()],
                quantities: vec![0],
                categories: vec![String::new()],
                basis: top.basis,
                timestamp: timestamp(now),
                success: true,
            },
            Ok(top) => {
                let mut labels = Vec::with_capacity(top.entries.len());
                let mut quantities = Vec::with_capacity(top.entries.len());
                let mut categories = Vec::with_capacity(top.entries.len());
                for entry in top.entries {
                    labels.push(entry.part_name);
                    quantities.push(entry.quantity);
                    categories.push(entry.category);
                }
                TopSellersResponse::Ready {
                    labels,
                    quantities,
                    categories,
                    basis: top.basis,
                    timestamp: timestamp(now),
                    success: true,
                }
            }
            Err(err) => {
                warn!(error = %err, "top sellers unavailable");
                TopSellersResponse::Failed {
                    error: err.to_string(),
                    labels: vec!["Error".to_string()],
                    quantities: vec![0],
                    success: false,
                }
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TopSellersResponse::Ready { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::TopSeller;
    use chrono::TimeZone;
    use partstrack_core::PartId;
    use serde_json::json;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn stock_status_success_shape() {
        let status = StockStatus {
            in_stock: 1,
            low_stock: 2,
            out_of_stock: 3,
            total: 6,
        };
        let body = serde_json::to_value(StockStatusResponse::from_result(Ok(status), now())).unwrap();
        assert_eq!(
            body,
            json!({
                "in_stock": 1,
                "low_stock": 2,
                "out_of_stock": 3,
                "total": 6,
                "timestamp": "2024-03-09 14:05:07",
                "success": true
            })
        );
    }

    #[test]
    fn stock_status_failure_shape() {
        let resp = StockStatusResponse::from_result(
            Err(ReportError::AggregationFailure("db down".to_string())),
            now(),
        );
        assert!(!resp.is_success());
        let body = serde_json::to_value(resp).unwrap();
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("db down"));
        assert!(body.get("total").is_none());
    }

    #[test]
    fn empty_top_sellers_render_placeholder() {
        let top = TopSellers {
            basis: RankingBasis::Stock,
            entries: vec![],
        };
        let body = serde_json::to_value(TopSellersResponse::from_result(Ok(top), now())).unwrap();
        assert_eq!(body["labels"], json!(["No data"]));
        assert_eq!(body["quantities"], json!([0]));
        assert_eq!(body["categories"], json!([""]));
        assert_eq!(body["success"], json!(true));
    }

    #[test]
    fn top_sellers_list_names_and_quantities() {
        let top = TopSellers {
            basis: RankingBasis::Sales,
            entries: vec![
                TopSeller {
                    part_id: PartId::from_uuid(Uuid::from_u128(1)),
                    part_name: "Filter".to_string(),
                    category: "Engine".to_string(),
                    quantity: 9,
                },
                TopSeller {
                    part_id: PartId::from_uuid(Uuid::from_u128(2)),
                    part_name: "Belt".to_string(),
                    category: String::new(),
                    quantity: 4,
                },
            ],
        };
        let body = serde_json::to_value(TopSellersResponse::from_result(Ok(top), now())).unwrap();
        assert_eq!(body["labels"], json!(["Filter", "Belt"]));
        assert_eq!(body["quantities"], json!([9, 4]));
        assert_eq!(body["categories"], json!(["Engine", ""]));
        assert_eq!(body["basis"], json!("sales"));
        assert_eq!(body["timestamp"], json!("2024-03-09 14:05:07"));
    }

    #[test]
    fn top_sellers_failure_shape() {
        let resp = TopSellersResponse::from_result(
            Err(ReportError::AggregationFailure("boom".to_string())),
            now(),
        );
        let body = serde_json::to_value(resp).unwrap();
        assert_eq!(body["labels"], json!(["Error"]));
        assert_eq!(body["quantities"], json!([0]));
        assert_eq!(body["success"], json!(false));
    }
}
