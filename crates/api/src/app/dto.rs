use std::collections::HashMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use partstrack_auth::{Account, AuthOutcome, ProvisionedAccount, Role};
use partstrack_core::{PartId, PrincipalId};
use partstrack_inventory::{Part, StockLevel, Supplier, classify};
use partstrack_reporting::{AnalyticsSummary, DashboardSummary};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChangeRequest {
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopPartsQuery {
    pub limit: Option<usize>,
}

/// Requested purchase quantities keyed by part id.
#[derive(Debug, Default, Deserialize)]
pub struct PurchaseListRequest {
    #[serde(default)]
    pub quantities: HashMap<String, String>,
}

impl PurchaseListRequest {
    pub fn parse(self) -> Result<HashMap<PartId, String>, axum::response::Response> {
        self.quantities
            .into_iter()
            .map(|(id, qty)| {
                id.parse::<PartId>()
                    .map(|id| (id, qty))
                    .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", e.to_string()))
            })
            .collect()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub principal_id: PrincipalId,
    pub username: String,
    pub role: Role,
    pub must_change_password: bool,
    /// Where the client should go next.
    pub next: &'static str,
}

impl From<AuthOutcome> for LoginResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            token: outcome.session.as_str().to_string(),
            principal_id: outcome.principal.id,
            username: outcome.principal.username,
            role: outcome.role,
            must_change_password: outcome.must_change_password,
            next: if outcome.must_change_password {
                "/force-password-change"
            } else {
                "/dashboard"
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: Option<String>,
    pub role: Role,
    pub active: bool,
    pub must_change_password: bool,
}

impl From<Account> for EmployeeResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.principal.id,
            username: account.principal.username,
            email: account.principal.email,
            first_name: account.principal.first_name,
            last_name: account.principal.last_name,
            mobile_number: account.profile.mobile_number,
            role: account.profile.role,
            active: account.principal.active,
            must_change_password: account.profile.must_change_password,
        }
    }
}

/// Returned once, right after provisioning; the credential is not retrievable later.
#[derive(Debug, Serialize)]
pub struct ProvisionResponse {
    pub id: PrincipalId,
    pub username: String,
    pub credential: String,
}

impl From<ProvisionedAccount> for ProvisionResponse {
    fn from(p: ProvisionedAccount) -> Self {
        Self {
            id: p.principal_id,
            username: p.username,
            credential: p.credential,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub site_name: String,
    pub display_name: String,
    pub role: Role,
    #[serde(flatten)]
    pub summary: DashboardSummary,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub site_name: String,
    #[serde(flatten)]
    pub summary: AnalyticsSummary,
}

#[derive(Debug, Serialize)]
pub struct PurchaseCandidate {
    pub part_id: PartId,
    pub part_number: String,
    pub part_name: String,
    pub quantity: u32,
    pub minimum_stock: u32,
    pub level: StockLevel,
}

impl From<&Part> for PurchaseCandidate {
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

#[derive(Debug, Serialize)]
pub struct SuppliersResponse {
    pub total_suppliers: usize,
    pub suppliers: Vec<Supplier>,
}

impl From<Vec<Supplier>> for SuppliersResponse {
    fn from(suppliers: Vec<Supplier>) -> Self {
        Self {
            total_suppliers: suppliers.len(),
            suppliers,
        }
    }
}
