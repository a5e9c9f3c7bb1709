use serde::{Deserialize, Serialize};

use partstrack_core::PrincipalId;

use crate::Role;

/// An authenticable identity.
///
/// `credential` holds the Argon2 PHC string, never the plain secret.
/// Principals are never hard-deleted once delivered; deactivation clears `active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub credential: String,
    /// Top-level access. Administrators have it; provisioning never sets it.
    pub privileged: bool,
    pub active: bool,
}

impl Principal {
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Role and contact state attached one-to-one to a [`Principal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub principal_id: PrincipalId,
    pub role: Role,
    pub must_change_password: bool,
    pub mobile_number: Option<String>,
    pub department: Option<String>,
}

impl AccountProfile {
    pub fn new(principal_id: PrincipalId, role: Role) -> Self {
        Self {
            principal_id,
            role,
            must_change_password: false,
            mobile_number: None,
            department: None,
        }
    }
}

/// A principal together with its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub principal: Principal,
    pub profile: AccountProfile,
}

/// Contact fields an administrator may edit on an existing account.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
}
