use serde::{Deserialize, Serialize};

use crate::principal::{AccountProfile, Principal};

/// Access role of a principal.
///
/// The role is stored on the [`AccountProfile`] but is always derivable from
/// the principal itself; see [`resolve_role`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employee,
    Inactive,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Inactive => "inactive",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the role of a principal from its active and privilege flags.
pub fn resolve_role(principal: &Principal) -> Role {
    if !principal.active {
        Role::Inactive
    } else if principal.privileged {
        Role::Admin
    } else {
        Role::Employee
    }
}

/// Whether the stored profile role agrees with the role derived from the principal.
///
/// Holds for every account outside the login resync step; deactivation keeps it
/// because an inactive principal resolves to [`Role::Inactive`].
pub fn profile_consistent(principal: &Principal, profile: &AccountProfile) -> bool {
    profile.principal_id == principal.id && profile.role == resolve_role(principal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use partstrack_core::PrincipalId;

    fn principal(active: bool, privileged: bool) -> Principal {
        Principal {
            id: PrincipalId::new(),
            username: "pat".to_string(),
            email: "pat@example.com".to_string(),
            first_name: "Pat".to_string(),
            last_name: "Lee".to_string(),
            credential: String::new(),
            privileged,
            active,
        }
    }

    #[test]
    fn inactive_wins_over_privilege() {
        assert_eq!(resolve_role(&principal(false, true)), Role::Inactive);
        assert_eq!(resolve_role(&principal(false, false)), Role::Inactive);
    }

    #[test]
    fn active_roles_follow_privilege_flag() {
        assert_eq!(resolve_role(&principal(true, true)), Role::Admin);
        assert_eq!(resolve_role(&principal(true, false)), Role::Employee);
    }

    #[test]
    fn consistency_detects_drift() {
        let p = principal(true, true);
        let mut profile = AccountProfile::new(p.id, Role::Employee);
        assert!(!profile_consistent(&p, &profile));

        profile.role = Role::Admin;
        assert!(profile_consistent(&p, &profile));
    }

    #[test]
    fn roles_serialize_as_lowercase_names() {
        assert_eq!(serde_json::to_value(Role::Inactive).unwrap(), "inactive");
        assert_eq!(Role::Admin.to_string(), "admin");
    }
}
