use std::sync::Arc;

use serde::{Deserialize, Serialize};

use partstrack_core::PrincipalId;

use crate::StoreError;

/// Opaque bearer token identifying an open session.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Server-side session registry.
pub trait SessionStore: Send + Sync {
    fn open(&self, token: SessionToken, principal_id: PrincipalId) -> Result<(), StoreError>;
    fn resolve(&self, token: &SessionToken) -> Result<Option<PrincipalId>, StoreError>;
    /// Revoke one session. Revoking an unknown token is not an error.
    fn revoke(&self, token: &SessionToken) -> Result<(), StoreError>;
    /// Revoke every session of a principal, returning how many were open.
    fn revoke_all(&self, principal_id: PrincipalId) -> Result<usize, StoreError>;
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn open(&self, token: SessionToken, principal_id: PrincipalId) -> Result<(), StoreError> {
        (**self).open(token, principal_id)
    }

    fn resolve(&self, token: &SessionToken) -> Result<Option<PrincipalId>, StoreError> {
        (**self).resolve(token)
    }

    fn revoke(&self, token: &SessionToken) -> Result<(), StoreError> {
        (**self).revoke(token)
    }

    fn revoke_all(&self, principal_id: PrincipalId) -> Result<usize, StoreError> {
        (**self).revoke_all(principal_id)
    }
}
