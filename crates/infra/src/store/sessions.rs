use std::collections::HashMap;
use std::sync::RwLock;

use partstrack_auth::{SessionStore, SessionToken, StoreError};
use partstrack_core::PrincipalId;

use super::POISONED;

/// In-memory session registry. Sessions live until revoked or process exit.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    inner: RwLock<HashMap<SessionToken, PrincipalId>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open sessions.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable(POISONED.to_string())
}

impl SessionStore for InMemorySessionStore {
    fn open(&self, token: SessionToken, principal_id: PrincipalId) -> Result<(), StoreError> {
        self.inner.write().map_err(poisoned)?.insert(token, principal_id);
        Ok(())
    }

    fn resolve(&self, token: &SessionToken) -> Result<Option<PrincipalId>, StoreError> {
        Ok(self.inner.read().map_err(poisoned)?.get(token).copied())
    }

    fn revoke(&self, token: &SessionToken) -> Result<(), StoreError> {
        self.inner.write().map_err(poisoned)?.remove(token);
        Ok(())
    }

    fn revoke_all(&self, principal_id: PrincipalId) -> Result<usize, StoreError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        let before = map.len();
        map.retain(|_, owner| *owner != principal_id);
        Ok(before - map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_resolve_revoke() {
        let store = InMemorySessionStore::new();
        let owner = PrincipalId::new();
        let token = SessionToken::new("abc");

        store.open(token.clone(), owner).unwrap();
        assert_eq!(store.resolve(&token).unwrap(), Some(owner));

        store.revoke(&token).unwrap();
        assert_eq!(store.resolve(&token).unwrap(), None);
        store.revoke(&token).unwrap();
    }

    #[test]
    fn revoke_all_only_touches_owner() {
        let store = InMemorySessionStore::new();
        let alice = PrincipalId::new();
        let bob = PrincipalId::new();
        store.open(SessionToken::new("a1"), alice).unwrap();
        store.open(SessionToken::new("a2"), alice).unwrap();
        store.open(SessionToken::new("b1"), bob).unwrap();

        assert_eq!(store.revoke_all(alice).unwrap(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(&SessionToken::new("b1")).unwrap(), Some(bob));
    }
}
