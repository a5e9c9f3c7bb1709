use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use partstrack_auth::{
    AccountProfile, AccountStore, ContactUpdate, IdentityStore, Principal, ProfileStore, Role,
    StoreError,
};
use partstrack_core::PrincipalId;

use super::POISONED;

#[derive(Debug, Default)]
struct Tables {
    principals: HashMap<PrincipalId, Principal>,
    profiles: HashMap<PrincipalId, AccountProfile>,
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<PrincipalId>) -> bool {
        self.principals
            .values()
            .any(|p| p.username == username && Some(p.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<PrincipalId>) -> bool {
        !email.is_empty()
            && self
                .principals
                .values()
                .any(|p| p.email == email && Some(p.id) != except)
    }
}

/// In-memory account store. Username and email uniqueness are enforced under
/// the write lock.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: RwLock<Tables>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable(POISONED.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable(POISONED.to_string()))
    }

    fn with_principal<F>(&self, id: PrincipalId, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Principal),
    {
        let mut tables = self.write()?;
        let principal = tables.principals.get_mut(&id).ok_or(StoreError::NotFound)?;
        f(principal);
        Ok(())
    }
}

impl IdentityStore for InMemoryAccountStore {
    fn find(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        Ok(self.read()?.principals.get(&id).cloned())
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        Ok(self
            .read()?
            .principals
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        if email.is_empty() {
            return Ok(None);
        }
        Ok(self
            .read()?
            .principals
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    fn list_principals(&self) -> Result<Vec<Principal>, StoreError> {
        let mut out: Vec<Principal> = self.read()?.principals.values().cloned().collect();
        out.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(out)
    }

    fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError> {
        self.with_principal(id, |p| p.active = active)
    }

    fn set_credential(&self, id: PrincipalId, credential: String) -> Result<(), StoreError> {
        self.with_principal(id, |p| p.credential = credential)
    }

    fn update_contact(&self, id: PrincipalId, update: &ContactUpdate) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.principals.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if let Some(email) = &update.email {
            if tables.email_taken(email, Some(id)) {
                return Err(StoreError::DuplicateEmail);
            }
        }

        let principal = tables.principals.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(first_name) = &update.first_name {
            principal.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            principal.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            principal.email = email.clone();
        }
        Ok(())
    }
}

impl ProfileStore for InMemoryAccountStore {
    fn profile(&self, id: PrincipalId) -> Result<Option<AccountProfile>, StoreError> {
        Ok(self.read()?.profiles.get(&id).cloned())
    }

    fn get_or_create_profile(&self, id: PrincipalId, role: Role) -> Result<AccountProfile, StoreError> {
        let mut tables = self.write()?;
        if !tables.principals.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        Ok(tables
            .profiles
            .entry(id)
            .or_insert_with(|| AccountProfile::new(id, role))
            .clone())
    }

    fn save_profile(&self, profile: AccountProfile) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if !tables.principals.contains_key(&profile.principal_id) {
            return Err(StoreError::NotFound);
        }
        tables.profiles.insert(profile.principal_id, profile);
        Ok(())
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create_account(&self, principal: Principal, profile: AccountProfile) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        if tables.username_taken(&principal.username, None) {
            return Err(StoreError::DuplicateUsername);
        }
        if tables.email_taken(&principal.email, None) {
            return Err(StoreError::DuplicateEmail);
        }

        let id = principal.id;
        tables.principals.insert(id, principal);
        tables.profiles.insert(id, AccountProfile { principal_id: id, ..profile });
        Ok(())
    }

    fn remove_account(&self, id: PrincipalId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.principals.remove(&id);
        tables.profiles.remove(&id);
        Ok(())
    }
}
