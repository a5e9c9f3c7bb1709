//! Storage contracts for accounts.
//!
//! The backing datastore is external; it is expected to enforce username and
//! email uniqueness itself and to offer at least read-committed isolation.

use std::sync::Arc;

use thiserror::Error;

use partstrack_core::PrincipalId;

use crate::{AccountProfile, ContactUpdate, Principal, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("record not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage of principals and their credentials.
pub trait IdentityStore: Send + Sync {
    fn find(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError>;
    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError>;
    fn list_principals(&self) -> Result<Vec<Principal>, StoreError>;
    fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError>;
    fn set_credential(&self, id: PrincipalId, credential: String) -> Result<(), StoreError>;
    /// Apply name/email changes. Fails with `DuplicateEmail` if the email is taken
    /// by another principal.
    fn update_contact(&self, id: PrincipalId, update: &ContactUpdate) -> Result<(), StoreError>;
}

/// Durable storage of per-principal role and contact state.
pub trait ProfileStore: Send + Sync {
    fn profile(&self, id: PrincipalId) -> Result<Option<AccountProfile>, StoreError>;
    /// Return the profile, creating it with `role` if absent.
    fn get_or_create_profile(&self, id: PrincipalId, role: Role) -> Result<AccountProfile, StoreError>;
    fn save_profile(&self, profile: AccountProfile) -> Result<(), StoreError>;
}

/// Account storage with atomic principal + profile creation.
pub trait AccountStore: IdentityStore + ProfileStore {
    /// Insert both records or neither. Uniqueness conflicts surface as
    /// `DuplicateUsername` / `DuplicateEmail`.
    fn create_account(&self, principal: Principal, profile: AccountProfile) -> Result<(), StoreError>;

    /// Remove an account created in the same provisioning attempt (rollback).
    fn remove_account(&self, id: PrincipalId) -> Result<(), StoreError>;
}

impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    fn find(&self, id: PrincipalId) -> Result<Option<Principal>, StoreError> {
        (**self).find(id)
    }

    fn find_by_username(&self, username: &str) -> Result<Option<Principal>, StoreError> {
        (**self).find_by_username(username)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, StoreError> {
        (**self).find_by_email(email)
    }

    fn list_principals(&self) -> Result<Vec<Principal>, StoreError> {
        (**self).list_principals()
    }

    fn set_active(&self, id: PrincipalId, active: bool) -> Result<(), StoreError> {
        (**self).set_active(id, active)
    }

    fn set_credential(&self, id: PrincipalId, credential: String) -> Result<(), StoreError> {
        (**self).set_credential(id, credential)
    }

    fn update_contact(&self, id: PrincipalId, update: &ContactUpdate) -> Result<(), StoreError> {
        (**self).update_contact(id, update)
    }
}

impl<S> ProfileStore for Arc<S>
where
    S: ProfileStore + ?Sized,
{
    fn profile(&self, id: PrincipalId) -> Result<Option<AccountProfile>, StoreError> {
        (**self).profile(id)
    }

    fn get_or_create_profile(&self, id: PrincipalId, role: Role) -> Result<AccountProfile, StoreError> {
        (**self).get_or_create_profile(id, role)
    }

    fn save_profile(&self, profile: AccountProfile) -> Result<(), StoreError> {
        (**self).save_profile(profile)
    }
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn create_account(&self, principal: Principal, profile: AccountProfile) -> Result<(), StoreError> {
        (**self).create_account(principal, profile)
    }

    fn remove_account(&self, id: PrincipalId) -> Result<(), StoreError> {
        (**self).remove_account(id)
    }
}
