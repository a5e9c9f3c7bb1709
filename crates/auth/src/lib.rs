//! `partstrack-auth`: account lifecycle (authentication, role resync,
//! employee provisioning, deactivation and forced password change).
//!
//! This crate is intentionally decoupled from HTTP and storage: persistence,
//! sessions and mail delivery are reached through the contracts in [`store`],
//! [`session`] and [`mail`].

pub mod credential;
pub mod lifecycle;
pub mod mail;
pub mod principal;
pub mod roles;
pub mod session;
pub mod store;

pub use credential::{CredentialError, CredentialHasher, HashingConfig, generate_secret};
pub use lifecycle::{
    AccountLifecycleManager, AuthError, AuthOutcome, DeactivationError, EmployeeUpdateError,
    LifecycleConfig, ProvisionError, ProvisionRequest, ProvisionedAccount, SessionPrincipal,
    ValidationError,
};
pub use mail::{Branding, DeliveryError, MailDelivery};
pub use principal::{Account, AccountProfile, ContactUpdate, Principal};
pub use roles::{Role, profile_consistent, resolve_role};
pub use session::{SessionStore, SessionToken};
pub use store::{AccountStore, IdentityStore, ProfileStore, StoreError};
