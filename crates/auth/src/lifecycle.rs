//! Account lifecycle orchestration.
//!
//! `AccountLifecycleManager` composes the account store, the session registry
//! and mail delivery. It contains no IO itself; every side effect goes through
//! an injected contract, so the same code runs against in-memory stores in
//! tests and a real datastore in production.
//!
//! ```text
//! authenticate ──▶ credential check (username, then email) ──▶ role resync ──▶ session
//! provision    ──▶ uniqueness ──▶ create principal+profile ──▶ mail (rollback on failure)
//! deactivate   ──▶ admin check ──▶ active=false, role=inactive ──▶ revoke sessions
//! ```

use thiserror::Error;
use tracing::{debug, info, warn};

use partstrack_core::PrincipalId;

use crate::credential::{CredentialError, CredentialHasher, generate_secret};
use crate::mail::{Branding, MailDelivery, credential_notice};
use crate::{
    Account, AccountProfile, AccountStore, ContactUpdate, Principal, Role, SessionStore,
    SessionToken, StoreError, resolve_role,
};

const SESSION_TOKEN_LENGTH: usize = 48;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication failure.
///
/// Both credential variants render the same generic message so callers never
/// disclose which half of the credential pair was wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username/email or password")]
    InvalidCredentials,

    /// The session belongs to a principal that has since been deactivated.
    #[error("invalid username/email or password")]
    InactiveAccount,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    #[error("invalid request: {0}")]
    Invalid(String),

    #[error("username already exists")]
    DuplicateUsername,

    #[error("email already exists")]
    DuplicateEmail,

    #[error("credential delivery failed: {0}")]
    MailDeliveryFailed(String),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ProvisionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateUsername => ProvisionError::DuplicateUsername,
            StoreError::DuplicateEmail => ProvisionError::DuplicateEmail,
            other => ProvisionError::Store(other),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeactivationError {
    #[error("only administrators may deactivate accounts")]
    Forbidden,

    #[error("a super administrator cannot be deactivated")]
    CannotDeactivateSuperAdmin,

    #[error("account not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Password change failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please fill in both fields")]
    Empty,

    #[error("passwords do not match")]
    Mismatch,

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmployeeUpdateError {
    #[error("only administrators may edit accounts")]
    Forbidden,

    #[error("account not found")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EmployeeUpdateError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail => EmployeeUpdateError::DuplicateEmail,
            StoreError::NotFound => EmployeeUpdateError::NotFound,
            other => EmployeeUpdateError::Store(other),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Inputs / outputs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// Length of generated first-login credentials.
    pub credential_length: usize,
    pub branding: Branding,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            credential_length: 12,
            branding: Branding::default(),
        }
    }
}

/// Successful authentication.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub principal: Principal,
    pub role: Role,
    /// Read from the profile after the resync, so callers can branch on it.
    pub must_change_password: bool,
    pub session: SessionToken,
}

/// An open session resolved to its live principal.
#[derive(Debug, Clone)]
pub struct SessionPrincipal {
    pub token: SessionToken,
    pub principal: Principal,
    pub role: Role,
    pub must_change_password: bool,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct ProvisionRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
}

/// Result of provisioning. `credential` is the plain generated secret, handed
/// out exactly once for display.
#[derive(Clone)]
pub struct ProvisionedAccount {
    pub principal_id: PrincipalId,
    pub username: String,
    pub credential: String,
}

impl core::fmt::Debug for ProvisionedAccount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProvisionedAccount")
            .field("principal_id", &self.principal_id)
            .field("username", &self.username)
            .field("credential", &"<redacted>")
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Manager
// ─────────────────────────────────────────────────────────────────────────────

pub struct AccountLifecycleManager<A, S, M> {
    accounts: A,
    sessions: S,
    mailer: M,
    hasher: CredentialHasher,
    config: LifecycleConfig,
}

impl<A, S, M> AccountLifecycleManager<A, S, M>
where
    A: AccountStore,
    S: SessionStore,
    M: MailDelivery,
{
    pub fn new(accounts: A, sessions: S, mailer: M, hasher: CredentialHasher, config: LifecycleConfig) -> Self {
        Self {
            accounts,
            sessions,
            mailer,
            hasher,
            config,
        }
    }

    pub fn branding(&self) -> &Branding {
        &self.config.branding
    }

    /// Authenticate by username or email.
    ///
    /// The credential is first matched against `identifier` as a username; on
    /// failure the identifier is treated as an email and the match is retried
    /// with that principal's username. Inactive principals never authenticate.
    pub fn authenticate(&self, identifier: &str, secret: &str) -> Result<AuthOutcome, AuthError> {
        let identifier = identifier.trim();

        let matched = match self.match_credential(identifier, secret)? {
            Some(p) => Some(p),
            None => match self.accounts.find_by_email(identifier)? {
                Some(by_email) => self.match_credential(&by_email.username, secret)?,
                None => None,
            },
        };

        let Some(principal) = matched else {
            info!(identifier = %identifier, "login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        };

        if !principal.active {
            warn!(principal_id = %principal.id, "login rejected: account inactive");
            return Err(AuthError::InvalidCredentials);
        }

        let (role, profile) = self.resync_role(&principal)?;

        let session = SessionToken::new(generate_secret(SESSION_TOKEN_LENGTH));
        self.sessions.open(session.clone(), principal.id)?;

        info!(
            principal_id = %principal.id,
            role = %role,
            must_change_password = profile.must_change_password,
            "login succeeded"
        );

        Ok(AuthOutcome {
            principal,
            role,
            must_change_password: profile.must_change_password,
            session,
        })
    }

    /// Resolve a bearer token to its principal and live role.
    pub fn resolve_session(&self, token: &SessionToken) -> Result<SessionPrincipal, AuthError> {
        let principal_id = self
            .sessions
            .resolve(token)?
            .ok_or(AuthError::InvalidCredentials)?;

        let Some(principal) = self.accounts.find(principal_id)? else {
            self.sessions.revoke(token)?;
            return Err(AuthError::InvalidCredentials);
        };

        if !principal.active {
            self.sessions.revoke_all(principal.id)?;
            return Err(AuthError::InactiveAccount);
        }

        let profile = self.accounts.get_or_create_profile(principal.id, resolve_role(&principal))?;

        Ok(SessionPrincipal {
            token: token.clone(),
            role: resolve_role(&principal),
            must_change_password: profile.must_change_password,
            principal,
        })
    }

    pub fn logout(&self, token: &SessionToken) -> Result<(), AuthError> {
        self.sessions.revoke(token)?;
        Ok(())
    }

    /// Create an employee account and deliver its generated credential.
    ///
    /// All-or-nothing: if delivery fails, the freshly created account is removed
    /// and `MailDeliveryFailed` is returned.
    pub fn provision_employee(&self, request: ProvisionRequest) -> Result<ProvisionedAccount, ProvisionError> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_string();

        if username.is_empty() {
            return Err(ProvisionError::Invalid("username cannot be empty".to_string()));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(ProvisionError::Invalid("invalid email format".to_string()));
        }

        if self.accounts.find_by_username(&username)?.is_some() {
            return Err(ProvisionError::DuplicateUsername);
        }
        if self.accounts.find_by_email(&email)?.is_some() {
            return Err(ProvisionError::DuplicateEmail);
        }

        let secret = generate_secret(self.config.credential_length);
        let principal = Principal {
            id: PrincipalId::new(),
            username: username.clone(),
            email: email.clone(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            credential: self.hasher.hash(&secret)?,
            privileged: false,
            active: true,
        };

        let mobile = request.mobile.trim();
        let profile = AccountProfile {
            principal_id: principal.id,
            role: Role::Employee,
            must_change_password: true,
            mobile_number: (!mobile.is_empty()).then(|| mobile.to_string()),
            department: None,
        };

        let principal_id = principal.id;
        let first_name = principal.first_name.clone();

        // The store's uniqueness constraint decides races between concurrent requests.
        self.accounts.create_account(principal, profile)?;

        let (subject, body) = credential_notice(&self.config.branding, &first_name, &username, &secret);
        if let Err(e) = self.mailer.send(&subject, &body, &email) {
            warn!(principal_id = %principal_id, error = %e, "credential delivery failed; rolling back account");
            self.accounts.remove_account(principal_id)?;
            return Err(ProvisionError::MailDeliveryFailed(e.0));
        }

        info!(principal_id = %principal_id, username = %username, "employee provisioned");

        Ok(ProvisionedAccount {
            principal_id,
            username,
            credential: secret,
        })
    }

    /// Deactivate an account (soft delete). Idempotent.
    pub fn deactivate(&self, target_id: PrincipalId, acting: &Principal) -> Result<(), DeactivationError> {
        if !resolve_role(acting).is_admin() {
            warn!(acting = %acting.id, target = %target_id, "deactivation forbidden");
            return Err(DeactivationError::Forbidden);
        }

        let target = self.accounts.find(target_id)?.ok_or(DeactivationError::NotFound)?;

        if target.privileged {
            return Err(DeactivationError::CannotDeactivateSuperAdmin);
        }

        let profile = self.accounts.profile(target_id)?;
        let already_inactive =
            !target.active && profile.as_ref().is_some_and(|p| p.role == Role::Inactive);
        if already_inactive {
            debug!(target = %target_id, "deactivate: already inactive");
            return Ok(());
        }

        if target.active {
            self.accounts.set_active(target_id, false)?;
        }

        let mut profile = match profile {
            Some(p) => p,
            None => self.accounts.get_or_create_profile(target_id, Role::Inactive)?,
        };
        if profile.role != Role::Inactive {
            profile.role = Role::Inactive;
            self.accounts.save_profile(profile)?;
        }

        let revoked = self.sessions.revoke_all(target_id)?;
        info!(acting = %acting.id, target = %target_id, sessions_revoked = revoked, "account deactivated");
        Ok(())
    }

    /// Set a new credential, clear the forced-change flag and end the session.
    ///
    /// The caller must re-authenticate with the new credential afterwards.
    pub fn complete_password_change(
        &self,
        session: &SessionPrincipal,
        new_secret: &str,
        confirm_secret: &str,
    ) -> Result<(), ValidationError> {
        if new_secret.trim().is_empty() || confirm_secret.trim().is_empty() {
            return Err(ValidationError::Empty);
        }
        if new_secret != confirm_secret {
            return Err(ValidationError::Mismatch);
        }

        let principal_id = session.principal.id;
        self.accounts.set_credential(principal_id, self.hasher.hash(new_secret)?)?;

        let mut profile = self
            .accounts
            .get_or_create_profile(principal_id, resolve_role(&session.principal))?;
        if profile.must_change_password {
            profile.must_change_password = false;
            self.accounts.save_profile(profile)?;
        }

        self.sessions.revoke(&session.token)?;
        info!(principal_id = %principal_id, "password changed; session terminated");
        Ok(())
    }

    /// Edit contact fields of an existing account (administrators only).
    pub fn update_employee(
        &self,
        target_id: PrincipalId,
        acting: &Principal,
        update: ContactUpdate,
    ) -> Result<Account, EmployeeUpdateError> {
        if !resolve_role(acting).is_admin() {
            return Err(EmployeeUpdateError::Forbidden);
        }

        let target = self.accounts.find(target_id)?.ok_or(EmployeeUpdateError::NotFound)?;

        let update = ContactUpdate {
            first_name: update.first_name.map(|s| s.trim().to_string()),
            last_name: update.last_name.map(|s| s.trim().to_string()),
            email: update.email.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            mobile_number: update.mobile_number.map(|s| s.trim().to_string()),
        };

        self.accounts.update_contact(target_id, &update)?;

        let mut profile = self.accounts.get_or_create_profile(target_id, resolve_role(&target))?;
        if let Some(mobile) = &update.mobile_number {
            profile.mobile_number = (!mobile.is_empty()).then(|| mobile.clone());
            self.accounts.save_profile(profile.clone())?;
        }

        let principal = self.accounts.find(target_id)?.ok_or(EmployeeUpdateError::NotFound)?;
        info!(acting = %acting.id, target = %target_id, "employee updated");
        Ok(Account { principal, profile })
    }

    /// Accounts whose profile role is `employee`.
    pub fn list_employees(&self) -> Result<Vec<Account>, StoreError> {
        let mut out = Vec::new();
        for principal in self.accounts.list_principals()? {
            if let Some(profile) = self.accounts.profile(principal.id)? {
                if profile.role == Role::Employee {
                    out.push(Account { principal, profile });
                }
            }
        }
        out.sort_by(|a, b| a.principal.username.cmp(&b.principal.username));
        Ok(out)
    }

    /// Create the first administrator when no privileged principal exists.
    ///
    /// Returns `Ok(None)` if one is already present. This is the only path that
    /// sets the privilege flag.
    pub fn bootstrap_administrator(
        &self,
        username: &str,
        email: &str,
        secret: &str,
    ) -> Result<Option<PrincipalId>, ProvisionError> {
        if self.accounts.list_principals()?.iter().any(|p| p.privileged) {
            return Ok(None);
        }
        if username.trim().is_empty() || secret.is_empty() {
            return Err(ProvisionError::Invalid(
                "administrator username and password are required".to_string(),
            ));
        }

        let principal = Principal {
            id: PrincipalId::new(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            first_name: String::new(),
            last_name: String::new(),
            credential: self.hasher.hash(secret)?,
            privileged: true,
            active: true,
        };
        let id = principal.id;
        self.accounts.create_account(principal, AccountProfile::new(id, Role::Admin))?;

        info!(principal_id = %id, "bootstrap administrator created");
        Ok(Some(id))
    }

    fn match_credential(&self, username: &str, secret: &str) -> Result<Option<Principal>, AuthError> {
        let Some(principal) = self.accounts.find_by_username(username)? else {
            self.hasher.verify_decoy(secret);
            return Ok(None);
        };

        match self.hasher.verify(secret, &principal.credential) {
            Ok(true) => Ok(Some(principal)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!(principal_id = %principal.id, error = %e, "stored credential unusable");
                Ok(None)
            }
        }
    }

    /// Bring the stored profile role in line with the principal's flags.
    fn resync_role(&self, principal: &Principal) -> Result<(Role, AccountProfile), StoreError> {
        let role = resolve_role(principal);
        let mut profile = self.accounts.get_or_create_profile(principal.id, role)?;

        if profile.role != role {
            debug!(principal_id = %principal.id, stored = %profile.role, resolved = %role, "role drift corrected");
            profile.role = role;
            self.accounts.save_profile(profile.clone())?;
        }

        Ok((role, profile))
    }
}
