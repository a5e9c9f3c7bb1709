//! Credential hashing (Argon2id) and random secret generation.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::{Rng, RngCore, distributions::Alphanumeric, rngs::OsRng};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),

    #[error("failed to hash credential: {0}")]
    Hash(String),

    #[error("stored credential is malformed: {0}")]
    Malformed(String),
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    pub memory_cost: u32,
    /// Iterations.
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19 * 1024,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

impl HashingConfig {
    /// Cheap parameters for tests. Never use in production.
    pub fn testing() -> Self {
        Self {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }
}

/// Hashes and verifies secrets as PHC strings.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    /// Hash of a random secret, verified against when no principal matches so
    /// unknown identifiers cost the same Argon2 work as wrong secrets.
    decoy: String,
}

impl core::fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CredentialHasher").finish_non_exhaustive()
    }
}

impl CredentialHasher {
    pub fn new(config: HashingConfig) -> Result<Self, CredentialError> {
        let params = Params::new(config.memory_cost, config.time_cost, config.parallelism, None)
            .map_err(|e| CredentialError::Params(e.to_string()))?;
        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: String::new(),
        };
        hasher.decoy = hasher.hash(&generate_secret(32))?;
        Ok(hasher)
    }

    pub fn hash(&self, secret: &str) -> Result<String, CredentialError> {
        let mut salt_bytes = [0u8; 16];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| CredentialError::Hash(e.to_string()))?;

        let hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash cannot be parsed.
    pub fn verify(&self, secret: &str, stored: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored).map_err(|e| CredentialError::Malformed(e.to_string()))?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("credential mismatch");
                Ok(false)
            }
            Err(e) => Err(CredentialError::Malformed(e.to_string())),
        }
    }

    /// Spend one verification on the decoy hash. Always a mismatch.
    pub fn verify_decoy(&self, secret: &str) -> bool {
        matches!(self.verify(secret, &self.decoy), Ok(true))
    }
}

/// Random alphanumeric secret drawn from the OS CSPRNG.
///
/// Used for generated first-login credentials and session tokens.
pub fn generate_secret(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
