//! Configuration loading and representation.
//!
//! Defaults first, then `PARTSTRACK_*` environment overrides. The loaded value
//! is passed explicitly to whoever needs it.

use std::env;

use thiserror::Error;

use partstrack_auth::{Branding, LifecycleConfig};

pub use partstrack_observability::LogFormat;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Credentials for the first administrator, created at startup when none exists.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub site_name: String,
    pub login_url: String,
    pub mail_sender: String,
    pub credential_length: usize,
    /// Require requested purchase quantities to be non-negative integers.
    pub strict_reorder_quantities: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub log_format: LogFormat,
    /// Load a small demo catalog at startup.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let branding = Branding::default();
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            site_name: branding.site_name,
            login_url: branding.login_url,
            mail_sender: "no-reply@partstrack.local".to_string(),
            credential_length: LifecycleConfig::default().credential_length,
            strict_reorder_quantities: false,
            bootstrap_admin: None,
            log_format: LogFormat::default(),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("PARTSTRACK_BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Some(v) = get("PARTSTRACK_SITE_NAME") {
            config.site_name = v;
        }
        if let Some(v) = get("PARTSTRACK_LOGIN_URL") {
            config.login_url = v;
        }
        if let Some(v) = get("PARTSTRACK_MAIL_SENDER") {
            config.mail_sender = v;
        }
        if let Some(v) = get("PARTSTRACK_CREDENTIAL_LENGTH") {
            let length: usize = v.parse().map_err(|_| ConfigError::Invalid {
                key: "PARTSTRACK_CREDENTIAL_LENGTH",
                message: format!("expected a positive integer, got {v:?}"),
            })?;
            if length < 8 {
                return Err(ConfigError::Invalid {
                    key: "PARTSTRACK_CREDENTIAL_LENGTH",
                    message: "must be at least 8".to_string(),
                });
            }
            config.credential_length = length;
        }
        if let Some(v) = get("PARTSTRACK_STRICT_REORDER_QUANTITIES") {
            config.strict_reorder_quantities = parse_flag("PARTSTRACK_STRICT_REORDER_QUANTITIES", &v)?;
        }
        if let Some(v) = get("PARTSTRACK_SEED_DEMO_DATA") {
            config.seed_demo_data = parse_flag("PARTSTRACK_SEED_DEMO_DATA", &v)?;
        }
        if let Some(v) = get("PARTSTRACK_LOG_FORMAT") {
            config.log_format = v.parse().map_err(|message| ConfigError::Invalid {
                key: "PARTSTRACK_LOG_FORMAT",
                message,
            })?;
        }

        config.bootstrap_admin = match (
            get("PARTSTRACK_ADMIN_USERNAME"),
            get("PARTSTRACK_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin {
                username,
                email: get("PARTSTRACK_ADMIN_EMAIL").unwrap_or_default(),
                password,
            }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "PARTSTRACK_ADMIN_USERNAME",
                    message: "username and password must be set together".to_string(),
                });
            }
        };

        Ok(config)
    }

    pub fn branding(&self) -> Branding {
        Branding {
            site_name: self.site_name.clone(),
            login_url: self.login_url.clone(),
        }
    }

    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig {
            credential_length: self.credential_length,
            branding: self.branding(),
        }
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            message: format!("expected a boolean, got {value:?}"),
        }),
    }
}
