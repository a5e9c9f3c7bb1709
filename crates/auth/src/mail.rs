//! Credential delivery.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("mail delivery failed: {0}")]
pub struct DeliveryError(pub String);

/// Outbound mail transport.
pub trait MailDelivery: Send + Sync {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), DeliveryError>;
}

impl<M> MailDelivery for Arc<M>
where
    M: MailDelivery + ?Sized,
{
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), DeliveryError> {
        (**self).send(subject, body, recipient)
    }
}

/// Presentation values injected from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub site_name: String,
    pub login_url: String,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            site_name: "PartsTrack".to_string(),
            login_url: "http://localhost:8080/login".to_string(),
        }
    }
}

/// Subject and body of the one-time credential notice sent at provisioning.
pub(crate) fn credential_notice(
    branding: &Branding,
    first_name: &str,
    username: &str,
    secret: &str,
) -> (String, String) {
    let subject = format!("Your {} login credentials", branding.site_name);
    let body = format!(
        "Hello {first_name},\n\n\
         Your {site} employee account has been created.\n\n\
         Login URL: {url}\n\
         Username: {username}\n\
         Password: {secret}\n\n\
         Please log in and change your password after your first login.",
        site = branding.site_name,
        url = branding.login_url,
    );
    (subject, body)
}
