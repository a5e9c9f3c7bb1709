//! Infrastructure layer: in-memory stores, mail transports, config.

pub mod config;
pub mod mail;
pub mod seed;
pub mod store;


pub use config::{AppConfig, BootstrapAdmin, ConfigError, LogFormat};
pub use mail::{FailingMailer, RecordingMailer, SentMail, TracingMailer};
pub use store::{InMemoryAccountStore, InMemoryCatalog, InMemorySessionStore};
