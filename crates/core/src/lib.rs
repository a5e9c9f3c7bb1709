//! `partstrack-core`: shared domain building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model and exact money helpers.

pub mod error;
pub mod id;
pub mod money;

pub use error::DomainError;
pub use id::{PartId, PrincipalId, SaleId, SupplierId};
pub use money::{format_amount, line_value, Decimal};
