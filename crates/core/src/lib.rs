//! `pricey-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, and the fixed-point
//! arithmetic every monetary computation goes through.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AdjustmentId, ContactId, ImageId, LineItemId, QuoteId, TenantId};
pub use money::{Amount, Quantity, SCALE};
pub use value_object::ValueObject;
