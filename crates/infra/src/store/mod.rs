//! Catalog storage abstraction and the in-memory backend.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryCatalogStore, InMemorySnapshot};
pub use r#trait::{CatalogStore, QuoteSnapshot, StoreError};
