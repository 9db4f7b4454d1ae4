use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use pricey_core::{AdjustmentId, ContactId, ImageId, LineItemId, QuoteId, TenantId};
use pricey_quoting::{Adjustment, Contact, LineItem, Quote};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Read-only, consistent view over one tenant's catalog.
///
/// Every lookup distinguishes "not found" (`Ok(None)`) from a backend failure
/// (`Err`). Callers treat the former as a missing optional reference and the
/// latter as fatal for the whole read.
#[async_trait]
pub trait QuoteSnapshot: Send + Sync {
    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError>;
    async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>, StoreError>;
    async fn get_adjustment(&self, id: AdjustmentId) -> Result<Option<Adjustment>, StoreError>;
    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>, StoreError>;
    /// URL of the stored image. An empty URL counts as not found.
    async fn get_image_url(&self, id: ImageId) -> Result<Option<String>, StoreError>;
}

/// Source of tenant-scoped read snapshots.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    type Snapshot: QuoteSnapshot;

    /// Open a read transaction for `tenant_id`. All reads made through the
    /// returned snapshot observe the same state.
    async fn read_transaction(&self, tenant_id: TenantId) -> Result<Self::Snapshot, StoreError>;
}

#[async_trait]
impl<S> QuoteSnapshot for Arc<S>
where
    S: QuoteSnapshot + ?Sized,
{
    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        (**self).get_quote(id).await
    }

    async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>, StoreError> {
        (**self).get_line_item(id).await
    }

    async fn get_adjustment(&self, id: AdjustmentId) -> Result<Option<Adjustment>, StoreError> {
        (**self).get_adjustment(id).await
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>, StoreError> {
        (**self).get_contact(id).await
    }

    async fn get_image_url(&self, id: ImageId) -> Result<Option<String>, StoreError> {
        (**self).get_image_url(id).await
    }
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    type Snapshot = S::Snapshot;

    async fn read_transaction(&self, tenant_id: TenantId) -> Result<Self::Snapshot, StoreError> {
        (**self).read_transaction(tenant_id).await
    }
}
