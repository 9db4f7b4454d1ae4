use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use uuid::Uuid;

use pricey_core::{AdjustmentId, ContactId, ImageId, LineItemId, QuoteId, TenantId};
use pricey_quoting::{Adjustment, Contact, Image, LineItem, Quote};

use super::r#trait::{CatalogStore, QuoteSnapshot, StoreError};

#[derive(Debug, Clone, Default)]
struct TenantCatalog {
    quotes: HashMap<QuoteId, Quote>,
    line_items: HashMap<LineItemId, LineItem>,
    adjustments: HashMap<AdjustmentId, Adjustment>,
    contacts: HashMap<ContactId, Contact>,
    images: HashMap<ImageId, Image>,
    /// Record ids whose reads fail with a backend error.
    failing: HashSet<Uuid>,
}

/// In-memory, tenant-isolated catalog.
///
/// Intended for tests/dev. Snapshots share the tenant's data copy-on-write,
/// so writes made after `read_transaction` are invisible to an open snapshot.
/// Reads can be slowed down (`with_read_delay`) or made to fail
/// (`fail_reads_of`).
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    tenants: RwLock<HashMap<TenantId, Arc<TenantCatalog>>>,
    #[cfg(test)]
    reads: Arc<accounting::ReadLog>,
    read_delay: Option<Duration>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opening a transaction and every snapshot read sleep for `delay`
    /// before answering.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    fn write(&self, tenant_id: TenantId, f: impl FnOnce(&mut TenantCatalog)) -> Result<(), StoreError> {
        let mut tenants = self
            .tenants
            .write()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))?;
        f(Arc::make_mut(tenants.entry(tenant_id).or_default()));
        Ok(())
    }

    pub fn insert_quote(&self, tenant_id: TenantId, quote: Quote) -> Result<(), StoreError> {
        self.write(tenant_id, |c| {
            c.quotes.insert(quote.id, quote);
        })
    }

    pub fn insert_line_item(&self, tenant_id: TenantId, item: LineItem) -> Result<(), StoreError> {
        self.write(tenant_id, |c| {
            c.line_items.insert(item.id, item);
        })
    }

    pub fn insert_adjustment(&self, tenant_id: TenantId, adjustment: Adjustment) -> Result<(), StoreError> {
        self.write(tenant_id, |c| {
            c.adjustments.insert(adjustment.id, adjustment);
        })
    }

    pub fn insert_contact(&self, tenant_id: TenantId, contact: Contact) -> Result<(), StoreError> {
        self.write(tenant_id, |c| {
            c.contacts.insert(contact.id, contact);
        })
    }

    pub fn insert_image(&self, tenant_id: TenantId, image: Image) -> Result<(), StoreError> {
        self.write(tenant_id, |c| {
            c.images.insert(image.id, image);
        })
    }

    /// Make every read of the record `id` fail with a backend error.
    pub fn fail_reads_of(&self, tenant_id: TenantId, id: impl Into<Uuid>) -> Result<(), StoreError> {
        let key = id.into();
        self.write(tenant_id, |c| {
            c.failing.insert(key);
        })
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    type Snapshot = InMemorySnapshot;

    async fn read_transaction(&self, tenant_id: TenantId) -> Result<InMemorySnapshot, StoreError> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        let catalog = self
            .tenants
            .read()
            .map_err(|_| StoreError::Unavailable("catalog lock poisoned".to_string()))?
            .get(&tenant_id)
            .cloned()
            .unwrap_or_default();

        Ok(InMemorySnapshot {
            tenant_id,
            catalog,
            #[cfg(test)]
            reads: Arc::clone(&self.reads),
            read_delay: self.read_delay,
        })
    }
}

/// Frozen view of one tenant's catalog.
#[derive(Debug, Clone)]
pub struct InMemorySnapshot {
    tenant_id: TenantId,
    catalog: Arc<TenantCatalog>,
    #[cfg(test)]
    reads: Arc<accounting::ReadLog>,
    read_delay: Option<Duration>,
}

impl InMemorySnapshot {
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    async fn read<T: Clone>(
        &self,
        key: Uuid,
        lookup: impl FnOnce(&TenantCatalog) -> Option<&T>,
    ) -> Result<Option<T>, StoreError> {
        #[cfg(test)]
        let _in_flight = self.reads.enter(key);
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if self.catalog.failing.contains(&key) {
            return Err(StoreError::Backend(anyhow!(
                "read of {key} failed for tenant {}",
                self.tenant_id
            )));
        }
        Ok(lookup(&self.catalog).cloned())
    }
}

#[async_trait]
impl QuoteSnapshot for InMemorySnapshot {
    async fn get_quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        self.read(id.into(), |c| c.quotes.get(&id)).await
    }

    async fn get_line_item(&self, id: LineItemId) -> Result<Option<LineItem>, StoreError> {
        self.read(id.into(), |c| c.line_items.get(&id)).await
    }

    async fn get_adjustment(&self, id: AdjustmentId) -> Result<Option<Adjustment>, StoreError> {
        self.read(id.into(), |c| c.adjustments.get(&id)).await
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<Contact>, StoreError> {
        self.read(id.into(), |c| c.contacts.get(&id)).await
    }

    async fn get_image_url(&self, id: ImageId) -> Result<Option<String>, StoreError> {
        let image = self.read(id.into(), |c| c.images.get(&id)).await?;
        Ok(image.map(|image| image.url).filter(|url| !url.is_empty()))
    }
}


#[cfg(test)]
impl InMemoryCatalogStore {
    /// How many times the record `id` has been read, across all snapshots.
    pub(crate) fn reads_of(&self, id: impl Into<Uuid>) -> usize {
        self.reads.of(id.into())
    }

    pub(crate) fn total_reads(&self) -> usize {
        self.reads.total()
    }

    /// Highest number of reads that were in progress at the same time.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.reads.peak()
    }
}
