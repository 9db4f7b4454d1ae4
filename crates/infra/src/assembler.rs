//! Printable-quote assembly entry point.
//!
//! Opens a read transaction, loads the quote, resolves its references and
//! hands everything to the pure pipeline in `pricey-quoting`. The fetch phase,
//! opening the transaction included, honours the caller's cancellation token
//! and one deadline.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use pricey_core::{QuoteId, TenantId};
use pricey_quoting::{PrintableQuote, Quote, ResolvedReferences};

use crate::config::AssemblerConfig;
use crate::resolver::ReferenceResolver;
use crate::store::{CatalogStore, QuoteSnapshot, StoreError};

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("quote not found: {0}")]
    QuoteNotFound(QuoteId),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("assembly cancelled")]
    Cancelled,

    #[error("reference fetch timed out after {0:?}")]
    TimedOut(Duration),
}

/// Per-call context: which tenant is asking, and a way to stop the call.
#[derive(Debug, Clone)]
pub struct AssemblyContext {
    pub tenant_id: TenantId,
    pub cancellation: CancellationToken,
    /// Overrides the configured fetch deadline for this call.
    pub timeout: Option<Duration>,
}

impl AssemblyContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            cancellation: CancellationToken::new(),
            timeout: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub struct QuoteAssembler<S> {
    store: S,
    config: AssemblerConfig,
}

impl<S: CatalogStore> QuoteAssembler<S> {
    pub fn new(store: S, config: AssemblerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Build the printable form of `quote_id` inside one read transaction.
    ///
    /// Opening the transaction and every fetch share a single deadline.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, quote_id = %quote_id))]
    pub async fn assemble_printable_quote(
        &self,
        ctx: &AssemblyContext,
        quote_id: QuoteId,
    ) -> Result<PrintableQuote, AssemblyError> {
        let (quote, refs) = self.guarded(ctx, self.open_and_load(ctx.tenant_id, quote_id)).await?;
        Ok(self.finish(&quote, &refs))
    }

    /// Same as [`assemble_printable_quote`](Self::assemble_printable_quote),
    /// against a snapshot the caller already holds.
    pub async fn assemble_in<T>(
        &self,
        ctx: &AssemblyContext,
        snapshot: &T,
        quote_id: QuoteId,
    ) -> Result<PrintableQuote, AssemblyError>
    where
        T: QuoteSnapshot + ?Sized,
    {
        let (quote, refs) = self.guarded(ctx, self.load(snapshot, quote_id)).await?;
        Ok(self.finish(&quote, &refs))
    }

    async fn open_and_load(
        &self,
        tenant_id: TenantId,
        quote_id: QuoteId,
    ) -> Result<(Quote, ResolvedReferences), AssemblyError> {
        let snapshot = self.store.read_transaction(tenant_id).await?;
        self.load(&snapshot, quote_id).await
    }

    async fn load<T>(&self, snapshot: &T, quote_id: QuoteId) -> Result<(Quote, ResolvedReferences), AssemblyError>
    where
        T: QuoteSnapshot + ?Sized,
    {
        let quote = snapshot
            .get_quote(quote_id)
            .await?
            .ok_or(AssemblyError::QuoteNotFound(quote_id))?;
        let refs = ReferenceResolver::new(snapshot, self.config.fetch_concurrency)
            .resolve(&quote)
            .await?;
        debug!(
            line_items = refs.line_items.len(),
            adjustments = refs.adjustments.len(),
            images = refs.images.len(),
            "references resolved"
        );
        Ok((quote, refs))
    }

    fn finish(&self, quote: &Quote, refs: &ResolvedReferences) -> PrintableQuote {
        let printable = pricey_quoting::assemble(quote, refs);
        info!(
            line_items = printable.all_line_items().count(),
            sub_total = %printable.sub_total,
            total = %printable.total,
            "assembled printable quote"
        );
        printable
    }

    /// Run `work` unless the caller cancels or the deadline passes first.
    async fn guarded<T>(
        &self,
        ctx: &AssemblyContext,
        work: impl Future<Output = Result<T, AssemblyError>>,
    ) -> Result<T, AssemblyError> {
        let deadline = ctx.timeout.or(self.config.fetch_timeout);
        let bounded = async {
            match deadline {
                Some(limit) => tokio::time::timeout(limit, work)
                    .await
                    .map_err(|_| AssemblyError::TimedOut(limit))?,
                None => work.await,
            }
        };

        tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => Err(AssemblyError::Cancelled),
            result = bounded => result,
        }
    }
}
