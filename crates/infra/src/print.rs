//! Quote printing: assemble, render, and optionally convert.

use thiserror::Error;
use tracing::{debug, instrument};

use pricey_core::QuoteId;

use crate::assembler::{AssemblyContext, AssemblyError, QuoteAssembler};
use crate::render::{DocumentConverter, QuoteRenderer, RenderError};
use crate::store::CatalogStore;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub struct PrintService<S, R, C> {
    assembler: QuoteAssembler<S>,
    renderer: R,
    converter: C,
}

impl<S, R, C> PrintService<S, R, C>
where
    S: CatalogStore,
    R: QuoteRenderer,
    C: DocumentConverter,
{
    pub fn new(assembler: QuoteAssembler<S>, renderer: R, converter: C) -> Self {
        Self {
            assembler,
            renderer,
            converter,
        }
    }

    /// The rendered document, before conversion.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, quote_id = %quote_id))]
    pub async fn print_html(&self, ctx: &AssemblyContext, quote_id: QuoteId) -> Result<Vec<u8>, PrintError> {
        let quote = self.assembler.assemble_printable_quote(ctx, quote_id).await?;
        let document = self.renderer.render(&quote)?;
        debug!(
            bytes = document.len(),
            content_type = self.renderer.content_type(),
            "quote rendered"
        );
        Ok(document)
    }

    /// The rendered document passed through the converter.
    #[instrument(skip(self, ctx), fields(tenant_id = %ctx.tenant_id, quote_id = %quote_id))]
    pub async fn print_pdf(&self, ctx: &AssemblyContext, quote_id: QuoteId) -> Result<Vec<u8>, PrintError> {
        let document = self.print_html(ctx, quote_id).await?;
        let converted = self.converter.convert(document).await?;
        debug!(bytes = converted.len(), "quote converted");
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssemblerConfig;
    use crate::render::JsonRenderer;
    use crate::store::InMemoryCatalogStore;
    use async_trait::async_trait;
    use pricey_core::{LineItemId, TenantId};
    use pricey_quoting::{LineItem, Quote};

    /// Prefixes the document with a PDF magic header.
    struct StampConverter;

    #[async_trait]
    impl DocumentConverter for StampConverter {
        async fn convert(&self, document: Vec<u8>) -> Result<Vec<u8>, RenderError> {
            let mut out = b"%PDF-".to_vec();
            out.extend(document);
            Ok(out)
        }
    }

    struct BrokenConverter;

    #[async_trait]
    impl DocumentConverter for BrokenConverter {
        async fn convert(&self, _document: Vec<u8>) -> Result<Vec<u8>, RenderError> {
            Err(RenderError::Conversion("converter offline".to_string()))
        }
    }

    fn seeded() -> (InMemoryCatalogStore, TenantId, QuoteId) {
        let store = InMemoryCatalogStore::new();
        let tenant = TenantId::new();
        let mut quote = Quote::new(QuoteId::new());
        let item = LineItem::new(LineItemId::new(), quote.id, "Consulting");
        quote.line_item_ids.push(item.id);
        store.insert_line_item(tenant, item).unwrap();
        store.insert_quote(tenant, quote.clone()).unwrap();
        (store, tenant, quote.id)
    }

    #[tokio::test]
    async fn pdf_is_converted_html() {
        let (store, tenant, quote_id) = seeded();
        let service = PrintService::new(
            QuoteAssembler::new(store, AssemblerConfig::default()),
            JsonRenderer::new(),
            StampConverter,
        );
        let ctx = AssemblyContext::new(tenant);

        let html = service.print_html(&ctx, quote_id).await.unwrap();
        let pdf = service.print_pdf(&ctx, quote_id).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert_eq!(&pdf[5..], html.as_slice());
    }

    #[tokio::test]
    async fn conversion_failure_is_a_render_error() {
        let (store, tenant, quote_id) = seeded();
        let service = PrintService::new(
            QuoteAssembler::new(store, AssemblerConfig::default()),
            JsonRenderer::new(),
            BrokenConverter,
        );

        let err = service
            .print_pdf(&AssemblyContext::new(tenant), quote_id)
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Render(RenderError::Conversion(_))));
    }

    #[tokio::test]
    async fn missing_quote_fails_before_rendering() {
        let (store, tenant, _) = seeded();
        let service = PrintService::new(
            QuoteAssembler::new(store, AssemblerConfig::default()),
            JsonRenderer::new(),
            StampConverter,
        );

        let err = service
            .print_html(&AssemblyContext::new(tenant), QuoteId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, PrintError::Assembly(AssemblyError::QuoteNotFound(_))));
    }
}
