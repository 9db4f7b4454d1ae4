//! Rendering seam between the assembled quote and the printed document.

pub mod format;
pub mod json;

use async_trait::async_trait;
use thiserror::Error;

use pricey_quoting::PrintableQuote;

pub use json::JsonRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document conversion failed: {0}")]
    Conversion(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

/// Turns a printable quote into a document (HTML, JSON, ...).
pub trait QuoteRenderer: Send + Sync {
    /// MIME type of the rendered bytes.
    fn content_type(&self) -> &'static str;

    fn render(&self, quote: &PrintableQuote) -> Result<Vec<u8>, RenderError>;
}

/// Converts a rendered document into its final printable form (e.g. PDF).
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert(&self, document: Vec<u8>) -> Result<Vec<u8>, RenderError>;
}
