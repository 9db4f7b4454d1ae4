use pricey_quoting::PrintableQuote;

use super::{QuoteRenderer, RenderError};

/// Renders the printable model as JSON.
///
/// Output is deterministic: the same quote always yields the same bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl QuoteRenderer for JsonRenderer {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn render(&self, quote: &PrintableQuote) -> Result<Vec<u8>, RenderError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(quote)?
        } else {
            serde_json::to_vec(quote)?
        };
        Ok(bytes)
    }
}
