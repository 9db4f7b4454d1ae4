//! Infrastructure layer: catalog storage, reference resolution, the assembly
//! entry point, configuration and printing.

pub mod assembler;
pub mod config;
pub mod print;
pub mod render;
pub mod resolver;
pub mod store;

pub use assembler::{AssemblyContext, AssemblyError, QuoteAssembler};
pub use config::AssemblerConfig;
pub use print::{PrintError, PrintService};
pub use render::{DocumentConverter, JsonRenderer, QuoteRenderer, RenderError};
pub use resolver::ReferenceResolver;
pub use store::{CatalogStore, InMemoryCatalogStore, InMemorySnapshot, QuoteSnapshot, StoreError};
