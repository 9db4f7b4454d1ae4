//! Quote aggregation domain module.
//!
//! Turns a quote and its resolved references into a hierarchical, fully
//! computed [`PrintableQuote`]. Everything in this crate is deterministic domain
//! logic (no IO, no async, no storage): fetching the references is the
//! resolver's job in `pricey-infra`.
//!
//! Pipeline: [`LineItemTree::build`] → [`aggregate_amounts`] →
//! [`assign_numbers`] → [`calculate_totals`] → [`PrintableQuote::compose`],
//! driven end to end by [`assemble`].

pub mod amounts;
pub mod assemble;
pub mod model;
pub mod numbering;
pub mod printable;
pub mod references;
pub mod totals;
pub mod tree;

pub use amounts::aggregate_amounts;
pub use assemble::assemble;
pub use model::{Adjustment, AdjustmentKind, Contact, Image, LineItem, Quote};
pub use numbering::assign_numbers;
pub use printable::{PrintableLineItem, PrintableQuote, QuoteHeader};
pub use references::{ReferenceRequest, ResolvedReferences};
pub use totals::{Totals, adjustment_contribution, calculate_totals};
pub use tree::{LineItemTree, NodeIndex};
