//! Output model handed to the render collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricey_core::{Amount, LineItemId, Quantity, QuoteId};

use crate::model::{Adjustment, Contact, Image, LineItem, Quote};
use crate::totals::Totals;

/// A computed line item with its nested sub-items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintableLineItem {
    pub id: LineItemId,
    /// Nesting depth; top-level items are `0`.
    pub depth: u32,
    /// Hierarchical number such as `"2"` or `"3.1"`.
    pub number: String,
    /// Children in declaration order.
    pub sub_items: Vec<PrintableLineItem>,
    pub image: Option<Image>,
    pub description: String,
    pub quantity: Quantity,
    pub quantity_prefix: String,
    pub quantity_suffix: String,
    pub unit_price: Amount,
    pub unit_price_prefix: String,
    pub unit_price_suffix: String,
    /// `true` when `amount` came from an override or quantity × unit price
    /// rather than from the children.
    pub amount_overridden: bool,
    pub amount: Amount,
    pub amount_prefix: String,
    pub amount_suffix: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl PrintableLineItem {
    /// Copy the display fields of `source`; computed fields start empty.
    pub fn from_line_item(source: &LineItem, image: Option<Image>) -> Self {
        Self {
            id: source.id,
            depth: 0,
            number: String::new(),
            sub_items: Vec::new(),
            image,
            description: source.description.clone(),
            quantity: source.quantity,
            quantity_prefix: source.quantity_prefix.clone(),
            quantity_suffix: source.quantity_suffix.clone(),
            unit_price: source.unit_price,
            unit_price_prefix: source.unit_price_prefix.clone(),
            unit_price_suffix: source.unit_price_suffix.clone(),
            amount_overridden: false,
            amount: Amount::ZERO,
            amount_prefix: source.amount_prefix.clone(),
            amount_suffix: source.amount_suffix.clone(),
            created: source.created,
            updated: source.updated,
        }
    }

    /// Depth-first iterator over this item and all of its descendants.
    pub fn walk(&self) -> impl Iterator<Item = &PrintableLineItem> {
        let mut stack = vec![self];
        core::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.sub_items.iter().rev());
            Some(next)
        })
    }
}

// Nesting depth is user data; unwind it with a heap stack, not drop glue.
impl Drop for PrintableLineItem {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.sub_items);
        while let Some(mut item) = pending.pop() {
            pending.append(&mut item.sub_items);
        }
    }
}

/// A fully resolved, computed quote ready for template rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintableQuote {
    pub id: QuoteId,
    pub code: String,
    pub order_number: String,
    pub logo: Option<Image>,
    pub primary_background_color: String,
    pub primary_text_color: String,
    pub issue_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub payment_terms: String,
    pub notes: String,
    pub sender: Option<Contact>,
    pub bill_to: Option<Contact>,
    pub ship_to: Option<Contact>,
    pub line_items: Vec<PrintableLineItem>,
    pub sub_total: Amount,
    pub adjustments: Vec<Adjustment>,
    pub total: Amount,
    pub balance_due: Amount,
    pub balance_due_on: Option<DateTime<Utc>>,
    pub pay_url: String,
    pub sent: bool,
    pub sent_on: Option<DateTime<Utc>>,
    pub sold: bool,
    pub sold_on: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub hidden: bool,
    pub locked: bool,
}

/// Resolved header references of a quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteHeader {
    pub logo: Option<Image>,
    pub sender: Option<Contact>,
    pub bill_to: Option<Contact>,
    pub ship_to: Option<Contact>,
}

impl PrintableQuote {
    /// Pure composition: copy header fields and attach already-computed parts.
    pub fn compose(
        quote: &Quote,
        header: QuoteHeader,
        line_items: Vec<PrintableLineItem>,
        adjustments: Vec<Adjustment>,
        totals: Totals,
    ) -> Self {
        Self {
            id: quote.id,
            code: quote.code.clone(),
            order_number: quote.order_number.clone(),
            logo: header.logo,
            primary_background_color: quote.primary_background_color.clone(),
            primary_text_color: quote.primary_text_color.clone(),
            issue_date: quote.issue_date,
            expiration_date: quote.expiration_date,
            payment_terms: quote.payment_terms.clone(),
            notes: quote.notes.clone(),
            sender: header.sender,
            bill_to: header.bill_to,
            ship_to: header.ship_to,
            line_items,
            sub_total: totals.sub_total,
            adjustments,
            total: totals.total,
            balance_due: totals.balance_due,
            balance_due_on: quote.balance_due_on,
            pay_url: quote.pay_url.clone(),
            sent: quote.sent,
            sent_on: quote.sent_on,
            sold: quote.sold,
            sold_on: quote.sold_on,
            created: quote.created,
            updated: quote.updated,
            hidden: quote.hidden,
            locked: quote.locked,
        }
    }

    /// Every line item of the quote, depth-first in print order.
    pub fn all_line_items(&self) -> impl Iterator<Item = &PrintableLineItem> {
        self.line_items.iter().flat_map(PrintableLineItem::walk)
    }
}
