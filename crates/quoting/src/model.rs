use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pricey_core::{AdjustmentId, Amount, ContactId, Entity, ImageId, LineItemId, Quantity, QuoteId};

/// A customer-facing priced document, as stored by the catalog.
///
/// The engine treats quotes as read-only input: they only reference their
/// line items, adjustments, contacts and logo by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub code: String,
    pub order_number: String,
    pub logo_id: Option<ImageId>,
    pub primary_background_color: String,
    pub primary_text_color: String,
    pub issue_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub payment_terms: String,
    pub notes: String,
    pub sender_id: Option<ContactId>,
    pub bill_to_id: Option<ContactId>,
    pub ship_to_id: Option<ContactId>,
    /// Line items in declaration order (parents and children interleaved).
    pub line_item_ids: Vec<LineItemId>,
    pub adjustment_ids: Vec<AdjustmentId>,
    /// Explicit balance due; wins over `balance_percent_due` when non-zero.
    pub balance_due: Amount,
    /// Plain percentage of the total (`50` is half).
    pub balance_percent_due: i64,
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

impl Quote {
    /// Create a blank quote with no references.
    pub fn new(id: QuoteId) -> Self {
        Self {
            id,
            code: String::new(),
            order_number: String::new(),
            logo_id: None,
            primary_background_color: String::new(),
            primary_text_color: String::new(),
            issue_date: None,
            expiration_date: None,
            payment_terms: String::new(),
            notes: String::new(),
            sender_id: None,
            bill_to_id: None,
            ship_to_id: None,
            line_item_ids: Vec::new(),
            adjustment_ids: Vec::new(),
            balance_due: Amount::ZERO,
            balance_percent_due: 0,
            balance_due_on: None,
            pay_url: String::new(),
            sent: false,
            sent_on: None,
            sold: false,
            sold_on: None,
            created: DateTime::<Utc>::default(),
            updated: DateTime::<Utc>::default(),
            hidden: false,
            locked: false,
        }
    }
}

impl Entity for Quote {
    type Id = QuoteId;

    fn id(&self) -> QuoteId {
        self.id
    }
}

/// A single priced row on a quote, possibly nested under a parent row.
///
/// `parent_id` pointers are user-editable and may form cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: LineItemId,
    pub quote_id: QuoteId,
    pub parent_id: Option<LineItemId>,
    pub image_id: Option<ImageId>,
    pub description: String,
    pub quantity: Quantity,
    pub quantity_prefix: String,
    pub quantity_suffix: String,
    pub unit_price: Amount,
    pub unit_price_prefix: String,
    pub unit_price_suffix: String,
    /// Explicit amount override; wins over quantity × unit price and children.
    pub amount: Option<Amount>,
    pub amount_prefix: String,
    pub amount_suffix: String,
    pub open: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl LineItem {
    pub fn new(id: LineItemId, quote_id: QuoteId, description: impl Into<String>) -> Self {
        Self {
            id,
            quote_id,
            parent_id: None,
            image_id: None,
            description: description.into(),
            quantity: Quantity::ZERO,
            quantity_prefix: String::new(),
            quantity_suffix: String::new(),
            unit_price: Amount::ZERO,
            unit_price_prefix: String::new(),
            unit_price_suffix: String::new(),
            amount: None,
            amount_prefix: String::new(),
            amount_suffix: String::new(),
            open: false,
            created: DateTime::<Utc>::default(),
            updated: DateTime::<Utc>::default(),
        }
    }
}

impl Entity for LineItem {
    type Id = LineItemId;

    fn id(&self) -> LineItemId {
        self.id
    }
}

/// How an adjustment modifies the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentKind {
    /// Adds `amount` (scaled) as-is.
    Flat,
    /// Adds `subtotal * amount / 100`; `amount` is a plain percentage.
    PercentOfSubtotal,
}

/// A flat or percentage-based modifier applied to a quote's subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: AdjustmentId,
    pub quote_id: QuoteId,
    pub description: String,
    pub kind: AdjustmentKind,
    pub amount: i64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Adjustment {
    pub fn new(
        id: AdjustmentId,
        quote_id: QuoteId,
        description: impl Into<String>,
        kind: AdjustmentKind,
        amount: i64,
    ) -> Self {
        Self {
            id,
            quote_id,
            description: description.into(),
            kind,
            amount,
            created: DateTime::<Utc>::default(),
            updated: DateTime::<Utc>::default(),
        }
    }
}

impl Entity for Adjustment {
    type Id = AdjustmentId;

    fn id(&self) -> AdjustmentId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub company_name: String,
    pub phones: Vec<String>,
    pub emails: Vec<String>,
    pub websites: Vec<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl Contact {
    pub fn new(id: ContactId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            company_name: String::new(),
            phones: Vec::new(),
            emails: Vec::new(),
            websites: Vec::new(),
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
        }
    }
}

impl Entity for Contact {
    type Id = ContactId;

    fn id(&self) -> ContactId {
        self.id
    }
}

/// A resolved image reference (the engine only ever needs its URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: ImageId,
    pub url: String,
}

impl Entity for Image {
    type Id = ImageId;

    fn id(&self) -> ImageId {
        self.id
    }
}
