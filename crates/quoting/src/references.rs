//! Reference collection and the resolved lookup tables.
//!
//! Resolution happens in two steps: first every id a quote needs is gathered
//! and de-duplicated ([`ReferenceRequest`]), then each id is fetched once and
//! stored in the id-keyed tables of [`ResolvedReferences`]. Fetching itself is
//! IO and lives in `pricey-infra`; this module only decides *what* to fetch.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use pricey_core::{AdjustmentId, ContactId, Entity, ImageId, LineItemId};

use crate::model::{Adjustment, Contact, Image, LineItem, Quote};

fn push_unique<T: Copy + Eq + Hash>(ids: &mut Vec<T>, seen: &mut HashSet<T>, id: T) {
    if seen.insert(id) {
        ids.push(id);
    }
}

/// De-duplicated ids to fetch for one quote, in first-reference order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRequest {
    pub images: Vec<ImageId>,
    pub contacts: Vec<ContactId>,
    pub line_items: Vec<LineItemId>,
    pub adjustments: Vec<AdjustmentId>,
}

impl ReferenceRequest {
    /// Everything the quote header references directly.
    ///
    /// Line-item images are only known once the line items themselves are
    /// fetched; see [`ReferenceRequest::line_item_images`].
    pub fn for_quote(quote: &Quote) -> Self {
        let mut request = Self::default();

        let mut seen_images = HashSet::new();
        if let Some(logo) = quote.logo_id {
            push_unique(&mut request.images, &mut seen_images, logo);
        }

        let mut seen_contacts = HashSet::new();
        for contact in [quote.sender_id, quote.bill_to_id, quote.ship_to_id].into_iter().flatten() {
            push_unique(&mut request.contacts, &mut seen_contacts, contact);
        }

        let mut seen_items = HashSet::new();
        for &id in &quote.line_item_ids {
            push_unique(&mut request.line_items, &mut seen_items, id);
        }

        let mut seen_adjustments = HashSet::new();
        for &id in &quote.adjustment_ids {
            push_unique(&mut request.adjustments, &mut seen_adjustments, id);
        }

        request
    }

    /// Images referenced by `line_items` that are not already requested.
    pub fn line_item_images<'a>(
        &self,
        line_items: impl IntoIterator<Item = &'a LineItem>,
    ) -> Vec<ImageId> {
        let mut seen: HashSet<ImageId> = self.images.iter().copied().collect();
        let mut extra = Vec::new();
        for item in line_items {
            if let Some(image) = item.image_id {
                push_unique(&mut extra, &mut seen, image);
            }
        }
        extra
    }

    pub fn len(&self) -> usize {
        self.images.len() + self.contacts.len() + self.line_items.len() + self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Id-keyed lookup tables of everything that resolved.
///
/// Ids whose fetch came back "not found" are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedReferences {
    pub images: HashMap<ImageId, Image>,
    pub contacts: HashMap<ContactId, Contact>,
    pub line_items: HashMap<LineItemId, LineItem>,
    pub adjustments: HashMap<AdjustmentId, Adjustment>,
}

impl ResolvedReferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_image(&mut self, image: Image) {
        self.images.insert(image.id(), image);
    }

    pub fn insert_contact(&mut self, contact: Contact) {
        self.contacts.insert(contact.id(), contact);
    }

    pub fn insert_line_item(&mut self, item: LineItem) {
        self.line_items.insert(item.id(), item);
    }

    pub fn insert_adjustment(&mut self, adjustment: Adjustment) {
        self.adjustments.insert(adjustment.id(), adjustment);
    }

    pub fn image(&self, id: Option<ImageId>) -> Option<&Image> {
        id.and_then(|id| self.images.get(&id))
    }

    pub fn contact(&self, id: Option<ContactId>) -> Option<&Contact> {
        id.and_then(|id| self.contacts.get(&id))
    }
}
