//! Bounded concurrent reference resolution.
//!
//! A quote references images, contacts, line items and adjustments by id. The
//! resolver fetches each distinct id once through a [`QuoteSnapshot`], with at
//! most `concurrency` fetches in flight. Line-item images are only known after
//! the line items arrive, so resolution runs in two waves.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use pricey_core::{AdjustmentId, ContactId, ImageId, LineItemId};
use pricey_quoting::{Adjustment, Contact, Image, LineItem, Quote, ReferenceRequest, ResolvedReferences};

use crate::store::{QuoteSnapshot, StoreError};

#[derive(Debug, Clone, Copy)]
enum Fetch {
    Image(ImageId),
    Contact(ContactId),
    LineItem(LineItemId),
    Adjustment(AdjustmentId),
}

#[derive(Debug)]
enum Fetched {
    Image(ImageId, Option<Image>),
    Contact(ContactId, Option<Contact>),
    LineItem(LineItemId, Option<LineItem>),
    Adjustment(AdjustmentId, Option<Adjustment>),
}

pub struct ReferenceResolver<'s, S: ?Sized> {
    snapshot: &'s S,
    concurrency: usize,
}

impl<'s, S> ReferenceResolver<'s, S>
where
    S: QuoteSnapshot + ?Sized,
{
    pub fn new(snapshot: &'s S, concurrency: usize) -> Self {
        Self {
            snapshot,
            concurrency: concurrency.max(1),
        }
    }

    /// Fetch everything `quote` references.
    ///
    /// Ids that are not found are left out of the result. The first store
    /// error aborts the fetches still in flight and is returned.
    pub async fn resolve(&self, quote: &Quote) -> Result<ResolvedReferences, StoreError> {
        let request = ReferenceRequest::for_quote(quote);
        let mut refs = ResolvedReferences::new();

        let first_wave: Vec<Fetch> = request
            .images
            .iter()
            .map(|&id| Fetch::Image(id))
            .chain(request.contacts.iter().map(|&id| Fetch::Contact(id)))
            .chain(request.line_items.iter().map(|&id| Fetch::LineItem(id)))
            .chain(request.adjustments.iter().map(|&id| Fetch::Adjustment(id)))
            .collect();
        debug!(quote_id = %quote.id, fetches = first_wave.len(), "resolving quote references");
        self.run_wave(first_wave, &mut refs).await?;

        let fetched_items = request
            .line_items
            .iter()
            .filter_map(|id| refs.line_items.get(id));
        let second_wave: Vec<Fetch> = request
            .line_item_images(fetched_items)
            .into_iter()
            .map(Fetch::Image)
            .collect();
        if !second_wave.is_empty() {
            debug!(quote_id = %quote.id, fetches = second_wave.len(), "resolving line item images");
            self.run_wave(second_wave, &mut refs).await?;
        }

        Ok(refs)
    }

    async fn run_wave(&self, wave: Vec<Fetch>, refs: &mut ResolvedReferences) -> Result<(), StoreError> {
        let mut results = stream::iter(wave)
            .map(|fetch| self.fetch(fetch))
            .buffer_unordered(self.concurrency);

        while let Some(fetched) = results.try_next().await? {
            match fetched {
                Fetched::Image(_, Some(image)) => refs.insert_image(image),
                Fetched::Contact(_, Some(contact)) => refs.insert_contact(contact),
                Fetched::LineItem(_, Some(item)) => refs.insert_line_item(item),
                Fetched::Adjustment(_, Some(adjustment)) => refs.insert_adjustment(adjustment),
                Fetched::Image(id, None) => warn!(image_id = %id, "image not found"),
                Fetched::Contact(id, None) => warn!(contact_id = %id, "contact not found"),
                Fetched::LineItem(id, None) => warn!(line_item_id = %id, "line item not found"),
                Fetched::Adjustment(id, None) => warn!(adjustment_id = %id, "adjustment not found"),
            }
        }
        Ok(())
    }

    async fn fetch(&self, fetch: Fetch) -> Result<Fetched, StoreError> {
        Ok(match fetch {
            Fetch::Image(id) => {
                let url = self.snapshot.get_image_url(id).await?;
                Fetched::Image(id, url.map(|url| Image { id, url }))
            }
            Fetch::Contact(id) => Fetched::Contact(id, self.snapshot.get_contact(id).await?),
            Fetch::LineItem(id) => Fetched::LineItem(id, self.snapshot.get_line_item(id).await?),
            Fetch::Adjustment(id) => {
                Fetched::Adjustment(id, self.snapshot.get_adjustment(id).await?)
            }
        })
    }
}
