//! End-to-end pure assembly of a printable quote.

use crate::amounts::aggregate_amounts;
use crate::model::{Adjustment, Quote};
use crate::numbering::assign_numbers;
use crate::printable::{PrintableQuote, QuoteHeader};
use crate::references::ResolvedReferences;
use crate::totals::calculate_totals;
use crate::tree::LineItemTree;

/// Run the whole pipeline over already-resolved references.
///
/// Tree build → amounts → numbering → totals → composition. Performs no IO and
/// never fails: missing references are omitted and malformed parent graphs are
/// handled by the traversal guards.
pub fn assemble(quote: &Quote, refs: &ResolvedReferences) -> PrintableQuote {
    let header = QuoteHeader {
        logo: refs.image(quote.logo_id).cloned(),
        sender: refs.contact(quote.sender_id).cloned(),
        bill_to: refs.contact(quote.bill_to_id).cloned(),
        ship_to: refs.contact(quote.ship_to_id).cloned(),
    };

    let adjustments: Vec<Adjustment> = quote
        .adjustment_ids
        .iter()
        .filter_map(|id| refs.adjustments.get(id).cloned())
        .collect();

    let mut tree = LineItemTree::build(&quote.line_item_ids, refs);
    aggregate_amounts(&mut tree);
    assign_numbers(&mut tree);

    let totals = calculate_totals(tree.top_level().map(|item| item.amount), &adjustments, quote);
    let line_items = tree.into_forest();

    PrintableQuote::compose(quote, header, line_items, adjustments, totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AdjustmentKind, Contact, Image, LineItem};
    use pricey_core::{AdjustmentId, Amount, ContactId, ImageId, LineItemId, Quantity, QuoteId};
    use uuid::Uuid;

    fn fixed<T: From<Uuid>>(n: u128) -> T {
        T::from(Uuid::from_u128(n))
    }

    /// Ten declared items: patch, shipping group (+ fee), water heater group
    /// (+ labor, + heater), a standalone heater, and two ids that never resolve.
    fn reference_quote() -> (Quote, ResolvedReferences) {
        let quote_id: QuoteId = fixed(64);
        let mut refs = ResolvedReferences::new();

        let logo: ImageId = fixed(1);
        let patch_image: ImageId = fixed(2);
        let heater_image: ImageId = fixed(3);
        for (id, url) in [
            (logo, "https://example.test/logo.png"),
            (patch_image, "https://example.test/patch.png"),
            (heater_image, "https://example.test/heater.jpg"),
        ] {
            refs.insert_image(Image {
                id,
                url: url.to_string(),
            });
        }

        let sender: ContactId = fixed(1);
        let bill_to: ContactId = fixed(2);
        let ship_to: ContactId = fixed(3);
        refs.insert_contact(Contact::new(sender, "John Doe"));
        refs.insert_contact(Contact::new(bill_to, "Wile E. Coyote"));
        refs.insert_contact(Contact::new(ship_to, "Wile E. Coyote"));

        let ids: Vec<LineItemId> = (1..=10).map(fixed).collect();
        let id = |n: usize| ids[n - 1];

        let mut patch = LineItem::new(id(1), quote_id, "Acme Rocket Patch");
        patch.image_id = Some(patch_image);
        patch.quantity = Quantity::from_scaled(400);
        patch.unit_price = Amount::from_scaled(1_000);

        let shipping = LineItem::new(id(2), quote_id, "Shipping and Handling");
        let mut fee = LineItem::new(id(3), quote_id, "Shipping Fee");
        fee.parent_id = Some(id(2));
        fee.amount = Some(Amount::from_scaled(1_000));

        let replace = LineItem::new(id(4), quote_id, "Replace Old Water Heater");
        let mut labor = LineItem::new(id(5), quote_id, "Labor & Disposal");
        labor.parent_id = Some(id(4));
        labor.quantity = Quantity::from_scaled(2_000);
        labor.unit_price = Amount::from_scaled(4_000);
        let mut heater = LineItem::new(id(6), quote_id, "Water Heater");
        heater.parent_id = Some(id(4));
        heater.image_id = Some(heater_image);
        heater.amount = Some(Amount::from_scaled(80_000));

        let mut standalone = LineItem::new(id(7), quote_id, "Water Heater");
        standalone.amount = Some(Amount::from_scaled(80_000));

        for item in [patch, shipping, fee, replace, labor, heater, standalone] {
            refs.insert_line_item(item);
        }

        let taxes: AdjustmentId = fixed(1);
        let equipment: AdjustmentId = fixed(2);
        let invisible: AdjustmentId = fixed(3);
        refs.insert_adjustment(Adjustment::new(taxes, quote_id, "Taxes", AdjustmentKind::PercentOfSubtotal, 7));
        refs.insert_adjustment(Adjustment::new(equipment, quote_id, "Heavy Equipment Fee", AdjustmentKind::Flat, 5_000));
        refs.insert_adjustment(Adjustment::new(invisible, quote_id, "Invisible Fee", AdjustmentKind::PercentOfSubtotal, 0));

        let mut quote = Quote::new(quote_id);
        quote.code = "INV-001".to_string();
        quote.logo_id = Some(logo);
        quote.sender_id = Some(sender);
        quote.bill_to_id = Some(bill_to);
        quote.ship_to_id = Some(ship_to);
        quote.line_item_ids = vec![id(2), id(1), id(3), id(4), id(5), id(6), id(7), id(8), id(9), id(10)];
        quote.adjustment_ids = vec![taxes, equipment, invisible, fixed(99)];
        quote.balance_percent_due = 50;
        quote.pay_url = "https://example.test/pay".to_string();

        (quote, refs)
    }

    #[test]
    fn assembles_reference_quote() {
        let (quote, refs) = reference_quote();
        let printable = assemble(&quote, &refs);

        let numbered: Vec<(&str, &str, u32, i64)> = printable
            .all_line_items()
            .map(|i| (i.number.as_str(), i.description.as_str(), i.depth, i.amount.scaled()))
            .collect();
        assert_eq!(
            numbered,
            vec![
                ("1", "Shipping and Handling", 0, 1_000),
                ("1.1", "Shipping Fee", 1, 1_000),
                ("2", "Acme Rocket Patch", 0, 4_000),
                ("3", "Replace Old Water Heater", 0, 160_000),
                ("3.1", "Labor & Disposal", 1, 80_000),
                ("3.2", "Water Heater", 1, 80_000),
                ("4", "Water Heater", 0, 80_000),
            ]
        );

        assert_eq!(printable.sub_total, Amount::from_scaled(245_000));
        // 245000 + 245000*7/100 + 5000 + 0
        assert_eq!(printable.total, Amount::from_scaled(267_150));
        assert_eq!(printable.balance_due, Amount::from_scaled(133_575));
        assert_eq!(printable.adjustments.len(), 3);

        assert_eq!(printable.logo.as_ref().map(|l| l.id), quote.logo_id);
        assert_eq!(printable.sender.as_ref().map(|c| c.name.as_str()), Some("John Doe"));
        assert_eq!(printable.line_items[1].image.as_ref().map(|i| i.id), Some(fixed(2)));
        assert_eq!(printable.code, "INV-001");
        assert_eq!(printable.pay_url, quote.pay_url);
    }

    #[test]
    fn sub_total_is_sum_of_top_level_amounts() {
        let (quote, refs) = reference_quote();
        let printable = assemble(&quote, &refs);
        let sum: Amount = printable.line_items.iter().map(|i| i.amount).sum();
        assert_eq!(printable.sub_total, sum);
    }

    #[test]
    fn missing_header_references_are_omitted() {
        let (mut quote, refs) = reference_quote();
        quote.logo_id = Some(fixed(500));
        quote.ship_to_id = Some(fixed(500));
        quote.bill_to_id = None;

        let printable = assemble(&quote, &refs);
        assert!(printable.logo.is_none());
        assert!(printable.ship_to.is_none());
        assert!(printable.bill_to.is_none());
        assert!(printable.sender.is_some());
    }

    #[test]
    fn empty_quote_totals_flat_adjustments_only() {
        let (mut quote, refs) = reference_quote();
        quote.line_item_ids.clear();

        let printable = assemble(&quote, &refs);
        assert!(printable.line_items.is_empty());
        assert_eq!(printable.sub_total, Amount::ZERO);
        assert_eq!(printable.total, Amount::from_scaled(5_000));
    }

    #[test]
    fn mutual_parents_become_top_level_orphans() {
        let quote_id: QuoteId = fixed(1);
        let a: LineItemId = fixed(10);
        let b: LineItemId = fixed(11);
        let mut refs = ResolvedReferences::new();
        let mut item_a = LineItem::new(a, quote_id, "A");
        item_a.parent_id = Some(b);
        item_a.amount = Some(Amount::from_scaled(300));
        let mut item_b = LineItem::new(b, quote_id, "B");
        item_b.parent_id = Some(a);
        refs.insert_line_item(item_a);
        refs.insert_line_item(item_b);
        let mut quote = Quote::new(quote_id);
        quote.line_item_ids = vec![a, b];

        let printable = assemble(&quote, &refs);
        let top: Vec<(&str, &str)> = printable
            .line_items
            .iter()
            .map(|i| (i.number.as_str(), i.description.as_str()))
            .collect();
        assert_eq!(top, vec![("1", "A"), ("2", "B")]);
        assert!(printable.line_items.iter().all(|i| i.sub_items.is_empty() && i.depth == 0));
        assert_eq!(printable.sub_total, Amount::from_scaled(300));
    }

    #[test]
    fn assembly_is_byte_for_byte_idempotent() {
        let (quote, refs) = reference_quote();
        let first = serde_json::to_vec(&assemble(&quote, &refs)).unwrap();
        let second = serde_json::to_vec(&assemble(&quote, &refs.clone())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn source_records_are_not_mutated() {
        let (quote, refs) = reference_quote();
        let before = refs.clone();
        let _ = assemble(&quote, &refs);
        assert_eq!(refs, before);
    }
}
