//! Seed an in-memory catalog with a sample quote and print it as JSON.
//!
//! `RUST_LOG=debug cargo run -p pricey-infra --example print_quote`

use std::io::Write;

use pricey_core::{AdjustmentId, Amount, ContactId, ImageId, LineItemId, Quantity, QuoteId, TenantId};
use pricey_infra::render::format::{pennies, quantity};
use pricey_infra::{
    AssemblerConfig, AssemblyContext, InMemoryCatalogStore, JsonRenderer, QuoteAssembler, QuoteRenderer,
};
use pricey_quoting::{Adjustment, AdjustmentKind, Contact, Image, LineItem, Quote};

fn seed(store: &InMemoryCatalogStore, tenant: TenantId) -> anyhow::Result<QuoteId> {
    let mut quote = Quote::new(QuoteId::new());
    quote.code = "INV-001".to_string();
    quote.balance_percent_due = 50;

    let logo = Image {
        id: ImageId::new(),
        url: "https://example.test/logo.png".to_string(),
    };
    quote.logo_id = Some(logo.id);
    store.insert_image(tenant, logo)?;

    let sender = Contact::new(ContactId::new(), "John Doe");
    let customer = Contact::new(ContactId::new(), "Wile E. Coyote");
    quote.sender_id = Some(sender.id);
    quote.bill_to_id = Some(customer.id);
    quote.ship_to_id = Some(customer.id);
    store.insert_contact(tenant, sender)?;
    store.insert_contact(tenant, customer)?;

    let mut patch = LineItem::new(LineItemId::new(), quote.id, "Acme Rocket Patch");
    patch.quantity = Quantity::from_units(4);
    patch.unit_price = Amount::from_units(10);
    let shipping = LineItem::new(LineItemId::new(), quote.id, "Shipping and Handling");
    let mut fee = LineItem::new(LineItemId::new(), quote.id, "Shipping Fee");
    fee.parent_id = Some(shipping.id);
    fee.amount = Some(Amount::from_units(10));
    for item in [patch, shipping, fee] {
        quote.line_item_ids.push(item.id);
        store.insert_line_item(tenant, item)?;
    }

    let taxes = Adjustment::new(AdjustmentId::new(), quote.id, "Taxes", AdjustmentKind::PercentOfSubtotal, 7);
    quote.adjustment_ids.push(taxes.id);
    store.insert_adjustment(tenant, taxes)?;

    let id = quote.id;
    store.insert_quote(tenant, quote)?;
    Ok(id)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    pricey_observability::init();

    let store = InMemoryCatalogStore::new();
    let tenant = TenantId::new();
    let quote_id = seed(&store, tenant)?;

    let assembler = QuoteAssembler::new(store, AssemblerConfig::from_env());
    let ctx = AssemblyContext::new(tenant);

    let printable = assembler.assemble_printable_quote(&ctx, quote_id).await?;

    let mut stderr = std::io::stderr().lock();
    for item in printable.all_line_items() {
        writeln!(
            stderr,
            "{:indent$}{} {} x{} = {}",
            "",
            item.number,
            item.description,
            quantity(item.quantity),
            pennies(item.amount),
            indent = item.depth as usize * 2
        )?;
    }
    writeln!(stderr, "total {}  due {}", pennies(printable.total), pennies(printable.balance_due))?;

    let rendered = JsonRenderer::pretty().render(&printable)?;
    std::io::stdout().write_all(&rendered)?;
    Ok(())
}
