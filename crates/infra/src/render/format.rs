//! Presentation helpers for document templates.

use pricey_core::{Amount, Quantity};
use pricey_quoting::{Adjustment, adjustment_contribution};

/// `123456` → `"1,234.56"`; zero renders as an empty cell.
pub fn pennies(amount: Amount) -> String {
    if amount.is_zero() {
        return String::new();
    }

    let digits = amount.whole_units().unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{sign}{grouped}.{:02}", amount.cents())
}

/// `400` → `"4"`, `150` → `"1.5"`, `125` → `"1.25"`; zero renders empty.
pub fn quantity(quantity: Quantity) -> String {
    if quantity.is_zero() {
        return String::new();
    }
    quantity.to_string()
}

/// Left indent in pixels for an item nested `depth` levels deep.
pub fn depth_padding(depth: u32, padding_px: u32, base_px: u32) -> u32 {
    depth.saturating_mul(padding_px).saturating_add(base_px)
}

/// What `adjustment` adds to `sub_total`; a missing adjustment adds nothing.
pub fn adjustment_amount(adjustment: Option<&Adjustment>, sub_total: Amount) -> Amount {
    adjustment.map_or(Amount::ZERO, |a| adjustment_contribution(a, sub_total))
}
