//! Subtotal, adjustment-inclusive total and balance due.

use serde::{Deserialize, Serialize};

use pricey_core::{Amount, ValueObject};

use crate::model::{Adjustment, AdjustmentKind, Quote};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub sub_total: Amount,
    pub total: Amount,
    pub balance_due: Amount,
}

impl ValueObject for Totals {}

/// What one adjustment adds to the subtotal.
pub fn adjustment_contribution(adjustment: &Adjustment, sub_total: Amount) -> Amount {
    match adjustment.kind {
        AdjustmentKind::Flat => Amount::from_scaled(adjustment.amount),
        AdjustmentKind::PercentOfSubtotal => sub_total.percent(adjustment.amount),
    }
}

/// Derive the quote totals.
///
/// `top_level` are the aggregated amounts of the top-level line items and
/// `adjustments` the resolved adjustments in quote order. The balance due is
/// the quote's explicit balance when non-zero, else the balance percentage of
/// the total, else zero.
pub fn calculate_totals<'a>(
    top_level: impl IntoIterator<Item = Amount>,
    adjustments: impl IntoIterator<Item = &'a Adjustment>,
    quote: &Quote,
) -> Totals {
    let sub_total: Amount = top_level.into_iter().sum();

    let mut total = sub_total;
    for adjustment in adjustments {
        total += adjustment_contribution(adjustment, sub_total);
    }

    let balance_due = if !quote.balance_due.is_zero() {
        quote.balance_due
    } else if quote.balance_percent_due != 0 {
        total.percent(quote.balance_percent_due)
    } else {
        Amount::ZERO
    };

    Totals {
        sub_total,
        total,
        balance_due,
    }
}
