//! Fixed-point arithmetic for money and quantities.
//!
//! Amounts and quantities are integers scaled by [`SCALE`], i.e. they carry two
//! implied decimal digits (`1050` is `10.50`). Every operation that divides
//! truncates toward zero, exactly like integer division, so totals come out the
//! same on every platform. Intermediate products are computed in `i128` and
//! narrowed back with saturation at the `i64` bounds.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Scaling factor of every fixed-point value (two implied decimal digits).
pub const SCALE: i64 = 100;

fn narrow(value: i128) -> i64 {
    i64::try_from(value).unwrap_or(if value.is_negative() { i64::MIN } else { i64::MAX })
}

/// Parses `"-12"`, `"12.5"` or `"12.50"` into a value scaled by [`SCALE`].
fn parse_scaled(input: &str, what: &str) -> DomainResult<i64> {
    let invalid = || DomainError::invalid_amount(format!("{what}: {input:?}"));

    let trimmed = input.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() || frac.len() > 2 {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: i128 = whole.parse().map_err(|_| invalid())?;
    let frac: i128 = match frac.len() {
        0 => 0,
        1 => frac.parse::<i128>().map_err(|_| invalid())? * 10,
        _ => frac.parse().map_err(|_| invalid())?,
    };

    let magnitude = whole
        .checked_mul(SCALE as i128)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(invalid)?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| invalid())
}

/// Monetary amount in hundredths of the currency unit.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl ValueObject for Amount {}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Wrap an already-scaled value (`1050` is `10.50`).
    pub const fn from_scaled(scaled: i64) -> Self {
        Self(scaled)
    }

    /// Build an amount from whole currency units.
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    /// The raw scaled integer.
    pub const fn scaled(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Whole currency units, truncated toward zero.
    pub const fn whole_units(self) -> i64 {
        self.0 / SCALE
    }

    /// The two fractional digits, always non-negative.
    pub const fn cents(self) -> u64 {
        (self.0 % SCALE).unsigned_abs()
    }

    /// `unit_price * quantity / 100`: the extended price of a line.
    ///
    /// The division undoes the scaling carried by `quantity`, so the result is
    /// scaled like `unit_price`.
    pub fn extended(unit_price: Amount, quantity: Quantity) -> Amount {
        let product = unit_price.0 as i128 * quantity.scaled() as i128;
        Amount(narrow(product / SCALE as i128))
    }

    /// `self * points / 100`, truncating toward zero.
    ///
    /// `points` is a plain percentage (`7` is 7%).
    pub fn percent(self, points: i64) -> Amount {
        let product = self.0 as i128 * points as i128;
        Amount(narrow(product / SCALE as i128))
    }

    pub fn saturating_add(self, rhs: Amount) -> Amount {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Amount {
        iter.copied().sum()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / SCALE as u64, abs % SCALE as u64)
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, "Amount").map(Amount)
    }
}

/// Quantity in hundredths of a unit (`400` is four units, `150` is one and a half).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl ValueObject for Quantity {}

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    pub const fn from_scaled(scaled: i64) -> Self {
        Self(scaled)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    pub const fn scaled(self) -> i64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }
}

/// Trailing fractional zeros are dropped: `4`, `1.5`, `1.25`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / SCALE as u64;
        let frac = abs % SCALE as u64;
        match frac {
            0 => write!(f, "{sign}{whole}"),
            f10 if f10 % 10 == 0 => write!(f, "{sign}{whole}.{}", f10 / 10),
            _ => write!(f, "{sign}{whole}.{frac:02}"),
        }
    }
}

impl FromStr for Quantity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, "Quantity").map(Quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extended_price_undoes_quantity_scaling() {
        let amount = Amount::extended(Amount::from_scaled(1_000), Quantity::from_scaled(400));
        assert_eq!(amount, Amount::from_scaled(4_000));

        let labor = Amount::extended(Amount::from_scaled(4_000), Quantity::from_scaled(2_000));
        assert_eq!(labor, Amount::from_scaled(80_000));
    }

    #[test]
    fn percent_truncates_toward_zero() {
        assert_eq!(Amount::from_scaled(165_000).percent(7), Amount::from_scaled(11_550));
        assert_eq!(Amount::from_scaled(199).percent(50), Amount::from_scaled(99));
        assert_eq!(Amount::from_scaled(-199).percent(50), Amount::from_scaled(-99));
        assert_eq!(Amount::ZERO.percent(7), Amount::ZERO);
    }

    #[test]
    fn arithmetic_saturates_instead_of_overflowing() {
        let max = Amount::from_scaled(i64::MAX);
        assert_eq!(max + Amount::from_scaled(1), max);
        assert_eq!(
            Amount::extended(max, Quantity::from_scaled(i64::MAX)),
            Amount::from_scaled(i64::MAX)
        );
    }

    #[test]
    fn amount_display_keeps_two_digits() {
        assert_eq!(Amount::from_scaled(181_550).to_string(), "1815.50");
        assert_eq!(Amount::from_scaled(5).to_string(), "0.05");
        assert_eq!(Amount::from_scaled(-1_005).to_string(), "-10.05");
    }

    #[test]
    fn quantity_display_drops_trailing_zeros() {
        assert_eq!(Quantity::from_scaled(400).to_string(), "4");
        assert_eq!(Quantity::from_scaled(150).to_string(), "1.5");
        assert_eq!(Quantity::from_scaled(125).to_string(), "1.25");
        assert_eq!(Quantity::from_scaled(105).to_string(), "1.05");
    }

    #[test]
    fn parses_decimal_literals() {
        assert_eq!("12".parse::<Amount>().unwrap(), Amount::from_scaled(1_200));
        assert_eq!("12.5".parse::<Amount>().unwrap(), Amount::from_scaled(1_250));
        assert_eq!("-0.07".parse::<Amount>().unwrap(), Amount::from_scaled(-7));
        assert_eq!("2.25".parse::<Quantity>().unwrap(), Quantity::from_scaled(225));
    }

    #[test]
    fn rejects_malformed_literals() {
        for bad in ["", "-", ".5", "1.234", "1,000", "ten", "1.-5"] {
            let err = bad.parse::<Amount>().unwrap_err();
            assert!(matches!(err, DomainError::InvalidAmount(_)), "{bad:?} -> {err:?}");
        }
    }

    #[test]
    fn sums_amounts() {
        let total: Amount = [100, 250, 5_000].into_iter().map(Amount::from_scaled).sum();
        assert_eq!(total, Amount::from_scaled(5_350));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: extended price equals the integer formula for every
        /// non-overflowing input.
        #[test]
        fn extended_matches_integer_formula(
            unit in 0i64..10_000_000,
            qty in 0i64..10_000_000,
        ) {
            let got = Amount::extended(Amount::from_scaled(unit), Quantity::from_scaled(qty));
            prop_assert_eq!(got.scaled(), unit * qty / 100);
            prop_assert!(!got.is_negative());
        }

        /// Property: displayed amounts parse back to the same value.
        #[test]
        fn display_parses_back(scaled in -1_000_000_000_000i64..1_000_000_000_000) {
            let amount = Amount::from_scaled(scaled);
            prop_assert_eq!(amount.to_string().parse::<Amount>().unwrap(), amount);
        }
    }
}
