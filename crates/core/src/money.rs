//! Fixed-point monetary amounts.
//!
//! `Money` keeps the full `Decimal` precision of whatever arithmetic produced it.
//! Rounding to two decimals happens only through [`Money::rounded`], which callers
//! invoke at the point a value is reported or painted, never between summations.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub};

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// Number of fractional digits in a reported amount.
pub const MONEY_SCALE: u32 = 2;

const ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Monetary amount in the document currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Build an amount from smallest currency units (e.g. cents).
    pub fn from_minor_units(units: i64) -> Self {
        Self(Decimal::new(units, MONEY_SCALE))
    }

    /// Unrounded amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Round half away from zero to [`MONEY_SCALE`] decimals.
    pub fn rounded(&self) -> Money {
        let mut value = self.0.round_dp_with_strategy(MONEY_SCALE, ROUNDING);
        value.rescale(MONEY_SCALE);
        Money(value)
    }

    /// Rounded amount in smallest currency units, `None` if it exceeds `i64`.
    pub fn to_minor_units(&self) -> Option<i64> {
        self.rounded().0.checked_mul(Decimal::ONE_HUNDRED)?.to_i64()
    }

    /// `self * factor` at full precision.
    pub fn times(&self, factor: Decimal) -> Money {
        Money(self.0 * factor)
    }

    /// `self * percent / 100` at full precision.
    pub fn percent(&self, percent: Decimal) -> Money {
        Money(self.0 * percent / Decimal::ONE_HUNDRED)
    }

    /// [`Money::times`], `None` on overflow.
    pub fn checked_times(&self, factor: Decimal) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// [`Money::percent`], `None` on overflow.
    pub fn checked_percent(&self, percent: Decimal) -> Option<Money> {
        self.0
            .checked_mul(percent)?
            .checked_div(Decimal::ONE_HUNDRED)
            .map(Money)
    }

    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(&self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl ValueObject for Money {}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// Always renders two decimals, `%.2f` style.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.rounded().0, f)
    }
}
