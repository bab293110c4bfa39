//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                         │
//! │                                                                     │
//! │  In floating point:                                                 │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                       │
//! │                                                                     │
//! │  A tax/discount/total chain computed in floats drifts; over a day   │
//! │  of sales the ledger no longer adds up.                             │
//! │                                                                     │
//! │  OUR SOLUTION: Integer Cents                                        │
//! │    Every amount is an i64 count of the smallest currency unit.      │
//! │    Rates are basis points (1 bp = 0.01%). The only rounding in      │
//! │    the system happens in `apply_rate_bps`, half-up, once per rate.  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! // Create from cents (there is no from_float, on purpose)
//! let price = Money::from_cents(15000); // 150.00
//!
//! let line = price.multiply_quantity(2); // 300.00
//! let tax = line.apply_rate_bps(1800);   // 18% -> 54.00
//! assert_eq!((line + tax).cents(), 35400);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate results of `subtotal + tax - discount`
///   may be checked for negativity instead of silently wrapping
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// The database, calculations, and API all use cents. Only display
    /// code converts to major units.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_minor(150, 75).cents(), 15075);
    /// assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99, absolute value).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a rate given in basis points, rounding half-up to cents.
    ///
    /// This is the single rounding point in the system. Tax and discount
    /// both flow through it, so `subtotal`, `tax` and `discount` are each
    /// exact to 2 decimals and `total = subtotal + tax - discount` needs
    /// no further correction.
    ///
    /// ## Implementation
    /// Integer math in i128 to prevent overflow on large amounts:
    /// `(cents * bps + 5000) / 10000`. The +5000 is half of the 10000
    /// divisor, which rounds .5 cases up.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(36000);       // 360.00
    /// assert_eq!(subtotal.apply_rate_bps(1800).cents(), 6480); // 18% tax
    /// assert_eq!(subtotal.apply_rate_bps(500).cents(), 1800);  // 5% discount
    /// ```
    pub fn apply_rate_bps(&self, bps: u32) -> Money {
        let cents = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(cents as i64)
    }

    /// Calculates tax for this amount at the given rate.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::types::TaxRate;
    ///
    /// let amount = Money::from_cents(1000);
    /// let tax = amount.calculate_tax(TaxRate::from_bps(1800));
    /// assert_eq!(tax.cents(), 180);
    /// ```
    #[inline]
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        self.apply_rate_bps(rate.bps())
    }

    /// Multiplies money by a quantity.
    ///
    /// Line totals are exact products; no rounding is involved.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(15000); // 150.00
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 30000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the amount with two decimals and no currency symbol.
///
/// For debugging and CSV export. UI display and localization are the
/// frontend's job.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.units().abs(), self.cents_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(15075);
        assert_eq!(money.cents(), 15075);
        assert_eq!(money.units(), 150);
        assert_eq!(money.cents_part(), 75);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(150, 75).cents(), 15075);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(40680)), "406.80");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut acc = Money::zero();
        acc += a;
        acc -= b;
        assert_eq!(acc.cents(), 500);
    }

    #[test]
    fn test_apply_rate_basic() {
        // 100.00 at 18% = 18.00
        let amount = Money::from_cents(10000);
        assert_eq!(amount.apply_rate_bps(1800).cents(), 1800);
    }

    #[test]
    fn test_apply_rate_rounds_half_up() {
        // 1.25 at 10% = 0.125 -> 0.13
        assert_eq!(Money::from_cents(125).apply_rate_bps(1000).cents(), 13);
        // 1.24 at 10% = 0.124 -> 0.12
        assert_eq!(Money::from_cents(124).apply_rate_bps(1000).cents(), 12);
        // 10.00 at 8.25% = 0.825 -> 0.83
        assert_eq!(Money::from_cents(1000).apply_rate_bps(825).cents(), 83);
    }

    #[test]
    fn test_apply_full_rate_is_identity() {
        // 100% of any amount is the amount itself, so a maximal discount
        // can never push a total negative
        let amount = Money::from_cents(36099);
        assert_eq!(amount.apply_rate_bps(10_000).cents(), 36099);
    }

    #[test]
    fn test_calculate_tax_matches_rate_application() {
        let amount = Money::from_cents(36000);
        let rate = TaxRate::from_bps(1800);
        assert_eq!(amount.calculate_tax(rate).cents(), 6480);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_cents(6000);
        assert_eq!(unit_price.multiply_quantity(1).cents(), 6000);
        assert_eq!(unit_price.multiply_quantity(12).cents(), 72000);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::from_cents(-100).abs().cents(), 100);
        assert_eq!(Money::default().cents(), 0);
    }
}
