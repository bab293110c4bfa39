//! # Invoice Totals
//!
//! Pure pricing arithmetic for the invoice transaction: line totals,
//! subtotal, tax, discount, grand total, and loyalty points.
//!
//! ## Computation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  [PricedLine]                                                       │
//! │       │  line_total = unit_price × quantity   (exact, no rounding)  │
//! │       ▼                                                             │
//! │  subtotal = Σ line_total                                            │
//! │       │                                                             │
//! │       ├── tax      = subtotal × tax_rate_bps   (half-up to cents)   │
//! │       ├── discount = subtotal × discount_bps   (half-up to cents)   │
//! │       ▼                                                             │
//! │  total = subtotal + tax - discount             (must be >= 0)       │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  loyalty points = total / 10000 cents          (floored)            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exactly two roundings happen per invoice (tax, discount). Everything
//! else is exact integer arithmetic, which is what makes
//! `Σ item.total_price == subtotal` and
//! `total == subtotal + tax - discount` testable to the cent.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;
use crate::CENTS_PER_LOYALTY_POINT;

// =============================================================================
// Cart Shapes
// =============================================================================

/// One requested line of a cart: what the caller submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub quantity: i64,
}

/// A cart line after catalog resolution: carries the price and name
/// snapshot that will be frozen onto the invoice item.
#[derive(Debug, Clone)]
pub struct PricedLine {
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Money,
}

impl PricedLine {
    /// Line total: exact product of unit price and quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// The four monetary fields of an invoice, all exact to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub discount: Money,
    pub total: Money,
}

/// Computes invoice totals for a priced cart.
///
/// ## Errors
/// - [`CoreError::EmptyCart`] when no lines are given
/// - [`CoreError::NegativeTotal`] if the total would go below zero
///   (unreachable while the discount rate is capped at 100%)
///
/// ## Example
/// ```rust
/// use kirana_core::money::Money;
/// use kirana_core::totals::{compute_totals, PricedLine};
/// use kirana_core::types::TaxRate;
///
/// let lines = vec![
///     PricedLine {
///         product_id: "a".into(),
///         product_name: "Apple (1 kg)".into(),
///         quantity: 2,
///         unit_price: Money::from_cents(15000),
///     },
///     PricedLine {
///         product_id: "b".into(),
///         product_name: "Banana (1 dozen)".into(),
///         quantity: 1,
///         unit_price: Money::from_cents(6000),
///     },
/// ];
///
/// // 18% tax, 5% discount
/// let totals = compute_totals(&lines, TaxRate::from_bps(1800), 500).unwrap();
/// assert_eq!(totals.subtotal.cents(), 36000);
/// assert_eq!(totals.tax.cents(), 6480);
/// assert_eq!(totals.discount.cents(), 1800);
/// assert_eq!(totals.total.cents(), 40680);
/// ```
pub fn compute_totals(
    lines: &[PricedLine],
    tax_rate: TaxRate,
    discount_bps: u32,
) -> CoreResult<InvoiceTotals> {
    if lines.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let mut subtotal = Money::zero();
    for line in lines {
        subtotal += line.line_total();
    }

    let tax = subtotal.calculate_tax(tax_rate);
    let discount = subtotal.apply_rate_bps(discount_bps);
    let total = subtotal + tax - discount;

    if total.is_negative() {
        return Err(CoreError::NegativeTotal {
            total_cents: total.cents(),
        });
    }

    Ok(InvoiceTotals {
        subtotal,
        tax,
        discount,
        total,
    })
}

/// Loyalty points earned by an invoice total: one point per 100 currency
/// units, floored. Negative or sub-point totals earn nothing.
#[inline]
pub fn loyalty_points(total: Money) -> i64 {
    if total.is_negative() {
        0
    } else {
        total.cents() / CENTS_PER_LOYALTY_POINT
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, qty: i64, price_cents: i64) -> PricedLine {
        PricedLine {
            product_id: id.to_string(),
            product_name: format!("Product {id}"),
            quantity: qty,
            unit_price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_reference_cart() {
        // 2 x 150.00 + 1 x 60.00, 18% tax, 5% discount
        let lines = vec![line("a", 2, 15000), line("b", 1, 6000)];
        let totals = compute_totals(&lines, TaxRate::from_bps(1800), 500).unwrap();

        assert_eq!(totals.subtotal.cents(), 36000); // 360.00
        assert_eq!(totals.tax.cents(), 6480); // 64.80
        assert_eq!(totals.discount.cents(), 1800); // 18.00
        assert_eq!(totals.total.cents(), 40680); // 406.80
    }

    #[test]
    fn test_subtotal_is_sum_of_line_totals() {
        let lines = vec![line("a", 3, 999), line("b", 7, 12345), line("c", 1, 1)];
        let totals = compute_totals(&lines, TaxRate::from_bps(1800), 0).unwrap();

        let sum: i64 = lines.iter().map(|l| l.line_total().cents()).sum();
        assert_eq!(totals.subtotal.cents(), sum);
    }

    #[test]
    fn test_total_identity_holds() {
        let lines = vec![line("a", 2, 15075), line("b", 5, 3333)];
        let totals = compute_totals(&lines, TaxRate::from_bps(1800), 750).unwrap();

        assert_eq!(
            totals.total.cents(),
            totals.subtotal.cents() + totals.tax.cents() - totals.discount.cents()
        );
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = compute_totals(&[], TaxRate::from_bps(1800), 0);
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_full_discount_never_goes_negative() {
        let lines = vec![line("a", 1, 9999)];
        // 0% tax and 100% discount is the worst case for the total
        let totals = compute_totals(&lines, TaxRate::zero(), 10_000).unwrap();
        assert_eq!(totals.total.cents(), 0);
    }

    #[test]
    fn test_zero_rates() {
        let lines = vec![line("a", 4, 2500)];
        let totals = compute_totals(&lines, TaxRate::zero(), 0).unwrap();
        assert_eq!(totals.subtotal.cents(), 10000);
        assert_eq!(totals.tax.cents(), 0);
        assert_eq!(totals.discount.cents(), 0);
        assert_eq!(totals.total.cents(), 10000);
    }

    #[test]
    fn test_loyalty_points_floor() {
        // 406.80 -> 4 points
        assert_eq!(loyalty_points(Money::from_cents(40680)), 4);
        // 99.99 -> 0 points
        assert_eq!(loyalty_points(Money::from_cents(9999)), 0);
        // 100.00 -> 1 point
        assert_eq!(loyalty_points(Money::from_cents(10000)), 1);
        assert_eq!(loyalty_points(Money::from_cents(-500)), 0);
    }
}
