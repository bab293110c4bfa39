//! # Domain Types
//!
//! Core domain types used throughout Kirana POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │    Product     │   │    Invoice     │   │  InvoiceItem   │       │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │       │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  id (UUID)     │       │
//! │  │  barcode       │   │  invoice_number│   │  invoice_id    │       │
//! │  │  price_cents   │   │  total_cents   │   │  product_name  │       │
//! │  │  quantity      │   │  (immutable)   │   │  (snapshot)    │       │
//! │  └────────────────┘   └────────────────┘   └────────────────┘       │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐       │
//! │  │   Customer     │   │    Category    │   │  ActivityLog   │       │
//! │  │  loyalty accum │   │  unique name   │   │  write-once    │       │
//! │  └────────────────┘   └────────────────┘   └────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (barcode, mobile, invoice_number) -
//!   human-readable, unique, used at the counter

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::LOW_STOCK_THRESHOLD;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01% = 1/10000, so 1800 bps = 18% (the shop's flat
/// GST-style rate). Integer bps keep rate math exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Never physically deleted: `is_active` is a soft-delete flag consulted
/// by every query path, because historical invoice items keep referencing
/// the row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown at the counter and on receipts.
    pub name: String,

    /// Unique barcode, format `GRO` + 10 digits.
    pub barcode: String,

    /// Optional category reference.
    pub category_id: Option<String>,

    /// Sale price in cents.
    pub price_cents: i64,

    /// Cost price in cents (for margin and stock-value reports).
    pub cost_price_cents: i64,

    /// On-hand quantity. Invariant: never negative.
    pub quantity: i64,

    /// Unit of measure label ("piece", "kg", "litre", ...).
    pub unit: String,

    /// Optional description.
    pub description: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the cost price as a Money type.
    #[inline]
    pub fn cost_price(&self) -> Money {
        Money::from_cents(self.cost_price_cents)
    }

    /// Checks whether on-hand stock covers the requested quantity.
    #[inline]
    pub fn in_stock(&self, requested: i64) -> bool {
        self.quantity >= requested
    }

    /// Checks whether the product is at or below the low-stock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category. Immutable once created; there is no delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    /// Unique name.
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record with loyalty accumulators.
///
/// `total_purchases_cents` and `loyalty_points` are monotonically
/// non-decreasing and change only as a side effect of a committed
/// invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Unique mobile number - the business key customers are looked up by.
    pub mobile: String,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Lifetime purchase total in cents.
    pub total_purchases_cents: i64,
    /// Loyalty balance: one point per 100 currency units spent, floored.
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    /// Returns the lifetime purchase total as Money.
    #[inline]
    pub fn total_purchases(&self) -> Money {
        Money::from_cents(self.total_purchases_cents)
    }
}

// =============================================================================
// Payment Method / Status
// =============================================================================

/// How an invoice was settled.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
    /// Mobile wallet / UPI style payment.
    MobileWallet,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

/// Settlement status of an invoice.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Settled at the counter (the common case).
    Paid,
    /// Recorded but awaiting settlement.
    Pending,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Paid
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// The durable receipt of a completed sale.
///
/// **Immutable after creation.** The ledger exposes no update or delete;
/// every monetary field is a snapshot taken at commit time, so later
/// catalog or rate changes never alter it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: String,
    /// Globally unique business id, format `INV-YYYYMMDD-NNNNNN`.
    pub invoice_number: String,
    /// Optional customer reference (None for anonymous cash sales).
    pub customer_id: Option<String>,
    /// Acting user who rang up the sale.
    pub created_by: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    /// Tax rate snapshot in basis points.
    pub tax_rate_bps: u32,
    pub discount_cents: i64,
    /// Discount rate snapshot in basis points.
    pub discount_bps: u32,
    /// total = subtotal + tax - discount, exact in cents.
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line item in an invoice.
///
/// Uses the snapshot pattern: product name and unit price are frozen at
/// the time of sale so future renames or price edits leave history
/// intact. Invariant: `total_price_cents == quantity * unit_price_cents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    /// Position within the invoice, preserving cart order.
    pub line_no: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold (> 0).
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line total: quantity x unit price, exact.
    pub total_price_cents: i64,
}

impl InvoiceItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// An invoice together with its ordered line items - the representation
/// the transaction engine returns and retrieval reproduces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceWithItems {
    pub invoice: Invoice,
    pub items: Vec<InvoiceItem>,
}

// =============================================================================
// Activity Log
// =============================================================================

/// An audit trail entry. Write-once, read-many.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ActivityLog {
    pub id: String,
    /// Acting user.
    pub user_id: String,
    /// Action tag, e.g. "INVOICE_CREATE", "STOCK_UPDATE".
    pub action: String,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1800);
        assert_eq!(rate.bps(), 1800);
        assert!((rate.percentage() - 18.0).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_default_is_flat_rate() {
        assert_eq!(TaxRate::default().bps(), crate::DEFAULT_TAX_RATE_BPS);
    }

    #[test]
    fn test_payment_defaults() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Paid);
    }

    fn sample_product(quantity: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Rice (5 kg)".to_string(),
            barcode: "GRO0000000001".to_string(),
            category_id: None,
            price_cents: 35000,
            cost_price_cents: 24500,
            quantity,
            unit: "piece".to_string(),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_product_stock_helpers() {
        let product = sample_product(10);
        assert!(product.in_stock(10));
        assert!(!product.in_stock(11));
        assert!(product.is_low_stock());

        let stocked = sample_product(11);
        assert!(!stocked.is_low_stock());
    }

    #[test]
    fn test_product_money_accessors() {
        let product = sample_product(5);
        assert_eq!(product.price().cents(), 35000);
        assert_eq!(product.cost_price().cents(), 24500);
    }
}
