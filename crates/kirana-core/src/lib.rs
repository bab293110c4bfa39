//! # kirana-core: Pure Business Logic for Kirana POS
//!
//! This crate is the heart of Kirana POS. It contains the invoice
//! arithmetic and domain types as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Kirana POS Architecture                         │
//! │                                                                     │
//! │  Caller (web handler, CLI, test)                                    │
//! │       │                                                             │
//! │  ┌────▼────────────────────────────────────────────────────────┐    │
//! │  │              ★ kirana-core (THIS CRATE) ★                   │    │
//! │  │                                                             │    │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌────────────┐     │    │
//! │  │   │  types  │  │  money  │  │ totals  │  │ validation │     │    │
//! │  │   │ Product │  │  Money  │  │ TaxCalc │  │   rules    │     │    │
//! │  │   │ Invoice │  │ TaxRate │  │ Loyalty │  │   checks   │     │    │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └────────────┘     │    │
//! │  │                                                             │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │    │
//! │  └────┬────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │  ┌────▼────────────────────────────────────────────────────────┐    │
//! │  │               kirana-db (Database Layer)                    │    │
//! │  │     SQLite repositories, migrations, transaction engine     │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Invoice, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`totals`] - Cart pricing: subtotal, tax, discount, total, loyalty
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output
//! 2. **No I/O**: database, network, file system access is forbidden here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use kirana_core::Money` instead of
// `use kirana_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::{CartLine, InvoiceTotals, PricedLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat tax rate applied to every sale, in basis points (1800 = 18%).
///
/// Single-jurisdiction shop: one rate, snapshotted onto each invoice so
/// that later rate changes never alter historical records.
pub const DEFAULT_TAX_RATE_BPS: u32 = 1800;

/// Products at or below this on-hand quantity count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts and keeps transactions a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in a cart.
///
/// Prevents accidental over-ordering (e.g. typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Upper bound for discount rates: 10000 bps = 100%.
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Cents per loyalty point: one point per 100 currency units spent,
/// floored.
pub const CENTS_PER_LOYALTY_POINT: i64 = 10_000;

/// Fixed id of the walk-in sentinel customer seeded by the initial
/// migration. Cash sales with no identified customer may reference this
/// row, or no customer at all; neither accrues loyalty.
pub const WALK_IN_CUSTOMER_ID: &str = "00000000-0000-0000-0000-000000000001";
