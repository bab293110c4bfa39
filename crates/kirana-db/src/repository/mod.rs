//! # Repository Module
//!
//! Database repository implementations for Kirana POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Caller                                                             │
//! │     │  db.products().get_by_barcode("GRO1234567890")                │
//! │     ▼                                                               │
//! │  ProductRepository ── SQL ──► SQLite                                │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place per entity                          │
//! │  • Plain data records come back; no lazy navigation, cross-entity   │
//! │    joins are explicit queries at the call site                      │
//! │  • Easy to exercise against an in-memory database                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - catalog CRUD, search, stock
//! - [`category::CategoryRepository`] - category lookups
//! - [`customer::CustomerRepository`] - customer records (accumulators
//!   are engine-only)
//! - [`invoice::InvoiceRepository`] - the append-only ledger + reporting
//!   reads
//! - [`activity::ActivityLogRepository`] - write-once audit trail
//!
//! Writes that must be atomic across entities (stock decrement + ledger
//! append + loyalty accrual) do not live here; they are the
//! [`engine`](crate::engine) module's single transaction.

pub mod activity;
pub mod category;
pub mod customer;
pub mod invoice;
pub mod product;
