//! # kirana-db: Database Layer for Kirana POS
//!
//! SQLite persistence for the Kirana POS system, plus the invoice
//! transaction engine: the one operation that must commit stock
//! movement, ledger append, and loyalty accrual as a single unit.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Kirana POS Data Flow                           │
//! │                                                                     │
//! │  Caller (web handler, CLI, test)                                    │
//! │       │                                                             │
//! │  ┌────▼────────────────────────────────────────────────────────┐    │
//! │  │                   kirana-db (THIS CRATE)                    │    │
//! │  │                                                             │    │
//! │  │  ┌──────────┐  ┌──────────────┐  ┌────────┐  ┌──────────┐   │    │
//! │  │  │ Database │  │ Repositories │  │ Engine │  │  Events  │   │    │
//! │  │  │ (pool)   │  │ product,     │  │ atomic │  │ recorder │   │    │
//! │  │  │ + migra- │  │ customer,    │  │ sale   │  │ export   │   │    │
//! │  │  │ tions    │  │ invoice, ... │  │ commit │  │ adapter  │   │    │
//! │  │  └──────────┘  └──────────────┘  └────────┘  └──────────┘   │    │
//! │  └────┬────────────────────────────────────────────────────────┘    │
//! │       │                                                             │
//! │  ┌────▼──────────────┐                                              │
//! │  │  SQLite Database  │  single logical database of record           │
//! │  └───────────────────┘                                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and engine error types
//! - [`repository`] - Per-entity stores (product, customer, ledger, ...)
//! - [`idgen`] - Invoice number and barcode minting
//! - [`engine`] - The invoice transaction engine
//! - [`events`] - Post-commit domain events and the audit recorder
//! - [`export`] - Read-only CSV reporting adapter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kirana_core::{CartLine, PaymentMethod, TaxRate, DEFAULT_TAX_RATE_BPS};
//! use kirana_db::{CreateInvoiceRequest, Database, DbConfig, InvoiceEngine};
//!
//! let db = Database::new(DbConfig::new("kirana.db")).await?;
//! let engine = InvoiceEngine::new(&db, TaxRate::from_bps(DEFAULT_TAX_RATE_BPS));
//!
//! let invoice = engine
//!     .create_invoice(CreateInvoiceRequest {
//!         customer_id: None,
//!         items: vec![CartLine { product_id, quantity: 2 }],
//!         discount_bps: 0,
//!         payment_method: PaymentMethod::Cash,
//!         notes: None,
//!         created_by: "cashier-1".into(),
//!     })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod events;
pub mod export;
pub mod idgen;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use engine::{CreateInvoiceRequest, InvoiceEngine};
pub use error::{DbError, DbResult, EngineError, EngineResult};
pub use events::{ActivityRecorder, DomainEvent};
pub use export::ReportExporter;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::activity::ActivityLogRepository;
pub use repository::category::CategoryRepository;
pub use repository::customer::CustomerRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::product::ProductRepository;
