//! # Invoice Transaction Engine
//!
//! The one workflow in the system with real correctness obligations:
//! turning a cart into a committed invoice.
//!
//! ## Transaction Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_invoice(request)                                            │
//! │       │                                                             │
//! │  [1]  validate input            ← no I/O yet, typed errors          │
//! │       │                                                             │
//! │  ┌────▼──────────────── BEGIN ─────────────────────────────────┐    │
//! │  │ [2] resolve customer, resolve products (active only)        │    │
//! │  │     check stock for EVERY line before touching anything     │    │
//! │  │ [3] compute totals (pure, kirana-core)                      │    │
//! │  │ [4] mint unique invoice number                              │    │
//! │  │ [5] insert invoice + items (name/price snapshots)           │    │
//! │  │ [6] decrement stock, guarded: AND quantity >= requested     │    │
//! │  │ [7] accrue customer purchases + loyalty points              │    │
//! │  └───────────────────── COMMIT ────────────────────────────────┘    │
//! │       │                                                             │
//! │  [8]  emit InvoiceCreated event (post-commit only)                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure between BEGIN and COMMIT rolls the whole transaction
//! back: no stock moves, no ledger row, no accrual. The guarded
//! decrement in step 6 keeps `quantity >= 0` true at every observable
//! point even when two commits race; a stale-snapshot or busy error
//! from SQLite is retried as a whole operation, which is the optimistic
//! flavor of the same guarantee.
//!
//! The engine holds no mutable state between calls; the pool is the only
//! shared resource.

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, EngineError, EngineResult};
use crate::events::DomainEvent;
use crate::idgen;
use crate::pool::Database;
use crate::repository::invoice::InvoiceRepository;
use kirana_core::totals::{compute_totals, loyalty_points, PricedLine};
use kirana_core::{
    validation, CartLine, CoreError, Invoice, InvoiceItem, InvoiceWithItems, PaymentMethod,
    PaymentStatus, Product, TaxRate,
};

/// Whole-operation retries after a retryable persistence failure
/// (lock contention, stale read snapshot).
const MAX_COMMIT_ATTEMPTS: u32 = 3;

// =============================================================================
// Request Shape
// =============================================================================

/// A cart submitted for settlement.
#[derive(Debug, Clone)]
pub struct CreateInvoiceRequest {
    /// Customer to attach and accrue loyalty for; None for an anonymous
    /// cash sale.
    pub customer_id: Option<String>,
    /// Ordered cart lines; order is preserved on the invoice.
    pub items: Vec<CartLine>,
    /// Discount rate in basis points (500 = 5%), 0..=10000.
    pub discount_bps: u32,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    /// Acting user recorded on the invoice and in the audit trail.
    pub created_by: String,
}

// =============================================================================
// Engine
// =============================================================================

/// Executes the invoice-creation transaction.
///
/// Constructed with the store and the flat tax rate; cheap to clone, no
/// state between calls.
#[derive(Debug, Clone)]
pub struct InvoiceEngine {
    pool: SqlitePool,
    tax_rate: TaxRate,
    events: Option<UnboundedSender<DomainEvent>>,
}

impl InvoiceEngine {
    /// Creates an engine over the given database.
    pub fn new(db: &Database, tax_rate: TaxRate) -> Self {
        InvoiceEngine {
            pool: db.pool().clone(),
            tax_rate,
            events: None,
        }
    }

    /// Attaches a post-commit event channel (audit sink, dashboards).
    pub fn with_events(mut self, events: UnboundedSender<DomainEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Returns the flat tax rate this engine applies.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Creates an invoice from a cart: validates stock, computes totals,
    /// decrements inventory, accrues loyalty, and appends to the ledger,
    /// all as one atomic commit.
    ///
    /// Intentionally NOT idempotent: submitting the same cart twice
    /// creates two invoices. Retry only after a failure.
    ///
    /// ## Errors
    /// - `EngineError::Core` - validation, referential, or business-rule
    ///   failure; nothing was written
    /// - `EngineError::Db` - persistence failure; fully rolled back, the
    ///   whole request may be retried
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> EngineResult<InvoiceWithItems> {
        // Reject bad input before any lookup runs.
        if request.items.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validation::validate_cart_size(request.items.len())?;
        for line in &request.items {
            validation::validate_quantity(line.quantity)?;
        }
        validation::validate_discount_bps(request.discount_bps)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(&request).await {
                Err(EngineError::Db(err)) if err.is_retryable() && attempt < MAX_COMMIT_ATTEMPTS => {
                    debug!(attempt, error = %err, "Retrying invoice creation after contention");
                    continue;
                }
                Err(err) => return Err(err),
                Ok(created) => {
                    info!(
                        invoice_number = %created.invoice.invoice_number,
                        total_cents = created.invoice.total_cents,
                        lines = created.items.len(),
                        customer = ?created.invoice.customer_id,
                        "Invoice committed"
                    );

                    if let Some(events) = &self.events {
                        // The sale is durable; a gone subscriber is not
                        // our problem.
                        let _ = events.send(DomainEvent::InvoiceCreated {
                            invoice_id: created.invoice.id.clone(),
                            invoice_number: created.invoice.invoice_number.clone(),
                            total_cents: created.invoice.total_cents,
                            created_by: created.invoice.created_by.clone(),
                        });
                    }

                    return Ok(created);
                }
            }
        }
    }

    /// One attempt at the full transaction. Every early return before
    /// the final commit drops the transaction, which rolls it back.
    async fn try_create(&self, request: &CreateInvoiceRequest) -> EngineResult<InvoiceWithItems> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Resolve the customer up front so referential errors surface
        // before anything else.
        if let Some(customer_id) = &request.customer_id {
            let exists: i64 =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM customers WHERE id = ?1)")
                    .bind(customer_id)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(DbError::from)?;
            if exists == 0 {
                return Err(CoreError::CustomerNotFound(customer_id.clone()).into());
            }
        }

        // Resolve every line and check stock BEFORE any mutation, so a
        // failing third line cannot leave the first two half-applied.
        let mut priced = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, barcode, category_id, price_cents, cost_price_cents, \
                        quantity, unit, description, is_active, created_at, updated_at \
                 FROM products WHERE id = ?1 AND is_active = 1",
            )
            .bind(&line.product_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(DbError::from)?
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

            if !product.in_stock(line.quantity) {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.quantity,
                    requested: line.quantity,
                }
                .into());
            }

            let unit_price = product.price();
            priced.push(PricedLine {
                product_id: product.id,
                product_name: product.name,
                quantity: line.quantity,
                unit_price,
            });
        }

        let totals = compute_totals(&priced, self.tax_rate, request.discount_bps)?;

        let invoice_number = idgen::mint_invoice_number(&mut tx).await?;
        let now = Utc::now();

        let invoice = Invoice {
            id: Uuid::new_v4().to_string(),
            invoice_number,
            customer_id: request.customer_id.clone(),
            created_by: request.created_by.clone(),
            subtotal_cents: totals.subtotal.cents(),
            tax_cents: totals.tax.cents(),
            tax_rate_bps: self.tax_rate.bps(),
            discount_cents: totals.discount.cents(),
            discount_bps: request.discount_bps,
            total_cents: totals.total.cents(),
            payment_method: request.payment_method,
            payment_status: PaymentStatus::Paid,
            notes: request.notes.clone(),
            created_at: now,
        };

        sqlx::query(
            "INSERT INTO invoices ( \
                 id, invoice_number, customer_id, created_by, subtotal_cents, \
                 tax_cents, tax_rate_bps, discount_cents, discount_bps, total_cents, \
                 payment_method, payment_status, notes, created_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )
        .bind(&invoice.id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.customer_id)
        .bind(&invoice.created_by)
        .bind(invoice.subtotal_cents)
        .bind(invoice.tax_cents)
        .bind(invoice.tax_rate_bps)
        .bind(invoice.discount_cents)
        .bind(invoice.discount_bps)
        .bind(invoice.total_cents)
        .bind(invoice.payment_method)
        .bind(invoice.payment_status)
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        // Items carry name and price snapshots: future catalog edits must
        // not retroactively alter this invoice.
        let mut items = Vec::with_capacity(priced.len());
        for (index, line) in priced.iter().enumerate() {
            let item = InvoiceItem {
                id: Uuid::new_v4().to_string(),
                invoice_id: invoice.id.clone(),
                product_id: line.product_id.clone(),
                line_no: index as i64 + 1,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price.cents(),
                total_price_cents: line.line_total().cents(),
            };

            sqlx::query(
                "INSERT INTO invoice_items ( \
                     id, invoice_id, product_id, line_no, product_name, \
                     quantity, unit_price_cents, total_price_cents \
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(&item.id)
            .bind(&item.invoice_id)
            .bind(&item.product_id)
            .bind(item.line_no)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            items.push(item);
        }

        // Guarded decrement: the `quantity >= ?2` predicate re-checks
        // availability at write time, so a commit that raced past our
        // read in step 2 cannot push stock below zero.
        for line in &priced {
            let result = sqlx::query(
                "UPDATE products \
                 SET quantity = quantity - ?2, updated_at = ?3 \
                 WHERE id = ?1 AND quantity >= ?2",
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                let available: i64 =
                    sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
                        .bind(&line.product_id)
                        .fetch_one(&mut *tx)
                        .await
                        .map_err(DbError::from)?;

                return Err(CoreError::InsufficientStock {
                    name: line.product_name.clone(),
                    available,
                    requested: line.quantity,
                }
                .into());
            }
        }

        // Loyalty accrual: only as a side effect of this commit, and
        // only ever upward.
        if let Some(customer_id) = &request.customer_id {
            let points = loyalty_points(totals.total);

            let result = sqlx::query(
                "UPDATE customers \
                 SET total_purchases_cents = total_purchases_cents + ?2, \
                     loyalty_points = loyalty_points + ?3, \
                     updated_at = ?4 \
                 WHERE id = ?1",
            )
            .bind(customer_id)
            .bind(totals.total.cents())
            .bind(points)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)?;

            if result.rows_affected() == 0 {
                return Err(CoreError::CustomerNotFound(customer_id.clone()).into());
            }
        }

        // The point of no return: once this succeeds the sale is durable
        // regardless of what happens to the caller.
        tx.commit().await.map_err(DbError::from)?;

        Ok(InvoiceWithItems { invoice, items })
    }

    /// Retrieves a committed invoice with its ordered items.
    pub async fn get_invoice(&self, id: &str) -> EngineResult<InvoiceWithItems> {
        let repo = InvoiceRepository::new(self.pool.clone());

        repo.get_with_items(id)
            .await?
            .ok_or_else(|| CoreError::InvoiceNotFound(id.to_string()).into())
    }
}
