//! # Invoice Repository
//!
//! Read access to the invoice ledger, plus the reporting aggregates the
//! dashboard and export adapter are built on.
//!
//! ## Append-Only Ledger
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Writes:  ONLY the invoice transaction engine appends here, inside  │
//! │           its atomic commit. This module exposes no insert, no      │
//! │           update, no delete: a committed invoice and its items are  │
//! │           frozen history.                                           │
//! │                                                                     │
//! │  Reads:   point lookups (id, invoice number), item fetches,         │
//! │           date-ranged listings, and aggregate rollups.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kirana_core::{Invoice, InvoiceItem, InvoiceWithItems, Money};

const INVOICE_COLUMNS: &str = "id, invoice_number, customer_id, created_by, subtotal_cents, \
     tax_cents, tax_rate_bps, discount_cents, discount_bps, total_cents, \
     payment_method, payment_status, notes, created_at";

const ITEM_COLUMNS: &str =
    "id, invoice_id, product_id, line_no, product_name, quantity, unit_price_cents, \
     total_price_cents";

// =============================================================================
// Reporting Row Types
// =============================================================================

/// One day's sales rollup.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DailySales {
    /// Calendar day, `YYYY-MM-DD`.
    pub day: String,
    pub invoice_count: i64,
    pub total_cents: i64,
}

/// One calendar month's sales rollup.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlySales {
    /// Calendar month, `YYYY-MM`.
    pub month: String,
    pub invoice_count: i64,
    pub total_cents: i64,
}

/// A best-selling product by total quantity sold.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TopProduct {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice ledger reads.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Gets an invoice by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets an invoice by its unique invoice number.
    pub async fn get_by_number(&self, invoice_number: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE invoice_number = ?1"
        ))
        .bind(invoice_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Gets all items for an invoice in cart order.
    pub async fn items_for(&self, invoice_id: &str) -> DbResult<Vec<InvoiceItem>> {
        let items = sqlx::query_as::<_, InvoiceItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM invoice_items WHERE invoice_id = ?1 ORDER BY line_no"
        ))
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets an invoice together with its ordered items.
    pub async fn get_with_items(&self, id: &str) -> DbResult<Option<InvoiceWithItems>> {
        let Some(invoice) = self.get_by_id(id).await? else {
            return Ok(None);
        };
        let items = self.items_for(&invoice.id).await?;

        Ok(Some(InvoiceWithItems { invoice, items }))
    }

    /// Lists invoices newest-first, optionally bounded by a date range.
    pub async fn list(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        limit: u32,
        offset: u32,
    ) -> DbResult<Vec<Invoice>> {
        debug!(?from, ?to, limit, offset, "Listing invoices");

        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2) \
             ORDER BY created_at DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(from)
        .bind(to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Lists invoices for a customer, newest first.
    pub async fn list_for_customer(&self, customer_id: &str, limit: u32) -> DbResult<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices \
             WHERE customer_id = ?1 ORDER BY created_at DESC LIMIT ?2"
        ))
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Total sales over an optional date range.
    pub async fn sales_total_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<Money> {
        let total: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_cents) FROM invoices \
             WHERE (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2)",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(total.unwrap_or(0)))
    }

    /// Number of invoices over an optional date range.
    pub async fn count_between(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM invoices \
             WHERE (?1 IS NULL OR created_at >= ?1) \
               AND (?2 IS NULL OR created_at <= ?2)",
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Daily sales rollups for the last `days` days, oldest first.
    pub async fn sales_by_day(&self, days: u32) -> DbResult<Vec<DailySales>> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));

        let rows = sqlx::query_as::<_, DailySales>(
            "SELECT date(created_at) AS day, \
                    COUNT(*) AS invoice_count, \
                    SUM(total_cents) AS total_cents \
             FROM invoices \
             WHERE created_at >= ?1 \
             GROUP BY date(created_at) \
             ORDER BY day",
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Monthly sales rollups for the last `months` calendar months,
    /// oldest first.
    ///
    /// Buckets are true calendar months (`strftime('%Y-%m')`), not
    /// 30-day windows, so February is February.
    pub async fn sales_by_month(&self, months: u32) -> DbResult<Vec<MonthlySales>> {
        let mut rows = sqlx::query_as::<_, MonthlySales>(
            "SELECT strftime('%Y-%m', created_at) AS month, \
                    COUNT(*) AS invoice_count, \
                    SUM(total_cents) AS total_cents \
             FROM invoices \
             GROUP BY strftime('%Y-%m', created_at) \
             ORDER BY month DESC \
             LIMIT ?1",
        )
        .bind(months)
        .fetch_all(&self.pool)
        .await?;

        rows.reverse();
        Ok(rows)
    }

    /// Best-selling products by total quantity across the whole ledger.
    ///
    /// Uses the snapshotted item names, so renamed products report under
    /// the name they actually sold as.
    pub async fn top_products(&self, limit: u32) -> DbResult<Vec<TopProduct>> {
        let rows = sqlx::query_as::<_, TopProduct>(
            "SELECT product_id, \
                    MIN(product_name) AS product_name, \
                    SUM(quantity) AS total_quantity \
             FROM invoice_items \
             GROUP BY product_id \
             ORDER BY total_quantity DESC \
             LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
