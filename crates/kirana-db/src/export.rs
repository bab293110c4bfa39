//! # Report Export Adapter
//!
//! Read-only CSV exports over the ledger and catalog. This module never
//! writes: it observes committed state after the fact, like any other
//! reporting consumer.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::pool::Database;
use kirana_core::Money;

/// Read-only CSV report generator.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct SalesRow {
    invoice_number: String,
    created_at: DateTime<Utc>,
    customer_name: Option<String>,
    subtotal_cents: i64,
    tax_cents: i64,
    discount_cents: i64,
    total_cents: i64,
    payment_method: String,
}

#[derive(Debug, sqlx::FromRow)]
struct InventoryRow {
    barcode: String,
    name: String,
    category_name: Option<String>,
    price_cents: i64,
    cost_price_cents: i64,
    quantity: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    name: String,
    mobile: String,
    email: Option<String>,
    total_purchases_cents: i64,
    loyalty_points: i64,
    invoice_count: i64,
}

impl ReportExporter {
    /// Creates an exporter over the given database.
    pub fn new(db: &Database) -> Self {
        ReportExporter {
            pool: db.pool().clone(),
        }
    }

    /// Sales report: one row per invoice, optionally date-bounded,
    /// newest first.
    pub async fn sales_csv(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> DbResult<String> {
        debug!(?from, ?to, "Exporting sales report");

        let rows = sqlx::query_as::<_, SalesRow>(
            "SELECT i.invoice_number, i.created_at, c.name AS customer_name, \
                    i.subtotal_cents, i.tax_cents, i.discount_cents, i.total_cents, \
                    i.payment_method \
             FROM invoices i \
             LEFT JOIN customers c ON c.id = i.customer_id \
             WHERE (?1 IS NULL OR i.created_at >= ?1) \
               AND (?2 IS NULL OR i.created_at <= ?2) \
             ORDER BY i.created_at DESC",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut out = String::from(
            "Invoice Number,Date,Customer,Subtotal,Tax,Discount,Total,Payment Method\n",
        );
        for row in rows {
            out.push_str(&csv_line(&[
                &row.invoice_number,
                &row.created_at.format("%Y-%m-%d %H:%M").to_string(),
                row.customer_name.as_deref().unwrap_or("Walk-in"),
                &Money::from_cents(row.subtotal_cents).to_string(),
                &Money::from_cents(row.tax_cents).to_string(),
                &Money::from_cents(row.discount_cents).to_string(),
                &Money::from_cents(row.total_cents).to_string(),
                &row.payment_method,
            ]));
        }

        Ok(out)
    }

    /// Inventory report: active products with stock values.
    pub async fn inventory_csv(&self) -> DbResult<String> {
        debug!("Exporting inventory report");

        let rows = sqlx::query_as::<_, InventoryRow>(
            "SELECT p.barcode, p.name, c.name AS category_name, \
                    p.price_cents, p.cost_price_cents, p.quantity \
             FROM products p \
             LEFT JOIN categories c ON c.id = p.category_id \
             WHERE p.is_active = 1 \
             ORDER BY p.name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out =
            String::from("Barcode,Name,Category,Price,Cost Price,Quantity,Stock Value\n");
        for row in rows {
            let stock_value = Money::from_cents(row.price_cents * row.quantity);
            out.push_str(&csv_line(&[
                &row.barcode,
                &row.name,
                row.category_name.as_deref().unwrap_or(""),
                &Money::from_cents(row.price_cents).to_string(),
                &Money::from_cents(row.cost_price_cents).to_string(),
                &row.quantity.to_string(),
                &stock_value.to_string(),
            ]));
        }

        Ok(out)
    }

    /// Customer report: loyalty standing and invoice counts.
    pub async fn customers_csv(&self) -> DbResult<String> {
        debug!("Exporting customer report");

        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT c.name, c.mobile, c.email, c.total_purchases_cents, c.loyalty_points, \
                    (SELECT COUNT(*) FROM invoices i WHERE i.customer_id = c.id) AS invoice_count \
             FROM customers c \
             ORDER BY c.name",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out =
            String::from("Name,Mobile,Email,Total Purchases,Loyalty Points,Invoice Count\n");
        for row in rows {
            out.push_str(&csv_line(&[
                &row.name,
                &row.mobile,
                row.email.as_deref().unwrap_or(""),
                &Money::from_cents(row.total_purchases_cents).to_string(),
                &row.loyalty_points.to_string(),
                &row.invoice_count.to_string(),
            ]));
        }

        Ok(out)
    }
}

/// Joins fields into one CSV record, quoting where needed.
fn csv_line(fields: &[&str]) -> String {
    let mut line = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            line.push('"');
            line.push_str(&field.replace('"', "\"\""));
            line.push('"');
        } else {
            line.push_str(field);
        }
    }
    line.push('\n');
    line
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_line_plain() {
        assert_eq!(csv_line(&["a", "b", "c"]), "a,b,c\n");
    }

    #[test]
    fn test_csv_line_quotes_commas_and_quotes() {
        assert_eq!(
            csv_line(&["Rice (5 kg), basmati", "say \"hi\""]),
            "\"Rice (5 kg), basmati\",\"say \"\"hi\"\"\"\n"
        );
    }
}
