//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! Catalog edits and manual stock adjustments live here. The sale-time
//! stock decrement does NOT: that is part of the invoice transaction in
//! [`engine`](crate::engine) so it can commit atomically with the ledger
//! append.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::{Product, LOW_STOCK_THRESHOLD};

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = "id, name, barcode, category_id, price_cents, cost_price_cents, \
     quantity, unit, description, is_active, created_at, updated_at";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID (active or not).
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its unique barcode.
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Searches active products by name or barcode substring.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial); empty returns a plain
    ///   listing
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list(limit, 0).await;
        }

        let pattern = format!("%{}%", query);

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND (name LIKE ?1 OR barcode LIKE ?1) \
             ORDER BY name LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active products ordered by name.
    pub async fn list(&self, limit: u32, offset: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 ORDER BY name LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Lists active products at or below the low-stock threshold,
    /// emptiest first.
    pub async fn list_low_stock(&self, limit: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active = 1 AND quantity <= ?1 \
             ORDER BY quantity ASC LIMIT ?2"
        ))
        .bind(LOW_STOCK_THRESHOLD)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - barcode already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, name = %product.name, "Inserting product");

        sqlx::query(
            "INSERT INTO products ( \
                 id, name, barcode, category_id, price_cents, cost_price_cents, \
                 quantity, unit, description, is_active, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(&product.description)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product's catalog fields and stock.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 name = ?2, barcode = ?3, category_id = ?4, price_cents = ?5, \
                 cost_price_cents = ?6, quantity = ?7, unit = ?8, \
                 description = ?9, is_active = ?10, updated_at = ?11 \
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(&product.category_id)
        .bind(product.price_cents)
        .bind(product.cost_price_cents)
        .bind(product.quantity)
        .bind(&product.unit)
        .bind(&product.description)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Applies a manual stock adjustment (receiving, shrinkage
    /// correction) and returns the new quantity.
    ///
    /// Clamped at zero: an over-large negative adjustment empties the
    /// shelf rather than recording debt. Sale-time decrements never go
    /// through here.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<i64> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET \
                 quantity = MAX(quantity + ?2, 0), \
                 updated_at = ?3 \
             WHERE id = ?1",
        )
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        let quantity: i64 = sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(quantity)
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Historical invoice items keep referencing the row, so products
    /// are never physically deleted.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Total stock value of the active catalog as
    /// (retail_value_cents, cost_value_cents).
    pub async fn stock_value_cents(&self) -> DbResult<(i64, i64)> {
        let row: (Option<i64>, Option<i64>) = sqlx::query_as(
            "SELECT SUM(quantity * price_cents), SUM(quantity * cost_price_cents) \
             FROM products WHERE is_active = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.0.unwrap_or(0), row.1.unwrap_or(0)))
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}
