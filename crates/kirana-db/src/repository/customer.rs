//! # Customer Repository
//!
//! Customer records and lookups. The loyalty accumulators
//! (`total_purchases_cents`, `loyalty_points`) are deliberately NOT
//! writable here: they only move inside the invoice transaction, so they
//! stay monotonically non-decreasing and always match the ledger.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kirana_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, mobile, email, address, total_purchases_cents, \
     loyalty_points, created_at, updated_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by its unique mobile number.
    pub async fn get_by_mobile(&self, mobile: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE mobile = ?1"
        ))
        .bind(mobile)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Searches customers by name or mobile substring.
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Customer>> {
        let pattern = format!("%{}%", query.trim());

        debug!(query = %query, "Searching customers");

        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE name LIKE ?1 OR mobile LIKE ?1 \
             ORDER BY name LIMIT ?2"
        ))
        .bind(&pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Lists customers ordered by name.
    pub async fn list(&self, limit: u32, offset: u32) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Inserts a new customer with zeroed accumulators.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - mobile number already exists
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(mobile = %customer.mobile, name = %customer.name, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers ( \
                 id, name, mobile, email, address, \
                 total_purchases_cents, loyalty_points, created_at, updated_at \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.total_purchases_cents)
        .bind(customer.loyalty_points)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates a customer's contact fields.
    ///
    /// Accumulators are not touched: loyalty state changes only through
    /// committed invoices.
    pub async fn update_contact(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer contact details");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE customers SET \
                 name = ?2, mobile = ?3, email = ?4, address = ?5, updated_at = ?6 \
             WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.mobile)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
    Uuid::new_v4().to_string()
}
