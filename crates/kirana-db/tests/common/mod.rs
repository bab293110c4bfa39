//! Shared helpers for integration tests.

#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use kirana_core::{
    CartLine, Customer, PaymentMethod, Product, TaxRate, DEFAULT_TAX_RATE_BPS,
};
use kirana_db::{idgen, CreateInvoiceRequest, Database, DbConfig, InvoiceEngine};

/// Fresh in-memory database with migrations applied.
pub async fn test_db() -> Database {
    Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database")
}

/// Engine at the standard 18% flat rate.
pub fn engine(db: &Database) -> InvoiceEngine {
    InvoiceEngine::new(db, TaxRate::from_bps(DEFAULT_TAX_RATE_BPS))
}

pub async fn seed_product(db: &Database, name: &str, price_cents: i64, quantity: i64) -> Product {
    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        barcode: idgen::mint_barcode(db.pool()).await.expect("barcode"),
        category_id: None,
        price_cents,
        cost_price_cents: price_cents * 7 / 10,
        quantity,
        unit: "piece".to_string(),
        description: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    db.products().insert(&product).await.expect("insert product");
    product
}

pub async fn seed_customer(db: &Database, name: &str, mobile: &str) -> Customer {
    let now = Utc::now();
    let customer = Customer {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        mobile: mobile.to_string(),
        email: None,
        address: None,
        total_purchases_cents: 0,
        loyalty_points: 0,
        created_at: now,
        updated_at: now,
    };
    db.customers()
        .insert(&customer)
        .await
        .expect("insert customer");
    customer
}

/// Cash request with no customer and no discount unless overridden.
pub fn cash_request(items: Vec<CartLine>, discount_bps: u32) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        customer_id: None,
        items,
        discount_bps,
        payment_method: PaymentMethod::Cash,
        notes: None,
        created_by: "cashier-1".to_string(),
    }
}

pub fn line(product: &Product, quantity: i64) -> CartLine {
    CartLine {
        product_id: product.id.clone(),
        quantity,
    }
}
