//! # Seed Data Generator
//!
//! Populates the database with development data: the standard category
//! set and a shelf of sample products.
//!
//! ## Usage
//! ```bash
//! # Seed the default database file
//! cargo run -p kirana-db --bin seed
//!
//! # Specify database path
//! cargo run -p kirana-db --bin seed -- --db ./data/kirana.db
//! ```
//!
//! Skips seeding when products already exist, so it is safe to run
//! twice. The walk-in customer is created by the initial migration, not
//! here.

use chrono::Utc;
use std::env;
use tracing::info;
use uuid::Uuid;

use kirana_core::{Category, Product};
use kirana_db::{idgen, Database, DbConfig};

/// Categories from a typical neighborhood grocery layout.
const CATEGORIES: &[(&str, &str)] = &[
    ("Fruits & Vegetables", "Fresh produce"),
    ("Dairy Products", "Milk, cheese, butter, eggs"),
    ("Beverages", "Drinks and juices"),
    ("Snacks", "Chips, cookies, nuts"),
    ("Grocery Staples", "Rice, flour, oil, spices"),
    ("Personal Care", "Soap, shampoo, toiletries"),
    ("Household", "Cleaning supplies"),
    ("Frozen Foods", "Frozen items"),
];

/// (name, category, price_cents, quantity)
const SAMPLE_PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("Apple (1 kg)", "Fruits & Vegetables", 15000, 100),
    ("Banana (1 dozen)", "Fruits & Vegetables", 6000, 80),
    ("Tomato (1 kg)", "Fruits & Vegetables", 4000, 120),
    ("Milk (1 L)", "Dairy Products", 5500, 200),
    ("Butter (500g)", "Dairy Products", 25000, 50),
    ("Cheese (200g)", "Dairy Products", 18000, 40),
    ("Orange Juice (1 L)", "Beverages", 12000, 60),
    ("Cola (2 L)", "Beverages", 8500, 100),
    ("Potato Chips (200g)", "Snacks", 5000, 150),
    ("Cookies (300g)", "Snacks", 8000, 80),
    ("Rice (5 kg)", "Grocery Staples", 35000, 70),
    ("Cooking Oil (1 L)", "Grocery Staples", 18000, 90),
    ("Wheat Flour (1 kg)", "Grocery Staples", 4500, 100),
    ("Shampoo (200ml)", "Personal Care", 15000, 60),
    ("Soap (100g)", "Personal Care", 3500, 200),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut db_path = "./kirana.db".to_string();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--db" {
            if let Some(path) = args.next() {
                db_path = path;
            }
        }
    }

    info!(path = %db_path, "Seeding database");

    let db = Database::new(DbConfig::new(&db_path)).await?;

    if db.products().count().await? > 0 {
        info!("Products already present, nothing to do");
        return Ok(());
    }

    let now = Utc::now();
    let categories = db.categories();
    for (name, description) in CATEGORIES {
        if categories.get_by_name(name).await?.is_none() {
            categories
                .insert(&Category {
                    id: Uuid::new_v4().to_string(),
                    name: name.to_string(),
                    description: Some(description.to_string()),
                    created_at: now,
                })
                .await?;
        }
    }
    info!(count = CATEGORIES.len(), "Categories seeded");

    let products = db.products();
    for (name, category_name, price_cents, quantity) in SAMPLE_PRODUCTS {
        let category_id = categories
            .get_by_name(category_name)
            .await?
            .map(|category| category.id);

        let barcode = idgen::mint_barcode(db.pool()).await?;

        products
            .insert(&Product {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                barcode,
                category_id,
                price_cents: *price_cents,
                // Standard seed margin: cost at 70% of retail
                cost_price_cents: price_cents * 7 / 10,
                quantity: *quantity,
                unit: "piece".to_string(),
                description: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    info!(count = SAMPLE_PRODUCTS.len(), "Products seeded");

    db.close().await;
    Ok(())
}
