//! Integration tests for the repositories and the reporting reads.

mod common;

use chrono::Utc;
use uuid::Uuid;

use common::{cash_request, engine, line, seed_customer, seed_product, test_db};
use kirana_core::{Category, WALK_IN_CUSTOMER_ID};
use kirana_db::{DbError, ReportExporter};

// =============================================================================
// Seeded State
// =============================================================================

#[tokio::test]
async fn walk_in_customer_is_seeded_by_migration() {
    let db = test_db().await;

    let walk_in = db
        .customers()
        .get_by_id(WALK_IN_CUSTOMER_ID)
        .await
        .unwrap()
        .expect("walk-in sentinel present");

    assert_eq!(walk_in.mobile, "0000000000");
    assert_eq!(walk_in.total_purchases_cents, 0);
    assert_eq!(walk_in.loyalty_points, 0);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn product_lookup_and_search() {
    let db = test_db().await;
    let apple = seed_product(&db, "Apple (1 kg)", 15000, 100).await;
    seed_product(&db, "Banana (1 dozen)", 6000, 80).await;

    let by_id = db.products().get_by_id(&apple.id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Apple (1 kg)");

    let by_barcode = db
        .products()
        .get_by_barcode(&apple.barcode)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_barcode.id, apple.id);

    let hits = db.products().search("apple", 20).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, apple.id);

    // Barcode substrings match too
    let hits = db.products().search(&apple.barcode[..8], 20).await.unwrap();
    assert!(hits.iter().any(|p| p.id == apple.id));

    // Empty query falls back to a plain listing, name-ordered
    let all = db.products().search("", 20).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].name, "Apple (1 kg)");

    assert_eq!(db.products().count().await.unwrap(), 2);
}

#[tokio::test]
async fn duplicate_barcode_is_rejected() {
    let db = test_db().await;
    let original = seed_product(&db, "Milk (1 L)", 5500, 200).await;

    let mut clone = original.clone();
    clone.id = Uuid::new_v4().to_string();

    let result = db.products().insert(&clone).await;
    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
}

#[tokio::test]
async fn soft_delete_hides_from_search_but_keeps_the_row() {
    let db = test_db().await;
    let soap = seed_product(&db, "Soap (100g)", 3500, 200).await;

    db.products().soft_delete(&soap.id).await.unwrap();

    assert!(db.products().search("soap", 20).await.unwrap().is_empty());
    assert_eq!(db.products().count().await.unwrap(), 0);

    // The row stays for historical invoice items
    let row = db.products().get_by_id(&soap.id).await.unwrap().unwrap();
    assert!(!row.is_active);
}

#[tokio::test]
async fn manual_stock_adjustment_clamps_at_zero() {
    let db = test_db().await;
    let flour = seed_product(&db, "Wheat Flour (1 kg)", 4500, 10).await;

    let up = db.products().adjust_stock(&flour.id, 5).await.unwrap();
    assert_eq!(up, 15);

    // Over-large write-off empties the shelf instead of going negative
    let down = db.products().adjust_stock(&flour.id, -100).await.unwrap();
    assert_eq!(down, 0);

    let missing = db.products().adjust_stock("missing", 1).await;
    assert!(matches!(missing, Err(DbError::NotFound { .. })));
}

#[tokio::test]
async fn low_stock_listing_orders_emptiest_first() {
    let db = test_db().await;
    seed_product(&db, "Cheese (200g)", 18000, 3).await;
    seed_product(&db, "Butter (500g)", 25000, 0).await;
    seed_product(&db, "Milk (1 L)", 5500, 200).await;

    let low = db.products().list_low_stock(10).await.unwrap();
    assert_eq!(low.len(), 2);
    assert_eq!(low[0].name, "Butter (500g)");
    assert_eq!(low[1].name, "Cheese (200g)");
}

#[tokio::test]
async fn stock_value_sums_active_catalog() {
    let db = test_db().await;
    seed_product(&db, "Rice (5 kg)", 35000, 2).await; // retail 70000, cost 49000
    seed_product(&db, "Cola (2 L)", 8500, 10).await; // retail 85000, cost 59500

    let (retail, cost) = db.products().stock_value_cents().await.unwrap();
    assert_eq!(retail, 155000);
    assert_eq!(cost, 108500);
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn category_insert_and_lookup() {
    let db = test_db().await;
    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: "Beverages".to_string(),
        description: Some("Drinks and juices".to_string()),
        created_at: Utc::now(),
    };

    db.categories().insert(&category).await.unwrap();

    let by_name = db
        .categories()
        .get_by_name("Beverages")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_name.id, category.id);

    let mut duplicate = category.clone();
    duplicate.id = Uuid::new_v4().to_string();
    let result = db.categories().insert(&duplicate).await;
    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));

    assert_eq!(db.categories().list().await.unwrap().len(), 1);
}

// =============================================================================
// Customers
// =============================================================================

#[tokio::test]
async fn duplicate_mobile_is_rejected() {
    let db = test_db().await;
    seed_customer(&db, "Asha Sharma", "9876543210").await;

    let mut clone = seed_customer(&db, "Ravi Kumar", "9123456780").await;
    clone.id = Uuid::new_v4().to_string();
    clone.mobile = "9876543210".to_string();

    let result = db.customers().insert(&clone).await;
    assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
}

#[tokio::test]
async fn contact_update_leaves_accumulators_alone() {
    let db = test_db().await;
    let milk = seed_product(&db, "Milk (1 L)", 5500, 200).await;
    let customer = seed_customer(&db, "Asha Sharma", "9876543210").await;
    let engine = engine(&db);

    // Earn some loyalty first
    let mut request = cash_request(vec![line(&milk, 20)], 0);
    request.customer_id = Some(customer.id.clone());
    engine.create_invoice(request).await.unwrap();

    let mut updated = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
    let purchases_before = updated.total_purchases_cents;
    let points_before = updated.loyalty_points;
    assert!(purchases_before > 0);

    updated.name = "Asha S.".to_string();
    updated.email = Some("asha@example.com".to_string());
    db.customers().update_contact(&updated).await.unwrap();

    let after = db.customers().get_by_id(&customer.id).await.unwrap().unwrap();
    assert_eq!(after.name, "Asha S.");
    assert_eq!(after.email.as_deref(), Some("asha@example.com"));
    assert_eq!(after.total_purchases_cents, purchases_before);
    assert_eq!(after.loyalty_points, points_before);
}

#[tokio::test]
async fn customer_search_by_name_or_mobile() {
    let db = test_db().await;
    let asha = seed_customer(&db, "Asha Sharma", "9876543210").await;
    seed_customer(&db, "Ravi Kumar", "9123456780").await;

    let by_name = db.customers().search("sharma", 10).await.unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, asha.id);

    let by_mobile = db.customers().search("98765", 10).await.unwrap();
    assert_eq!(by_mobile.len(), 1);
    assert_eq!(by_mobile[0].id, asha.id);

    // Walk-in sentinel + the two above
    assert_eq!(db.customers().count().await.unwrap(), 3);
}

// =============================================================================
// Ledger Reads and Reporting
// =============================================================================

#[tokio::test]
async fn ledger_reads_and_rollups() {
    let db = test_db().await;
    let apple = seed_product(&db, "Apple (1 kg)", 15000, 100).await;
    let banana = seed_product(&db, "Banana (1 dozen)", 6000, 80).await;
    let customer = seed_customer(&db, "Asha Sharma", "9876543210").await;
    let engine = engine(&db);

    let mut first = cash_request(vec![line(&apple, 2), line(&banana, 1)], 500);
    first.customer_id = Some(customer.id.clone());
    let first = engine.create_invoice(first).await.unwrap(); // 406.80

    let second = engine
        .create_invoice(cash_request(vec![line(&banana, 2)], 0))
        .await
        .unwrap(); // 120.00 + 21.60 tax = 141.60

    // Point reads
    let by_number = db
        .invoices()
        .get_by_number(&first.invoice.invoice_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_number.id, first.invoice.id);

    // Listing is newest-first and date filters apply
    let all = db.invoices().list(None, None, 10, 0).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.invoice.id);

    let future = Utc::now() + chrono::Duration::days(1);
    let none = db.invoices().list(Some(future), None, 10, 0).await.unwrap();
    assert!(none.is_empty());

    let for_customer = db
        .invoices()
        .list_for_customer(&customer.id, 10)
        .await
        .unwrap();
    assert_eq!(for_customer.len(), 1);

    // Aggregates
    let total = db.invoices().sales_total_between(None, None).await.unwrap();
    assert_eq!(total.cents(), 40680 + 14160);
    assert_eq!(db.invoices().count_between(None, None).await.unwrap(), 2);

    let daily = db.invoices().sales_by_day(7).await.unwrap();
    assert_eq!(daily.len(), 1);
    assert_eq!(daily[0].invoice_count, 2);
    assert_eq!(daily[0].total_cents, 40680 + 14160);

    // True calendar-month bucket: both invoices land in this month
    let monthly = db.invoices().sales_by_month(6).await.unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].month, Utc::now().format("%Y-%m").to_string());
    assert_eq!(monthly[0].total_cents, 40680 + 14160);

    // Banana sold 3 total, apple 2
    let top = db.invoices().top_products(5).await.unwrap();
    assert_eq!(top[0].product_name, "Banana (1 dozen)");
    assert_eq!(top[0].total_quantity, 3);
    assert_eq!(top[1].total_quantity, 2);
}

// =============================================================================
// Activity Log
// =============================================================================

#[tokio::test]
async fn activity_log_appends_and_lists() {
    let db = test_db().await;

    db.activity()
        .log("admin-1", "STOCK_UPDATE", Some("Received delivery".to_string()), None)
        .await
        .unwrap();
    db.activity()
        .log("cashier-1", "LOGIN", None, Some("10.0.0.5".to_string()))
        .await
        .unwrap();

    let logs = db.activity().recent(10).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().any(|l| l.action == "STOCK_UPDATE"));
    assert!(logs.iter().any(|l| l.ip_address.as_deref() == Some("10.0.0.5")));
}

// =============================================================================
// CSV Export Adapter
// =============================================================================

#[tokio::test]
async fn export_reports_reflect_committed_state() {
    let db = test_db().await;
    let apple = seed_product(&db, "Apple (1 kg)", 15000, 100).await;
    let customer = seed_customer(&db, "Asha Sharma", "9876543210").await;
    let engine = engine(&db);

    let mut with_customer = cash_request(vec![line(&apple, 2)], 500);
    with_customer.customer_id = Some(customer.id.clone());
    let created = engine.create_invoice(with_customer).await.unwrap();

    engine
        .create_invoice(cash_request(vec![line(&apple, 1)], 0))
        .await
        .unwrap();

    let exporter = ReportExporter::new(&db);

    let sales = exporter.sales_csv(None, None).await.unwrap();
    assert!(sales.starts_with(
        "Invoice Number,Date,Customer,Subtotal,Tax,Discount,Total,Payment Method\n"
    ));
    assert!(sales.contains(&created.invoice.invoice_number));
    assert!(sales.contains("Asha Sharma"));
    assert!(sales.contains("Walk-in")); // the anonymous sale
    assert_eq!(sales.lines().count(), 3);

    let inventory = exporter.inventory_csv().await.unwrap();
    assert!(inventory.contains(&apple.barcode));
    // 100 on the shelf minus 3 sold, in the quantity column
    assert!(inventory.contains(",97,"));

    let customers = exporter.customers_csv().await.unwrap();
    assert!(customers.contains("9876543210"));
    assert!(customers.contains("Walk-in Customer"));
}
