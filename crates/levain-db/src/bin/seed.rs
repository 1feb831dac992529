//! # Demo Data Seeder
//!
//! Populates the database with demo users, the bakery catalog, and sales
//! history so the reports and the forecast have something to show.
//!
//! ## Usage
//! ```bash
//! # Seed the default database with 60 days of history
//! cargo run -p levain-db --bin seed
//!
//! # Custom database path and history depth
//! cargo run -p levain-db --bin seed -- --db ./data/levain.db --days 90
//! ```
//!
//! Seeding is deterministic: the "randomness" is arithmetic over the day
//! and transaction indices, so repeated runs against fresh databases give
//! identical data.

use chrono::{Duration, TimeZone, Utc};
use std::env;
use uuid::Uuid;

use levain_core::{PaymentMethod, Product, Role, Sale, SaleLineItem};
use levain_db::{Database, DbConfig};

/// The bakery catalog: (name, price_cents, stock, shelf-life days).
const CATALOG: &[(&str, i64, i64, Option<i64>)] = &[
    ("Pandesal", 300, 200, Some(2)),
    ("Ensaymada", 2500, 60, Some(4)),
    ("Spanish Bread", 1500, 120, Some(3)),
    ("Cheese Bread", 1200, 90, Some(3)),
    ("Ube Loaf", 7000, 30, None),
];

const DISCOUNTS: &[i64] = &[0, 200, 500];

const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod::Cash,
    PaymentMethod::Cash,
    PaymentMethod::Card,
    PaymentMethod::EWallet,
];

/// Cheap deterministic mixer for demo data.
fn mix(a: u64, b: u64) -> u64 {
    a.wrapping_mul(6364136223846793005)
        .wrapping_add(b.wrapping_mul(1442695040888963407))
        .rotate_left(17)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 60;
    let mut db_path = String::from("./levain_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(60);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Levain POS Demo Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --days <N>         Days of sales history (default: 60)");
                println!("  -d, --db <PATH>    Database file path (default: ./levain_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Levain POS Demo Seeder");
    println!("======================");
    println!("Database: {}", db_path);
    println!("History:  {} days", days);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Staff
    let admin = db.users().insert("admin", Role::Admin).await?;
    let cashier = db.users().insert("cashier", Role::Cashier).await?;
    println!("✓ Created users: {} / {}", admin.username, cashier.username);

    // Catalog
    let now = Utc::now();
    let today = now.date_naive();
    let mut products = Vec::with_capacity(CATALOG.len());
    for (name, price_cents, stock, shelf_life) in CATALOG {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: (*name).to_string(),
            ingredients: String::new(),
            price_cents: *price_cents,
            stock: *stock,
            is_active: true,
            is_archived: false,
            expiration_date: shelf_life.map(|d| today + Duration::days(d)),
            image_url: None,
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&product).await?;
        products.push(product);
    }
    println!("✓ Created {} products", products.len());

    // Sales history, newest day last
    let mut sales = 0usize;
    for d in (0..=days).rev() {
        let date = today - Duration::days(d);
        let day_seed = mix(d as u64, 0x5eed);
        // 5-25 transactions per day
        let tx_count = 5 + (day_seed % 21) as i64;

        for t in 0..tx_count {
            let tx_seed = mix(day_seed, t as u64);
            let item_count = 1 + (tx_seed % 3) as usize;
            let discount_cents = DISCOUNTS[(tx_seed % DISCOUNTS.len() as u64) as usize];
            let payment_method =
                PAYMENT_METHODS[(mix(tx_seed, 7) % PAYMENT_METHODS.len() as u64) as usize];

            let opened = date
                .and_hms_opt(6 + (tx_seed % 12) as u32, (tx_seed % 60) as u32, 0)
                .expect("valid demo timestamp");
            let created_at = Utc.from_utc_datetime(&opened);

            let sale_id = Uuid::new_v4().to_string();
            let mut lines = Vec::with_capacity(item_count);
            let mut subtotal = 0i64;
            for k in 0..item_count {
                let line_seed = mix(tx_seed, 100 + k as u64);
                let product = &products[(line_seed % products.len() as u64) as usize];
                let quantity = 1 + (line_seed % 6) as i64;
                let line_total = product.price_cents * quantity;
                subtotal += line_total;
                lines.push(SaleLineItem {
                    id: Uuid::new_v4().to_string(),
                    sale_id: sale_id.clone(),
                    product_id: product.id.clone(),
                    name_snapshot: product.name.clone(),
                    unit_price_cents: product.price_cents,
                    quantity,
                    line_total_cents: line_total,
                });
            }

            let sale = Sale {
                id: sale_id,
                cashier_id: cashier.id.clone(),
                total_cents: (subtotal - discount_cents).max(0),
                discount_cents,
                payment_method,
                tendered_cents: None,
                change_cents: None,
                created_at,
            };

            db.sales().insert_historical(&sale, &lines).await?;
            sales += 1;
        }
    }
    println!("✓ Created {} historical sales", sales);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
