// Small dev utility: enqueue an order line into the production queue.
//
// Usage:
//   cargo run --bin seed_orders -- <db_path> <order_id> <recipe_name> [pallet_count]

use krusty_kookies::db::{ensure_schema, open_sqlite_connection};
use krusty_kookies::domain::ProductionOrder;
use krusty_kookies::repository::SqlitePalletRepository;
use std::sync::{Arc, Mutex};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    krusty_kookies::logging::init();

    let mut args = std::env::args().skip(1);
    let usage = "usage: seed_orders <db_path> <order_id> <recipe_name> [pallet_count]";

    let db_path = args.next().ok_or(usage)?;
    let order_id: i64 = args.next().ok_or(usage)?.parse()?;
    let recipe_name = args.next().ok_or(usage)?;
    let pallet_count: u32 = match args.next() {
        Some(raw) => raw.parse()?,
        None => 1,
    };

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;
    let repo = SqlitePalletRepository::from_connection(Arc::new(Mutex::new(conn)));

    let order = ProductionOrder::new(order_id, recipe_name, pallet_count);
    let enqueued = repo.enqueue_order(&order)?;
    let pending = repo.count_pending()?;

    println!("enqueued={} pending={}", enqueued, pending);
    Ok(())
}
