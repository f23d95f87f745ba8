//! Session pool example.
//!
//! Demonstrates blocking checkout, the fire-and-forget write path, and
//! status monitoring. Runs against the scripted in-memory backend so no
//! server is required:
//!
//! ```bash
//! cargo run --example session_pool
//! ```

// Allow common patterns in example code
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::thread;
use std::time::Duration;

use pgdb_pool::{Pool, PoolConfig};
use pgdb_testing::MockConnector;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let connector = MockConnector::new();
    let config = PoolConfig::new().capacity(4);

    println!("=== Session Pool Example ===\n");
    println!("Pool capacity: {}", config.capacity);

    let pool = Pool::new(&connector, "host=mock dbname=demo", config)?;

    // 1. Exclusive checkout: the guard returns the slot on drop.
    println!("\n1. Checkout and return:");
    {
        let session = pool.acquire();
        println!("  holding slot {}", session.slot());
        let status = pool.status();
        println!("  status: {}/{} in use", status.in_use, status.capacity);
    }
    println!("  returned; {} slots free", pool.status().available);

    // 2. Concurrent fire-and-forget writes through the pool.
    println!("\n2. Concurrent writes (16 workers, 4 slots):");
    thread::scope(|scope| {
        for worker in 0..16 {
            let pool = &pool;
            scope.spawn(move || {
                for i in 0..4 {
                    pool.write(&format!("INSERT INTO events VALUES ({worker}, {i})"));
                    thread::sleep(Duration::from_millis(5));
                }
            });
        }
    });
    println!("  executed {} statements", connector.executed().len());

    // 3. A failing statement is logged, never raised.
    println!("\n3. Write failure handling:");
    let connector = MockConnector::new().fail_on("INSERT INTO broken VALUES (1)");
    let pool = Pool::new(&connector, "host=mock dbname=demo", PoolConfig::new().capacity(1))?;
    pool.write("INSERT INTO broken VALUES (1)");
    println!(
        "  write returned normally; {} slot(s) still free",
        pool.status().available
    );

    Ok(())
}
