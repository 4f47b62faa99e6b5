//! Async logging example
//!
//! Demonstrates the async dispatcher with several producer threads and a
//! per-severity override writer.
//!
//! Run with: cargo run --example async_logging

use multiwriter_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Multiwriter Logger - Async Logging Example ===\n");

    let logger = Logger::builder()
        .prefix("async")
        .queue_capacity(1000)
        .async_mode(true)
        .build()?;

    // Attack reports go to a separate, uncolored console writer only
    let security: Arc<dyn Backend> = Arc::new(ConsoleBackend::with_colors(false));
    logger.set_level_writer(Severity::Attack, Some(security));

    println!("1. High-volume async logging:");
    for i in 0..100 {
        logger.info(format!("Message #{}", i));
    }
    logger.atk("Port scan detected");

    println!("\n2. Multi-threaded logging:");
    let logger = Arc::new(logger);
    let mut handles = vec![];
    for thread_id in 0..5 {
        let logger = Arc::clone(&logger);
        handles.push(thread::spawn(move || {
            for i in 0..20 {
                logger.info(format!("Thread {} - Message {}", thread_id, i));
                thread::sleep(Duration::from_millis(10));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    if !logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
        eprintln!("Warning: logger did not drain in time");
    }

    let metrics = logger.metrics();
    println!(
        "\nWritten: {}, failures: {}, pooled reuses: {}",
        metrics.messages_written(),
        metrics.write_failures(),
        metrics.pool_reuses()
    );
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
