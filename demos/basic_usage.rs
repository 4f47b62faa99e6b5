//! Basic logger usage example
//!
//! Demonstrates synchronous logging to the console at different severities.
//!
//! Run with: cargo run --example basic_usage

use multiwriter_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Multiwriter Logger - Basic Usage Example ===\n");

    // Synchronous logger with the console writer attached
    let logger = Logger::new();
    logger.set_prefix("demo");

    println!("1. Logging at different levels:");
    logger.atk("Repeated login failures from 10.0.0.7");
    logger.critical("Primary database unreachable");
    logger.alert("Certificate expires in 2 days");
    logger.emergency("Disk almost full");
    logger.info("Service started");
    logger.warn("Using default settings for some options");
    logger.err("Failed to load optional plugin");
    logger.dbg("Loaded 42 routes");

    println!("\n2. Raising the threshold to Warn:");
    logger.set_level(Severity::Warn);
    logger.dbg("Debug message (hidden)");
    logger.err("Error message (hidden, less severe than warn)");
    logger.info("Info message (visible)");
    logger.warn("Warning message (visible)");

    println!("\n3. Call-site annotation:");
    logger.enable_call_site(true);
    logger.warn("Where was this logged?");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
