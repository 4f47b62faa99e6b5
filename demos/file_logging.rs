//! File logging example
//!
//! Demonstrates attaching the file backend by name next to the console.
//!
//! Run with: cargo run --example file_logging

use multiwriter_logger::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Multiwriter Logger - File Logging Example ===\n");

    let registry = Arc::new(BackendRegistry::with_builtin_backends());
    let logger = Logger::builder()
        .registry(registry)
        .prefix("app")
        .writer("file", r#"{"filename": "application.log"}"#)
        .build()?;

    println!("Writers: {:?}", logger.writer_names());

    logger.info("Application started");
    logger.dbg("Loading configuration...");
    logger.warn("Using default settings for some options");
    logger.err("Failed to load optional plugin");

    for i in 1..=5 {
        logger.info(format!("Processing item {}/5", i));
    }

    // Detach the file writer; this flushes and releases the file lock
    logger.remove_writer("file")?;
    logger.info("File writer detached, console only from here");

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the file output");

    Ok(())
}
