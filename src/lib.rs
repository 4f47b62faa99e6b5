//! # Multiwriter Logger
//!
//! A leveled log dispatcher that filters messages against a severity
//! threshold and fans them out to pluggable writer backends.
//!
//! ## Features
//!
//! - **Multiple Backends**: console, file, and custom [`Backend`] implementations
//!   attached by name through a [`BackendRegistry`]
//! - **Async Dispatch**: a bounded queue drained by one dispatcher thread, with
//!   pooled message objects and an explicit [`OverflowPolicy`]
//! - **Per-Level Routing**: send one severity to a dedicated backend
//! - **Call-Site Annotation**: `[file:line]` of the calling code
//!
//! ## Example
//!
//! ```
//! use multiwriter_logger::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(BackendRegistry::with_builtin_backends());
//! let logger = Logger::builder()
//!     .registry(registry)
//!     .level(Severity::Warn)
//!     .prefix("api")
//!     .build()?;
//!
//! logger.warn("disk usage at 91%");
//! logger.dbg("filtered out");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod backends;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::backends::ConsoleBackend;
    #[cfg(feature = "file")]
    pub use crate::backends::FileBackend;
    pub use crate::core::{
        Backend, BackendFactory, BackendRegistry, Logger, LoggerBuilder, LoggerError,
        LoggerMetrics, OverflowCallback, OverflowPolicy, Result, Severity, WriterConfig,
        WriterManager, DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

#[cfg(feature = "console")]
pub use backends::ConsoleBackend;
#[cfg(feature = "file")]
pub use backends::FileBackend;
pub use core::{
    Backend, BackendFactory, BackendRegistry, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    OverflowCallback, OverflowPolicy, Result, Severity, WriterConfig, WriterManager,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
