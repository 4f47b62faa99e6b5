//! Core logger types and traits

pub mod backend;
pub mod config;
pub mod error;
pub mod logger;
pub mod message;
pub mod metrics;
pub mod overflow_policy;
pub mod registry;
pub mod severity;
pub mod writer_manager;

pub use backend::Backend;
pub use config::{WriterConfig, DEFAULT_PREFIX, DEFAULT_QUEUE_CAPACITY};
pub use error::{LoggerError, Result};
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use message::{Message, MessagePool};
pub use metrics::LoggerMetrics;
pub use overflow_policy::{OverflowCallback, OverflowPolicy};
pub use registry::{BackendFactory, BackendRegistry};
pub use severity::Severity;
pub use writer_manager::WriterManager;
