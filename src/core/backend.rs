//! Backend trait for log output destinations

use super::{error::Result, severity::Severity};

/// An output destination the writer manager can fan messages out to.
///
/// Instances are shared between callers writing synchronously and the async
/// dispatcher, so every method takes `&self` and implementations keep their
/// mutable state behind their own locks.
///
/// # Example
///
/// ```
/// use multiwriter_logger::core::{Backend, Result, Severity};
/// use parking_lot::Mutex;
///
/// #[derive(Default)]
/// struct MemoryBackend {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl Backend for MemoryBackend {
///     fn init(&self, _config: &str) -> Result<()> {
///         Ok(())
///     }
///
///     fn write(&self, _level: Severity, message: &str) -> Result<()> {
///         self.lines.lock().push(message.to_string());
///         Ok(())
///     }
///
///     fn destroy(&self) {
///         self.lines.lock().clear();
///     }
///
///     fn name(&self) -> &str {
///         "memory"
///     }
/// }
/// ```
pub trait Backend: Send + Sync {
    /// Configure the backend from an opaque, conventionally JSON, config string.
    fn init(&self, config: &str) -> Result<()>;

    /// Write one formatted message. Must not panic on failure.
    fn write(&self, level: Severity, message: &str) -> Result<()>;

    /// Release held resources.
    fn destroy(&self);

    fn name(&self) -> &str;
}
