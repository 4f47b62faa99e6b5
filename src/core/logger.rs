//! Logger facade: the public handle around one writer manager

use super::{
    backend::Backend,
    config::{WriterConfig, DEFAULT_QUEUE_CAPACITY},
    error::{LoggerError, Result},
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    registry::BackendRegistry,
    severity::Severity,
    writer_manager::WriterManager,
};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// Default shutdown timeout for logger cleanup (5 seconds)
///
/// This timeout is used when the logger is dropped without explicit shutdown.
/// For custom timeout control, use the `shutdown()` method instead.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Level-tagged logging front end.
///
/// Every emit method is `#[track_caller]`, so with call-site annotation on the
/// reported file and line are those of the code calling the logger. Helpers
/// that wrap these methods must be `#[track_caller]` too, or the helper's own
/// location is reported instead.
pub struct Logger {
    manager: Arc<WriterManager>,
}

impl Logger {
    /// Synchronous logger with the built-in backends available and a console
    /// writer attached (when the `console` feature is enabled).
    #[must_use]
    pub fn new() -> Self {
        let manager = Arc::new(WriterManager::new(
            WriterConfig::default(),
            Arc::new(BackendRegistry::with_builtin_backends()),
            DEFAULT_QUEUE_CAPACITY,
            OverflowPolicy::default(),
            None,
        ));
        let logger = Self { manager };
        #[cfg(feature = "console")]
        logger.attach_default_console();
        logger
    }

    /// Build a logger from a JSON configuration such as
    /// `{"Level": "warn", "Prefix": "api"}`. An empty string uses defaults.
    pub fn from_json(config: &str, registry: Arc<BackendRegistry>) -> Result<Self> {
        Logger::builder()
            .config(WriterConfig::from_json(config)?)
            .registry(registry)
            .build()
    }

    #[cfg(feature = "console")]
    fn attach_default_console(&self) {
        let console: Arc<dyn Backend> = Arc::new(crate::backends::ConsoleBackend::new());
        if let Err(e) = self.manager.set_writer_instance("console", console, "") {
            eprintln!("[LOGGER ERROR] default console writer unavailable: {}", e);
        }
    }

    /// The underlying writer manager.
    pub fn manager(&self) -> &Arc<WriterManager> {
        &self.manager
    }

    // ------------------------------------------------------------------
    // Lifecycle controls
    // ------------------------------------------------------------------

    /// Attach a backend kind by registry name, configured with `config`.
    pub fn set_writer(&self, name: &str, config: &str) -> Result<()> {
        self.manager.set_writer(name, config)
    }

    /// Attach a backend instance the caller constructed.
    pub fn add_writer(&self, name: &str, backend: Arc<dyn Backend>, config: &str) -> Result<()> {
        self.manager.set_writer_instance(name, backend, config)
    }

    pub fn remove_writer(&self, name: &str) -> Result<()> {
        self.manager.remove_writer(name)
    }

    /// Send async messages of exactly `level` to `backend` only.
    pub fn set_level_writer(&self, level: Severity, backend: Option<Arc<dyn Backend>>) {
        self.manager.set_level_override(level, backend);
    }

    pub fn clear_level_writer(&self, level: Severity) -> bool {
        self.manager.clear_level_override(level)
    }

    pub fn level(&self) -> Severity {
        self.manager.level()
    }

    pub fn set_level(&self, level: Severity) {
        self.manager.set_level(level);
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.manager.set_prefix(prefix);
    }

    pub fn prefix(&self) -> String {
        self.manager.prefix()
    }

    /// Switch between synchronous and asynchronous dispatch.
    pub fn set_async(&self, enabled: bool) -> Result<()> {
        self.manager.set_async(enabled)
    }

    pub fn is_async(&self) -> bool {
        self.manager.is_async()
    }

    /// Prepend `"[file:line] "` of the calling code to each message.
    pub fn enable_call_site(&self, enabled: bool) {
        self.manager.set_call_site_annotation(enabled);
    }

    pub fn current_writer(&self) -> Option<String> {
        self.manager.current_writer()
    }

    pub fn writer_names(&self) -> Vec<String> {
        self.manager.writer_names()
    }

    /// Get the logger metrics for detailed observability
    ///
    /// # Example
    ///
    /// ```
    /// use multiwriter_logger::Logger;
    ///
    /// let logger = Logger::new();
    /// logger.info("ready");
    ///
    /// let metrics = logger.metrics();
    /// println!("Written: {}", metrics.messages_written());
    /// println!("Failure rate: {:.2}%", metrics.failure_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        self.manager.metrics()
    }

    /// Gracefully shut the logger down with a custom timeout
    ///
    /// Leaves async mode, waits for queued messages to be written, then
    /// destroys every attached backend.
    ///
    /// # Returns
    ///
    /// `true` if the dispatcher drained within `timeout`, `false` otherwise
    ///
    /// # Example
    ///
    /// ```no_run
    /// use multiwriter_logger::{Logger, DEFAULT_SHUTDOWN_TIMEOUT};
    ///
    /// let logger = Logger::new();
    /// logger.set_async(true).unwrap();
    /// logger.info("Important message");
    ///
    /// if !logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT) {
    ///     eprintln!("Warning: Logger shutdown timed out");
    /// }
    /// ```
    pub fn shutdown(&self, timeout: Duration) -> bool {
        self.manager.shutdown(timeout)
    }

    // ------------------------------------------------------------------
    // Emit methods
    // ------------------------------------------------------------------

    /// Emit `message` at `level` without a level marker.
    #[track_caller]
    pub fn log(&self, level: Severity, message: impl AsRef<str>) {
        self.manager.emit(level, message.as_ref(), Location::caller());
    }

    #[track_caller]
    #[inline]
    fn tagged(&self, level: Severity, message: &str) {
        self.manager
            .emit_tagged(level, level.marker(), message, Location::caller());
    }

    #[track_caller]
    pub fn atk(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Attack, message.as_ref());
    }

    #[track_caller]
    pub fn critical(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Critical, message.as_ref());
    }

    #[track_caller]
    pub fn alert(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Alert, message.as_ref());
    }

    #[track_caller]
    pub fn emergency(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Emergency, message.as_ref());
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Info, message.as_ref());
    }

    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Warn, message.as_ref());
    }

    #[track_caller]
    pub fn err(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Error, message.as_ref());
    }

    #[track_caller]
    pub fn dbg(&self, message: impl AsRef<str>) {
        self.tagged(Severity::Debug, message.as_ref());
    }

    /// Log `message` at error level and hand it back as an error value,
    /// for `return Err(logger.err_value(...))` style call sites.
    #[track_caller]
    pub fn err_value(&self, message: impl Into<String>) -> LoggerError {
        let message = message.into();
        self.tagged(Severity::Error, &message);
        LoggerError::Other(message)
    }

    /// Log `err` at error level, optionally prefixed by `"[title] "`.
    ///
    /// Returns `true` so it can sit inside a condition:
    /// `if let Err(e) = op() { logger.log_err(&e, Some("op")); }`.
    #[track_caller]
    pub fn log_err<E: fmt::Display + ?Sized>(&self, err: &E, title: Option<&str>) -> bool {
        let message = match title {
            Some(title) => format!("[{}] {}", title, err),
            None => err.to_string(),
        };
        self.tagged(Severity::Error, &message);
        true
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // The dispatcher holds its own handle on the manager; stop it so the
        // manager can be released. Backends are left to their owners.
        if !self.manager.stop_dispatcher(DEFAULT_SHUTDOWN_TIMEOUT) {
            eprintln!("[LOGGER WARNING] Logger dropped before the async queue drained");
        }

        let metrics = self.manager.metrics();
        if metrics.dropped_count() > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped messages",
                metrics.dropped_count()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use multiwriter_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level(Severity::Warn)
///     .prefix("api")
///     .async_mode(true)
///     .queue_capacity(1000)
///     .overflow_policy(OverflowPolicy::Block)
///     .build()
///     .unwrap();
/// assert!(logger.is_async());
/// ```
pub struct LoggerBuilder {
    config: WriterConfig,
    registry: Option<Arc<BackendRegistry>>,
    queue_capacity: usize,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    asynchronous: bool,
    call_site: bool,
    default_console: bool,
    writers: Vec<(String, String)>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: WriterConfig::default(),
            registry: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            on_overflow: None,
            asynchronous: false,
            call_site: false,
            default_console: true,
            writers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Severity) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    /// Registry used to resolve backend names. Defaults to one holding the
    /// built-in backends.
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<BackendRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the policy applied when the async queue is full
    ///
    /// Default is `Block`.
    ///
    /// # Example
    ///
    /// ```
    /// use multiwriter_logger::prelude::*;
    /// use std::time::Duration;
    ///
    /// let logger = Logger::builder()
    ///     .queue_capacity(100)
    ///     .overflow_policy(OverflowPolicy::BlockWithTimeout(Duration::from_millis(50)))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Set a callback for overflow notifications
    ///
    /// The callback is invoked when messages are dropped due to queue overflow.
    /// The parameter is the total count of dropped messages.
    #[must_use = "builder methods return a new value"]
    pub fn on_overflow(mut self, callback: OverflowCallback) -> Self {
        self.on_overflow = Some(callback);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn async_mode(mut self, enabled: bool) -> Self {
        self.asynchronous = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn call_site(mut self, enabled: bool) -> Self {
        self.call_site = enabled;
        self
    }

    /// Whether the console writer is attached automatically (default `true`).
    #[must_use = "builder methods return a new value"]
    pub fn default_console(mut self, enabled: bool) -> Self {
        self.default_console = enabled;
        self
    }

    /// Attach a registry backend by name once the logger is built.
    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, name: impl Into<String>, config: impl Into<String>) -> Self {
        self.writers.push((name.into(), config.into()));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        if self.queue_capacity == 0 {
            return Err(LoggerError::config(
                "LoggerBuilder",
                "queue capacity must be greater than zero",
            ));
        }
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(BackendRegistry::with_builtin_backends()));
        let manager = Arc::new(WriterManager::new(
            self.config,
            registry,
            self.queue_capacity,
            self.overflow_policy,
            self.on_overflow,
        ));
        let logger = Logger { manager };

        #[cfg(feature = "console")]
        if self.default_console {
            logger.attach_default_console();
        }

        for (name, config) in &self.writers {
            logger.set_writer(name, config)?;
        }
        logger.enable_call_site(self.call_site);
        if self.asynchronous {
            logger.set_async(true)?;
        }
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use multiwriter_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(Severity::Info)
    ///     .default_console(false)
    ///     .build()
    ///     .unwrap();
    /// assert!(logger.writer_names().is_empty());
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct MemoryBackend {
        lines: Mutex<Vec<String>>,
    }

    impl Backend for MemoryBackend {
        fn init(&self, _config: &str) -> Result<()> {
            Ok(())
        }

        fn write(&self, _level: Severity, message: &str) -> Result<()> {
            self.lines.lock().push(message.to_string());
            Ok(())
        }

        fn destroy(&self) {}

        fn name(&self) -> &str {
            "memory"
        }
    }

    fn quiet_logger() -> (Logger, Arc<MemoryBackend>) {
        let logger = Logger::builder()
            .prefix("app")
            .default_console(false)
            .build()
            .unwrap();
        let backend = Arc::new(MemoryBackend::default());
        logger.add_writer("memory", backend.clone(), "").unwrap();
        (logger, backend)
    }

    #[test]
    fn test_builder_defaults() {
        let logger = Logger::builder().build().unwrap();
        assert_eq!(logger.level(), Severity::Debug);
        assert_eq!(logger.prefix(), "vectors");
        assert!(!logger.is_async());
        #[cfg(feature = "console")]
        assert_eq!(logger.current_writer().as_deref(), Some("console"));
    }

    #[test]
    fn test_from_json() {
        let registry = Arc::new(BackendRegistry::new());
        let logger = Logger::from_json(r#"{"Level": 6, "Prefix": "svc"}"#, registry).unwrap();
        assert_eq!(logger.level(), Severity::Warn);
        assert_eq!(logger.prefix(), "svc");

        let registry = Arc::new(BackendRegistry::new());
        assert!(Logger::from_json("{oops", registry).is_err());
    }

    #[test]
    fn test_tagged_methods() {
        let (logger, backend) = quiet_logger();
        logger.atk("a");
        logger.critical("c");
        logger.alert("l");
        logger.emergency("m");
        logger.info("i");
        logger.warn("w");
        logger.err("e");
        logger.dbg("d");
        logger.log(Severity::Info, "raw");

        let lines = backend.lines.lock();
        assert_eq!(
            lines.as_slice(),
            &[
                "[app][K] a",
                "[app][C] c",
                "[app][A] l",
                "[app][M] m",
                "[app][I] i",
                "[app][W] w",
                "[app][E] e",
                "[app][D] d",
                "[app]raw",
            ]
        );
    }

    #[test]
    fn test_call_site_reports_caller() {
        let (logger, backend) = quiet_logger();
        logger.enable_call_site(true);
        let line = line!() + 1;
        logger.info("here");
        assert_eq!(
            backend.lines.lock()[0],
            format!("[app][logger.rs:{}] [I] here", line)
        );
    }

    #[test]
    fn test_error_helpers() {
        let (logger, backend) = quiet_logger();
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no config");
        assert!(logger.log_err(&io_err, Some("load")));
        let err = logger.err_value("bad input");
        assert_eq!(err.to_string(), "bad input");

        let lines = backend.lines.lock();
        assert_eq!(lines[0], "[app][E] [load] no config");
        assert_eq!(lines[1], "[app][E] bad input");
    }

    #[test]
    fn test_builder_rejects_zero_capacity() {
        let result = Logger::builder().default_console(false).queue_capacity(0).build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_builder_unknown_writer_fails() {
        let result = Logger::builder()
            .default_console(false)
            .registry(Arc::new(BackendRegistry::new()))
            .writer("smtp", "{}")
            .build();
        assert!(matches!(result, Err(LoggerError::UnknownBackend(_))));
    }
}
