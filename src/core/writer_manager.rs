//! Writer manager: severity filtering, formatting and dispatch to backends
//!
//! Messages are written either directly on the caller's thread (synchronous
//! mode) or pushed through a bounded queue to a single dispatcher thread
//! (asynchronous mode). The active backend set and the per-severity override
//! table are published as immutable snapshots: mutators build a new map under
//! the manager lock and swap it in, writers clone the current `Arc` and never
//! hold a lock while a backend performs I/O.

use super::{
    backend::Backend,
    config::WriterConfig,
    error::{LoggerError, Result},
    message::{Message, MessagePool},
    metrics::LoggerMetrics,
    overflow_policy::{OverflowCallback, OverflowPolicy},
    registry::BackendRegistry,
    severity::Severity,
};
use crossbeam_channel::{
    bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender, TrySendError,
};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe, Location};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

type BackendSet = HashMap<String, Arc<dyn Backend>>;
type OverrideSet = HashMap<Severity, Arc<dyn Backend>>;

/// How long an idle dispatcher waits before re-checking the async flag.
const DISPATCHER_IDLE_POLL: Duration = Duration::from_millis(50);

/// Drop alerts are printed for the first drop and then every this many.
const DROP_ALERT_INTERVAL: u64 = 1000;

/// Fields that change only under the manager lock.
#[derive(Default)]
struct ManagerState {
    current_writer: Option<String>,
    dispatcher_running: bool,
    dispatcher: Option<thread::JoinHandle<()>>,
}

pub struct WriterManager {
    registry: Arc<BackendRegistry>,
    backends: RwLock<Arc<BackendSet>>,
    overrides: RwLock<Arc<OverrideSet>>,
    config: RwLock<WriterConfig>,
    asynchronous: AtomicBool,
    annotate_call_site: AtomicBool,
    sender: Sender<Box<Message>>,
    receiver: Receiver<Box<Message>>,
    queue_capacity: usize,
    pool: MessagePool,
    overflow_policy: OverflowPolicy,
    on_overflow: Option<OverflowCallback>,
    metrics: LoggerMetrics,
    state: Mutex<ManagerState>,
}

impl WriterManager {
    /// Create a manager in synchronous mode with no backends attached.
    pub fn new(
        config: WriterConfig,
        registry: Arc<BackendRegistry>,
        queue_capacity: usize,
        overflow_policy: OverflowPolicy,
        on_overflow: Option<OverflowCallback>,
    ) -> Self {
        let queue_capacity = queue_capacity.max(1);
        let (sender, receiver) = bounded(queue_capacity);
        Self {
            registry,
            backends: RwLock::new(Arc::new(BackendSet::new())),
            overrides: RwLock::new(Arc::new(OverrideSet::new())),
            config: RwLock::new(config),
            asynchronous: AtomicBool::new(false),
            annotate_call_site: AtomicBool::new(false),
            sender,
            receiver,
            queue_capacity,
            pool: MessagePool::new(queue_capacity),
            overflow_policy,
            on_overflow,
            metrics: LoggerMetrics::new(),
            state: Mutex::new(ManagerState::default()),
        }
    }

    // ------------------------------------------------------------------
    // Emit path
    // ------------------------------------------------------------------

    /// `true` when a message at `level` passes the threshold.
    #[inline]
    pub fn enabled(&self, level: Severity) -> bool {
        level.is_at_least(self.config.read().level)
    }

    /// Filter, format and dispatch one message. Never fails.
    pub fn emit(&self, level: Severity, raw: &str, location: &Location<'_>) {
        self.emit_tagged(level, "", raw, location);
    }

    /// Like [`emit`](Self::emit) with a level marker placed before the text.
    pub fn emit_tagged(&self, level: Severity, tag: &str, raw: &str, location: &Location<'_>) {
        let text = {
            let config = self.config.read();
            if !level.is_at_least(config.level) {
                return;
            }
            let mut text = String::with_capacity(config.prefix.len() + tag.len() + raw.len() + 24);
            text.push('[');
            text.push_str(&config.prefix);
            text.push(']');
            if self.annotate_call_site.load(Ordering::Relaxed) {
                if let Some(site) = call_site(location) {
                    text.push_str(&site);
                }
            }
            text.push_str(tag);
            text.push_str(raw);
            text
        };

        if self.asynchronous.load(Ordering::Acquire) {
            let (mut message, reused) = self.pool.acquire();
            if reused {
                self.metrics.record_pool_reuse();
            }
            message.fill(level, &text);
            self.enqueue(message);
        } else {
            self.drain_pending();
            let backends = self.snapshot();
            self.write_to_set(&backends, level, &text);
        }
    }

    fn enqueue(&self, message: Box<Message>) {
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => self.handle_overflow(message),
            // The manager owns the receiver, so the channel never disconnects.
            Err(TrySendError::Disconnected(message)) => self.pool.release(message),
        }
    }

    fn handle_overflow(&self, message: Box<Message>) {
        self.metrics.record_queue_full();

        match &self.overflow_policy {
            OverflowPolicy::Block => {
                self.metrics.record_block();
                if let Err(err) = self.sender.send(message) {
                    self.pool.release(err.into_inner());
                }
            }

            OverflowPolicy::BlockWithTimeout(timeout) => {
                self.metrics.record_block();
                match self.sender.send_timeout(message, *timeout) {
                    Ok(()) => {}
                    Err(SendTimeoutError::Timeout(message)) => self.drop_message(message),
                    Err(SendTimeoutError::Disconnected(message)) => self.pool.release(message),
                }
            }

            OverflowPolicy::DropNewest => self.drop_message(message),

            OverflowPolicy::DropOldest => {
                let mut pending = message;
                loop {
                    if let Ok(oldest) = self.receiver.try_recv() {
                        self.drop_message(oldest);
                    }
                    match self.sender.try_send(pending) {
                        Ok(()) => break,
                        Err(TrySendError::Full(message)) => pending = message,
                        Err(TrySendError::Disconnected(message)) => {
                            self.pool.release(message);
                            break;
                        }
                    }
                }
            }
        }
    }

    fn drop_message(&self, message: Box<Message>) {
        let dropped = self.metrics.record_dropped();
        self.pool.release(message);

        if dropped == 0 || (dropped + 1) % DROP_ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER WARNING] Queue full ({} slots), {} messages dropped under {} policy.",
                self.queue_capacity,
                dropped + 1,
                self.overflow_policy
            );
            if let Some(ref callback) = self.on_overflow {
                callback(dropped + 1);
            }
        }
    }

    /// Write out anything still queued after async mode was switched off.
    fn drain_pending(&self) {
        while let Ok(message) = self.receiver.try_recv() {
            self.dispatch(message);
        }
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Route one dequeued message: the override backend for its exact
    /// severity if there is one, otherwise every active backend.
    fn dispatch(&self, message: Box<Message>) {
        let target = self.overrides.read().get(&message.level).cloned();
        match target {
            Some(backend) => {
                let name = backend.name().to_string();
                self.write_to(&name, backend.as_ref(), message.level, &message.text);
            }
            None => {
                let backends = self.snapshot();
                self.write_to_set(&backends, message.level, &message.text);
            }
        }
        self.pool.release(message);
    }

    fn write_to_set(&self, backends: &BackendSet, level: Severity, text: &str) {
        for (name, backend) in backends.iter() {
            self.write_to(name, backend.as_ref(), level, text);
        }
    }

    /// One backend write with failure and panic isolation.
    fn write_to(&self, name: &str, backend: &dyn Backend, level: Severity, text: &str) {
        let result = catch_unwind(AssertUnwindSafe(|| backend.write(level, text)));
        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                self.metrics.record_write_failure();
                eprintln!(
                    "[LOGGER ERROR] unable to write message to backend '{}': {}",
                    name, e
                );
            }
            Err(panic_info) => {
                self.metrics.record_write_failure();
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Backend '{}' panicked: {}. \
                     Other backends continue to function.",
                    name, panic_msg
                );
            }
        }
    }

    fn run_dispatcher(&self) {
        loop {
            match self.receiver.recv_timeout(DISPATCHER_IDLE_POLL) {
                Ok(message) => self.dispatch(message),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if !self.asynchronous.load(Ordering::Acquire) {
                self.drain_pending();
                let mut state = self.state.lock();
                // Re-enabled while draining: keep this dispatcher.
                if self.asynchronous.load(Ordering::Acquire) {
                    continue;
                }
                state.dispatcher_running = false;
                break;
            }
        }
    }

    // ------------------------------------------------------------------
    // Mode and configuration
    // ------------------------------------------------------------------

    /// Switch dispatch mode.
    ///
    /// Enabling starts the dispatcher thread unless one is already running.
    /// Disabling lets the running dispatcher drain the queue and exit.
    pub fn set_async(self: &Arc<Self>, enabled: bool) -> Result<()> {
        let mut state = self.state.lock();
        self.asynchronous.store(enabled, Ordering::Release);
        if !enabled || state.dispatcher_running {
            return Ok(());
        }

        // A previous dispatcher has already left its loop; reap it.
        if let Some(previous) = state.dispatcher.take() {
            let _ = previous.join();
        }

        let manager = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name("log-dispatcher".to_string())
            .spawn(move || manager.run_dispatcher());
        match spawned {
            Ok(handle) => {
                state.dispatcher = Some(handle);
                state.dispatcher_running = true;
                Ok(())
            }
            Err(e) => {
                self.asynchronous.store(false, Ordering::Release);
                Err(LoggerError::IoError(e))
            }
        }
    }

    pub fn is_async(&self) -> bool {
        self.asynchronous.load(Ordering::Acquire)
    }

    pub fn dispatcher_running(&self) -> bool {
        self.state.lock().dispatcher_running
    }

    pub fn level(&self) -> Severity {
        self.config.read().level
    }

    pub fn set_level(&self, level: Severity) {
        self.config.write().level = level;
    }

    pub fn prefix(&self) -> String {
        self.config.read().prefix.clone()
    }

    pub fn set_prefix(&self, prefix: impl Into<String>) {
        self.config.write().prefix = prefix.into();
    }

    pub fn config(&self) -> WriterConfig {
        self.config.read().clone()
    }

    pub fn set_call_site_annotation(&self, enabled: bool) {
        let _state = self.state.lock();
        self.annotate_call_site.store(enabled, Ordering::Relaxed);
    }

    pub fn call_site_annotation(&self) -> bool {
        self.annotate_call_site.load(Ordering::Relaxed)
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    pub fn queued(&self) -> usize {
        self.receiver.len()
    }

    pub fn overflow_policy(&self) -> &OverflowPolicy {
        &self.overflow_policy
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn registry(&self) -> &Arc<BackendRegistry> {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Backend registration
    // ------------------------------------------------------------------

    /// Attach (or re-initialize) the backend named `name`.
    ///
    /// An existing instance under that name is re-initialized with `config`;
    /// otherwise a fresh one is created from the registry. Nothing changes if
    /// the kind is unknown or initialization fails.
    pub fn set_writer(&self, name: &str, config: &str) -> Result<()> {
        let name = name.to_lowercase();
        let mut state = self.state.lock();

        let existing = self.backends.read().get(&name).cloned();
        let backend = match existing {
            Some(backend) => backend,
            None => {
                let factory = self
                    .registry
                    .lookup(&name)
                    .ok_or_else(|| LoggerError::unknown_backend(&name))?;
                factory()
            }
        };

        Self::init_backend(&name, backend.as_ref(), config)?;
        self.install(&name, backend);
        state.current_writer = Some(name);
        Ok(())
    }

    /// Attach a caller-constructed backend instance under `name`.
    pub fn set_writer_instance(
        &self,
        name: &str,
        backend: Arc<dyn Backend>,
        config: &str,
    ) -> Result<()> {
        let name = name.to_lowercase();
        let mut state = self.state.lock();
        Self::init_backend(&name, backend.as_ref(), config)?;
        self.install(&name, backend);
        state.current_writer = Some(name);
        Ok(())
    }

    fn init_backend(name: &str, backend: &dyn Backend, config: &str) -> Result<()> {
        backend.init(config).map_err(|e| {
            eprintln!("[LOGGER ERROR] set_writer '{}': {}", name, e);
            e
        })
    }

    /// Swap in a new snapshot containing `backend`. Caller holds the state lock.
    fn install(&self, name: &str, backend: Arc<dyn Backend>) {
        let mut next = BackendSet::clone(&self.backends.read());
        next.insert(name.to_string(), backend);
        *self.backends.write() = Arc::new(next);
    }

    /// Destroy and detach the backend named `name`.
    pub fn remove_writer(&self, name: &str) -> Result<()> {
        let name = name.to_lowercase();
        let mut state = self.state.lock();

        let mut next = BackendSet::clone(&self.backends.read());
        let backend = next
            .remove(&name)
            .ok_or_else(|| LoggerError::writer_not_found(&name))?;
        backend.destroy();
        *self.backends.write() = Arc::new(next);

        if state.current_writer.as_deref() == Some(name.as_str()) {
            state.current_writer = None;
        }
        Ok(())
    }

    /// Route async messages of exactly `level` to `backend` only.
    ///
    /// A missing backend is ignored.
    pub fn set_level_override(&self, level: Severity, backend: Option<Arc<dyn Backend>>) {
        let Some(backend) = backend else {
            return;
        };
        let _state = self.state.lock();
        let mut next = OverrideSet::clone(&self.overrides.read());
        next.insert(level, backend);
        *self.overrides.write() = Arc::new(next);
    }

    pub fn clear_level_override(&self, level: Severity) -> bool {
        let _state = self.state.lock();
        let mut next = OverrideSet::clone(&self.overrides.read());
        let removed = next.remove(&level).is_some();
        if removed {
            *self.overrides.write() = Arc::new(next);
        }
        removed
    }

    pub fn has_level_override(&self, level: Severity) -> bool {
        self.overrides.read().contains_key(&level)
    }

    pub fn current_writer(&self) -> Option<String> {
        self.state.lock().current_writer.clone()
    }

    /// Names of the active backends, sorted.
    pub fn writer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.backends.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_writer(&self, name: &str) -> bool {
        self.backends.read().contains_key(&name.to_lowercase())
    }

    fn snapshot(&self) -> Arc<BackendSet> {
        Arc::clone(&self.backends.read())
    }

    // ------------------------------------------------------------------
    // Shutdown
    // ------------------------------------------------------------------

    /// Leave async mode and wait up to `timeout` for the dispatcher to drain
    /// and exit. Anything still queued afterwards is written synchronously.
    ///
    /// Returns `false` if the dispatcher did not finish in time.
    pub fn stop_dispatcher(&self, timeout: Duration) -> bool {
        let handle = {
            let mut state = self.state.lock();
            self.asynchronous.store(false, Ordering::Release);
            state.dispatcher.take()
        };

        let mut finished = true;
        if let Some(handle) = handle {
            let start = Instant::now();
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!(
                            "[LOGGER ERROR] Dispatcher thread panicked during shutdown: {:?}",
                            e
                        );
                        finished = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[LOGGER WARNING] Dispatcher thread did not finish within {:?}. \
                         Some messages may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(10));
            }
        }

        self.drain_pending();
        finished
    }

    /// Stop the dispatcher, then destroy and detach every backend.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        let drained = self.stop_dispatcher(timeout);

        let mut state = self.state.lock();
        let backends = std::mem::replace(&mut *self.backends.write(), Arc::new(BackendSet::new()));
        *self.overrides.write() = Arc::new(OverrideSet::new());
        for backend in backends.values() {
            backend.destroy();
        }
        state.current_writer = None;
        drained
    }
}

/// `"[file:line] "` for a caller location, file reduced to its base name.
fn call_site(location: &Location<'_>) -> Option<String> {
    let file = Path::new(location.file()).file_name()?.to_str()?;
    Some(format!("[{}:{}] ", file, location.line()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct RecordingBackend {
        lines: Mutex<Vec<(Severity, String)>>,
        inits: AtomicUsize,
        destroys: AtomicUsize,
    }

    impl Backend for RecordingBackend {
        fn init(&self, config: &str) -> Result<()> {
            if config == "reject" {
                return Err(LoggerError::backend_init("recording", "rejected"));
            }
            self.inits.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn write(&self, level: Severity, message: &str) -> Result<()> {
            self.lines.lock().push((level, message.to_string()));
            Ok(())
        }

        fn destroy(&self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn manager() -> Arc<WriterManager> {
        Arc::new(WriterManager::new(
            WriterConfig::default().with_prefix("test"),
            Arc::new(BackendRegistry::new()),
            16,
            OverflowPolicy::Block,
            None,
        ))
    }

    #[test]
    fn test_format_prefix_and_tag() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();

        manager.emit_tagged(Severity::Info, "[I] ", "hello", Location::caller());

        let lines = backend.lines.lock();
        assert_eq!(lines.as_slice(), &[(Severity::Info, "[test][I] hello".to_string())]);
    }

    #[test]
    fn test_call_site_annotation() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();
        manager.set_call_site_annotation(true);

        let location = Location::caller();
        manager.emit(Severity::Warn, "annotated", location);

        let expected = format!("[test][writer_manager.rs:{}] annotated", location.line());
        assert_eq!(backend.lines.lock()[0].1, expected);
    }

    #[test]
    fn test_threshold_filters_less_severe() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();
        manager.set_level(Severity::Warn);

        for level in Severity::ALL {
            manager.emit(level, "x", Location::caller());
        }

        let delivered: Vec<Severity> = backend.lines.lock().iter().map(|(l, _)| *l).collect();
        let expected: Vec<Severity> = Severity::ALL
            .into_iter()
            .filter(|l| l.value() <= Severity::Warn.value())
            .collect();
        assert_eq!(delivered, expected);
    }

    #[test]
    fn test_failed_init_installs_nothing() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        let err = manager.set_writer_instance("rec", backend, "reject").unwrap_err();
        assert!(matches!(err, LoggerError::BackendInit { .. }));
        assert!(manager.writer_names().is_empty());
        assert_eq!(manager.current_writer(), None);
    }

    #[test]
    fn test_unknown_backend_kind() {
        let manager = manager();
        let err = manager.set_writer("Syslog", "").unwrap_err();
        assert!(matches!(err, LoggerError::UnknownBackend(ref name) if name == "syslog"));
    }

    #[test]
    fn test_set_writer_reinitializes_existing_instance() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("Rec", backend.clone(), "").unwrap();
        manager.set_writer("REC", "{}").unwrap();

        assert_eq!(backend.inits.load(Ordering::SeqCst), 2);
        assert_eq!(manager.writer_names(), vec!["rec".to_string()]);
        assert_eq!(manager.current_writer().as_deref(), Some("rec"));
    }

    #[test]
    fn test_remove_writer() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();

        assert!(matches!(
            manager.remove_writer("other"),
            Err(LoggerError::WriterNotFound(_))
        ));
        assert!(manager.has_writer("rec"));

        manager.remove_writer("rec").unwrap();
        assert_eq!(backend.destroys.load(Ordering::SeqCst), 1);
        assert!(!manager.has_writer("rec"));

        manager.emit(Severity::Error, "after removal", Location::caller());
        assert!(backend.lines.lock().is_empty());
    }

    #[test]
    fn test_override_ignores_missing_backend() {
        let manager = manager();
        manager.set_level_override(Severity::Alert, None);
        assert!(!manager.has_level_override(Severity::Alert));
    }

    #[test]
    fn test_async_toggle_single_dispatcher() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();

        manager.set_async(true).unwrap();
        manager.set_async(true).unwrap();
        assert!(manager.dispatcher_running());

        for i in 0..10 {
            manager.emit(Severity::Info, &format!("m{}", i), Location::caller());
        }

        assert!(manager.stop_dispatcher(Duration::from_secs(5)));
        assert!(!manager.dispatcher_running());
        assert_eq!(backend.lines.lock().len(), 10);
    }

    #[test]
    fn test_pool_reuse_in_async_mode() {
        let manager = manager();
        manager.set_async(true).unwrap();
        for _ in 0..20 {
            manager.emit(Severity::Info, "reuse", Location::caller());
            thread::sleep(Duration::from_millis(5));
        }
        manager.stop_dispatcher(Duration::from_secs(5));
        assert!(manager.metrics().pool_reuses() > 0);
    }

    #[test]
    fn test_shutdown_destroys_backends() {
        let manager = manager();
        let backend = Arc::new(RecordingBackend::default());
        manager.set_writer_instance("rec", backend.clone(), "").unwrap();
        manager.set_async(true).unwrap();

        assert!(manager.shutdown(Duration::from_secs(5)));
        assert_eq!(backend.destroys.load(Ordering::SeqCst), 1);
        assert!(manager.writer_names().is_empty());
    }

    #[test]
    fn test_call_site_strips_directories() {
        let location = Location::caller();
        let site = call_site(location).unwrap();
        assert!(site.starts_with("[writer_manager.rs:"));
        assert!(site.ends_with("] "));
    }
}
