//! Queued messages and the pool that recycles them

use super::severity::Severity;
use parking_lot::Mutex;

/// One formatted message travelling from a producer to the dispatcher.
///
/// A message is owned by exactly one side at a time: the producer filling it,
/// the queue and dispatcher, or the pool.
#[derive(Debug, Default)]
pub struct Message {
    pub level: Severity,
    pub text: String,
}

impl Message {
    pub fn new(level: Severity, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    /// Overwrite the contents, keeping the text buffer's allocation.
    pub fn fill(&mut self, level: Severity, text: &str) {
        self.level = level;
        self.text.clear();
        self.text.push_str(text);
    }
}

/// Concurrent free-list of boxed messages.
///
/// `acquire` never blocks beyond a short critical section; an empty pool
/// simply allocates. At most `max_idle` messages are retained.
#[derive(Debug)]
pub struct MessagePool {
    idle: Mutex<Vec<Box<Message>>>,
    max_idle: usize,
}

impl MessagePool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Take a message from the pool. The flag tells whether it was reused.
    pub fn acquire(&self) -> (Box<Message>, bool) {
        match self.idle.lock().pop() {
            Some(message) => (message, true),
            None => (Box::default(), false),
        }
    }

    pub fn release(&self, mut message: Box<Message>) {
        message.text.clear();
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(message);
        }
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().len()
    }
}
