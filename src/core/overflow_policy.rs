//! Overflow policies for the async message queue
//!
//! When the bounded queue is full, the policy decides what happens to the
//! message being emitted.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Policy for handling a full async queue
///
/// # Example
///
/// ```
/// use multiwriter_logger::OverflowPolicy;
/// use std::time::Duration;
///
/// // Default behavior: block the producer until the dispatcher makes room
/// let policy = OverflowPolicy::default();
/// assert_eq!(policy, OverflowPolicy::Block);
///
/// // Block with timeout, then drop
/// let policy = OverflowPolicy::BlockWithTimeout(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Block until space is available
    ///
    /// Producers under sustained pressure are throttled; nothing is dropped.
    /// There is no deadline, so a stalled backend stalls every producer.
    #[default]
    Block,

    /// Block with timeout, then drop
    BlockWithTimeout(Duration),

    /// Drop the message being emitted
    DropNewest,

    /// Evict the oldest queued message to make room for the new one
    DropOldest,
}

impl OverflowPolicy {
    /// `true` when the policy can discard messages.
    pub fn may_drop(&self) -> bool {
        !matches!(self, OverflowPolicy::Block)
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Block => write!(f, "Block"),
            OverflowPolicy::BlockWithTimeout(d) => write!(f, "BlockWithTimeout({:?})", d),
            OverflowPolicy::DropNewest => write!(f, "DropNewest"),
            OverflowPolicy::DropOldest => write!(f, "DropOldest"),
        }
    }
}

/// Callback type for overflow notifications
///
/// Called when messages are dropped due to queue overflow.
/// The parameter is the total count of dropped messages so far.
pub type OverflowCallback = Arc<dyn Fn(u64) + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overflow_policy_default() {
        assert_eq!(OverflowPolicy::default(), OverflowPolicy::Block);
        assert!(!OverflowPolicy::default().may_drop());
        assert!(OverflowPolicy::DropOldest.may_drop());
    }

    #[test]
    fn test_overflow_policy_display() {
        assert_eq!(OverflowPolicy::Block.to_string(), "Block");
        assert_eq!(
            OverflowPolicy::BlockWithTimeout(Duration::from_millis(100)).to_string(),
            "BlockWithTimeout(100ms)"
        );
        assert_eq!(OverflowPolicy::DropNewest.to_string(), "DropNewest");
        assert_eq!(OverflowPolicy::DropOldest.to_string(), "DropOldest");
    }
}
