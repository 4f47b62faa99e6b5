//! Logging macros for ergonomic log message formatting.
//!
//! These macros format their arguments like `format!` and forward to the
//! level-tagged methods of [`Logger`](crate::Logger). Because they expand at
//! the call site, call-site annotation reports the macro invocation.
//!
//! # Examples
//!
//! ```
//! use multiwriter_logger::prelude::*;
//! use multiwriter_logger::info;
//!
//! let logger = Logger::new();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit severity, without a level marker.
///
/// # Examples
///
/// ```
/// # use multiwriter_logger::prelude::*;
/// # let logger = Logger::new();
/// use multiwriter_logger::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log an attack-level message.
#[macro_export]
macro_rules! atk {
    ($logger:expr, $($arg:tt)+) => {
        $logger.atk(format!($($arg)+))
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $logger.critical(format!($($arg)+))
    };
}

/// Log an alert-level message.
#[macro_export]
macro_rules! alert {
    ($logger:expr, $($arg:tt)+) => {
        $logger.alert(format!($($arg)+))
    };
}

/// Log an emergency-level message.
#[macro_export]
macro_rules! emergency {
    ($logger:expr, $($arg:tt)+) => {
        $logger.emergency(format!($($arg)+))
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use multiwriter_logger::prelude::*;
/// # let logger = Logger::new();
/// use multiwriter_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(format!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use multiwriter_logger::prelude::*;
/// # let logger = Logger::new();
/// use multiwriter_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(format!($($arg)+))
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use multiwriter_logger::prelude::*;
/// # let logger = Logger::new();
/// use multiwriter_logger::error;
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.err(format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.dbg(format!($($arg)+))
    };
}
