//! Backend implementations

#[cfg(feature = "console")]
pub mod console;
#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "console")]
pub use console::ConsoleBackend;
#[cfg(feature = "file")]
pub use file::FileBackend;

pub use crate::core::Backend;
