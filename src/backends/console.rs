//! Console backend implementation

use crate::core::{Backend, Result, Severity};
use chrono::Local;
use colored::Colorize;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default, Deserialize)]
struct ConsoleOptions {
    colors: Option<bool>,
}

/// Writes `"YYYY/MM/DD HH:MM:SS <message>"` lines to stdout, colored by
/// severity except on Windows.
///
/// Accepts an optional `{"colors": false}` configuration.
pub struct ConsoleBackend {
    use_colors: AtomicBool,
}

impl ConsoleBackend {
    pub fn new() -> Self {
        Self::with_colors(!cfg!(windows))
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors: AtomicBool::new(use_colors),
        }
    }

    pub fn uses_colors(&self) -> bool {
        self.use_colors.load(Ordering::Relaxed)
    }

    fn format_line(&self, level: Severity, message: &str) -> String {
        let timestamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        if self.uses_colors() {
            format!("{} {}", timestamp, message.color(level.color_code()).bold())
        } else {
            format!("{} {}", timestamp, message)
        }
    }
}

impl Default for ConsoleBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for ConsoleBackend {
    fn init(&self, config: &str) -> Result<()> {
        if config.trim().is_empty() {
            return Ok(());
        }
        let options: ConsoleOptions = serde_json::from_str(config)?;
        if let Some(colors) = options.colors {
            self.use_colors.store(colors && !cfg!(windows), Ordering::Relaxed);
        }
        Ok(())
    }

    fn write(&self, level: Severity, message: &str) -> Result<()> {
        use std::io::Write;
        let line = self.format_line(level, message);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn destroy(&self) {}

    fn name(&self) -> &str {
        "console"
    }
}
