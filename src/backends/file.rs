//! File backend implementation

use crate::core::{Backend, LoggerError, Result, Severity};
use chrono::Local;
use fs2::FileExt;
use parking_lot::Mutex;
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

fn default_append() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct FileOptions {
    filename: Option<PathBuf>,
    #[serde(default = "default_append")]
    append: bool,
}

struct OpenFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

/// Appends timestamped lines to a file.
///
/// Configured with `{"filename": "/var/log/app.log", "append": true}`. The
/// file is held under an advisory exclusive lock until `destroy`, so two
/// backends cannot interleave writes into the same file.
pub struct FileBackend {
    file: Mutex<Option<OpenFile>>,
}

impl FileBackend {
    pub fn new() -> Self {
        Self {
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.file.lock().as_ref().map(|f| f.path.clone())
    }

    fn open(options: FileOptions) -> Result<OpenFile> {
        let path = options
            .filename
            .ok_or_else(|| LoggerError::backend_init("file", "missing \"filename\""))?;

        let mut open = OpenOptions::new();
        open.create(true);
        if options.append {
            open.append(true);
        } else {
            open.write(true).truncate(true);
        }
        let file = open.open(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| LoggerError::file_lock(path.display().to_string()))?;

        Ok(OpenFile {
            path,
            writer: BufWriter::new(file),
        })
    }

    fn close(open: OpenFile) {
        let OpenFile { path, writer } = open;
        match writer.into_inner() {
            Ok(file) => {
                let _ = file.sync_all();
                let _ = FileExt::unlock(&file);
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] failed to flush '{}' on close: {}",
                    path.display(),
                    e.error()
                );
            }
        }
    }
}

impl Default for FileBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for FileBackend {
    fn init(&self, config: &str) -> Result<()> {
        let options: FileOptions = serde_json::from_str(config)
            .map_err(|e| LoggerError::backend_init("file", e.to_string()))?;
        let opened = Self::open(options)?;

        let previous = self.file.lock().replace(opened);
        if let Some(previous) = previous {
            Self::close(previous);
        }
        Ok(())
    }

    fn write(&self, _level: Severity, message: &str) -> Result<()> {
        let mut guard = self.file.lock();
        let open = guard
            .as_mut()
            .ok_or_else(|| LoggerError::writer("file backend not initialized"))?;

        let timestamp = Local::now().format("%Y/%m/%d %H:%M:%S");
        writeln!(open.writer, "{} {}", timestamp, message)?;
        open.writer.flush()?;
        Ok(())
    }

    fn destroy(&self) {
        if let Some(open) = self.file.lock().take() {
            Self::close(open);
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        self.destroy();
    }
}
