//! Backend registry: maps a backend kind name to the factory that creates it.
//!
//! A registry is built once at start-up, before any logger uses it, and then
//! shared by handle (`Arc<BackendRegistry>`) with every logger that attaches
//! backends by name.

use super::backend::Backend;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Creates a fresh, uninitialized backend instance.
pub type BackendFactory = Arc<dyn Fn() -> Arc<dyn Backend> + Send + Sync>;

#[derive(Default)]
pub struct BackendRegistry {
    factories: RwLock<HashMap<String, BackendFactory>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the backends compiled into this crate.
    pub fn with_builtin_backends() -> Self {
        let registry = Self::new();
        #[cfg(feature = "console")]
        registry.register("console", || {
            Arc::new(crate::backends::ConsoleBackend::new()) as Arc<dyn Backend>
        });
        #[cfg(feature = "file")]
        registry.register("file", || {
            Arc::new(crate::backends::FileBackend::new()) as Arc<dyn Backend>
        });
        registry
    }

    /// Make a backend kind available under `name` (case-insensitive).
    ///
    /// # Panics
    ///
    /// Registering the same name twice is a programming error and panics.
    pub fn register<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Arc<dyn Backend> + Send + Sync + 'static,
    {
        let name = name.to_lowercase();
        let mut factories = self.factories.write();
        if factories.contains_key(&name) {
            drop(factories);
            panic!("logs: register called twice for backend {}", name);
        }
        factories.insert(name, Arc::new(factory));
    }

    pub fn lookup(&self, name: &str) -> Option<BackendFactory> {
        self.factories.read().get(&name.to_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.read().contains_key(&name.to_lowercase())
    }

    /// Registered kind names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("backends", &self.names())
            .finish()
    }
}
