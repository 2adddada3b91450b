//! Process-wide default logger

use super::logger::Logger;
use arc_swap::ArcSwap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Holder for the default logger
///
/// Reads never block and always see a fully constructed logger; a
/// replacement is visible to every later read.
pub struct DefaultLoggerRegistry {
    slot: ArcSwap<Logger>,
}

impl DefaultLoggerRegistry {
    pub fn new(logger: Logger) -> Self {
        Self {
            slot: ArcSwap::from_pointee(logger),
        }
    }

    /// The process-wide registry, created on first use with a baseline logger
    pub fn global() -> &'static DefaultLoggerRegistry {
        static GLOBAL: OnceLock<DefaultLoggerRegistry> = OnceLock::new();
        GLOBAL.get_or_init(|| DefaultLoggerRegistry::new(Logger::default()))
    }

    pub fn get(&self) -> Logger {
        Logger::clone(&self.slot.load())
    }

    /// Replace the default, returning the previous one
    pub fn set(&self, logger: Logger) -> Logger {
        let previous = self.slot.swap(Arc::new(logger));
        Arc::unwrap_or_clone(previous)
    }
}

impl fmt::Debug for DefaultLoggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLoggerRegistry")
            .field("current", &*self.slot.load())
            .finish()
    }
}
