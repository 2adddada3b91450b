//! Execution context passed to the `*_ctx` logging methods
//!
//! A [`Context`] carries an optional deadline, a cancellation flag shared by
//! all of its clones, and attributes that are appended to every record
//! logged with it. Logging calls read the attributes but never wait on the
//! deadline or the flag.

use super::attr::{Attr, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
    attrs: Vec<Attr>,
}

impl Context {
    /// Empty context: no deadline, never cancelled, no attributes
    pub fn background() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attach an attribute to every record logged with this context
    #[must_use]
    pub fn with_attr<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.attrs.push(Attr::new(key, value));
        self
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// True once `cancel` was called on this context or a clone, or the
    /// deadline has passed
    pub fn is_done(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
