//! Log record structure

use super::attr::{Attr, Source};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// One log event before rewriting and encoding
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Zero (see [`is_zero_time`](super::attr::is_zero_time)) means no timestamp
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub source: Option<Source>,
    pub attrs: Vec<Attr>,
}

impl Record {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            time: Utc::now(),
            level,
            message: message.into(),
            source: None,
            attrs: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_attrs<I: IntoIterator<Item = Attr>>(mut self, attrs: I) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Clear the timestamp so no `time` attribute is emitted
    pub fn without_time(mut self) -> Self {
        self.time = DateTime::<Utc>::default();
        self
    }
}
