//! Logger configuration and the options that build it
//!
//! A [`Config`] starts from a fixed baseline and is changed only by applying
//! [`LogOption`] values in order. Scalar settings are last-write-wins;
//! rewriters accumulate in registration order.
//!
//! # Example
//!
//! ```
//! use rust_log_facade::{Config, Encoding, LogLevel, LogOption};
//!
//! let config = Config::build([
//!     LogOption::json(),
//!     LogOption::level(LogLevel::Debug),
//!     LogOption::prefix("billing"),
//!     LogOption::source(),
//! ])
//! .unwrap();
//!
//! assert_eq!(config.encoding(), Encoding::Json);
//! assert_eq!(config.level().initial(), LogLevel::Debug);
//! assert_eq!(config.prefix(), Some("billing"));
//! assert!(config.add_source());
//! ```

use super::error::{LoggerError, Result};
use super::level_control::{LevelErrorCallback, LevelProvider};
use super::log_level::LogLevel;
use super::rewrite::{source_rewriter, time_rewriter, ReplaceAttr, RewriterChain};
use super::sink::Sink;
use super::timestamp::TimestampFormat;
use crate::encoders::Encoding;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// How the minimum level is determined
#[derive(Clone)]
pub enum Leveler {
    /// Fixed threshold
    Static(LogLevel),
    /// Threshold refreshed from `provider` every `tick`
    ///
    /// `initial` is the level in effect before the listener was configured;
    /// it stays in place until the provider first succeeds.
    Listener {
        provider: LevelProvider,
        tick: Duration,
        initial: LogLevel,
    },
}

impl Leveler {
    /// The threshold a new logger starts with
    pub fn initial(&self) -> LogLevel {
        match self {
            Leveler::Static(level) => *level,
            Leveler::Listener { initial, .. } => *initial,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Leveler::Listener { .. })
    }
}

impl fmt::Debug for Leveler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leveler::Static(level) => f.debug_tuple("Static").field(level).finish(),
            Leveler::Listener { tick, initial, .. } => f
                .debug_struct("Listener")
                .field("tick", tick)
                .field("initial", initial)
                .finish_non_exhaustive(),
        }
    }
}

/// One configuration change
#[derive(Clone)]
pub enum LogOption {
    /// Switch the encoding to JSON
    Json,
    /// Fixed minimum level
    Level(LogLevel),
    /// Minimum level polled from a provider
    LevelListener {
        provider: LevelProvider,
        tick: Duration,
    },
    /// Hook called when the level provider fails
    OnLevelError(LevelErrorCallback),
    /// `prefix` attribute attached to every record
    Prefix(String),
    /// Rewriters appended to the chain
    ReplaceAttr(Vec<ReplaceAttr>),
    /// Source capture, optionally keeping only the last `depth` directories
    Source { depth: Option<usize> },
    /// Format for the built-in timestamp
    TimeFormat(TimestampFormat),
    /// Output sink
    Writer(Sink),
}

impl LogOption {
    pub fn json() -> Self {
        LogOption::Json
    }

    pub fn level(level: LogLevel) -> Self {
        LogOption::Level(level)
    }

    /// Dynamic level from an infallible provider
    pub fn level_listener<F>(listener: F, tick: Duration) -> Self
    where
        F: Fn() -> LogLevel + Send + Sync + 'static,
    {
        LogOption::LevelListener {
            provider: Arc::new(move || Ok(listener())),
            tick,
        }
    }

    /// Dynamic level from a provider that can fail
    pub fn level_provider<F>(provider: F, tick: Duration) -> Self
    where
        F: Fn() -> Result<LogLevel> + Send + Sync + 'static,
    {
        LogOption::LevelListener {
            provider: Arc::new(provider),
            tick,
        }
    }

    pub fn on_level_error<F>(callback: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        LogOption::OnLevelError(Arc::new(callback))
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        LogOption::Prefix(prefix.into())
    }

    pub fn replace_attr<I>(rewriters: I) -> Self
    where
        I: IntoIterator<Item = ReplaceAttr>,
    {
        LogOption::ReplaceAttr(rewriters.into_iter().collect())
    }

    pub fn source() -> Self {
        LogOption::Source { depth: None }
    }

    pub fn source_depth(depth: usize) -> Self {
        LogOption::Source { depth: Some(depth) }
    }

    pub fn time_format(format: impl Into<TimestampFormat>) -> Self {
        LogOption::TimeFormat(format.into())
    }

    pub fn writer(sink: Sink) -> Self {
        LogOption::Writer(sink)
    }
}

impl fmt::Debug for LogOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogOption::Json => write!(f, "Json"),
            LogOption::Level(level) => f.debug_tuple("Level").field(level).finish(),
            LogOption::LevelListener { tick, .. } => f
                .debug_struct("LevelListener")
                .field("tick", tick)
                .finish_non_exhaustive(),
            LogOption::OnLevelError(_) => write!(f, "OnLevelError(..)"),
            LogOption::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            LogOption::ReplaceAttr(rewriters) => write!(f, "ReplaceAttr({} rewriters)", rewriters.len()),
            LogOption::Source { depth } => f.debug_struct("Source").field("depth", depth).finish(),
            LogOption::TimeFormat(format) => f.debug_tuple("TimeFormat").field(format).finish(),
            LogOption::Writer(sink) => f.debug_tuple("Writer").field(sink).finish(),
        }
    }
}

/// Emission settings consumed by a logger
#[derive(Clone)]
pub struct Config {
    level: Leveler,
    add_source: bool,
    rewriters: RewriterChain,
    sink: Sink,
    encoding: Encoding,
    prefix: Option<String>,
    on_level_error: Option<LevelErrorCallback>,
}

impl Default for Config {
    /// Baseline: Info level, no source, identity rewriter, text on stderr
    fn default() -> Self {
        Self {
            level: Leveler::Static(LogLevel::Info),
            add_source: false,
            rewriters: RewriterChain::new(),
            sink: Sink::stderr(),
            encoding: Encoding::Text,
            prefix: None,
            on_level_error: None,
        }
    }
}

impl Config {
    /// Apply `options` in order to the baseline
    pub fn build<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = LogOption>,
    {
        let mut config = Config::default();
        for option in options {
            config.apply(option)?;
        }
        Ok(config)
    }

    /// Apply a single option
    ///
    /// Misconfigurations (a malformed time format, a zero refresh tick) are
    /// rejected here so they surface when the logger is built.
    pub fn apply(&mut self, option: LogOption) -> Result<()> {
        match option {
            LogOption::Json => self.encoding = Encoding::Json,
            LogOption::Level(level) => self.level = Leveler::Static(level),
            LogOption::LevelListener { provider, tick } => {
                if tick.is_zero() {
                    return Err(LoggerError::config("level_listener", "tick must be non-zero"));
                }
                self.level = Leveler::Listener {
                    provider,
                    tick,
                    initial: self.level.initial(),
                };
            }
            LogOption::OnLevelError(callback) => self.on_level_error = Some(callback),
            LogOption::Prefix(prefix) => {
                self.prefix = if prefix.is_empty() { None } else { Some(prefix) };
            }
            LogOption::ReplaceAttr(rewriters) => self.rewriters.extend(rewriters),
            LogOption::Source { depth } => {
                self.add_source = true;
                self.rewriters.push(source_rewriter(depth));
            }
            LogOption::TimeFormat(format) => {
                format.validate()?;
                self.rewriters.push(time_rewriter(format));
            }
            LogOption::Writer(sink) => self.sink = sink,
        }
        Ok(())
    }

    pub fn level(&self) -> &Leveler {
        &self.level
    }

    pub fn add_source(&self) -> bool {
        self.add_source
    }

    pub fn rewriters(&self) -> &RewriterChain {
        &self.rewriters
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn on_level_error(&self) -> Option<&LevelErrorCallback> {
        self.on_level_error.as_ref()
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("level", &self.level)
            .field("add_source", &self.add_source)
            .field("rewriters", &self.rewriters)
            .field("sink", &self.sink)
            .field("encoding", &self.encoding)
            .field("prefix", &self.prefix)
            .field("on_level_error", &self.on_level_error.is_some())
            .finish()
    }
}
