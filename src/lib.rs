//! # Rust Log Facade
//!
//! A structured logging facade with a composable option layer.
//!
//! ## Features
//!
//! - **Options**: loggers are built from an ordered list of [`LogOption`]s
//! - **Attribute rewriting**: chained rewriters see every attribute with its group path
//! - **Dynamic level**: an optional listener refreshes the threshold in the background
//! - **Default logger**: package-level functions forward to a swappable default
//!
//! ## Example
//!
//! ```
//! use rust_log_facade::prelude::*;
//!
//! let buffer = SharedBuffer::new();
//! let logger = Logger::new([
//!     LogOption::json(),
//!     LogOption::level(LogLevel::Debug),
//!     LogOption::writer(Sink::new(buffer.clone())),
//! ])
//! .unwrap();
//!
//! logger
//!     .with([attr("service", "billing")])
//!     .log_attrs(LogLevel::Info, "charged", [attr("amount", 42)]);
//!
//! assert!(buffer.contents().contains(r#""service":"billing""#));
//! ```

pub mod core;
pub mod encoders;
pub mod global;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        attr, Attr, Context, LogLevel, LogOption, Logger, LoggerBuilder, LoggerError, Result,
        SharedBuffer, Sink, TimestampFormat, Value,
    };
    pub use crate::encoders::Encoding;
}

pub use crate::core::{
    attr, base_function_name, is_zero_time, replace_attr, source_rewriter, time_rewriter, Attr,
    Config, Context, DefaultLoggerRegistry, LevelCell, LevelController, LevelErrorCallback,
    LevelProvider, Leveler, LogLevel, LogOption, Logger, LoggerBuilder, LoggerError,
    LoggerMetrics, Record, ReplaceAttr, Result, RewriterChain, SharedBuffer, Sink, Source,
    TimestampFormat, Value, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use crate::core::attr::{LEVEL_KEY, MESSAGE_KEY, PREFIX_KEY, SOURCE_KEY, TIME_KEY};
pub use encoders::{Encoder, Encoding, JsonEncoder, TextEncoder};
pub use global::{
    debug, debug_ctx, default_logger, enabled, error, error_ctx, fatal, fatal_ctx, info, info_ctx,
    init, log, log_attrs, log_ctx, new, set_default, trace, trace_ctx, warn, warn_ctx, with,
    with_group,
};
