//! Core logger types

pub mod attr;
pub mod config;
pub mod context;
pub mod error;
pub mod level_control;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod registry;
pub mod rewrite;
pub mod sink;
pub mod timestamp;

pub use attr::{attr, is_zero_time, Attr, Source, Value};
pub use config::{Config, LogOption, Leveler};
pub use context::Context;
pub use error::{LoggerError, Result};
pub use level_control::{
    LevelCell, LevelController, LevelErrorCallback, LevelProvider, DEFAULT_SHUTDOWN_TIMEOUT,
};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use record::Record;
pub use registry::DefaultLoggerRegistry;
pub use rewrite::{
    base_function_name, replace_attr, source_rewriter, time_rewriter, ReplaceAttr, RewriterChain,
};
pub use sink::{SharedBuffer, Sink};
pub use timestamp::TimestampFormat;
