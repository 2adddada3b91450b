//! Package-level entry points backed by the default logger
//!
//! Every forwarder looks the default up at call time, so replacing it with
//! [`set_default`] or [`new`] retargets all later calls. Loggers obtained
//! earlier keep writing to their own sink.

use crate::core::{
    Attr, Context, DefaultLoggerRegistry, LogLevel, LogOption, Logger, Result,
};

/// Build a logger from `options` and install it as the default
///
/// # Example
/// ```
/// use rust_log_facade::{LogLevel, LogOption, Sink, SharedBuffer};
///
/// let buffer = SharedBuffer::new();
/// let logger = rust_log_facade::new([
///     LogOption::level(LogLevel::Debug),
///     LogOption::writer(Sink::new(buffer.clone())),
/// ])
/// .unwrap();
///
/// assert_eq!(rust_log_facade::default_logger().level(), LogLevel::Debug);
/// # rust_log_facade::set_default(rust_log_facade::Logger::default());
/// # drop(logger);
/// ```
pub fn new<I>(options: I) -> Result<Logger>
where
    I: IntoIterator<Item = LogOption>,
{
    let logger = Logger::new(options)?;
    set_default(logger.clone());
    Ok(logger)
}

/// Install a logger built from `options` as the default, discarding the handle
pub fn init<I>(options: I) -> Result<()>
where
    I: IntoIterator<Item = LogOption>,
{
    new(options).map(|_| ())
}

pub fn default_logger() -> Logger {
    DefaultLoggerRegistry::global().get()
}

/// Replace the default logger, returning the previous one
pub fn set_default(logger: Logger) -> Logger {
    DefaultLoggerRegistry::global().set(logger)
}

pub fn enabled(ctx: &Context, level: LogLevel) -> bool {
    default_logger().enabled(ctx, level)
}

pub fn with<I>(attrs: I) -> Logger
where
    I: IntoIterator<Item = Attr>,
{
    default_logger().with(attrs)
}

pub fn with_group(name: impl Into<String>) -> Logger {
    default_logger().with_group(name)
}

#[track_caller]
pub fn log(level: LogLevel, message: impl Into<String>) {
    default_logger().log(level, message);
}

#[track_caller]
pub fn log_attrs<I>(level: LogLevel, message: impl Into<String>, attrs: I)
where
    I: IntoIterator<Item = Attr>,
{
    default_logger().log_attrs(level, message, attrs);
}

#[track_caller]
pub fn log_ctx<I>(ctx: &Context, level: LogLevel, message: impl Into<String>, attrs: I)
where
    I: IntoIterator<Item = Attr>,
{
    default_logger().log_ctx(ctx, level, message, attrs);
}

#[track_caller]
pub fn trace(message: impl Into<String>) {
    default_logger().trace(message);
}

#[track_caller]
pub fn debug(message: impl Into<String>) {
    default_logger().debug(message);
}

#[track_caller]
pub fn info(message: impl Into<String>) {
    default_logger().info(message);
}

#[track_caller]
pub fn warn(message: impl Into<String>) {
    default_logger().warn(message);
}

#[track_caller]
pub fn error(message: impl Into<String>) {
    default_logger().error(message);
}

/// Log at Error on the default logger, then panic
#[track_caller]
pub fn fatal(message: impl Into<String>) -> ! {
    default_logger().fatal(message)
}

#[track_caller]
pub fn trace_ctx(ctx: &Context, message: impl Into<String>) {
    default_logger().trace_ctx(ctx, message);
}

#[track_caller]
pub fn debug_ctx(ctx: &Context, message: impl Into<String>) {
    default_logger().debug_ctx(ctx, message);
}

#[track_caller]
pub fn info_ctx(ctx: &Context, message: impl Into<String>) {
    default_logger().info_ctx(ctx, message);
}

#[track_caller]
pub fn warn_ctx(ctx: &Context, message: impl Into<String>) {
    default_logger().warn_ctx(ctx, message);
}

#[track_caller]
pub fn error_ctx(ctx: &Context, message: impl Into<String>) {
    default_logger().error_ctx(ctx, message);
}

#[track_caller]
pub fn fatal_ctx(ctx: &Context, message: impl Into<String>) -> ! {
    default_logger().fatal_ctx(ctx, message)
}
