//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message only when the level is enabled, and
//! record the enclosing function so the source attribute can name it.
//! Attributes follow the format arguments after a `;`.
//!
//! # Examples
//!
//! ```
//! use rust_log_facade::prelude::*;
//! use rust_log_facade::info;
//!
//! let logger = Logger::builder().writer(Sink::new(SharedBuffer::new())).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With attributes
//! info!(logger, "User {} logged in", "alice"; "user_id" => 42, "admin" => false);
//! ```

/// Path of the enclosing function, closures stripped
#[doc(hidden)]
#[macro_export]
macro_rules! __function_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let mut name = type_name_of(f);
        name = name.strip_suffix("::f").unwrap_or(name);
        while let Some(outer) = name.strip_suffix("::{{closure}}") {
            name = outer;
        }
        name
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().writer(Sink::new(SharedBuffer::new())).build().unwrap();
/// use rust_log_facade::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, "Slow query"; "ms" => 950);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        let ctx = $crate::Context::background();
        if logger.enabled(&ctx, level) {
            logger.__log_at(
                &ctx,
                level,
                format!($fmt $(, $arg)*),
                vec![$($crate::Attr::new($key, $value)),+],
                $crate::__function_name!(),
            );
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        let ctx = $crate::Context::background();
        if logger.enabled(&ctx, level) {
            logger.__log_at(
                &ctx,
                level,
                format!($($arg)+),
                ::std::vec::Vec::new(),
                $crate::__function_name!(),
            );
        }
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Trace).build().unwrap();
/// use rust_log_facade::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().writer(Sink::new(SharedBuffer::new())).build().unwrap();
/// use rust_log_facade::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log at Error level, then panic with the message.
///
/// # Examples
///
/// ```should_panic
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::builder().writer(Sink::new(SharedBuffer::new())).build().unwrap();
/// use rust_log_facade::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.__fatal_at(
            &$crate::Context::background(),
            format!($fmt $(, $arg)*),
            vec![$($crate::Attr::new($key, $value)),+],
            $crate::__function_name!(),
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.__fatal_at(
            &$crate::Context::background(),
            format!($($arg)+),
            ::std::vec::Vec::new(),
            $crate::__function_name!(),
        )
    };
}
