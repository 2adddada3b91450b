//! Main logger implementation

use super::{
    attr::{is_zero_time, Attr, Value, LEVEL_KEY, MESSAGE_KEY, PREFIX_KEY, SOURCE_KEY, TIME_KEY},
    config::{Config, Leveler, LogOption},
    context::Context,
    error::Result,
    level_control::{LevelCell, LevelController},
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::Record,
    rewrite::{ReplaceAttr, RewriterChain},
    sink::Sink,
    timestamp::TimestampFormat,
};
use crate::core::error::LoggerError;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

/// State shared by a logger and every logger derived from it
struct Shared {
    config: Config,
    level: Arc<LevelCell>,
    /// Dropped with the last logger, which stops the refresh thread
    controller: Option<LevelController>,
    metrics: Arc<LoggerMetrics>,
}

/// Attributes attached with `with`, split at each `with_group`
#[derive(Debug, Clone)]
struct Frame {
    group: Option<String>,
    attrs: Vec<Attr>,
}

/// Structured logger
///
/// Cheap to clone. `with` and `with_group` return new loggers and leave the
/// receiver untouched. The only part of a logger that changes after
/// construction is its minimum level, when a level listener is configured.
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    frames: Arc<Vec<Frame>>,
}

impl Logger {
    /// Build a logger from `options` without installing it as the default
    ///
    /// Use [`crate::new`] to also make it the process-wide default.
    pub fn new<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = LogOption>,
    {
        Self::from_config(Config::build(options)?)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let metrics = Arc::new(LoggerMetrics::new());
        let level = Arc::new(LevelCell::new(config.level().initial()));

        let controller = match config.level() {
            Leveler::Static(_) => None,
            Leveler::Listener { provider, tick, .. } => Some(LevelController::spawn(
                Arc::clone(&level),
                Arc::clone(provider),
                *tick,
                config.on_level_error().cloned(),
                Arc::clone(&metrics),
            )?),
        };

        Ok(Self::assemble(config, level, controller, metrics))
    }

    fn assemble(
        config: Config,
        level: Arc<LevelCell>,
        controller: Option<LevelController>,
        metrics: Arc<LoggerMetrics>,
    ) -> Self {
        let prefix = config.prefix().map(String::from);
        let logger = Self {
            shared: Arc::new(Shared {
                config,
                level,
                controller,
                metrics,
            }),
            frames: Arc::new(vec![Frame {
                group: None,
                attrs: Vec::new(),
            }]),
        };

        match prefix {
            Some(prefix) => logger.with([Attr::new(PREFIX_KEY, prefix)]),
            None => logger,
        }
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_log_facade::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .json()
    ///     .prefix("worker")
    ///     .build()
    ///     .unwrap();
    /// assert!(logger.enabled(&Context::background(), LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// New logger adding `attrs` to every record
    #[must_use]
    pub fn with<I>(&self, attrs: I) -> Logger
    where
        I: IntoIterator<Item = Attr>,
    {
        let attrs: Vec<Attr> = attrs.into_iter().collect();
        if attrs.is_empty() {
            return self.clone();
        }

        let mut frames = (*self.frames).clone();
        if let Some(last) = frames.last_mut() {
            last.attrs.extend(attrs);
        }
        Logger {
            shared: Arc::clone(&self.shared),
            frames: Arc::new(frames),
        }
    }

    /// New logger nesting all later attributes under `name`
    ///
    /// An empty name returns an equivalent logger.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }

        let mut frames = (*self.frames).clone();
        frames.push(Frame {
            group: Some(name),
            attrs: Vec::new(),
        });
        Logger {
            shared: Arc::clone(&self.shared),
            frames: Arc::new(frames),
        }
    }

    /// Whether a record at `level` would be emitted right now
    ///
    /// Reads the live threshold and has no side effects.
    #[inline]
    pub fn enabled(&self, _ctx: &Context, level: LogLevel) -> bool {
        self.shared.level.enabled(level)
    }

    /// Current minimum level
    pub fn level(&self) -> LogLevel {
        self.shared.level.get()
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// True while a level listener's refresh thread is running
    pub fn is_level_refreshing(&self) -> bool {
        self.shared
            .controller
            .as_ref()
            .is_some_and(LevelController::is_running)
    }

    pub fn flush(&self) -> Result<()> {
        self.shared.config.sink().flush()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(&Context::background(), level, message.into(), Vec::new(), "", Location::caller());
    }

    #[track_caller]
    pub fn log_attrs<I>(&self, level: LogLevel, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.emit(
            &Context::background(),
            level,
            message.into(),
            attrs.into_iter().collect(),
            "",
            Location::caller(),
        );
    }

    /// Log with an execution context; the context's attributes follow `attrs`
    #[track_caller]
    pub fn log_ctx<I>(&self, ctx: &Context, level: LogLevel, message: impl Into<String>, attrs: I)
    where
        I: IntoIterator<Item = Attr>,
    {
        self.emit(ctx, level, message.into(), attrs.into_iter().collect(), "", Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(LogLevel::Trace, message);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    #[track_caller]
    pub fn trace_ctx(&self, ctx: &Context, message: impl Into<String>) {
        self.log_ctx(ctx, LogLevel::Trace, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn debug_ctx(&self, ctx: &Context, message: impl Into<String>) {
        self.log_ctx(ctx, LogLevel::Debug, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn info_ctx(&self, ctx: &Context, message: impl Into<String>) {
        self.log_ctx(ctx, LogLevel::Info, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn warn_ctx(&self, ctx: &Context, message: impl Into<String>) {
        self.log_ctx(ctx, LogLevel::Warn, message, []);
    }

    #[inline]
    #[track_caller]
    pub fn error_ctx(&self, ctx: &Context, message: impl Into<String>) {
        self.log_ctx(ctx, LogLevel::Error, message, []);
    }

    /// Log `message` at Error level, then panic with it
    ///
    /// This is a deliberate last resort for states the program cannot
    /// continue from, not an error-reporting path. The record is written
    /// before the panic starts, so the cause is visible even when the
    /// process aborts on panic.
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.escalate(&Context::background(), message.into(), Vec::new(), "", Location::caller())
    }

    #[track_caller]
    pub fn fatal_ctx(&self, ctx: &Context, message: impl Into<String>) -> ! {
        self.escalate(ctx, message.into(), Vec::new(), "", Location::caller())
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn __log_at(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: String,
        attrs: Vec<Attr>,
        function: &'static str,
    ) {
        self.emit(ctx, level, message, attrs, function, Location::caller());
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn __fatal_at(
        &self,
        ctx: &Context,
        message: String,
        attrs: Vec<Attr>,
        function: &'static str,
    ) -> ! {
        self.escalate(ctx, message, attrs, function, Location::caller())
    }

    fn escalate(
        &self,
        ctx: &Context,
        message: String,
        attrs: Vec<Attr>,
        function: &str,
        location: &'static Location<'static>,
    ) -> ! {
        let mut panic_msg = message.clone();
        for attr in &attrs {
            panic_msg.push(' ');
            panic_msg.push_str(&attr.to_string());
        }
        self.emit(ctx, LogLevel::Error, message, attrs, function, location);
        panic!("{}", panic_msg);
    }

    fn emit(
        &self,
        ctx: &Context,
        level: LogLevel,
        message: String,
        attrs: Vec<Attr>,
        function: &str,
        location: &'static Location<'static>,
    ) {
        if !self.enabled(ctx, level) {
            return;
        }

        let mut record = Record::new(level, message)
            .with_attrs(attrs)
            .with_attrs(ctx.attrs().iter().cloned());
        if self.shared.config.add_source() {
            record = record.with_source(super::attr::Source::new(
                location.file(),
                location.line(),
                function,
            ));
        }

        self.handle(record);
    }

    /// Rewrite, encode and write one record
    ///
    /// Failures are counted and reported on stderr; they never reach the
    /// caller.
    pub fn handle(&self, record: Record) {
        let attrs = self.resolve(record);
        match self.write(&attrs) {
            Ok(()) => {
                self.shared.metrics.record_written();
            }
            Err(e) => {
                let failures = self.shared.metrics.record_write_failure() + 1;
                // Alert on first failure and periodically thereafter
                if failures == 1 || failures % 1000 == 0 {
                    eprintln!("[LOGGER ERROR] {}", self.describe_failure(&e, failures));
                }
            }
        }
    }

    fn write(&self, attrs: &[Attr]) -> Result<()> {
        let config = &self.shared.config;
        let encoder = config.encoding().encoder();

        let mut buf = Vec::with_capacity(256);
        encoder.encode(attrs, &mut buf).map_err(|e| {
            LoggerError::writer(format!("{} encoding failed: {}", encoder.name(), e))
        })?;
        config.sink().write_record(&buf)
    }

    fn describe_failure(&self, err: &LoggerError, failures: u64) -> String {
        let config = &self.shared.config;
        format!(
            "Failed to write {} record to {} ({} failures, {:.1}% of records): {}",
            config.encoding().encoder().name(),
            config.sink().name(),
            failures,
            self.shared.metrics.failure_rate(),
            err
        )
    }

    /// Final attribute list for `record`: built-ins, then `with` attributes
    /// and record attributes nested under their groups
    fn resolve(&self, record: Record) -> Vec<Attr> {
        let chain = self.shared.config.rewriters();

        let mut out = Vec::with_capacity(4 + record.attrs.len());
        let mut push_builtin = |attr: Attr| {
            let attr = chain.apply(&[], attr);
            if !attr.key.is_empty() {
                out.push(attr);
            }
        };
        if !is_zero_time(&record.time) {
            push_builtin(Attr::new(TIME_KEY, record.time));
        }
        push_builtin(Attr::new(LEVEL_KEY, record.level.to_str()));
        if let Some(source) = record.source {
            push_builtin(Attr::new(SOURCE_KEY, source));
        }
        push_builtin(Attr::new(MESSAGE_KEY, record.message));

        let last = self.frames.len() - 1;
        let mut groups: Vec<String> = Vec::new();
        let mut levels: Vec<Vec<Attr>> = Vec::with_capacity(self.frames.len());
        let mut record_attrs = Some(record.attrs);
        for (i, frame) in self.frames.iter().enumerate() {
            if let Some(ref group) = frame.group {
                groups.push(group.clone());
            }
            let mut attrs = rewrite_all(chain, &groups, frame.attrs.iter().cloned());
            if i == last {
                if let Some(record_attrs) = record_attrs.take() {
                    attrs.extend(rewrite_all(chain, &groups, record_attrs));
                }
            }
            levels.push(attrs);
        }

        let mut nested: Option<Attr> = None;
        for (frame, mut attrs) in self.frames.iter().zip(levels).rev() {
            if let Some(group) = nested.take() {
                attrs.push(group);
            }
            match frame.group {
                Some(ref name) => nested = Some(Attr::group(name.clone(), attrs)),
                None => out.extend(attrs),
            }
        }

        out
    }
}

/// Apply the chain to every attribute, recursing into groups
///
/// Group attributes themselves are not passed to the chain; their children
/// are, with the group key appended to the path. Attributes rewritten to an
/// empty key are dropped.
fn rewrite_all<I>(chain: &RewriterChain, groups: &[String], attrs: I) -> Vec<Attr>
where
    I: IntoIterator<Item = Attr>,
{
    let mut out = Vec::new();
    for attr in attrs {
        match attr.value {
            Value::Group(children) => {
                let mut path = groups.to_vec();
                path.push(attr.key.clone());
                out.push(Attr::group(attr.key, rewrite_all(chain, &path, children)));
            }
            value => {
                let rewritten = if chain.is_empty() {
                    Attr {
                        key: attr.key,
                        value,
                    }
                } else {
                    chain.apply(
                        groups,
                        Attr {
                            key: attr.key,
                            value,
                        },
                    )
                };
                if !rewritten.key.is_empty() {
                    out.push(rewritten);
                }
            }
        }
    }
    out
}

impl Default for Logger {
    /// Logger built from the baseline config
    fn default() -> Self {
        let config = Config::default();
        let level = Arc::new(LevelCell::new(config.level().initial()));
        Self::assemble(config, level, None, Arc::new(LoggerMetrics::new()))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("config", &self.shared.config)
            .field("frames", &self.frames)
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Each call records a [`LogOption`]; `build` applies them in call order.
///
/// # Example
/// ```
/// use rust_log_facade::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Warn)
///     .level_listener(|| LogLevel::Debug, Duration::from_secs(30))
///     .source()
///     .time_format("%H:%M:%S")
///     .build()
///     .unwrap();
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    options: Vec<LogOption>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    /// Record an arbitrary option
    #[must_use = "builder methods return a new value"]
    pub fn option(mut self, option: LogOption) -> Self {
        self.options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn json(self) -> Self {
        self.option(LogOption::json())
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(self, level: LogLevel) -> Self {
        self.option(LogOption::level(level))
    }

    /// Poll the minimum level from `listener` every `tick`
    #[must_use = "builder methods return a new value"]
    pub fn level_listener<F>(self, listener: F, tick: Duration) -> Self
    where
        F: Fn() -> LogLevel + Send + Sync + 'static,
    {
        self.option(LogOption::level_listener(listener, tick))
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_provider<F>(self, provider: F, tick: Duration) -> Self
    where
        F: Fn() -> Result<LogLevel> + Send + Sync + 'static,
    {
        self.option(LogOption::level_provider(provider, tick))
    }

    #[must_use = "builder methods return a new value"]
    pub fn on_level_error<F>(self, callback: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.option(LogOption::on_level_error(callback))
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(self, prefix: impl Into<String>) -> Self {
        self.option(LogOption::prefix(prefix))
    }

    /// Append one rewriter to the chain
    #[must_use = "builder methods return a new value"]
    pub fn replace_attr(self, rewriter: ReplaceAttr) -> Self {
        self.option(LogOption::replace_attr([rewriter]))
    }

    #[must_use = "builder methods return a new value"]
    pub fn source(self) -> Self {
        self.option(LogOption::source())
    }

    #[must_use = "builder methods return a new value"]
    pub fn source_depth(self, depth: usize) -> Self {
        self.option(LogOption::source_depth(depth))
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(self, format: impl Into<TimestampFormat>) -> Self {
        self.option(LogOption::time_format(format))
    }

    #[must_use = "builder methods return a new value"]
    pub fn writer(self, sink: Sink) -> Self {
        self.option(LogOption::writer(sink))
    }

    /// Build the Logger without touching the process-wide default
    pub fn build(self) -> Result<Logger> {
        Logger::new(self.options)
    }

    /// Build the Logger and install it as the process-wide default
    pub fn install(self) -> Result<Logger> {
        crate::new(self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attr::attr;
    use crate::core::rewrite::replace_attr;
    use crate::core::sink::SharedBuffer;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn capture(builder: LoggerBuilder) -> (Logger, SharedBuffer) {
        let buffer = SharedBuffer::new();
        let logger = builder.writer(Sink::new(buffer.clone())).build().unwrap();
        (logger, buffer)
    }

    fn json_lines(buffer: &SharedBuffer) -> Vec<serde_json::Value> {
        buffer
            .lines()
            .iter()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_builder_default() {
        let (logger, buffer) = capture(LoggerBuilder::default());
        logger.debug("hidden");
        logger.info("shown");
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(buffer.lines().len(), 1);
        assert!(buffer.contents().contains("level=INFO msg=shown"));
        assert_eq!(logger.metrics().records_written(), 1);
    }

    #[test]
    fn test_enabled_boundaries() {
        let (logger, _) = capture(Logger::builder().min_level(LogLevel::Warn));
        let ctx = Context::background();
        assert!(logger.enabled(&ctx, LogLevel::Warn));
        assert!(!logger.enabled(&ctx, LogLevel::Warn.below().unwrap()));
        assert!(logger.enabled(&ctx, LogLevel::Error));
    }

    #[test]
    fn test_all_levels() {
        let (logger, buffer) = capture(Logger::builder().min_level(LogLevel::Trace).json());
        logger.trace("t");
        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");
        let levels: Vec<String> = json_lines(&buffer)
            .iter()
            .map(|v| v["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(levels, vec!["TRACE", "DEBUG", "INFO", "WARN", "ERROR"]);
    }

    #[test]
    fn test_with_does_not_touch_receiver() {
        let (a, buffer) = capture(Logger::builder().json());
        let b = a.with([attr("request_id", "r-1")]);

        b.info("from b");
        a.info("from a");

        let lines = json_lines(&buffer);
        assert_eq!(lines[0]["request_id"], "r-1");
        assert!(lines[1].get("request_id").is_none());
    }

    #[test]
    fn test_with_group_nests_later_attributes() {
        let (logger, buffer) = capture(Logger::builder().json());
        let logger = logger
            .with([attr("service", "api")])
            .with_group("http")
            .with([attr("method", "GET")])
            .with_group("")
            .with_group("resp");
        logger.log_attrs(LogLevel::Info, "done", [attr("status", 200)]);

        let line = &json_lines(&buffer)[0];
        assert_eq!(line["service"], "api");
        assert_eq!(line["http"]["method"], "GET");
        assert_eq!(line["http"]["resp"]["status"], 200);
    }

    #[test]
    fn test_empty_group_is_omitted() {
        let (logger, buffer) = capture(Logger::builder());
        logger.with_group("unused").info("plain");
        assert!(!buffer.contents().contains("unused"));
    }

    #[test]
    fn test_prefix_attribute() {
        let (logger, buffer) = capture(Logger::builder().prefix("billing").json());
        logger.with_group("g").info("charged");
        let line = &json_lines(&buffer)[0];
        assert_eq!(line["prefix"], "billing");
        assert!(line["g"].is_null());
    }

    #[test]
    fn test_context_attributes_are_appended() {
        let (logger, buffer) = capture(Logger::builder().json());
        let ctx = Context::background().with_attr("trace_id", "t-9");
        logger.info_ctx(&ctx, "handled");
        logger.log_ctx(&ctx, LogLevel::Warn, "slow", [attr("ms", 900)]);

        let lines = json_lines(&buffer);
        assert_eq!(lines[0]["trace_id"], "t-9");
        assert_eq!(lines[1]["ms"], 900);
        assert_eq!(lines[1]["trace_id"], "t-9");
    }

    #[test]
    fn test_source_capture() {
        let (logger, buffer) = capture(Logger::builder().source().json());
        logger.info("located");
        let line = &json_lines(&buffer)[0];
        assert_eq!(line["source"]["file"], "logger.rs");
        assert!(line["source"]["directory"].as_str().unwrap().ends_with("src/core"));
        assert!(line["source"]["line"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_zero_time_record_has_no_time() {
        let (logger, buffer) = capture(Logger::builder().time_format(TimestampFormat::Unix));
        logger.handle(Record::new(LogLevel::Warn, "untimed").without_time());
        logger.handle(Record::new(LogLevel::Warn, "timed"));

        let lines = buffer.lines();
        assert_eq!(lines[0], "level=WARN msg=untimed");
        assert!(lines[1].starts_with("time="));
    }

    #[test]
    fn test_no_source_without_option() {
        let (logger, buffer) = capture(Logger::builder().json());
        logger.info("plain");
        assert!(json_lines(&buffer)[0].get("source").is_none());
    }

    #[test]
    fn test_rewriter_sees_group_path_and_can_drop() {
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let (logger, buffer) = capture(Logger::builder().json().replace_attr(replace_attr(
            move |groups, a| {
                seen_clone.lock().push(format!("{}:{}", groups.join("."), a.key));
                if a.key == "password" {
                    Attr::new("", a.value)
                } else {
                    a
                }
            },
        )));

        logger
            .with_group("auth")
            .log_attrs(LogLevel::Info, "login", [attr("user", "bob"), attr("password", "hunter2")]);

        let line = &json_lines(&buffer)[0];
        assert_eq!(line["auth"]["user"], "bob");
        assert!(line["auth"].get("password").is_none());
        assert!(seen.lock().contains(&":msg".to_string()));
        assert!(seen.lock().contains(&"auth:user".to_string()));
    }

    #[test]
    fn test_write_failures_are_counted_not_raised() {
        struct Broken;
        impl std::io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let logger = Logger::builder().writer(Sink::new(Broken)).build().unwrap();
        logger.info("lost");
        logger.error("also lost");
        assert_eq!(logger.metrics().write_failures(), 2);
        assert_eq!(logger.metrics().records_written(), 0);

        let report = logger.describe_failure(&LoggerError::writer("disk full"), 2);
        assert!(report.starts_with("Failed to write text record to writer (2 failures, 100.0% of records)"));
        assert!(report.ends_with("Writer error: disk full"));
    }

    #[test]
    fn test_fatal_logs_at_error_then_panics() {
        let (logger, buffer) = capture(Logger::builder().json());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.fatal("cannot continue");
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("cannot continue"));
        let line = &json_lines(&buffer)[0];
        assert_eq!(line["level"], "ERROR");
        assert_eq!(line["msg"], "cannot continue");
    }

    #[test]
    fn test_dynamic_level_follows_provider() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let (logger, _) = capture(Logger::builder().level_listener(
            move || {
                if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    LogLevel::Error
                } else {
                    LogLevel::Debug
                }
            },
            Duration::from_millis(20),
        ));

        let ctx = Context::background();
        assert!(!logger.enabled(&ctx, LogLevel::Warn));
        std::thread::sleep(Duration::from_millis(100));
        assert!(logger.enabled(&ctx, LogLevel::Debug));
        assert!(logger.is_level_refreshing());
    }

    #[test]
    fn test_refresh_stops_when_last_logger_drops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let (logger, _) = capture(Logger::builder().level_listener(
            move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                LogLevel::Info
            },
            Duration::from_millis(5),
        ));
        let derived = logger.with([attr("k", 1)]);

        drop(logger);
        std::thread::sleep(Duration::from_millis(30));
        assert!(derived.is_level_refreshing());

        drop(derived);
        let after_drop = calls.load(Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn test_builder_rejects_bad_time_format() {
        let err = Logger::builder().time_format("%Y-%Q").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }
}
