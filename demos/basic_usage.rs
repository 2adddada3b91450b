//! Basic facade usage example
//!
//! Demonstrates building loggers from options, derived loggers with
//! `with`/`with_group`, a dynamic level and swapping the default logger.
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::prelude::*;
use rust_log_facade::info;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Facade - Basic Usage Example ===\n");

    // Text logger on stdout with source capture
    println!("1. Logging at different levels (minimum DEBUG):");
    let logger = Logger::new([
        LogOption::level(LogLevel::Debug),
        LogOption::source(),
        LogOption::writer(Sink::stdout()),
    ])?;
    logger.trace("This is a trace message (hidden)");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    info!(logger, "Listening on port {}", 8080; "tls" => true);

    println!("\n2. Derived loggers and groups (JSON):");
    let json = Logger::builder()
        .json()
        .prefix("billing")
        .time_format(TimestampFormat::Rfc3339)
        .writer(Sink::stdout())
        .build()?;
    let request = json.with([attr("request_id", "r-42")]);
    request
        .with_group("payment")
        .log_attrs(LogLevel::Info, "charged", [attr("amount", 1999), attr("currency", "EUR")]);
    json.info("the parent logger is unchanged");

    println!("\n3. Dynamic level from a listener:");
    let verbose = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&verbose);
    let dynamic = Logger::new([
        LogOption::level_listener(
            move || {
                if flag.load(Ordering::Relaxed) {
                    LogLevel::Debug
                } else {
                    LogLevel::Warn
                }
            },
            Duration::from_millis(50),
        ),
        LogOption::writer(Sink::stdout()),
    ])?;
    dynamic.debug("Debug message (hidden at WARN)");
    verbose.store(true, Ordering::Relaxed);
    std::thread::sleep(Duration::from_millis(120));
    dynamic.debug("Debug message (visible after refresh)");

    println!("\n4. Swapping the default logger:");
    rust_log_facade::info("default logger writes to stderr");
    rust_log_facade::new([LogOption::prefix("app"), LogOption::writer(Sink::stdout())])?;
    rust_log_facade::with([attr("stage", "startup")]).info("package-level call, new default");

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
