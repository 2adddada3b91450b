//! Dynamic minimum level
//!
//! [`LevelCell`] is the atomic threshold every `enabled` check reads.
//! [`LevelController`] owns the background thread that keeps a cell in sync
//! with a level provider.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default timeout for joining the refresh thread (5 seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of the current minimum level, polled on every tick
pub type LevelProvider = Arc<dyn Fn() -> Result<LogLevel> + Send + Sync>;

/// Called with the error whenever a provider call fails or panics
pub type LevelErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Concurrency-safe holder of the current minimum level
#[derive(Debug)]
pub struct LevelCell {
    level: AtomicU8,
}

impl LevelCell {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
        }
    }

    #[inline]
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Release);
    }

    /// True when `level` is at or above the current threshold
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.get()
    }
}

impl Default for LevelCell {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

/// Background refresher for a [`LevelCell`]
///
/// The provider is called once synchronously by [`LevelController::spawn`],
/// then once per `tick` on a dedicated thread for as long as the controller
/// lives. A failing or panicking provider leaves the previous level in
/// place. Dropping the controller stops the thread.
pub struct LevelController {
    shutdown: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
    tick: Duration,
}

struct Refresher {
    cell: Arc<LevelCell>,
    provider: LevelProvider,
    on_error: Option<LevelErrorCallback>,
    metrics: Arc<LoggerMetrics>,
}

impl Refresher {
    fn refresh(&self) {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (self.provider)()));

        let err = match result {
            Ok(Ok(level)) => {
                self.cell.set(level);
                self.metrics.record_level_refresh();
                return;
            }
            Ok(Err(e)) => e,
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                LoggerError::level_provider(format!("provider panicked: {}", panic_msg))
            }
        };

        self.metrics.record_level_refresh_failure();
        match self.on_error {
            Some(ref callback) => callback(&err),
            None => eprintln!(
                "[LOGGER ERROR] Level refresh failed, keeping {}: {}",
                self.cell.get(),
                err
            ),
        }
    }
}

impl LevelController {
    pub fn spawn(
        cell: Arc<LevelCell>,
        provider: LevelProvider,
        tick: Duration,
        on_error: Option<LevelErrorCallback>,
        metrics: Arc<LoggerMetrics>,
    ) -> Result<Self> {
        if tick.is_zero() {
            return Err(LoggerError::config("level_listener", "tick must be non-zero"));
        }

        let refresher = Refresher {
            cell,
            provider,
            on_error,
            metrics,
        };
        refresher.refresh();

        let (sender, receiver) = bounded::<()>(0);
        let handle = thread::Builder::new()
            .name("log-level-refresh".to_string())
            .spawn(move || loop {
                match receiver.recv_timeout(tick) {
                    Err(RecvTimeoutError::Timeout) => refresher.refresh(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| {
                LoggerError::io_operation("starting level refresh", "failed to spawn thread", e)
            })?;

        Ok(Self {
            shutdown: Some(sender),
            handle: Some(handle),
            tick,
        })
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop the refresh thread and wait up to `timeout` for it to exit
    ///
    /// Returns `true` if the thread exited within the timeout.
    pub fn stop(&mut self, timeout: Duration) -> bool {
        drop(self.shutdown.take());

        let Some(handle) = self.handle.take() else {
            return true;
        };

        let start = Instant::now();
        loop {
            if handle.is_finished() {
                if let Err(e) = handle.join() {
                    eprintln!("[LOGGER ERROR] Level refresh thread panicked: {:?}", e);
                    return false;
                }
                return true;
            }

            if start.elapsed() >= timeout {
                eprintln!(
                    "[LOGGER WARNING] Level refresh thread did not finish within {:?}",
                    timeout
                );
                return false;
            }

            thread::sleep(Duration::from_millis(1));
        }
    }
}

impl fmt::Debug for LevelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelController")
            .field("tick", &self.tick)
            .field("running", &self.is_running())
            .finish()
    }
}

impl Drop for LevelController {
    fn drop(&mut self) {
        self.stop(DEFAULT_SHUTDOWN_TIMEOUT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    fn provider_from<F>(f: F) -> LevelProvider
    where
        F: Fn() -> Result<LogLevel> + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    #[test]
    fn test_cell_boundaries() {
        let cell = LevelCell::new(LogLevel::Warn);
        assert!(cell.enabled(LogLevel::Warn));
        assert!(cell.enabled(LogLevel::Error));
        assert!(!cell.enabled(LogLevel::Info));

        cell.set(LogLevel::Trace);
        assert!(cell.enabled(LogLevel::Trace));
    }

    #[test]
    fn test_initial_read_is_synchronous() {
        let cell = Arc::new(LevelCell::new(LogLevel::Info));
        let controller = LevelController::spawn(
            Arc::clone(&cell),
            provider_from(|| Ok(LogLevel::Error)),
            Duration::from_secs(60),
            None,
            Arc::new(LoggerMetrics::new()),
        )
        .unwrap();

        assert_eq!(cell.get(), LogLevel::Error);
        assert!(controller.is_running());
    }

    #[test]
    fn test_refreshes_every_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let cell = Arc::new(LevelCell::default());
        let metrics = Arc::new(LoggerMetrics::new());

        let _controller = LevelController::spawn(
            Arc::clone(&cell),
            provider_from(move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok(LogLevel::Debug)
            }),
            Duration::from_millis(10),
            None,
            Arc::clone(&metrics),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(200));
        assert!(calls.load(Ordering::SeqCst) >= 3, "provider called {} times", calls.load(Ordering::SeqCst));
        assert!(metrics.level_refreshes() >= 3);
    }

    #[test]
    fn test_failure_keeps_previous_level_and_reports() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let errors_clone = Arc::clone(&errors);
        let cell = Arc::new(LevelCell::new(LogLevel::Warn));
        let metrics = Arc::new(LoggerMetrics::new());

        let _controller = LevelController::spawn(
            Arc::clone(&cell),
            provider_from(|| Err(LoggerError::level_provider("config service down"))),
            Duration::from_secs(60),
            Some(Arc::new(move |e: &LoggerError| errors_clone.lock().push(e.to_string()))),
            Arc::clone(&metrics),
        )
        .unwrap();

        assert_eq!(cell.get(), LogLevel::Warn);
        assert_eq!(metrics.level_refresh_failures(), 1);
        assert_eq!(errors.lock().len(), 1);
        assert!(errors.lock()[0].contains("config service down"));
    }

    #[test]
    fn test_panicking_provider_is_contained() {
        let reported = Arc::new(AtomicUsize::new(0));
        let reported_clone = Arc::clone(&reported);
        let cell = Arc::new(LevelCell::new(LogLevel::Info));

        let controller = LevelController::spawn(
            Arc::clone(&cell),
            provider_from(|| panic!("provider exploded")),
            Duration::from_millis(5),
            Some(Arc::new(move |e: &LoggerError| {
                assert!(e.to_string().contains("provider exploded"));
                reported_clone.fetch_add(1, Ordering::SeqCst);
            })),
            Arc::new(LoggerMetrics::new()),
        )
        .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert_eq!(cell.get(), LogLevel::Info);
        assert!(reported.load(Ordering::SeqCst) >= 2);
        assert!(controller.is_running());
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = LevelController::spawn(
            Arc::new(LevelCell::default()),
            provider_from(|| Ok(LogLevel::Info)),
            Duration::ZERO,
            None,
            Arc::new(LoggerMetrics::new()),
        );
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_stop_ends_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let mut controller = LevelController::spawn(
            Arc::new(LevelCell::default()),
            provider_from(move || {
                calls_clone.fetch_add(1, Ordering::SeqCst);
                Ok(LogLevel::Info)
            }),
            Duration::from_millis(5),
            None,
            Arc::new(LoggerMetrics::new()),
        )
        .unwrap();

        assert!(controller.stop(Duration::from_secs(1)));
        assert!(!controller.is_running());

        let after_stop = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }
}
