//! Logging seam for the poller.
//!
//! The poller never talks to `tracing` directly. It hands [`LogRecord`]s to a
//! [`Logger`], which lets an embedding application route them anywhere and
//! lets [`QuietLogger`] drop the per-cycle "Long polling" chatter.

use std::fmt;

/// Template fragments that mark a polling start/finish notice.
const POLL_LIFECYCLE_PHRASES: [&str; 2] = ["Long polling", "Finished long polling"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// What a record is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// A poll cycle started or finished.
    PollLifecycle,
    General,
}

/// A single formatted log line.
///
/// `template` is the literal format string, `args` the formatted arguments.
/// Build records with [`log_record!`](crate::log_record).
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    pub category: LogCategory,
    pub template: &'static str,
    pub args: fmt::Arguments<'a>,
}

impl LogRecord<'_> {
    /// True for records that announce the start or end of a poll cycle.
    pub fn is_poll_lifecycle(&self) -> bool {
        self.category == LogCategory::PollLifecycle
            || POLL_LIFECYCLE_PHRASES
                .iter()
                .any(|phrase| self.template.contains(phrase))
    }
}

impl fmt::Display for LogRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.args, f)
    }
}

/// Builds a [`LogRecord`] and passes it to a logger method in one statement.
///
/// ```rust
/// use sqs_poller::log_record;
/// use sqs_poller::logger::{LogCategory, LogLevel, Logger, TracingLogger};
///
/// let logger = TracingLogger;
/// log_record!(logger.log, LogLevel::Info, LogCategory::General, "handled {} messages", 3);
/// ```
#[macro_export]
macro_rules! log_record {
    ($logger:ident . $method:ident, $level:expr, $category:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $logger.$method(&$crate::logger::LogRecord {
            level: $level,
            category: $category,
            template: $template,
            args: format_args!($template $(, $arg)*),
        })
    };
    ($logger:ident . $field:ident . $method:ident, $level:expr, $category:expr, $template:literal $(, $arg:expr)* $(,)?) => {
        $logger.$field.$method(&$crate::logger::LogRecord {
            level: $level,
            category: $category,
            template: $template,
            args: format_args!($template $(, $arg)*),
        })
    };
}

/// Destination for poller log records.
pub trait Logger: Send + Sync {
    /// Writes a formatted record.
    fn log(&self, record: &LogRecord<'_>);

    /// Writes the record, then terminates the process.
    fn fatal(&self, record: &LogRecord<'_>) -> !;
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn log(&self, record: &LogRecord<'_>) {
        (**self).log(record)
    }

    fn fatal(&self, record: &LogRecord<'_>) -> ! {
        (**self).fatal(record)
    }
}

/// Emits records as `tracing` events under the `sqs_poller` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, record: &LogRecord<'_>) {
        match record.level {
            LogLevel::Debug => tracing::debug!(target: "sqs_poller", "{}", record.args),
            LogLevel::Info => tracing::info!(target: "sqs_poller", "{}", record.args),
            LogLevel::Warn => tracing::warn!(target: "sqs_poller", "{}", record.args),
            LogLevel::Error => tracing::error!(target: "sqs_poller", "{}", record.args),
        }
    }

    fn fatal(&self, record: &LogRecord<'_>) -> ! {
        tracing::error!(target: "sqs_poller", fatal = true, "{}", record.args);
        std::process::exit(1)
    }
}

/// Wraps a logger and drops poll start/finish notices.
///
/// Everything else, fatal records included, reaches the inner logger
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct QuietLogger<L> {
    inner: L,
}

impl<L: Logger> QuietLogger<L> {
    pub fn new(inner: L) -> Self {
        QuietLogger { inner }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: Logger> Logger for QuietLogger<L> {
    fn log(&self, record: &LogRecord<'_>) {
        if record.is_poll_lifecycle() {
            return;
        }
        self.inner.log(record);
    }

    fn fatal(&self, record: &LogRecord<'_>) -> ! {
        self.inner.fatal(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<(LogLevel, &'static str, String)>>,
    }

    impl Logger for Recorder {
        fn log(&self, record: &LogRecord<'_>) {
            self.lines
                .lock()
                .unwrap()
                .push((record.level, record.template, record.to_string()));
        }

        fn fatal(&self, record: &LogRecord<'_>) -> ! {
            panic!("fatal: {}", record)
        }
    }

    #[test]
    fn suppresses_polling_notices_by_template() {
        let logger = QuietLogger::new(Recorder::default());

        log_record!(logger.log, LogLevel::Info, LogCategory::General, "Long polling on {}", "q1");
        log_record!(
            logger.log,
            LogLevel::Info,
            LogCategory::General,
            "Finished long polling after {} seconds",
            20
        );

        assert!(logger.inner().lines.lock().unwrap().is_empty());
    }

    #[test]
    fn suppresses_polling_notices_by_category() {
        let logger = QuietLogger::new(Recorder::default());

        log_record!(logger.log, LogLevel::Info, LogCategory::PollLifecycle, "poll cycle on {}", "q1");

        assert!(logger.inner().lines.lock().unwrap().is_empty());
    }

    #[test]
    fn passes_other_records_through_with_arguments() {
        let logger = QuietLogger::new(Recorder::default());

        log_record!(
            logger.log,
            LogLevel::Warn,
            LogCategory::General,
            "handler failed for {}: {}",
            "r1",
            "boom"
        );
        // Substring match is case-sensitive.
        log_record!(logger.log, LogLevel::Info, LogCategory::General, "long polling on {}", "q1");

        let lines = logger.inner().lines.lock().unwrap();
        assert_eq!(
            *lines,
            vec![
                (
                    LogLevel::Warn,
                    "handler failed for {}: {}",
                    "handler failed for r1: boom".to_string()
                ),
                (LogLevel::Info, "long polling on {}", "long polling on q1".to_string()),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "fatal: receive failed")]
    fn fatal_is_never_suppressed() {
        let logger = QuietLogger::new(Recorder::default());
        log_record!(
            logger.fatal,
            LogLevel::Error,
            LogCategory::PollLifecycle,
            "receive failed"
        );
    }

    #[test]
    #[traced_test]
    fn tracing_logger_emits_events() {
        let logger = QuietLogger::new(TracingLogger);

        log_record!(logger.log, LogLevel::Warn, LogCategory::General, "deleted {} of {}", 1, 2);
        log_record!(logger.log, LogLevel::Info, LogCategory::General, "Long polling on {}", "q-hidden");

        assert!(logs_contain("deleted 1 of 2"));
        assert!(!logs_contain("q-hidden"));
    }
}
