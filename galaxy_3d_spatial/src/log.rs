//! Internal logging system for the Galaxy3D spatial index
//!
//! Diagnostics go through a single process-wide logger slot:
//! - `Logger` trait for custom sinks (host engine console, file, tests)
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - `DefaultLogger`: colored console output with a severity threshold
//! - ERROR entries carry the file and line they were raised from
//!
//! The `engine_*` macros skip message formatting entirely when the current
//! logger does not want the severity.

use colored::*;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Process-wide logger slot (a `DefaultLogger` until replaced)
static LOGGER: OnceLock<RwLock<Arc<dyn Logger>>> = OnceLock::new();

/// Destination for log entries.
///
/// The global slot is not locked while `enabled` or `log` run, so an
/// implementation may itself log through the `engine_*` macros or swap the
/// logger with `set_logger`. A logger that logs from `log` must stop the
/// recursion on its own.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_spatial::galaxy3d::log::{Logger, LogEntry, LogSeverity, set_logger};
///
/// struct WarningsOnly;
///
/// impl Logger for WarningsOnly {
///     fn enabled(&self, severity: LogSeverity) -> bool {
///         severity >= LogSeverity::Warn
///     }
///
///     fn log(&self, entry: &LogEntry) {
///         eprintln!("{}", entry);
///     }
/// }
///
/// set_logger(WarningsOnly);
/// ```
pub trait Logger: Send + Sync {
    /// Whether entries of `severity` should be built at all.
    fn enabled(&self, _severity: LogSeverity) -> bool {
        true
    }

    fn log(&self, entry: &LogEntry);
}

/// One log record.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,

    pub timestamp: SystemTime,

    /// Emitting component (e.g., "galaxy3d::SpatialIndex")
    pub source: String,

    pub message: String,

    /// Source file (ERROR entries only)
    pub file: Option<&'static str>,

    /// Source line (ERROR entries only)
    pub line: Option<u32>,
}

impl LogEntry {
    /// Entry stamped with the current time, without a source location.
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    /// Attach the file and line the entry was raised from.
    pub fn at(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }
}

/// Plain (uncolored) single-line form: `[SEVERITY] [source] message (file:line)`
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] {}", self.severity, self.source, self.message)?;
        if let (Some(file), Some(line)) = (self.file, self.line) {
            write!(f, " ({}:{})", file, line)?;
        }
        Ok(())
    }
}

/// Log severity levels, ordered from most to least verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Node splits and rearrangements
    Trace,

    /// Per-entity insert/remove
    Debug,

    /// Tree built, torn down
    Info,

    /// Suspicious input that is still accepted
    Warn,

    /// Rejected operations
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in console output.
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim_end())
    }
}

/// Colored console logger.
///
/// Entries below `min_severity` are dropped. WARN and ERROR go to stderr,
/// everything else to stdout.
///
/// Format: `[timestamp] [SEVERITY] [source] message (file:line)`
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    pub min_severity: LogSeverity,
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self { min_severity: LogSeverity::Info }
    }
}

impl DefaultLogger {
    pub fn new(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    /// Console line for `entry`, colors included.
    pub fn format(&self, entry: &LogEntry) -> String {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f");

        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };

        let mut line = format!("[{}] [{}] [{}] {}",
            timestamp, severity, entry.source.bright_blue(), entry.message);
        if let (Some(file), Some(number)) = (entry.file, entry.line) {
            line.push_str(&format!(" ({}:{})", file, number));
        }
        line
    }
}

impl Logger for DefaultLogger {
    fn enabled(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }

    fn log(&self, entry: &LogEntry) {
        if !self.enabled(entry.severity) {
            return;
        }
        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", self.format(entry));
        } else {
            println!("{}", self.format(entry));
        }
    }
}

// ===== GLOBAL LOGGER API =====

fn logger_slot() -> &'static RwLock<Arc<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Arc::new(DefaultLogger::default())))
}

/// Current logger, with the slot lock already released.
fn current_logger() -> Option<Arc<dyn Logger>> {
    logger_slot().read().ok().map(|slot| Arc::clone(&*slot))
}

/// Replace the process-wide logger.
///
/// Entries already being dispatched finish on the previous logger.
pub fn set_logger<L: Logger + 'static>(logger: L) {
    if let Ok(mut slot) = logger_slot().write() {
        *slot = Arc::new(logger);
    }
}

/// Restore `DefaultLogger::default()`.
pub fn reset_logger() {
    set_logger(DefaultLogger::default());
}

/// Whether the current logger wants entries of `severity`.
///
/// Checked by the macros before formatting.
pub fn enabled(severity: LogSeverity) -> bool {
    current_logger().is_some_and(|logger| logger.enabled(severity))
}

/// Hand a built entry to the current logger.
pub fn dispatch(entry: LogEntry) {
    if let Some(logger) = current_logger() {
        logger.log(&entry);
    }
}

/// Log without a source location.
pub fn log(severity: LogSeverity, source: &str, message: String) {
    dispatch(LogEntry::new(severity, source, message));
}

/// Log with the file and line of the call site.
pub fn log_detailed(
    severity: LogSeverity,
    source: &str,
    message: String,
    file: &'static str,
    line: u32,
) {
    dispatch(LogEntry::new(severity, source, message).at(file, line));
}

// ===== LOGGING MACROS =====

#[doc(hidden)]
#[macro_export]
macro_rules! __engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::galaxy3d::log::LogSeverity::$severity) {
            $crate::log::log(
                $crate::galaxy3d::log::LogSeverity::$severity,
                $source,
                format!($($arg)*),
            );
        }
    };
}

/// Log a TRACE message
///
/// ```ignore
/// engine_trace!("galaxy3d::SpatialNode", "Split node at depth {}", depth);
/// ```
#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Trace, $source, $($arg)*) };
}

/// Log a DEBUG message
#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Debug, $source, $($arg)*) };
}

/// Log an INFO message
#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Info, $source, $($arg)*) };
}

/// Log a WARN message
#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::__engine_log!(Warn, $source, $($arg)*) };
}

/// Log an ERROR message with the call site's file:line
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        if $crate::log::enabled($crate::galaxy3d::log::LogSeverity::Error) {
            $crate::log::log_detailed(
                $crate::galaxy3d::log::LogSeverity::Error,
                $source,
                format!($($arg)*),
                file!(),
                line!(),
            );
        }
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
