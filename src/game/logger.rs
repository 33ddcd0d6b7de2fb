//! Game event logger
//!
//! Every human-readable line the engine emits goes through here so that
//! verbosity filtering and in-memory capture work the same for the CLI and
//! for tests.

use crate::game::VerbosityLevel;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log line
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "controller_choice")
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    /// True if any captured line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.guard.iter().any(|entry| entry.message.contains(needle))
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger owned by the game state
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory and suppress stdout
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Get access to captured log entries
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Whether a message at `level` would reach any destination
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        self.is_capturing() || level <= self.verbosity
    }

    fn emit(&self, level: VerbosityLevel, message: &str, category: Option<&str>) {
        // Silent is never printed or captured
        if level == VerbosityLevel::Silent || !self.enabled(level) {
            return;
        }

        if self.is_capturing() {
            self.log_buffer.borrow_mut().push(LogEntry {
                level,
                message: message.to_string(),
                category: category.map(str::to_string),
            });
        }

        let to_stdout = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);
        if to_stdout && level <= self.verbosity {
            if level == VerbosityLevel::Minimal {
                println!("{}", message);
            } else {
                println!("  {}", message);
            }
        }
    }

    /// Log at Minimal level (outcome lines)
    #[inline]
    pub fn minimal(&self, message: &str) {
        self.emit(VerbosityLevel::Minimal, message, None);
    }

    /// Log at Normal level (turn headers, plays, combat)
    #[inline]
    pub fn normal(&self, message: &str) {
        self.emit(VerbosityLevel::Normal, message, None);
    }

    /// Log at Verbose level (draw counts, per-phase detail)
    #[inline]
    pub fn verbose(&self, message: &str) {
        self.emit(VerbosityLevel::Verbose, message, None);
    }

    /// Log a strategy decision at Normal level
    ///
    /// The controller name is kept in the captured entry's category only, so
    /// stdout reads the same no matter which strategy made the choice.
    #[inline]
    pub fn controller_choice(&self, controller_name: &str, message: &str) {
        let category = format!("controller_choice:{}", controller_name);
        self.emit(VerbosityLevel::Normal, message, Some(&category));
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

impl Clone for GameLogger {
    // Clones start with an empty buffer
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
        assert_eq!(logger.output_mode(), OutputMode::Stdout);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].level, VerbosityLevel::Minimal);
        assert!(logs.contains("minimal"));
    }

    #[test]
    fn test_capture_keeps_lines_above_verbosity() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();

        logger.verbose("detail");
        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.logs()[0].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_stdout_mode_does_not_capture() {
        let logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.normal("dropped");
        assert!(logger.logs().is_empty());
        assert!(!logger.enabled(VerbosityLevel::Minimal));
    }

    #[test]
    fn test_controller_choice_category() {
        let mut logger = GameLogger::new();
        logger.set_output_mode(OutputMode::Memory);

        logger.controller_choice("heuristic", "plays 5♠ as attack");
        let logs = logger.logs();
        assert_eq!(logs[0].message, "plays 5♠ as attack");
        assert_eq!(logs[0].category.as_deref(), Some("controller_choice:heuristic"));
    }

    #[test]
    fn test_clear_and_clone() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.normal("one");

        let cloned = logger.clone();
        assert!(cloned.logs().is_empty());
        assert!(cloned.is_capturing());

        logger.clear_logs();
        assert!(logger.logs().is_empty());
    }
}
