//! Log sinks for the host's composite logger.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use newengine_os::{ErrorType, Logger};

/// Installs `env_logger` once. `verbose` lowers the default filter to `debug`;
/// `RUST_LOG` still wins when set. Returns false if a logger was already set.
pub fn init_env_logger(verbose: bool) -> bool {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .is_test(false)
        .try_init()
        .is_ok()
}

/// Bridges engine output into the `log` facade under one target.
#[derive(Debug, Clone)]
pub struct FacadeLogger {
    target: &'static str,
    errors_only: bool,
}

impl FacadeLogger {
    pub fn new(target: &'static str) -> Self {
        Self {
            target,
            errors_only: false,
        }
    }

    /// Forwards only error output; regular prints stay with the other sinks.
    pub fn errors_only(target: &'static str) -> Self {
        Self {
            target,
            errors_only: true,
        }
    }
}

impl Default for FacadeLogger {
    fn default() -> Self {
        Self::new("engine")
    }
}

#[inline]
fn level_for(kind: ErrorType) -> log::Level {
    match kind {
        ErrorType::Warning => log::Level::Warn,
        ErrorType::Error | ErrorType::Script | ErrorType::Shader => log::Level::Error,
    }
}

impl Logger for FacadeLogger {
    fn logv(&self, args: fmt::Arguments<'_>, is_error: bool) {
        if self.errors_only && !is_error {
            return;
        }
        let level = if is_error {
            log::Level::Error
        } else {
            log::Level::Info
        };
        if !log::log_enabled!(target: self.target, level) {
            return;
        }
        let line = args.to_string();
        log::log!(target: self.target, level, "{}", line.trim_end_matches('\n'));
    }

    fn log_error(
        &self,
        function: &str,
        file: &str,
        line: u32,
        code: &str,
        rationale: &str,
        kind: ErrorType,
    ) {
        let details = if rationale.is_empty() { code } else { rationale };
        log::log!(
            target: self.target,
            level_for(kind),
            "{}: {} (at {}:{} in {}(): {})",
            kind.label(),
            details,
            file,
            line,
            function,
            code
        );
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LogLine {
    pub text: String,
    pub is_error: bool,
}

/// Keeps the most recent lines in memory, e.g. for an in-game console or a
/// crash report. Clones share the buffer.
#[derive(Clone)]
pub struct MemoryLogger {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl MemoryLogger {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity: capacity.max(1),
        }
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().iter().cloned().collect()
    }

    pub fn errors(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .iter()
            .filter(|l| l.is_error)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn logv(&self, args: fmt::Arguments<'_>, is_error: bool) {
        let mut lines = self.lines.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(LogLine {
            text: args.to_string(),
            is_error,
        });
    }
}
