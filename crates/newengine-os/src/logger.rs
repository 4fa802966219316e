//! Engine-visible output sinks.
//!
//! Every line the engine prints goes through a [`CompositeLogger`], which fans
//! out to its sinks in registration order. The crate's own diagnostics use the
//! `log` facade instead.

use parking_lot::RwLock;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorType {
    Error,
    Warning,
    Script,
    Shader,
}

impl ErrorType {
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            ErrorType::Error => "ERROR",
            ErrorType::Warning => "WARNING",
            ErrorType::Script => "SCRIPT ERROR",
            ErrorType::Shader => "SHADER ERROR",
        }
    }
}

/// A destination for engine output.
pub trait Logger: Send + Sync {
    fn logv(&self, args: fmt::Arguments<'_>, is_error: bool);

    /// Structured error report. The default renders two lines through `logv`:
    /// the label with the rationale (or the code when no rationale is given),
    /// then the source location.
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
        self.logv(format_args!("{}: {}\n", kind.label(), details), true);
        self.logv(
            format_args!("   At: {}:{}:{}() - {}\n", file, line, function, code),
            true,
        );
    }
}

/// Writes regular output to stdout and errors to stderr.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdLogger;

impl Logger for StdLogger {
    fn logv(&self, args: fmt::Arguments<'_>, is_error: bool) {
        // A closed pipe must not take the process down with it.
        if is_error {
            let mut err = std::io::stderr().lock();
            let _ = err.write_fmt(args);
            let _ = err.flush();
        } else {
            let mut out = std::io::stdout().lock();
            let _ = out.write_fmt(args);
            let _ = out.flush();
        }
    }
}

/// Shared fan-out over an ordered list of sinks.
///
/// Cloning yields another handle to the same sink list.
#[derive(Clone, Default)]
pub struct CompositeLogger {
    sinks: Arc<RwLock<Vec<Box<dyn Logger>>>>,
}

impl CompositeLogger {
    pub fn new(sinks: Vec<Box<dyn Logger>>) -> Self {
        Self {
            sinks: Arc::new(RwLock::new(sinks)),
        }
    }

    /// Appends a sink; it receives everything logged from now on.
    pub fn add_logger(&self, sink: Box<dyn Logger>) {
        self.sinks.write().push(sink);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }
}

impl Logger for CompositeLogger {
    fn logv(&self, args: fmt::Arguments<'_>, is_error: bool) {
        for sink in self.sinks.read().iter() {
            sink.logv(args, is_error);
        }
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
        for sink in self.sinks.read().iter() {
            sink.log_error(function, file, line, code, rationale, kind);
        }
    }
}

impl fmt::Debug for CompositeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeLogger")
            .field("sinks", &self.len())
            .finish()
    }
}

/// Reports an error through any [`Logger`] with the caller's file and line.
///
/// ```ignore
/// report_error!(self.logger, "get_unique_id", "backend has no unique id", "");
/// ```
#[macro_export]
macro_rules! report_error {
    ($logger:expr, $function:expr, $code:expr, $rationale:expr) => {
        $crate::logger::Logger::log_error(
            &$logger,
            $function,
            file!(),
            line!(),
            $code,
            $rationale,
            $crate::logger::ErrorType::Error,
        )
    };
}
