//! The diagnostic record and severity levels.

use crate::DiagnosticCode;
use std::fmt;

/// Severity of a diagnostic.
///
/// `Warning` lets the pipeline continue. `Error` triggers parser
/// recovery; the enclosing parse reports failure. `Fatal` aborts the
/// pipeline immediately.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
            Severity::Fatal => f.write_str("fatal"),
        }
    }
}

/// A structured diagnostic: severity, code, message, source location,
/// the offending source line, and an optional fix suggestion.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Text of the source line containing the offending span.
    pub source_line: String,
    /// Byte length of the offending span, for caret underlining.
    pub span_length: u32,
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with the given severity and code.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Diagnostic {
            severity,
            code,
            message: message.into(),
            file: file.into(),
            line,
            column,
            source_line: String::new(),
            span_length: 1,
            help: None,
        }
    }

    pub fn error(
        code: DiagnosticCode,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Diagnostic::new(Severity::Error, code, message, file, line, column)
    }

    pub fn warning(
        code: DiagnosticCode,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Diagnostic::new(Severity::Warning, code, message, file, line, column)
    }

    /// Attach the source line the span falls on.
    #[must_use]
    pub fn with_source_line(mut self, line: impl Into<String>, span_length: u32) -> Self {
        self.source_line = line.into();
        self.span_length = span_length.max(1);
        self
    }

    /// Attach a fix suggestion.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Check if this diagnostic fails the pipeline.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity >= Severity::Error
    }
}
