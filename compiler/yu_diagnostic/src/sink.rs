//! Diagnostic reporting and accumulation.

use crate::{render, ColorMode, Diagnostic, Severity};
use std::io::Write;

/// Destination for diagnostics produced during compilation.
///
/// Implementations accumulate everything they are given; `warnings()` and
/// `errors()` expose the records for inspection after a pipeline phase.
pub trait DiagnosticSink {
    /// Record (and possibly print) a diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);

    /// Accumulated warnings.
    fn warnings(&self) -> &[Diagnostic];

    /// Accumulated errors (including fatal ones).
    fn errors(&self) -> &[Diagnostic];

    /// Check whether any error-severity diagnostic was recorded.
    fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }
}

/// Default sink: prints each diagnostic to stderr and accumulates it.
#[derive(Default)]
pub struct StderrSink {
    colors: bool,
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
}

impl StderrSink {
    pub fn new(mode: ColorMode) -> Self {
        StderrSink {
            colors: mode.should_use_colors(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let text = render(&diagnostic, self.colors);
        let _ = std::io::stderr().write_all(text.as_bytes());

        if diagnostic.severity >= Severity::Error {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

/// Silent sink that only accumulates. Used by tests and by tools that
/// render diagnostics themselves.
#[derive(Default)]
pub struct CollectingSink {
    warnings: Vec<Diagnostic>,
    errors: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity >= Severity::Error {
            self.errors.push(diagnostic);
        } else {
            self.warnings.push(diagnostic);
        }
    }

    fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticCode;

    #[test]
    fn collecting_sink_splits_by_severity() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::warning(
            DiagnosticCode::Other,
            "w",
            "a.yu",
            1,
            1,
        ));
        sink.report(Diagnostic::error(
            DiagnosticCode::InvalidSyntax,
            "e",
            "a.yu",
            2,
            1,
        ));

        assert_eq!(sink.warnings().len(), 1);
        assert_eq!(sink.errors().len(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn fatal_counts_as_error() {
        let mut sink = CollectingSink::new();
        sink.report(Diagnostic::new(
            Severity::Fatal,
            DiagnosticCode::Other,
            "f",
            "a.yu",
            1,
            1,
        ));
        assert!(sink.has_errors());
        assert!(sink.warnings().is_empty());
    }
}
