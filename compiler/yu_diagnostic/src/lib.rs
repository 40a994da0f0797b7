//! Diagnostic system for the Yu compiler.
//!
//! Provides a concrete [`Diagnostic`] record, a [`DiagnosticSink`] trait
//! for reporting and accumulation, and a terminal renderer producing the
//! caret-and-gutter format the CLI prints:
//!
//! ```text
//! error: Expected ';' at the end of variable declaration
//!   --> demo.yu:3:12
//!    |
//!   3| var x = 42
//!    |            ^
//!    |
//!    = help: Add ';' to complete the variable declaration
//!    = note: error[E0001]
//! ```

mod diagnostic;
mod emitter;
mod error_code;
mod sink;

pub use diagnostic::{Diagnostic, Severity};
pub use emitter::{render, ColorMode};
pub use error_code::DiagnosticCode;
pub use sink::{CollectingSink, DiagnosticSink, StderrSink};
