//! Terminal rendering of diagnostics.

use crate::{Diagnostic, Severity};
use std::fmt::Write;
use std::io::IsTerminal;

/// ANSI color codes for terminal output.
mod colors {
    pub const ERROR: &str = "\x1b[1;31m"; // Bold red
    pub const WARNING: &str = "\x1b[1;33m"; // Bold yellow
    pub const FATAL: &str = "\x1b[1;35m"; // Bold magenta
    pub const GUTTER: &str = "\x1b[1;34m"; // Bold blue
    pub const HELP: &str = "\x1b[1;32m"; // Bold green
    pub const RESET: &str = "\x1b[0m";
}

/// Color output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Detect from the terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve to a boolean based on terminal detection.
    pub fn should_use_colors(&self) -> bool {
        match self {
            ColorMode::Auto => std::io::stderr().is_terminal(),
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Warning => colors::WARNING,
        Severity::Error => colors::ERROR,
        Severity::Fatal => colors::FATAL,
    }
}

/// Render a diagnostic into the caret-and-gutter block format.
///
/// ```text
/// <severity>: <message>
///   --> <file>:<line>:<col>
///    |
/// <line>| <source line text>
///    | <caret with tildes>
///    |
///    = help: <suggestion>
///    = note: error[<code>]
/// ```
pub fn render(diag: &Diagnostic, use_colors: bool) -> String {
    let mut out = String::new();
    let (c_sev, c_gut, c_help, c_reset) = if use_colors {
        (
            severity_color(diag.severity),
            colors::GUTTER,
            colors::HELP,
            colors::RESET,
        )
    } else {
        ("", "", "", "")
    };

    let _ = writeln!(out, "{c_sev}{}{c_reset}: {}", diag.severity, diag.message);
    let _ = writeln!(
        out,
        "  {c_gut}-->{c_reset} {}:{}:{}",
        diag.file, diag.line, diag.column
    );

    if !diag.source_line.is_empty() {
        let caret_pad = " ".repeat(diag.column.saturating_sub(1) as usize);
        let tildes = "~".repeat(diag.span_length.saturating_sub(1) as usize);
        let _ = writeln!(out, "{c_gut}   |{c_reset}");
        let _ = writeln!(
            out,
            "{c_gut}{:>3}|{c_reset} {}",
            diag.line, diag.source_line
        );
        let _ = writeln!(out, "{c_gut}   |{c_reset} {caret_pad}^{tildes}");
        let _ = writeln!(out, "{c_gut}   |{c_reset}");
    }

    if let Some(help) = &diag.help {
        let _ = writeln!(out, "{c_gut}   ={c_reset} {c_help}help{c_reset}: {help}");
    }
    let _ = writeln!(
        out,
        "{c_gut}   ={c_reset} note: error[{}]",
        diag.code.code()
    );

    out
}
