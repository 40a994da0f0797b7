//! Per-file compilation pipeline and the `.ytok` dump writer.
//!
//! Each file runs one independent lex/parse pipeline; files are
//! processed in parallel with rayon and share no mutable state.
//! Terminal output (diagnostics and verbose progress) serializes
//! through a single mutex.

use crate::{style, Config};
use parking_lot::Mutex;
use rayon::prelude::*;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::debug;
use yu_diagnostic::{render, CollectingSink, ColorMode};
use yu_ir::TokenKind;
use yu_lexer::Lexer;
use yu_parse::Parser;

/// Compile every `*.yu` file under `target_dir`.
///
/// Returns `Err` on usage/IO problems or when any file fails to parse.
pub fn run(target_dir: &Path, config: &Config) -> Result<(), String> {
    let output_dir = PathBuf::from("build/tokens");
    std::fs::create_dir_all(&output_dir)
        .map_err(|e| format!("Failed to create {}: {e}", output_dir.display()))?;

    if config.optimize {
        debug!("optimizations requested; the front-end records the flag only");
    }
    if let Some(script) = &config.linker_script {
        debug!(script = %script.display(), "linker script recorded for the backend");
    }

    let entries = std::fs::read_dir(target_dir)
        .map_err(|e| format!("Failed to read directory {}: {e}", target_dir.display()))?;
    let mut sources: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "yu"))
        .collect();
    sources.sort();

    debug!(files = sources.len(), "discovered sources");

    // All terminal output goes through this mutex (§ concurrency model:
    // pipelines are independent, the terminal is not).
    let terminal = Mutex::new(());
    let use_colors = ColorMode::Auto.should_use_colors();

    let failures: usize = sources
        .par_iter()
        .map(|path| match compile_file(path, &output_dir, config, use_colors, &terminal) {
            Ok(ok) => usize::from(!ok),
            Err(message) => {
                let _guard = terminal.lock();
                eprintln!(
                    "{}{}✘ Error:{} {message}",
                    style::BOLD,
                    style::RED,
                    style::RESET
                );
                1
            }
        })
        .sum();

    if failures > 0 {
        return Err(format!("{failures} file(s) failed to compile"));
    }
    Ok(())
}

/// Run one pipeline: read, tokenize, dump tokens, parse, report.
///
/// Returns `Ok(false)` when the file parsed with errors.
fn compile_file(
    path: &Path,
    output_dir: &Path,
    config: &Config,
    use_colors: bool,
    terminal: &Mutex<()>,
) -> Result<bool, String> {
    if config.verbose {
        let _guard = terminal.lock();
        println!(
            "{}Lexing {}{}",
            style::BLUE,
            path.display(),
            style::RESET
        );
    }

    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let file_name = path.to_string_lossy();

    let mut lexer = Lexer::new(&source);
    lexer.tokenize();

    let output_path = output_dir
        .join(path.file_name().unwrap_or_default())
        .with_extension("ytok");
    std::fs::write(&output_path, render_ytok(&lexer))
        .map_err(|e| format!("Failed to write {}: {e}", output_path.display()))?;

    let mut parser = Parser::new(&lexer, &file_name, CollectingSink::new());
    let ok = parser.parse_program();

    {
        let _guard = terminal.lock();
        let sink_warnings = parser.warnings();
        let sink_errors = parser.errors();
        for diag in sink_warnings.iter().chain(sink_errors) {
            let _ = std::io::stderr().write_all(render(diag, use_colors).as_bytes());
        }
        if config.verbose {
            println!(
                "{}  → {}{}",
                style::GREEN,
                output_path.display(),
                style::RESET
            );
        }
    }

    debug!(
        file = %path.display(),
        tokens = lexer.tokens().len(),
        errors = parser.errors().len(),
        "pipeline finished"
    );
    Ok(ok)
}

/// Render the `.ytok` dump: one `LINE:COL KIND` line per token, with the
/// source text in backticks for identifiers and literals. Trailing
/// newline included.
pub fn render_ytok(lexer: &Lexer) -> String {
    let mut out = String::new();
    for token in lexer.tokens().iter() {
        let (line, col) = lexer.get_line_col(token);
        let _ = write!(out, "{line}:{col} {}", token.kind.dump_name());
        if matches!(
            token.kind,
            TokenKind::Identifier | TokenKind::StrLiteral | TokenKind::NumLiteral
        ) {
            let _ = write!(out, " `{}`", lexer.get_token_value(token));
        }
        let _ = writeln!(out);
    }
    out
}
