//! `vesper`: a front-end-only driver for `vesper_front` — lexes, parses,
//! desugars, and typechecks a single source file, printing a Rust-style
//! diagnostic block on failure (spec §7 "sufficient for a CLI renderer
//! to produce a Rust-style diagnostic block"). There is no code
//! generation or execution here (spec Non-goals); this binary exists to
//! exercise the pipeline end to end and report phase timing.

use std::{env, fs, process::ExitCode, time::Instant};

use vesper_front::{Diagnostic, PipelineConfig};

fn main() -> ExitCode {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args: Vec<String> = env::args().collect();
    let Some(file_path) = args.get(1) else {
        eprintln!("usage: vesper <file.vsp>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading {file_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let result = vesper_front::compile(&source, file_path, PipelineConfig::default());
    let elapsed = start.elapsed();

    match result {
        Ok((_typed_module, warnings)) => {
            tracing::info!(?elapsed, warning_count = warnings.len(), "compiled {file_path}");
            for warning in &warnings {
                print_diagnostic(&source, file_path, warning);
            }
            ExitCode::SUCCESS
        }
        Err(diag) => {
            tracing::info!(?elapsed, code = %diag.code, "compile failed for {file_path}");
            print_diagnostic(&source, file_path, &diag);
            ExitCode::FAILURE
        }
    }
}

/// Renders one diagnostic the way `rustc` renders a compile error: a
/// `error[CODE]: message` header, a `file:line:column` locator, the
/// offending source line with a caret under the span start, and an
/// optional hint.
fn print_diagnostic(source: &str, file_path: &str, diag: &Diagnostic) {
    let label = if diag.is_error() { "error" } else { "warning" };
    eprintln!("{label}[{}]: {}", diag.code, diag.message);
    eprintln!("  --> {file_path}:{}:{}", diag.span.start.line, diag.span.start.column);
    if let Some(line) = source.lines().nth(diag.span.start.line.saturating_sub(1) as usize) {
        eprintln!("   |");
        eprintln!("{:>3}| {line}", diag.span.start.line);
        let caret_offset = diag.span.start.column.saturating_sub(1) as usize;
        eprintln!("   | {}^", " ".repeat(caret_offset));
    }
    if let Some(hint) = diag.hint {
        eprintln!("   = hint: {hint}");
    }
}
