//! User-facing output for the CLI.
//!
//! Results go to stdout. Errors go to stderr, either as the plain two-line
//! report or through miette's graphical handler.

use std::{collections::BTreeMap, io::Write};

use miette::{Diagnostic, Report};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::{ast::NodeKind, errors::CompileError, syntax::Token};

// ============================================================================
// ERRORS
// ============================================================================

/// Prints a compile error to stderr.
pub fn print_compile_error(error: CompileError, fancy: bool) {
    if fancy {
        print_report(error);
        return;
    }

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let _ = stderr.set_color(ColorSpec::new().set_bold(true));
    let _ = writeln!(stderr, "{}", error.location_line());
    let color = if error.is_internal() {
        Color::Magenta
    } else {
        Color::Red
    };
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = writeln!(stderr, "{}", error.message_line());
    let _ = stderr.reset();
}

/// Prints any diagnostic with miette's graphical report.
pub fn print_report<E>(error: E)
where
    E: Diagnostic + Send + Sync + 'static,
{
    eprintln!("{:?}", Report::new(error));
}

// ============================================================================
// RESULTS
// ============================================================================

/// One line per token: `Kind 'text' line:column`.
pub fn print_tokens(tokens: &[Token]) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for token in tokens {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        let _ = write!(stdout, "{}", token.kind);
        let _ = stdout.reset();
        let _ = writeln!(stdout, " '{}' {}:{}", token.text, token.line, token.column);
    }
}

/// A class count header followed by per-kind node counts.
pub fn print_summary(name: &str, classes: usize, counts: &BTreeMap<NodeKind, usize>) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true));
    let _ = write!(stdout, "ok");
    let _ = stdout.reset();
    let noun = if classes == 1 { "class" } else { "classes" };
    let _ = writeln!(stdout, ": {} ({} {})", name, classes, noun);
    for (kind, count) in counts {
        let _ = writeln!(stdout, "  {:<20} {}", kind.as_str(), count);
    }
}

pub fn print_json(text: &str) {
    println!("{}", text);
}
