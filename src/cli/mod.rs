//! The Decaf command-line interface.
//!
//! Reads one source file (or stdin), runs the pipeline, and maps the
//! outcome to a process exit code.

use std::{
    io::{self, Read},
    path::Path,
};

use miette::Diagnostic;
use thiserror::Error;
use tracing::debug;

use crate::{
    ast::{
        dump::{self, DumpOptions},
        walk,
    },
    engine::{self, CompileOptions},
    errors::{exit_code, CompileError},
};

pub mod args;
pub mod output;

use args::{Command, DecafArgs};

/// Input that could not be read.
#[derive(Debug, Error, Diagnostic)]
#[error("could not read `{path}`")]
#[diagnostic(code(decaf::io))]
pub struct ReadError {
    pub path: String,
    #[source]
    pub source: io::Error,
}

/// Source text plus the options it compiles under.
struct Input {
    text: String,
    options: CompileOptions,
}

/// Runs one command and returns the exit code.
pub fn run(args: DecafArgs) -> i32 {
    let input = match read_input(args.command.file()) {
        Ok(input) => input,
        Err(err) => {
            output::print_report(err);
            return exit_code::IO;
        }
    };

    let result = match &args.command {
        Command::Ast {
            no_positions,
            compact,
            ..
        } => handle_ast(&input, *no_positions, *compact),
        Command::Tokens { .. } => handle_tokens(&input),
        Command::Check { .. } => handle_check(&input),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            debug!(code, "command failed");
            output::print_compile_error(err, args.fancy);
            code
        }
    }
}

fn read_input(file: &Path) -> Result<Input, ReadError> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| ReadError {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(Input {
            text,
            options: CompileOptions::default(),
        });
    }

    let path = file.display().to_string();
    match std::fs::read_to_string(file) {
        Ok(text) => Ok(Input {
            text,
            options: CompileOptions::default().with_source_name(path),
        }),
        Err(source) => Err(ReadError { path, source }),
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_ast(input: &Input, no_positions: bool, compact: bool) -> Result<(), CompileError> {
    let program = engine::compile(&input.text, &input.options)?;
    let options = if no_positions {
        DumpOptions::without_positions()
    } else {
        DumpOptions::default()
    };
    // An AST always serializes; a failure here is a defect.
    match dump::to_json_string(&program, &options, compact) {
        Ok(text) => output::print_json(&text),
        Err(err) => {
            return Err(CompileError::Internal {
                message: format!("AST serialization failed: {}", err),
                position: program.position.clone(),
                src: crate::errors::SourceContext::new(
                    &input.text,
                    input.options.source_name.as_deref(),
                )
                .to_named_source(),
                span: (program.position.offset, 0).into(),
                cause: None,
            })
        }
    }
    Ok(())
}

fn handle_tokens(input: &Input) -> Result<(), CompileError> {
    let tokens = engine::tokenize(&input.text, &input.options)?;
    output::print_tokens(&tokens);
    Ok(())
}

fn handle_check(input: &Input) -> Result<(), CompileError> {
    let program = engine::compile(&input.text, &input.options)?;
    let counts = walk::kind_counts(&program);
    let name = input.options.source_name.as_deref().unwrap_or("<stdin>");
    output::print_summary(name, program.classes.len(), &counts);
    Ok(())
}
