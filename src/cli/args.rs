//! Command-line arguments and subcommands for the `decaf` binary.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "decaf",
    version,
    about = "Parse Decaf source and lower it into a typed AST."
)]
pub struct DecafArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity (-v: debug, -vv+: trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Render errors with source snippets instead of the two-line report.
    #[arg(long, global = true)]
    pub fancy: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the AST as JSON.
    Ast {
        /// Source file, or `-` for stdin.
        file: PathBuf,
        /// Leave out every `position` member.
        #[arg(long)]
        no_positions: bool,
        /// Print on a single line.
        #[arg(long)]
        compact: bool,
    },
    /// Print the token stream.
    Tokens {
        /// Source file, or `-` for stdin.
        file: PathBuf,
    },
    /// Compile and print a summary of the AST.
    Check {
        /// Source file, or `-` for stdin.
        file: PathBuf,
    },
}

impl Command {
    pub fn file(&self) -> &PathBuf {
        match self {
            Command::Ast { file, .. } | Command::Tokens { file } | Command::Check { file } => file,
        }
    }
}
