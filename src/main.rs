//! `decaf` binary entry point.

use std::process;

use clap::Parser;
use decaf::cli::{self, args::DecafArgs};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = DecafArgs::parse();
    init_tracing(args.verbose);
    process::exit(cli::run(args));
}

/// `DECAF_LOG` overrides the `-v` level when set.
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env("DECAF_LOG")
        .unwrap_or_else(|_| EnvFilter::new(directive_for_verbosity(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn directive_for_verbosity(v: u8) -> &'static str {
    match v {
        0 => "decaf=warn",
        1 => "decaf=debug",
        _ => "decaf=trace",
    }
}
