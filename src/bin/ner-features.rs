//! ner-features - entity indicator features from the command line
//!
//! Usage:
//!   ner-features count --input docs.json --text-field body
//!   ner-features generate --input docs.json --cutoff 2 --output-dir out/
//!   ner-features models

use std::process::ExitCode;

use clap::Parser;

use ner_features::cli::{self, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
