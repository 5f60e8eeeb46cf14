//! CLI modules for the ner-features binary.
//!
//! Kept in the library so argument parsing and command logic can be tested
//! without spawning a process.

pub mod commands;
pub mod output;
#[allow(missing_docs)]
pub mod parser;
pub mod utils;

pub use parser::{Cli, Commands};

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Generate(args) => commands::generate::cmd_generate(args),
        Commands::Count(args) => commands::count::cmd_count(args),
        Commands::Models(args) => commands::models::cmd_models(args),
    }
}
