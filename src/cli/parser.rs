//! CLI argument parsing and structure definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::CollisionPolicy;

/// Entity indicator features for tabular text data
#[derive(Parser, Debug)]
#[command(name = "ner-features")]
#[command(
    author,
    version,
    about = "Entity indicator features for tabular text data",
    long_about = r#"
ner-features - turn a text column into binary entity features

Runs an NER model over every document, counts entities across the corpus,
and writes one table per frequency cutoff with a 0/1 column per entity
that occurs at least that often.

MODELS:
  • regex      - dates, times, money, percentages, emails, URLs, phones
  • heuristic  - persons, organizations, locations (capitalization + context)
  • stacked    - regex then heuristic (default)

EXAMPLES:
  ner-features count --input docs.json --text-field body
  ner-features generate --input docs.jsonl --cutoff 2 --cutoff 5 --output-dir out/
  ner-features models
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (repeatable: -v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Default log filter for the chosen verbosity. `RUST_LOG` overrides it.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one feature table per cutoff
    #[command(visible_alias = "g")]
    Generate(GenerateArgs),

    /// Print the entity frequency table
    #[command(visible_alias = "c")]
    Count(CountArgs),

    /// List available models
    Models(ModelsArgs),
}

/// Input table and counting options shared by `generate` and `count`.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Input table: JSON records, JSON columns, or JSONL (`-` for stdin)
    #[arg(short, long, value_name = "PATH")]
    pub input: String,

    /// Column holding the document text
    #[arg(short = 't', long, default_value = "text")]
    pub text_field: String,

    /// NER model name
    #[arg(short, long, default_value = "stacked")]
    pub model: String,

    /// Treat input as JSON Lines regardless of extension
    #[arg(long)]
    pub jsonl: bool,

    /// Count every mention instead of once per document
    #[arg(long)]
    pub every_occurrence: bool,

    /// Skip documents the model fails on instead of aborting
    #[arg(long)]
    pub skip_failed: bool,

    /// Only count these entity types (repeatable, e.g. PER, LOC)
    #[arg(short, long = "label", value_name = "TYPE")]
    pub labels: Vec<String>,

    /// TOML config file; flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for `generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Frequency cutoff (repeatable)
    #[arg(short, long = "cutoff", value_name = "N", required = true, allow_negative_numbers = true)]
    pub cutoffs: Vec<i64>,

    /// Feature column prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// What to do when a feature column name already exists
    #[arg(long, value_enum)]
    pub on_collision: Option<CollisionArg>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Write `cutoff_<N>.<ext>` files here instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for `count`.
#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only show entities with at least this count
    #[arg(long, default_value_t = 1)]
    pub min_count: usize,

    /// Output format
    #[arg(long, value_enum, default_value = "tsv")]
    pub format: CountFormat,
}

/// Arguments for `models`.
#[derive(Args, Debug, Clone)]
pub struct ModelsArgs {
    /// Also print the entity types each model produces
    #[arg(long)]
    pub types: bool,
}

/// Feature table output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON array of row objects
    #[default]
    Json,
    /// JSON lines (one row object per line)
    Jsonl,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
        }
    }
}

/// Frequency table output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CountFormat {
    /// `count<TAB>entity` lines, most frequent first
    #[default]
    Tsv,
    /// JSON object, most frequent first
    Json,
}

/// Column collision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    /// Fail before writing anything
    Error,
    /// Replace the existing column
    Overwrite,
    /// Append `_1`, `_2`, ... to the new column
    Suffix,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Error => Self::Error,
            CollisionArg::Overwrite => Self::Overwrite,
            CollisionArg::Suffix => Self::Suffix,
        }
    }
}
