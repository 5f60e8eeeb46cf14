//! Utility functions for CLI commands

use std::io::{self, BufReader, Read};
use std::path::Path;

use crate::{CountingPolicy, FeatureConfig, ModelErrorPolicy, Table};

use super::parser::InputArgs;

/// Whether a path should be read as JSON Lines.
fn is_jsonl_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jsonl") || ext.eq_ignore_ascii_case("ndjson"))
}

/// Read the input table from a file or stdin (`-`).
pub fn read_table(path: &str, force_jsonl: bool) -> Result<Table, String> {
    let jsonl = force_jsonl || is_jsonl_path(path);

    if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        return parse_table(&buffer, jsonl);
    }

    if jsonl {
        let file = std::fs::File::open(path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?;
        return Table::from_jsonl(BufReader::new(file))
            .map_err(|e| format!("Failed to parse {}: {}", path, e));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read file {}: {}", path, e))?;
    parse_table(&text, false).map_err(|e| format!("{}: {}", path, e))
}

fn parse_table(text: &str, jsonl: bool) -> Result<Table, String> {
    let parsed = if jsonl {
        Table::from_jsonl(text.as_bytes())
    } else {
        Table::from_json_str(text)
    };
    parsed.map_err(|e| e.to_string())
}

/// Build the effective config: file values, then flag overrides.
pub fn load_config(args: &InputArgs) -> Result<FeatureConfig, String> {
    let mut config = match &args.config {
        Some(path) => FeatureConfig::from_file(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => FeatureConfig::default(),
    };

    if args.every_occurrence {
        config.counting = CountingPolicy::EveryOccurrence;
    }
    if args.skip_failed {
        config.on_model_error = ModelErrorPolicy::SkipDocument;
    }
    if !args.labels.is_empty() {
        config.entity_types = Some(args.labels.clone());
    }
    Ok(config)
}
