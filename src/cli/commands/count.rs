//! Count command: corpus entity frequencies, for choosing cutoffs

use serde_json::{Map, Value};

use super::super::output::{format_error, write_output};
use super::super::parser::{CountArgs, CountFormat};
use super::super::utils::{load_config, read_table};

use crate::FeatureGenerator;

/// Run `count`.
pub fn cmd_count(args: CountArgs) -> Result<(), String> {
    let config = load_config(&args.input).map_err(|e| format_error("config", &e))?;
    let table = read_table(&args.input.input, args.input.jsonl)
        .map_err(|e| format_error("read input", &e))?;

    let report = FeatureGenerator::new()
        .with_config(config)
        .count(&table, &args.input.text_field, &args.input.model)
        .map_err(|e| format_error("count", &e.to_string()))?;

    if !report.skipped.is_empty() {
        log::warn!(
            "{} documents skipped after model failures: {:?}",
            report.skipped.len(),
            report.skipped
        );
    }

    let ranked: Vec<(&str, usize)> = report
        .counts
        .by_frequency()
        .into_iter()
        .filter(|&(_, count)| count >= args.min_count)
        .collect();

    let output = match args.format {
        CountFormat::Tsv => ranked
            .iter()
            .map(|(entity, count)| format!("{}\t{}\n", count, entity))
            .collect::<String>(),
        CountFormat::Json => {
            let map: Map<String, Value> = ranked
                .iter()
                .map(|&(entity, count)| (entity.to_string(), Value::from(count)))
                .collect();
            serde_json::to_string_pretty(&map)
                .map(|s| s + "\n")
                .map_err(|e| format_error("count", &e.to_string()))?
        }
    };

    write_output(&output, None).map_err(|e| format_error("write output", &e))
}
