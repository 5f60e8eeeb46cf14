//! Generate command: one feature table per cutoff

use std::time::Instant;

use serde_json::{json, Map, Value};

use super::super::output::{format_error, render_table, write_output};
use super::super::parser::{GenerateArgs, OutputFormat};
use super::super::utils::{load_config, read_table};

use crate::FeatureGenerator;

/// Run `generate`.
pub fn cmd_generate(args: GenerateArgs) -> Result<(), String> {
    let mut config = load_config(&args.input).map_err(|e| format_error("config", &e))?;
    if let Some(prefix) = &args.prefix {
        config.column_prefix = prefix.clone();
    }
    if let Some(policy) = args.on_collision {
        config.on_collision = policy.into();
    }

    let table = read_table(&args.input.input, args.input.jsonl)
        .map_err(|e| format_error("read input", &e))?;

    let generator = FeatureGenerator::new().with_config(config);
    let start = Instant::now();
    let features = generator
        .generate(
            &table,
            &args.input.text_field,
            &args.input.model,
            &args.cutoffs,
        )
        .map_err(|e| format_error("generate", &e.to_string()))?;
    log::info!(
        "generated {} feature tables in {:.2}ms",
        features.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    match &args.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                format_error(
                    "write output",
                    &format!("Failed to create {}: {}", dir.display(), e),
                )
            })?;
            for (cutoff, table) in features.iter() {
                let path = dir.join(format!("cutoff_{}.{}", cutoff, args.format.extension()));
                let content =
                    render_table(table, args.format).map_err(|e| format_error("write output", &e))?;
                write_output(&content, Some(&path)).map_err(|e| format_error("write output", &e))?;
                log::info!(
                    "wrote {} ({} feature columns)",
                    path.display(),
                    features.feature_columns(cutoff).map_or(0, <[String]>::len)
                );
            }
        }
        None => {
            let content = match args.format {
                OutputFormat::Json => {
                    let by_cutoff: Map<String, Value> = features
                        .iter()
                        .map(|(cutoff, table)| (cutoff.to_string(), table.to_records()))
                        .collect();
                    serde_json::to_string_pretty(&by_cutoff)
                        .map(|s| s + "\n")
                        .map_err(|e| format_error("write output", &e.to_string()))?
                }
                OutputFormat::Jsonl => {
                    let mut out = String::new();
                    for (cutoff, table) in features.iter() {
                        if let Value::Array(rows) = table.to_records() {
                            for row in rows {
                                out.push_str(&json!({"cutoff": cutoff, "row": row}).to_string());
                                out.push('\n');
                            }
                        }
                    }
                    out
                }
            };
            write_output(&content, None).map_err(|e| format_error("write output", &e))?;
        }
    }

    Ok(())
}
