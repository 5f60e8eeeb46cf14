//! Output formatting utilities for CLI commands

use std::io::{self, Write};
use std::path::Path;

use crate::Table;

use super::parser::OutputFormat;

/// Format error message for display
pub fn format_error(operation: &str, details: &str) -> String {
    format!("ERROR: {} - {}", operation, details)
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path.display(), e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Render a table in the chosen format.
pub fn render_table(table: &Table, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&table.to_records())
            .map(|s| s + "\n")
            .map_err(|e| format!("Failed to serialize table: {}", e)),
        OutputFormat::Jsonl => table
            .to_jsonl()
            .map_err(|e| format!("Failed to serialize table: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_format() {
        assert_eq!(
            format_error("generate", "bad cutoff"),
            "ERROR: generate - bad cutoff"
        );
    }

    #[test]
    fn render_formats() {
        let table = Table::from_texts("text", ["a", "b"]);
        assert_eq!(
            render_table(&table, OutputFormat::Jsonl).unwrap(),
            "{\"text\":\"a\"}\n{\"text\":\"b\"}\n"
        );
        let json = render_table(&table, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, serde_json::json!([{"text": "a"}, {"text": "b"}]));
    }
}
