//! Models command: list what `--model` accepts

use super::super::output::{format_error, write_output};
use super::super::parser::ModelsArgs;

use crate::{BuiltinRegistry, ModelRegistry};

/// Run `models`.
pub fn cmd_models(args: ModelsArgs) -> Result<(), String> {
    let registry = BuiltinRegistry::new();
    let mut output = String::new();

    for name in registry.available_models() {
        let model = registry
            .load_model(&name)
            .map_err(|e| format_error("models", &e.to_string()))?;
        output.push_str(&format!("{:<10} {}\n", name, model.description()));
        if args.types {
            let types: Vec<String> = model
                .supported_types()
                .iter()
                .map(|t| t.as_label().to_string())
                .collect();
            output.push_str(&format!("{:<10} types: {}\n", "", types.join(", ")));
        }
    }

    write_output(&output, None).map_err(|e| format_error("write output", &e))
}
