//! Input validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the input is a table ([`Error::NotATable`])
//! 2. the text column exists ([`Error::MissingColumn`])
//! 3. the model name is known and loads ([`Error::UnknownModel`])
//! 4. every cutoff is an integer ([`Error::InvalidCutoffType`])
//!
//! No check calls the model or touches the input.

use serde_json::Value;

use crate::{Error, Model, ModelRegistry, Result, Table, Tabular};

/// Everything the later stages need, produced by [`validate`].
#[derive(Debug)]
pub struct ValidatedInputs {
    /// The parsed input table.
    pub table: Table,
    /// Name of the text column.
    pub text_field: String,
    /// The loaded model, reused for every document.
    pub model: Box<dyn Model>,
    /// Cutoffs in caller order, duplicates kept.
    pub cutoffs: Vec<i64>,
}

/// Validate dynamically-typed inputs.
///
/// ```rust
/// use ner_features::{validate, BuiltinRegistry, Error};
/// use serde_json::json;
///
/// let docs = json!([{"body": "Paris"}]);
/// let err = validate(&docs, "text", "heuristic", &[json!(1)], &BuiltinRegistry).unwrap_err();
/// assert!(matches!(err, Error::MissingColumn { .. }));
/// ```
pub fn validate(
    input: &Value,
    text_field: &str,
    model_name: &str,
    cutoffs: &[Value],
    registry: &dyn ModelRegistry,
) -> Result<ValidatedInputs> {
    let table = Table::from_json(input)?;
    let model = validate_typed(&table, text_field, model_name, registry)?;
    let cutoffs = parse_cutoffs(cutoffs)?;

    Ok(ValidatedInputs {
        table,
        text_field: text_field.to_string(),
        model,
        cutoffs,
    })
}

/// Validate an already-built table: column check, then model lookup.
///
/// Returns the loaded model.
pub fn validate_typed<T: Tabular>(
    table: &T,
    text_field: &str,
    model_name: &str,
    registry: &dyn ModelRegistry,
) -> Result<Box<dyn Model>> {
    if !table.has_column(text_field) {
        return Err(Error::MissingColumn {
            column: text_field.to_string(),
            available: table.column_names(),
        });
    }

    if !registry.is_available(model_name) {
        return Err(Error::unknown_model(
            model_name,
            format!(
                "available: {}",
                registry
                    .available_models()
                    .into_iter()
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ));
    }

    let model = registry.load_model(model_name).map_err(|e| match e {
        e @ Error::UnknownModel { .. } => e,
        other => Error::unknown_model(model_name, format!("failed to load: {other}")),
    })?;
    log::debug!("loaded model `{}` as {}", model_name, model.name());
    Ok(model)
}

/// Parse cutoffs, accepting JSON integers only.
///
/// Floats are rejected even when whole (`2.0`), as are strings and booleans.
/// Unsigned values above `i64::MAX` saturate; no entity count can reach them.
pub fn parse_cutoffs(cutoffs: &[Value]) -> Result<Vec<i64>> {
    cutoffs
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let invalid = || Error::InvalidCutoffType {
                index,
                value: value.to_string(),
            };
            match value {
                Value::Number(n) if n.is_i64() => n.as_i64().ok_or_else(invalid),
                Value::Number(n) if n.is_u64() => Ok(i64::MAX),
                _ => Err(invalid()),
            }
        })
        .collect()
}
