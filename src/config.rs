//! Feature generation configuration.
//!
//! Every knob has a default, so an empty TOML file is a valid config:
//!
//! ```toml
//! column_prefix = "f_entity_"
//! counting = "once_per_document"      # or "every_occurrence"
//! on_model_error = "abort"            # or "skip_document"
//! on_collision = "error"              # or "overwrite" / "suffix"
//! entity_types = ["PER", "LOC"]       # optional allow-list
//! min_entity_chars = 1
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{EntityType, Error, Result};

/// Default prefix for indicator column names.
pub const DEFAULT_COLUMN_PREFIX: &str = "f_entity_";

/// How mentions inside one document contribute to corpus counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingPolicy {
    /// Each distinct entity string counts once per document.
    #[default]
    OncePerDocument,
    /// Every mention counts.
    EveryOccurrence,
}

impl CountingPolicy {
    /// Map the boolean switch used by the public operation.
    #[must_use]
    pub fn from_once_per_document(once_per_document: bool) -> Self {
        if once_per_document {
            CountingPolicy::OncePerDocument
        } else {
            CountingPolicy::EveryOccurrence
        }
    }
}

/// What to do when the model fails on a single document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelErrorPolicy {
    /// Stop and return [`Error::ModelInvocation`].
    #[default]
    Abort,
    /// Log a warning, leave the document out of the counts, continue.
    SkipDocument,
}

/// What to do when a feature column name already exists in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Return [`Error::ColumnCollision`] before building any output.
    #[default]
    Error,
    /// Replace the existing column.
    Overwrite,
    /// Append `_1`, `_2`, ... until the name is free.
    Suffix,
}

/// Configuration for [`FeatureGenerator`](crate::FeatureGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Prefix for indicator column names.
    pub column_prefix: String,
    /// Counting policy.
    pub counting: CountingPolicy,
    /// Per-document model failure policy.
    pub on_model_error: ModelErrorPolicy,
    /// Column-name collision policy.
    pub on_collision: CollisionPolicy,
    /// Only count entities with these type labels (`None` keeps all).
    pub entity_types: Option<Vec<String>>,
    /// Drop mentions shorter than this many characters.
    pub min_entity_chars: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            column_prefix: DEFAULT_COLUMN_PREFIX.to_string(),
            counting: CountingPolicy::default(),
            on_model_error: ModelErrorPolicy::default(),
            on_collision: CollisionPolicy::default(),
            entity_types: None,
            min_entity_chars: 1,
        }
    }
}

impl FeatureConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| Error::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded feature config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Render as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.column_prefix.is_empty() {
            return Err(Error::config("column_prefix must not be empty"));
        }
        if let Some(types) = &self.entity_types {
            if types.iter().any(|t| t.trim().is_empty()) {
                return Err(Error::config("entity_types contains an empty label"));
            }
        }
        Ok(())
    }

    /// Set the column prefix.
    #[must_use]
    pub fn with_column_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.column_prefix = prefix.into();
        self
    }

    /// Set the counting policy.
    #[must_use]
    pub fn with_counting(mut self, counting: CountingPolicy) -> Self {
        self.counting = counting;
        self
    }

    /// Set the per-document model failure policy.
    #[must_use]
    pub fn with_model_error_policy(mut self, policy: ModelErrorPolicy) -> Self {
        self.on_model_error = policy;
        self
    }

    /// Set the column collision policy.
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    /// Restrict counting to these entity type labels.
    #[must_use]
    pub fn with_entity_types<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entity_types = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the minimum mention length in characters.
    #[must_use]
    pub fn with_min_entity_chars(mut self, min: usize) -> Self {
        self.min_entity_chars = min;
        self
    }

    /// Entity types from `entity_types`, normalized.
    #[must_use]
    pub fn allowed_types(&self) -> Option<Vec<EntityType>> {
        self.entity_types
            .as_ref()
            .map(|labels| labels.iter().map(|l| EntityType::from_label(l)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = FeatureConfig::from_toml_str("").unwrap();
        assert_eq!(config, FeatureConfig::default());
        assert_eq!(config.column_prefix, "f_entity_");
    }

    #[test]
    fn parses_all_fields() {
        let config = FeatureConfig::from_toml_str(
            r#"
            column_prefix = "ent_"
            counting = "every_occurrence"
            on_model_error = "skip_document"
            on_collision = "suffix"
            entity_types = ["person", "GPE"]
            min_entity_chars = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.column_prefix, "ent_");
        assert_eq!(config.counting, CountingPolicy::EveryOccurrence);
        assert_eq!(config.on_model_error, ModelErrorPolicy::SkipDocument);
        assert_eq!(config.on_collision, CollisionPolicy::Suffix);
        assert_eq!(config.min_entity_chars, 2);
        assert_eq!(
            config.allowed_types().unwrap(),
            vec![EntityType::Person, EntityType::Location]
        );
    }

    #[test]
    fn rejects_unknown_keys_and_empty_prefix() {
        assert!(matches!(
            FeatureConfig::from_toml_str("colum_prefix = \"x\""),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            FeatureConfig::from_toml_str("column_prefix = \"\""),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn toml_round_trip() {
        let config = FeatureConfig::new()
            .with_counting(CountingPolicy::EveryOccurrence)
            .with_entity_types(["ORG"]);
        let text = config.to_toml_string().unwrap();
        assert_eq!(FeatureConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn counting_policy_from_flag() {
        assert_eq!(
            CountingPolicy::from_once_per_document(true),
            CountingPolicy::OncePerDocument
        );
        assert_eq!(
            CountingPolicy::from_once_per_document(false),
            CountingPolicy::EveryOccurrence
        );
    }
}
