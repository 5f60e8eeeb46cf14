//! End-to-end entity feature generation.
//!
//! Validate, count, expand. Validation failures are reported before the model
//! runs; the model runs exactly once per document; expansion never calls it.

use serde_json::Value;

use crate::counter::EntityCounter;
use crate::expand::{Expander, FeatureSets};
use crate::validate::{validate, validate_typed, ValidatedInputs};
use crate::{
    BuiltinRegistry, CountReport, CountingPolicy, FeatureConfig, ModelRegistry, Result, Tabular,
};

/// Feature generator over a model registry.
///
/// ```rust
/// use ner_features::{CountingPolicy, FeatureConfig, FeatureGenerator, Table};
///
/// let table = Table::from_texts("text", ["Paris is nice", "I love Paris and Berlin", "Berlin"]);
/// let generator = FeatureGenerator::new()
///     .with_config(FeatureConfig::new().with_column_prefix("has_"));
///
/// let features = generator.generate(&table, "text", "heuristic", &[2, 3]).unwrap();
/// assert_eq!(features.feature_columns(2).unwrap(), ["has_Berlin", "has_Paris"]);
/// assert!(features.feature_columns(3).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureGenerator<R = BuiltinRegistry> {
    registry: R,
    config: FeatureConfig,
}

impl FeatureGenerator<BuiltinRegistry> {
    /// Generator over the built-in models with the default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: ModelRegistry> FeatureGenerator<R> {
    /// Generator over a custom registry.
    #[must_use]
    pub fn with_registry(registry: R) -> Self {
        Self {
            registry,
            config: FeatureConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: FeatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the counting policy.
    #[must_use]
    pub fn with_counting(mut self, counting: CountingPolicy) -> Self {
        self.config.counting = counting;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// The model registry.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Count entities without expanding.
    pub fn count<T: Tabular>(
        &self,
        table: &T,
        text_field: &str,
        model_name: &str,
    ) -> Result<CountReport> {
        self.config.validate()?;
        let model = validate_typed(table, text_field, model_name, &self.registry)?;
        EntityCounter::from_config(&self.config).count(table, text_field, model.as_ref())
    }

    /// Generate features for a typed table and integer cutoffs.
    pub fn generate<T: Tabular>(
        &self,
        table: &T,
        text_field: &str,
        model_name: &str,
        cutoffs: &[i64],
    ) -> Result<FeatureSets<T>> {
        let report = self.count(table, text_field, model_name)?;
        Expander::from_config(&self.config).expand(table, text_field, &report.counts, cutoffs)
    }

    /// Generate features for dynamically-typed input.
    ///
    /// `input` must be records or columnar JSON; each cutoff must be a JSON
    /// integer.
    pub fn generate_json(
        &self,
        input: &Value,
        text_field: &str,
        model_name: &str,
        cutoffs: &[Value],
    ) -> Result<FeatureSets> {
        self.config.validate()?;
        let ValidatedInputs {
            table,
            model,
            cutoffs,
            ..
        } = validate(input, text_field, model_name, cutoffs, &self.registry)?;

        let report =
            EntityCounter::from_config(&self.config).count(&table, text_field, model.as_ref())?;
        Expander::from_config(&self.config).expand(&table, text_field, &report.counts, &cutoffs)
    }
}

/// Generate entity indicator features with the built-in models.
///
/// `once_per_document` selects [`CountingPolicy::OncePerDocument`] when true
/// and [`CountingPolicy::EveryOccurrence`] otherwise.
///
/// ```rust
/// use ner_features::{generate_entity_features, Error};
/// use serde_json::json;
///
/// let docs = json!({"text": ["Paris", "Berlin"]});
/// let err = generate_entity_features(&docs, "nonexistent", "heuristic", &[json!(1)], true)
///     .unwrap_err();
/// assert!(matches!(err, Error::MissingColumn { .. }));
/// ```
pub fn generate_entity_features(
    input: &Value,
    text_field: &str,
    model_name: &str,
    cutoffs: &[Value],
    once_per_document: bool,
) -> Result<FeatureSets> {
    FeatureGenerator::new()
        .with_counting(CountingPolicy::from_once_per_document(once_per_document))
        .generate_json(input, text_field, model_name, cutoffs)
}
