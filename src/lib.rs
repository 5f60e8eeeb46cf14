//! # ner-features
//!
//! Entity indicator features for tabular text data.
//!
//! Given a table with a text column, run a named-entity-recognition model
//! over every document, count how often each entity occurs across the
//! corpus, and for each frequency cutoff build a copy of the table with one
//! binary column per entity that met the cutoff.
//!
//! ```text
//! input table ──► validate ──► count entities ──► expand per cutoff ──► FeatureSets
//!                  (no model      (one model        (substring check,
//!                   calls)         call per row)     no model calls)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use ner_features::generate_entity_features;
//! use serde_json::json;
//!
//! let docs = json!([
//!     {"text": "Paris is nice"},
//!     {"text": "I love Paris and Berlin"},
//!     {"text": "Berlin"},
//! ]);
//!
//! let features = generate_entity_features(&docs, "text", "heuristic", &[json!(2)], true).unwrap();
//! let table = features.get(2).unwrap();
//! assert_eq!(table.column("f_entity_Paris").unwrap(), &[json!(1), json!(1), json!(0)]);
//! assert_eq!(table.column("f_entity_Berlin").unwrap(), &[json!(0), json!(1), json!(1)]);
//! ```
//!
//! ## Backends
//!
//! | Name | Backend | Entities |
//! |------|---------|----------|
//! | `regex` | [`RegexNER`] | dates, times, money, percent, email, URL, phone |
//! | `heuristic` | [`HeuristicNER`] | person, organization, location |
//! | `stacked` | [`StackedNER`] | both, regex first |
//!
//! Custom models implement [`Model`] and are made available by name through a
//! [`ModelRegistry`] such as [`StaticRegistry`].

#![warn(missing_docs)]

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub mod backends;
pub mod config;
pub mod counter;
mod entity;
mod error;
pub mod expand;
pub mod features;
pub mod table;
pub mod validate;

#[cfg(feature = "cli")]
pub mod cli;

/// A named-entity-recognition capability.
///
/// Only the surface text of returned entities takes part in feature
/// generation. Mentions are returned with repeats, in any order.
pub trait Model: Send + Sync {
    /// Extract entity mentions from text.
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>>;

    /// Entity types this model can produce.
    fn supported_types(&self) -> Vec<EntityType>;

    /// Model name/identifier.
    fn name(&self) -> &str {
        "unknown"
    }

    /// Short description of the model.
    fn description(&self) -> &str {
        "Unknown NER model"
    }
}

impl<M: Model + ?Sized> Model for Box<M> {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        (**self).extract_entities(text)
    }

    fn supported_types(&self) -> Vec<EntityType> {
        (**self).supported_types()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn description(&self) -> &str {
        (**self).description()
    }
}

impl fmt::Debug for dyn Model + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model").field("name", &self.name()).finish()
    }
}

/// A mock NER model for testing.
///
/// Three behaviours, combinable:
/// - fixed output ([`with_entities`](Self::with_entities)), returned for every text;
/// - lexicon matching ([`with_lexicon`](Self::with_lexicon)), one mention per occurrence;
/// - injected failure ([`failing_on`](Self::failing_on)) when the text contains a needle.
///
/// Clones share a call counter, so a probe clone can observe calls made
/// through a registry.
///
/// ```rust
/// use ner_features::{MockModel, Model};
///
/// let mock = MockModel::new("places").with_lexicon(["Paris", "Berlin"]);
/// let probe = mock.clone();
///
/// let entities = mock.extract_entities("Paris, Berlin, Paris").unwrap();
/// assert_eq!(entities.len(), 3);
/// assert_eq!(probe.call_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockModel {
    name: String,
    entities: Vec<Entity>,
    lexicon: Vec<(String, EntityType)>,
    fail_on: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockModel {
    /// Create a mock that finds nothing.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            lexicon: Vec::new(),
            fail_on: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Entities returned for every text.
    #[must_use]
    pub fn with_entities(mut self, entities: Vec<Entity>) -> Self {
        self.entities = entities;
        self
    }

    /// Terms reported (typed `MISC`) wherever they occur.
    #[must_use]
    pub fn with_lexicon<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lexicon.extend(
            terms
                .into_iter()
                .map(|t| (t.into(), EntityType::Other("MISC".into()))),
        );
        self
    }

    /// A single typed lexicon term.
    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>, entity_type: EntityType) -> Self {
        self.lexicon.push((term.into(), entity_type));
        self
    }

    /// Fail with [`Error::Inference`] on any text containing `needle`.
    #[must_use]
    pub fn failing_on(mut self, needle: impl Into<String>) -> Self {
        self.fail_on = Some(needle.into());
        self
    }

    /// Number of `extract_entities` calls across all clones.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Model for MockModel {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(needle) = &self.fail_on {
            if text.contains(needle.as_str()) {
                return Err(Error::inference(format!("mock failure on `{needle}`")));
            }
        }

        let mut entities = self.entities.clone();
        if !self.lexicon.is_empty() {
            let offsets = backends::CharOffsets::new(text);
            for (term, entity_type) in &self.lexicon {
                if term.is_empty() {
                    continue;
                }
                for (byte, matched) in text.match_indices(term.as_str()) {
                    entities.push(Entity::with_type(
                        matched,
                        entity_type.clone(),
                        offsets.char_at(byte),
                        offsets.char_at(byte + matched.len()),
                    ));
                }
            }
            entities.sort_by_key(|e| (e.start, e.end));
        }
        Ok(entities)
    }

    fn supported_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self
            .lexicon
            .iter()
            .map(|(_, t)| t.clone())
            .chain(self.entities.iter().map(|e| e.entity_type.clone()))
            .collect();
        types.sort();
        types.dedup();
        types
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Mock NER model for testing"
    }
}

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use ner_features::prelude::*;
    //!
    //! let table = Table::from_texts("text", ["Paris is nice", "Berlin"]);
    //! let features = FeatureGenerator::new().generate(&table, "text", "heuristic", &[1]).unwrap();
    //! assert_eq!(features.cutoffs(), vec![1]);
    //! ```
    pub use crate::config::{CollisionPolicy, CountingPolicy, FeatureConfig, ModelErrorPolicy};
    pub use crate::counter::{CountReport, EntityCounts};
    pub use crate::error::{Error, Result};
    pub use crate::expand::FeatureSets;
    pub use crate::features::{generate_entity_features, FeatureGenerator};
    pub use crate::table::{Table, Tabular};
    pub use crate::{BuiltinRegistry, Entity, EntityType, MockModel, Model, ModelRegistry};
    pub use crate::{HeuristicNER, RegexNER, StackedNER};
}

// Re-exports
pub use entity::{Entity, EntityType};
pub use error::{Error, Result};

pub use backends::{
    BuiltinRegistry, ConflictStrategy, HeuristicNER, ModelFactory, ModelRegistry, RegexNER,
    StackedNER, StaticRegistry,
};
pub use config::{
    CollisionPolicy, CountingPolicy, FeatureConfig, ModelErrorPolicy, DEFAULT_COLUMN_PREFIX,
};
pub use counter::{count_entities, CountReport, EntityCounter, EntityCounts, EntityFilter};
pub use expand::{expand, feature_column_name, Expander, FeatureSets};
pub use features::{generate_entity_features, FeatureGenerator};
pub use table::{cell_text, Cell, Table, Tabular};
pub use validate::{validate, validate_typed, ValidatedInputs};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_lexicon_reports_every_occurrence_with_char_offsets() {
        let mock = MockModel::new("m").with_term("Zürich", EntityType::Location);
        let entities = mock.extract_entities("Zürich und Zürich").unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!((entities[0].start, entities[0].end), (0, 6));
        assert_eq!((entities[1].start, entities[1].end), (11, 17));
        assert_eq!(mock.supported_types(), vec![EntityType::Location]);
    }

    #[test]
    fn mock_failure_and_call_count() {
        let mock = MockModel::new("m").failing_on("boom");
        let probe = mock.clone();
        assert!(mock.extract_entities("all good").unwrap().is_empty());
        assert!(matches!(
            mock.extract_entities("boom"),
            Err(Error::Inference(_))
        ));
        assert_eq!(probe.call_count(), 2);
    }

    #[test]
    fn boxed_models_forward() {
        let boxed: Box<dyn Model> = Box::new(RegexNER::new());
        assert_eq!(boxed.name(), "regex");
        assert_eq!(format!("{boxed:?}"), "Model { name: \"regex\" }");
    }
}
