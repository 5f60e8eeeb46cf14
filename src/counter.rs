//! Corpus-wide entity counting.
//!
//! The counter runs the model once per document, in row order, and folds the
//! mentions into an [`EntityCounts`] map under a [`CountingPolicy`].

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    CountingPolicy, Entity, EntityType, Error, FeatureConfig, Model, ModelErrorPolicy, Result,
    Tabular,
};

/// Entity surface text → number of occurrences.
///
/// Iteration is sorted by entity text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCounts {
    counts: BTreeMap<String, usize>,
}

impl EntityCounts {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `entity`.
    pub fn increment(&mut self, entity: &str) {
        self.add(entity, 1);
    }

    /// Add `n` occurrences of `entity`.
    pub fn add(&mut self, entity: &str, n: usize) {
        match self.counts.get_mut(entity) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(entity.to_string(), n);
            }
        }
    }

    /// Count for `entity` (0 when never seen).
    #[must_use]
    pub fn get(&self, entity: &str) -> usize {
        self.counts.get(entity).copied().unwrap_or(0)
    }

    /// Number of distinct entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no entity was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Entities and counts, sorted by entity.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(e, &c)| (e.as_str(), c))
    }

    /// Entities whose count is at least `cutoff`, sorted by entity.
    ///
    /// A cutoff of zero or below passes every counted entity.
    #[must_use]
    pub fn passing(&self, cutoff: i64) -> Vec<&str> {
        self.iter()
            .filter(|&(_, count)| i64::try_from(count).map_or(true, |c| c >= cutoff))
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Sum another map into this one.
    pub fn merge(&mut self, other: &EntityCounts) {
        for (entity, count) in other.iter() {
            self.add(entity, count);
        }
    }

    /// Entities sorted by count descending, then by entity.
    #[must_use]
    pub fn by_frequency(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl<S: AsRef<str>> FromIterator<(S, usize)> for EntityCounts {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut counts = EntityCounts::new();
        for (entity, n) in iter {
            counts.add(entity.as_ref(), n);
        }
        counts
    }
}

/// Which mentions take part in counting.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityFilter {
    types: Option<Vec<EntityType>>,
    min_chars: usize,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self {
            types: None,
            min_chars: 1,
        }
    }
}

impl EntityFilter {
    /// Keep every non-empty mention.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep these entity types.
    #[must_use]
    pub fn with_types(mut self, types: Vec<EntityType>) -> Self {
        self.types = Some(types);
        self
    }

    /// Drop mentions shorter than `min_chars` characters.
    #[must_use]
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    /// Build from the filtering part of a config.
    #[must_use]
    pub fn from_config(config: &FeatureConfig) -> Self {
        Self {
            types: config.allowed_types(),
            min_chars: config.min_entity_chars,
        }
    }

    /// Whether `entity` should be counted.
    #[must_use]
    pub fn accepts(&self, entity: &Entity) -> bool {
        if entity.text.chars().count() < self.min_chars {
            return false;
        }
        self.types
            .as_ref()
            .map_or(true, |types| types.contains(&entity.entity_type))
    }
}

/// Counts plus run statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountReport {
    /// Entity frequency map.
    pub counts: EntityCounts,
    /// Documents the model ran on successfully.
    pub documents: usize,
    /// Row indices skipped after a model failure.
    pub skipped: Vec<usize>,
    /// Mentions that passed the filter, before per-document dedup.
    pub mentions: usize,
}

/// Configurable entity counter.
///
/// ```rust
/// use ner_features::{CountingPolicy, EntityCounter, MockModel, Table};
///
/// let table = Table::from_texts("text", ["Paris, Paris", "Berlin"]);
/// let model = MockModel::new("m").with_lexicon(["Paris", "Berlin"]);
///
/// let report = EntityCounter::new(CountingPolicy::EveryOccurrence)
///     .count(&table, "text", &model)
///     .unwrap();
/// assert_eq!(report.counts.get("Paris"), 2);
/// assert_eq!(report.counts.get("Berlin"), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntityCounter {
    policy: CountingPolicy,
    on_error: ModelErrorPolicy,
    filter: EntityFilter,
}

impl EntityCounter {
    /// Counter with the given policy, aborting on model failure, no filter.
    #[must_use]
    pub fn new(policy: CountingPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Counter configured from a [`FeatureConfig`].
    #[must_use]
    pub fn from_config(config: &FeatureConfig) -> Self {
        Self {
            policy: config.counting,
            on_error: config.on_model_error,
            filter: EntityFilter::from_config(config),
        }
    }

    /// Set the per-document failure policy.
    #[must_use]
    pub fn on_model_error(mut self, policy: ModelErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Set the mention filter.
    #[must_use]
    pub fn with_filter(mut self, filter: EntityFilter) -> Self {
        self.filter = filter;
        self
    }

    /// The counting policy.
    #[must_use]
    pub fn policy(&self) -> CountingPolicy {
        self.policy
    }

    /// Run `model` over every row of `text_field` and count mentions.
    pub fn count<T: Tabular>(
        &self,
        table: &T,
        text_field: &str,
        model: &dyn Model,
    ) -> Result<CountReport> {
        let texts = table
            .column_text(text_field)
            .ok_or_else(|| Error::MissingColumn {
                column: text_field.to_string(),
                available: table.column_names(),
            })?;

        log::debug!(
            "counting entities in {} documents with {} ({:?})",
            texts.len(),
            model.name(),
            self.policy
        );

        let mut report = CountReport::default();
        for (row, text) in texts.iter().enumerate() {
            let entities = match model.extract_entities(text) {
                Ok(entities) => entities,
                Err(source) => match self.on_error {
                    ModelErrorPolicy::Abort => {
                        return Err(Error::ModelInvocation {
                            row,
                            source: Box::new(source),
                        });
                    }
                    ModelErrorPolicy::SkipDocument => {
                        log::warn!("skipping row {row}: {source}");
                        report.skipped.push(row);
                        continue;
                    }
                },
            };
            report.documents += 1;

            let kept = entities.iter().filter(|e| self.filter.accepts(e));
            match self.policy {
                CountingPolicy::EveryOccurrence => {
                    for entity in kept {
                        report.mentions += 1;
                        report.counts.increment(&entity.text);
                    }
                }
                CountingPolicy::OncePerDocument => {
                    let mut seen = BTreeSet::new();
                    for entity in kept {
                        report.mentions += 1;
                        seen.insert(entity.text.as_str());
                    }
                    for entity in seen {
                        report.counts.increment(entity);
                    }
                }
            }
        }

        log::info!(
            "counted {} distinct entities ({} mentions) over {} documents, {} skipped",
            report.counts.len(),
            report.mentions,
            report.documents,
            report.skipped.len()
        );
        Ok(report)
    }
}

/// Count entities with default filtering, aborting on the first model failure.
pub fn count_entities<T: Tabular>(
    table: &T,
    text_field: &str,
    model: &dyn Model,
    policy: CountingPolicy,
) -> Result<CountReport> {
    EntityCounter::new(policy).count(table, text_field, model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockModel, Table};

    fn corpus() -> Table {
        Table::from_texts(
            "text",
            ["Paris is nice", "I love Paris and Berlin", "Berlin"],
        )
    }

    fn tagger() -> MockModel {
        MockModel::new("tagger").with_lexicon(["Paris", "Berlin"])
    }

    #[test]
    fn once_per_document() {
        let report =
            count_entities(&corpus(), "text", &tagger(), CountingPolicy::OncePerDocument).unwrap();
        assert_eq!(report.counts.get("Paris"), 2);
        assert_eq!(report.counts.get("Berlin"), 2);
        assert_eq!(report.documents, 3);
        assert_eq!(report.mentions, 4);
    }

    #[test]
    fn every_occurrence_counts_repeats() {
        let table = Table::from_texts("text", ["Paris and Paris", "Paris"]);
        let once = count_entities(&table, "text", &tagger(), CountingPolicy::OncePerDocument)
            .unwrap()
            .counts;
        let every = count_entities(&table, "text", &tagger(), CountingPolicy::EveryOccurrence)
            .unwrap()
            .counts;
        assert_eq!(once.get("Paris"), 2);
        assert_eq!(every.get("Paris"), 3);
    }

    #[test]
    fn matching_is_exact() {
        let model = MockModel::new("m").with_lexicon(["paris", "Paris "]);
        let table = Table::from_texts("text", ["Paris is nice"]);
        let report = count_entities(&table, "text", &model, CountingPolicy::OncePerDocument).unwrap();
        assert_eq!(report.counts.get("Paris "), 1);
        assert_eq!(report.counts.get("paris"), 0);
        assert_eq!(report.counts.get("Paris"), 0);
    }

    #[test]
    fn abort_reports_failing_row() {
        let model = tagger().failing_on("love");
        let err = count_entities(&corpus(), "text", &model, CountingPolicy::OncePerDocument)
            .unwrap_err();
        match err {
            Error::ModelInvocation { row, source } => {
                assert_eq!(row, 1);
                assert!(matches!(*source, Error::Inference(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skip_document_continues() {
        let model = tagger().failing_on("love");
        let report = EntityCounter::new(CountingPolicy::OncePerDocument)
            .on_model_error(ModelErrorPolicy::SkipDocument)
            .count(&corpus(), "text", &model)
            .unwrap();
        assert_eq!(report.skipped, vec![1]);
        assert_eq!(report.documents, 2);
        assert_eq!(report.counts.get("Paris"), 1);
        assert_eq!(report.counts.get("Berlin"), 1);
    }

    #[test]
    fn filter_by_type_and_length() {
        let model = MockModel::new("m")
            .with_term("Paris", EntityType::Location)
            .with_term("Jo", EntityType::Person)
            .with_term("Acme", EntityType::Organization);
        let table = Table::from_texts("text", ["Jo left Acme for Paris"]);

        let report = EntityCounter::new(CountingPolicy::OncePerDocument)
            .with_filter(
                EntityFilter::new()
                    .with_types(vec![EntityType::Location, EntityType::Person])
                    .with_min_chars(3),
            )
            .count(&table, "text", &model)
            .unwrap();
        assert_eq!(report.counts.iter().collect::<Vec<_>>(), vec![("Paris", 1)]);
    }

    #[test]
    fn empty_mentions_are_dropped_by_default() {
        let model = MockModel::new("m").with_entities(vec![
            Entity::with_type("", EntityType::Person, 0, 0),
            Entity::with_type("X", EntityType::Person, 0, 1),
        ]);
        let table = Table::from_texts("text", ["X"]);
        let report = count_entities(&table, "text", &model, CountingPolicy::EveryOccurrence).unwrap();
        assert_eq!(report.counts.len(), 1);
        assert_eq!(report.counts.get("X"), 1);
    }

    #[test]
    fn null_cells_are_empty_documents() {
        let table = Table::new()
            .with_column("text", vec![serde_json::Value::Null, "Paris".into()])
            .unwrap();
        let report =
            count_entities(&table, "text", &tagger(), CountingPolicy::OncePerDocument).unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.counts.get("Paris"), 1);
    }

    #[test]
    fn passing_and_frequency_order() {
        let counts: EntityCounts = [("b", 2), ("a", 2), ("c", 5), ("d", 1)].into_iter().collect();
        assert_eq!(counts.passing(2), vec!["a", "b", "c"]);
        assert_eq!(counts.passing(6), Vec::<&str>::new());
        assert_eq!(counts.passing(-1).len(), 4);
        assert_eq!(
            counts.by_frequency(),
            vec![("c", 5), ("a", 2), ("b", 2), ("d", 1)]
        );
    }

    #[test]
    fn merge_sums() {
        let mut left: EntityCounts = [("Paris", 1)].into_iter().collect();
        let right: EntityCounts = [("Paris", 2), ("Berlin", 1)].into_iter().collect();
        left.merge(&right);
        assert_eq!(left.get("Paris"), 3);
        assert_eq!(left.get("Berlin"), 1);
    }
}
