//! Per-cutoff dataset expansion.
//!
//! For each cutoff, the expander deep-copies the input table and adds one
//! indicator column per entity whose count reaches the cutoff. An indicator
//! is `1` when the entity text is a substring of the row's text, `0`
//! otherwise. No model is involved at this stage.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::{
    Cell, CollisionPolicy, EntityCounts, Error, FeatureConfig, Result, Table, Tabular,
    DEFAULT_COLUMN_PREFIX,
};

/// Name of the indicator column for `entity`.
#[must_use]
pub fn feature_column_name(prefix: &str, entity: &str) -> String {
    format!("{prefix}{entity}")
}

/// Output tables keyed by cutoff.
///
/// Each table is independent; mutating one never affects another or the
/// input.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSets<T = Table> {
    tables: BTreeMap<i64, T>,
    columns: BTreeMap<i64, Vec<String>>,
}

impl<T> Default for FeatureSets<T> {
    fn default() -> Self {
        Self {
            tables: BTreeMap::new(),
            columns: BTreeMap::new(),
        }
    }
}

impl<T> FeatureSets<T> {
    /// Table for `cutoff`.
    #[must_use]
    pub fn get(&self, cutoff: i64) -> Option<&T> {
        self.tables.get(&cutoff)
    }

    /// Mutable table for `cutoff`.
    pub fn get_mut(&mut self, cutoff: i64) -> Option<&mut T> {
        self.tables.get_mut(&cutoff)
    }

    /// Cutoffs present, ascending.
    #[must_use]
    pub fn cutoffs(&self) -> Vec<i64> {
        self.tables.keys().copied().collect()
    }

    /// Indicator columns added for `cutoff`, in entity order.
    #[must_use]
    pub fn feature_columns(&self, cutoff: i64) -> Option<&[String]> {
        self.columns.get(&cutoff).map(Vec::as_slice)
    }

    /// Number of distinct cutoffs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether there are no outputs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Cutoffs and tables, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &T)> {
        self.tables.iter().map(|(&c, t)| (c, t))
    }

    /// Take the tables.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<i64, T> {
        self.tables
    }
}

impl<T> IntoIterator for FeatureSets<T> {
    type Item = (i64, T);
    type IntoIter = std::collections::btree_map::IntoIter<i64, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Builds [`FeatureSets`] from a table and entity counts.
#[derive(Debug, Clone)]
pub struct Expander {
    prefix: String,
    collision: CollisionPolicy,
}

impl Default for Expander {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_COLUMN_PREFIX.to_string(),
            collision: CollisionPolicy::default(),
        }
    }
}

impl Expander {
    /// Default prefix, collisions are errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expander configured from a [`FeatureConfig`].
    #[must_use]
    pub fn from_config(config: &FeatureConfig) -> Self {
        Self {
            prefix: config.column_prefix.clone(),
            collision: config.on_collision,
        }
    }

    /// Set the column prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the collision policy.
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Build one output table per distinct cutoff.
    pub fn expand<T: Tabular>(
        &self,
        table: &T,
        text_field: &str,
        counts: &EntityCounts,
        cutoffs: &[i64],
    ) -> Result<FeatureSets<T>> {
        let texts = table
            .column_text(text_field)
            .ok_or_else(|| Error::MissingColumn {
                column: text_field.to_string(),
                available: table.column_names(),
            })?;

        let mut sets = FeatureSets::default();
        let Some(&lowest) = cutoffs.iter().min() else {
            return Ok(sets);
        };

        // Every cutoff's entities are a subset of the lowest cutoff's, so
        // names and indicators are resolved once for that set.
        let candidates = counts.passing(lowest);
        let names = self.column_names(table, &candidates)?;
        let indicators: BTreeMap<&str, Vec<Cell>> = candidates
            .iter()
            .map(|&entity| {
                let values = texts
                    .iter()
                    .map(|text| Value::from(u8::from(text.contains(entity))))
                    .collect();
                (entity, values)
            })
            .collect();

        for &cutoff in cutoffs {
            if sets.tables.contains_key(&cutoff) {
                log::debug!("cutoff {cutoff} repeated, reusing its table");
                continue;
            }

            let mut output = table.clone();
            let mut added = Vec::new();
            for entity in counts.passing(cutoff) {
                let (Some(name), Some(values)) = (names.get(entity), indicators.get(entity)) else {
                    continue;
                };
                output.set_column(name, values.clone())?;
                added.push(name.clone());
            }
            log::debug!("cutoff {cutoff}: {} feature columns", added.len());

            sets.tables.insert(cutoff, output);
            sets.columns.insert(cutoff, added);
        }

        Ok(sets)
    }

    /// Resolve a column name per entity under the collision policy.
    fn column_names<'a, T: Tabular>(
        &self,
        table: &T,
        entities: &[&'a str],
    ) -> Result<BTreeMap<&'a str, String>> {
        let mut taken: BTreeSet<String> = table.column_names().into_iter().collect();
        let mut names = BTreeMap::new();

        for &entity in entities {
            let base = feature_column_name(&self.prefix, entity);
            let name = if !taken.contains(&base) {
                base
            } else {
                match self.collision {
                    CollisionPolicy::Error => {
                        return Err(Error::ColumnCollision { column: base });
                    }
                    CollisionPolicy::Overwrite => {
                        log::warn!("feature column `{base}` replaces an existing column");
                        base
                    }
                    CollisionPolicy::Suffix => {
                        let mut n = 1usize;
                        loop {
                            let candidate = format!("{base}_{n}");
                            if !taken.contains(&candidate) {
                                break candidate;
                            }
                            n += 1;
                        }
                    }
                }
            };
            taken.insert(name.clone());
            names.insert(entity, name);
        }

        Ok(names)
    }
}

/// Expand with the default prefix, failing on column collisions.
pub fn expand<T: Tabular>(
    table: &T,
    text_field: &str,
    counts: &EntityCounts,
    cutoffs: &[i64],
) -> Result<FeatureSets<T>> {
    Expander::new().expand(table, text_field, counts, cutoffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn corpus() -> Table {
        Table::from_texts(
            "text",
            ["Paris is nice", "I love Paris and Berlin", "Berlin"],
        )
    }

    fn counts() -> EntityCounts {
        [("Paris", 2), ("Berlin", 2)].into_iter().collect()
    }

    #[test]
    fn indicator_columns_per_cutoff() {
        let sets = expand(&corpus(), "text", &counts(), &[2, 3]).unwrap();
        assert_eq!(sets.cutoffs(), vec![2, 3]);

        let two = sets.get(2).unwrap();
        assert_eq!(
            two.column_names(),
            vec!["text", "f_entity_Berlin", "f_entity_Paris"]
        );
        assert_eq!(
            two.column("f_entity_Paris").unwrap(),
            &[json!(1), json!(1), json!(0)]
        );
        assert_eq!(
            two.column("f_entity_Berlin").unwrap(),
            &[json!(0), json!(1), json!(1)]
        );

        let three = sets.get(3).unwrap();
        assert_eq!(three, &corpus());
        assert_eq!(sets.feature_columns(3).unwrap().len(), 0);
    }

    #[test]
    fn duplicate_cutoffs_collapse() {
        let sets = expand(&corpus(), "text", &counts(), &[2, 2, 1, 2]).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets.cutoffs(), vec![1, 2]);
    }

    #[test]
    fn no_cutoffs_no_outputs() {
        let sets = expand(&corpus(), "text", &counts(), &[]).unwrap();
        assert!(sets.is_empty());
    }

    #[test]
    fn indicator_is_substring_not_count() {
        // "Paris" inside "Parisian" still counts as present.
        let table = Table::from_texts("text", ["Parisian food", "nothing"]);
        let counts: EntityCounts = [("Paris", 5)].into_iter().collect();
        let sets = expand(&table, "text", &counts, &[1]).unwrap();
        assert_eq!(
            sets.get(1).unwrap().column("f_entity_Paris").unwrap(),
            &[json!(1), json!(0)]
        );
    }

    #[test]
    fn collision_error_is_default() {
        let table = corpus()
            .with_column("f_entity_Paris", vec![json!("x"); 3])
            .unwrap();
        let err = expand(&table, "text", &counts(), &[1]).unwrap_err();
        assert!(matches!(err, Error::ColumnCollision { column } if column == "f_entity_Paris"));
    }

    #[test]
    fn collision_overwrite_and_suffix() {
        let table = corpus()
            .with_column("f_entity_Paris", vec![json!("x"); 3])
            .unwrap();

        let overwritten = Expander::new()
            .with_collision_policy(CollisionPolicy::Overwrite)
            .expand(&table, "text", &counts(), &[1])
            .unwrap();
        let out = overwritten.get(1).unwrap();
        assert_eq!(out.num_columns(), 3);
        assert_eq!(
            out.column("f_entity_Paris").unwrap(),
            &[json!(1), json!(1), json!(0)]
        );

        let suffixed = Expander::new()
            .with_collision_policy(CollisionPolicy::Suffix)
            .expand(&table, "text", &counts(), &[1])
            .unwrap();
        let out = suffixed.get(1).unwrap();
        assert_eq!(out.column("f_entity_Paris").unwrap(), vec![json!("x"); 3].as_slice());
        assert_eq!(
            out.column("f_entity_Paris_1").unwrap(),
            &[json!(1), json!(1), json!(0)]
        );
        assert_eq!(
            suffixed.feature_columns(1).unwrap(),
            &["f_entity_Berlin".to_string(), "f_entity_Paris_1".to_string()]
        );
    }

    #[test]
    fn suffix_avoids_other_feature_names() {
        let table = Table::from_texts("text", ["A A_1"])
            .with_column("f_A", vec![json!(0)])
            .unwrap();
        let counts: EntityCounts = [("A", 1), ("A_1", 1)].into_iter().collect();
        let sets = Expander::new()
            .with_prefix("f_")
            .with_collision_policy(CollisionPolicy::Suffix)
            .expand(&table, "text", &counts, &[1])
            .unwrap();
        assert_eq!(
            sets.feature_columns(1).unwrap(),
            &["f_A_1".to_string(), "f_A_1_1".to_string()]
        );
    }

    #[test]
    fn outputs_are_independent() {
        let input = corpus();
        let mut sets = expand(&input, "text", &counts(), &[1, 2]).unwrap();
        sets.get_mut(1)
            .unwrap()
            .set_column("extra", vec![json!(0); 3])
            .unwrap();
        assert!(!sets.get(2).unwrap().has_column("extra"));
        assert!(!input.has_column("extra"));
        assert_eq!(input, corpus());
    }

    #[test]
    fn missing_text_column() {
        let err = expand(&corpus(), "body", &counts(), &[1]).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { .. }));
    }

    #[test]
    fn cutoff_zero_and_below_keep_all_counted() {
        let sets = expand(&corpus(), "text", &counts(), &[0, -5]).unwrap();
        assert_eq!(sets.feature_columns(0).unwrap().len(), 2);
        assert_eq!(sets.feature_columns(-5).unwrap().len(), 2);
    }
}
