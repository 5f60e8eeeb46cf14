//! Stacked NER - run several backends and merge their output.
//!
//! ```text
//! "Email ceo@apple.com about Apple stock for $100"
//!
//!   layer 1  RegexNER       [EMAIL ceo@apple.com]            [MONEY $100]
//!   layer 2  HeuristicNER                          [ORG Apple]
//!   merged                  [EMAIL ...] [ORG Apple] [MONEY $100]
//! ```
//!
//! When spans from different layers overlap, a [`ConflictStrategy`] decides
//! which one survives.

use std::sync::Arc;

use super::{HeuristicNER, RegexNER};
use crate::{Entity, EntityType, Error, Model, Result};

/// How to resolve overlapping spans from different layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictStrategy {
    /// First layer to claim a span wins.
    #[default]
    Priority,
    /// Longest span wins; ties go to the earlier layer.
    LongestSpan,
    /// Highest confidence wins; ties go to the earlier layer.
    HighestConf,
    /// Keep everything, overlaps included.
    Union,
}

impl ConflictStrategy {
    fn prefers_candidate(&self, existing: &Entity, candidate: &Entity) -> bool {
        match self {
            ConflictStrategy::Priority | ConflictStrategy::Union => false,
            ConflictStrategy::LongestSpan => candidate.len() > existing.len(),
            ConflictStrategy::HighestConf => candidate.confidence > existing.confidence,
        }
    }
}

/// Composable NER over any [`Model`] layers.
#[derive(Clone)]
pub struct StackedNER {
    layers: Vec<Arc<dyn Model>>,
    strategy: ConflictStrategy,
    name: String,
}

impl std::fmt::Debug for StackedNER {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackedNER")
            .field("layers", &self.layer_names())
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Builder for [`StackedNER`].
#[derive(Default)]
pub struct StackedNERBuilder {
    layers: Vec<Arc<dyn Model>>,
    strategy: ConflictStrategy,
}

impl StackedNERBuilder {
    /// Add a layer (earlier = higher priority).
    #[must_use]
    pub fn layer<M: Model + 'static>(mut self, model: M) -> Self {
        self.layers.push(Arc::new(model));
        self
    }

    /// Add a boxed layer.
    #[must_use]
    pub fn layer_boxed(mut self, model: Box<dyn Model>) -> Self {
        self.layers.push(Arc::from(model));
        self
    }

    /// Set the conflict resolution strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: ConflictStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Build the stack. An empty stack is an error.
    pub fn build(self) -> Result<StackedNER> {
        if self.layers.is_empty() {
            return Err(Error::invalid_input("StackedNER requires at least one layer"));
        }
        let name = format!(
            "stacked({})",
            self.layers
                .iter()
                .map(|l| l.name().to_string())
                .collect::<Vec<_>>()
                .join("+")
        );
        Ok(StackedNER {
            layers: self.layers,
            strategy: self.strategy,
            name,
        })
    }
}

impl StackedNER {
    /// Regex layer followed by the heuristic layer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for a custom stack.
    #[must_use]
    pub fn builder() -> StackedNERBuilder {
        StackedNERBuilder::default()
    }

    /// Layer names in priority order.
    #[must_use]
    pub fn layer_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name().to_string()).collect()
    }

    /// The conflict strategy.
    #[must_use]
    pub fn strategy(&self) -> ConflictStrategy {
        self.strategy
    }
}

impl Default for StackedNER {
    fn default() -> Self {
        Self {
            layers: vec![Arc::new(RegexNER::new()), Arc::new(HeuristicNER::new())],
            strategy: ConflictStrategy::Priority,
            name: "stacked(regex+heuristic)".to_string(),
        }
    }
}

impl Model for StackedNER {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities: Vec<Entity> = Vec::new();

        for layer in &self.layers {
            for candidate in layer.extract_entities(text)? {
                if self.strategy == ConflictStrategy::Union {
                    entities.push(candidate);
                    continue;
                }

                let overlapping: Vec<usize> = entities
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.overlaps(&candidate))
                    .map(|(idx, _)| idx)
                    .collect();

                if overlapping.is_empty() {
                    entities.push(candidate);
                    continue;
                }

                // The candidate must beat every entity it overlaps.
                let wins = overlapping
                    .iter()
                    .all(|&idx| self.strategy.prefers_candidate(&entities[idx], &candidate));
                if wins {
                    for idx in overlapping.into_iter().rev() {
                        entities.remove(idx);
                    }
                    entities.push(candidate);
                } else {
                    log::trace!(
                        "{}: dropping overlapping span {:?} from {}",
                        self.name,
                        candidate.text,
                        layer.name()
                    );
                }
            }
        }

        entities.sort_by_key(|e| (e.start, e.end));
        Ok(entities)
    }

    fn supported_types(&self) -> Vec<EntityType> {
        let mut types: Vec<EntityType> = self
            .layers
            .iter()
            .flat_map(|l| l.supported_types())
            .collect();
        types.sort();
        types.dedup();
        types
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Layered NER combining multiple backends"
    }
}
