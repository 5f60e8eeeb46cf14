//! Model lookup by name.
//!
//! The feature pipeline never constructs a backend directly. It asks a
//! [`ModelRegistry`] whether a name is known, then loads it once.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::{Error, HeuristicNER, Model, RegexNER, Result, StackedNER};

/// Source of NER models, keyed by name.
pub trait ModelRegistry {
    /// Canonical names of every model this registry can load.
    fn available_models(&self) -> BTreeSet<String>;

    /// Whether `name` resolves to a model.
    fn is_available(&self, name: &str) -> bool {
        self.available_models().contains(name)
    }

    /// Load a model by name.
    ///
    /// Fails with [`Error::UnknownModel`] when the name is unknown or the
    /// model cannot be constructed.
    fn load_model(&self, name: &str) -> Result<Box<dyn Model>>;
}

impl<R: ModelRegistry + ?Sized> ModelRegistry for &R {
    fn available_models(&self) -> BTreeSet<String> {
        (**self).available_models()
    }

    fn is_available(&self, name: &str) -> bool {
        (**self).is_available(name)
    }

    fn load_model(&self, name: &str) -> Result<Box<dyn Model>> {
        (**self).load_model(name)
    }
}

/// The rule-based backends that ship with the crate.
///
/// | Name | Aliases | Backend |
/// |------|---------|---------|
/// | `regex` | `pattern`, `regexner` | [`RegexNER`] |
/// | `heuristic` | `statistical`, `heuristicner` | [`HeuristicNER`] |
/// | `stacked` | `default`, `stackedner` | [`StackedNER::default`] |
///
/// Lookup is case-insensitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    /// Create the built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn canonical(name: &str) -> Option<&'static str> {
        match name.trim().to_lowercase().as_str() {
            "regex" | "pattern" | "regexner" => Some("regex"),
            "heuristic" | "statistical" | "heuristicner" => Some("heuristic"),
            "stacked" | "default" | "stackedner" => Some("stacked"),
            _ => None,
        }
    }
}

impl ModelRegistry for BuiltinRegistry {
    fn available_models(&self) -> BTreeSet<String> {
        ["regex", "heuristic", "stacked"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn is_available(&self, name: &str) -> bool {
        Self::canonical(name).is_some()
    }

    fn load_model(&self, name: &str) -> Result<Box<dyn Model>> {
        match Self::canonical(name) {
            Some("regex") => Ok(Box::new(RegexNER::new())),
            Some("heuristic") => Ok(Box::new(HeuristicNER::new())),
            Some("stacked") => Ok(Box::new(StackedNER::default())),
            _ => Err(Error::unknown_model(
                name,
                format!(
                    "available: {}",
                    self.available_models()
                        .into_iter()
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )),
        }
    }
}

/// Constructor stored in a [`StaticRegistry`].
pub type ModelFactory = Arc<dyn Fn() -> Result<Box<dyn Model>> + Send + Sync>;

/// Registry backed by an explicit name → factory map.
///
/// Useful for embedding custom backends and for tests:
///
/// ```rust
/// use ner_features::{MockModel, ModelRegistry, StaticRegistry};
///
/// let registry = StaticRegistry::new().with_model("places", || {
///     MockModel::new("places").with_lexicon(["Paris", "Berlin"])
/// });
/// assert!(registry.is_available("places"));
/// assert!(registry.load_model("people").is_err());
/// ```
#[derive(Clone, Default)]
pub struct StaticRegistry {
    factories: BTreeMap<String, ModelFactory>,
}

impl fmt::Debug for StaticRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticRegistry")
            .field("models", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StaticRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallible factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<Box<dyn Model>> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Register an infallible constructor, consuming and returning the registry.
    #[must_use]
    pub fn with_model<M, F>(mut self, name: impl Into<String>, make: F) -> Self
    where
        M: Model + 'static,
        F: Fn() -> M + Send + Sync + 'static,
    {
        self.register(name, move || Ok(Box::new(make()) as Box<dyn Model>));
        self
    }
}

impl ModelRegistry for StaticRegistry {
    fn available_models(&self) -> BTreeSet<String> {
        self.factories.keys().cloned().collect()
    }

    fn is_available(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    fn load_model(&self, name: &str) -> Result<Box<dyn Model>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::unknown_model(name, "not registered"))?;
        factory().map_err(|e| match e {
            e @ Error::UnknownModel { .. } => e,
            other => Error::unknown_model(name, format!("failed to load: {other}")),
        })
    }
}
