//! NER backend implementations.
//!
//! Each backend implements the [`Model`](crate::Model) trait.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ StackedNER (default)                         │
//! │   layers run in order, earlier spans win     │
//! ├──────────────────────────────────────────────┤
//! │ HeuristicNER                                 │
//! │   Person/Org/Location via capitalization     │
//! ├──────────────────────────────────────────────┤
//! │ RegexNER                                     │
//! │   Date/Time/Money/Percent/Email/URL/Phone    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Models are looked up by name through a [`ModelRegistry`].
//!
//! ```rust
//! use ner_features::{Model, StackedNER};
//!
//! let ner = StackedNER::default();
//! let entities = ner.extract_entities("Dr. Smith charges $100/hr").unwrap();
//! assert!(entities.iter().any(|e| e.text == "$100"));
//! ```

pub mod heuristic;
pub mod regex;
pub mod registry;
pub mod stacked;

pub use heuristic::HeuristicNER;
pub use regex::RegexNER;
pub use registry::{BuiltinRegistry, ModelFactory, ModelRegistry, StaticRegistry};
pub use stacked::{ConflictStrategy, StackedNER, StackedNERBuilder};

use crate::Entity;

/// Byte offset to char offset lookup for one text.
pub(crate) struct CharOffsets {
    // Byte index of every char, plus the text length as a sentinel.
    byte_starts: Vec<usize>,
}

impl CharOffsets {
    pub(crate) fn new(text: &str) -> Self {
        let mut byte_starts: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_starts.push(text.len());
        Self { byte_starts }
    }

    /// Char offset of a byte offset on a char boundary.
    pub(crate) fn char_at(&self, byte: usize) -> usize {
        match self.byte_starts.binary_search(&byte) {
            Ok(idx) | Err(idx) => idx,
        }
    }
}

/// Whether `[start, end)` overlaps any entity already in `entities`.
pub(crate) fn overlaps(entities: &[Entity], start: usize, end: usize) -> bool {
    entities.iter().any(|e| start < e.end && e.start < end)
}
