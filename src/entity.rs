//! Entity mentions produced by NER models.

use serde::{Deserialize, Serialize};

/// Entity type classification.
///
/// Standard NER types following CoNLL/OntoNotes conventions, plus the
/// structured types the regex backend recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    /// Person name (PER)
    Person,
    /// Organization name (ORG)
    Organization,
    /// Location/Place (LOC)
    Location,
    /// Date expression (DATE)
    Date,
    /// Time expression (TIME)
    Time,
    /// Monetary value (MONEY)
    Money,
    /// Percentage (PERCENT)
    Percent,
    /// Email address (EMAIL)
    Email,
    /// URL (URL)
    Url,
    /// Phone number (PHONE)
    Phone,
    /// Other/Miscellaneous entity type
    Other(String),
}

impl EntityType {
    /// Convert to standard label string (CoNLL format).
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            EntityType::Person => "PER",
            EntityType::Organization => "ORG",
            EntityType::Location => "LOC",
            EntityType::Date => "DATE",
            EntityType::Time => "TIME",
            EntityType::Money => "MONEY",
            EntityType::Percent => "PERCENT",
            EntityType::Email => "EMAIL",
            EntityType::Url => "URL",
            EntityType::Phone => "PHONE",
            EntityType::Other(s) => s.as_str(),
        }
    }

    /// Parse from a label string. Accepts BIO prefixes and common aliases.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let upper = label.trim().to_uppercase();
        let bare = upper
            .strip_prefix("B-")
            .or_else(|| upper.strip_prefix("I-"))
            .unwrap_or(&upper);
        match bare {
            "PER" | "PERSON" => EntityType::Person,
            "ORG" | "ORGANIZATION" | "ORGANISATION" => EntityType::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityType::Location,
            "DATE" => EntityType::Date,
            "TIME" => EntityType::Time,
            "MONEY" | "CURRENCY" => EntityType::Money,
            "PERCENT" | "PERCENTAGE" => EntityType::Percent,
            "EMAIL" => EntityType::Email,
            "URL" | "URI" => EntityType::Url,
            "PHONE" | "TELEPHONE" => EntityType::Phone,
            other => EntityType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// A recognized entity mention.
///
/// Only `text` takes part in feature generation; offsets, type and
/// confidence are carried for filtering and debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Surface form exactly as it appears in the source text
    pub text: String,
    /// Entity type classification
    pub entity_type: EntityType,
    /// Start position (character offset)
    pub start: usize,
    /// End position (character offset, exclusive)
    pub end: usize,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

impl Entity {
    /// Create a new entity.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        entity_type: EntityType,
        start: usize,
        end: usize,
        confidence: f64,
    ) -> Self {
        Self {
            text: text.into(),
            entity_type,
            start,
            end,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Create an entity with default confidence (1.0).
    #[must_use]
    pub fn with_type(
        text: impl Into<String>,
        entity_type: EntityType,
        start: usize,
        end: usize,
    ) -> Self {
        Self::new(text, entity_type, start, end, 1.0)
    }

    /// Check if this entity overlaps with another.
    #[must_use]
    pub fn overlaps(&self, other: &Entity) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }

    /// Span length in characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn entity_type_label_is_stable(label in "[A-Z]{3,10}") {
            let et = EntityType::from_label(&label);
            let back = EntityType::from_label(et.as_label());
            prop_assert_eq!(back, et);
        }

        #[test]
        fn overlap_is_symmetric(
            s1 in 0usize..100,
            len1 in 1usize..50,
            s2 in 0usize..100,
            len2 in 1usize..50,
        ) {
            let e1 = Entity::new("a", EntityType::Person, s1, s1 + len1, 1.0);
            let e2 = Entity::new("b", EntityType::Person, s2, s2 + len2, 1.0);
            prop_assert_eq!(e1.overlaps(&e2), e2.overlaps(&e1));
        }
    }
}
