//! Regex-based NER - extracts entities that have a recognizable format.
//!
//! - Dates: ISO 8601, MM/DD/YYYY, DD.MM.YYYY, "January 15, 2024", "Jan 15"
//! - Times: "3:30 PM", "14:00", "10am"
//! - Money: $100, $1.5M, "50 dollars", €500
//! - Percentages: 15%, 3.5%, "15 percent"
//! - Emails, URLs, phone numbers
//!
//! Person/Organization/Location need context; see [`HeuristicNER`](super::HeuristicNER).

use once_cell::sync::Lazy;
use regex::Regex;

use super::{overlaps, CharOffsets};
use crate::{Entity, EntityType, Model, Result};

/// Regex-based NER for structured entities.
///
/// # Example
///
/// ```rust
/// use ner_features::{Model, RegexNER};
///
/// let ner = RegexNER::new();
/// let entities = ner
///     .extract_entities("Meeting at 3:30 PM on Jan 15. Contact: bob@acme.com")
///     .unwrap();
/// assert!(entities.len() >= 3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexNER;

impl RegexNER {
    /// Create a new regex-based NER.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

static DATE_ISO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").expect("valid regex"));

static DATE_US: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").expect("valid regex"));

static DATE_EU: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,2}\.\d{1,2}\.\d{2,4}\b").expect("valid regex"));

static DATE_WRITTEN_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s*\d{4})?\b").expect("valid regex")
});

static DATE_WRITTEN_SHORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?\s+\d{1,2}(?:st|nd|rd|th)?(?:,?\s*\d{4})?\b").expect("valid regex")
});

static DATE_WRITTEN_EU: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}(?:st|nd|rd|th)?\s+(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Sept|Oct|Nov|Dec)\.?(?:\s+\d{4})?\b").expect("valid regex")
});

static TIME_12H: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}(?::\d{2})?\s*(?:am|pm|a\.m\.|p\.m\.)").expect("valid regex")
});

static TIME_24H: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:[01]?\d|2[0-3]):[0-5]\d(?::[0-5]\d)?\b").expect("valid regex"));

static TIME_SIMPLE: Lazy<Regex> = Lazy::new(|| {
    // No trailing \b: a.m./p.m. end with '.'
    Regex::new(r"(?i)\b\d{1,2}\s*(?:am\b|pm\b|a\.m\.|p\.m\.)").expect("valid regex")
});

static MONEY_SYMBOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[$€£¥][\d,]+(?:\.\d{1,2})?(?:\s*(?:billion|million|thousand|B|M|K|bn|mn)\b)?")
        .expect("valid regex")
});

static MONEY_WRITTEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:,\d{3})*(?:\.\d{1,2})?\s*(?:dollars?|USD|euros?|EUR|pounds?|GBP|yen|JPY)\b",
    )
    .expect("valid regex")
});

static MONEY_MAGNITUDE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b\d+(?:\.\d+)?\s*(?:billion|million|trillion)(?:\s*(?:dollars?|euros?|pounds?))?\b",
    )
    .expect("valid regex")
});

static PERCENT: Lazy<Regex> = Lazy::new(|| {
    // No trailing \b: '%' is not a word character
    Regex::new(r"\b\d+(?:\.\d+)?\s*(?:%|percent\b|pct\b)").expect("valid regex")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}\b").expect("valid regex")
});

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bhttps?://[^\s<>\[\]{}|\\^`\x00-\x1f]+").expect("valid regex"));

static PHONE_US: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]\d{4}\b").expect("valid regex")
});

static PHONE_INTL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\+\d{1,3}[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{1,9}\b").expect("valid regex")
});

// Order is priority: earlier patterns claim spans first.
static PATTERNS: Lazy<Vec<(&'static Lazy<Regex>, EntityType, f64)>> = Lazy::new(|| {
    vec![
        (&EMAIL, EntityType::Email, 0.98),
        (&URL, EntityType::Url, 0.98),
        (&DATE_ISO, EntityType::Date, 0.95),
        (&DATE_US, EntityType::Date, 0.95),
        (&DATE_EU, EntityType::Date, 0.95),
        (&DATE_WRITTEN_FULL, EntityType::Date, 0.95),
        (&DATE_WRITTEN_SHORT, EntityType::Date, 0.95),
        (&DATE_WRITTEN_EU, EntityType::Date, 0.95),
        (&MONEY_SYMBOL, EntityType::Money, 0.95),
        (&MONEY_WRITTEN, EntityType::Money, 0.95),
        (&MONEY_MAGNITUDE, EntityType::Money, 0.92),
        (&PERCENT, EntityType::Percent, 0.95),
        (&TIME_12H, EntityType::Time, 0.90),
        (&TIME_24H, EntityType::Time, 0.88),
        (&TIME_SIMPLE, EntityType::Time, 0.85),
        (&PHONE_US, EntityType::Phone, 0.85),
        (&PHONE_INTL, EntityType::Phone, 0.85),
    ]
});

impl Model for RegexNER {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let mut entities: Vec<Entity> = Vec::new();
        if text.is_empty() {
            return Ok(entities);
        }

        // Regex offsets are bytes; entities carry char offsets.
        let offsets = CharOffsets::new(text);

        for (pattern, entity_type, confidence) in PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let start = offsets.char_at(m.start());
                let end = offsets.char_at(m.end());
                if !overlaps(&entities, start, end) {
                    entities.push(Entity::new(
                        m.as_str(),
                        entity_type.clone(),
                        start,
                        end,
                        *confidence,
                    ));
                }
            }
        }

        entities.sort_unstable_by_key(|e| e.start);
        Ok(entities)
    }

    fn supported_types(&self) -> Vec<EntityType> {
        vec![
            EntityType::Date,
            EntityType::Time,
            EntityType::Money,
            EntityType::Percent,
            EntityType::Email,
            EntityType::Url,
            EntityType::Phone,
        ]
    }

    fn name(&self) -> &str {
        "regex"
    }

    fn description(&self) -> &str {
        "Regex-based NER (dates, times, money, percentages, emails, URLs, phones)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<Entity> {
        RegexNER::new().extract_entities(text).unwrap()
    }

    fn has_type(entities: &[Entity], ty: &EntityType) -> bool {
        entities.iter().any(|e| &e.entity_type == ty)
    }

    fn count_type(entities: &[Entity], ty: &EntityType) -> usize {
        entities.iter().filter(|e| &e.entity_type == ty).count()
    }

    fn find_text<'a>(entities: &'a [Entity], text: &str) -> Option<&'a Entity> {
        entities.iter().find(|e| e.text == text)
    }

    #[test]
    fn empty_text() {
        assert!(extract("").is_empty());
    }

    #[test]
    fn date_iso_format() {
        let e = extract("Meeting on 2024-01-15.");
        assert!(find_text(&e, "2024-01-15").is_some());
    }

    #[test]
    fn date_us_format() {
        let e = extract("Due by 12/31/2024 and 1/5/24.");
        assert_eq!(count_type(&e, &EntityType::Date), 2);
    }

    #[test]
    fn date_written() {
        for case in ["January 15, 2024", "March 1st, 2024", "Jan 15, 2024", "15 January 2024"] {
            let e = extract(case);
            assert!(has_type(&e, &EntityType::Date), "Failed: {}", case);
        }
    }

    #[test]
    fn time_formats() {
        for case in ["3:30 PM", "14:30", "10am", "9 a.m."] {
            let e = extract(case);
            assert!(has_type(&e, &EntityType::Time), "Failed: {}", case);
        }
    }

    #[test]
    fn money_formats() {
        for case in ["$100", "$1,234.56", "€500", "$5 million", "50 dollars", "1.5 million euros"] {
            let e = extract(case);
            assert!(has_type(&e, &EntityType::Money), "Failed: {}", case);
        }
    }

    #[test]
    fn percent_formats() {
        for case in ["15%", "3.5%", "15 percent"] {
            let e = extract(case);
            assert!(has_type(&e, &EntityType::Percent), "Failed: {}", case);
        }
    }

    #[test]
    fn email_and_url() {
        let e = extract("Write to bob@acme.com or visit https://acme.com/about");
        assert!(find_text(&e, "bob@acme.com").is_some());
        assert!(find_text(&e, "https://acme.com/about").is_some());
    }

    #[test]
    fn unicode_offsets_are_chars() {
        // '€' is 3 bytes, 1 char.
        let e = extract("Price: €50 then €100");
        let money: Vec<_> = e
            .iter()
            .filter(|e| e.entity_type == EntityType::Money)
            .collect();
        assert_eq!(money.len(), 2);
        assert_eq!((money[0].start, money[0].end), (7, 10));
        assert_eq!((money[1].start, money[1].end), (16, 20));
    }

    #[test]
    fn repeated_mentions_are_all_reported() {
        let e = extract("$5 now, $5 later");
        assert_eq!(e.iter().filter(|e| e.text == "$5").count(), 2);
    }

    #[test]
    fn no_named_entities() {
        let e = extract("John Smith works at Google in New York.");
        assert!(e.is_empty());
    }
}
