//! Heuristic NER - capitalization and context rules for PER/ORG/LOC.
//!
//! Cheap structural signals first (capitalization, punctuation), then a few
//! high-precision cues (org suffixes, honorifics, locative prepositions), and
//! only a small lexicon of very common names.

use super::CharOffsets;
use crate::{Entity, EntityType, Model, Result};

/// Heuristic NER model.
///
/// Finds runs of capitalized words and classifies each run with a short
/// list of rules. Runs whose confidence falls below the threshold are dropped.
///
/// ```rust
/// use ner_features::{HeuristicNER, Model};
///
/// let ner = HeuristicNER::new();
/// let entities = ner.extract_entities("I love Paris and Berlin").unwrap();
/// let texts: Vec<_> = entities.iter().map(|e| e.text.as_str()).collect();
/// assert_eq!(texts, ["Paris", "Berlin"]);
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicNER {
    threshold: f64,
}

impl Default for HeuristicNER {
    fn default() -> Self {
        Self { threshold: 0.35 }
    }
}

impl HeuristicNER {
    /// Create with the default confidence threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a custom confidence threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    /// The confidence threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

const ORG_SUFFIX: &[&str] = &[
    "inc", "corp", "ltd", "llc", "co", "plc", "gmbh", "ag", "sa", "nv", "bv", "limited",
    "corporation", "incorporated", "company", "holdings", "group", "foundation", "institute",
    "university", "college", "bank", "agency",
];

const PERSON_PREFIX: &[&str] = &["mr", "ms", "mrs", "dr", "prof", "sir", "madam"];

const LOC_PREPOSITION: &[&str] = &["in", "from", "at", "to", "near", "across", "around"];

const SKIP_WORDS: &[&str] = &["ceo", "cto", "cfo", "vp", "president", "chairman", "director"];

const COMMON_SENTENCE_STARTERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "it", "he", "she", "we", "they", "i",
    "you", "in", "on", "at", "to", "for", "from", "by", "with", "and", "but", "or", "so", "if",
    "because", "please", "see", "note", "today", "yesterday", "tomorrow", "now", "then", "what",
    "where", "when", "who", "why", "how", "is", "are", "was", "were", "have", "has", "had",
];

const KNOWN_ORGS: &[&str] = &[
    "google", "apple", "microsoft", "amazon", "meta", "tesla", "ibm", "intel", "nvidia",
    "oracle", "samsung", "sony", "toyota", "nasa", "fbi", "nato", "un", "eu", "bbc", "cnn",
    "reuters", "bloomberg", "netflix", "uber", "paypal",
];

const KNOWN_LOCS: &[&str] = &[
    "paris", "london", "tokyo", "berlin", "rome", "madrid", "moscow", "beijing", "dubai",
    "singapore", "sydney", "toronto", "chicago", "boston", "california", "texas", "new york",
    "washington", "europe", "asia", "africa", "america", "china", "india", "japan", "germany",
    "france", "italy", "spain", "brazil", "canada", "uk", "usa",
];

const KNOWN_PERSONS: &[&str] = &[
    "john", "jane", "mary", "james", "robert", "michael", "david", "thomas", "barack", "angela",
    "marie", "elon", "steve", "tim", "satya", "albert", "isaac", "peter", "paul",
];

fn starts_upper(word: &str) -> bool {
    word.trim_start_matches(|c: char| !c.is_alphanumeric())
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

fn bare_lower(word: &str) -> String {
    word.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Whitespace-separated words with their byte offsets.
fn words_with_offsets(text: &str) -> Vec<(&str, usize)> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(s)) => {
                words.push((&text[s..i], s));
                start = None;
            }
            (false, None) => start = Some(i),
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push((&text[s..], s));
    }
    words
}

impl Model for HeuristicNER {
    fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let words = words_with_offsets(text);
        let offsets = CharOffsets::new(text);
        let mut entities = Vec::new();

        let mut i = 0;
        while i < words.len() {
            let (word, _) = words[i];
            if !starts_upper(word) || COMMON_SENTENCE_STARTERS.contains(&bare_lower(word).as_str())
            {
                i += 1;
                continue;
            }

            // Extend over capitalized words; "of"/"the" connect ("Bank of America").
            // Sentence punctuation ends the run.
            let start_idx = i;
            while i < words.len() {
                let (w, _) = words[i];
                let next_upper = words.get(i + 1).is_some_and(|(n, _)| starts_upper(n));
                let is_connector = i > start_idx && matches!(bare_lower(w).as_str(), "of" | "the");
                if !(starts_upper(w) || (is_connector && next_upper)) {
                    break;
                }
                i += 1;
                if w.ends_with(['.', '!', '?', ',', ';', ':', ')']) {
                    let next_is_suffix = words
                        .get(i)
                        .is_some_and(|(n, _)| ORG_SUFFIX.contains(&bare_lower(n).as_str()));
                    if !next_is_suffix {
                        break;
                    }
                }
            }

            // Slice the source so the reported text keeps its own whitespace.
            let (last_word, last_start) = words[i - 1];
            let raw = &text[words[start_idx].1..last_start + last_word.len()];
            let lead = raw.len() - raw.trim_start_matches(|c: char| !c.is_alphanumeric()).len();
            let trimmed = raw[lead..].trim_end_matches(|c: char| !c.is_alphanumeric());
            if trimmed.is_empty() {
                continue;
            }
            let byte_start = words[start_idx].1 + lead;
            let byte_end = byte_start + trimmed.len();
            let entity_text = trimmed.to_string();

            let span_words: Vec<&str> = entity_text.split_whitespace().collect();
            let prev = start_idx.checked_sub(1).map(|p| bare_lower(words[p].0));
            let (entity_type, confidence) = classify(&span_words, prev.as_deref(), start_idx);

            if confidence >= self.threshold && !matches!(entity_type, EntityType::Other(_)) {
                let start = offsets.char_at(byte_start);
                let end = offsets.char_at(byte_end);
                entities.push(Entity::new(entity_text, entity_type, start, end, confidence));
            }
        }

        Ok(entities)
    }

    fn supported_types(&self) -> Vec<EntityType> {
        vec![
            EntityType::Person,
            EntityType::Organization,
            EntityType::Location,
        ]
    }

    fn name(&self) -> &str {
        "heuristic"
    }

    fn description(&self) -> &str {
        "Heuristic NER from capitalization and context (PER/ORG/LOC)"
    }
}

fn classify(span: &[&str], prev: Option<&str>, start_idx: usize) -> (EntityType, f64) {
    let first = span.first().map(|w| bare_lower(w)).unwrap_or_default();
    let last = span.last().map(|w| bare_lower(w)).unwrap_or_default();
    let span_lower = span.iter().map(|w| bare_lower(w)).collect::<Vec<_>>().join(" ");

    if span.len() == 1
        && (SKIP_WORDS.contains(&first.as_str()) || PERSON_PREFIX.contains(&first.as_str()))
    {
        return (EntityType::Other("skip".into()), 0.0);
    }
    if span.len() > 1 && ORG_SUFFIX.contains(&last.as_str()) {
        return (EntityType::Organization, 0.85);
    }
    if KNOWN_ORGS.contains(&span_lower.as_str()) || KNOWN_ORGS.contains(&first.as_str()) {
        return (EntityType::Organization, 0.80);
    }
    if KNOWN_LOCS.contains(&span_lower.as_str()) || KNOWN_LOCS.contains(&first.as_str()) {
        return (EntityType::Location, 0.80);
    }
    if KNOWN_PERSONS.contains(&first.as_str()) {
        return (EntityType::Person, 0.75);
    }
    if let Some(prev) = prev {
        if PERSON_PREFIX.contains(&prev) {
            return (EntityType::Person, 0.80);
        }
        if LOC_PREPOSITION.contains(&prev) {
            return (EntityType::Location, 0.70);
        }
    }
    match span.len() {
        2 => {
            let place_indicators = ["united", "new", "south", "north", "west", "east", "great"];
            if place_indicators.contains(&first.as_str()) {
                (EntityType::Location, 0.65)
            } else {
                (EntityType::Person, 0.60)
            }
        }
        n if n >= 3 => {
            if bare_lower(span[1]) == "of" {
                (EntityType::Organization, 0.65)
            } else {
                (EntityType::Organization, 0.50)
            }
        }
        // A lone capitalized first word is usually just a sentence start.
        _ if start_idx == 0 => (EntityType::Person, 0.30),
        _ => (EntityType::Person, 0.45),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<String> {
        HeuristicNER::new()
            .extract_entities(text)
            .unwrap()
            .into_iter()
            .map(|e| e.text)
            .collect()
    }

    fn find(text: &str, needle: &str) -> Option<Entity> {
        HeuristicNER::new()
            .extract_entities(text)
            .unwrap()
            .into_iter()
            .find(|e| e.text == needle)
    }

    #[test]
    fn empty_and_whitespace() {
        assert!(texts("").is_empty());
        assert!(texts("  \t\n ").is_empty());
    }

    #[test]
    fn known_locations() {
        assert_eq!(texts("Paris is nice"), ["Paris"]);
        assert_eq!(texts("I love Paris and Berlin"), ["Paris", "Berlin"]);
        assert_eq!(texts("Berlin"), ["Berlin"]);
    }

    #[test]
    fn org_suffix() {
        let e = find("She joined Acme Corp. last year", "Acme Corp").unwrap();
        assert_eq!(e.entity_type, EntityType::Organization);
    }

    #[test]
    fn person_after_honorific() {
        let e = find("We met Dr. Watson yesterday", "Watson").unwrap();
        assert_eq!(e.entity_type, EntityType::Person);
    }

    #[test]
    fn location_after_preposition() {
        let e = find("The office moved to Springfield", "Springfield").unwrap();
        assert_eq!(e.entity_type, EntityType::Location);
    }

    #[test]
    fn connector_joins_org_names() {
        let e = find("He works for Bank of America now", "Bank of America").unwrap();
        assert_eq!(e.entity_type, EntityType::Organization);
    }

    #[test]
    fn sentence_starters_are_skipped() {
        assert!(texts("The weather is fine").is_empty());
    }

    #[test]
    fn offsets_cover_entity_text() {
        let text = "I love Paris and Berlin";
        for e in HeuristicNER::new().extract_entities(text).unwrap() {
            let slice: String = text.chars().skip(e.start).take(e.end - e.start).collect();
            assert_eq!(slice, e.text);
        }
    }

    #[test]
    fn irregular_whitespace_keeps_source_text() {
        let text = "He works for Bank  of America now";
        let e = find(text, "Bank  of America").unwrap();
        assert!(text.contains(&e.text));
        assert_eq!((e.start, e.end), (13, 29));

        let text = "Visit New\nYork soon";
        let entities = HeuristicNER::new().extract_entities(text).unwrap();
        assert!(!entities.is_empty());
        for e in &entities {
            assert!(text.contains(&e.text), "{:?} not in source", e.text);
            let slice: String = text.chars().skip(e.start).take(e.end - e.start).collect();
            assert_eq!(slice, e.text);
        }
    }

    #[test]
    fn offsets_are_char_based_for_multibyte_text() {
        let text = "Café owners in Zürich";
        let e = find(text, "Zürich").unwrap();
        assert_eq!((e.start, e.end), (15, 21));
    }

    #[test]
    fn trailing_punctuation_is_trimmed() {
        assert_eq!(texts("We flew to Tokyo."), ["Tokyo"]);
    }

    #[test]
    fn high_threshold_drops_weak_guesses() {
        let ner = HeuristicNER::with_threshold(0.9);
        assert!(ner.extract_entities("I met Quentin today").unwrap().is_empty());
    }
}
