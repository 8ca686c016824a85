//! Natural-language utterance parser.
//!
//! Classifies intent and extracts district, month, season, and year slots
//! from raw user input against the fixed model vocabularies.

use std::sync::LazyLock;

use regex::Regex;

use krishi_core::types::season_for_month;

use crate::types::{ExtractedSlots, Intent};

// =============================================================================
// Compiled regex sets (compiled once, reused across calls)
// =============================================================================

struct IntentPatterns {
    groundwater: Vec<Regex>,
    crop: Vec<Regex>,
    greeting: Vec<Regex>,
}

static INTENT_PATTERNS: LazyLock<IntentPatterns> = LazyLock::new(|| {
    let mk = |pats: &[&str]| -> Vec<Regex> {
        pats.iter()
            .map(|p| Regex::new(p).expect("Invalid intent regex"))
            .collect()
    };

    IntentPatterns {
        // Groundwater patterns (checked first so "recommend crops for this
        // water level" still resolves to a level query)
        groundwater: mk(&[r"(?i)\bground\s*water\b", r"(?i)\bwater\s+levels?\b"]),
        // Crop patterns
        crop: mk(&[r"(?i)\bcrops?\b", r"(?i)\brecommend", r"(?i)\bgrow"]),
        // Greeting patterns
        greeting: mk(&[r"(?i)\bhello\b", r"(?i)\bhi\b", r"(?i)\bnamaste\b"]),
    }
});

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

// =============================================================================
// UtteranceParser
// =============================================================================

/// Rule-based intent classifier and slot extractor.
pub struct UtteranceParser {
    /// Minimum similarity score (0-100) for a vocabulary label to count as
    /// present in the utterance.
    pub match_threshold: u8,
}

impl UtteranceParser {
    /// Create a new parser with the given vocabulary match threshold.
    pub fn new(match_threshold: u8) -> Self {
        Self { match_threshold }
    }

    // -----------------------------------------------------------------
    // Intent classification
    // -----------------------------------------------------------------

    /// Classify the intent of a raw utterance.
    ///
    /// Checks pattern groups in priority order: groundwater, crop, greeting.
    /// The first group with a match wins; falls back to `Unknown`.
    pub fn classify_intent(&self, utterance: &str) -> Intent {
        let pats = &*INTENT_PATTERNS;

        for re in &pats.groundwater {
            if re.is_match(utterance) {
                return Intent::PredictGroundwater;
            }
        }

        for re in &pats.crop {
            if re.is_match(utterance) {
                return Intent::RecommendCrop;
            }
        }

        for re in &pats.greeting {
            if re.is_match(utterance) {
                return Intent::Greeting;
            }
        }

        Intent::Unknown
    }

    // -----------------------------------------------------------------
    // Slot extraction
    // -----------------------------------------------------------------

    /// Extract district, month, season, and year slots from an utterance.
    ///
    /// District and month are matched approximately against their
    /// vocabularies; the season is derived from the month; the year is the
    /// first `20xx` token. Extraction never fails: anything not found is
    /// `None`.
    pub fn extract_slots(
        &self,
        utterance: &str,
        districts: &[String],
        months: &[String],
    ) -> ExtractedSlots {
        let lower = utterance.to_lowercase();
        let district = self.best_label_match(&lower, districts);
        let month = self.best_label_match(&lower, months);
        let season = month.as_deref().and_then(season_for_month);
        let year = extract_year(utterance);

        ExtractedSlots {
            district,
            month,
            season,
            year,
        }
    }

    /// Best approximate vocabulary match within the utterance, if any label
    /// scores at or above the threshold. Ties keep the earlier label, so the
    /// result is deterministic.
    fn best_label_match(&self, lower_utterance: &str, labels: &[String]) -> Option<String> {
        let threshold = self.match_threshold.max(1);
        let mut best: Option<(&String, u8)> = None;
        for label in labels {
            let score = similarity(lower_utterance, label);
            if score >= threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((label, score));
            }
        }
        best.map(|(label, _)| label.clone())
    }
}

/// First four-digit year of this century in the text, if any.
pub fn extract_year(utterance: &str) -> Option<i32> {
    YEAR_RE
        .captures(utterance)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

// =============================================================================
// Similarity scoring
// =============================================================================

/// Score how strongly `label` appears in `text`, 0-100.
///
/// Containment counts as an exact hit; otherwise the best per-token
/// Levenshtein ratio wins, so close misspellings ("tirupathi") still match.
/// Both inputs are expected lowercase.
fn similarity(text: &str, label: &str) -> u8 {
    if label.is_empty() {
        return 0;
    }
    if text.contains(label) {
        return 100;
    }
    let mut best = 0u8;
    for raw in text.split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty() {
            continue;
        }
        best = best.max(ratio(token, label));
        if best == 100 {
            break;
        }
    }
    best
}

/// Levenshtein similarity ratio, 0-100.
fn ratio(a: &str, b: &str) -> u8 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 100;
    }
    let dist = levenshtein(a, b);
    ((max_len - dist) * 100 / max_len) as u8
}

/// Classic two-row Levenshtein edit distance over characters.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::types::{Season, MONTHS};

    fn parser() -> UtteranceParser {
        UtteranceParser::new(50)
    }

    fn districts() -> Vec<String> {
        ["anantapur", "chittoor", "tirupati", "kadapa", "nellore"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn months() -> Vec<String> {
        MONTHS.iter().map(|s| s.to_string()).collect()
    }

    // ---- Intent classification: groundwater ----

    #[test]
    fn test_intent_groundwater() {
        assert_eq!(
            parser().classify_intent("what is the groundwater level in tirupati"),
            Intent::PredictGroundwater
        );
    }

    #[test]
    fn test_intent_water_level() {
        assert_eq!(
            parser().classify_intent("tell me the water level in kadapa"),
            Intent::PredictGroundwater
        );
    }

    #[test]
    fn test_intent_ground_water_two_words() {
        assert_eq!(
            parser().classify_intent("how deep is the ground water here"),
            Intent::PredictGroundwater
        );
    }

    #[test]
    fn test_intent_groundwater_beats_crop_keywords() {
        // Priority order: groundwater terms win even when crop terms appear.
        assert_eq!(
            parser().classify_intent("recommend crops for this groundwater level"),
            Intent::PredictGroundwater
        );
        assert_eq!(
            parser().classify_intent("which crop can grow at this water level"),
            Intent::PredictGroundwater
        );
    }

    // ---- Intent classification: crop ----

    #[test]
    fn test_intent_crop() {
        assert_eq!(
            parser().classify_intent("which crop suits my field"),
            Intent::RecommendCrop
        );
    }

    #[test]
    fn test_intent_crops_plural() {
        assert_eq!(
            parser().classify_intent("suggest crops for kadapa"),
            Intent::RecommendCrop
        );
    }

    #[test]
    fn test_intent_recommend() {
        assert_eq!(
            parser().classify_intent("any recommendation for july"),
            Intent::RecommendCrop
        );
    }

    #[test]
    fn test_intent_grow() {
        assert_eq!(
            parser().classify_intent("what should I grow in may"),
            Intent::RecommendCrop
        );
    }

    #[test]
    fn test_intent_growing() {
        assert_eq!(
            parser().classify_intent("growing season advice please"),
            Intent::RecommendCrop
        );
    }

    #[test]
    fn test_intent_crop_beats_greeting() {
        assert_eq!(
            parser().classify_intent("hi, what crop should I plant"),
            Intent::RecommendCrop
        );
    }

    // ---- Intent classification: greeting ----

    #[test]
    fn test_intent_hello() {
        assert_eq!(parser().classify_intent("hello there"), Intent::Greeting);
    }

    #[test]
    fn test_intent_hi() {
        assert_eq!(parser().classify_intent("hi"), Intent::Greeting);
    }

    #[test]
    fn test_intent_namaste() {
        assert_eq!(parser().classify_intent("namaste bot"), Intent::Greeting);
    }

    #[test]
    fn test_intent_hi_needs_word_boundary() {
        // "hi" inside another word is not a greeting.
        assert_eq!(parser().classify_intent("something about delhi"), Intent::Unknown);
        assert_eq!(parser().classify_intent("which way is it"), Intent::Unknown);
    }

    // ---- Intent classification: unknown ----

    #[test]
    fn test_intent_unknown() {
        assert_eq!(
            parser().classify_intent("tell me a joke"),
            Intent::Unknown
        );
    }

    #[test]
    fn test_intent_empty_string() {
        assert_eq!(parser().classify_intent(""), Intent::Unknown);
    }

    #[test]
    fn test_intent_case_insensitive() {
        assert_eq!(
            parser().classify_intent("GROUNDWATER LEVEL PLEASE"),
            Intent::PredictGroundwater
        );
        assert_eq!(parser().classify_intent("RECOMMEND A CROP"), Intent::RecommendCrop);
        assert_eq!(parser().classify_intent("NAMASTE"), Intent::Greeting);
    }

    #[test]
    fn test_intent_is_deterministic() {
        let text = "recommend crops for the groundwater in tirupati";
        let first = parser().classify_intent(text);
        for _ in 0..5 {
            assert_eq!(parser().classify_intent(text), first);
        }
    }

    // ---- District extraction ----

    #[test]
    fn test_extract_district_exact() {
        let slots = parser().extract_slots(
            "groundwater level in tirupati please",
            &districts(),
            &months(),
        );
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    #[test]
    fn test_extract_district_case_insensitive() {
        let slots = parser().extract_slots("what about Tirupati", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    #[test]
    fn test_extract_district_close_misspelling() {
        let slots = parser().extract_slots("water level in tirupathi", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    #[test]
    fn test_extract_district_below_threshold() {
        let slots = parser().extract_slots("water level in mumbai", &districts(), &months());
        assert_eq!(slots.district, None);
    }

    #[test]
    fn test_extract_district_best_match_wins() {
        // "chittoor" must beat "nellore" for a chittoor-shaped token.
        let slots = parser().extract_slots("rain in chittor this year", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("chittoor"));
    }

    #[test]
    fn test_extract_district_empty_vocabulary() {
        let slots = parser().extract_slots("water level in tirupati", &[], &months());
        assert_eq!(slots.district, None);
    }

    #[test]
    fn test_extract_district_punctuation_trimmed() {
        let slots = parser().extract_slots("how is kadapa?", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("kadapa"));
    }

    // ---- Month and season extraction ----

    #[test]
    fn test_extract_month_and_season() {
        let slots = parser().extract_slots("level in july", &districts(), &months());
        assert_eq!(slots.month.as_deref(), Some("july"));
        assert_eq!(slots.season, Some(Season::Monsoon));
    }

    #[test]
    fn test_extract_month_winter_season() {
        let slots = parser().extract_slots("what about december", &districts(), &months());
        assert_eq!(slots.month.as_deref(), Some("december"));
        assert_eq!(slots.season, Some(Season::Winter));
    }

    #[test]
    fn test_extract_month_summer_season() {
        let slots = parser().extract_slots("crops for april", &districts(), &months());
        assert_eq!(slots.month.as_deref(), Some("april"));
        assert_eq!(slots.season, Some(Season::Summer));
    }

    #[test]
    fn test_extract_no_month_no_season() {
        let slots = parser().extract_slots("water level in tirupati", &districts(), &months());
        assert_eq!(slots.month, None);
        assert_eq!(slots.season, None);
    }

    #[test]
    fn test_season_never_set_without_month() {
        // Season words in the utterance do not set the season slot directly.
        let slots = parser().extract_slots("monsoon outlook for kadapa", &districts(), &months());
        assert_eq!(slots.month, None);
        assert_eq!(slots.season, None);
    }

    #[test]
    fn test_extract_month_misspelled() {
        let slots = parser().extract_slots("level in setpember", &districts(), &months());
        assert_eq!(slots.month.as_deref(), Some("september"));
        assert_eq!(slots.season, Some(Season::Monsoon));
    }

    // ---- Year extraction ----

    #[test]
    fn test_extract_year() {
        let slots = parser().extract_slots("level in july 2025", &districts(), &months());
        assert_eq!(slots.year, Some(2025));
    }

    #[test]
    fn test_extract_year_first_match_wins() {
        assert_eq!(extract_year("compare 2024 against 2026"), Some(2024));
    }

    #[test]
    fn test_extract_year_none() {
        assert_eq!(extract_year("level in july"), None);
    }

    #[test]
    fn test_extract_year_ignores_other_numbers() {
        assert_eq!(extract_year("my field is 1500 square meters"), None);
        assert_eq!(extract_year("call me at 90210"), None);
    }

    #[test]
    fn test_extract_year_requires_20xx() {
        assert_eq!(extract_year("back in 1998 it rained"), None);
        assert_eq!(extract_year("in 2130 maybe"), None);
    }

    // ---- Full extraction ----

    #[test]
    fn test_extract_full_question() {
        let slots = parser().extract_slots(
            "What is groundwater level in Tirupati in July 2025?",
            &districts(),
            &months(),
        );
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
        assert_eq!(slots.month.as_deref(), Some("july"));
        assert_eq!(slots.season, Some(Season::Monsoon));
        assert_eq!(slots.year, Some(2025));
    }

    #[test]
    fn test_extract_nothing() {
        let slots = parser().extract_slots("completely unrelated text", &districts(), &months());
        assert_eq!(slots, ExtractedSlots::default());
    }

    #[test]
    fn test_extract_empty_utterance() {
        let slots = parser().extract_slots("", &districts(), &months());
        assert_eq!(slots, ExtractedSlots::default());
    }

    #[test]
    fn test_extract_unicode_does_not_panic() {
        let slots = parser().extract_slots("niveau d'eau \u{00e0} tirupati", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    #[test]
    fn test_extract_very_long_utterance() {
        let long = format!("groundwater {} in tirupati", "blah ".repeat(300));
        let slots = parser().extract_slots(&long, &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    // ---- Threshold behavior ----

    #[test]
    fn test_high_threshold_rejects_fuzzy_match() {
        let strict = UtteranceParser::new(95);
        let slots = strict.extract_slots("level in tirupathi", &districts(), &months());
        // One edit off scores below 95.
        assert_eq!(slots.district, None);
    }

    #[test]
    fn test_high_threshold_still_accepts_exact() {
        let strict = UtteranceParser::new(95);
        let slots = strict.extract_slots("level in tirupati", &districts(), &months());
        assert_eq!(slots.district.as_deref(), Some("tirupati"));
    }

    // ---- Similarity scoring ----

    #[test]
    fn test_similarity_containment_is_exact() {
        assert_eq!(similarity("rain in tirupati today", "tirupati"), 100);
    }

    #[test]
    fn test_similarity_close_token() {
        let score = similarity("rain in tirupathi today", "tirupati");
        assert!(score >= 80 && score < 100, "score: {}", score);
    }

    #[test]
    fn test_similarity_unrelated_token_low() {
        assert!(similarity("completely different", "tirupati") < 50);
    }

    #[test]
    fn test_similarity_empty_label() {
        assert_eq!(similarity("anything", ""), 0);
    }

    #[test]
    fn test_similarity_empty_text() {
        assert_eq!(similarity("", "tirupati"), 0);
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("tirupathi", "tirupati"), 1);
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(ratio("same", "same"), 100);
        assert_eq!(ratio("abcd", "wxyz"), 0);
        assert_eq!(ratio("", ""), 100);
    }
}
