/*!
 * Entity extraction producing per-text entity bags.
 *
 * One bag holds every critical entity found in one text string: numbers,
 * numeric ranges, measurement unit tokens, a negation-cue count, symbols,
 * and italic-marked binomials. The fidelity checker compares the source
 * and target bags of a unit; nothing here looks at the other language's
 * text, so extraction stays a pure per-string function.
 */

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::CheckConfig;
use crate::extraction::markup::{italic_regions, strip_markup};

/// Regex for numeric tokens (integers and decimals)
static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("Invalid number regex"));

/// Regex for numeric ranges joined by a range connector
static RANGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:[–\-~－]|to|至|到)\s*(\d+(?:\.\d+)?)")
        .expect("Invalid range regex")
});

/// Regex for title-case month names, with optional trailing period.
/// Title case keeps the modal verb "may" from reading as a month.
static MONTH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|Jun(?:e)?|Jul(?:y)?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\b\.?",
    )
    .expect("Invalid month regex")
});

/// Regex for a Latin binomial inside an italic span
static BINOMIAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z\-]+)\s+([a-z\-]{2,})\b").expect("Invalid binomial regex")
});

/// Which side of the unit a text string belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLanguage {
    /// English source text
    English,
    /// Chinese target text
    Chinese,
}

/// Critical entities extracted from one text string.
///
/// Ephemeral: recomputed per run, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityBag {
    /// Markup-stripped text the bag was computed from
    pub plain_text: String,

    /// Numeric tokens in occurrence order (a multiset), canonicalized
    pub numbers: Vec<String>,

    /// Numeric (low, high) pairs, canonicalized
    pub ranges: Vec<(String, String)>,

    /// Recognized measurement tokens present in the text
    pub units: BTreeSet<String>,

    /// Count of negation cues (surface forms differ per language)
    pub negation_cues: usize,

    /// Critical symbols present in the text
    pub symbols: BTreeSet<char>,

    /// Italic-marked binomials, verbatim with markup stripped
    pub binomials: Vec<String>,
}

/// Replace title-case month names with their month numbers
pub fn normalize_months(text: &str) -> String {
    MONTH_REGEX
        .replace_all(text, |caps: &regex::Captures| month_number(&caps[1]))
        .into_owned()
}

fn month_number(name: &str) -> String {
    let key: String = name.chars().take(3).collect::<String>().to_lowercase();
    let number = match key.as_str() {
        "jan" => "1",
        "feb" => "2",
        "mar" => "3",
        "apr" => "4",
        "may" => "5",
        "jun" => "6",
        "jul" => "7",
        "aug" => "8",
        "sep" => "9",
        "oct" => "10",
        "nov" => "11",
        "dec" => "12",
        _ => return name.to_string(),
    };
    number.to_string()
}

/// Map full-width digits and decimal points to their ASCII forms
pub fn normalize_fullwidth_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '．' => '.',
            _ => c,
        })
        .collect()
}

/// Canonical form of a numeric token: no leading integer zeros, no
/// trailing fractional zeros, so "03.50" and "3.5" compare equal.
pub fn canonical_number(raw: &str) -> String {
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw, None),
    };

    let int_trimmed = int_part.trim_start_matches('0');
    let int_canon = if int_trimmed.is_empty() { "0" } else { int_trimmed };

    match frac_part.map(|f| f.trim_end_matches('0')) {
        Some(frac) if !frac.is_empty() => format!("{}.{}", int_canon, frac),
        _ => int_canon.to_string(),
    }
}

/// Extractor configured with the run's unit tokens, cue lists and symbols
pub struct EntityExtractor {
    /// Regex over latin-script unit tokens, word-boundary matched
    latin_unit_regex: Option<Regex>,

    /// CJK unit tokens, substring matched (target side only)
    cjk_unit_tokens: Vec<String>,

    /// Source-language negation triggers, word-boundary matched
    source_negation_regex: Option<Regex>,

    /// Target-language negation cues, substring matched
    target_negation_cues: Vec<String>,

    /// Symbols whose presence is tracked
    symbols: Vec<char>,
}

impl EntityExtractor {
    /// Build an extractor from the check configuration
    pub fn from_config(config: &CheckConfig) -> Self {
        // Latin-like tokens (keys and latin renderings) are matched with
        // word boundaries; CJK renderings are matched as substrings.
        let mut latin_tokens: BTreeSet<String> = BTreeSet::new();
        let mut cjk_tokens: BTreeSet<String> = BTreeSet::new();

        for (key, renderings) in &config.unit_map {
            for token in std::iter::once(key).chain(renderings.iter()) {
                if is_latin_token(token) {
                    latin_tokens.insert(token.to_lowercase());
                } else {
                    cjk_tokens.insert(token.clone());
                }
            }
        }

        EntityExtractor {
            latin_unit_regex: boundary_alternation(latin_tokens.iter()),
            cjk_unit_tokens: cjk_tokens.into_iter().collect(),
            source_negation_regex: boundary_alternation(config.negation_cues_source.iter()),
            target_negation_cues: config.negation_cues_target.clone(),
            symbols: config.symbols.clone(),
        }
    }

    /// Extract the entity bag for one text string.
    ///
    /// `markup` should be set when the text may embed HTML-style tags
    /// (description records); key lines are plain text.
    pub fn extract(&self, text: &str, language: TextLanguage, markup: bool) -> EntityBag {
        let (plain, italics) = if markup {
            (strip_markup(text), italic_regions(text))
        } else {
            (text.to_string(), Vec::new())
        };

        // Months are folded to numerals on the source side so that a
        // "May-Jun" flowering period lines up with its "5-6月" rendering.
        let numeric_view = match language {
            TextLanguage::English => normalize_months(&plain),
            TextLanguage::Chinese => normalize_fullwidth_digits(&plain),
        };

        let numbers = extract_numbers(&numeric_view);
        let ranges = extract_ranges(&numeric_view);
        let units = self.extract_units(&plain, language);
        let negation_cues = self.count_negation_cues(&plain, language);
        let symbols = self
            .symbols
            .iter()
            .copied()
            .filter(|s| plain.contains(*s))
            .collect();
        let binomials = extract_binomials(&italics);

        EntityBag {
            plain_text: plain,
            numbers,
            ranges,
            units,
            negation_cues,
            symbols,
            binomials,
        }
    }

    fn extract_units(&self, plain: &str, language: TextLanguage) -> BTreeSet<String> {
        let mut units = BTreeSet::new();

        if let Some(regex) = &self.latin_unit_regex {
            for m in regex.find_iter(plain) {
                units.insert(m.as_str().to_lowercase());
            }
        }

        if language == TextLanguage::Chinese {
            for token in &self.cjk_unit_tokens {
                if plain.contains(token.as_str()) {
                    units.insert(token.clone());
                }
            }
        }

        units
    }

    fn count_negation_cues(&self, plain: &str, language: TextLanguage) -> usize {
        match language {
            TextLanguage::English => self
                .source_negation_regex
                .as_ref()
                .map(|r| r.find_iter(plain).count())
                .unwrap_or(0),
            TextLanguage::Chinese => self
                .target_negation_cues
                .iter()
                .map(|cue| plain.matches(cue.as_str()).count())
                .sum(),
        }
    }
}

/// Whether a unit token can be matched with word boundaries
fn is_latin_token(token: &str) -> bool {
    !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == 'µ')
}

/// Case-insensitive word-boundary alternation over tokens, None when empty
fn boundary_alternation<'a>(tokens: impl Iterator<Item = &'a String>) -> Option<Regex> {
    let escaped: Vec<String> = tokens
        .filter(|t| !t.is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if escaped.is_empty() {
        return None;
    }

    let pattern = format!(r"(?i)\b(?:{})\b", escaped.join("|"));
    Some(Regex::new(&pattern).expect("Invalid alternation regex"))
}

/// All standalone numeric tokens, skipping digits glued to a letter
fn extract_numbers(text: &str) -> Vec<String> {
    NUMBER_REGEX
        .find_iter(text)
        .filter(|m| {
            !text[..m.start()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphabetic())
        })
        .map(|m| canonical_number(m.as_str()))
        .collect()
}

/// All (low, high) pairs joined by a range connector
fn extract_ranges(text: &str) -> Vec<(String, String)> {
    RANGE_REGEX
        .captures_iter(text)
        .map(|cap| (canonical_number(&cap[1]), canonical_number(&cap[2])))
        .collect()
}

/// Binomials found inside italic regions, case preserved
fn extract_binomials(italics: &[String]) -> Vec<String> {
    let mut binomials = Vec::new();
    for region in italics {
        for cap in BINOMIAL_REGEX.captures_iter(region) {
            binomials.push(format!("{} {}", &cap[1], &cap[2]));
        }
    }
    binomials
}
