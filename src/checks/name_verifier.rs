/*!
 * Person-name verification on the verifiable subset.
 *
 * Author citations in the source text are matched against the name
 * authority; for every matched entry that carries a Chinese rendering, that
 * rendering must appear in the target text. Units matching no entry are not
 * graded at all, and entries without a Chinese rendering widen nothing but
 * the matched list.
 */

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::app_config::NameCheckConfig;
use crate::corpus::normalize_whitespace;
use crate::extraction::strip_markup;
use crate::knowledge::NameAuthority;
use crate::knowledge::names::{normalize_person_name, squash_abbreviation};

/// Regex for author-abbreviation shapes like "W. B. Liao" or "Thunb."
static ABBR_CANDIDATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[A-Z]\.\s?){1,4}(?:[A-Za-z]{2,}\.)?").expect("Invalid abbreviation regex")
});

/// Regex for a bare capitalized surname with trailing period
static SURNAME_PERIOD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z\-]{2,}\.").expect("Invalid surname regex"));

/// Regex for parenthesized segments dropped before full-name matching
static PAREN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("Invalid parenthesis regex"));

/// Status of the name check for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NameStatus {
    /// No authority entry matched the source text
    Na,
    /// Every verifiable match has its Chinese rendering in the target
    Ok,
    /// At least one verifiable match lacks its Chinese rendering
    Fail,
}

/// Name-check outcome for one unit
#[derive(Debug, Clone)]
pub struct NameCheckResult {
    /// Overall status
    pub status: NameStatus,

    /// Matched entries with a known Chinese rendering
    pub verifiable_count: usize,

    /// Full English names of all matched entries, sorted
    pub matched_names: Vec<String>,

    /// Chinese renderings expected but absent from the target, sorted
    pub expected_missing: Vec<String>,
}

impl NameCheckResult {
    /// Result for a unit the check does not apply to
    pub fn not_applicable() -> Self {
        NameCheckResult {
            status: NameStatus::Na,
            verifiable_count: 0,
            matched_names: Vec::new(),
            expected_missing: Vec::new(),
        }
    }
}

/// Person-name verifier
pub struct NameVerifier {
    config: NameCheckConfig,
}

impl NameVerifier {
    /// Create a verifier with the given configuration
    pub fn with_config(config: NameCheckConfig) -> Self {
        Self { config }
    }

    /// Verify one unit against the authority.
    ///
    /// Matching priority per occurrence: full name first, then abbreviation
    /// forms. An entry is counted once per unit however many of its forms
    /// occur, so the verifiable denominator never double-counts.
    pub fn evaluate(
        &self,
        authority: &NameAuthority,
        source_text: &str,
        target_text: &str,
    ) -> NameCheckResult {
        if !self.config.enabled || authority.is_empty() {
            return NameCheckResult::not_applicable();
        }

        let source_plain = strip_markup(source_text);
        let mut matched: BTreeSet<usize> = BTreeSet::new();

        for candidate in full_name_candidates(&source_plain, authority.max_full_name_words()) {
            if let Some(index) = authority.lookup_full_name(&candidate) {
                matched.insert(index);
            }
        }

        for candidate in abbreviation_candidates(&source_plain) {
            if let Some(index) = authority.lookup_abbreviation(&candidate) {
                matched.insert(index);
            }
        }

        if matched.is_empty() {
            return NameCheckResult::not_applicable();
        }

        let target_plain = strip_markup(target_text);

        let mut verifiable_count = 0;
        let mut matched_names = Vec::new();
        let mut expected_missing = BTreeSet::new();

        for index in matched {
            let entry = authority.entry(index);
            matched_names.push(entry.full_name_en.clone());

            if let Some(chinese_name) = &entry.chinese_name {
                verifiable_count += 1;
                if !target_plain.contains(chinese_name.as_str()) {
                    expected_missing.insert(chinese_name.clone());
                }
            }
        }

        matched_names.sort();

        let status = if expected_missing.is_empty() {
            NameStatus::Ok
        } else {
            NameStatus::Fail
        };

        NameCheckResult {
            status,
            verifiable_count,
            matched_names,
            expected_missing: expected_missing.into_iter().collect(),
        }
    }
}

/// Normalized full-name candidates: word n-grams of the letter-only text.
///
/// Full names in running text carry commas ("Wang, Bin in 1984"), so
/// segment splitting would cut through the very name being sought;
/// normalizing the whole text to letter words and sliding an n-gram window
/// over it finds the name wherever the punctuation fell.
fn full_name_candidates(text: &str, max_words: usize) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();
    if max_words < 2 {
        return candidates;
    }

    let without_parens = PAREN_REGEX.replace_all(text, " ");
    let normalized = normalize_person_name(&normalize_whitespace(&without_parens));
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();

    for n in 2..=max_words.min(words.len()) {
        for window in words.windows(n) {
            candidates.insert(window.join(" "));
        }
    }
    candidates
}

/// Whitespace-squashed abbreviation candidates
fn abbreviation_candidates(text: &str) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();
    for m in ABBR_CANDIDATE_REGEX.find_iter(text) {
        candidates.insert(squash_abbreviation(m.as_str()));
    }
    for m in SURNAME_PERIOD_REGEX.find_iter(text) {
        candidates.insert(squash_abbreviation(m.as_str()));
    }
    candidates
}
