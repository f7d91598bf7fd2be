/*!
 * Morphology term glossary.
 *
 * Maps normalized English botanical terms to the set of Chinese renderings
 * accepted for them. One English term may legitimately carry several CN
 * variants (synonymy); matching is always "any member present", never a
 * single canonical string. The spelling variants generated for each EN term
 * (hyphen/space swaps, singularized head) make word-boundary n-gram lookup
 * tolerant of the surface forms that actually occur in key and description
 * text.
 */

use std::collections::{BTreeSet, HashMap};

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::corpus::normalize_whitespace;

/// Regex for parenthesized qualifiers inside glossary headwords
static PARENTHETICAL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)\s*").expect("Invalid parenthetical regex"));

/// One glossary record as loaded from disk
#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryRecord {
    /// English headword
    pub term_en: String,

    /// Accepted Chinese renderings
    pub term_zh_variants: Vec<String>,

    /// English definition, informational only
    #[serde(default)]
    pub definition_en: Option<String>,

    /// Chinese definition, informational only
    #[serde(default)]
    pub definition_zh: Option<String>,
}

/// Normalize an English glossary headword for lookup
pub fn normalize_en_term(term: &str) -> String {
    let lowered = term.to_lowercase();
    let without_parens = PARENTHETICAL_REGEX.replace_all(&lowered, " ");
    normalize_whitespace(&without_parens)
}

/// Crude English singularization for the final token of a term
pub fn singularize_token(token: &str) -> String {
    if token.ends_with("ies") && token.len() > 4 {
        format!("{}y", &token[..token.len() - 3])
    } else if token.ends_with("es") && token.len() > 4 {
        token[..token.len() - 2].to_string()
    } else if token.ends_with('s') && token.len() > 3 && !token.ends_with("ss") {
        token[..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}

/// Generate the lookup variants for one normalized EN term
fn make_en_variants(term_en: &str) -> BTreeSet<String> {
    let base = normalize_en_term(term_en);
    let mut variants = BTreeSet::new();
    if base.is_empty() {
        return variants;
    }

    variants.insert(base.clone());
    variants.insert(base.replace('-', " "));
    variants.insert(base.replace(' ', "-"));

    let tokens: Vec<&str> = base.split(' ').collect();
    if let Some((last, head)) = tokens.split_last() {
        let mut singular: Vec<String> = head.iter().map(|t| (*t).to_string()).collect();
        singular.push(singularize_token(last));
        variants.insert(singular.join(" "));
    }

    variants.retain(|v| !v.is_empty());
    variants
}

/// Read-only glossary lookup structure
#[derive(Debug, Default)]
pub struct TermGlossary {
    /// Normalized EN variant -> accepted CN renderings
    en_to_zh: HashMap<String, BTreeSet<String>>,

    /// Longest key length in words, before any config clamp
    longest_term_words: usize,
}

impl TermGlossary {
    /// Create an empty glossary; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the lookup structure from loaded records.
    ///
    /// Records sharing a normalized EN headword merge their accepted-variant
    /// sets. Records with an empty headword or no usable CN rendering are
    /// skipped, mirroring how sparse rows appear in the source glossary file.
    pub fn build(records: &[GlossaryRecord]) -> Self {
        let mut en_to_zh: HashMap<String, BTreeSet<String>> = HashMap::new();

        for record in records {
            let zh_variants: BTreeSet<String> = record
                .term_zh_variants
                .iter()
                .map(|v| normalize_whitespace(v))
                .filter(|v| !v.is_empty())
                .collect();

            if zh_variants.is_empty() {
                continue;
            }

            for variant in make_en_variants(&record.term_en) {
                en_to_zh
                    .entry(variant)
                    .or_default()
                    .extend(zh_variants.iter().cloned());
            }
        }

        let longest_term_words = en_to_zh
            .keys()
            .map(|k| k.split(' ').count())
            .max()
            .unwrap_or(0);

        debug!(
            "Built term glossary: {} lookup keys, longest {} word(s)",
            en_to_zh.len(),
            longest_term_words
        );

        TermGlossary {
            en_to_zh,
            longest_term_words,
        }
    }

    /// Accepted CN renderings for a normalized EN n-gram, if it is a term
    pub fn lookup(&self, ngram: &str) -> Option<&BTreeSet<String>> {
        self.en_to_zh.get(ngram)
    }

    /// Number of lookup keys
    pub fn len(&self) -> usize {
        self.en_to_zh.len()
    }

    /// Whether the glossary holds no terms
    pub fn is_empty(&self) -> bool {
        self.en_to_zh.is_empty()
    }

    /// N-gram window to scan, clamped to the configured floor and cap.
    ///
    /// With an empty glossary the floor keeps the window well-defined so the
    /// evaluator still runs (and finds nothing) rather than special-casing.
    pub fn ngram_window(&self, floor: usize, cap: usize) -> usize {
        self.longest_term_words.max(floor).min(cap)
    }
}
