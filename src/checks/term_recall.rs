/*!
 * Glossary term-recall evaluation.
 *
 * Walks every word n-gram of the source text against the glossary and, for
 * each term hit, asks whether any accepted Chinese rendering made it into
 * the target text. Per-unit hit/pass counts feed the KPI layer; the matched
 * renderings feed the corpus-wide drift detector.
 */

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::TermRecallConfig;
use crate::extraction::strip_markup;
use crate::knowledge::TermGlossary;

/// Regex for word tokens, hyphenated compounds kept whole
static WORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z]+(?:-[A-Za-z]+)*").expect("Invalid word regex"));

/// Term-recall outcome for one unit
#[derive(Debug, Clone, Default)]
pub struct TermRecallResult {
    /// Glossary terms found in the source text
    pub hits: usize,

    /// Hits whose accepted rendering appears in the target text
    pub passed: usize,

    /// passed / hits, None when the unit has no hits
    pub recall: Option<f64>,

    /// Hit terms with no accepted rendering in the target, capped for reporting
    pub missing: Vec<String>,

    /// Hit term -> accepted renderings actually found in the target
    pub found: BTreeMap<String, Vec<String>>,
}

/// Term-recall evaluator
pub struct TermRecallEvaluator {
    config: TermRecallConfig,
}

impl TermRecallEvaluator {
    /// Create an evaluator with the given configuration
    pub fn with_config(config: TermRecallConfig) -> Self {
        Self { config }
    }

    /// Evaluate one unit against the glossary
    pub fn evaluate(
        &self,
        glossary: &TermGlossary,
        source_text: &str,
        target_text: &str,
    ) -> TermRecallResult {
        if !self.config.enabled || glossary.is_empty() {
            return TermRecallResult::default();
        }

        let hits = self.match_terms(glossary, source_text);
        if hits.is_empty() {
            return TermRecallResult::default();
        }

        let target_plain = strip_markup(target_text);

        let mut passed = 0;
        let mut missing = Vec::new();
        let mut found = BTreeMap::new();

        for term in &hits {
            let Some(renderings) = glossary.lookup(term) else {
                continue;
            };

            let present: Vec<String> = renderings
                .iter()
                .filter(|r| target_plain.contains(r.as_str()))
                .cloned()
                .collect();

            if present.is_empty() {
                if missing.len() < self.config.missing_report_cap {
                    missing.push(term.clone());
                }
            } else {
                passed += 1;
                found.insert(term.clone(), present);
            }
        }

        let hit_count = hits.len();
        TermRecallResult {
            hits: hit_count,
            passed,
            recall: Some(passed as f64 / hit_count as f64),
            missing,
            found,
        }
    }

    /// Glossary terms occurring in the source text, as sorted n-grams
    fn match_terms(&self, glossary: &TermGlossary, source_text: &str) -> BTreeSet<String> {
        let plain = strip_markup(source_text);
        let tokens: Vec<String> = WORD_REGEX
            .find_iter(&plain)
            .map(|m| m.as_str().to_lowercase())
            .collect();

        let window = glossary.ngram_window(
            self.config.min_ngram_words,
            self.config.max_ngram_words,
        );

        let mut hits = BTreeSet::new();
        for n in 1..=window {
            if n > tokens.len() {
                break;
            }
            for ngram_tokens in tokens.windows(n) {
                let ngram = ngram_tokens.join(" ");
                if glossary.lookup(&ngram).is_some() {
                    hits.insert(ngram);
                }
            }
        }
        hits
    }
}
