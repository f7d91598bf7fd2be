/*!
 * Term drift detection.
 *
 * Collects, per glossary term, the Chinese renderings actually observed at
 * hit sites across the whole corpus. A term rendered with two or more
 * distinct accepted variants is "drifting": each rendering is legitimate in
 * isolation, but mixing them across a flora reads as inconsistency. Recall
 * failures contribute nothing here; drift measures variation among correct
 * renderings only.
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::checks::TermRecallResult;

/// One observed rendering of a term with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantCount {
    /// The Chinese rendering
    pub variant: String,
    /// Units in which this rendering was the observed translation
    pub count: usize,
}

/// One drifting term
#[derive(Debug, Clone, Serialize)]
pub struct DriftEntry {
    /// The English glossary term
    pub term_en: String,

    /// Distinct renderings, most frequent first
    pub variants: Vec<VariantCount>,

    /// Total observed occurrences across all variants
    pub total_occurrences: usize,
}

/// Accumulates (term, rendering) observations across the corpus
#[derive(Debug, Default)]
pub struct DriftAccumulator {
    /// term -> rendering -> occurrence count
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl DriftAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the matched renderings of one unit's term-recall result
    pub fn record(&mut self, result: &TermRecallResult) {
        for (term, variants) in &result.found {
            let per_term = self.counts.entry(term.clone()).or_default();
            for variant in variants {
                *per_term.entry(variant.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Number of terms with at least one observation
    pub fn observed_terms(&self) -> usize {
        self.counts.len()
    }

    /// Produce drift rows: terms with >= 2 distinct renderings, ordered by
    /// descending total occurrences, then term
    pub fn detect(&self) -> Vec<DriftEntry> {
        let mut entries: Vec<DriftEntry> = self
            .counts
            .iter()
            .filter(|(_, variants)| variants.len() >= 2)
            .map(|(term, variants)| {
                let mut variant_counts: Vec<VariantCount> = variants
                    .iter()
                    .map(|(variant, count)| VariantCount {
                        variant: variant.clone(),
                        count: *count,
                    })
                    .collect();
                variant_counts.sort_by(|a, b| {
                    b.count.cmp(&a.count).then_with(|| a.variant.cmp(&b.variant))
                });

                let total_occurrences = variant_counts.iter().map(|v| v.count).sum();
                DriftEntry {
                    term_en: term.clone(),
                    variants: variant_counts,
                    total_occurrences,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.total_occurrences
                .cmp(&a.total_occurrences)
                .then_with(|| a.term_en.cmp(&b.term_en))
        });
        entries
    }
}
