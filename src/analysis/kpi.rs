/*!
 * KPI aggregation over per-unit scores.
 *
 * Pure reductions: one summary per block (key units, in-scope description
 * units) plus one per description category. Rates whose denominator is
 * empty are reported as absent rather than zero, so a corpus without
 * verifiable names does not read as one with terrible name accuracy.
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::app_config::CriticalPassPolicy;
use crate::checks::NameStatus;
use crate::qa_service::UnitScore;

/// Aggregate metrics for one block of rows
#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    /// Block label, e.g. "Key" or a category name
    pub block: String,

    /// Rows in the block (in-scope only)
    pub n_rows: usize,

    /// Fraction of rows with a nonempty translation
    pub translated_rate: Option<f64>,

    /// Fraction of rows hitting at least one glossary term
    pub term_hit_row_rate: Option<f64>,

    /// Mean recall over translated rows with >= 1 hit
    pub mean_term_recall_when_hit: Option<f64>,

    /// Fraction of rows passing all applicable critical checks
    pub critical_pass_rate: Option<f64>,

    /// Fraction of rows whose symbol and binomial checks hold
    pub entity_pass_rate: Option<f64>,

    /// Rows with at least one verifiable name match
    pub name_verifiable_rows: usize,

    /// Fraction of verifiable rows whose names all verified
    pub name_accuracy_on_verifiable_rows: Option<f64>,
}

/// KPI aggregator
pub struct KpiAggregator {
    policy: CriticalPassPolicy,
}

impl KpiAggregator {
    /// Create an aggregator with the given denominator policy
    pub fn with_policy(policy: CriticalPassPolicy) -> Self {
        Self { policy }
    }

    /// Reduce one block of in-scope rows to its summary
    pub fn summarize<'a>(
        &self,
        block: &str,
        rows: impl Iterator<Item = &'a UnitScore>,
    ) -> BlockSummary {
        let rows: Vec<&UnitScore> = rows.collect();
        let n_rows = rows.len();

        let translated = rows.iter().filter(|r| r.translated).count();
        let term_hit_rows = rows.iter().filter(|r| r.term_recall.hits > 0).count();

        let recalls: Vec<f64> = rows
            .iter()
            .filter(|r| r.translated && r.term_recall.hits > 0)
            .filter_map(|r| r.term_recall.recall)
            .collect();

        let critical_denominator: Vec<&&UnitScore> = rows
            .iter()
            .filter(|r| match self.policy {
                CriticalPassPolicy::ExcludeNoCritical => r.critical.has_critical_content(),
                CriticalPassPolicy::CountNoCriticalAsPass => true,
            })
            .collect();
        let critical_passed = critical_denominator
            .iter()
            .filter(|r| r.translated && r.critical.passed())
            .count();

        let entity_passed = rows.iter().filter(|r| r.entity_pass).count();

        let verifiable_rows: Vec<&&UnitScore> = rows
            .iter()
            .filter(|r| r.name_check.verifiable_count > 0)
            .collect();
        let names_accurate = verifiable_rows
            .iter()
            .filter(|r| r.name_check.status == NameStatus::Ok)
            .count();

        BlockSummary {
            block: block.to_string(),
            n_rows,
            translated_rate: rate(translated, n_rows),
            term_hit_row_rate: rate(term_hit_rows, n_rows),
            mean_term_recall_when_hit: mean(&recalls),
            critical_pass_rate: rate(critical_passed, critical_denominator.len()),
            entity_pass_rate: rate(entity_passed, n_rows),
            name_verifiable_rows: verifiable_rows.len(),
            name_accuracy_on_verifiable_rows: rate(names_accurate, verifiable_rows.len()),
        }
    }

    /// One summary per description category, largest blocks first
    pub fn summarize_by_category<'a>(
        &self,
        rows: impl Iterator<Item = &'a UnitScore>,
    ) -> Vec<BlockSummary> {
        let mut by_category: BTreeMap<String, Vec<&UnitScore>> = BTreeMap::new();
        for row in rows {
            let category = row.unit.category.clone().unwrap_or_default();
            by_category.entry(category).or_default().push(row);
        }

        let mut summaries: Vec<BlockSummary> = by_category
            .into_iter()
            .map(|(category, rows)| self.summarize(&category, rows.into_iter()))
            .collect();

        summaries.sort_by(|a, b| b.n_rows.cmp(&a.n_rows).then_with(|| a.block.cmp(&b.block)));
        summaries
    }
}

fn rate(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
