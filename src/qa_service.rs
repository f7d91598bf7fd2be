/*!
 * QA engine orchestration.
 *
 * Scores every unit of the corpus against the knowledge bases, then runs
 * the corpus-wide reductions (term drift, KPIs) behind the join barrier.
 *
 * Units are independent of each other, so scoring fans out across tasks
 * with a semaphore bounding concurrency. Results are re-sorted by corpus
 * index before any aggregation, and the drift accumulator only ever adds
 * commutative counts, so the outcome is identical whatever the completion
 * order or concurrency degree. A unit whose scoring task dies is isolated
 * into a diagnostics entry; the rest of the corpus completes.
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::analysis::drift::DriftAccumulator;
use crate::analysis::kpi::{BlockSummary, KpiAggregator};
use crate::analysis::DriftEntry;
use crate::app_config::Config;
use crate::checks::critical::{CheckKind, CheckOutcome, CriticalChecker, CriticalReport};
use crate::checks::name_verifier::{NameCheckResult, NameVerifier};
use crate::checks::term_recall::{TermRecallEvaluator, TermRecallResult};
use crate::corpus::{Corpus, TranslationUnit, UnitKind};
use crate::extraction::{EntityExtractor, TextLanguage};
use crate::knowledge::{NameAuthority, TermGlossary};

/// Everything known about one unit after scoring
#[derive(Debug, Clone)]
pub struct UnitScore {
    /// Position in the corpus, fixing output order
    pub index: usize,

    /// The unit this score belongs to
    pub unit: TranslationUnit,

    /// Whether the unit carries a nonempty translation
    pub translated: bool,

    /// Whether the unit is graded at all (skip-listed categories are not)
    pub in_scope: bool,

    /// Critical fidelity check results
    pub critical: CriticalReport,

    /// Glossary term-recall results
    pub term_recall: TermRecallResult,

    /// Person-name verification results
    pub name_check: NameCheckResult,

    /// Symbol and binomial checks (when applicable) both hold
    pub entity_pass: bool,
}

/// A unit that could not be scored
#[derive(Debug, Clone)]
pub struct UnitDiagnostic {
    /// The unit's identifier
    pub unit_id: String,

    /// What went wrong
    pub message: String,
}

/// The complete result of one engine run
#[derive(Debug)]
pub struct QaOutcome {
    /// Scores for key units, in corpus order
    pub key_rows: Vec<UnitScore>,

    /// Scores for description units, in corpus order
    pub desc_rows: Vec<UnitScore>,

    /// Corpus-wide block summaries (Key, Description)
    pub kpi_summary: Vec<BlockSummary>,

    /// Per-category summaries over in-scope description rows
    pub kpi_by_category: Vec<BlockSummary>,

    /// Drifting glossary terms
    pub term_drift: Vec<DriftEntry>,

    /// Units excluded from grading because scoring failed
    pub diagnostics: Vec<UnitDiagnostic>,
}

/// Per-unit scoring context, shared read-only across worker tasks
struct Scorer {
    skip_categories: Vec<String>,
    extractor: EntityExtractor,
    checker: CriticalChecker,
    term_evaluator: TermRecallEvaluator,
    name_verifier: NameVerifier,
}

impl Scorer {
    fn score_unit(
        &self,
        index: usize,
        unit: &TranslationUnit,
        glossary: &TermGlossary,
        authority: &NameAuthority,
    ) -> UnitScore {
        let translated = unit.is_translated();
        let in_scope = self.is_in_scope(unit);

        if !in_scope {
            return UnitScore {
                index,
                unit: unit.clone(),
                translated,
                in_scope,
                critical: CriticalReport::empty(),
                term_recall: TermRecallResult::default(),
                name_check: NameCheckResult::not_applicable(),
                entity_pass: false,
            };
        }

        // Key lines are plain text; description records may embed markup
        let markup = unit.unit_kind == UnitKind::Description;

        let source_bag = self
            .extractor
            .extract(&unit.source_text, TextLanguage::English, markup);
        let target_bag = self
            .extractor
            .extract(&unit.target_text, TextLanguage::Chinese, markup);

        let critical = self.checker.check(&source_bag, &target_bag);

        // Term and name checks grade the translation; an untranslated unit
        // has nothing to grade and must not read as zero recall
        let term_recall = if translated {
            self.term_evaluator
                .evaluate(glossary, &unit.source_text, &unit.target_text)
        } else {
            TermRecallResult::default()
        };

        let name_check = if translated {
            self.name_verifier
                .evaluate(authority, &unit.source_text, &unit.target_text)
        } else {
            NameCheckResult::not_applicable()
        };

        let entity_pass = translated
            && critical.outcome(CheckKind::Symbol) != CheckOutcome::Fail
            && critical.outcome(CheckKind::Binomial) != CheckOutcome::Fail;

        UnitScore {
            index,
            unit: unit.clone(),
            translated,
            in_scope,
            critical,
            term_recall,
            name_check,
            entity_pass,
        }
    }

    fn is_in_scope(&self, unit: &TranslationUnit) -> bool {
        if unit.unit_kind != UnitKind::Description {
            return true;
        }
        match &unit.category {
            Some(category) => {
                let category = category.trim().to_lowercase();
                !self
                    .skip_categories
                    .iter()
                    .any(|skip| skip.trim().to_lowercase() == category)
            }
            None => true,
        }
    }
}

/// QA service wiring extraction, checks and aggregation together
pub struct QaService {
    config: Config,
    scorer: Arc<Scorer>,
}

impl QaService {
    /// Create a service from the application configuration
    pub fn with_config(config: Config) -> Self {
        let scorer = Scorer {
            skip_categories: config.engine.skip_categories.clone(),
            extractor: EntityExtractor::from_config(&config.checks),
            checker: CriticalChecker::with_config(config.checks.clone()),
            term_evaluator: TermRecallEvaluator::with_config(config.term_recall.clone()),
            name_verifier: NameVerifier::with_config(config.names.clone()),
        };

        Self {
            config,
            scorer: Arc::new(scorer),
        }
    }

    /// Score a single unit; exposed for tests and for the report layer
    pub fn score_unit(
        &self,
        index: usize,
        unit: &TranslationUnit,
        glossary: &TermGlossary,
        authority: &NameAuthority,
    ) -> UnitScore {
        self.scorer.score_unit(index, unit, glossary, authority)
    }

    /// Run the full engine over a corpus.
    ///
    /// `progress_callback` is invoked with (processed, total) as units
    /// complete, from whichever task finishes; the final outcome does not
    /// depend on that order.
    pub async fn run(
        &self,
        corpus: &Corpus,
        glossary: Arc<TermGlossary>,
        authority: Arc<NameAuthority>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<QaOutcome> {
        let total_units = corpus.len();
        debug!(
            "Scoring {} unit(s) with concurrency {}",
            total_units, self.config.engine.max_concurrent_units
        );

        let semaphore = Arc::new(Semaphore::new(self.config.engine.max_concurrent_units));
        let processed = Arc::new(AtomicUsize::new(0));
        let drift = Arc::new(Mutex::new(DriftAccumulator::new()));

        let results = stream::iter(corpus.units.iter().cloned().enumerate())
            .map(|(index, unit)| {
                let scorer = self.scorer.clone();
                let glossary = glossary.clone();
                let authority = authority.clone();
                let semaphore = semaphore.clone();
                let processed = processed.clone();
                let progress_callback = progress_callback.clone();
                let drift = drift.clone();

                async move {
                    let _permit = semaphore
                        .acquire()
                        .await
                        .expect("Scoring semaphore closed");

                    let unit_id = unit.unit_id.clone();

                    // A panicking unit must not take the batch down with it;
                    // the spawned task is the isolation boundary.
                    let joined = tokio::spawn(async move {
                        scorer.score_unit(index, &unit, &glossary, &authority)
                    })
                    .await;

                    if let Ok(score) = &joined {
                        if score.in_scope && score.translated {
                            drift.lock().record(&score.term_recall);
                        }
                    }

                    let current = processed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total_units);

                    (index, unit_id, joined)
                }
            })
            .buffer_unordered(self.config.engine.max_concurrent_units)
            .collect::<Vec<_>>()
            .await;

        // Restore corpus order so output is independent of completion order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, _, _)| *index);

        let mut scores: Vec<UnitScore> = Vec::with_capacity(total_units);
        let mut diagnostics = Vec::new();

        for (_, unit_id, joined) in sorted_results {
            match joined {
                Ok(score) => scores.push(score),
                Err(e) => {
                    warn!("Unit '{}' failed to score: {}", unit_id, e);
                    diagnostics.push(UnitDiagnostic {
                        unit_id,
                        message: format!("scoring task failed: {}", e),
                    });
                }
            }
        }

        // Barrier reached: corpus-wide reductions only see final rows
        let term_drift = drift.lock().detect();

        let key_rows: Vec<UnitScore> = scores
            .iter()
            .filter(|s| s.unit.unit_kind == UnitKind::Key)
            .cloned()
            .collect();
        let desc_rows: Vec<UnitScore> = scores
            .iter()
            .filter(|s| s.unit.unit_kind == UnitKind::Description)
            .cloned()
            .collect();

        let aggregator = KpiAggregator::with_policy(self.config.checks.critical_pass_policy);

        let kpi_summary = vec![
            aggregator.summarize("Key", key_rows.iter().filter(|s| s.in_scope)),
            aggregator.summarize("Description", desc_rows.iter().filter(|s| s.in_scope)),
        ];
        let kpi_by_category =
            aggregator.summarize_by_category(desc_rows.iter().filter(|s| s.in_scope));

        Ok(QaOutcome {
            key_rows,
            desc_rows,
            kpi_summary,
            kpi_by_category,
            term_drift,
            diagnostics,
        })
    }
}
