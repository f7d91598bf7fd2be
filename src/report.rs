/*!
 * Report tables handed to the external renderer.
 *
 * The engine's structured output: KPI tables, row-wise flags for key and
 * description units, the worst critical-fidelity offenders, name issues on
 * the verifiable subset, term drift, and per-unit diagnostics. Everything
 * here is serializable; rendering into sheets or anything else is the
 * consumer's business.
 */

use serde::Serialize;

use crate::analysis::{BlockSummary, DriftEntry};
use crate::app_config::Config;
use crate::checks::NameStatus;
use crate::corpus::normalize_whitespace;
use crate::knowledge::{NameAuthority, TermGlossary};
use crate::qa_service::{QaOutcome, UnitScore};

/// Run-level metadata
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was produced (RFC 3339)
    pub generated_at: String,

    /// Key units scored
    pub key_units: usize,

    /// Description units scored
    pub desc_units: usize,

    /// Glossary lookup keys available
    pub glossary_terms: usize,

    /// Name-authority entries available
    pub authority_entries: usize,

    /// Authority entries with a Chinese rendering
    pub verifiable_entries: usize,
}

/// One row of the row-wise output
#[derive(Debug, Clone, Serialize)]
pub struct RowRecord {
    /// Unit identifier
    pub unit_id: String,

    /// Description category, when any
    pub category: Option<String>,

    /// Whether the unit carries a translation
    pub translated: bool,

    /// Whether the unit was graded
    pub in_scope: bool,

    /// Glossary terms hit in the source
    pub term_hits: usize,

    /// Hits with an accepted rendering in the target
    pub term_ok: usize,

    /// term_ok / term_hits, absent with zero hits
    pub term_recall: Option<f64>,

    /// Hit terms missing from the target, ";"-joined and capped
    pub term_missing: String,

    /// Failed check flags, or OUT_OF_SCOPE / UNTRANSLATED markers
    pub critical_flags: String,

    /// Number of applicable critical checks
    pub critical_applicable: usize,

    /// AND over applicable critical checks
    pub critical_pass: bool,

    /// Whether any critical check was applicable at all
    pub has_critical_content: bool,

    /// Symbol and binomial preservation verdict
    pub entity_pass: bool,

    /// Name check status
    pub name_status: NameStatus,

    /// Verifiable name matches in this unit
    pub name_verifiable: usize,

    /// Expected Chinese names absent from the target, ";"-joined
    pub name_expected_missing: String,
}

impl RowRecord {
    fn from_score(score: &UnitScore) -> Self {
        let critical_flags = if !score.in_scope {
            "OUT_OF_SCOPE".to_string()
        } else if !score.translated {
            "UNTRANSLATED".to_string()
        } else {
            score.critical.flags()
        };

        RowRecord {
            unit_id: score.unit.unit_id.clone(),
            category: score.unit.category.clone(),
            translated: score.translated,
            in_scope: score.in_scope,
            term_hits: score.term_recall.hits,
            term_ok: score.term_recall.passed,
            term_recall: score.term_recall.recall,
            term_missing: score.term_recall.missing.join(";"),
            critical_flags,
            critical_applicable: score.critical.applicable_count(),
            critical_pass: score.critical.passed(),
            has_critical_content: score.critical.has_critical_content(),
            entity_pass: score.entity_pass,
            name_status: score.name_check.status,
            name_verifiable: score.name_check.verifiable_count,
            name_expected_missing: score.name_check.expected_missing.join(";"),
        }
    }
}

/// One row of the top-issues tables
#[derive(Debug, Clone, Serialize)]
pub struct IssueRecord {
    /// Unit identifier
    pub unit_id: String,

    /// Description category, when any
    pub category: Option<String>,

    /// Truncated source text
    pub source_excerpt: String,

    /// Truncated target text
    pub target_excerpt: String,

    /// Failed check flags, e.g. "NUM,UNIT"
    pub critical_flags: String,

    /// Number of failed checks, the severity rank
    pub failed_checks: usize,

    /// Per-check evidence of what went missing
    pub evidence: Vec<String>,
}

/// One row of the name-issues table
#[derive(Debug, Clone, Serialize)]
pub struct NameIssueRecord {
    /// Unit identifier
    pub unit_id: String,

    /// Description category, when any
    pub category: Option<String>,

    /// Truncated source text
    pub source_excerpt: String,

    /// Truncated target text
    pub target_excerpt: String,

    /// Matched authority entries (full English names)
    pub matched_names: Vec<String>,

    /// Chinese renderings expected but absent
    pub expected_missing: Vec<String>,
}

/// One diagnostics row
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticRecord {
    /// Unit identifier
    pub unit_id: String,

    /// What went wrong
    pub message: String,
}

/// The complete QA report
#[derive(Debug, Serialize)]
pub struct QaReport {
    pub metadata: ReportMetadata,
    pub kpi_summary: Vec<BlockSummary>,
    pub kpi_by_category: Vec<BlockSummary>,
    pub key_rowwise: Vec<RowRecord>,
    pub desc_rowwise: Vec<RowRecord>,
    pub top_issues_key: Vec<IssueRecord>,
    pub top_issues_desc: Vec<IssueRecord>,
    pub name_issues: Vec<NameIssueRecord>,
    pub term_drift: Vec<DriftEntry>,
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl QaReport {
    /// Assemble the report from an engine outcome
    pub fn build(
        outcome: &QaOutcome,
        config: &Config,
        glossary: &TermGlossary,
        authority: &NameAuthority,
        generated_at: chrono::DateTime<chrono::Local>,
    ) -> Self {
        let cap = config.engine.evidence_max_chars;

        let metadata = ReportMetadata {
            generated_at: generated_at.to_rfc3339(),
            key_units: outcome.key_rows.len(),
            desc_units: outcome.desc_rows.len(),
            glossary_terms: glossary.len(),
            authority_entries: authority.len(),
            verifiable_entries: authority.verifiable_count(),
        };

        QaReport {
            metadata,
            kpi_summary: outcome.kpi_summary.clone(),
            kpi_by_category: outcome.kpi_by_category.clone(),
            key_rowwise: outcome.key_rows.iter().map(RowRecord::from_score).collect(),
            desc_rowwise: outcome.desc_rows.iter().map(RowRecord::from_score).collect(),
            top_issues_key: top_issues(&outcome.key_rows, cap),
            top_issues_desc: top_issues(&outcome.desc_rows, cap),
            name_issues: name_issues(&outcome.desc_rows, cap),
            term_drift: outcome.term_drift.clone(),
            diagnostics: outcome
                .diagnostics
                .iter()
                .map(|d| DiagnosticRecord {
                    unit_id: d.unit_id.clone(),
                    message: d.message.clone(),
                })
                .collect(),
        }
    }
}

/// Truncate text for issue tables, on a character boundary
fn short(text: &str, max_chars: usize) -> String {
    let normalized = normalize_whitespace(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }
    let mut truncated: String = normalized.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

/// Translated in-scope rows failing critical checks, worst first
fn top_issues(rows: &[UnitScore], cap: usize) -> Vec<IssueRecord> {
    let mut issues: Vec<IssueRecord> = rows
        .iter()
        .filter(|s| s.in_scope && s.translated && !s.critical.passed())
        .map(|s| IssueRecord {
            unit_id: s.unit.unit_id.clone(),
            category: s.unit.category.clone(),
            source_excerpt: short(&s.unit.source_text, cap),
            target_excerpt: short(&s.unit.target_text, cap),
            critical_flags: s.critical.flags(),
            failed_checks: s.critical.failed_count(),
            evidence: s
                .critical
                .results
                .iter()
                .filter_map(|r| {
                    r.evidence
                        .as_ref()
                        .map(|e| format!("{}: {}", r.kind, e))
                })
                .collect(),
        })
        .collect();

    // Most failed checks first; corpus order breaks ties
    issues.sort_by(|a, b| b.failed_checks.cmp(&a.failed_checks));
    issues
}

/// Verifiable rows whose name check failed
fn name_issues(rows: &[UnitScore], cap: usize) -> Vec<NameIssueRecord> {
    rows.iter()
        .filter(|s| s.name_check.verifiable_count > 0 && s.name_check.status == NameStatus::Fail)
        .map(|s| NameIssueRecord {
            unit_id: s.unit.unit_id.clone(),
            category: s.unit.category.clone(),
            source_excerpt: short(&s.unit.source_text, cap),
            target_excerpt: short(&s.unit.target_text, cap),
            matched_names: s.name_check.matched_names.clone(),
            expected_missing: s.name_check.expected_missing.clone(),
        })
        .collect()
}
