/*!
 * Critical fidelity checks between a unit's source and target entity bags.
 *
 * Each check answers one question about factual preservation. A check with
 * nothing to verify on the source side is *inapplicable*: it neither passes
 * nor fails and stays out of every KPI denominator. `CriticalPass` is the
 * AND over the applicable checks only.
 */

use std::collections::HashMap;
use std::fmt;

use crate::app_config::CheckConfig;
use crate::corpus::normalize_whitespace;
use crate::extraction::EntityBag;

/// The six critical check categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Numeric token preservation
    Num,
    /// Numeric range preservation
    Range,
    /// Measurement unit preservation
    Unit,
    /// Negation cue preservation
    NegationCue,
    /// Symbol preservation
    Symbol,
    /// Italic-marked binomial preservation
    Binomial,
}

impl CheckKind {
    /// All kinds in reporting order
    pub const ALL: [CheckKind; 6] = [
        CheckKind::Num,
        CheckKind::Range,
        CheckKind::Unit,
        CheckKind::NegationCue,
        CheckKind::Symbol,
        CheckKind::Binomial,
    ];

    /// Flag name used in row-wise output
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Num => "NUM",
            CheckKind::Range => "RANGE",
            CheckKind::Unit => "UNIT",
            CheckKind::NegationCue => "NEGATION_CUE",
            CheckKind::Symbol => "SYMBOL",
            CheckKind::Binomial => "BINOMIAL",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of one check for one unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Applicable and preserved
    Pass,
    /// Applicable and violated
    Fail,
    /// Nothing to verify on the source side (or check disabled)
    NotApplicable,
}

/// One check's result with optional evidence of what went missing
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Which check this is
    pub kind: CheckKind,
    /// Pass, fail, or inapplicable
    pub outcome: CheckOutcome,
    /// Missing entities, for failure rows
    pub evidence: Option<String>,
}

impl CheckResult {
    fn pass(kind: CheckKind) -> Self {
        CheckResult {
            kind,
            outcome: CheckOutcome::Pass,
            evidence: None,
        }
    }

    fn fail(kind: CheckKind, evidence: String) -> Self {
        CheckResult {
            kind,
            outcome: CheckOutcome::Fail,
            evidence: Some(evidence),
        }
    }

    fn not_applicable(kind: CheckKind) -> Self {
        CheckResult {
            kind,
            outcome: CheckOutcome::NotApplicable,
            evidence: None,
        }
    }
}

/// All critical check results for one unit
#[derive(Debug, Clone)]
pub struct CriticalReport {
    /// One result per check kind, in `CheckKind::ALL` order
    pub results: Vec<CheckResult>,
}

impl CriticalReport {
    /// Report with every check inapplicable, for rows that are not graded
    pub fn empty() -> Self {
        CriticalReport {
            results: CheckKind::ALL
                .iter()
                .map(|kind| CheckResult::not_applicable(*kind))
                .collect(),
        }
    }

    /// Number of applicable checks (0..=6)
    pub fn applicable_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome != CheckOutcome::NotApplicable)
            .count()
    }

    /// Whether the unit had any critical content to verify
    pub fn has_critical_content(&self) -> bool {
        self.applicable_count() > 0
    }

    /// AND over the applicable checks; trivially true with none applicable
    pub fn passed(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.outcome != CheckOutcome::Fail)
    }

    /// Kinds that failed, in reporting order
    pub fn failed_kinds(&self) -> Vec<CheckKind> {
        self.results
            .iter()
            .filter(|r| r.outcome == CheckOutcome::Fail)
            .map(|r| r.kind)
            .collect()
    }

    /// Number of failed checks, used to rank issue severity
    pub fn failed_count(&self) -> usize {
        self.failed_kinds().len()
    }

    /// Comma-joined failure flags for row-wise output, e.g. "NUM,UNIT"
    pub fn flags(&self) -> String {
        self.failed_kinds()
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Outcome for one kind
    pub fn outcome(&self, kind: CheckKind) -> CheckOutcome {
        self.results
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.outcome)
            .unwrap_or(CheckOutcome::NotApplicable)
    }
}

/// Critical fidelity checker for one source/target bag pair
pub struct CriticalChecker {
    config: CheckConfig,
}

impl CriticalChecker {
    /// Create a checker with the given configuration
    pub fn with_config(config: CheckConfig) -> Self {
        Self { config }
    }

    /// Run all six checks for one unit
    pub fn check(&self, source: &EntityBag, target: &EntityBag) -> CriticalReport {
        let results = vec![
            self.check_numbers(source, target),
            self.check_ranges(source, target),
            self.check_units(source, target),
            self.check_negation(source, target),
            self.check_symbols(source, target),
            self.check_binomials(source, target),
        ];

        CriticalReport { results }
    }

    // NUM: the target multiset must contain every source number.
    fn check_numbers(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_numbers || source.numbers.is_empty() {
            return CheckResult::not_applicable(CheckKind::Num);
        }

        let mut available: HashMap<&str, usize> = HashMap::new();
        for number in &target.numbers {
            *available.entry(number.as_str()).or_insert(0) += 1;
        }

        let mut missing: Vec<&str> = Vec::new();
        for number in &source.numbers {
            match available.get_mut(number.as_str()) {
                Some(count) if *count > 0 => *count -= 1,
                _ => missing.push(number.as_str()),
            }
        }

        if missing.is_empty() {
            CheckResult::pass(CheckKind::Num)
        } else {
            CheckResult::fail(CheckKind::Num, missing.join(";"))
        }
    }

    // RANGE: every source (low, high) pair must appear among target ranges.
    fn check_ranges(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_ranges || source.ranges.is_empty() {
            return CheckResult::not_applicable(CheckKind::Range);
        }

        let missing: Vec<String> = source
            .ranges
            .iter()
            .filter(|pair| !target.ranges.contains(pair))
            .map(|(low, high)| format!("{}-{}", low, high))
            .collect();

        if missing.is_empty() {
            CheckResult::pass(CheckKind::Range)
        } else {
            CheckResult::fail(CheckKind::Range, missing.join(";"))
        }
    }

    // UNIT: each source token must have an accepted rendering in the target.
    fn check_units(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_units || source.units.is_empty() {
            return CheckResult::not_applicable(CheckKind::Unit);
        }

        let mut missing: Vec<&str> = Vec::new();
        for token in &source.units {
            let found = match self.config.unit_map.get(token.as_str()) {
                Some(renderings) => renderings.iter().any(|r| target.units.contains(r.as_str())),
                // Unmapped token: fall back to requiring the token itself
                None => target.units.contains(token.as_str()),
            };
            if !found {
                missing.push(token.as_str());
            }
        }

        if missing.is_empty() {
            CheckResult::pass(CheckKind::Unit)
        } else {
            CheckResult::fail(CheckKind::Unit, missing.join(";"))
        }
    }

    // NEGATION_CUE: presence must be preserved, counts may differ.
    fn check_negation(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_negation || source.negation_cues == 0 {
            return CheckResult::not_applicable(CheckKind::NegationCue);
        }

        if target.negation_cues > 0 {
            CheckResult::pass(CheckKind::NegationCue)
        } else {
            CheckResult::fail(
                CheckKind::NegationCue,
                format!("{} source cue(s), none in target", source.negation_cues),
            )
        }
    }

    // SYMBOL: every source symbol must be present in the target.
    fn check_symbols(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_symbols || source.symbols.is_empty() {
            return CheckResult::not_applicable(CheckKind::Symbol);
        }

        let missing: Vec<String> = source
            .symbols
            .iter()
            .filter(|s| !target.symbols.contains(s))
            .map(|s| s.to_string())
            .collect();

        if missing.is_empty() {
            CheckResult::pass(CheckKind::Symbol)
        } else {
            CheckResult::fail(CheckKind::Symbol, missing.join(";"))
        }
    }

    // BINOMIAL: only evaluated when the source marks taxa in italics; the
    // Latin name must survive verbatim (case-sensitive, whitespace aside).
    fn check_binomials(&self, source: &EntityBag, target: &EntityBag) -> CheckResult {
        if !self.config.check_binomials || source.binomials.is_empty() {
            return CheckResult::not_applicable(CheckKind::Binomial);
        }

        let target_text = normalize_whitespace(&target.plain_text);
        let missing: Vec<&str> = source
            .binomials
            .iter()
            .map(|b| b.as_str())
            .filter(|b| !target_text.contains(&normalize_whitespace(b)))
            .collect();

        if missing.is_empty() {
            CheckResult::pass(CheckKind::Binomial)
        } else {
            CheckResult::fail(CheckKind::Binomial, missing.join(";"))
        }
    }
}
