use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO), must resolve to English
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO), must resolve to Chinese
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Critical fidelity check config
    #[serde(default)]
    pub checks: CheckConfig,

    /// Glossary term-recall config
    #[serde(default)]
    pub term_recall: TermRecallConfig,

    /// Person-name verification config
    #[serde(default)]
    pub names: NameCheckConfig,

    /// Engine/scheduling config
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Denominator policy for the CriticalPass_rate KPI.
///
/// Units with no critical content (zero applicable checks) pass trivially;
/// whether they belong in the rate's denominator is a reporting decision,
/// so it is configuration rather than a fixed rule.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CriticalPassPolicy {
    /// Only units with at least one applicable check count (default)
    #[default]
    ExcludeNoCritical,
    /// Units with no applicable checks count as passes
    CountNoCriticalAsPass,
}

/// Configuration for the critical fidelity checks
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckConfig {
    /// Check number preservation
    #[serde(default = "default_true")]
    pub check_numbers: bool,

    /// Check numeric range preservation
    #[serde(default = "default_true")]
    pub check_ranges: bool,

    /// Check measurement unit preservation
    #[serde(default = "default_true")]
    pub check_units: bool,

    /// Check negation cue preservation
    #[serde(default = "default_true")]
    pub check_negation: bool,

    /// Check symbol preservation
    #[serde(default = "default_true")]
    pub check_symbols: bool,

    /// Check italic-marked binomial preservation
    #[serde(default = "default_true")]
    pub check_binomials: bool,

    /// Source unit token -> accepted target renderings
    #[serde(default = "default_unit_map")]
    pub unit_map: BTreeMap<String, Vec<String>>,

    /// Negation trigger words in the source language (word-boundary matched)
    #[serde(default = "default_negation_cues_en")]
    pub negation_cues_source: Vec<String>,

    /// Negation cue strings in the target language (substring matched)
    #[serde(default = "default_negation_cues_zh")]
    pub negation_cues_target: Vec<String>,

    /// Symbols whose presence must be preserved
    #[serde(default = "default_symbols")]
    pub symbols: Vec<char>,

    /// Denominator policy for CriticalPass_rate
    #[serde(default)]
    pub critical_pass_policy: CriticalPassPolicy,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            check_numbers: true,
            check_ranges: true,
            check_units: true,
            check_negation: true,
            check_symbols: true,
            check_binomials: true,
            unit_map: default_unit_map(),
            negation_cues_source: default_negation_cues_en(),
            negation_cues_target: default_negation_cues_zh(),
            symbols: default_symbols(),
            critical_pass_policy: CriticalPassPolicy::default(),
        }
    }
}

/// Configuration for glossary term-recall evaluation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TermRecallConfig {
    /// Whether term recall is evaluated
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hard cap on the n-gram window (in words) when matching glossary terms
    #[serde(default = "default_max_ngram_words")]
    pub max_ngram_words: usize,

    /// Floor for the n-gram window when the glossary is empty or short-termed
    #[serde(default = "default_min_ngram_words")]
    pub min_ngram_words: usize,

    /// Maximum missing terms listed per row in the report
    #[serde(default = "default_missing_report_cap")]
    pub missing_report_cap: usize,
}

impl Default for TermRecallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_ngram_words: default_max_ngram_words(),
            min_ngram_words: default_min_ngram_words(),
            missing_report_cap: default_missing_report_cap(),
        }
    }
}

/// Configuration for person-name verification
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NameCheckConfig {
    /// Whether name verification is evaluated
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NameCheckConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Engine scheduling and reporting configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Maximum units scored concurrently
    #[serde(default = "default_max_concurrent_units")]
    pub max_concurrent_units: usize,

    /// Description categories excluded from scoring (case-insensitive)
    #[serde(default = "default_skip_categories")]
    pub skip_categories: Vec<String>,

    /// Maximum characters of source/target text echoed into issue tables
    #[serde(default = "default_evidence_max_chars")]
    pub evidence_max_chars: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_units: default_max_concurrent_units(),
            skip_categories: default_skip_categories(),
            evidence_max_chars: default_evidence_max_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_true() -> bool {
    true
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_max_ngram_words() -> usize {
    6
}

fn default_min_ngram_words() -> usize {
    4
}

fn default_missing_report_cap() -> usize {
    20
}

fn default_max_concurrent_units() -> usize {
    8
}

fn default_skip_categories() -> Vec<String> {
    vec!["synonym".to_string()]
}

fn default_evidence_max_chars() -> usize {
    260
}

fn default_symbols() -> Vec<char> {
    vec!['±', '×']
}

// Measurement tokens and their accepted target renderings. Transliterated
// latin abbreviations are accepted on the target side alongside the CJK
// forms, matching how the source corpus is actually translated.
fn default_unit_map() -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    let entries: &[(&str, &[&str])] = &[
        ("mm", &["mm", "毫米"]),
        ("cm", &["cm", "厘米"]),
        ("dm", &["dm", "分米"]),
        ("m", &["m", "米"]),
        ("km", &["km", "千米"]),
        ("µm", &["µm", "um", "微米"]),
        ("um", &["µm", "um", "微米"]),
    ];
    for (en, zhs) in entries {
        map.insert(
            (*en).to_string(),
            zhs.iter().map(|z| (*z).to_string()).collect(),
        );
    }
    map
}

fn default_negation_cues_en() -> Vec<String> {
    [
        "not",
        "without",
        "rarely",
        "usually",
        "often",
        "sometimes",
        "absent",
        "lacking",
        "except",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

fn default_negation_cues_zh() -> Vec<String> {
    [
        "不",
        "无",
        "未",
        "非",
        "缺",
        "没有",
        "罕",
        "稀",
        "很少",
        "常",
        "通常",
        "一般",
        "除外",
        "而非",
        "而不是",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages: the rule set is written for an EN->ZH pair
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if !crate::language_utils::language_codes_match(&self.source_language, "en") {
            return Err(anyhow!(
                "Source language must be English, got '{}'",
                self.source_language
            ));
        }
        if !crate::language_utils::language_codes_match(&self.target_language, "zh") {
            return Err(anyhow!(
                "Target language must be Chinese, got '{}'",
                self.target_language
            ));
        }

        if self.engine.max_concurrent_units == 0 {
            return Err(anyhow!("engine.max_concurrent_units must be at least 1"));
        }

        if self.checks.check_units && self.checks.unit_map.is_empty() {
            return Err(anyhow!("Unit check enabled but unit_map is empty"));
        }

        if self.checks.check_negation
            && (self.checks.negation_cues_source.is_empty()
                || self.checks.negation_cues_target.is_empty())
        {
            return Err(anyhow!(
                "Negation check enabled but a negation cue list is empty"
            ));
        }

        if self.term_recall.min_ngram_words == 0
            || self.term_recall.max_ngram_words < self.term_recall.min_ngram_words
        {
            return Err(anyhow!(
                "Invalid n-gram window: min {} max {}",
                self.term_recall.min_ngram_words,
                self.term_recall.max_ngram_words
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            checks: CheckConfig::default(),
            term_recall: TermRecallConfig::default(),
            names: NameCheckConfig::default(),
            engine: EngineConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
