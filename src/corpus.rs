use std::fmt;

use anyhow::{Context, Result, anyhow};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::CorpusError;

// @module: Translation unit corpus loading and access

/// Kind of translation unit being graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// One line of a taxonomic key
    Key,
    /// One description record
    Description,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Key => write!(f, "key"),
            UnitKind::Description => write!(f, "description"),
        }
    }
}

/// One source/target text pair to be graded.
///
/// Immutable once loaded; every derived record references exactly one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationUnit {
    /// Stable row identifier from the upstream workbook
    pub unit_id: String,

    /// Key line or description record
    pub unit_kind: UnitKind,

    /// Description category (key units carry none)
    #[serde(default)]
    pub category: Option<String>,

    /// English source text, possibly with inline markup
    pub source_text: String,

    /// Chinese target text, empty when untranslated
    #[serde(default)]
    pub target_text: String,
}

impl TranslationUnit {
    /// Creates a new unit - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(
        unit_id: impl Into<String>,
        unit_kind: UnitKind,
        category: Option<String>,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Self {
        TranslationUnit {
            unit_id: unit_id.into(),
            unit_kind,
            category,
            source_text: source_text.into(),
            target_text: target_text.into(),
        }
    }

    // @creates: Validated unit
    // @validates: Non-empty identifier
    pub fn new_validated(
        unit_id: impl Into<String>,
        unit_kind: UnitKind,
        category: Option<String>,
        source_text: impl Into<String>,
        target_text: impl Into<String>,
    ) -> Result<Self> {
        let unit_id = unit_id.into();
        if unit_id.trim().is_empty() {
            return Err(anyhow!("Unit record has an empty unit_id"));
        }

        Ok(TranslationUnit {
            unit_id,
            unit_kind,
            category,
            source_text: source_text.into(),
            target_text: target_text.into(),
        })
    }

    /// Whether the unit carries a nonempty translation
    pub fn is_translated(&self) -> bool {
        !normalize_whitespace(&self.target_text).is_empty()
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// On-disk unit record; the unit kind comes from which file it was loaded from
#[derive(Debug, Clone, Deserialize)]
struct UnitRecord {
    unit_id: String,
    #[serde(default)]
    category: Option<String>,
    source_text: String,
    #[serde(default)]
    target_text: String,
}

/// The full set of units for one run
#[derive(Debug, Default)]
pub struct Corpus {
    /// Units in load order; grading output preserves this order
    pub units: Vec<TranslationUnit>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Corpus { units: Vec::new() }
    }

    /// Create a corpus directly from units
    pub fn from_units(units: Vec<TranslationUnit>) -> Self {
        Corpus { units }
    }

    /// Parse a JSON array of unit records, assigning them the given kind.
    ///
    /// A record missing `unit_id` or `source_text` fails the whole parse:
    /// a schema-invalid corpus would make every downstream number silently
    /// wrong.
    pub fn parse_json(kind: UnitKind, content: &str) -> Result<Vec<TranslationUnit>> {
        let records: Vec<UnitRecord> = serde_json::from_str(content)
            .map_err(|e| CorpusError::ParseError(e.to_string()))
            .context("Unit records must be a JSON array")?;

        let mut units = Vec::with_capacity(records.len());
        for record in records {
            let unit = TranslationUnit::new_validated(
                record.unit_id,
                kind,
                record.category,
                record.source_text,
                record.target_text,
            )
            .map_err(|e| CorpusError::InvalidRecord(e.to_string()))?;
            units.push(unit);
        }

        debug!("Parsed {} {} unit(s)", units.len(), kind);
        Ok(units)
    }

    /// Append units of one kind
    pub fn extend(&mut self, units: Vec<TranslationUnit>) {
        self.units.extend(units);
    }

    /// Number of units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether the corpus holds no units
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units of a given kind, in load order
    pub fn units_of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &TranslationUnit> {
        self.units.iter().filter(move |u| u.unit_kind == kind)
    }
}
