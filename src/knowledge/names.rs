/*!
 * Person-name authority file.
 *
 * Botanical author citations appear in source text as full names
 * ("Wang, Bin"), standard abbreviations ("W. B. Liao") or abbreviations
 * with the internal spaces dropped ("W.B.Liao"). The authority maps each
 * of those English forms to one entry; entries carrying a Chinese rendering
 * form the verifiable subset the name check runs against.
 */

use std::collections::HashMap;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::corpus::normalize_whitespace;
use crate::errors::KnowledgeBaseError;

/// Regex for characters dropped when normalizing a full name
static NON_LETTER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z ]").expect("Invalid letter filter regex"));

/// Placeholder strings the source authority file uses for "no Chinese name"
const CN_PLACEHOLDERS: &[&str] = &["【空】", "?", "？"];

/// One authority record as loaded from disk
#[derive(Debug, Clone, Deserialize)]
pub struct NameRecord {
    /// Family name, informational only
    #[serde(default)]
    pub family_name: Option<String>,

    /// Given name, informational only
    #[serde(default)]
    pub given_name: Option<String>,

    /// Full English name, e.g. "Wang, Bin"
    pub full_name_en: String,

    /// Standard author abbreviation, e.g. "W. B. Liao"
    #[serde(default)]
    pub standard_abbreviation: Option<String>,

    /// Chinese rendering; placeholders are treated as absent
    #[serde(default)]
    pub chinese_name: Option<String>,
}

/// One entry of the built authority
#[derive(Debug, Clone)]
pub struct NameEntry {
    /// Full English name as loaded
    pub full_name_en: String,

    /// Chinese rendering when known
    pub chinese_name: Option<String>,
}

impl NameEntry {
    /// Whether the name check can be run against this entry
    pub fn is_verifiable(&self) -> bool {
        self.chinese_name.is_some()
    }
}

/// Normalize a person-name string to lowercase letters and single spaces
pub fn normalize_person_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let letters_only = NON_LETTER_REGEX.replace_all(&lowered, " ");
    normalize_whitespace(&letters_only)
}

/// Normalize an abbreviation for lookup: drop all whitespace and any
/// trailing period, which in running text doubles as sentence punctuation
pub fn squash_abbreviation(abbr: &str) -> String {
    let squashed: String = abbr.chars().filter(|c| !c.is_whitespace()).collect();
    squashed.trim_end_matches('.').to_string()
}

/// Read-only person-name lookup structure
#[derive(Debug, Default)]
pub struct NameAuthority {
    entries: Vec<NameEntry>,

    /// Normalized full name -> entry index
    fullname_index: HashMap<String, usize>,

    /// Normalized abbreviation -> entry index
    abbr_index: HashMap<String, usize>,

    /// Longest full-name key in words, bounding candidate n-grams
    max_full_name_words: usize,
}

impl NameAuthority {
    /// Create an empty authority; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the lookup structure from loaded records.
    ///
    /// Two distinct entries claiming the same lookup key make every match
    /// ambiguous, so that aborts the build rather than silently resolving
    /// to whichever record loaded last.
    pub fn build(records: &[NameRecord]) -> Result<Self, KnowledgeBaseError> {
        let mut authority = NameAuthority::default();

        for record in records {
            let chinese_name = record
                .chinese_name
                .as_deref()
                .map(normalize_whitespace)
                .filter(|cn| !cn.is_empty() && !CN_PLACEHOLDERS.contains(&cn.as_str()));

            let entry = NameEntry {
                full_name_en: normalize_whitespace(&record.full_name_en),
                chinese_name,
            };

            if entry.full_name_en.is_empty() {
                return Err(KnowledgeBaseError::MissingKey(format!(
                    "name record with abbreviation {:?}",
                    record.standard_abbreviation
                )));
            }

            let index = authority.entries.len();

            let fullname_key = normalize_person_name(&entry.full_name_en);
            if !fullname_key.is_empty() {
                Self::insert_key(
                    &mut authority.fullname_index,
                    &authority.entries,
                    fullname_key,
                    &entry.full_name_en,
                    index,
                )?;
            }

            if let Some(abbr) = record.standard_abbreviation.as_deref() {
                let abbr_key = squash_abbreviation(abbr);
                if !abbr_key.is_empty() {
                    Self::insert_key(
                        &mut authority.abbr_index,
                        &authority.entries,
                        abbr_key,
                        &entry.full_name_en,
                        index,
                    )?;
                }
            }

            authority.entries.push(entry);
        }

        authority.max_full_name_words = authority
            .fullname_index
            .keys()
            .map(|k| k.split(' ').count())
            .max()
            .unwrap_or(0);

        debug!(
            "Built name authority: {} entries, {} verifiable",
            authority.entries.len(),
            authority.verifiable_count()
        );

        Ok(authority)
    }

    // The entry at `index` is not pushed yet, so collisions always point at
    // an earlier entry.
    fn insert_key(
        map: &mut HashMap<String, usize>,
        entries: &[NameEntry],
        key: String,
        claimant: &str,
        index: usize,
    ) -> Result<(), KnowledgeBaseError> {
        if let Some(&existing) = map.get(&key) {
            if existing != index {
                return Err(KnowledgeBaseError::DuplicateKey {
                    key,
                    first: entries[existing].full_name_en.clone(),
                    second: claimant.to_string(),
                });
            }
        }
        map.insert(key, index);
        Ok(())
    }

    /// Look up an entry by normalized full name
    pub fn lookup_full_name(&self, normalized: &str) -> Option<usize> {
        self.fullname_index.get(normalized).copied()
    }

    /// Look up an entry by whitespace-stripped abbreviation
    pub fn lookup_abbreviation(&self, squashed: &str) -> Option<usize> {
        self.abbr_index.get(squashed).copied()
    }

    /// Entry by index
    pub fn entry(&self, index: usize) -> &NameEntry {
        &self.entries[index]
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the authority holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a known Chinese rendering
    pub fn verifiable_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_verifiable()).count()
    }

    /// Longest full-name key in words
    pub fn max_full_name_words(&self) -> usize {
        self.max_full_name_words
    }
}
