/*!
 * # FloraQA - reference-free QA for EN->ZH botanical translations
 *
 * A Rust library for auditing machine-translated botanical text (English
 * source, Chinese target) against domain knowledge bases, without any human
 * reference translation.
 *
 * ## Features
 *
 * - Entity extraction from key and description text (numbers, ranges,
 *   measurement units, negation cues, symbols, italic-marked binomials)
 * - Critical fidelity checks between source and target entity bags
 * - Glossary-driven term-recall scoring
 * - Person-name verification against an authority file
 * - Corpus-wide term-drift detection
 * - KPI aggregation, corpus-wide and per category
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `corpus`: Translation unit records and corpus loading
 * - `knowledge`: Read-only knowledge bases:
 *   - `knowledge::glossary`: Morphology term glossary
 *   - `knowledge::names`: Person-name authority
 * - `extraction`: Markup-tolerant entity extraction
 * - `checks`: Per-unit check families:
 *   - `checks::critical`: Critical fidelity checks
 *   - `checks::term_recall`: Glossary term recall
 *   - `checks::name_verifier`: Person-name verification
 * - `analysis`: Corpus-wide reductions (term drift, KPIs)
 * - `report`: Serializable output tables
 * - `qa_service`: Engine orchestration (fan-out, barrier, aggregation)
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod analysis;
pub mod app_config;
pub mod app_controller;
pub mod checks;
pub mod corpus;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod knowledge;
pub mod language_utils;
pub mod qa_service;
pub mod report;

// Re-export main types for easier usage
pub use app_config::{Config, CriticalPassPolicy};
pub use corpus::{Corpus, TranslationUnit, UnitKind};
pub use errors::{AppError, CorpusError, KnowledgeBaseError};
pub use knowledge::{NameAuthority, TermGlossary};
pub use qa_service::{QaOutcome, QaService, UnitScore};
pub use report::QaReport;
