/*!
 * Per-unit QA checks.
 *
 * Three independent check families run against each translation unit:
 * - `critical`: entity-level fidelity (numbers, ranges, units, negation,
 *   symbols, italic-marked binomials) between the source and target bags
 * - `term_recall`: glossary-term coverage in the target text
 * - `name_verifier`: person-name fidelity on the verifiable subset
 *
 * Each family reads only its unit plus the immutable knowledge bases and
 * produces a self-contained result struct; the engine stitches them into
 * row-wise output.
 */

pub mod critical;
pub mod name_verifier;
pub mod term_recall;

// Re-export main types
pub use critical::{CheckKind, CheckOutcome, CriticalChecker, CriticalReport};
pub use name_verifier::{NameCheckResult, NameStatus, NameVerifier};
pub use term_recall::{TermRecallEvaluator, TermRecallResult};
