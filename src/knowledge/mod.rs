/*!
 * Knowledge bases backing the QA checks.
 *
 * Two lookup structures are built once per run and shared read-only:
 * - `glossary`: morphology term glossary (EN term -> accepted CN renderings)
 * - `names`: person-name authority (EN forms -> Chinese rendering)
 *
 * Both are explicitly constructed and passed into the components that need
 * them; nothing in here is mutable after construction, which is what makes
 * the unit-level fan-out in the engine safe without locking.
 */

pub mod glossary;
pub mod names;

// Re-export main types
pub use glossary::{GlossaryRecord, TermGlossary};
pub use names::{NameAuthority, NameRecord};
