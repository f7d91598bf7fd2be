/*!
 * Entity extraction from unit text.
 *
 * This module turns one text string into a structured bag of the critical
 * entities the fidelity checks compare:
 * - `markup`: tolerant scanner producing (text, is-italic) spans
 * - `entities`: numbers, ranges, unit tokens, negation cues, symbols and
 *   italic-marked binomials
 *
 * Extraction is a pure function of its input; the same text always yields
 * the same bag regardless of processing order.
 */

pub mod entities;
pub mod markup;

// Re-export main types
pub use entities::{EntityBag, EntityExtractor, TextLanguage};
pub use markup::{MarkupSpan, italic_regions, scan_spans, strip_markup};
