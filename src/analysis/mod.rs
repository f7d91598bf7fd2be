/*!
 * Corpus-wide analysis over per-unit results.
 *
 * Everything in this module runs strictly after the per-unit fan-out has
 * joined: term drift needs the full set of observed renderings, and the
 * KPI reductions need every row's flags. Neither stage mutates unit
 * results; both are pure reductions, so reruns over the same rows always
 * produce identical tables.
 */

pub mod drift;
pub mod kpi;

// Re-export main types
pub use drift::{DriftAccumulator, DriftEntry, VariantCount};
pub use kpi::{BlockSummary, KpiAggregator};
