/*!
 * Tests for KPI aggregation over engine output
 */

use floraqa::app_config::{Config, CriticalPassPolicy};
use floraqa::qa_service::QaService;

use crate::common::{sample_authority, sample_corpus, sample_glossary};

async fn run_with(config: Config) -> floraqa::qa_service::QaOutcome {
    let service = QaService::with_config(config);
    service
        .run(&sample_corpus(), sample_glossary(), sample_authority(), |_, _| {})
        .await
        .unwrap()
}

#[tokio::test]
async fn test_kpiSummary_shouldHaveKeyAndDescriptionBlocks() {
    let outcome = run_with(Config::default()).await;

    assert_eq!(outcome.kpi_summary.len(), 2);
    assert_eq!(outcome.kpi_summary[0].block, "Key");
    assert_eq!(outcome.kpi_summary[1].block, "Description");
}

#[tokio::test]
async fn test_kpiSummary_translatedRate_countsEmptyTargets() {
    let outcome = run_with(Config::default()).await;

    // keys: k1, k2 translated; k3 untranslated
    let key_block = &outcome.kpi_summary[0];
    assert_eq!(key_block.n_rows, 3);
    let rate = key_block.translated_rate.unwrap();
    assert!((rate - 2.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_kpiSummary_descriptionBlock_excludesSkippedCategory() {
    let outcome = run_with(Config::default()).await;

    // d3 is a synonym row: out of scope
    let desc_block = &outcome.kpi_summary[1];
    assert_eq!(desc_block.n_rows, 2);
}

#[tokio::test]
async fn test_kpiSummary_meanTermRecall_onlyOverHitRows() {
    let outcome = run_with(Config::default()).await;

    // k1 hits "leaf blade"+"petals" (recall 1.0), k2 hits "pubescent"
    // (recall 1.0); untranslated k3 and hit-less d2 are excluded
    let key_block = &outcome.kpi_summary[0];
    assert_eq!(key_block.mean_term_recall_when_hit, Some(1.0));
}

#[tokio::test]
async fn test_kpiSummary_nameAccuracy_onlyOverVerifiableRows() {
    let outcome = run_with(Config::default()).await;

    let desc_block = &outcome.kpi_summary[1];
    assert_eq!(desc_block.name_verifiable_rows, 1);
    assert_eq!(desc_block.name_accuracy_on_verifiable_rows, Some(1.0));

    // keys carry no names at all
    let key_block = &outcome.kpi_summary[0];
    assert_eq!(key_block.name_verifiable_rows, 0);
    assert_eq!(key_block.name_accuracy_on_verifiable_rows, None);
}

#[tokio::test]
async fn test_kpiByCategory_descriptionsOnly_sortedBySize() {
    let outcome = run_with(Config::default()).await;

    let categories: Vec<&str> = outcome
        .kpi_by_category
        .iter()
        .map(|s| s.block.as_str())
        .collect();

    // synonym category is out of scope entirely
    assert!(!categories.contains(&"Synonym"));
    assert_eq!(categories.len(), 2);
    for summary in &outcome.kpi_by_category {
        assert_eq!(summary.n_rows, 1);
    }
}

#[tokio::test]
async fn test_kpi_criticalPassPolicy_changesDenominator() {
    let default_outcome = run_with(Config::default()).await;

    let mut counting_config = Config::default();
    counting_config.checks.critical_pass_policy = CriticalPassPolicy::CountNoCriticalAsPass;
    let counting_outcome = run_with(counting_config).await;

    // keys: k1 passes, k2 fails, and k3 carries no critical content at all:
    // excluded under the default policy, an untranslated non-pass under the
    // counting policy
    let default_rate = default_outcome.kpi_summary[0].critical_pass_rate.unwrap();
    let counting_rate = counting_outcome.kpi_summary[0].critical_pass_rate.unwrap();

    assert!((default_rate - 0.5).abs() < 1e-9);
    assert!((counting_rate - 1.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_kpi_entityPassRate_reflectsSymbolAndBinomialOnly() {
    let outcome = run_with(Config::default()).await;

    // d1: no symbols/binomials, translated -> entity pass
    // d2: binomial preserved -> entity pass
    let desc_block = &outcome.kpi_summary[1];
    assert_eq!(desc_block.entity_pass_rate, Some(1.0));
}
