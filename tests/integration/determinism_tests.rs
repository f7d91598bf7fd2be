/*!
 * Determinism tests: identical inputs must yield byte-identical tables,
 * independent of concurrency degree and completion order
 */

use chrono::TimeZone;
use floraqa::app_config::Config;
use floraqa::qa_service::QaService;
use floraqa::report::QaReport;

use crate::common::{desc_unit, key_unit, sample_authority, sample_glossary};
use floraqa::corpus::Corpus;

/// A corpus large enough that concurrent completion order actually varies
fn big_corpus() -> Corpus {
    let mut units = Vec::new();
    for i in 0..40 {
        units.push(key_unit(
            &format!("k{}", i),
            &format!("Leaf blade {}-{} cm, petals {}", i, i + 2, i % 7),
            &format!("叶片{}-{}厘米，花瓣{}", i, i + 2, i % 7),
        ));
        units.push(desc_unit(
            &format!("d{}", i),
            if i % 2 == 0 { "Habit" } else { "Fruit" },
            "Branchlets pubescent, not glabrous.",
            if i % 3 == 0 { "小枝被毛，无毛。" } else { "小枝具毛，无毛。" },
        ));
    }
    Corpus::from_units(units)
}

async fn serialized_report(max_concurrent: usize) -> String {
    let mut config = Config::default();
    config.engine.max_concurrent_units = max_concurrent;

    let service = QaService::with_config(config.clone());
    let outcome = service
        .run(&big_corpus(), sample_glossary(), sample_authority(), |_, _| {})
        .await
        .unwrap();

    // a pinned timestamp keeps metadata out of the comparison
    let fixed_time = chrono::Local.timestamp_opt(0, 0).single().unwrap();
    let report = QaReport::build(
        &outcome,
        &config,
        &sample_glossary(),
        &sample_authority(),
        fixed_time,
    );

    serde_json::to_string_pretty(&report).unwrap()
}

#[tokio::test]
async fn test_engine_runTwice_shouldBeByteIdentical() {
    let first = serialized_report(8).await;
    let second = serialized_report(8).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_engine_sequentialAndParallel_shouldAgree() {
    let sequential = serialized_report(1).await;
    let parallel = serialized_report(16).await;

    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_engine_driftCounts_independentOfOrder() {
    let service = QaService::with_config(Config::default());

    let outcome = service
        .run(&big_corpus(), sample_glossary(), sample_authority(), |_, _| {})
        .await
        .unwrap();

    // 14 units render pubescent as 被毛 (i % 3 == 0), 26 as 具毛
    assert_eq!(outcome.term_drift.len(), 1);
    let entry = &outcome.term_drift[0];
    assert_eq!(entry.term_en, "pubescent");
    assert_eq!(entry.total_occurrences, 40);
    assert_eq!(entry.variants[0].variant, "具毛");
    assert_eq!(entry.variants[0].count, 26);
    assert_eq!(entry.variants[1].variant, "被毛");
    assert_eq!(entry.variants[1].count, 14);
}
