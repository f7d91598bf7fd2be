/*!
 * End-to-end audit workflow tests: JSON inputs in, JSON report out
 */

use floraqa::app_config::Config;
use floraqa::app_controller::{AuditPaths, Controller};
use floraqa::file_utils::FileManager;
use serde_json::Value;
use std::path::PathBuf;

fn write(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    FileManager::write_string(&path, content).unwrap();
    path
}

const KEYS_JSON: &str = r#"[
    {"unit_id": "k1", "source_text": "Leaves 3-5 cm, petals 4", "target_text": "叶片3-5厘米，花瓣4"},
    {"unit_id": "k2", "source_text": "Fruit not pubescent", "target_text": "果实被毛"},
    {"unit_id": "k3", "source_text": "Sepals ovate", "target_text": ""}
]"#;

const DESCS_JSON: &str = r#"[
    {"unit_id": "d1", "category": "Taxonomy",
     "source_text": "Close to <i>Rosa rugosa</i>, described by Wang, Bin.",
     "target_text": "近似于Rosa rugosa，由李明描述。"},
    {"unit_id": "d2", "category": "Synonym",
     "source_text": "Rosa ferox auct.", "target_text": "异名。"}
]"#;

const GLOSSARY_JSON: &str = r#"[
    {"term_en": "pubescent", "term_zh_variants": ["被毛", "具毛"]},
    {"term_en": "petals", "term_zh_variants": ["花瓣"], "definition_en": "flower part"}
]"#;

const NAMES_JSON: &str = r#"[
    {"full_name_en": "Wang, Bin", "standard_abbreviation": "B. Wang", "chinese_name": "王斌"},
    {"full_name_en": "Smith, John", "chinese_name": "【空】"}
]"#;

async fn run_audit(dir: &std::path::Path) -> Value {
    let paths = AuditPaths {
        keys: Some(write(dir, "keys.json", KEYS_JSON)),
        descriptions: Some(write(dir, "descs.json", DESCS_JSON)),
        glossary: Some(write(dir, "glossary.json", GLOSSARY_JSON)),
        names: Some(write(dir, "names.json", NAMES_JSON)),
        out: dir.join("report.json"),
    };

    let controller = Controller::with_config(Config::default()).unwrap();
    controller.run(&paths, true).await.unwrap();

    let content = FileManager::read_to_string(&paths.out).unwrap();
    serde_json::from_str(&content).unwrap()
}

#[tokio::test]
async fn test_auditWorkflow_shouldEmitAllReportTables() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path()).await;

    for table in [
        "metadata",
        "kpi_summary",
        "kpi_by_category",
        "key_rowwise",
        "desc_rowwise",
        "top_issues_key",
        "top_issues_desc",
        "name_issues",
        "term_drift",
        "diagnostics",
    ] {
        assert!(report.get(table).is_some(), "missing table: {}", table);
    }

    assert_eq!(report["key_rowwise"].as_array().unwrap().len(), 3);
    assert_eq!(report["desc_rowwise"].as_array().unwrap().len(), 2);
    assert_eq!(report["diagnostics"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_auditWorkflow_rowFlags_shouldMatchExpectations() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path()).await;

    let key_rows = report["key_rowwise"].as_array().unwrap();

    // k1: everything preserved
    assert_eq!(key_rows[0]["unit_id"], "k1");
    assert_eq!(key_rows[0]["critical_pass"], true);
    assert_eq!(key_rows[0]["term_hits"], 1);

    // k2: negation dropped
    assert_eq!(key_rows[1]["critical_flags"], "NEGATION_CUE");
    assert_eq!(key_rows[1]["critical_pass"], false);

    // k3: untranslated
    assert_eq!(key_rows[2]["critical_flags"], "UNTRANSLATED");
    assert_eq!(key_rows[2]["translated"], false);

    let desc_rows = report["desc_rowwise"].as_array().unwrap();
    assert_eq!(desc_rows[1]["critical_flags"], "OUT_OF_SCOPE");
    assert_eq!(desc_rows[1]["in_scope"], false);
}

#[tokio::test]
async fn test_auditWorkflow_topIssues_shouldListFailingRows() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path()).await;

    let top_key = report["top_issues_key"].as_array().unwrap();
    assert_eq!(top_key.len(), 1);
    assert_eq!(top_key[0]["unit_id"], "k2");
    assert_eq!(top_key[0]["critical_flags"], "NEGATION_CUE");
}

#[tokio::test]
async fn test_auditWorkflow_nameIssues_shouldListFailedVerifiableRows() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path()).await;

    // d1 mentions Wang, Bin but the target credits 李明 instead
    let name_issues = report["name_issues"].as_array().unwrap();
    assert_eq!(name_issues.len(), 1);
    assert_eq!(name_issues[0]["unit_id"], "d1");
    assert_eq!(name_issues[0]["expected_missing"][0], "王斌");

    let desc_rows = report["desc_rowwise"].as_array().unwrap();
    assert_eq!(desc_rows[0]["name_status"], "FAIL");
    assert_eq!(desc_rows[0]["name_verifiable"], 1);
}

#[tokio::test]
async fn test_auditWorkflow_kpiSummary_shouldReflectRates() {
    let dir = tempfile::tempdir().unwrap();
    let report = run_audit(dir.path()).await;

    let kpi = report["kpi_summary"].as_array().unwrap();
    assert_eq!(kpi[0]["block"], "Key");
    assert_eq!(kpi[0]["n_rows"], 3);

    let translated_rate = kpi[0]["translated_rate"].as_f64().unwrap();
    assert!((translated_rate - 2.0 / 3.0).abs() < 1e-9);

    // description block: the synonym row is out of scope
    assert_eq!(kpi[1]["block"], "Description");
    assert_eq!(kpi[1]["n_rows"], 1);

    let name_accuracy = kpi[1]["name_accuracy_on_verifiable_rows"].as_f64().unwrap();
    assert!((name_accuracy - 0.0).abs() < 1e-9);
}

#[test]
fn test_auditWorkflow_metadata_shouldCountVerifiableEntries() {
    let dir = tempfile::tempdir().unwrap();
    let report = tokio_test::block_on(run_audit(dir.path()));

    // the placeholder Chinese name is not verifiable
    assert_eq!(report["metadata"]["authority_entries"], 2);
    assert_eq!(report["metadata"]["verifiable_entries"], 1);
}

#[tokio::test]
async fn test_auditWorkflow_withoutKnowledgeBases_shouldStillComplete() {
    let dir = tempfile::tempdir().unwrap();
    let paths = AuditPaths {
        keys: Some(write(dir.path(), "keys.json", KEYS_JSON)),
        descriptions: None,
        glossary: None,
        names: None,
        out: dir.path().join("report.json"),
    };

    let controller = Controller::with_config(Config::default()).unwrap();
    controller.run(&paths, true).await.unwrap();

    let report: Value =
        serde_json::from_str(&FileManager::read_to_string(&paths.out).unwrap()).unwrap();

    assert_eq!(report["metadata"]["glossary_terms"], 0);
    assert_eq!(report["metadata"]["verifiable_entries"], 0);

    // no glossary: no hits anywhere, mean recall absent
    let kpi = report["kpi_summary"].as_array().unwrap();
    assert!(kpi[0]["mean_term_recall_when_hit"].is_null());
}

#[tokio::test]
async fn test_auditWorkflow_duplicateAuthorityKeys_shouldAbort() {
    let dir = tempfile::tempdir().unwrap();
    let names = write(
        dir.path(),
        "names.json",
        r#"[
            {"full_name_en": "Wang, Bin", "chinese_name": "王斌"},
            {"full_name_en": "Wang; Bin", "chinese_name": "汪斌"}
        ]"#,
    );

    let paths = AuditPaths {
        keys: Some(write(dir.path(), "keys.json", KEYS_JSON)),
        descriptions: None,
        glossary: None,
        names: Some(names),
        out: dir.path().join("report.json"),
    };

    let controller = Controller::with_config(Config::default()).unwrap();
    let result = controller.run(&paths, true).await;

    assert!(result.is_err());
    assert!(!paths.out.exists());
}
