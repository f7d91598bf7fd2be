/*!
 * Tests for corpus loading and unit records
 */

use floraqa::corpus::{Corpus, UnitKind};

#[test]
fn test_parseJson_keyRecords_shouldLoadInOrder() {
    let json = r#"[
        {"unit_id": "k1", "source_text": "Leaves alternate", "target_text": "叶互生"},
        {"unit_id": "k2", "source_text": "Leaves opposite", "target_text": "叶对生"}
    ]"#;

    let units = Corpus::parse_json(UnitKind::Key, json).unwrap();

    assert_eq!(units.len(), 2);
    assert_eq!(units[0].unit_id, "k1");
    assert_eq!(units[1].unit_id, "k2");
    assert!(units.iter().all(|u| u.unit_kind == UnitKind::Key));
}

#[test]
fn test_parseJson_descriptionRecords_shouldKeepCategory() {
    let json = r#"[
        {"unit_id": "d1", "category": "Habit", "source_text": "Shrubs.", "target_text": "灌木。"}
    ]"#;

    let units = Corpus::parse_json(UnitKind::Description, json).unwrap();

    assert_eq!(units[0].category.as_deref(), Some("Habit"));
}

#[test]
fn test_parseJson_missingTargetText_shouldDefaultToEmpty() {
    let json = r#"[{"unit_id": "d1", "source_text": "Herbs."}]"#;

    let units = Corpus::parse_json(UnitKind::Description, json).unwrap();

    assert_eq!(units[0].target_text, "");
    assert!(!units[0].is_translated());
}

#[test]
fn test_parseJson_missingUnitId_shouldFailWholeParse() {
    let json = r#"[
        {"unit_id": "d1", "source_text": "Herbs."},
        {"source_text": "Shrubs."}
    ]"#;

    assert!(Corpus::parse_json(UnitKind::Description, json).is_err());
}

#[test]
fn test_parseJson_notAnArray_shouldError() {
    assert!(Corpus::parse_json(UnitKind::Key, r#"{"unit_id": "k1"}"#).is_err());
    assert!(Corpus::parse_json(UnitKind::Key, "not json").is_err());
}

#[test]
fn test_corpus_extend_shouldMixKinds() {
    let keys = Corpus::parse_json(
        UnitKind::Key,
        r#"[{"unit_id": "k1", "source_text": "a"}]"#,
    )
    .unwrap();
    let descs = Corpus::parse_json(
        UnitKind::Description,
        r#"[{"unit_id": "d1", "source_text": "b"}]"#,
    )
    .unwrap();

    let mut corpus = Corpus::new();
    corpus.extend(keys);
    corpus.extend(descs);

    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.units_of_kind(UnitKind::Key).count(), 1);
    assert_eq!(corpus.units_of_kind(UnitKind::Description).count(), 1);
}
