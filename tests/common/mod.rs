/*!
 * Common test utilities for the floraqa test suite
 */

use std::sync::Arc;

use floraqa::corpus::{Corpus, TranslationUnit, UnitKind};
use floraqa::knowledge::glossary::GlossaryRecord;
use floraqa::knowledge::names::NameRecord;
use floraqa::knowledge::{NameAuthority, TermGlossary};

/// Build a key unit
pub fn key_unit(id: &str, source: &str, target: &str) -> TranslationUnit {
    TranslationUnit::new(id, UnitKind::Key, None, source, target)
}

/// Build a description unit with a category
pub fn desc_unit(id: &str, category: &str, source: &str, target: &str) -> TranslationUnit {
    TranslationUnit::new(
        id,
        UnitKind::Description,
        Some(category.to_string()),
        source,
        target,
    )
}

/// Build a glossary from (EN term, accepted CN renderings) pairs
pub fn make_glossary(entries: &[(&str, &[&str])]) -> Arc<TermGlossary> {
    let records: Vec<GlossaryRecord> = entries
        .iter()
        .map(|(en, zhs)| GlossaryRecord {
            term_en: (*en).to_string(),
            term_zh_variants: zhs.iter().map(|z| (*z).to_string()).collect(),
            definition_en: None,
            definition_zh: None,
        })
        .collect();
    Arc::new(TermGlossary::build(&records))
}

/// Build a name authority from (full name, abbreviation, Chinese name) rows
pub fn make_authority(entries: &[(&str, Option<&str>, Option<&str>)]) -> Arc<NameAuthority> {
    let records: Vec<NameRecord> = entries
        .iter()
        .map(|(full, abbr, cn)| NameRecord {
            family_name: None,
            given_name: None,
            full_name_en: (*full).to_string(),
            standard_abbreviation: abbr.map(|s| s.to_string()),
            chinese_name: cn.map(|s| s.to_string()),
        })
        .collect();
    Arc::new(NameAuthority::build(&records).expect("test authority must build"))
}

/// A small mixed corpus exercising every check family
pub fn sample_corpus() -> Corpus {
    Corpus::from_units(vec![
        key_unit("k1", "Leaf blade 3-5 cm, petals 4", "叶片3-5厘米，花瓣4"),
        key_unit("k2", "Fruit not pubescent", "果实被毛"),
        key_unit("k3", "Sepals ovate", ""),
        desc_unit(
            "d1",
            "Habit",
            "Shrubs to 2 m tall, branchlets pubescent.",
            "灌木高达2米，小枝被毛。",
        ),
        desc_unit(
            "d2",
            "Taxonomy",
            "Close to <i>Rosa rugosa</i>, described by Wang, Bin.",
            "近似于Rosa rugosa，由王斌描述。",
        ),
        desc_unit("d3", "Synonym", "Rosa ferox auct., non Lawrance.", "某异名。"),
    ])
}

/// The glossary matching the sample corpus
pub fn sample_glossary() -> Arc<TermGlossary> {
    make_glossary(&[
        ("sepals", &["萼片"]),
        ("petals", &["花瓣"]),
        ("pubescent", &["被毛", "具毛"]),
        ("leaf blade", &["叶片"]),
    ])
}

/// The name authority matching the sample corpus
pub fn sample_authority() -> Arc<NameAuthority> {
    make_authority(&[
        ("Wang, Bin", Some("B. Wang"), Some("王斌")),
        ("Smith, John", Some("J. Sm."), None),
    ])
}
