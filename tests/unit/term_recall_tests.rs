/*!
 * Tests for glossary term-recall evaluation
 */

use floraqa::app_config::TermRecallConfig;
use floraqa::checks::term_recall::TermRecallEvaluator;

use crate::common::make_glossary;

fn evaluator() -> TermRecallEvaluator {
    TermRecallEvaluator::with_config(TermRecallConfig::default())
}

#[test]
fn test_evaluate_sepalExample_shouldContributeFullRecall() {
    let glossary = make_glossary(&[("sepal", &["萼片"])]);

    let result = evaluator().evaluate(&glossary, "sepal ovate", "萼片卵形");

    assert_eq!(result.hits, 1);
    assert_eq!(result.passed, 1);
    assert_eq!(result.recall, Some(1.0));
}

#[test]
fn test_evaluate_caseInsensitiveHit() {
    let glossary = make_glossary(&[("sepal", &["萼片"])]);

    let result = evaluator().evaluate(&glossary, "Sepal ovate.", "萼片卵形。");

    assert_eq!(result.hits, 1);
}

#[test]
fn test_evaluate_wordBoundary_shouldNotHitInsideWords() {
    let glossary = make_glossary(&[("ovate", &["卵形"])]);

    // "obovate" must not register a hit for "ovate"
    let result = evaluator().evaluate(&glossary, "leaf obovate", "叶倒卵形");

    assert_eq!(result.hits, 0);
}

#[test]
fn test_evaluate_hyphenVariant_shouldHit() {
    let glossary = make_glossary(&[("leaf blade", &["叶片"])]);

    let result = evaluator().evaluate(&glossary, "leaf-blade oblong", "叶片长圆形");

    assert_eq!(result.hits, 1);
    assert_eq!(result.passed, 1);
}

#[test]
fn test_evaluate_longestTermStillFound_underCap() {
    let glossary = make_glossary(&[
        ("apex", &["先端"]),
        ("leaf blade apex acuminate margin", &["长术语"]),
    ]);

    let result = evaluator().evaluate(
        &glossary,
        "leaf blade apex acuminate margin serrate",
        "长术语，先端渐尖",
    );

    assert_eq!(result.hits, 2);
    assert_eq!(result.passed, 2);
}

#[test]
fn test_evaluate_multipleAcceptedVariants_anyOneSuffices() {
    let glossary = make_glossary(&[("pubescent", &["被毛", "具毛"])]);

    let first = evaluator().evaluate(&glossary, "pubescent", "小枝被毛");
    let second = evaluator().evaluate(&glossary, "pubescent", "小枝具毛");
    let neither = evaluator().evaluate(&glossary, "pubescent", "小枝光滑");

    assert_eq!(first.passed, 1);
    assert_eq!(second.passed, 1);
    assert_eq!(neither.passed, 0);
    assert_eq!(neither.missing, vec!["pubescent".to_string()]);
}

#[test]
fn test_evaluate_foundMap_recordsWhichVariantMatched() {
    let glossary = make_glossary(&[("pubescent", &["被毛", "具毛"])]);

    let result = evaluator().evaluate(&glossary, "branchlets pubescent", "小枝具毛");

    assert_eq!(
        result.found.get("pubescent").unwrap(),
        &vec!["具毛".to_string()]
    );
}

#[test]
fn test_evaluate_repeatedTermInText_countsOnce() {
    let glossary = make_glossary(&[("petal", &["花瓣"])]);

    let result = evaluator().evaluate(&glossary, "petal white, petal obovate", "花瓣白色，倒卵形");

    assert_eq!(result.hits, 1);
}
