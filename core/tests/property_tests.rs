//! Generative tests for classification, sorting and merging
//!
//! - Totality: every string gets exactly one of the nine categories
//! - Case folding: ASCII case never changes the category
//! - First match: the category is the first group with a matching pattern
//! - Sort: rank ascending, then traffic descending, empty traffic last
//! - Merge: row counts and histograms add up, and the result stays sorted

use std::sync::LazyLock;

use kwtriage_core::{Category, KeywordRecord, RULES, RowSet, RuleSet, classify};
use proptest::prelude::*;
use regex::Regex;

const FRAGMENTS: &[&str] = &[
    "注册", "login", "LOGIN", "打不开", "下载", "APP", "api", "Key", "plus", "代充", "502",
    "Bad Gateway", "验证", "账号", "共享", "GPT-4", "gpt3.5", "免费", "模型", "随便", "怎么",
    "chatgpt", " ", "-",
];

/// The rule table compiled pattern by pattern, independent of `RuleSet`
static REFERENCE: LazyLock<Vec<(Category, Vec<Regex>)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|group| {
            let patterns = group.patterns.iter().map(|p| Regex::new(p).unwrap()).collect();
            (group.category, patterns)
        })
        .collect()
});

fn keyword_text() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..5)
            .prop_map(|parts| parts.concat()),
    ]
}

prop_compose! {
    fn keyword_row()
        (keyword in keyword_text(), traffic in prop::option::of(0.0f64..1_000_000.0))
        -> (String, Option<f64>)
    {
        (keyword, traffic)
    }
}

fn classified(name: &str, rows: &[(String, Option<f64>)]) -> RowSet {
    let headers = vec!["Keyword".to_string(), "Traffic".to_string()];
    let mut set = RowSet::new(name, headers, "关键词分类").unwrap();
    for (i, (keyword, traffic)) in rows.iter().enumerate() {
        let traffic = traffic.as_ref().map_or_else(String::new, ToString::to_string);
        set.push_fields(vec![keyword.clone(), traffic], i as u64 + 2).unwrap();
    }
    set.classify(RuleSet::builtin());
    set
}

fn rank(row: &KeywordRecord) -> u8 {
    row.category.map_or(u8::MAX, |c| c.rank())
}

fn check_sorted(set: &RowSet) -> Result<(), TestCaseError> {
    for pair in set.rows().windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        prop_assert!(rank(a) <= rank(b), "rank {} before {}", rank(a), rank(b));
        if rank(a) == rank(b) {
            match (a.traffic, b.traffic) {
                (Some(x), Some(y)) => prop_assert!(x >= y, "traffic {x} before {y}"),
                (None, Some(y)) => prop_assert!(false, "empty traffic before {y}"),
                _ => {}
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_classify_is_total(keyword in any::<String>()) {
        let category = classify(&keyword);
        prop_assert!(Category::ALL.contains(&category));
    }

    #[test]
    fn prop_ascii_case_does_not_matter(keyword in "[ -~]{0,24}", suffix in keyword_text()) {
        let text = format!("{keyword}{suffix}");
        let lower = classify(&text.to_ascii_lowercase());
        prop_assert_eq!(classify(&text), lower);
        prop_assert_eq!(classify(&text.to_ascii_uppercase()), lower);
    }

    #[test]
    fn prop_first_matching_group_wins(keyword in keyword_text()) {
        let lowered = keyword.to_lowercase();
        let expected = REFERENCE
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|re| re.is_match(&lowered)))
            .map_or(Category::Other, |(category, _)| *category);
        prop_assert_eq!(classify(&keyword), expected);
    }

    #[test]
    fn prop_sort_orders_by_rank_then_traffic(
        rows in prop::collection::vec(keyword_row(), 0..40)
    ) {
        let mut set = classified("a.csv", &rows);
        set.sort();
        prop_assert_eq!(set.len(), rows.len());
        check_sorted(&set)?;

        let mut before: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        let mut after: Vec<&str> = set.rows().iter().map(|r| set.keyword(r)).collect();
        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    #[test]
    fn prop_merge_adds_up(
        first in prop::collection::vec(keyword_row(), 0..25),
        second in prop::collection::vec(keyword_row(), 0..25)
    ) {
        let mut first = classified("a.csv", &first);
        let mut second = classified("b.csv", &second);
        first.sort();
        second.sort();

        let merged = RowSet::merge("combined", &first, &second).unwrap();
        prop_assert_eq!(merged.len(), first.len() + second.len());
        prop_assert_eq!(merged.histogram(), first.histogram().merged(&second.histogram()));
        prop_assert_eq!(merged.histogram().total(), merged.len());
        check_sorted(&merged)?;
    }
}
