//! Keyword classification
//!
//! Ordered, first-match-wins pattern matching of keyword text into the fixed
//! [`Category`] taxonomy. Groups are tried in rank order; inside a group every
//! pattern is an unanchored regex search over the lower-cased keyword. A
//! keyword that matches groups 1 and 8 is group 1, always.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::taxonomy::Category;

/// One priority group of the rule table
#[derive(Debug, Clone, Copy)]
pub struct RuleGroup {
    pub category: Category,
    pub patterns: &'static [&'static str],
}

/// Built-in rule table, in priority order. `Other` has no patterns; it is
/// the fallback.
pub const RULES: &[RuleGroup] = &[
    RuleGroup {
        category: Category::Registration,
        patterns: &[
            r"注册",
            r"register",
            r"账号创建",
            r"开通",
            r"怎么.*注册",
            r"如何.*注册",
        ],
    },
    RuleGroup {
        category: Category::LoginUsage,
        patterns: &[
            r"登录",
            r"login",
            r"用不了",
            r"打不开",
            r"无法访问",
            r"进不去",
            r"登陆",
            r"无法.*使用",
            r"不能.*用",
            r"访问.*不了",
            r"突然.*进不去",
        ],
    },
    RuleGroup {
        category: Category::DownloadInstall,
        patterns: &[
            r"下载",
            r"download",
            r"安装",
            r"app",
            r"apk",
            r"安装包",
            r"客户端",
            r"ios.*安装",
            r"android",
            r"安卓",
            r"中文.*版",
        ],
    },
    RuleGroup {
        category: Category::ApiServices,
        patterns: &[
            r"api",
            r"接口",
            r"调用",
            r"key",
            r"购买.*api",
            r"api.*购买",
            r"api.*key",
            r"openai.*api",
            r"gpt.*api",
            r"免费.*api",
        ],
    },
    RuleGroup {
        category: Category::PlusMembership,
        patterns: &[
            r"plus",
            r"订阅",
            r"会员",
            r"购买",
            r"充值",
            r"代充",
            r"代.*充",
            r"plus.*购买",
            r"购买.*plus",
            r"信用卡",
            r"支付",
            r"虚拟.*信用卡",
        ],
    },
    RuleGroup {
        category: Category::TechnicalIssues,
        patterns: &[
            r"502",
            r"503",
            r"bad.*gateway",
            r"unable.*to.*load",
            r"something.*went.*wrong",
            r"验证.*真人",
            r"cloudflare.*验证",
            r"error",
            r"错误",
            r"验证.*循环",
            r"一直.*验证",
            r"转圈",
            r"响应.*时间.*过.*长",
            r"ssl.*错误",
            r"unusual.*activity",
        ],
    },
    RuleGroup {
        category: Category::AccountManagement,
        patterns: &[
            r"账号",
            r"共享",
            r"封号",
            r"被.*封",
            r"deactivated",
            r"账号.*共享",
            r"共享.*账号",
            r"账号.*购买",
            r"购买.*账号",
            r"被.*拒绝",
            r"被.*标记.*滥用",
        ],
    },
    RuleGroup {
        category: Category::ModelFeatures,
        patterns: &[
            r"gpt-?4",
            r"gpt-?4o",
            r"gpt-?3\.?5",
            r"turbo",
            r"免费",
            r"功能",
            r"区别",
            r"模型",
            r"版本",
            r"限制",
            r"使用.*次数",
            r"什么.*是",
            r"是.*什么",
            r"o1",
            r"插件",
            r"sora",
        ],
    },
];

/// Category used when no group matches
pub const FALLBACK: Category = Category::Other;

/// A rule pattern that failed to compile
#[derive(Debug, Error)]
#[error("invalid pattern `{pattern}` for {category}")]
pub struct PatternError {
    pub category: Category,
    pub pattern: &'static str,
    #[source]
    pub source: regex::Error,
}

/// Outcome of classifying one keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: Category,
    /// Pattern that decided the category; `None` for the fallback
    pub matched_pattern: Option<&'static str>,
}

#[derive(Debug)]
struct CompiledPattern {
    source: &'static str,
    regex: Regex,
}

#[derive(Debug)]
struct CompiledGroup {
    category: Category,
    patterns: Vec<CompiledPattern>,
}

/// Compiled, ordered rule table
#[derive(Debug)]
pub struct RuleSet {
    groups: Vec<CompiledGroup>,
}

static BUILTIN: LazyLock<RuleSet> = LazyLock::new(|| match RuleSet::compile(RULES) {
    Ok(rules) => rules,
    Err(err) => {
        tracing::error!(
            error = %err,
            "built-in rule table failed to compile; skipping bad patterns"
        );
        RuleSet::compile_skipping_invalid(RULES)
    }
});

impl RuleSet {
    /// The process-wide rule set built from [`RULES`], compiled on first use
    pub fn builtin() -> &'static RuleSet {
        &BUILTIN
    }

    /// Compile a rule table, failing on the first invalid pattern
    pub fn compile(rules: &[RuleGroup]) -> Result<Self, PatternError> {
        let mut groups = Vec::with_capacity(rules.len());
        for group in rules {
            let mut patterns = Vec::with_capacity(group.patterns.len());
            for &pattern in group.patterns {
                let regex = Regex::new(pattern).map_err(|source| PatternError {
                    category: group.category,
                    pattern,
                    source,
                })?;
                patterns.push(CompiledPattern {
                    source: pattern,
                    regex,
                });
            }
            groups.push(CompiledGroup {
                category: group.category,
                patterns,
            });
        }
        Ok(Self { groups })
    }

    fn compile_skipping_invalid(rules: &[RuleGroup]) -> Self {
        let groups = rules
            .iter()
            .map(|group| CompiledGroup {
                category: group.category,
                patterns: group
                    .patterns
                    .iter()
                    .filter_map(|&pattern| match Regex::new(pattern) {
                        Ok(regex) => Some(CompiledPattern {
                            source: pattern,
                            regex,
                        }),
                        Err(err) => {
                            tracing::warn!(pattern, error = %err, "skipping invalid pattern");
                            None
                        }
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    /// Number of compiled patterns across all groups
    pub fn pattern_count(&self) -> usize {
        self.groups.iter().map(|g| g.patterns.len()).sum()
    }

    /// Classify with the matched pattern attached
    pub fn classify_detailed(&self, keyword: &str) -> Classification {
        let keyword_lower = keyword.to_lowercase();

        for group in &self.groups {
            if let Some(hit) = group
                .patterns
                .iter()
                .find(|p| p.regex.is_match(&keyword_lower))
            {
                return Classification {
                    category: group.category,
                    matched_pattern: Some(hit.source),
                };
            }
        }

        Classification {
            category: FALLBACK,
            matched_pattern: None,
        }
    }

    pub fn classify(&self, keyword: &str) -> Category {
        self.classify_detailed(keyword).category
    }
}

/// Classify a keyword with the built-in rules
pub fn classify(keyword: &str) -> Category {
    RuleSet::builtin().classify(keyword)
}

/// Classify a keyword with the built-in rules, reporting the matched pattern
pub fn classify_detailed(keyword: &str) -> Classification {
    RuleSet::builtin().classify_detailed(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_compile() {
        let rules = RuleSet::compile(RULES).unwrap();
        let expected: usize = RULES.iter().map(|g| g.patterns.len()).sum();
        assert_eq!(rules.pattern_count(), expected);
        assert_eq!(RuleSet::builtin().pattern_count(), expected);
    }

    #[test]
    fn test_rule_table_follows_rank_order() {
        let ranks: Vec<u8> = RULES.iter().map(|g| g.category.rank()).collect();
        assert_eq!(ranks, (1..=8).collect::<Vec<u8>>());
    }

    #[test]
    fn test_documented_examples() {
        assert_eq!(classify("怎么注册账号").label(), "1.注册相关");
        assert_eq!(classify("ChatGPT下载安装包").label(), "3.下载安装");
        assert_eq!(classify("502 bad gateway").label(), "6.技术问题");
        assert_eq!(classify("随便打个字").label(), "9.其他");
    }

    #[test]
    fn test_each_category_reachable() {
        assert_eq!(classify("chatgpt register"), Category::Registration);
        assert_eq!(classify("chatgpt 突然进不去了"), Category::LoginUsage);
        assert_eq!(classify("chatgpt android"), Category::DownloadInstall);
        assert_eq!(classify("openai 接口 文档"), Category::ApiServices);
        assert_eq!(classify("chatgpt 代充"), Category::PlusMembership);
        assert_eq!(classify("chatgpt 一直在验证"), Category::TechnicalIssues);
        assert_eq!(classify("chatgpt deactivated"), Category::AccountManagement);
        assert_eq!(classify("gpt4o 和 gpt-3.5 区别"), Category::ModelFeatures);
        assert_eq!(classify("chatgpt"), Category::Other);
    }

    #[test]
    fn test_priority_registration_beats_model_features() {
        // "注册" is Registration, "免费" and "模型" are Model Features.
        assert_eq!(classify("免费模型注册"), Category::Registration);
        // "账号" alone is Account Management, but Registration comes first.
        assert_eq!(classify("账号注册"), Category::Registration);
    }

    #[test]
    fn test_first_group_wins_not_most_matches() {
        // One Login pattern against three Model Features patterns.
        let result = classify_detailed("gpt-4 turbo 免费 登录");
        assert_eq!(result.category, Category::LoginUsage);
        assert_eq!(result.matched_pattern, Some("登录"));
    }

    #[test]
    fn test_overlapping_free_pattern_is_order_sensitive() {
        assert_eq!(classify("免费 api"), Category::ApiServices);
        assert_eq!(classify("免费"), Category::ModelFeatures);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify("API"), classify("api"));
        assert_eq!(classify("API"), Category::ApiServices);
        assert_eq!(classify("ChatGPT LOGIN"), Category::LoginUsage);
        assert_eq!(classify("GPT-4O"), Category::ModelFeatures);
    }

    #[test]
    fn test_substring_search_not_full_match() {
        // "app" inside "whatsapp"
        assert_eq!(classify("whatsapp"), Category::DownloadInstall);
        // "key" inside "monkey"
        assert_eq!(classify("monkey"), Category::ApiServices);
    }

    #[test]
    fn test_wildcard_patterns_span_text() {
        assert_eq!(
            classify_detailed("如何在手机上注册").matched_pattern,
            Some("注册")
        );
        assert_eq!(classify("something really went very wrong"), Category::TechnicalIssues);
        assert_eq!(classify("响应时间太过长"), Category::TechnicalIssues);
        assert_eq!(classify("被平台标记为滥用"), Category::AccountManagement);
    }

    #[test]
    fn test_fallback_has_no_pattern() {
        let result = classify_detailed("随便打个字");
        assert_eq!(result.category, FALLBACK);
        assert!(result.matched_pattern.is_none());
    }

    #[test]
    fn test_totality_on_odd_input() {
        for keyword in ["", " ", "\n", "😀😀", "İSTANBUL", "ÄÖÜ", "\u{0}"] {
            let category = classify(keyword);
            assert!(Category::ALL.contains(&category));
        }
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_no_trimming_or_punctuation_stripping() {
        // Patterns are searched as-is; separators between tokens break literals.
        assert_eq!(classify("log-in"), Category::Other);
        assert_eq!(classify("  login  "), Category::LoginUsage);
    }

    #[test]
    fn test_multibyte_text_is_not_corrupted() {
        let keyword = "ＣｈａｔＧＰＴ 中文版";
        assert_eq!(classify(keyword), Category::DownloadInstall);
        assert_eq!(keyword.to_lowercase().chars().count(), keyword.chars().count());
    }

    #[test]
    fn test_compile_reports_invalid_pattern() {
        let bad = [RuleGroup {
            category: Category::Registration,
            patterns: &["ok", "(unclosed"],
        }];
        let err = RuleSet::compile(&bad).unwrap_err();
        assert_eq!(err.pattern, "(unclosed");
        assert_eq!(err.category, Category::Registration);

        let lenient = RuleSet::compile_skipping_invalid(&bad);
        assert_eq!(lenient.pattern_count(), 1);
        assert_eq!(lenient.classify("ok"), Category::Registration);
    }

    #[test]
    fn test_custom_rule_set() {
        let rules = [
            RuleGroup {
                category: Category::TechnicalIssues,
                patterns: &["timeout"],
            },
            RuleGroup {
                category: Category::Registration,
                patterns: &["sign.*up"],
            },
        ];
        let set = RuleSet::compile(&rules).unwrap();
        assert_eq!(set.classify("sign-up timeout"), Category::TechnicalIssues);
        assert_eq!(set.classify("Sign me up"), Category::Registration);
        assert_eq!(set.classify("nothing"), Category::Other);
    }
}
