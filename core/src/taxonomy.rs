//! Fixed keyword taxonomy
//!
//! Nine mutually exclusive categories. The rank doubles as match priority
//! and as the primary sort key of every output table.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Category assigned to a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Account sign-up questions
    Registration,
    /// Sign-in failures and "cannot use / cannot open" reports
    LoginUsage,
    /// Clients, installers, mobile apps
    DownloadInstall,
    /// API access, keys, invocation
    ApiServices,
    /// Paid subscription, top-ups, payment
    PlusMembership,
    /// Gateway errors, verification loops, error pages
    TechnicalIssues,
    /// Sharing, bans, deactivation
    AccountManagement,
    /// Model versions, limits, feature comparisons
    ModelFeatures,
    /// Fallback when nothing matches
    Other,
}

impl Category {
    /// All categories in rank order
    pub const ALL: [Category; 9] = [
        Category::Registration,
        Category::LoginUsage,
        Category::DownloadInstall,
        Category::ApiServices,
        Category::PlusMembership,
        Category::TechnicalIssues,
        Category::AccountManagement,
        Category::ModelFeatures,
        Category::Other,
    ];

    /// Fixed rank 1-9
    pub fn rank(&self) -> u8 {
        match self {
            Self::Registration => 1,
            Self::LoginUsage => 2,
            Self::DownloadInstall => 3,
            Self::ApiServices => 4,
            Self::PlusMembership => 5,
            Self::TechnicalIssues => 6,
            Self::AccountManagement => 7,
            Self::ModelFeatures => 8,
            Self::Other => 9,
        }
    }

    /// Name as written into output files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registration => "注册相关",
            Self::LoginUsage => "登录使用",
            Self::DownloadInstall => "下载安装",
            Self::ApiServices => "API服务",
            Self::PlusMembership => "Plus会员",
            Self::TechnicalIssues => "技术问题",
            Self::AccountManagement => "账号管理",
            Self::ModelFeatures => "模型功能",
            Self::Other => "其他",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Registration => "Registration",
            Self::LoginUsage => "Login & Usage",
            Self::DownloadInstall => "Download & Install",
            Self::ApiServices => "API Services",
            Self::PlusMembership => "Plus Membership",
            Self::TechnicalIssues => "Technical Issues",
            Self::AccountManagement => "Account Management",
            Self::ModelFeatures => "Model Features",
            Self::Other => "Other",
        }
    }

    /// Output label, `"<rank>.<name>"` (e.g. `"1.注册相关"`)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Registration => "1.注册相关",
            Self::LoginUsage => "2.登录使用",
            Self::DownloadInstall => "3.下载安装",
            Self::ApiServices => "4.API服务",
            Self::PlusMembership => "5.Plus会员",
            Self::TechnicalIssues => "6.技术问题",
            Self::AccountManagement => "7.账号管理",
            Self::ModelFeatures => "8.模型功能",
            Self::Other => "9.其他",
        }
    }

    /// Look up a category by rank
    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.rank() == rank)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.label() == trimmed)
            .ok_or_else(|| format!("Unknown category label: {s}"))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
