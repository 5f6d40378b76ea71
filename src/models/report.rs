//! 聚合报告
//!
//! 报告由四个互相独立的分支组装而成，任何非解析分支失败都只会
//! 把该分支的槽位置为 `"error"`，报告本身仍然正常返回。

use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Serializer};

use super::player::Alias;

/// 报告中可独立失败的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Sessions,
    Lifetime,
    Aliases,
}

impl Branch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Lifetime => "lifetime",
            Self::Aliases => "aliases",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个分支的结果：成功值或错误标记
#[derive(Debug, Clone, PartialEq)]
pub enum BranchOutcome<T> {
    Ready(T),
    /// 失败原因只用于日志，序列化时统一输出 `"error"`
    Failed(String),
}

impl<T> BranchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Failed(_) => None,
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for BranchOutcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for BranchOutcome<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Ready(value) => value.serialize(serializer),
            Self::Failed(_) => serializer.serialize_str("error"),
        }
    }
}

/// 某个时间窗口内的游戏时长
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowTotal {
    pub label: String,
    pub hours: f64,
}

/// 单个服务器的累计时长
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHours {
    pub server_name: String,
    pub hours: f64,
}

/// 单个游戏的累计时长，`per_server` 按时长降序
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLifetime {
    pub hours: f64,
    pub per_server: Vec<ServerHours>,
}

/// 最终输出
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationReport {
    /// 调用方给出的原始查询名
    pub query: String,
    pub player_id: String,
    pub window_totals: BranchOutcome<Vec<WindowTotal>>,
    /// `None` 表示配置关闭了累计时长
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_hours_by_game: Option<BranchOutcome<BTreeMap<String, GameLifetime>>>,
    pub aliases: BranchOutcome<Vec<Alias>>,
    pub partial_errors: BTreeSet<Branch>,
}

impl AggregationReport {
    /// 是否有分支失败
    pub fn is_partial(&self) -> bool {
        !self.partial_errors.is_empty()
    }

    /// 单行文本摘要，例如 `24h: 8.00h | 7d: 8.00h | All: 120.50h | Aliases: a, b`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        match &self.window_totals {
            BranchOutcome::Ready(totals) => {
                parts.extend(
                    totals
                        .iter()
                        .map(|t| format!("{}: {:.2}h", t.label, t.hours)),
                );
            }
            BranchOutcome::Failed(_) => parts.push("sessions: error".to_string()),
        }

        match &self.lifetime_hours_by_game {
            Some(BranchOutcome::Ready(games)) => {
                let total: f64 = games.values().map(|g| g.hours).sum();
                parts.push(format!("All: {:.2}h", total));
            }
            Some(BranchOutcome::Failed(_)) => parts.push("All: error".to_string()),
            None => {}
        }

        match &self.aliases {
            BranchOutcome::Ready(aliases) if !aliases.is_empty() => {
                let names: Vec<&str> = aliases.iter().map(|a| a.name.as_str()).collect();
                parts.push(format!("Aliases: {}", names.join(", ")));
            }
            BranchOutcome::Ready(_) => {}
            BranchOutcome::Failed(_) => parts.push("Aliases: error".to_string()),
        }

        parts.join(" | ")
    }
}
