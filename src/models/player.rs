//! 玩家相关数据结构
//!
//! 所有实体都是请求级值对象：每次查询新建，生成报告后丢弃。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 名称搜索命中的候选玩家
///
/// `id` 是上游服务的稳定标识，同名玩家可能有多个不同的 `id`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCandidate {
    pub id: String,
    pub name: String,
}

impl PlayerCandidate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// 名称是否与查询精确匹配（忽略大小写和首尾空白）
    pub fn name_matches(&self, needle: &str) -> bool {
        normalize_name(&self.name) == normalize_name(needle)
    }
}

/// 单次连续游戏会话
///
/// `end` 为 `None` 表示会话仍在进行中，统计时按当前时间截止。
/// 上游不保证 `end >= start`，倒挂的会话贡献为 0。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub server_id: String,
}

impl Session {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>, server_id: impl Into<String>) -> Self {
        Self {
            start,
            end,
            server_id: server_id.into(),
        }
    }

    /// 截止时间，未结束的会话取 `now`
    pub fn end_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }
}

/// 会话和档案响应中 `included` 的服务器记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    pub id: String,
    pub name: String,
    pub game_id: Option<String>,
    /// 上游维护的累计游戏时长（秒）
    pub lifetime_play_time_seconds: f64,
}

/// 玩家曾用名
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alias {
    pub name: String,
    pub last_seen: Option<DateTime<Utc>>,
}

/// 名称比较前的规范化：去首尾空白并转小写
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// 按 `id` 去重，保留首次出现的记录
///
/// 分页响应会在每页重复携带同一批 included 记录。
pub fn dedupe_servers(servers: Vec<ServerRecord>) -> Vec<ServerRecord> {
    let mut seen = std::collections::HashSet::new();
    servers
        .into_iter()
        .filter(|server| seen.insert(server.id.clone()))
        .collect()
}
