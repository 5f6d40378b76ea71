//! JSON:API 文档结构
//!
//! 上游响应的顶层结构为 `data` + 可选的 `included` + 可选的 `links.next`。
//! 属性按需从 `serde_json::Value` 中提取，只有必需字段缺失时才报错。

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{Alias, PlayerCandidate, ServerRecord, Session};

use super::error::ApiError;

/// 响应文档，`data` 缺失时反序列化失败
#[derive(Debug, Deserialize)]
pub struct Document<D> {
    pub data: D,
    #[serde(default)]
    pub included: Option<Vec<Resource>>,
    #[serde(default)]
    pub links: Option<Links>,
}

impl<D> Document<D> {
    /// 下一页游标
    pub fn next_link(&self) -> Option<&str> {
        self.links
            .as_ref()
            .and_then(|l| l.next.as_deref())
            .filter(|next| !next.is_empty())
    }

    /// `included` 中指定类型的资源
    pub fn included_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Resource> + 'a {
        self.included
            .iter()
            .flatten()
            .filter(move |resource| resource.kind == kind)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Links {
    #[serde(default)]
    pub next: Option<String>,
}

/// 通用资源对象
#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub attributes: Value,
    #[serde(default)]
    pub relationships: Value,
    #[serde(default)]
    pub meta: Value,
}

impl Resource {
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    /// `relationships.{name}.data.id`
    pub fn related_id(&self, name: &str) -> Option<&str> {
        self.relationships
            .get(name)
            .and_then(|r| r.get("data"))
            .and_then(|d| d.get("id"))
            .and_then(|id| id.as_str())
    }

    pub fn to_candidate(&self) -> PlayerCandidate {
        PlayerCandidate::new(self.id.clone(), self.attr_str("name").unwrap_or_default())
    }

    /// 服务器记录，`meta.timePlayed` 缺失按 0 计
    pub fn to_server_record(&self) -> ServerRecord {
        ServerRecord {
            id: self.id.clone(),
            name: self.attr_str("name").unwrap_or_default().to_string(),
            game_id: self.related_id("game").map(String::from),
            lifetime_play_time_seconds: self
                .meta
                .get("timePlayed")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0),
        }
    }

    /// 会话记录
    ///
    /// `start` 必须存在；结束时间取 `end`，旧数据中为 `stop`，都为空表示仍在线。
    pub fn to_session(&self) -> Result<Session, ApiError> {
        let start = self
            .attr_str("start")
            .ok_or_else(|| ApiError::Malformed(format!("session {} missing start", self.id)))
            .and_then(parse_timestamp)?;

        let end = match self.attr_str("end").or_else(|| self.attr_str("stop")) {
            Some(raw) => Some(parse_timestamp(raw)?),
            None => None,
        };

        Ok(Session::new(
            start,
            end,
            self.related_id("server").unwrap_or_default(),
        ))
    }

    /// 名称类型的 identifier 记录转为曾用名，其它类型返回 `None`
    pub fn to_alias(&self) -> Option<Alias> {
        if self.kind != "identifier" || self.attr_str("type") != Some("name") {
            return None;
        }
        let name = self.attr_str("identifier").filter(|n| !n.is_empty())?;

        Some(Alias {
            name: name.to_string(),
            last_seen: self
                .attr_str("lastSeen")
                .and_then(|raw| parse_timestamp(raw).ok()),
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::Malformed(format!("invalid timestamp '{}': {}", raw, e)))
}
