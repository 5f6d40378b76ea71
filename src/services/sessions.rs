//! 会话历史分页获取
//!
//! 上游按时间倒序返回会话，通过 `links.next` 游标翻页。满足以下任一条件即停止：
//! - 没有下一页
//! - `coverage_reached` 判定已覆盖到所需的最早时间
//!
//! 任一页失败整个分支失败，已获取的页全部丢弃。

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::api::{ApiError, PageRequest, SessionPage, TrackerApi};
use crate::config::ApiConfig;
use crate::models::{dedupe_servers, ServerRecord, Session};

/// 分页获取的会话历史
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    /// 与上游顺序一致（新到旧）
    pub sessions: Vec<Session>,
    /// 按 ID 去重后的服务器记录
    pub servers: Vec<ServerRecord>,
}

impl SessionHistory {
    /// 服务器 ID 到游戏 ID 的映射，无游戏的服务器不出现
    pub fn server_games(&self) -> HashMap<String, String> {
        self.servers
            .iter()
            .filter_map(|s| s.game_id.as_ref().map(|g| (s.id.clone(), g.clone())))
            .collect()
    }
}

/// 提前停止判定
///
/// 只看累积列表的最后一条：它的开始和结束都早于 `cutoff` 即认为已覆盖。
/// 依赖上游倒序返回；若上游乱序，可能过早停止而少覆盖，这里不做补偿。
/// 空列表视为已覆盖。
pub fn coverage_reached(sessions: &[Session], cutoff: DateTime<Utc>) -> bool {
    match sessions.last() {
        None => true,
        Some(last) => last.start < cutoff && last.end.is_some_and(|end| end < cutoff),
    }
}

/// 会话分页获取器
pub struct SessionFetcher<'a> {
    api: &'a dyn TrackerApi,
    page_size: u32,
    page_delay: Duration,
}

impl<'a> SessionFetcher<'a> {
    pub fn new(api: &'a dyn TrackerApi, config: &ApiConfig) -> Self {
        Self {
            api,
            page_size: config.session_page_size,
            page_delay: config.page_delay(),
        }
    }

    /// 获取至少覆盖最近 `min_coverage_weeks` 周的会话
    pub async fn fetch(
        &self,
        player_id: &str,
        min_coverage_weeks: i64,
    ) -> Result<SessionHistory, ApiError> {
        // 超出可表示范围时视为需要全部历史
        let cutoff = chrono::Duration::try_weeks(min_coverage_weeks)
            .and_then(|span| Utc::now().checked_sub_signed(span))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut sessions = Vec::new();
        let mut servers = Vec::new();
        let mut request = PageRequest::First {
            player_id: player_id.to_string(),
            page_size: self.page_size,
        };
        let mut page_number = 0usize;

        loop {
            // 首页之后每次请求前等待，避免触发上游限流
            if page_number > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let SessionPage {
                sessions: page_sessions,
                servers: page_servers,
                next,
            } = self.api.fetch_session_page(&request).await?;
            page_number += 1;

            let added = page_sessions.len();
            sessions.extend(page_sessions);
            servers.extend(page_servers);
            tracing::info!(
                player_id,
                page = page_number,
                added,
                total = sessions.len(),
                "session page fetched"
            );

            let Some(next) = next else { break };
            if coverage_reached(&sessions, cutoff) {
                break;
            }
            request = PageRequest::Next(next);
        }

        let servers = dedupe_servers(servers);
        tracing::info!(
            player_id,
            sessions = sessions.len(),
            servers = servers.len(),
            "session fetch complete"
        );

        Ok(SessionHistory { sessions, servers })
    }
}
