//! 玩家名解析
//!
//! 按优先级依次尝试，命中即返回：
//! 1. 本地快照（在线精确 > 全部精确 > 在线包含 > 全部包含）
//! 2. 限定目标服务器的远程搜索（精确名 > 首个结果）
//! 3. 不限服务器的远程搜索，按服务器归属重新排序
//!    （在目标服务器玩过且精确名 > 在目标服务器玩过 > 精确名 > 首个结果）

use std::collections::HashMap;

use serde::Serialize;

use crate::api::TrackerApi;
use crate::config::ApiConfig;
use crate::error::LookupError;
use crate::models::{normalize_name, PlayerCandidate};

use super::snapshot::PlayerSnapshot;

/// 解析命中的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    LocalOnlineExact,
    LocalExact,
    LocalOnlinePartial,
    LocalPartial,
    ServerSearch,
    GlobalSearch,
}

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPlayer {
    pub id: String,
    pub source: ResolutionSource,
}

impl ResolvedPlayer {
    fn new(id: impl Into<String>, source: ResolutionSource) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

/// 玩家解析器
pub struct PlayerResolver<'a> {
    api: &'a dyn TrackerApi,
    scoped_page_size: u32,
    global_page_size: u32,
}

impl<'a> PlayerResolver<'a> {
    pub fn new(api: &'a dyn TrackerApi, config: &ApiConfig) -> Self {
        Self {
            api,
            scoped_page_size: config.scoped_search_page_size,
            global_page_size: config.global_search_page_size,
        }
    }

    /// 把玩家名解析为上游玩家 ID
    pub async fn resolve(
        &self,
        name: &str,
        target_server_id: &str,
        snapshot: Option<&dyn PlayerSnapshot>,
    ) -> Result<ResolvedPlayer, LookupError> {
        let query = name.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound(name.to_string()));
        }

        if let Some(snapshot) = snapshot.filter(|s| s.is_ready()) {
            if let Some(resolved) = resolve_local(snapshot, query) {
                tracing::info!(player_id = %resolved.id, source = ?resolved.source, "resolved from local snapshot");
                return Ok(resolved);
            }
        }

        if let Some(id) = self.search_on_server(query, target_server_id).await {
            tracing::info!(player_id = %id, "resolved from server-scoped search");
            return Ok(ResolvedPlayer::new(id, ResolutionSource::ServerSearch));
        }

        match self.search_global(query, target_server_id).await {
            Some(id) => {
                tracing::info!(player_id = %id, "resolved from global search");
                Ok(ResolvedPlayer::new(id, ResolutionSource::GlobalSearch))
            }
            None => {
                tracing::warn!(name = query, server = target_server_id, "no player resolved");
                Err(LookupError::NotFound(query.to_string()))
            }
        }
    }

    async fn search_on_server(&self, query: &str, server_id: &str) -> Option<String> {
        let candidates = match self
            .api
            .search_players(query, Some(server_id), self.scoped_page_size)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "server-scoped search failed, falling back");
                return None;
            }
        };
        tracing::info!(results = candidates.len(), "server-scoped search results");

        candidates
            .iter()
            .find(|c| c.name_matches(query))
            .or_else(|| candidates.first())
            .map(|c| c.id.clone())
    }

    async fn search_global(&self, query: &str, server_id: &str) -> Option<String> {
        let candidates = match self
            .api
            .search_players(query, None, self.global_page_size)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "global search failed");
                return None;
            }
        };
        tracing::info!(results = candidates.len(), "global search results");

        let mut membership = HashMap::new();

        for candidate in candidates.iter().filter(|c| c.name_matches(query)) {
            if self.plays_on(candidate, server_id, &mut membership).await {
                return Some(candidate.id.clone());
            }
        }

        for candidate in &candidates {
            if self.plays_on(candidate, server_id, &mut membership).await {
                return Some(candidate.id.clone());
            }
        }

        candidates
            .iter()
            .find(|c| c.name_matches(query))
            .or_else(|| candidates.first())
            .map(|c| c.id.clone())
    }

    /// 候选人是否在目标服务器玩过，每个候选人最多查询一次
    ///
    /// 查询失败视为未玩过。
    async fn plays_on(
        &self,
        candidate: &PlayerCandidate,
        server_id: &str,
        membership: &mut HashMap<String, bool>,
    ) -> bool {
        if let Some(&known) = membership.get(&candidate.id) {
            return known;
        }

        let member = match self.api.fetch_player_servers(&candidate.id).await {
            Ok(servers) => servers.iter().any(|s| s.id == server_id),
            Err(e) => {
                tracing::debug!(player_id = %candidate.id, error = %e, "membership lookup failed");
                false
            }
        };
        membership.insert(candidate.id.clone(), member);
        member
    }
}

/// 在本地快照中按四轮顺序查找
fn resolve_local(snapshot: &dyn PlayerSnapshot, query: &str) -> Option<ResolvedPlayer> {
    let needle = normalize_name(query);
    let online = snapshot.online_ids();
    let all = snapshot.all_ids();

    let name_of = |id: &str| snapshot.by_id(id).map(|n| normalize_name(&n));

    let passes: [(&[String], bool, ResolutionSource); 4] = [
        (online.as_slice(), true, ResolutionSource::LocalOnlineExact),
        (all.as_slice(), true, ResolutionSource::LocalExact),
        (online.as_slice(), false, ResolutionSource::LocalOnlinePartial),
        (all.as_slice(), false, ResolutionSource::LocalPartial),
    ];

    for (ids, exact, source) in passes {
        let hit = ids.iter().find(|id| match name_of(id.as_str()) {
            Some(name) if exact => name == needle,
            Some(name) => !name.is_empty() && name.contains(&needle),
            None => false,
        });
        if let Some(id) = hit {
            return Some(ResolvedPlayer::new(id.clone(), source));
        }
    }

    None
}
