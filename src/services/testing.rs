//! 测试用的内存 TrackerApi

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::api::{ApiError, PageRequest, SessionPage, TrackerApi};
use crate::models::{Alias, PlayerCandidate, ServerRecord, Session};

/// 预置响应的 TrackerApi，失败以 HTTP 状态码表示
#[derive(Default)]
pub struct FakeTracker {
    searches: HashMap<(String, Option<String>), Result<Vec<PlayerCandidate>, u16>>,
    servers: HashMap<String, Result<Vec<ServerRecord>, u16>>,
    pages: HashMap<String, Result<SessionPage, u16>>,
    identifiers: HashMap<String, Result<Vec<Alias>, u16>>,
    calls: Mutex<Vec<String>>,
}

fn status(code: u16) -> ApiError {
    ApiError::Status {
        status: code,
        body: String::new(),
    }
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(
        mut self,
        name: &str,
        server_id: Option<&str>,
        result: Result<Vec<PlayerCandidate>, u16>,
    ) -> Self {
        self.searches
            .insert((name.to_string(), server_id.map(String::from)), result);
        self
    }

    pub fn with_servers(mut self, player_id: &str, result: Result<Vec<ServerRecord>, u16>) -> Self {
        self.servers.insert(player_id.to_string(), result);
        self
    }

    /// 第一页的 key 为玩家 ID，后续页为 next 链接
    pub fn with_page(mut self, key: &str, result: Result<SessionPage, u16>) -> Self {
        self.pages.insert(key.to_string(), result);
        self
    }

    pub fn with_identifiers(mut self, player_id: &str, result: Result<Vec<Alias>, u16>) -> Self {
        self.identifiers.insert(player_id.to_string(), result);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl TrackerApi for FakeTracker {
    async fn search_players(
        &self,
        name: &str,
        server_id: Option<&str>,
        _page_size: u32,
    ) -> Result<Vec<PlayerCandidate>, ApiError> {
        self.record(format!("search:{}:{}", name, server_id.unwrap_or("*")));
        match self
            .searches
            .get(&(name.to_string(), server_id.map(String::from)))
        {
            Some(Ok(candidates)) => Ok(candidates.clone()),
            Some(Err(code)) => Err(status(*code)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_player_servers(&self, player_id: &str) -> Result<Vec<ServerRecord>, ApiError> {
        self.record(format!("servers:{}", player_id));
        match self.servers.get(player_id) {
            Some(Ok(servers)) => Ok(servers.clone()),
            Some(Err(code)) => Err(status(*code)),
            None => Err(status(404)),
        }
    }

    async fn fetch_session_page(&self, request: &PageRequest) -> Result<SessionPage, ApiError> {
        let key = match request {
            PageRequest::First { player_id, .. } => player_id.clone(),
            PageRequest::Next(next) => next.clone(),
        };
        self.record(format!("sessions:{}", key));
        match self.pages.get(&key) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(code)) => Err(status(*code)),
            None => Err(status(404)),
        }
    }

    async fn fetch_identifiers(&self, player_id: &str) -> Result<Vec<Alias>, ApiError> {
        self.record(format!("identifiers:{}", player_id));
        match self.identifiers.get(player_id) {
            Some(Ok(aliases)) => Ok(aliases.clone()),
            Some(Err(code)) => Err(status(*code)),
            None => Ok(Vec::new()),
        }
    }
}

pub fn server(id: &str, game: Option<&str>, seconds: f64) -> ServerRecord {
    ServerRecord {
        id: id.to_string(),
        name: format!("Server {}", id),
        game_id: game.map(String::from),
        lifetime_play_time_seconds: seconds,
    }
}

/// 相对 `now` 的会话，偏移单位为小时
pub fn session_ago(now: DateTime<Utc>, start_hours: i64, end_hours: i64, server_id: &str) -> Session {
    Session::new(
        now - Duration::hours(start_hours),
        Some(now - Duration::hours(end_hours)),
        server_id,
    )
}
