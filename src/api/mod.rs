//! 上游玩家追踪服务访问层
//!
//! 提供 `TrackerApi` trait 用于解耦业务逻辑和 HTTP 传输，
//! 测试中可以替换为内存实现。

mod client;
mod document;
mod error;

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{Alias, PlayerCandidate, ServerRecord, Session};

pub use client::HttpTrackerClient;
pub use document::{Document, Links, Resource};
pub use error::ApiError;

/// 会话分页请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// 第一页，由玩家 ID 构造
    First { player_id: String, page_size: u32 },
    /// 后续页，直接使用上一页返回的 `links.next`
    Next(String),
}

/// 一页会话数据
#[derive(Debug, Clone, Default)]
pub struct SessionPage {
    pub sessions: Vec<Session>,
    /// 本页 `included` 中的服务器记录，未去重
    pub servers: Vec<ServerRecord>,
    pub next: Option<String>,
}

/// 上游 API trait
#[async_trait]
pub trait TrackerApi: Send + Sync {
    /// 按名称搜索玩家，可选限定服务器
    async fn search_players(
        &self,
        name: &str,
        server_id: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<PlayerCandidate>, ApiError>;

    /// 玩家档案中 include 的服务器记录（含累计时长）
    async fn fetch_player_servers(&self, player_id: &str) -> Result<Vec<ServerRecord>, ApiError>;

    /// 获取一页会话
    async fn fetch_session_page(&self, request: &PageRequest) -> Result<SessionPage, ApiError>;

    /// 玩家的名称类 identifier 记录
    async fn fetch_identifiers(&self, player_id: &str) -> Result<Vec<Alias>, ApiError>;
}

/// 共享的 TrackerApi 类型别名
pub type SharedTrackerApi = Arc<dyn TrackerApi>;
