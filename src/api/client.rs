//! 基于 reqwest 的 HTTP 客户端
//!
//! 所有请求都是匿名 GET，带描述性 User-Agent 和 JSON:API Accept 头。
//! 非 2xx 响应和缺少顶层字段的响应体都作为错误返回给调用分支。

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::models::{Alias, PlayerCandidate, ServerRecord};

use super::document::{Document, Resource};
use super::error::ApiError;
use super::{PageRequest, SessionPage, TrackerApi};

const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

/// 上游 HTTP 客户端
pub struct HttpTrackerClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTrackerClient {
    /// 按配置创建客户端
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_API_MEDIA_TYPE));

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    /// 使用自定义 HTTP 客户端创建
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/players/{id}{suffix}`，ID 做路径编码
    fn player_url(&self, player_id: &str, suffix: &str) -> String {
        format!(
            "{}/players/{}{}",
            self.base_url,
            urlencoding::encode(player_id),
            suffix
        )
    }

    fn build_url(&self, url: &str, params: &[(&str, String)]) -> Result<Url, ApiError> {
        Url::parse_with_params(url, params)
            .map_err(|e| ApiError::Transport(format!("invalid url '{}': {}", url, e)))
    }

    /// 发送 GET 并解析为 JSON:API 文档
    async fn get_document<D: DeserializeOwned>(&self, url: Url) -> Result<Document<D>, ApiError> {
        tracing::debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%url, status = status.as_u16(), "upstream request failed");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TrackerApi for HttpTrackerClient {
    async fn search_players(
        &self,
        name: &str,
        server_id: Option<&str>,
        page_size: u32,
    ) -> Result<Vec<PlayerCandidate>, ApiError> {
        let mut params = vec![("filter[search]", name.to_string())];
        if let Some(server_id) = server_id {
            params.push(("filter[servers]", server_id.to_string()));
        }
        params.push(("page[size]", page_size.to_string()));

        let url = self.build_url(&format!("{}/players", self.base_url), &params)?;
        let doc: Document<Vec<Resource>> = self.get_document(url).await?;

        Ok(doc.data.iter().map(Resource::to_candidate).collect())
    }

    async fn fetch_player_servers(&self, player_id: &str) -> Result<Vec<ServerRecord>, ApiError> {
        let url = self.build_url(
            &self.player_url(player_id, ""),
            &[("include", "server".to_string())],
        )?;
        let doc: Document<Resource> = self.get_document(url).await?;

        if doc.included.is_none() {
            return Err(ApiError::Malformed(format!(
                "player {} response has no included servers",
                player_id
            )));
        }

        let servers: Vec<ServerRecord> = doc
            .included_of("server")
            .map(Resource::to_server_record)
            .collect();
        tracing::debug!(player_id, servers = servers.len(), "profile servers fetched");
        Ok(servers)
    }

    async fn fetch_session_page(&self, request: &PageRequest) -> Result<SessionPage, ApiError> {
        let url = match request {
            PageRequest::First {
                player_id,
                page_size,
            } => self.build_url(
                &self.player_url(player_id, "/relationships/sessions"),
                &[
                    ("include", "server".to_string()),
                    ("page[size]", page_size.to_string()),
                ],
            )?,
            PageRequest::Next(next) => Url::parse(next)
                .map_err(|e| ApiError::Malformed(format!("invalid next link '{}': {}", next, e)))?,
        };

        let doc: Document<Vec<Resource>> = self.get_document(url).await?;

        let sessions = doc
            .data
            .iter()
            .map(Resource::to_session)
            .collect::<Result<Vec<_>, _>>()?;
        let servers = doc
            .included_of("server")
            .map(Resource::to_server_record)
            .collect();

        Ok(SessionPage {
            sessions,
            servers,
            next: doc.next_link().map(String::from),
        })
    }

    async fn fetch_identifiers(&self, player_id: &str) -> Result<Vec<Alias>, ApiError> {
        let url = self.build_url(
            &self.player_url(player_id, ""),
            &[("include", "identifier".to_string())],
        )?;
        let doc: Document<Resource> = self.get_document(url).await?;

        Ok(doc
            .included
            .iter()
            .flatten()
            .filter_map(Resource::to_alias)
            .collect())
    }
}
