//! 聚合编排
//!
//! 先解析玩家（失败即终止），再并发执行三个互不依赖的分支：
//! 窗口时长、累计时长、曾用名。单个分支失败只在报告对应槽位记为 `"error"`。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::api::{HttpTrackerClient, SharedTrackerApi, TrackerApi};
use crate::config::{LookupConfig, TimeWindow};
use crate::error::LookupError;
use crate::models::{AggregationReport, Alias, Branch, BranchOutcome, GameLifetime, WindowTotal};

use super::aliases::try_fetch_aliases;
use super::intervals::window_totals;
use super::lifetime::lifetime_for_game;
use super::resolver::PlayerResolver;
use super::sessions::SessionFetcher;
use super::snapshot::PlayerSnapshot;

/// 时长聚合器
pub struct HoursAggregator {
    api: SharedTrackerApi,
    config: LookupConfig,
}

impl HoursAggregator {
    /// 使用 HTTP 客户端创建，配置无效时报错
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        config.validate()?;
        let client = HttpTrackerClient::new(&config.api)?;
        Ok(Self::with_api(Arc::new(client), config))
    }

    /// 使用自定义 API 实现创建
    pub fn with_api(api: SharedTrackerApi, config: LookupConfig) -> Self {
        Self { api, config }
    }

    /// 生成一名玩家的聚合报告
    ///
    /// 只有配置无效或玩家无法解析时返回错误。
    pub async fn aggregate(
        &self,
        name: &str,
        target_server_id: &str,
        snapshot: Option<&dyn PlayerSnapshot>,
    ) -> Result<AggregationReport, LookupError> {
        let windows = self.config.time_windows()?;
        let api = self.api.as_ref();

        tracing::info!(name, server = target_server_id, "resolving player");
        let resolved = PlayerResolver::new(api, &self.config.api)
            .resolve(name, target_server_id, snapshot)
            .await?;
        let player_id = resolved.id.as_str();

        let (window_totals, lifetime, aliases) = tokio::join!(
            self.window_branch(api, player_id, &windows),
            self.lifetime_branch(api, player_id),
            self.alias_branch(api, player_id),
        );

        let mut partial_errors = BTreeSet::new();
        if window_totals.is_failed() {
            partial_errors.insert(Branch::Sessions);
        }
        if lifetime.as_ref().is_some_and(BranchOutcome::is_failed) {
            partial_errors.insert(Branch::Lifetime);
        }
        if aliases.is_failed() {
            partial_errors.insert(Branch::Aliases);
        }

        let report = AggregationReport {
            query: name.trim().to_string(),
            player_id: resolved.id.clone(),
            window_totals,
            lifetime_hours_by_game: lifetime,
            aliases,
            partial_errors,
        };
        tracing::info!(
            player_id = %report.player_id,
            partial = report.is_partial(),
            summary = %report.summary(),
            "aggregation complete"
        );

        Ok(report)
    }

    async fn window_branch(
        &self,
        api: &dyn TrackerApi,
        player_id: &str,
        windows: &[TimeWindow],
    ) -> BranchOutcome<Vec<WindowTotal>> {
        if windows.is_empty() {
            return BranchOutcome::Ready(Vec::new());
        }

        let weeks = LookupConfig::coverage_weeks(windows);
        let outcome = SessionFetcher::new(api, &self.config.api)
            .fetch(player_id, weeks)
            .await
            .map(|history| {
                window_totals(
                    &history.sessions,
                    &history.server_games(),
                    windows,
                    self.config.game(),
                )
            });

        log_failure(Branch::Sessions, player_id, outcome.into())
    }

    async fn lifetime_branch(
        &self,
        api: &dyn TrackerApi,
        player_id: &str,
    ) -> Option<BranchOutcome<BTreeMap<String, GameLifetime>>> {
        if !self.config.include_lifetime {
            return None;
        }

        let outcome = api
            .fetch_player_servers(player_id)
            .await
            .map(|servers| lifetime_for_game(&servers, self.config.game()));

        Some(log_failure(Branch::Lifetime, player_id, outcome.into()))
    }

    async fn alias_branch(&self, api: &dyn TrackerApi, player_id: &str) -> BranchOutcome<Vec<Alias>> {
        let outcome = try_fetch_aliases(api, player_id, self.config.alias_limit).await;
        log_failure(Branch::Aliases, player_id, outcome.into())
    }
}

fn log_failure<T>(branch: Branch, player_id: &str, outcome: BranchOutcome<T>) -> BranchOutcome<T> {
    if let BranchOutcome::Failed(reason) = &outcome {
        tracing::warn!(%branch, player_id, %reason, "branch failed");
    }
    outcome
}
