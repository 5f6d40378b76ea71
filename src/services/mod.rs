//! 业务服务
//!
//! 玩家解析、会话分页、时长统计、曾用名获取以及把它们组装成报告的编排器。

pub mod aliases;
pub mod intervals;
pub mod lifetime;
pub mod orchestrator;
pub mod resolver;
pub mod sessions;
pub mod snapshot;

#[cfg(test)]
pub(crate) mod testing;

pub use aliases::{fetch_aliases, order_aliases, try_fetch_aliases};
pub use intervals::{sum_overlap, sum_overlap_at, window_totals};
pub use lifetime::{aggregate_lifetime, lifetime_for_game, round_hours};
pub use orchestrator::HoursAggregator;
pub use resolver::{PlayerResolver, ResolutionSource, ResolvedPlayer};
pub use sessions::{coverage_reached, SessionFetcher, SessionHistory};
pub use snapshot::{PlayerSnapshot, StaticSnapshot};
