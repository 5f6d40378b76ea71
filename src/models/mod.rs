//! 数据模型
//!
//! 玩家、会话、服务器记录等请求级值对象，以及最终的聚合报告。

mod player;
mod report;

pub use player::{dedupe_servers, normalize_name, Alias, PlayerCandidate, ServerRecord, Session};
pub use report::{
    AggregationReport, Branch, BranchOutcome, GameLifetime, ServerHours, WindowTotal,
};
