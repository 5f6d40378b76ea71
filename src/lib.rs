// Hours Client Library
// Resolves a player by name against a game-server activity tracker and
// aggregates their playtime, lifetime totals and former names into one report.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use api::{ApiError, HttpTrackerClient, SharedTrackerApi, TrackerApi};
pub use config::{ApiConfig, LookupConfig, TimeWindow};
pub use error::LookupError;
pub use models::{AggregationReport, Alias, Branch, BranchOutcome, PlayerCandidate, ServerRecord, Session};
pub use services::{HoursAggregator, PlayerSnapshot, StaticSnapshot};
