//! 查询配置
//!
//! 窗口列表、游戏过滤和上游访问参数都由调用方提供，可从 TOML 加载：
//!
//! ```toml
//! windows = ["24h", "7d", "30d"]
//! game_filter = "rust"
//! alias_limit = 10
//!
//! [api]
//! page_delay_ms = 1000
//! ```

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;

/// 默认上游地址
pub const DEFAULT_BASE_URL: &str = "https://api.battlemetrics.com";

static WINDOW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*([mhdw])$").expect("valid window pattern"));

/// 统计时间窗口，例如 `24h`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub label: String,
    pub duration: chrono::Duration,
}

impl TimeWindow {
    /// 解析 `<数字><单位>` 形式的窗口，单位为 m/h/d/w
    pub fn parse(label: &str) -> Result<Self, LookupError> {
        let trimmed = label.trim();
        let caps = WINDOW_PATTERN
            .captures(trimmed)
            .ok_or_else(|| LookupError::config(format!("invalid window '{}'", label)))?;

        let amount: i64 = caps[1]
            .parse()
            .map_err(|_| LookupError::config(format!("invalid window '{}'", label)))?;
        if amount == 0 {
            return Err(LookupError::config(format!("window '{}' is empty", label)));
        }

        let duration = match &caps[2] {
            "m" => chrono::Duration::try_minutes(amount),
            "h" => chrono::Duration::try_hours(amount),
            "d" => chrono::Duration::try_days(amount),
            _ => chrono::Duration::try_weeks(amount),
        }
        .ok_or_else(|| LookupError::config(format!("window '{}' is out of range", label)))?;

        // 窗口起点必须落在可表示的时间范围内
        if Utc::now().checked_sub_signed(duration).is_none() {
            return Err(LookupError::config(format!(
                "window '{}' is out of range",
                label
            )));
        }

        Ok(Self {
            label: trimmed.to_string(),
            duration,
        })
    }
}

/// 上游访问参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
    /// 单个请求的超时
    pub request_timeout_secs: u64,
    pub session_page_size: u32,
    pub scoped_search_page_size: u32,
    pub global_search_page_size: u32,
    /// 会话翻页间隔（首个请求之后）
    pub page_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("hours-client/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 30,
            session_page_size: 100,
            scoped_search_page_size: 50,
            global_search_page_size: 25,
            page_delay_ms: 1000,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}

/// 一次查询的完整配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// 要统计的窗口，按顺序输出
    pub windows: Vec<String>,
    /// 只统计该游戏的会话和累计时长
    pub game_filter: Option<String>,
    pub include_lifetime: bool,
    pub alias_limit: usize,
    pub api: ApiConfig,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            windows: vec!["24h".to_string(), "7d".to_string(), "30d".to_string()],
            game_filter: Some("rust".to_string()),
            include_lifetime: true,
            alias_limit: 10,
            api: ApiConfig::default(),
        }
    }
}

impl LookupConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, LookupError> {
        let config: Self =
            toml::from_str(content).map_err(|e| LookupError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, LookupError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LookupError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), LookupError> {
        self.time_windows()?;

        if self.api.base_url.trim().is_empty() {
            return Err(LookupError::config("api.base_url is empty"));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(LookupError::config("api.request_timeout_secs must be positive"));
        }
        for (name, size) in [
            ("session_page_size", self.api.session_page_size),
            ("scoped_search_page_size", self.api.scoped_search_page_size),
            ("global_search_page_size", self.api.global_search_page_size),
        ] {
            if size == 0 {
                return Err(LookupError::config(format!("api.{} must be positive", name)));
            }
        }

        Ok(())
    }

    /// 生效的游戏过滤，空字符串表示不过滤
    pub fn game(&self) -> Option<&str> {
        self.game_filter
            .as_deref()
            .map(str::trim)
            .filter(|g| !g.is_empty())
    }

    pub fn time_windows(&self) -> Result<Vec<TimeWindow>, LookupError> {
        self.windows.iter().map(|w| TimeWindow::parse(w)).collect()
    }

    /// 覆盖最长窗口所需的历史周数，至少 1 周
    pub fn coverage_weeks(windows: &[TimeWindow]) -> i64 {
        let longest = windows
            .iter()
            .map(|w| w.duration)
            .max()
            .unwrap_or_else(chrono::Duration::zero);
        let week = chrono::Duration::weeks(1).num_milliseconds();
        let weeks = (longest.num_milliseconds() + week - 1) / week;
        weeks.max(1)
    }
}
