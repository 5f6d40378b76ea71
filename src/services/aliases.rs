//! 曾用名获取

use crate::api::{ApiError, TrackerApi};
use crate::models::Alias;

/// 按最近出现时间降序排列（未知时间排最后）并截断
pub fn order_aliases(mut aliases: Vec<Alias>, limit: usize) -> Vec<Alias> {
    aliases.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
    aliases.truncate(limit);
    aliases
}

/// 获取曾用名，失败时返回错误
pub async fn try_fetch_aliases(
    api: &dyn TrackerApi,
    player_id: &str,
    limit: usize,
) -> Result<Vec<Alias>, ApiError> {
    let aliases = api.fetch_identifiers(player_id).await?;
    Ok(order_aliases(aliases, limit))
}

/// 获取曾用名，任何失败都降级为空列表
pub async fn fetch_aliases(api: &dyn TrackerApi, player_id: &str, limit: usize) -> Vec<Alias> {
    match try_fetch_aliases(api, player_id, limit).await {
        Ok(aliases) => aliases,
        Err(e) => {
            tracing::warn!(player_id, error = %e, "alias fetch failed, using empty list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeTracker;
    use chrono::{TimeZone, Utc};

    fn alias(name: &str, day: Option<u32>) -> Alias {
        Alias {
            name: name.to_string(),
            last_seen: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_order_most_recent_first() {
        let ordered = order_aliases(
            vec![alias("old", Some(1)), alias("unknown", None), alias("new", Some(20))],
            10,
        );

        let names: Vec<&str> = ordered.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old", "unknown"]);
    }

    #[test]
    fn test_order_caps_length() {
        let aliases = (1..=15).map(|d| alias(&format!("n{d}"), Some(d))).collect();
        let ordered = order_aliases(aliases, 10);

        assert_eq!(ordered.len(), 10);
        assert_eq!(ordered[0].name, "n15");
    }

    #[tokio::test]
    async fn test_fetch_aliases_degrades_to_empty() {
        let api = FakeTracker::new().with_identifiers("42", Err(500));

        assert!(fetch_aliases(&api, "42", 10).await.is_empty());
        assert!(try_fetch_aliases(&api, "42", 10).await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_aliases_orders_results() {
        let api = FakeTracker::new().with_identifiers(
            "42",
            Ok(vec![alias("first", Some(2)), alias("latest", Some(9))]),
        );

        let aliases = fetch_aliases(&api, "42", 1).await;
        assert_eq!(aliases, vec![alias("latest", Some(9))]);
    }
}
