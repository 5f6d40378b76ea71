//! 时间窗口内的游戏时长统计
//!
//! 只累计会话与窗口 `[now - window, now]` 的重叠部分。

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::config::TimeWindow;
use crate::models::{Session, WindowTotal};

const MS_PER_HOUR: f64 = 3_600_000.0;

/// 未知服务器对应的游戏名
const UNKNOWN_GAME: &str = "unknown";

/// 以当前时间统计窗口内的小时数
pub fn sum_overlap(
    sessions: &[Session],
    server_games: &HashMap<String, String>,
    window: Duration,
    game_filter: Option<&str>,
) -> f64 {
    sum_overlap_at(sessions, server_games, window, game_filter, Utc::now())
}

/// 以指定的 `now` 统计窗口内的小时数
///
/// 毫秒累加，最后统一换算为小时。倒挂或完全在窗口外的会话贡献为 0。
pub fn sum_overlap_at(
    sessions: &[Session],
    server_games: &HashMap<String, String>,
    window: Duration,
    game_filter: Option<&str>,
    now: DateTime<Utc>,
) -> f64 {
    let window_start = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let total_ms: i64 = sessions
        .iter()
        .filter(|session| match game_filter {
            Some(game) => {
                let session_game = server_games
                    .get(&session.server_id)
                    .map(String::as_str)
                    .unwrap_or(UNKNOWN_GAME);
                session_game == game
            }
            None => true,
        })
        .map(|session| {
            let overlap_start = session.start.max(window_start);
            let overlap_end = session.end_or(now).min(now);
            if overlap_end > overlap_start {
                (overlap_end - overlap_start).num_milliseconds()
            } else {
                0
            }
        })
        .sum();

    total_ms as f64 / MS_PER_HOUR
}

/// 一次性统计多个窗口，共用同一个 `now`
pub fn window_totals(
    sessions: &[Session],
    server_games: &HashMap<String, String>,
    windows: &[TimeWindow],
    game_filter: Option<&str>,
) -> Vec<WindowTotal> {
    let now = Utc::now();
    windows
        .iter()
        .map(|window| WindowTotal {
            label: window.label.clone(),
            hours: sum_overlap_at(sessions, server_games, window.duration, game_filter, now),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::session_ago;

    fn rust_servers() -> HashMap<String, String> {
        HashMap::from([("s1".to_string(), "rust".to_string())])
    }

    #[test]
    fn test_sum_overlap_uses_current_time() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 10, 2, "s1")];

        let hours = sum_overlap(&sessions, &rust_servers(), Duration::hours(24), Some("rust"));
        assert!((hours - 8.0).abs() < 0.01, "hours = {}", hours);

        let hours = sum_overlap(&sessions, &rust_servers(), Duration::hours(24), Some("rust2"));
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_huge_window_counts_all_history() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 10, 2, "s1")];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::MAX, None, now);
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn test_session_before_window_contributes_nothing() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 50, 30, "s1")];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_session_spanning_window_counts_whole_window() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 48, -5, "s1")];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);
        assert_eq!(hours, 24.0);
    }

    #[test]
    fn test_abutting_sessions_are_additive() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 10, 6, "s1"), session_ago(now, 6, 2, "s1")];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);
        assert_eq!(hours, 8.0);
    }

    #[test]
    fn test_partial_overlap_and_open_session() {
        let now = Utc::now();
        let sessions = vec![
            session_ago(now, 30, 20, "s1"),
            Session::new(now - Duration::hours(3), None, "s1"),
        ];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);
        assert_eq!(hours, 7.0);
    }

    #[test]
    fn test_inverted_session_is_clamped() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 2, 5, "s1")];

        let hours = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);
        assert_eq!(hours, 0.0);
    }

    #[test]
    fn test_game_filter() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 10, 2, "s1")];
        let servers = rust_servers();

        let rust = sum_overlap_at(&sessions, &servers, Duration::hours(24), Some("rust"), now);
        let rust2 = sum_overlap_at(&sessions, &servers, Duration::hours(24), Some("rust2"), now);

        assert_eq!(format!("{:.2}", rust), "8.00");
        assert_eq!(format!("{:.2}", rust2), "0.00");
    }

    #[test]
    fn test_unknown_server_only_counts_without_filter() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 4, 2, "mystery")];

        let filtered = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), Some("rust"), now);
        let unfiltered = sum_overlap_at(&sessions, &rust_servers(), Duration::hours(24), None, now);

        assert_eq!(filtered, 0.0);
        assert_eq!(unfiltered, 2.0);
    }

    #[test]
    fn test_window_totals_keep_order() {
        let now = Utc::now();
        let sessions = vec![session_ago(now, 24 * 3, 24 * 3 - 2, "s1")];
        let windows = vec![
            TimeWindow::parse("24h").unwrap(),
            TimeWindow::parse("7d").unwrap(),
        ];

        let totals = window_totals(&sessions, &rust_servers(), &windows, Some("rust"));

        assert_eq!(totals[0].label, "24h");
        assert_eq!(totals[0].hours, 0.0);
        assert_eq!(totals[1].label, "7d");
        assert!((totals[1].hours - 2.0).abs() < 1e-6);
    }
}

// ============================================================================
// 属性测试 (Property-Based Testing)
// ============================================================================
