//! 累计时长按游戏分组

use std::collections::BTreeMap;

use crate::models::{GameLifetime, ServerHours, ServerRecord};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// 保留两位小数
pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// 按游戏汇总累计时长
///
/// 无游戏 ID 的服务器直接忽略。先累加原始值，最后再统一取两位小数，
/// 每个游戏的服务器列表按时长降序。
pub fn aggregate_lifetime(servers: &[ServerRecord]) -> BTreeMap<String, GameLifetime> {
    let mut games: BTreeMap<String, GameLifetime> = BTreeMap::new();

    for server in servers {
        let Some(game_id) = &server.game_id else {
            continue;
        };
        let hours = server.lifetime_play_time_seconds / SECONDS_PER_HOUR;

        let game = games.entry(game_id.clone()).or_default();
        game.hours += hours;
        game.per_server.push(ServerHours {
            server_name: server.name.clone(),
            hours,
        });
    }

    for game in games.values_mut() {
        game.per_server
            .sort_by(|a, b| b.hours.total_cmp(&a.hours));
        game.hours = round_hours(game.hours);
        for entry in &mut game.per_server {
            entry.hours = round_hours(entry.hours);
        }
    }

    games
}

/// 按配置的游戏过滤汇总结果
///
/// 指定游戏时结果只包含该游戏，没有记录时为 0 小时。
pub fn lifetime_for_game(
    servers: &[ServerRecord],
    game_filter: Option<&str>,
) -> BTreeMap<String, GameLifetime> {
    let mut games = aggregate_lifetime(servers);

    match game_filter {
        Some(game) => {
            let entry = games.remove(game).unwrap_or_default();
            BTreeMap::from([(game.to_string(), entry)])
        }
        None => games,
    }
}
