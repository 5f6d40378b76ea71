//! 本地在线玩家快照
//!
//! 由外部持有的只读能力，解析器只读取不写入。
//! 快照来自实时游戏服务器连接，比远程搜索更快也更新。

/// 只读玩家快照
pub trait PlayerSnapshot: Send + Sync {
    /// 快照尚未加载完成时解析器会跳过它
    fn is_ready(&self) -> bool {
        true
    }

    /// 按 ID 查询玩家名
    fn by_id(&self, player_id: &str) -> Option<String>;

    /// 当前在线玩家 ID
    fn online_ids(&self) -> Vec<String>;

    /// 快照中缓存的全部玩家 ID（含离线）
    fn all_ids(&self) -> Vec<String>;
}

/// 内存快照，保持插入顺序
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshot {
    players: Vec<(String, String)>,
    online: Vec<String>,
    ready: bool,
}

impl StaticSnapshot {
    pub fn new() -> Self {
        Self {
            ready: true,
            ..Default::default()
        }
    }

    /// 添加一名玩家
    pub fn with_player(mut self, id: &str, name: &str, online: bool) -> Self {
        self.players.push((id.to_string(), name.to_string()));
        if online {
            self.online.push(id.to_string());
        }
        self
    }

    pub fn not_ready(mut self) -> Self {
        self.ready = false;
        self
    }
}

impl PlayerSnapshot for StaticSnapshot {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn by_id(&self, player_id: &str) -> Option<String> {
        self.players
            .iter()
            .find(|(id, _)| id == player_id)
            .map(|(_, name)| name.clone())
    }

    fn online_ids(&self) -> Vec<String> {
        self.online.clone()
    }

    fn all_ids(&self) -> Vec<String> {
        self.players.iter().map(|(id, _)| id.clone()).collect()
    }
}
