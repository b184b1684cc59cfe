//! 状态类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 会话生命周期阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// 正在读取持久化会话
    Initializing,
    /// 已登录
    Authenticated,
    /// 未登录
    Unauthenticated,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 状态事件
#[derive(Debug, Clone, Serialize)]
pub enum StateEvent {
    /// 会话阶段变更
    SessionChanged {
        old_phase: SessionPhase,
        new_phase: SessionPhase,
        timestamp: DateTime<Utc>,
    },
    /// 收藏集合变更（加载、增删、清空）
    FavouritesChanged {
        len: usize,
        timestamp: DateTime<Utc>,
    },
    /// 练习列表变更
    ItemsChanged {
        count: usize,
        offline: bool,
        timestamp: DateTime<Utc>,
    },
    /// 选中项变更
    SelectionChanged {
        name: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl StateEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::SessionChanged { timestamp, .. } => *timestamp,
            Self::FavouritesChanged { timestamp, .. } => *timestamp,
            Self::ItemsChanged { timestamp, .. } => *timestamp,
            Self::SelectionChanged { timestamp, .. } => *timestamp,
        }
    }

    /// 若为会话事件，返回新阶段
    pub fn session_phase(&self) -> Option<SessionPhase> {
        match self {
            Self::SessionChanged { new_phase, .. } => Some(*new_phase),
            _ => None,
        }
    }
}
