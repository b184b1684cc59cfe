//! # 状态管理模块
//!
//! 负责会话、收藏集合与练习列表的内存状态，以及它们与本地持久化存储之间的同步。
//!
//! ## 设计原则
//!
//! 1. **显式持有**：状态由 `StateManager` 持有，通过 `Arc` 传递，不使用全局变量
//! 2. **写穿透**：每次变更立即排队写入存储，写入失败不回滚内存
//! 3. **事件驱动**：状态变更通过 broadcast 推送给订阅者
//! 4. **过期保护**：异步读取返回前若状态已变更，结果被丢弃

pub mod favourites;
pub mod items;
pub mod manager;
pub mod session;
pub mod snapshot;
pub mod transitions;
pub mod types;

pub use favourites::{FavouriteEntry, FavouritesCollection, FavouritesManager};
pub use items::{ItemsManager, ItemsSource, ItemsState, LoadOutcome};
pub use manager::{StateManager, StateManagerHandle};
pub use session::{Session, SessionId, SessionManager, SessionSnapshot};
pub use snapshot::{decode_record, encode_record, PersistedRecord, RECORD_VERSION};
pub use transitions::{SessionTransition, TransitionError};
pub use types::{SessionPhase, StateEvent};
