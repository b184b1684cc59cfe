//! # 持久化存储
//!
//! 设备本地的键值存储抽象，以及按提交顺序落盘的写队列。

pub mod memory;
pub mod r#trait;
pub mod writer;

pub use memory::MemoryStore;
pub use r#trait::DurableStore;
pub use writer::{start_persist_queue, PersistOp, PersistQueue};

/// 会话记录所在的键
pub const AUTH_SESSION_KEY: &str = "auth-session";
/// 收藏集合所在的键
pub const FAVOURITES_KEY: &str = "favourites-collection";
