//! 状态管理器
//!
//! 显式持有会话、收藏、练习列表三份状态，通过 broadcast 推送变更事件。

use super::favourites::{FavouriteEntry, FavouritesManager};
use super::items::{ItemsManager, ItemsState, LoadOutcome};
use super::session::{Session, SessionManager, SessionSnapshot};
use super::types::{SessionPhase, StateEvent};
use crate::catalog::{CatalogGateway, ExerciseRecord};
use crate::store::{start_persist_queue, DurableStore, PersistQueue};
use std::sync::Arc;
use tokio::sync::broadcast;

/// 状态管理器
#[derive(Clone)]
pub struct StateManager {
    inner: Arc<StateManagerInner>,
}

struct StateManagerInner {
    session: SessionManager,
    favourites: FavouritesManager,
    items: ItemsManager,
    persist: PersistQueue,
    /// 事件广播通道
    event_tx: broadcast::Sender<StateEvent>,
}

impl StateManager {
    /// 创建新的状态管理器，并启动写队列
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        let (event_tx, _) = broadcast::channel(1000);
        let persist = start_persist_queue(store.clone());

        let inner = StateManagerInner {
            session: SessionManager::new(store.clone(), persist.clone(), event_tx.clone()),
            favourites: FavouritesManager::new(store, persist.clone(), event_tx.clone()),
            items: ItemsManager::new(event_tx.clone()),
            persist,
            event_tx,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// 获取只读句柄
    pub fn handle(&self) -> StateManagerHandle {
        StateManagerHandle {
            manager: self.clone(),
        }
    }

    /// 订阅状态事件
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.inner.event_tx.subscribe()
    }

    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    pub fn favourites(&self) -> &FavouritesManager {
        &self.inner.favourites
    }

    pub fn items(&self) -> &ItemsManager {
        &self.inner.items
    }

    /// 启动流程：读取会话；已登录则加载收藏
    pub async fn bootstrap(&self) -> SessionPhase {
        let phase = self.inner.session.initialize().await;
        if phase == SessionPhase::Authenticated {
            self.inner.favourites.initialize().await;
        }
        tracing::info!(target: "fitbuddy.state", stage = "state.bootstrap", phase = %phase);
        phase
    }

    /// 登录并为新会话加载收藏
    pub async fn login(&self, session: Session) -> SessionPhase {
        let phase = self.inner.session.login(session).await;
        self.inner.favourites.initialize().await;
        phase
    }

    /// 登出：清除会话、内存中的收藏和选中项
    pub async fn logout(&self) -> SessionPhase {
        let phase = self.inner.session.logout().await;
        self.inner.favourites.reset().await;
        self.inner.items.clear_selection().await;
        phase
    }

    pub async fn add_favourite(&self, entry: FavouriteEntry) -> bool {
        self.inner.favourites.add(entry).await
    }

    pub async fn remove_favourite(&self, name: &str) -> usize {
        self.inner.favourites.remove(name).await
    }

    /// 收藏或取消收藏，返回操作后是否处于收藏状态
    pub async fn toggle_favourite(&self, entry: FavouriteEntry) -> bool {
        if self.inner.favourites.contains(&entry.name).await {
            self.inner.favourites.remove(&entry.name).await;
            false
        } else {
            self.inner.favourites.add(entry).await;
            true
        }
    }

    pub async fn load_exercises(
        &self,
        gateway: &dyn CatalogGateway,
        muscle: &str,
        offset: u32,
    ) -> LoadOutcome {
        self.inner.items.load_exercises(gateway, muscle, offset).await
    }

    pub async fn select_item(&self, item: ExerciseRecord) {
        self.inner.items.select(item).await
    }

    pub async fn clear_selection(&self) {
        self.inner.items.clear_selection().await
    }

    /// 等待所有已排队的写入完成
    pub async fn flush(&self) {
        self.inner.persist.flush().await
    }

    pub fn persist_failures(&self) -> u64 {
        self.inner.persist.failure_count()
    }
}

/// 只读句柄：导航与视图只能读取快照和订阅事件
#[derive(Clone)]
pub struct StateManagerHandle {
    manager: StateManager,
}

impl StateManagerHandle {
    pub async fn session(&self) -> SessionSnapshot {
        self.manager.inner.session.snapshot().await
    }

    pub async fn items(&self) -> ItemsState {
        self.manager.inner.items.snapshot().await
    }

    pub async fn favourites(&self) -> Vec<FavouriteEntry> {
        self.manager.inner.favourites.list().await
    }

    pub async fn is_favourite(&self, name: &str) -> bool {
        self.manager.inner.favourites.contains(name).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.manager.subscribe()
    }
}
