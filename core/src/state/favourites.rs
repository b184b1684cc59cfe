//! 收藏集合管理
//!
//! 集合按插入顺序保存，以 `name` 去重。每次变更都把整个集合写入存储
//! （write-through），写入失败只记录日志，不回滚内存状态。

use super::snapshot::{decode_record, encode_record};
use super::types::StateEvent;
use crate::catalog::ExerciseRecord;
use crate::store::{DurableStore, PersistOp, PersistQueue, FAVOURITES_KEY};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// 收藏条目即练习记录
pub type FavouriteEntry = ExerciseRecord;

/// 有序、按名称唯一的收藏集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavouritesCollection {
    entries: Vec<FavouriteEntry>,
}

impl FavouritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从任意列表构建，重复名称保留第一次出现的条目
    pub fn from_entries(entries: Vec<FavouriteEntry>) -> Self {
        let mut out = Self::new();
        for entry in entries {
            out.add(entry);
        }
        out
    }

    /// 已存在同名条目时不做任何事，返回 false
    pub fn add(&mut self, entry: FavouriteEntry) -> bool {
        if self.contains(&entry.name) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// 删除所有同名条目，返回删除数量
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        before - self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&FavouriteEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[FavouriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default)]
struct FavouritesState {
    collection: FavouritesCollection,
    loading: bool,
}

/// 收藏管理器
#[derive(Clone)]
pub struct FavouritesManager {
    inner: Arc<FavouritesManagerInner>,
}

struct FavouritesManagerInner {
    state: RwLock<FavouritesState>,
    store: Arc<dyn DurableStore>,
    persist: PersistQueue,
    event_tx: broadcast::Sender<StateEvent>,
    /// 每次变更递增；加载期间若发生变更，加载结果作废
    generation: AtomicU64,
}

impl FavouritesManager {
    pub fn new(
        store: Arc<dyn DurableStore>,
        persist: PersistQueue,
        event_tx: broadcast::Sender<StateEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(FavouritesManagerInner {
                state: RwLock::new(FavouritesState::default()),
                store,
                persist,
                event_tx,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// 从存储加载集合。失败时保持空集合，不阻塞启动。返回加载后的条目数。
    pub async fn initialize(&self) -> usize {
        self.inner.state.write().await.loading = true;
        let generation = self.inner.generation.load(Ordering::SeqCst);

        // 读取前先让已排队的写入落盘，保证读到自己的写
        self.inner.persist.flush().await;
        let loaded = match self.inner.store.get(FAVOURITES_KEY).await {
            Ok(Some(raw)) => match decode_record::<Vec<FavouriteEntry>>(&raw) {
                Ok(list) => Some(list),
                Err(e) => {
                    tracing::warn!(
                        target: "fitbuddy.favourites",
                        stage = "favourites.init.decode_failed",
                        error = %e
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(
                    target: "fitbuddy.favourites",
                    stage = "favourites.init.read_failed",
                    error = %e
                );
                None
            }
        };

        let mut state = self.inner.state.write().await;
        state.loading = false;
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(
                target: "fitbuddy.favourites",
                stage = "favourites.init.stale",
                len = state.collection.len()
            );
            return state.collection.len();
        }

        state.collection = FavouritesCollection::from_entries(loaded.unwrap_or_default());
        let len = state.collection.len();
        tracing::debug!(target: "fitbuddy.favourites", stage = "favourites.init", len = len);
        self.emit(len);
        len
    }

    /// 追加条目；同名已存在时为 no-op（不写存储）。返回是否追加。
    pub async fn add(&self, entry: FavouriteEntry) -> bool {
        let mut state = self.inner.state.write().await;
        let name = entry.name.clone();
        if !state.collection.add(entry) {
            tracing::debug!(
                target: "fitbuddy.favourites",
                stage = "favourites.add.duplicate",
                name = %name
            );
            return false;
        }
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.persist(&state.collection);
        tracing::info!(target: "fitbuddy.favourites", stage = "favourites.add", name = %name);
        self.emit(state.collection.len());
        true
    }

    /// 删除同名条目；无论是否删除都写存储。返回删除数量。
    pub async fn remove(&self, name: &str) -> usize {
        let mut state = self.inner.state.write().await;
        let removed = state.collection.remove(name);
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.persist(&state.collection);
        tracing::info!(
            target: "fitbuddy.favourites",
            stage = "favourites.remove",
            name = %name,
            removed = removed
        );
        self.emit(state.collection.len());
        removed
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.inner.state.read().await.collection.contains(name)
    }

    pub async fn get(&self, name: &str) -> Option<FavouriteEntry> {
        self.inner.state.read().await.collection.get(name).cloned()
    }

    pub async fn list(&self) -> Vec<FavouriteEntry> {
        self.inner.state.read().await.collection.entries().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.inner.state.read().await.collection.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.read().await.loading
    }

    /// 会话结束时清空内存集合，不改动存储
    pub async fn reset(&self) {
        let mut state = self.inner.state.write().await;
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        state.collection.clear();
        self.emit(0);
    }

    fn persist(&self, collection: &FavouritesCollection) {
        match encode_record(&collection.entries()) {
            Ok(raw) => {
                self.inner.persist.submit(PersistOp::Set {
                    key: FAVOURITES_KEY.to_string(),
                    value: raw,
                });
            }
            Err(e) => tracing::warn!(
                target: "fitbuddy.favourites",
                stage = "favourites.persist.encode_failed",
                error = %e
            ),
        }
    }

    fn emit(&self, len: usize) {
        let _ = self.inner.event_tx.send(StateEvent::FavouritesChanged {
            len,
            timestamp: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{start_persist_queue, MemoryStore};
    use pretty_assertions::assert_eq;

    fn manager(store: &MemoryStore) -> (FavouritesManager, PersistQueue) {
        let (tx, _) = broadcast::channel(64);
        let persist = start_persist_queue(Arc::new(store.clone()));
        (
            FavouritesManager::new(Arc::new(store.clone()), persist.clone(), tx),
            persist,
        )
    }

    fn names(list: &[FavouriteEntry]) -> Vec<&str> {
        list.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_collection_repeated_adds_are_idempotent() {
        let mut c = FavouritesCollection::new();
        for name in ["A", "B", "A", "C", "B", "A"] {
            c.add(ExerciseRecord::named(name));
        }
        assert_eq!(names(c.entries()), ["A", "B", "C"]);
    }

    #[test]
    fn test_collection_names_are_case_sensitive() {
        let mut c = FavouritesCollection::new();
        assert!(c.add(ExerciseRecord::named("Plank")));
        assert!(c.add(ExerciseRecord::named("plank")));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_from_entries_collapses_duplicates() {
        let c = FavouritesCollection::from_entries(vec![
            ExerciseRecord::named("A").with_muscle("first"),
            ExerciseRecord::named("A").with_muscle("second"),
        ]);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("A").unwrap().muscle.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_push_ups_scenario() {
        let store = MemoryStore::new();
        let (mgr, persist) = manager(&store);
        assert_eq!(mgr.initialize().await, 0);

        let push_ups = ExerciseRecord::named("Push-ups").with_muscle("chest");
        assert!(mgr.add(push_ups.clone()).await);
        assert_eq!(mgr.list().await, vec![push_ups.clone()]);

        assert!(!mgr.add(push_ups).await);
        assert_eq!(mgr.len().await, 1);

        assert_eq!(mgr.remove("Push-ups").await, 1);
        assert!(mgr.is_empty().await);

        persist.flush().await;
        // add, remove：重复 add 不写存储
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_remove_then_add_keeps_new_entry() {
        let store = MemoryStore::new();
        let (mgr, _) = manager(&store);
        mgr.initialize().await;

        mgr.add(ExerciseRecord::named("Squats").with_muscle("old")).await;
        mgr.remove("Squats").await;
        let fresh = ExerciseRecord::named("Squats").with_muscle("quadriceps");
        mgr.add(fresh.clone()).await;

        assert_eq!(mgr.list().await, vec![fresh]);
    }

    #[tokio::test]
    async fn test_remove_missing_still_persists() {
        let store = MemoryStore::new();
        let (mgr, persist) = manager(&store);
        mgr.initialize().await;
        assert_eq!(mgr.remove("Nope").await, 0);
        persist.flush().await;
        assert_eq!(
            store.raw(FAVOURITES_KEY).await.as_deref(),
            Some(r#"{"version":1,"data":[]}"#)
        );
    }

    #[tokio::test]
    async fn test_round_trip_preserves_order() {
        let store = MemoryStore::new();
        let (mgr, persist) = manager(&store);
        mgr.initialize().await;
        for name in ["Plank", "Burpees", "Lunges"] {
            mgr.add(ExerciseRecord::named(name)).await;
        }
        persist.flush().await;

        let (reloaded, _) = manager(&store);
        assert_eq!(reloaded.initialize().await, 3);
        assert_eq!(reloaded.list().await, mgr.list().await);
    }

    #[tokio::test]
    async fn test_read_failure_starts_empty() {
        let store = MemoryStore::new();
        store.insert_raw(FAVOURITES_KEY, r#"[{"name":"Plank"}]"#).await;
        store.set_fail_reads(true);
        let (mgr, _) = manager(&store);
        assert_eq!(mgr.initialize().await, 0);
        assert!(!mgr.is_loading().await);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        let (mgr, persist) = manager(&store);
        mgr.initialize().await;
        mgr.add(ExerciseRecord::named("Plank")).await;
        mgr.add(ExerciseRecord::named("Squats")).await;
        persist.flush().await;

        assert_eq!(mgr.len().await, 2);
        assert_eq!(persist.failure_count(), 2);
    }

    #[tokio::test]
    async fn test_reset_leaves_storage_alone() {
        let store = MemoryStore::new();
        let (mgr, persist) = manager(&store);
        mgr.initialize().await;
        mgr.add(ExerciseRecord::named("Plank")).await;
        persist.flush().await;

        mgr.reset().await;
        assert!(mgr.is_empty().await);
        assert_eq!(mgr.initialize().await, 1);
    }
}
