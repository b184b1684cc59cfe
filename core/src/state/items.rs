//! 练习列表与选中项
//!
//! 远程获取失败时立即换成内置列表，并设置离线提示；不重试。

use super::types::StateEvent;
use crate::catalog::{CatalogGateway, ExerciseRecord, OFFLINE_NOTICE};
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// 列表状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemsState {
    pub items: Vec<ExerciseRecord>,
    pub selected_item: Option<ExerciseRecord>,
    pub loading: bool,
    /// 非阻塞提示，例如离线模式
    pub error: Option<String>,
}

impl ItemsState {
    pub fn is_offline(&self) -> bool {
        self.error.is_some()
    }
}

/// 本次加载的数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemsSource {
    Remote,
    /// 远程返回空列表
    FallbackEmpty,
    /// 远程请求失败
    FallbackOffline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    pub source: ItemsSource,
    pub count: usize,
    /// 更新的请求已先行生效时为 false
    pub applied: bool,
}

#[derive(Debug, Default)]
struct ItemsInner {
    state: ItemsState,
    last_applied: u64,
}

#[derive(Clone)]
pub struct ItemsManager {
    inner: Arc<RwLock<ItemsInner>>,
    issued: Arc<AtomicU64>,
    event_tx: broadcast::Sender<StateEvent>,
}

impl ItemsManager {
    pub fn new(event_tx: broadcast::Sender<StateEvent>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ItemsInner::default())),
            issued: Arc::new(AtomicU64::new(0)),
            event_tx,
        }
    }

    pub async fn snapshot(&self) -> ItemsState {
        self.inner.read().await.state.clone()
    }

    #[tracing::instrument(
        name = "items.load",
        skip(self, gateway),
        fields(gateway = gateway.name())
    )]
    pub async fn load_exercises(
        &self,
        gateway: &dyn CatalogGateway,
        muscle: &str,
        offset: u32,
    ) -> LoadOutcome {
        let request = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.write().await.state.loading = true;

        let (items, source) = match gateway.fetch_by_muscle_group(muscle, offset).await {
            Ok(list) if !list.is_empty() => (list, ItemsSource::Remote),
            Ok(_) => (gateway.static_fallback(), ItemsSource::FallbackEmpty),
            Err(e) => {
                tracing::warn!(
                    target: "fitbuddy.catalog",
                    stage = "items.fetch_failed",
                    muscle = %muscle,
                    offset = offset,
                    error = %e
                );
                (gateway.static_fallback(), ItemsSource::FallbackOffline)
            }
        };
        let count = items.len();

        let mut inner = self.inner.write().await;
        if request < inner.last_applied {
            tracing::debug!(
                target: "fitbuddy.catalog",
                stage = "items.stale",
                request = request,
                last_applied = inner.last_applied
            );
            inner.state.loading = self.issued.load(Ordering::SeqCst) != inner.last_applied;
            return LoadOutcome {
                source,
                count,
                applied: false,
            };
        }

        inner.last_applied = request;
        inner.state.loading = self.issued.load(Ordering::SeqCst) != request;
        inner.state.items = items;
        inner.state.error = match source {
            ItemsSource::FallbackOffline => Some(OFFLINE_NOTICE.to_string()),
            ItemsSource::Remote | ItemsSource::FallbackEmpty => None,
        };
        let _ = self.event_tx.send(StateEvent::ItemsChanged {
            count,
            offline: inner.state.error.is_some(),
            timestamp: Utc::now(),
        });

        LoadOutcome {
            source,
            count,
            applied: true,
        }
    }

    pub async fn select(&self, item: ExerciseRecord) {
        let name = item.name.clone();
        self.inner.write().await.state.selected_item = Some(item);
        let _ = self.event_tx.send(StateEvent::SelectionChanged {
            name: Some(name),
            timestamp: Utc::now(),
        });
    }

    pub async fn clear_selection(&self) {
        let mut inner = self.inner.write().await;
        if inner.state.selected_item.take().is_some() {
            let _ = self.event_tx.send(StateEvent::SelectionChanged {
                name: None,
                timestamp: Utc::now(),
            });
        }
    }

    pub async fn selected(&self) -> Option<ExerciseRecord> {
        self.inner.read().await.state.selected_item.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fallback_exercises;
    use crate::error::GatewayError;
    use async_trait::async_trait;

    struct FailingGateway;

    #[async_trait]
    impl CatalogGateway for FailingGateway {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_by_muscle_group(
            &self,
            _muscle: &str,
            _offset: u32,
        ) -> Result<Vec<ExerciseRecord>, GatewayError> {
            Err(GatewayError::Http("connection refused".to_string()))
        }

        async fn fetch_by_name(
            &self,
            _name: &str,
        ) -> Result<Option<ExerciseRecord>, GatewayError> {
            Err(GatewayError::Http("connection refused".to_string()))
        }
    }

    struct FixedGateway(Vec<ExerciseRecord>);

    #[async_trait]
    impl CatalogGateway for FixedGateway {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_by_muscle_group(
            &self,
            _muscle: &str,
            _offset: u32,
        ) -> Result<Vec<ExerciseRecord>, GatewayError> {
            Ok(self.0.clone())
        }

        async fn fetch_by_name(&self, name: &str) -> Result<Option<ExerciseRecord>, GatewayError> {
            Ok(self.0.iter().find(|e| e.name == name).cloned())
        }
    }

    /// Blocks every fetch until released.
    #[derive(Clone, Default)]
    struct GatedGateway {
        entered: Arc<tokio::sync::Notify>,
        release: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl CatalogGateway for GatedGateway {
        fn name(&self) -> &str {
            "gated"
        }

        async fn fetch_by_muscle_group(
            &self,
            _muscle: &str,
            _offset: u32,
        ) -> Result<Vec<ExerciseRecord>, GatewayError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(vec![ExerciseRecord::named("Old Curl")])
        }

        async fn fetch_by_name(&self, _name: &str) -> Result<Option<ExerciseRecord>, GatewayError> {
            Ok(None)
        }
    }

    fn items() -> ItemsManager {
        let (tx, _) = broadcast::channel(16);
        ItemsManager::new(tx)
    }

    #[tokio::test]
    async fn test_failed_fetch_uses_fallback_and_sets_offline() {
        let mgr = items();
        let outcome = mgr.load_exercises(&FailingGateway, "biceps", 0).await;
        assert_eq!(outcome.source, ItemsSource::FallbackOffline);

        let state = mgr.snapshot().await;
        assert_eq!(state.items, fallback_exercises());
        assert_eq!(state.error.as_deref(), Some(OFFLINE_NOTICE));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_empty_result_uses_fallback_without_notice() {
        let mgr = items();
        let outcome = mgr.load_exercises(&FixedGateway(vec![]), "biceps", 0).await;
        assert_eq!(outcome.source, ItemsSource::FallbackEmpty);
        let state = mgr.snapshot().await;
        assert_eq!(state.items.len(), 5);
        assert!(!state.is_offline());
    }

    #[tokio::test]
    async fn test_success_clears_previous_notice() {
        let mgr = items();
        mgr.load_exercises(&FailingGateway, "biceps", 0).await;
        let curl = ExerciseRecord::named("Curl").with_muscle("biceps");
        mgr.load_exercises(&FixedGateway(vec![curl.clone()]), "biceps", 0)
            .await;
        let state = mgr.snapshot().await;
        assert_eq!(state.items, vec![curl]);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_stale_response_settles_loading_flag() {
        let mgr = items();
        let gated = GatedGateway::default();
        let older = {
            let mgr = mgr.clone();
            let gw = gated.clone();
            tokio::spawn(async move { mgr.load_exercises(&gw, "biceps", 0).await })
        };
        gated.entered.notified().await;

        let newer = ExerciseRecord::named("New Curl");
        mgr.load_exercises(&FixedGateway(vec![newer.clone()]), "biceps", 0)
            .await;
        // the older load's start-of-request write lands late
        mgr.inner.write().await.state.loading = true;

        gated.release.notify_one();
        let outcome = older.await.unwrap();
        assert!(!outcome.applied);

        let state = mgr.snapshot().await;
        assert!(!state.loading);
        assert_eq!(state.items, vec![newer]);
    }

    #[tokio::test]
    async fn test_selection_is_transient() {
        let mgr = items();
        mgr.select(ExerciseRecord::named("Plank")).await;
        assert_eq!(mgr.selected().await.unwrap().name, "Plank");
        mgr.clear_selection().await;
        assert!(mgr.selected().await.is_none());
    }
}
