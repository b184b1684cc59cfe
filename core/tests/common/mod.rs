#![allow(dead_code)]

use async_trait::async_trait;
use fitbuddy_core::api::{
    CatalogGateway, DurableStore, ExerciseRecord, GatewayError, MemoryStore, StoreError,
};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// A store whose reads block until the test lets them through.
#[derive(Clone)]
pub struct GatedStore {
    pub inner: MemoryStore,
    read_gate: Arc<Semaphore>,
    read_entered: Arc<Notify>,
}

impl GatedStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            read_gate: Arc::new(Semaphore::new(0)),
            read_entered: Arc::new(Notify::new()),
        }
    }

    pub async fn wait_for_read(&self) {
        self.read_entered.notified().await;
    }

    pub fn release_read(&self) {
        self.read_gate.add_permits(1);
    }
}

#[async_trait]
impl DurableStore for GatedStore {
    fn name(&self) -> &str {
        "gated"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.read_entered.notify_one();
        let permit = self
            .read_gate
            .acquire()
            .await
            .map_err(|e| StoreError::read(key, e))?;
        permit.forget();
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.delete(key).await
    }
}

/// Gateway whose `slow` muscle group blocks until released; every other
/// group answers immediately with one record named after the group.
#[derive(Clone)]
pub struct ScriptedGateway {
    slow_gate: Arc<Semaphore>,
    slow_entered: Arc<Notify>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            slow_gate: Arc::new(Semaphore::new(0)),
            slow_entered: Arc::new(Notify::new()),
        }
    }

    pub async fn wait_for_slow(&self) {
        self.slow_entered.notified().await;
    }

    pub fn release_slow(&self) {
        self.slow_gate.add_permits(1);
    }
}

#[async_trait]
impl CatalogGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_by_muscle_group(
        &self,
        muscle: &str,
        _offset: u32,
    ) -> Result<Vec<ExerciseRecord>, GatewayError> {
        if muscle == "slow" {
            self.slow_entered.notify_one();
            let permit = self
                .slow_gate
                .acquire()
                .await
                .map_err(|e| GatewayError::Http(e.to_string()))?;
            permit.forget();
        }
        if muscle == "offline" {
            return Err(GatewayError::Http("network unreachable".to_string()));
        }
        Ok(vec![ExerciseRecord::named(format!("{muscle}-exercise")).with_muscle(muscle)])
    }

    async fn fetch_by_name(&self, _name: &str) -> Result<Option<ExerciseRecord>, GatewayError> {
        Ok(None)
    }
}
