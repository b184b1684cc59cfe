//! ServicesFactory 实现：按配置构建 store 与 catalog gateway，供 CLI 复用。
use async_trait::async_trait;
use fitbuddy_core::api::{AppConfig, CliError, Services, ServicesFactory};

use crate::factory;

pub struct PluginServicesFactory;

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError> {
        let store = factory::build_store(cfg).map_err(|e| CliError::Config(e.to_string()))?;
        // HTTP 客户端构建失败属于内部错误，不是配置错误
        let catalog = factory::build_catalog(cfg)?;
        tracing::debug!(
            target: "fitbuddy.services",
            stage = "services.built",
            store = store.name(),
            catalog = catalog.name()
        );
        Ok(Services { store, catalog })
    }
}
