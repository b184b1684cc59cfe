use crate::catalog::CatalogGateway;
use crate::config::AppConfig;
use crate::error::CliError;
use crate::state::StateManager;
use crate::store::DurableStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct Services {
    pub store: Arc<dyn DurableStore>,
    pub catalog: Arc<dyn CatalogGateway>,
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError>;
}

/// Everything one process lifetime needs: config, adapters and the state
/// container built on top of them.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    services: Services,
    state: StateManager,
}

impl AppContext {
    pub async fn new(
        cfg: AppConfig,
        services_factory: Arc<dyn ServicesFactory>,
    ) -> Result<Self, CliError> {
        let services = services_factory.build_services(&cfg).await?;
        Ok(Self::with_services(cfg, services))
    }

    pub fn with_services(cfg: AppConfig, services: Services) -> Self {
        let state = StateManager::new(services.store.clone());
        Self {
            cfg,
            services,
            state,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn catalog(&self) -> &dyn CatalogGateway {
        self.services.catalog.as_ref()
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }
}
