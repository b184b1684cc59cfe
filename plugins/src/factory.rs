use std::sync::Arc;

use anyhow::Result;

use fitbuddy_core::api::{
    AppConfig, CatalogGateway, CatalogKind, DurableStore, MemoryStore, StaticCatalogGateway,
    StorageKind,
};

use crate::catalog::HttpCatalogGateway;
use crate::store::FileStore;

pub fn build_store(cfg: &AppConfig) -> Result<Arc<dyn DurableStore>> {
    match cfg.storage.kind {
        StorageKind::File => Ok(Arc::new(FileStore::from_config_path(
            &cfg.storage.directory,
        )?)),
        StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

pub fn build_catalog(cfg: &AppConfig) -> Result<Arc<dyn CatalogGateway>> {
    match cfg.catalog.kind {
        CatalogKind::Http => Ok(Arc::new(HttpCatalogGateway::new(
            cfg.catalog.base_url.clone(),
            cfg.catalog.api_key.clone(),
            cfg.catalog.timeout_ms,
        )?)),
        CatalogKind::Static => Ok(Arc::new(StaticCatalogGateway::default())),
    }
}
