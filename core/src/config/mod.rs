mod load;
mod types;

pub use load::{get_fitbuddy_data_dir, load_default, load_from_path};
pub use types::{AppConfig, CatalogConfig, CatalogKind, LoggingConfig, StorageConfig, StorageKind};
