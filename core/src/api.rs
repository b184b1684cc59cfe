//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `fitbuddy_core::api` instead of reaching into internal modules.

pub use crate::auth::{FieldError, LoginForm, RegisterForm, ValidationErrors};
pub use crate::catalog::{
    fallback_exercises, CatalogGateway, ExerciseRecord, StaticCatalogGateway, DEFAULT_MUSCLE,
    OFFLINE_NOTICE,
};
pub use crate::config::{
    load_default, load_from_path, AppConfig, CatalogConfig, CatalogKind, LoggingConfig,
    StorageConfig, StorageKind,
};
pub use crate::context::{AppContext, Services, ServicesFactory};
pub use crate::error::{CliError, GatewayError, StoreError};
pub use crate::navigation::{graph_for, GraphKind, NavigationError, NavigationGate, Route};
pub use crate::state::{
    FavouriteEntry, ItemsSource, ItemsState, LoadOutcome, Session, SessionId, SessionPhase,
    SessionSnapshot, StateEvent, StateManager, StateManagerHandle,
};
pub use crate::store::{DurableStore, MemoryStore, AUTH_SESSION_KEY, FAVOURITES_KEY};
