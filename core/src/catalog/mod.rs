//! Exercise catalog boundary: the record type, the gateway trait and the
//! always-available fallback dataset.

pub mod fallback;
pub mod model;
pub mod static_gateway;
pub mod r#trait;

pub use fallback::fallback_exercises;
pub use model::ExerciseRecord;
pub use r#trait::CatalogGateway;
pub use static_gateway::StaticCatalogGateway;

pub const DEFAULT_MUSCLE: &str = "biceps";
pub const OFFLINE_NOTICE: &str = "Offline Mode Active";
