use async_trait::async_trait;

use super::fallback::fallback_exercises;
use super::model::ExerciseRecord;
use crate::error::GatewayError;

#[async_trait]
pub trait CatalogGateway: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_by_muscle_group(
        &self,
        muscle: &str,
        offset: u32,
    ) -> Result<Vec<ExerciseRecord>, GatewayError>;

    /// First exact-name match, if any.
    async fn fetch_by_name(&self, name: &str) -> Result<Option<ExerciseRecord>, GatewayError>;

    fn static_fallback(&self) -> Vec<ExerciseRecord> {
        fallback_exercises()
    }
}
