use async_trait::async_trait;

use super::fallback::fallback_exercises;
use super::model::ExerciseRecord;
use super::r#trait::CatalogGateway;
use crate::error::GatewayError;

/// Serves the fallback dataset as if it were remote. Filters by muscle
/// (case-insensitive) and pages by offset.
#[derive(Debug, Default, Clone)]
pub struct StaticCatalogGateway;

#[async_trait]
impl CatalogGateway for StaticCatalogGateway {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_by_muscle_group(
        &self,
        muscle: &str,
        offset: u32,
    ) -> Result<Vec<ExerciseRecord>, GatewayError> {
        let muscle = muscle.trim().to_lowercase();
        Ok(fallback_exercises()
            .into_iter()
            .filter(|e| {
                muscle.is_empty()
                    || e.muscle
                        .as_deref()
                        .is_some_and(|m| m.to_lowercase() == muscle)
            })
            .skip(offset as usize)
            .collect())
    }

    async fn fetch_by_name(&self, name: &str) -> Result<Option<ExerciseRecord>, GatewayError> {
        Ok(fallback_exercises().into_iter().find(|e| e.name == name))
    }
}
