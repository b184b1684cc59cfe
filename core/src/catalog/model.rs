use serde::{Deserialize, Serialize};

/// One exercise as returned by the catalog and stored in favourites.
///
/// `name` is the identity key (exact, case-sensitive). Fields the remote API
/// adds beyond these are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl ExerciseRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            muscle: None,
            kind: None,
            equipment: None,
            difficulty: None,
            instructions: None,
        }
    }

    pub fn with_muscle(mut self, muscle: impl Into<String>) -> Self {
        self.muscle = Some(muscle.into());
        self
    }
}
