use super::model::ExerciseRecord;

fn body_only(
    name: &str,
    muscle: &str,
    difficulty: &str,
    instructions: &str,
) -> ExerciseRecord {
    ExerciseRecord {
        name: name.to_string(),
        muscle: Some(muscle.to_string()),
        kind: Some("strength".to_string()),
        equipment: Some("body only".to_string()),
        difficulty: Some(difficulty.to_string()),
        instructions: Some(instructions.to_string()),
    }
}

/// The fixed offline dataset.
pub fn fallback_exercises() -> Vec<ExerciseRecord> {
    vec![
        body_only(
            "Push-ups",
            "chest",
            "beginner",
            "Start in plank position, lower body until chest nearly touches floor, push back up.",
        ),
        body_only(
            "Squats",
            "quadriceps",
            "beginner",
            "Stand with feet shoulder-width apart, lower body as if sitting, return to standing.",
        ),
        body_only(
            "Plank",
            "abdominals",
            "beginner",
            "Hold body in straight line, supported on forearms and toes.",
        ),
        body_only(
            "Lunges",
            "quadriceps",
            "intermediate",
            "Step forward into lunge position, lower back knee toward ground, push back to start.",
        ),
        body_only(
            "Burpees",
            "full body",
            "intermediate",
            "Squat down, jump back to plank, do push-up, jump feet forward, jump up.",
        ),
    ]
}
