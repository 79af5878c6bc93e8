use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::ExerciseDefinition;

pub const ROUTINE_JSON: &str = include_str!("exercises.json");

#[derive(Serialize, Deserialize, Debug)]
pub struct Routine {
    #[serde(rename = "Exercises")]
    pub exercises: Vec<ExerciseDefinition>,
}

pub fn load_routine(routine_json: &str) -> Result<Vec<ExerciseDefinition>, AppError> {
    let routine: Routine = serde_json::from_str(routine_json)?;

    for exercise in &routine.exercises {
        if exercise.max_reps < exercise.min_reps {
            return Err(AppError::InvalidRoutine {
                name: exercise.name.clone(),
                min_reps: exercise.min_reps,
                max_reps: exercise.max_reps,
            });
        }
    }

    Ok(routine.exercises)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_routine_has_seven_exercises_in_order() {
        let exercises = load_routine(ROUTINE_JSON).unwrap();
        let names: Vec<&str> = exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Squats",
                "Dand",
                "Hanuman Dand",
                "Push-ups",
                "Rammurti Dand",
                "Dumbbell Cut",
                "Hammer Cut"
            ]
        );
        assert_eq!(exercises[0].min_reps, 30);
        assert_eq!(exercises[0].max_reps, 100);
        assert_eq!(exercises[1].min_reps, exercises[1].max_reps);
    }

    #[test]
    fn rejects_max_below_min() {
        let json = r#"{"Exercises":[{"name":"Odd","repGoal":"","minReps":10,"maxReps":5,"image":""}]}"#;
        match load_routine(json) {
            Err(AppError::InvalidRoutine { name, .. }) => assert_eq!(name, "Odd"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(load_routine("{"), Err(AppError::Routine(_))));
    }
}
