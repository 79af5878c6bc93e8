use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("routine data is malformed: {0}")]
    Routine(#[from] serde_json::Error),

    #[error("exercise {name} has maxReps {max_reps} below minReps {min_reps}")]
    InvalidRoutine {
        name: String,
        min_reps: u32,
        max_reps: u32,
    },

    #[error("window error: {0}")]
    Ui(#[from] eframe::Error),
}
