use std::path::PathBuf;

use crate::status::StatusKind;

/// Every failure the placement core can report. None of them are fatal:
/// callers turn them into a status message and carry on.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("No surface detected. Try moving your device.")]
    SurfaceNotFound,

    #[error("Invalid save file: {0}")]
    InvalidSaveFile(String),

    #[error("Storage failure at {}: {source}", .path.display())]
    StorageFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown catalog item: {0}")]
    UnknownCatalogReference(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl SceneError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StorageFailure { path: path.into(), source }
    }

    /// Status stream category for this error.
    pub fn kind(&self) -> StatusKind {
        match self {
            SceneError::SurfaceNotFound => StatusKind::SurfaceNotFound,
            SceneError::InvalidSaveFile(_) => StatusKind::InvalidSaveFile,
            SceneError::StorageFailure { .. } => StatusKind::StorageFailure,
            SceneError::UnknownCatalogReference(_) => StatusKind::UnknownCatalogReference,
            SceneError::Catalog(_) => StatusKind::InvalidCatalog,
            SceneError::Settings(_) => StatusKind::InvalidSettings,
        }
    }
}
