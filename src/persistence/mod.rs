//! Saving and restoring the room layout as a small JSON document.

mod record;

pub use record::{SavedItem, SavedRoom, VERSION};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::SceneError;
use crate::placement::{LoadReport, PlacementController};
use crate::status::{StatusKind, StatusMessage, StatusSender};

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { count: usize, path: PathBuf },
    NothingToSave,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(LoadReport),
    NoSavedScene,
}

#[derive(Debug, Clone)]
pub struct SaveFileInfo {
    pub path: PathBuf,
    pub bytes: u64,
    pub modified: Option<SystemTime>,
}

/// File-backed scene persistence. All I/O is synchronous; payloads are a
/// few kilobytes at most.
pub struct SaveLoadService {
    path: PathBuf,
    status: StatusSender,
}

impl SaveLoadService {
    pub fn new(path: impl Into<PathBuf>, status: StatusSender) -> Self {
        Self { path: path.into(), status }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Snapshot every placed object and write the document atomically.
    pub fn save_scene(&self, controller: &PlacementController) -> Result<SaveOutcome, SceneError> {
        let items = controller.save_snapshots();
        if items.is_empty() {
            self.status.info("No objects to save");
            return Ok(SaveOutcome::NothingToSave);
        }

        let count = items.len();
        let room = SavedRoom::new(items);
        let result = serde_json::to_vec_pretty(&room)
            .map_err(|e| SceneError::InvalidSaveFile(e.to_string()))
            .and_then(|json| write_atomic(&self.path, &json));

        match result {
            Ok(()) => {
                log::info!("Room saved to: {}", self.path.display());
                self.status.info(format!("Saved {count} objects"));
                Ok(SaveOutcome::Saved { count, path: self.path.clone() })
            }
            Err(e) => {
                log::error!("Error saving room: {e}");
                self.status.send(StatusMessage { kind: e.kind(), text: format!("Save failed: {e}") });
                Err(e)
            }
        }
    }

    /// Replace the scene with the saved one. A missing, unreadable or
    /// malformed file leaves the current scene untouched.
    pub fn load_scene(&self, controller: &mut PlacementController) -> Result<LoadOutcome, SceneError> {
        if !self.path.exists() {
            self.status.info("No saved design found");
            return Ok(LoadOutcome::NoSavedScene);
        }

        let room = match self.read_room() {
            Ok(room) => room,
            Err(e) => {
                log::error!("Error loading room: {e}");
                let text = match &e {
                    SceneError::InvalidSaveFile(_) => "Invalid save file".to_string(),
                    other => format!("Load failed: {other}"),
                };
                self.status.send(StatusMessage { kind: e.kind(), text });
                return Err(e);
            }
        };

        let report = controller.load_objects(&room.items);
        if report.skipped.is_empty() {
            self.status.info(format!("Loaded {} objects", report.loaded));
        } else {
            self.status.send(StatusMessage {
                kind: StatusKind::UnknownCatalogReference,
                text: format!(
                    "Loaded {} objects ({} skipped: {})",
                    report.loaded,
                    report.skipped.len(),
                    report.skipped.join(", "),
                ),
            });
        }
        Ok(LoadOutcome::Loaded(report))
    }

    /// Remove the saved document. Never fails just because it is absent.
    pub fn delete_saved_scene(&self) -> Result<(), SceneError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                self.status.info("All saved designs deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                self.status.info("No saved designs to delete");
                Ok(())
            }
            Err(e) => {
                let err = SceneError::storage(&self.path, e);
                log::error!("Error deleting saved designs: {err}");
                self.status.send(StatusMessage { kind: err.kind(), text: format!("Delete failed: {err}") });
                Err(err)
            }
        }
    }

    pub fn has_saved_scene(&self) -> bool {
        self.path.is_file()
    }

    pub fn save_file_info(&self) -> Option<SaveFileInfo> {
        let meta = fs::metadata(&self.path).ok()?;
        Some(SaveFileInfo {
            path: self.path.clone(),
            bytes: meta.len(),
            modified: meta.modified().ok(),
        })
    }

    fn read_room(&self) -> Result<SavedRoom, SceneError> {
        let data = fs::read(&self.path).map_err(|e| SceneError::storage(&self.path, e))?;
        let room: SavedRoom = serde_json::from_slice(&data)
            .map_err(|e| SceneError::InvalidSaveFile(e.to_string()))?;
        if room.version > VERSION {
            return Err(SceneError::InvalidSaveFile(format!(
                "file version {} is newer than supported ({VERSION})",
                room.version
            )));
        }
        Ok(room)
    }
}

/// Write to a sibling temp file and rename over the target, so a failed
/// write never leaves a truncated document behind.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SceneError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| SceneError::storage(parent, e))?;
    }

    let mut tmp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    let written = fs::File::create(&tmp).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written.and_then(|()| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(SceneError::storage(path, e));
    }
    Ok(())
}
