use glam::Vec3;
use serde::{Serialize, Deserialize};

/// Current saved-scene format version.
pub const VERSION: u32 = 1;

/// One placed object as written to the saved-scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub model_id: String,
    pub position: Vec3,
    /// Degrees.
    pub rotation_euler: Vec3,
    pub scale: f32,
}

/// The saved-scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoom {
    #[serde(default = "default_version")]
    pub version: u32,
    pub items: Vec<SavedItem>,
}

fn default_version() -> u32 { VERSION }

impl SavedRoom {
    pub fn new(items: Vec<SavedItem>) -> Self {
        Self { version: VERSION, items }
    }
}
