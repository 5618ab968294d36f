use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Folder holding face sheets (`<name>.png`).
    pub faces_dir: Option<PathBuf>,

    /// Event script loaded at start-up; the built-in demo otherwise.
    pub event_script: Option<PathBuf>,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            faces_dir: None,
            event_script: None,
        }
    }
}
