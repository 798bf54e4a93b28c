//! User settings, persisted by the backend service.
//!
//! This layer never touches the settings file itself; it loads and saves
//! through the backend port and keeps the last known copy for filename
//! generation and the auto-copy hook.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// On-disk image format for newly saved captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    Png,
    Jpg,
}

impl SaveFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SaveFormat::Png => "png",
            SaveFormat::Jpg => "jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub save_directory: String,
    pub file_format: SaveFormat,
    pub auto_copy: bool,
    /// Hotkey action name → accelerator string, e.g.
    /// `"capture_fullscreen" → "CmdOrCtrl+Shift+S"`.
    pub hotkeys: HashMap<String, String>,
    pub last_version: String,
}

impl Default for Settings {
    /// First-run defaults, applied when the backend has no stored settings.
    fn default() -> Self {
        Self {
            save_directory: "~/Pictures/Screenshots".to_string(),
            file_format: SaveFormat::Png,
            auto_copy: true,
            hotkeys: HashMap::from([
                ("capture_fullscreen".to_string(), "CmdOrCtrl+Shift+S".to_string()),
                ("capture_region".to_string(), "CmdOrCtrl+Shift+R".to_string()),
                ("capture_window".to_string(), "CmdOrCtrl+Shift+W".to_string()),
            ]),
            last_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
