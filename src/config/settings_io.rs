use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::settings::ToolSettings;
use crate::engine::persistence::write_text_atomic;

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("encounter_forge");
    path.push("settings.json");
    path
}

pub fn load_settings() -> ToolSettings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable files give the defaults.
pub fn load_settings_from(path: &Path) -> ToolSettings {
    let Ok(text) = fs::read_to_string(path) else {
        return ToolSettings::default();
    };
    match serde_json::from_str(&text) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "settings_unreadable_using_defaults");
            ToolSettings::default()
        }
    }
}

pub fn save_settings(settings: &ToolSettings) -> anyhow::Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &ToolSettings) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    write_text_atomic(path, &json)?;
    Ok(())
}
