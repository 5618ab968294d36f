use anyhow::Context;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use dialog_craft::model::plugin_params::PluginParams;

use crate::ui::settings::UiSettings;

fn config_path(file: &str) -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("dialog_craft");
    fs::create_dir_all(&path).ok();
    path.push(file);
    path
}

pub fn params_path() -> PathBuf {
    config_path("plugin_params.json")
}

fn settings_path() -> PathBuf {
    config_path("ui_settings.json")
}

pub fn load_settings() -> UiSettings {
    load_settings_from(&settings_path())
}

/// A missing file gives the defaults silently; an unreadable one is logged.
fn load_settings_from(path: &Path) -> UiSettings {
    let Ok(text) = fs::read_to_string(path) else {
        return UiSettings::default();
    };
    serde_json::from_str(&text).unwrap_or_else(|e| {
        warn!("parsing UI settings in {}: {e}; using defaults", path.display());
        UiSettings::default()
    })
}

pub fn save_settings(settings: &UiSettings) -> anyhow::Result<()> {
    save_settings_to(settings, &settings_path())
}

fn save_settings_to(settings: &UiSettings, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).with_context(|| format!("writing UI settings to {}", path.display()))
}

/// Plugin parameters, falling back to defaults when the file is missing
/// or unreadable.
pub fn load_params() -> PluginParams {
    let path = params_path();
    let params = if path.exists() {
        PluginParams::load_from(&path).unwrap_or_else(|e| {
            warn!("{e:#}; using default plugin parameters");
            PluginParams::default()
        })
    } else {
        PluginParams::default()
    };
    params.with_env_overrides()
}

pub fn save_params(params: &PluginParams) -> anyhow::Result<()> {
    params.save_to(&params_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        let settings = UiSettings {
            ui_scale: 1.5,
            ..UiSettings::default()
        };

        save_settings_to(&settings, &path).unwrap();
        assert_eq!(load_settings_from(&path).ui_scale, 1.5);
    }

    #[test]
    fn failed_write_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("ui_settings.json");

        let err = save_settings_to(&UiSettings::default(), &path).unwrap_err();
        assert!(format!("{err:#}").contains("writing UI settings"));
    }

    #[test]
    fn unreadable_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui_settings.json");
        fs::write(&path, "{ui_scale: ").unwrap();

        assert_eq!(load_settings_from(&path).ui_scale, 1.0);
        assert_eq!(load_settings_from(&dir.path().join("none.json")).ui_scale, 1.0);
    }
}
