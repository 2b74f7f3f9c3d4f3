//! User settings, persisted as JSON values under fixed keys in an
//! [`eframe::Storage`].
//!
//! Every key is read independently: a missing or malformed value falls back
//! to its default without affecting the others.

use std::collections::HashMap;

use egui::{pos2, Pos2};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::input::InputConfig;
use crate::tool::{PenAttributes, ToolBox, ToolKind};

pub const SELECTED_TOOL_KEY: &str = "ink_overlay.selected_tool";
pub const PEN_PRESETS_KEY: &str = "ink_overlay.pen_presets";
pub const TOOLBAR_KEY: &str = "ink_overlay.toolbar";
pub const AUTO_CLEAR_ON_HIDE_KEY: &str = "ink_overlay.auto_clear_on_hide";
pub const VISIBLE_ON_START_KEY: &str = "ink_overlay.visible_on_start";
pub const STYLUS_ONLY_KEY: &str = "ink_overlay.stylus_only";
pub const STRAIGHT_LINE_SNAP_KEY: &str = "ink_overlay.straight_line_snap";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolbarOrientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Where the toolbar sits on screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolbarPlacement {
    pub orientation: ToolbarOrientation,
    pub position: Pos2,
}

impl Default for ToolbarPlacement {
    fn default() -> Self {
        Self {
            orientation: ToolbarOrientation::Horizontal,
            position: pos2(16.0, 16.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySettings {
    pub selected_tool: ToolKind,
    pub pen_presets: HashMap<ToolKind, PenAttributes>,
    pub toolbar: ToolbarPlacement,
    /// Clear every path when the overlay is hidden
    pub auto_clear_on_hide: bool,
    pub visible_on_start: bool,
    pub stylus_only: bool,
    pub straight_line_snap: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        let tools = ToolBox::default();
        let input = InputConfig::default();
        Self {
            selected_tool: tools.selected(),
            pen_presets: tools.presets().clone(),
            toolbar: ToolbarPlacement::default(),
            auto_clear_on_hide: false,
            visible_on_start: true,
            stylus_only: input.stylus_only,
            straight_line_snap: input.straight_line_snap,
        }
    }
}

impl OverlaySettings {
    /// Read every setting from `storage`, using the default for any key that
    /// is missing or cannot be decoded.
    pub fn load(storage: &dyn eframe::Storage) -> Self {
        let defaults = Self::default();
        Self {
            selected_tool: read_or(storage, SELECTED_TOOL_KEY, defaults.selected_tool),
            pen_presets: read_or(storage, PEN_PRESETS_KEY, defaults.pen_presets),
            toolbar: read_or(storage, TOOLBAR_KEY, defaults.toolbar),
            auto_clear_on_hide: read_or(storage, AUTO_CLEAR_ON_HIDE_KEY, defaults.auto_clear_on_hide),
            visible_on_start: read_or(storage, VISIBLE_ON_START_KEY, defaults.visible_on_start),
            stylus_only: read_or(storage, STYLUS_ONLY_KEY, defaults.stylus_only),
            straight_line_snap: read_or(storage, STRAIGHT_LINE_SNAP_KEY, defaults.straight_line_snap),
        }
    }

    /// Write every setting to `storage`. Does not flush.
    pub fn save(&self, storage: &mut dyn eframe::Storage) -> Result<(), SettingsError> {
        write(storage, SELECTED_TOOL_KEY, &self.selected_tool)?;
        write(storage, PEN_PRESETS_KEY, &self.pen_presets)?;
        write(storage, TOOLBAR_KEY, &self.toolbar)?;
        write(storage, AUTO_CLEAR_ON_HIDE_KEY, &self.auto_clear_on_hide)?;
        write(storage, VISIBLE_ON_START_KEY, &self.visible_on_start)?;
        write(storage, STYLUS_ONLY_KEY, &self.stylus_only)?;
        write(storage, STRAIGHT_LINE_SNAP_KEY, &self.straight_line_snap)?;
        Ok(())
    }

    pub fn tool_box(&self) -> ToolBox {
        ToolBox::new(self.selected_tool, self.pen_presets.values().copied())
    }

    /// Input configuration with the user's flags applied over `base`
    pub fn input_config(&self, base: InputConfig) -> InputConfig {
        InputConfig {
            stylus_only: self.stylus_only,
            straight_line_snap: self.straight_line_snap,
            ..base
        }
    }

    /// Copy the live tool selection and presets back into the settings
    pub fn update_tools(&mut self, tools: &ToolBox) {
        self.selected_tool = tools.selected();
        self.pen_presets = tools.presets().clone();
    }
}

fn read_or<T: DeserializeOwned>(storage: &dyn eframe::Storage, key: &'static str, default: T) -> T {
    let Some(raw) = storage.get_string(key) else {
        debug!("Setting '{}' not stored, using default", key);
        return default;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!("Malformed setting '{}' ({}), using default", key, err);
            default
        }
    }
}

fn write<T: Serialize>(storage: &mut dyn eframe::Storage, key: &'static str, value: &T) -> Result<(), SettingsError> {
    let json = serde_json::to_string(value).map_err(|source| SettingsError::Serialization { key, source })?;
    storage.set_string(key, json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[derive(Default)]
    struct MemoryStorage {
        values: HashMap<String, String>,
    }

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.values.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_empty_storage_loads_defaults() {
        let storage = MemoryStorage::default();
        assert_eq!(OverlaySettings::load(&storage), OverlaySettings::default());
    }

    #[test]
    fn test_saved_settings_load_back() {
        let mut settings = OverlaySettings {
            selected_tool: ToolKind::Highlighter,
            stylus_only: true,
            auto_clear_on_hide: true,
            ..OverlaySettings::default()
        };
        settings.toolbar.orientation = ToolbarOrientation::Vertical;
        settings
            .pen_presets
            .insert(ToolKind::Pen, PenAttributes::new(ToolKind::Pen).with_color(Color32::BLUE));

        let mut storage = MemoryStorage::default();
        settings.save(&mut storage).unwrap();
        assert_eq!(OverlaySettings::load(&storage), settings);
    }

    #[test]
    fn test_malformed_key_falls_back_alone() {
        let mut storage = MemoryStorage::default();
        storage.values.insert(STYLUS_ONLY_KEY.to_string(), "not json".to_string());
        storage.values.insert(SELECTED_TOOL_KEY.to_string(), "\"Eraser\"".to_string());

        let settings = OverlaySettings::load(&storage);
        assert!(!settings.stylus_only);
        assert_eq!(settings.selected_tool, ToolKind::Eraser);
    }

    #[test]
    fn test_tool_box_round_trips_presets() {
        let settings = OverlaySettings::default();
        let tools = settings.tool_box();
        assert_eq!(tools, ToolBox::default());
    }

    #[test]
    fn test_input_config_applies_flags() {
        let settings = OverlaySettings {
            stylus_only: true,
            straight_line_snap: false,
            ..OverlaySettings::default()
        };
        let config = settings.input_config(InputConfig::default());
        assert!(config.stylus_only);
        assert!(!config.straight_line_snap);
        assert_eq!(config.hold_delay, InputConfig::default().hold_delay);
    }
}
