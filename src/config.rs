// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin settings read from the configuration store.
//!
//! The store is owned by the host application. The bridge reads it once,
//! at session start, to seed the four settings fields; after that the
//! state model is the source of truth and edits are pushed back with
//! `settings` commands.
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::config::PluginSettings;
//!
//! let settings = PluginSettings::from_json(r#"{"hum_low": 25, "hum_high": 45}"#).unwrap();
//! assert!((settings.hum_low - 25.0).abs() < f64::EPSILON);
//! // Missing keys fall back to the plugin defaults.
//! assert!((settings.filament_load_length - 120.0).abs() < f64::EPSILON);
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::command::SettingKey;
use crate::error::{ConfigError, ParseError};

/// Plugin identity used on the notification bus and in API paths.
pub const DEFAULT_PLUGIN_ID: &str = "protosthetics";

/// The four synced settings values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Humidity (%) below which the dryer switches off.
    pub hum_low: f64,
    /// Humidity (%) above which the dryer switches on.
    pub hum_high: f64,
    /// Filament fed on load, in millimetres.
    pub filament_load_length: f64,
    /// Filament retracted on unload, in millimetres.
    pub filament_unload_length: f64,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            hum_low: 30.0,
            hum_high: 40.0,
            filament_load_length: 120.0,
            filament_unload_length: 100.0,
        }
    }
}

impl PluginSettings {
    /// Parses a flat settings object.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the document is not valid JSON or a
    /// value has the wrong type.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    /// Extracts the plugin section from a host settings tree.
    ///
    /// The host nests plugin settings as `plugins.<plugin_id>`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the section is absent, or
    /// `ParseError::Json` if it has the wrong shape.
    ///
    /// # Examples
    ///
    /// ```
    /// use protosthetics_lib::config::PluginSettings;
    ///
    /// let tree = serde_json::json!({
    ///     "plugins": {"protosthetics": {"hum_low": 28, "filament_unload_length": 90}}
    /// });
    /// let settings = PluginSettings::from_settings_tree(&tree, "protosthetics").unwrap();
    /// assert!((settings.hum_low - 28.0).abs() < f64::EPSILON);
    /// assert!((settings.hum_high - 40.0).abs() < f64::EPSILON);
    /// ```
    pub fn from_settings_tree(tree: &Value, plugin_id: &str) -> Result<Self, ParseError> {
        let section = tree
            .get("plugins")
            .and_then(|plugins| plugins.get(plugin_id))
            .ok_or_else(|| ParseError::MissingField(format!("plugins.{plugin_id}")))?;
        Self::deserialize(section).map_err(Into::into)
    }

    /// Returns the value stored under a key.
    #[must_use]
    pub fn get(&self, key: SettingKey) -> f64 {
        match key {
            SettingKey::HumLow => self.hum_low,
            SettingKey::HumHigh => self.hum_high,
            SettingKey::FilamentLoadLength => self.filament_load_length,
            SettingKey::FilamentUnloadLength => self.filament_unload_length,
        }
    }

    /// Returns every key with its value.
    #[must_use]
    pub fn entries(&self) -> [(SettingKey, f64); 4] {
        SettingKey::ALL.map(|key| (key, self.get(key)))
    }
}

/// The configuration store collaborator.
///
/// Read once when a session starts.
pub trait SettingsSource {
    /// Loads the current settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the store cannot be read.
    fn load(&self) -> Result<PluginSettings, ConfigError>;
}

impl SettingsSource for PluginSettings {
    fn load(&self) -> Result<PluginSettings, ConfigError> {
        Ok(*self)
    }
}

impl<F> SettingsSource for F
where
    F: Fn() -> Result<PluginSettings, ConfigError>,
{
    fn load(&self) -> Result<PluginSettings, ConfigError> {
        self()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults() {
        let s = PluginSettings::default();
        assert_eq!(
            s.entries(),
            [
                (SettingKey::HumLow, 30.0),
                (SettingKey::HumHigh, 40.0),
                (SettingKey::FilamentLoadLength, 120.0),
                (SettingKey::FilamentUnloadLength, 100.0),
            ]
        );
    }

    #[test]
    fn empty_object_is_defaults() {
        assert_eq!(
            PluginSettings::from_json("{}").unwrap(),
            PluginSettings::default()
        );
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let s = PluginSettings::from_json(r#"{"words": "hello", "hum_high": 50.5}"#).unwrap();
        assert!((s.hum_high - 50.5).abs() < f64::EPSILON);
    }

    #[test]
    fn wrong_type_is_error() {
        assert!(PluginSettings::from_json(r#"{"hum_low": "thirty"}"#).is_err());
    }

    #[test]
    fn missing_plugin_section() {
        let tree = json!({"plugins": {"other": {}}});
        let err = PluginSettings::from_settings_tree(&tree, DEFAULT_PLUGIN_ID).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "plugins.protosthetics"));
    }

    #[test]
    fn closure_source() {
        let source = || -> Result<PluginSettings, ConfigError> {
            Err(ConfigError::Unavailable("offline".to_string()))
        };
        assert!(source.load().is_err());

        let fixed = PluginSettings {
            hum_low: 20.0,
            ..PluginSettings::default()
        };
        assert_eq!(fixed.load().unwrap(), fixed);
    }
}
