// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands for the enclosure control API.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use super::Command;
use crate::error::ValueError;

/// Configuration key targeted by a `settings` command.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::command::SettingKey;
///
/// assert_eq!(SettingKey::HumLow.as_str(), "hum_low");
/// assert_eq!("filament_load_length".parse(), Ok(SettingKey::FilamentLoadLength));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    /// Humidity below which the dryer switches off.
    HumLow,
    /// Humidity above which the dryer switches on.
    HumHigh,
    /// Filament length fed on load, in millimetres.
    FilamentLoadLength,
    /// Filament length retracted on unload, in millimetres.
    FilamentUnloadLength,
}

impl SettingKey {
    /// All keys, in the order the settings page lists them.
    pub const ALL: [Self; 4] = [
        Self::HumLow,
        Self::HumHigh,
        Self::FilamentLoadLength,
        Self::FilamentUnloadLength,
    ];

    /// Returns the key name used by the configuration store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HumLow => "hum_low",
            Self::HumHigh => "hum_high",
            Self::FilamentLoadLength => "filament_load_length",
            Self::FilamentUnloadLength => "filament_unload_length",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ValueError::UnknownSettingKey(s.to_string()))
    }
}

/// A command accepted by the enclosure control API.
///
/// Numeric payloads are forwarded unchecked; range enforcement belongs to
/// the device firmware.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::command::{Command, DeviceCommand, SettingKey};
///
/// let cmd = DeviceCommand::Settings { variable: SettingKey::HumLow, data: 35.0 };
/// assert_eq!(cmd.name(), "settings");
/// assert_eq!(
///     cmd.request_body(),
///     serde_json::json!({"command": "settings", "variable": "hum_low", "data": 35.0})
/// );
///
/// assert_eq!(DeviceCommand::LightToggle.payload(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCommand {
    /// Forwards a raw line to the LED controller's serial port.
    PassSerial {
        /// The line to forward.
        payload: String,
    },
    /// Persists a configuration value.
    Settings {
        /// Which value to persist.
        variable: SettingKey,
        /// The new value.
        data: f64,
    },
    /// Sets the light brightness set-point.
    Brightness {
        /// Brightness percentage.
        payload: i64,
    },
    /// Toggles the enclosure lights.
    LightToggle,
    /// Toggles the filament dryer.
    DryerToggle,
    /// Toggles printer power.
    PrinterToggle,
    /// Starts (or finishes) a filament change.
    ChangeFilament,
    /// Pulses the LED controller's reset line.
    ResetEsp,
}

impl Command for DeviceCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::PassSerial { .. } => "passSerial",
            Self::Settings { .. } => "settings",
            Self::Brightness { .. } => "brightness",
            Self::LightToggle => "lightToggle",
            Self::DryerToggle => "dryerToggle",
            Self::PrinterToggle => "printerToggle",
            Self::ChangeFilament => "changeFilament",
            Self::ResetEsp => "resetESP",
        }
    }

    fn payload(&self) -> Option<Value> {
        match self {
            Self::PassSerial { payload } => Some(json!({ "payload": payload })),
            Self::Settings { variable, data } => Some(json!({
                "variable": variable.as_str(),
                "data": data,
            })),
            Self::Brightness { payload } => Some(json!({ "payload": payload })),
            Self::LightToggle
            | Self::DryerToggle
            | Self::PrinterToggle
            | Self::ChangeFilament
            | Self::ResetEsp => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_key_round_trip_names() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>(), Ok(key));
        }
    }

    #[test]
    fn setting_key_unknown() {
        assert_eq!(
            "words".parse::<SettingKey>(),
            Err(ValueError::UnknownSettingKey("words".to_string()))
        );
    }

    #[test]
    fn toggle_names() {
        assert_eq!(DeviceCommand::LightToggle.name(), "lightToggle");
        assert_eq!(DeviceCommand::DryerToggle.name(), "dryerToggle");
        assert_eq!(DeviceCommand::PrinterToggle.name(), "printerToggle");
        assert_eq!(DeviceCommand::ChangeFilament.name(), "changeFilament");
        assert_eq!(DeviceCommand::ResetEsp.name(), "resetESP");
    }

    #[test]
    fn unit_commands_have_bare_body() {
        assert_eq!(
            DeviceCommand::ResetEsp.request_body(),
            json!({"command": "resetESP"})
        );
    }

    #[test]
    fn pass_serial_body() {
        let cmd = DeviceCommand::PassSerial {
            payload: "P3".to_string(),
        };
        assert_eq!(
            cmd.request_body(),
            json!({"command": "passSerial", "payload": "P3"})
        );
    }

    #[test]
    fn brightness_is_forwarded_unchecked() {
        let cmd = DeviceCommand::Brightness { payload: 250 };
        assert_eq!(
            cmd.request_body(),
            json!({"command": "brightness", "payload": 250})
        );
    }
}
