// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is an absolute assignment of one field (or a batch of
//! them). Applying the same change twice leaves the same state, which is
//! what makes re-delivered notifications harmless.
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::state::{EnclosureState, Field, StateChange};
//!
//! let mut state = EnclosureState::new();
//! state.apply(&StateChange::DryerStatus("Dryer ON".into()));
//! assert_eq!(state.dryer_status(), "Dryer ON");
//!
//! assert_eq!(StateChange::HumidityHigh(45.0).field(), Some(Field::HumidityHigh));
//! ```

use std::fmt;

use crate::command::SettingKey;
use crate::types::{Reading, StatusClass};

/// An observable field of the state model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Last serial pass-through line.
    PassSerial,
    /// Printer power text.
    PrinterStatus,
    /// Style tag paired with the printer power text.
    PrinterStatusClass,
    /// Dryer power text.
    DryerStatus,
    /// Physical button state.
    ButtonStatus,
    /// Light state and level text.
    LightStatus,
    /// Light brightness set-point.
    Brightness,
    /// Enclosure temperature.
    Temperature,
    /// Enclosure humidity.
    Humidity,
    /// Dryer-off humidity threshold.
    HumidityLow,
    /// Dryer-on humidity threshold.
    HumidityHigh,
    /// Filament load length.
    FilamentLoad,
    /// Filament unload length.
    FilamentUnload,
    /// Filament change status text.
    FilamentStatus,
}

impl Field {
    /// All fields.
    pub const ALL: [Self; 14] = [
        Self::PassSerial,
        Self::PrinterStatus,
        Self::PrinterStatusClass,
        Self::DryerStatus,
        Self::ButtonStatus,
        Self::LightStatus,
        Self::Brightness,
        Self::Temperature,
        Self::Humidity,
        Self::HumidityLow,
        Self::HumidityHigh,
        Self::FilamentLoad,
        Self::FilamentUnload,
        Self::FilamentStatus,
    ];

    /// The four fields synced with the configuration store.
    pub const SETTINGS: [Self; 4] = [
        Self::HumidityLow,
        Self::HumidityHigh,
        Self::FilamentLoad,
        Self::FilamentUnload,
    ];

    /// Returns the field name as the presentation layer binds it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::PassSerial => "passSerial",
            Self::PrinterStatus => "printerStatus",
            Self::PrinterStatusClass => "printerStatusClass",
            Self::DryerStatus => "dryerStatus",
            Self::ButtonStatus => "buttonStatus",
            Self::LightStatus => "lightStatus",
            Self::Brightness => "brightness",
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::HumidityLow => "humidityLow",
            Self::HumidityHigh => "humidityHigh",
            Self::FilamentLoad => "filamentLoad",
            Self::FilamentUnload => "filamentUnload",
            Self::FilamentStatus => "filamentStatus",
        }
    }

    /// Returns the configuration key for settings fields.
    #[must_use]
    pub const fn setting_key(&self) -> Option<SettingKey> {
        match self {
            Self::HumidityLow => Some(SettingKey::HumLow),
            Self::HumidityHigh => Some(SettingKey::HumHigh),
            Self::FilamentLoad => Some(SettingKey::FilamentLoadLength),
            Self::FilamentUnload => Some(SettingKey::FilamentUnloadLength),
            _ => None,
        }
    }

    /// Returns `true` for the fields synced with the configuration store.
    #[must_use]
    pub const fn is_setting(&self) -> bool {
        self.setting_key().is_some()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who wrote a change.
///
/// Only [`Origin::User`] writes are pushed upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Applied from an inbound notification.
    Remote,
    /// Seeded from the configuration store at session start.
    Config,
    /// Edited by the user through the presentation layer.
    User,
}

/// Represents an assignment to one or more state model fields.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// Serial pass-through line.
    PassSerial(String),
    /// Printer power text.
    PrinterStatus(String),
    /// Printer power style tag.
    PrinterStatusClass(StatusClass),
    /// Dryer power text.
    DryerStatus(String),
    /// Button state text.
    ButtonStatus(String),
    /// Light text.
    LightStatus(String),
    /// Brightness set-point. Stored as given; not range checked.
    Brightness(i64),
    /// Temperature reading.
    Temperature(Reading),
    /// Humidity reading.
    Humidity(Reading),
    /// Dryer-off humidity threshold.
    HumidityLow(f64),
    /// Dryer-on humidity threshold.
    HumidityHigh(f64),
    /// Filament load length.
    FilamentLoad(f64),
    /// Filament unload length.
    FilamentUnload(f64),
    /// Filament status text.
    FilamentStatus(String),
    /// Several assignments applied under one lock.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a change for a settings field from its configuration key.
    #[must_use]
    pub fn setting(key: SettingKey, value: f64) -> Self {
        match key {
            SettingKey::HumLow => Self::HumidityLow(value),
            SettingKey::HumHigh => Self::HumidityHigh(value),
            SettingKey::FilamentLoadLength => Self::FilamentLoad(value),
            SettingKey::FilamentUnloadLength => Self::FilamentUnload(value),
        }
    }

    /// Creates a batch of changes.
    #[must_use]
    pub fn batch(changes: Vec<StateChange>) -> Self {
        Self::Batch(changes)
    }

    /// Returns the field this change assigns, or `None` for batches.
    #[must_use]
    pub fn field(&self) -> Option<Field> {
        let field = match self {
            Self::PassSerial(_) => Field::PassSerial,
            Self::PrinterStatus(_) => Field::PrinterStatus,
            Self::PrinterStatusClass(_) => Field::PrinterStatusClass,
            Self::DryerStatus(_) => Field::DryerStatus,
            Self::ButtonStatus(_) => Field::ButtonStatus,
            Self::LightStatus(_) => Field::LightStatus,
            Self::Brightness(_) => Field::Brightness,
            Self::Temperature(_) => Field::Temperature,
            Self::Humidity(_) => Field::Humidity,
            Self::HumidityLow(_) => Field::HumidityLow,
            Self::HumidityHigh(_) => Field::HumidityHigh,
            Self::FilamentLoad(_) => Field::FilamentLoad,
            Self::FilamentUnload(_) => Field::FilamentUnload,
            Self::FilamentStatus(_) => Field::FilamentStatus,
            Self::Batch(_) => return None,
        };
        Some(field)
    }

    /// Returns the numeric value of a settings change.
    #[must_use]
    pub fn setting_value(&self) -> Option<f64> {
        match self {
            Self::HumidityLow(v)
            | Self::HumidityHigh(v)
            | Self::FilamentLoad(v)
            | Self::FilamentUnload(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `true` if this is a batch of changes.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Returns the number of individual assignments.
    #[must_use]
    pub fn change_count(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::change_count).sum(),
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_fields_have_keys() {
        for field in Field::SETTINGS {
            assert!(field.is_setting());
        }
        assert_eq!(Field::HumidityLow.setting_key(), Some(SettingKey::HumLow));
        assert!(!Field::Brightness.is_setting());
        assert!(!Field::PassSerial.is_setting());
    }

    #[test]
    fn setting_constructor_matches_field() {
        for key in SettingKey::ALL {
            let change = StateChange::setting(key, 1.0);
            let field = change.field().unwrap();
            assert_eq!(field.setting_key(), Some(key));
            assert_eq!(change.setting_value(), Some(1.0));
        }
    }

    #[test]
    fn non_settings_have_no_setting_value() {
        assert_eq!(StateChange::Brightness(50).setting_value(), None);
    }

    #[test]
    fn change_count() {
        assert_eq!(StateChange::Brightness(10).change_count(), 1);

        let batch = StateChange::batch(vec![
            StateChange::PrinterStatus("Printer ON".into()),
            StateChange::PrinterStatusClass(StatusClass::Success),
        ]);
        assert!(batch.is_batch());
        assert_eq!(batch.field(), None);
        assert_eq!(batch.change_count(), 2);
    }

    #[test]
    fn field_names() {
        assert_eq!(Field::HumidityLow.to_string(), "humidityLow");
        assert_eq!(Field::PrinterStatusClass.name(), "printerStatusClass");
    }
}
