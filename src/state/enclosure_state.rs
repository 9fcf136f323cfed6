// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot of everything the enclosure panel displays.

use crate::config::PluginSettings;
use crate::types::{Reading, StatusClass};

use super::{Field, StateChange};

/// Current values of all state model fields.
///
/// A fresh state holds the texts the panel shows before the enclosure has
/// reported anything, and the settings fields hold the plugin defaults until
/// they are seeded from the configuration store.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::state::EnclosureState;
///
/// let state = EnclosureState::new();
/// assert_eq!(state.printer_status(), "Printer ON");
/// assert_eq!(state.brightness(), 50);
/// assert_eq!(state.temperature().to_string(), "0.00");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosureState {
    pass_serial: String,
    printer_status: String,
    printer_status_class: StatusClass,
    dryer_status: String,
    button_status: String,
    light_status: String,
    brightness: i64,
    temperature: Reading,
    humidity: Reading,
    humidity_low: f64,
    humidity_high: f64,
    filament_load: f64,
    filament_unload: f64,
    filament_status: String,
}

impl Default for EnclosureState {
    fn default() -> Self {
        let defaults = PluginSettings::default();
        Self {
            pass_serial: "Ready".to_string(),
            printer_status: "Printer ON".to_string(),
            printer_status_class: StatusClass::Success,
            dryer_status: "Dryer OFF".to_string(),
            button_status: "Ready".to_string(),
            light_status: "Lights ON".to_string(),
            brightness: 50,
            temperature: Reading::ZERO,
            humidity: Reading::ZERO,
            humidity_low: defaults.hum_low,
            humidity_high: defaults.hum_high,
            filament_load: defaults.filament_load_length,
            filament_unload: defaults.filament_unload_length,
            filament_status: String::new(),
        }
    }
}

/// Assigns and reports whether the value differed.
fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl EnclosureState {
    /// Creates the initial display state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a change.
    ///
    /// Returns `true` if any field actually changed value.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::PassSerial(v) => assign(&mut self.pass_serial, v.clone()),
            StateChange::PrinterStatus(v) => assign(&mut self.printer_status, v.clone()),
            StateChange::PrinterStatusClass(v) => assign(&mut self.printer_status_class, *v),
            StateChange::DryerStatus(v) => assign(&mut self.dryer_status, v.clone()),
            StateChange::ButtonStatus(v) => assign(&mut self.button_status, v.clone()),
            StateChange::LightStatus(v) => assign(&mut self.light_status, v.clone()),
            StateChange::Brightness(v) => assign(&mut self.brightness, *v),
            StateChange::Temperature(v) => assign(&mut self.temperature, *v),
            StateChange::Humidity(v) => assign(&mut self.humidity, *v),
            StateChange::HumidityLow(v) => assign(&mut self.humidity_low, *v),
            StateChange::HumidityHigh(v) => assign(&mut self.humidity_high, *v),
            StateChange::FilamentLoad(v) => assign(&mut self.filament_load, *v),
            StateChange::FilamentUnload(v) => assign(&mut self.filament_unload, *v),
            StateChange::FilamentStatus(v) => assign(&mut self.filament_status, v.clone()),
            StateChange::Batch(changes) => changes
                .iter()
                .fold(false, |changed, nested| self.apply(nested) || changed),
        }
    }

    /// Returns the current value of a field, as the change that would set it.
    #[must_use]
    pub fn field(&self, field: Field) -> StateChange {
        match field {
            Field::PassSerial => StateChange::PassSerial(self.pass_serial.clone()),
            Field::PrinterStatus => StateChange::PrinterStatus(self.printer_status.clone()),
            Field::PrinterStatusClass => {
                StateChange::PrinterStatusClass(self.printer_status_class)
            }
            Field::DryerStatus => StateChange::DryerStatus(self.dryer_status.clone()),
            Field::ButtonStatus => StateChange::ButtonStatus(self.button_status.clone()),
            Field::LightStatus => StateChange::LightStatus(self.light_status.clone()),
            Field::Brightness => StateChange::Brightness(self.brightness),
            Field::Temperature => StateChange::Temperature(self.temperature),
            Field::Humidity => StateChange::Humidity(self.humidity),
            Field::HumidityLow => StateChange::HumidityLow(self.humidity_low),
            Field::HumidityHigh => StateChange::HumidityHigh(self.humidity_high),
            Field::FilamentLoad => StateChange::FilamentLoad(self.filament_load),
            Field::FilamentUnload => StateChange::FilamentUnload(self.filament_unload),
            Field::FilamentStatus => StateChange::FilamentStatus(self.filament_status.clone()),
        }
    }

    /// Last serial pass-through line.
    #[must_use]
    pub fn pass_serial(&self) -> &str {
        &self.pass_serial
    }

    /// Printer power text.
    #[must_use]
    pub fn printer_status(&self) -> &str {
        &self.printer_status
    }

    /// Style tag paired with the printer power text.
    #[must_use]
    pub fn printer_status_class(&self) -> StatusClass {
        self.printer_status_class
    }

    /// Dryer power text.
    #[must_use]
    pub fn dryer_status(&self) -> &str {
        &self.dryer_status
    }

    /// Button state text.
    #[must_use]
    pub fn button_status(&self) -> &str {
        &self.button_status
    }

    /// Light text.
    #[must_use]
    pub fn light_status(&self) -> &str {
        &self.light_status
    }

    /// Brightness set-point.
    #[must_use]
    pub fn brightness(&self) -> i64 {
        self.brightness
    }

    /// Latest temperature reading.
    #[must_use]
    pub fn temperature(&self) -> Reading {
        self.temperature
    }

    /// Latest humidity reading.
    #[must_use]
    pub fn humidity(&self) -> Reading {
        self.humidity
    }

    /// Dryer-off humidity threshold.
    #[must_use]
    pub fn humidity_low(&self) -> f64 {
        self.humidity_low
    }

    /// Dryer-on humidity threshold.
    #[must_use]
    pub fn humidity_high(&self) -> f64 {
        self.humidity_high
    }

    /// Filament load length.
    #[must_use]
    pub fn filament_load(&self) -> f64 {
        self.filament_load
    }

    /// Filament unload length.
    #[must_use]
    pub fn filament_unload(&self) -> f64 {
        self.filament_unload
    }

    /// Filament status text.
    #[must_use]
    pub fn filament_status(&self) -> &str {
        &self.filament_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_display_values() {
        let state = EnclosureState::new();
        assert_eq!(state.pass_serial(), "Ready");
        assert_eq!(state.printer_status_class(), StatusClass::Success);
        assert_eq!(state.dryer_status(), "Dryer OFF");
        assert_eq!(state.button_status(), "Ready");
        assert_eq!(state.light_status(), "Lights ON");
        assert_eq!(state.humidity().to_string(), "0.00");
        assert_eq!(state.filament_status(), "");
    }

    #[test]
    fn initial_settings_are_plugin_defaults() {
        let state = EnclosureState::new();
        assert_eq!(state.field(Field::HumidityLow), StateChange::HumidityLow(30.0));
        assert_eq!(state.field(Field::HumidityHigh), StateChange::HumidityHigh(40.0));
        assert_eq!(state.field(Field::FilamentLoad), StateChange::FilamentLoad(120.0));
        assert_eq!(
            state.field(Field::FilamentUnload),
            StateChange::FilamentUnload(100.0)
        );
    }

    #[test]
    fn apply_reports_change() {
        let mut state = EnclosureState::new();
        assert!(state.apply(&StateChange::FilamentStatus("jammed".into())));
        assert!(!state.apply(&StateChange::FilamentStatus("jammed".into())));
        assert_eq!(state.filament_status(), "jammed");
    }

    #[test]
    fn apply_batch() {
        let mut state = EnclosureState::new();
        let changed = state.apply(&StateChange::batch(vec![
            StateChange::PrinterStatus("Printer OFF".into()),
            StateChange::PrinterStatusClass(StatusClass::Danger),
        ]));
        assert!(changed);
        assert_eq!(state.printer_status(), "Printer OFF");
        assert_eq!(state.printer_status_class(), StatusClass::Danger);
    }

    #[test]
    fn brightness_is_stored_unchecked() {
        let mut state = EnclosureState::new();
        state.apply(&StateChange::Brightness(-20));
        assert_eq!(state.brightness(), -20);
    }

    #[test]
    fn field_round_trips_through_apply() {
        let source = {
            let mut s = EnclosureState::new();
            s.apply(&StateChange::LightStatus("Lights 12%".into()));
            s.apply(&StateChange::Temperature(Reading::rounded(24.5)));
            s
        };
        let mut copy = EnclosureState::new();
        for field in Field::ALL {
            copy.apply(&source.field(field));
        }
        assert_eq!(copy, source);
    }
}
