// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-initiated commands.
//!
//! The gateway turns user intents into outbound commands. Action buttons
//! send immediately and touch no state. Editable fields are write-through:
//! a user edit is stored in the state model, and a subscription installed by
//! [`Gateway::attach`] forwards it as a command. Writes with any other
//! [`Origin`] are never forwarded.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use protosthetics_lib::command::{DeviceCommand, OutboundCommand, SettingKey};
//! use protosthetics_lib::gateway::Gateway;
//! use protosthetics_lib::protocol::ChannelSink;
//! use protosthetics_lib::state::StateModel;
//!
//! let state = Arc::new(StateModel::new());
//! let (sink, mut rx) = ChannelSink::new();
//! let gateway = Gateway::new(state.clone(), Arc::new(sink));
//! gateway.attach();
//!
//! gateway.edit_setting(SettingKey::HumLow, 35.0);
//! assert_eq!(
//!     rx.try_recv().unwrap(),
//!     OutboundCommand::Device(DeviceCommand::Settings { variable: SettingKey::HumLow, data: 35.0 })
//! );
//! assert_eq!(state.snapshot().humidity_low(), 35.0);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::{Command, DeviceCommand, OutboundCommand, QueueAction, SettingKey};
use crate::protocol::CommandSink;
use crate::state::{Field, Origin, StateChange, StateModel};
use crate::subscription::{Subscribable, SubscriptionId};

/// Fields whose user edits are forwarded as commands.
const WRITE_THROUGH: [Field; 6] = [
    Field::PassSerial,
    Field::Brightness,
    Field::HumidityLow,
    Field::HumidityHigh,
    Field::FilamentLoad,
    Field::FilamentUnload,
];

/// Sends user-initiated commands.
pub struct Gateway {
    state: Arc<StateModel>,
    sink: Arc<dyn CommandSink>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
}

impl Gateway {
    /// Creates a gateway over `state` that sends through `sink`.
    ///
    /// Write-through is inactive until [`Gateway::attach`] is called.
    #[must_use]
    pub fn new(state: Arc<StateModel>, sink: Arc<dyn CommandSink>) -> Self {
        Self {
            state,
            sink,
            subscriptions: Mutex::new(Vec::new()),
        }
    }

    // ========== Write-through ==========

    /// Installs the write-through subscriptions.
    ///
    /// Calling this again while attached does nothing.
    pub fn attach(&self) {
        let mut subscriptions = self.subscriptions.lock();
        if !subscriptions.is_empty() {
            return;
        }

        for field in WRITE_THROUGH {
            let sink = Arc::clone(&self.sink);
            let id = self.state.subscribe(field, move |change, origin| {
                if origin != Origin::User {
                    return;
                }
                if let Some(command) = write_through_command(change) {
                    tracing::debug!(command = command.name(), "Forwarding user edit");
                    sink.send(command.into());
                }
            });
            subscriptions.push(id);
        }
    }

    /// Removes the write-through subscriptions.
    pub fn detach(&self) {
        for id in self.subscriptions.lock().drain(..) {
            self.state.unsubscribe(id);
        }
    }

    /// Returns `true` while write-through is active.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.lock().is_empty()
    }

    // ========== Editable fields ==========

    /// Sets the serial pass-through line.
    pub fn pass_serial(&self, line: impl Into<String>) {
        self.state
            .set(StateChange::PassSerial(line.into()), Origin::User);
    }

    /// Sets the brightness set-point.
    pub fn set_brightness(&self, brightness: i64) {
        self.state.set(StateChange::Brightness(brightness), Origin::User);
    }

    /// Edits one of the persisted settings.
    pub fn edit_setting(&self, key: SettingKey, value: f64) {
        self.state.set(StateChange::setting(key, value), Origin::User);
    }

    // ========== Action buttons ==========

    /// Toggles the enclosure lights.
    pub fn light_toggle(&self) {
        self.send(DeviceCommand::LightToggle);
    }

    /// Toggles the filament dryer.
    pub fn dryer_toggle(&self) {
        self.send(DeviceCommand::DryerToggle);
    }

    /// Toggles printer power.
    pub fn printer_toggle(&self) {
        self.send(DeviceCommand::PrinterToggle);
    }

    /// Starts a filament change.
    pub fn change_filament(&self) {
        self.send(DeviceCommand::ChangeFilament);
    }

    /// Resets the LED controller.
    pub fn reset_esp(&self) {
        self.send(DeviceCommand::ResetEsp);
    }

    // ========== Queue bridge ==========

    /// Resumes the print queue.
    pub fn resume_queue(&self) {
        self.run(QueueAction::ResumeQueue);
    }

    /// Starts the print queue.
    pub fn start_queue(&self) {
        self.run(QueueAction::StartQueue);
    }

    /// Activates the print queue.
    pub fn set_active(&self) {
        self.run(QueueAction::SetActive);
    }

    /// Deactivates the print queue.
    pub fn set_not_active(&self) {
        self.run(QueueAction::SetNotActive);
    }

    /// Runs a queue action.
    ///
    /// User buttons and remote invocations both end up here.
    pub fn run(&self, action: QueueAction) {
        tracing::debug!(%action, "Running queue action");
        self.send(action.command());
    }

    fn send(&self, command: impl Into<OutboundCommand>) {
        self.sink.send(command.into());
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("attached", &self.is_attached())
            .finish_non_exhaustive()
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.detach();
    }
}

fn write_through_command(change: &StateChange) -> Option<DeviceCommand> {
    match change {
        StateChange::PassSerial(line) => Some(DeviceCommand::PassSerial {
            payload: line.clone(),
        }),
        StateChange::Brightness(value) => Some(DeviceCommand::Brightness { payload: *value }),
        _ => {
            let variable = change.field()?.setting_key()?;
            let data = change.setting_value()?;
            Some(DeviceCommand::Settings { variable, data })
        }
    }
}
