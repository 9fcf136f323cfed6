// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outbound command definitions.
//!
//! Two disjoint command sets leave the bridge:
//!
//! | Command Type | Target | Commands |
//! |-------------|--------|----------|
//! | [`DeviceCommand`] | Enclosure control API | passSerial, settings, brightness, lightToggle, dryerToggle, printerToggle, changeFilament, resetESP |
//! | [`QueueCommand`] | Print-queue subsystem | resumequeue, startqueue, set_active |
//!
//! Both are wrapped in [`OutboundCommand`] when handed to a
//! [`CommandSink`](crate::protocol::CommandSink).
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::command::{Command, DeviceCommand};
//!
//! let cmd = DeviceCommand::Brightness { payload: 75 };
//! assert_eq!(cmd.name(), "brightness");
//! assert_eq!(cmd.payload(), Some(serde_json::json!({"payload": 75})));
//! ```

mod device;
mod queue;

pub use device::{DeviceCommand, SettingKey};
pub use queue::{QueueAction, QueueCommand, RequestMethod};

use serde_json::{Map, Value};

/// A named command with an optional payload.
pub trait Command {
    /// Returns the command name as the remote API spells it.
    fn name(&self) -> &'static str;

    /// Returns the command payload, if any.
    ///
    /// Payloads are always JSON objects.
    fn payload(&self) -> Option<Value>;

    /// Returns the full request body: the payload fields plus `command`.
    fn request_body(&self) -> Value {
        let mut body = match self.payload() {
            Some(Value::Object(fields)) => fields,
            _ => Map::new(),
        };
        body.insert("command".to_string(), Value::from(self.name()));
        Value::Object(body)
    }
}

/// Any command the bridge can emit.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCommand {
    /// A command for the enclosure control API.
    Device(DeviceCommand),
    /// A request for the print-queue subsystem.
    Queue(QueueCommand),
}

impl OutboundCommand {
    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Device(cmd) => cmd.name(),
            Self::Queue(cmd) => cmd.name(),
        }
    }

    /// Returns `true` if this targets the print-queue subsystem.
    #[must_use]
    pub fn is_queue(&self) -> bool {
        matches!(self, Self::Queue(_))
    }
}

impl From<DeviceCommand> for OutboundCommand {
    fn from(cmd: DeviceCommand) -> Self {
        Self::Device(cmd)
    }
}

impl From<QueueCommand> for OutboundCommand {
    fn from(cmd: QueueCommand) -> Self {
        Self::Queue(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_without_payload() {
        assert_eq!(
            DeviceCommand::DryerToggle.request_body(),
            serde_json::json!({"command": "dryerToggle"})
        );
    }

    #[test]
    fn outbound_wrapping() {
        let cmd: OutboundCommand = QueueCommand::StartQueue.into();
        assert!(cmd.is_queue());
        assert_eq!(cmd.name(), "startqueue");

        let cmd: OutboundCommand = DeviceCommand::ChangeFilament.into();
        assert!(!cmd.is_queue());
        assert_eq!(cmd.name(), "changeFilament");
    }
}
