// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound notifications from the enclosure controller.
//!
//! The controller pushes loosely-typed `{type, message}` frames. They are
//! decoded once, at the boundary, into [`Notification`], whose variants
//! each carry a typed payload. Decoding is total: frames that cannot be
//! understood become [`Notification::Unrecognized`] or
//! [`Notification::Rejected`] so the dispatcher can log and move on.
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::notification::Notification;
//! use protosthetics_lib::types::SwitchState;
//!
//! let n = Notification::from_json(r#"{"type":"P","message":1}"#).unwrap();
//! assert_eq!(n, Notification::Printer(SwitchState::On));
//!
//! let n = Notification::from_json(r#"{"type":"DRYER","message":1}"#).unwrap();
//! assert!(n.is_rejected());
//! ```

mod kind;
mod message;
mod parser;

pub use kind::NotificationKind;
pub use message::PluginMessage;

use serde_json::Value;

use crate::command::QueueAction;
use crate::error::ParseError;
use crate::types::{Reading, SwitchState};

/// A decoded notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// `ERROR`: must be shown to the user as a blocking alert.
    Error(String),
    /// `INFO`: log only.
    Info(String),
    /// `POP`: transient success toast.
    Popup(String),
    /// `FUNCTION`: the controller asks the client to run a queue action.
    RemoteInvoke(QueueAction),
    /// `L`: light level text, without prefix or percent sign.
    Light(String),
    /// `DRYER`: dryer relay state.
    Dryer(SwitchState),
    /// `P`: printer relay state.
    Printer(SwitchState),
    /// `B1`: button event text (`press`, `release`, `held`).
    Button(String),
    /// `Temp`: enclosure temperature.
    Temperature(Reading),
    /// `Hum`: enclosure relative humidity.
    Humidity(Reading),
    /// `FIL`: filament change status text.
    Filament(String),
    /// `PROGRESS`: print progress, log only.
    Progress(String),
    /// A recognized tag whose message had an unexpected shape or value.
    Rejected {
        /// The tag that was recognized.
        kind: NotificationKind,
        /// The message as received.
        message: Value,
    },
    /// A frame outside the known taxonomy.
    Unrecognized {
        /// The `type` tag, when the frame had one.
        tag: Option<String>,
        /// The frame as received.
        raw: Value,
    },
}

impl Notification {
    /// Decodes a JSON frame.
    #[must_use]
    pub fn from_value(frame: Value) -> Self {
        parser::decode(frame)
    }

    /// Parses and decodes a JSON frame.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if `json` is not valid JSON. Valid JSON
    /// always decodes.
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        let frame: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(frame))
    }

    /// Returns the recognized kind, or `None` for unrecognized frames.
    #[must_use]
    pub fn kind(&self) -> Option<NotificationKind> {
        let kind = match self {
            Self::Error(_) => NotificationKind::Error,
            Self::Info(_) => NotificationKind::Info,
            Self::Popup(_) => NotificationKind::Pop,
            Self::RemoteInvoke(_) => NotificationKind::Function,
            Self::Light(_) => NotificationKind::Light,
            Self::Dryer(_) => NotificationKind::Dryer,
            Self::Printer(_) => NotificationKind::Printer,
            Self::Button(_) => NotificationKind::Button,
            Self::Temperature(_) => NotificationKind::Temperature,
            Self::Humidity(_) => NotificationKind::Humidity,
            Self::Filament(_) => NotificationKind::Filament,
            Self::Progress(_) => NotificationKind::Progress,
            Self::Rejected { kind, .. } => *kind,
            Self::Unrecognized { .. } => return None,
        };
        Some(kind)
    }

    /// Returns `true` if a known tag carried an unusable payload.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns `true` if the frame was outside the known taxonomy.
    #[must_use]
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized { .. })
    }
}

impl From<Value> for Notification {
    fn from(frame: Value) -> Self {
        Self::from_value(frame)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_json_invalid() {
        assert!(matches!(
            Notification::from_json("{type: L}"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn kind_of_rejected_is_recognized_kind() {
        let n = Notification::from_value(json!({"type": "DRYER", "message": 0}));
        assert_eq!(n.kind(), Some(NotificationKind::Dryer));
        assert!(n.is_rejected());
    }

    #[test]
    fn kind_of_unrecognized_is_none() {
        let n = Notification::from_value(json!({"type": "X", "message": 0}));
        assert_eq!(n.kind(), None);
        assert!(n.is_unrecognized());
    }

    #[test]
    fn from_value_conversion() {
        let n: Notification = json!({"type": "POP", "message": "Script loaded"}).into();
        assert_eq!(n, Notification::Popup("Script loaded".to_string()));
    }
}
