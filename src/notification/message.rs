// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin message envelopes as relayed by the print server.

use serde_json::Value;

use crate::error::ParseError;
use crate::notification::Notification;

/// A notification together with the plugin that pushed it.
///
/// The print server relays every plugin's messages over the same channel as
/// `{"plugin": <id>, "data": <frame>}`.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::notification::{Notification, PluginMessage};
///
/// let msg = PluginMessage::from_json(
///     r#"{"plugin":"protosthetics","data":{"type":"B1","message":"held"}}"#,
/// ).unwrap();
/// assert_eq!(msg.source_id, "protosthetics");
/// assert_eq!(msg.notification, Notification::Button("held".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PluginMessage {
    /// Identifier of the plugin that sent the frame.
    pub source_id: String,
    /// The decoded frame.
    pub notification: Notification,
}

impl PluginMessage {
    /// Creates a message from its parts.
    #[must_use]
    pub fn new(source_id: impl Into<String>, notification: Notification) -> Self {
        Self {
            source_id: source_id.into(),
            notification,
        }
    }

    /// Decodes an envelope.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if the envelope is not an
    /// object and `ParseError::MissingField` if `plugin` is absent or not a
    /// string. A missing `data` decodes as an unrecognized notification.
    pub fn from_value(mut envelope: Value) -> Result<Self, ParseError> {
        let Some(fields) = envelope.as_object_mut() else {
            return Err(ParseError::UnexpectedFormat(
                "plugin message is not an object".to_string(),
            ));
        };

        let source_id = match fields.get("plugin") {
            Some(Value::String(id)) => id.clone(),
            _ => return Err(ParseError::MissingField("plugin".to_string())),
        };
        let data = fields.remove("data").unwrap_or(Value::Null);

        Ok(Self::new(source_id, Notification::from_value(data)))
    }

    /// Parses and decodes an envelope.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` for invalid JSON, otherwise as
    /// [`PluginMessage::from_value`].
    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Self::from_value(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_foreign_plugin() {
        let msg = PluginMessage::from_value(json!({
            "plugin": "otherplugin",
            "data": {"type": "P", "message": 0}
        }))
        .unwrap();
        assert_eq!(msg.source_id, "otherplugin");
        assert!(matches!(msg.notification, Notification::Printer(_)));
    }

    #[test]
    fn missing_plugin_field() {
        let err = PluginMessage::from_value(json!({"data": {}})).unwrap_err();
        assert!(matches!(err, ParseError::MissingField(ref f) if f == "plugin"));
    }

    #[test]
    fn non_object_envelope() {
        assert!(matches!(
            PluginMessage::from_value(json!("hello")),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn bare_string_data_is_unrecognized() {
        let msg = PluginMessage::from_json(r#"{"plugin":"protosthetics","data":"Firmware uploaded"}"#)
            .unwrap();
        assert!(msg.notification.is_unrecognized());
    }
}
