// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoder for `{type, message}` notification frames.

use serde_json::{Number, Value};

use super::{Notification, NotificationKind};
use crate::command::QueueAction;
use crate::types::{Reading, SwitchState};

/// Decodes an arbitrary JSON value into a notification.
///
/// Never fails: frames that are not `{type, message}` objects, or whose tag
/// is unknown, become [`Notification::Unrecognized`]; known tags carrying a
/// payload of the wrong shape become [`Notification::Rejected`].
pub(crate) fn decode(frame: Value) -> Notification {
    let Value::Object(mut fields) = frame else {
        return Notification::Unrecognized {
            tag: None,
            raw: frame,
        };
    };

    let tag = match fields.get("type") {
        Some(Value::String(tag)) => tag.clone(),
        _ => {
            return Notification::Unrecognized {
                tag: None,
                raw: Value::Object(fields),
            };
        }
    };

    let Ok(kind) = tag.parse::<NotificationKind>() else {
        return Notification::Unrecognized {
            tag: Some(tag),
            raw: Value::Object(fields),
        };
    };

    let message = fields.remove("message").unwrap_or(Value::Null);
    decode_message(kind, message)
}

fn decode_message(kind: NotificationKind, message: Value) -> Notification {
    let decoded = match kind {
        NotificationKind::Error => Some(Notification::Error(message_text(&message))),
        NotificationKind::Info => Some(Notification::Info(message_text(&message))),
        NotificationKind::Pop => Some(Notification::Popup(message_text(&message))),
        NotificationKind::Function => message
            .as_str()
            .and_then(|name| name.parse::<QueueAction>().ok())
            .map(Notification::RemoteInvoke),
        NotificationKind::Light => Some(Notification::Light(message_text(&message))),
        NotificationKind::Dryer => message
            .as_str()
            .and_then(SwitchState::from_flag_str)
            .map(Notification::Dryer),
        NotificationKind::Printer => printer_flag(&message).map(Notification::Printer),
        NotificationKind::Button => Some(Notification::Button(message_text(&message))),
        NotificationKind::Temperature => message
            .as_f64()
            .map(|raw| Notification::Temperature(Reading::rounded(raw))),
        NotificationKind::Humidity => message
            .as_f64()
            .map(|raw| Notification::Humidity(Reading::rounded(raw))),
        NotificationKind::Filament => Some(Notification::Filament(message_text(&message))),
        NotificationKind::Progress => Some(Notification::Progress(message_text(&message))),
    };

    decoded.unwrap_or(Notification::Rejected { kind, message })
}

/// Printer flags compare loosely against `1` and `0`.
///
/// Booleans count as `1`/`0`. Strings are trimmed and read as a decimal
/// number, and a blank string counts as `0`. So `1`, `1.0`, `"1"`, `" 1 "`
/// and `true` mean on while `0`, `"0"`, `""` and `false` mean off. `null`,
/// arrays and objects are never flags.
fn printer_flag(message: &Value) -> Option<SwitchState> {
    match message {
        Value::Number(n) => n.as_f64().and_then(SwitchState::from_flag_number),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(SwitchState::Off)
            } else {
                s.parse::<f64>().ok().and_then(SwitchState::from_flag_number)
            }
        }
        Value::Bool(on) => Some(SwitchState::from(*on)),
        _ => None,
    }
}

/// Renders a message payload as display text.
///
/// Strings are taken verbatim, numbers use their shortest decimal form
/// (`100.0` renders as `100`), `null` renders empty.
fn message_text(message: &Value) -> String {
    match message {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}
