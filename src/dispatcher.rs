// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of inbound notifications.
//!
//! Every frame the print server relays passes through
//! [`Dispatcher::handle`]. Frames from other plugins are dropped. The rest
//! either update the state model, surface user feedback, trigger a queue
//! action or land in the log.

use std::sync::Arc;

use crate::command::QueueAction;
use crate::feedback::{Alert, Feedback, Toast};
use crate::gateway::Gateway;
use crate::notification::{Notification, PluginMessage};
use crate::state::{Origin, StateChange, StateModel};
use crate::types::{StatusClass, SwitchState};

/// What the dispatcher did with a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// One or more state fields were written.
    Applied,
    /// An alert or toast was raised.
    Surfaced,
    /// Logged without further effect.
    Logged,
    /// A queue action was run on the device's request.
    Invoked(QueueAction),
    /// The frame came from another plugin.
    CrossTalk,
    /// A known tag carried an unusable payload.
    Rejected,
    /// The frame was outside the known taxonomy.
    Unrecognized,
    /// The session had already ended.
    Ended,
}

/// Routes notifications to the state model, the feedback sink and the
/// gateway.
pub struct Dispatcher {
    plugin_id: String,
    state: Arc<StateModel>,
    gateway: Arc<Gateway>,
    feedback: Arc<dyn Feedback>,
}

impl Dispatcher {
    /// Creates a dispatcher accepting frames from `plugin_id`.
    #[must_use]
    pub fn new(
        plugin_id: impl Into<String>,
        state: Arc<StateModel>,
        gateway: Arc<Gateway>,
        feedback: Arc<dyn Feedback>,
    ) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            state,
            gateway,
            feedback,
        }
    }

    /// Returns the plugin identifier frames must carry.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Handles a relayed envelope.
    pub fn handle_message(&self, message: PluginMessage) -> Disposition {
        self.handle(&message.source_id, message.notification)
    }

    /// Handles one notification from `source_id`.
    ///
    /// State writes carry [`Origin::Remote`] and are visible to subscribers
    /// before this returns.
    pub fn handle(&self, source_id: &str, notification: Notification) -> Disposition {
        if source_id != self.plugin_id {
            tracing::trace!(source = source_id, "Ignoring message from another plugin");
            return Disposition::CrossTalk;
        }

        tracing::debug!(kind = ?notification.kind(), "Dispatching notification");

        match notification {
            Notification::Error(message) => {
                self.feedback.alert(Alert::new(message));
                Disposition::Surfaced
            }
            Notification::Popup(message) => {
                self.feedback.toast(Toast::new(message));
                Disposition::Surfaced
            }
            Notification::Info(message) => {
                tracing::info!(text = %message, "Enclosure info");
                Disposition::Logged
            }
            Notification::Progress(message) => {
                tracing::info!(progress = %message, "Print progress");
                Disposition::Logged
            }
            Notification::RemoteInvoke(action) => {
                self.gateway.run(action);
                Disposition::Invoked(action)
            }
            Notification::Light(level) => {
                self.apply(StateChange::LightStatus(format!("Lights {level}%")))
            }
            Notification::Dryer(state) => {
                self.apply(StateChange::DryerStatus(format!("Dryer {state}")))
            }
            Notification::Printer(state) => self.apply(printer_change(state)),
            Notification::Button(text) => self.apply(StateChange::ButtonStatus(text)),
            Notification::Temperature(reading) => self.apply(StateChange::Temperature(reading)),
            Notification::Humidity(reading) => self.apply(StateChange::Humidity(reading)),
            Notification::Filament(text) => self.apply(StateChange::FilamentStatus(text)),
            Notification::Rejected { kind, message } => {
                tracing::warn!(kind = %kind, payload = %message, "Ignoring notification with unusable payload");
                Disposition::Rejected
            }
            Notification::Unrecognized { tag, raw } => {
                tracing::debug!(tag = ?tag, raw = %raw, "Unrecognized notification");
                Disposition::Unrecognized
            }
        }
    }

    fn apply(&self, change: StateChange) -> Disposition {
        self.state.set(change, Origin::Remote);
        Disposition::Applied
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("plugin_id", &self.plugin_id)
            .finish_non_exhaustive()
    }
}

/// Printer text and style tag always change together.
fn printer_change(state: SwitchState) -> StateChange {
    StateChange::batch(vec![
        StateChange::PrinterStatus(format!("Printer {state}")),
        StateChange::PrinterStatusClass(StatusClass::from(state)),
    ])
}
