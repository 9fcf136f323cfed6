// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge sessions.
//!
//! A [`Bridge`] ties the pieces of one client session together: the state
//! model, the dispatcher for inbound notifications and the gateway for
//! user commands. Build one with [`Bridge::builder`], feed it notifications
//! with [`Bridge::handle`] and end it with [`Bridge::shutdown`].
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::bridge::Bridge;
//! use protosthetics_lib::notification::Notification;
//! use protosthetics_lib::protocol::ChannelSink;
//!
//! let (sink, mut rx) = ChannelSink::new();
//! let bridge = Bridge::builder(sink).build().unwrap();
//!
//! let frame = Notification::from_json(r#"{"type":"P","message":0}"#).unwrap();
//! bridge.handle("protosthetics", frame);
//! assert_eq!(bridge.snapshot().printer_status(), "Printer OFF");
//!
//! bridge.gateway().light_toggle();
//! assert_eq!(rx.try_recv().unwrap().name(), "lightToggle");
//! ```

mod builder;
mod session_id;

pub use builder::BridgeBuilder;
pub use session_id::SessionId;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::dispatcher::{Disposition, Dispatcher};
use crate::error::ParseError;
use crate::gateway::Gateway;
use crate::notification::{Notification, PluginMessage};
use crate::protocol::CommandSink;
use crate::state::{EnclosureState, Field, Origin, StateChange, StateModel};
use crate::subscription::{Subscribable, SubscriptionId};

/// One live client session.
#[derive(Debug)]
pub struct Bridge {
    session_id: SessionId,
    state: Arc<StateModel>,
    gateway: Arc<Gateway>,
    dispatcher: Dispatcher,
    ended: AtomicBool,
}

impl Bridge {
    /// Starts building a session that sends commands through `sink`.
    #[must_use]
    pub fn builder(sink: impl CommandSink + 'static) -> BridgeBuilder {
        BridgeBuilder::new(sink)
    }

    fn from_parts(
        session_id: SessionId,
        state: Arc<StateModel>,
        gateway: Arc<Gateway>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            session_id,
            state,
            gateway,
            dispatcher,
            ended: AtomicBool::new(false),
        }
    }

    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Returns the plugin identifier notifications must carry.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        self.dispatcher.plugin_id()
    }

    /// Handles one notification from `source_id`.
    ///
    /// Once the session has ended nothing is dispatched and
    /// [`Disposition::Ended`] is returned.
    pub fn handle(&self, source_id: &str, notification: Notification) -> Disposition {
        if self.is_shut_down() {
            tracing::debug!(session = %self.session_id, "Dropping notification after session end");
            return Disposition::Ended;
        }
        self.dispatcher.handle(source_id, notification)
    }

    /// Handles a relayed envelope.
    pub fn handle_message(&self, message: PluginMessage) -> Disposition {
        self.handle(&message.source_id, message.notification)
    }

    /// Parses and handles a relayed `{"plugin", "data"}` envelope.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the envelope itself is malformed.
    pub fn handle_json(&self, json: &str) -> Result<Disposition, ParseError> {
        Ok(self.handle_message(PluginMessage::from_json(json)?))
    }

    /// Returns the state model.
    #[must_use]
    pub fn state(&self) -> &Arc<StateModel> {
        &self.state
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EnclosureState {
        self.state.snapshot()
    }

    /// Returns the current value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> StateChange {
        self.state.get(field)
    }

    /// Writes a field as a user edit.
    ///
    /// Editable fields are forwarded as commands while the session is live.
    pub fn edit(&self, change: StateChange) -> bool {
        self.state.set(change, Origin::User)
    }

    /// Returns the command gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Returns `true` once [`Bridge::shutdown`] has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.ended.load(Ordering::Acquire)
    }

    /// Ends the session: inbound notifications are no longer dispatched,
    /// write-through stops and every subscription is removed.
    pub fn shutdown(&self) {
        if self.ended.swap(true, Ordering::AcqRel) {
            return;
        }
        self.gateway.detach();
        self.state.clear_subscriptions();
        tracing::info!(session = %self.session_id, "Enclosure bridge session ended");
    }
}

impl Subscribable for Bridge {
    fn subscribe<F>(&self, field: Field, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        self.state.subscribe(field, callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        self.state.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DeviceCommand, OutboundCommand, SettingKey};
    use crate::config::PluginSettings;
    use crate::error::{ConfigError, Error};
    use crate::protocol::ChannelSink;

    #[test]
    fn seeding_sends_nothing() {
        let (sink, mut rx) = ChannelSink::new();
        let settings = PluginSettings {
            hum_low: 20.0,
            hum_high: 55.0,
            filament_load_length: 300.0,
            filament_unload_length: 250.0,
        };
        let bridge = Bridge::builder(sink).with_settings(settings).build().unwrap();

        let snap = bridge.snapshot();
        assert_eq!(snap.humidity_low(), 20.0);
        assert_eq!(snap.humidity_high(), 55.0);
        assert_eq!(snap.filament_load(), 300.0);
        assert_eq!(snap.filament_unload(), 250.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failing_settings_source() {
        let (sink, _rx) = ChannelSink::new();
        let result = Bridge::builder(sink)
            .with_settings(|| -> Result<PluginSettings, ConfigError> {
                Err(ConfigError::Unavailable("offline".to_string()))
            })
            .build();
        assert!(matches!(result, Err(Error::Config(ConfigError::Unavailable(_)))));
    }

    #[test]
    fn edit_forwards_until_shutdown() {
        let (sink, mut rx) = ChannelSink::new();
        let bridge = Bridge::builder(sink).build().unwrap();

        bridge.edit(StateChange::setting(SettingKey::FilamentLoadLength, 150.0));
        assert_eq!(
            rx.try_recv().unwrap(),
            OutboundCommand::Device(DeviceCommand::Settings {
                variable: SettingKey::FilamentLoadLength,
                data: 150.0,
            })
        );

        bridge.shutdown();
        assert_eq!(bridge.state().subscription_count(), 0);
        bridge.edit(StateChange::Brightness(10));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn notifications_are_dropped_after_shutdown() {
        let (sink, mut rx) = ChannelSink::new();
        let bridge = Bridge::builder(sink).build().unwrap();
        bridge.shutdown();
        assert!(bridge.is_shut_down());
        let before = bridge.snapshot();

        let invoke = Notification::from_json(r#"{"type":"FUNCTION","message":"startQueue"}"#).unwrap();
        assert_eq!(bridge.handle("protosthetics", invoke), Disposition::Ended);
        let result = bridge
            .handle_json(r#"{"plugin":"protosthetics","data":{"type":"B1","message":"held"}}"#)
            .unwrap();
        assert_eq!(result, Disposition::Ended);

        assert!(rx.try_recv().is_err());
        assert_eq!(bridge.snapshot(), before);
    }

    #[test]
    fn custom_plugin_id() {
        let (sink, _rx) = ChannelSink::new();
        let bridge = Bridge::builder(sink).with_plugin_id("enclosure").build().unwrap();
        assert_eq!(bridge.plugin_id(), "enclosure");

        let n = Notification::Button("held".to_string());
        assert_eq!(bridge.handle("protosthetics", n.clone()), Disposition::CrossTalk);
        assert_eq!(bridge.handle("enclosure", n), Disposition::Applied);
    }

    #[test]
    fn handle_json_envelope() {
        let (sink, _rx) = ChannelSink::new();
        let bridge = Bridge::builder(sink).build().unwrap();
        let result = bridge
            .handle_json(r#"{"plugin":"protosthetics","data":{"type":"FIL","message":"Loading"}}"#)
            .unwrap();
        assert_eq!(result, Disposition::Applied);
        assert_eq!(bridge.snapshot().filament_status(), "Loading");

        assert!(bridge.handle_json("[]").is_err());
    }
}
