// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder for bridge sessions.

use std::sync::Arc;

use crate::bridge::{Bridge, SessionId};
use crate::config::{DEFAULT_PLUGIN_ID, PluginSettings, SettingsSource};
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::feedback::{Feedback, TracingFeedback};
use crate::gateway::Gateway;
use crate::protocol::CommandSink;
use crate::state::{Origin, StateChange, StateModel};

/// Builder for a [`Bridge`] session.
///
/// The command sink is required. The plugin identifier defaults to
/// `protosthetics`, settings default to the plugin defaults and feedback
/// goes to the log unless a sink is given.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::bridge::Bridge;
/// use protosthetics_lib::config::PluginSettings;
/// use protosthetics_lib::protocol::ChannelSink;
///
/// let (sink, _rx) = ChannelSink::new();
/// let bridge = Bridge::builder(sink)
///     .with_settings(PluginSettings { hum_low: 25.0, ..PluginSettings::default() })
///     .build()
///     .unwrap();
///
/// assert_eq!(bridge.snapshot().humidity_low(), 25.0);
/// ```
pub struct BridgeBuilder {
    sink: Arc<dyn CommandSink>,
    plugin_id: String,
    settings: Option<Box<dyn SettingsSource>>,
    feedback: Arc<dyn Feedback>,
}

impl BridgeBuilder {
    /// Creates a builder sending commands through `sink`.
    #[must_use]
    pub fn new(sink: impl CommandSink + 'static) -> Self {
        Self::with_shared_sink(Arc::new(sink))
    }

    /// Creates a builder sending commands through an already shared sink.
    #[must_use]
    pub fn with_shared_sink(sink: Arc<dyn CommandSink>) -> Self {
        Self {
            sink,
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
            settings: None,
            feedback: Arc::new(TracingFeedback),
        }
    }

    /// Sets the plugin identifier accepted by the dispatcher.
    #[must_use]
    pub fn with_plugin_id(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = plugin_id.into();
        self
    }

    /// Sets the store the settings fields are seeded from.
    #[must_use]
    pub fn with_settings(mut self, source: impl SettingsSource + 'static) -> Self {
        self.settings = Some(Box::new(source));
        self
    }

    /// Sets the sink for alerts and toasts.
    #[must_use]
    pub fn with_feedback(mut self, feedback: Arc<dyn Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Loads settings, seeds the state model and wires write-through.
    ///
    /// Seeding produces no outbound commands.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the settings source fails.
    pub fn build(self) -> Result<Bridge, Error> {
        let settings = match &self.settings {
            Some(source) => source.load()?,
            None => PluginSettings::default(),
        };

        let session_id = SessionId::new();
        let state = Arc::new(StateModel::new());
        let gateway = Arc::new(Gateway::new(Arc::clone(&state), self.sink));
        gateway.attach();

        for (key, value) in settings.entries() {
            state.set(StateChange::setting(key, value), Origin::Config);
        }

        let dispatcher = Dispatcher::new(
            self.plugin_id,
            Arc::clone(&state),
            Arc::clone(&gateway),
            self.feedback,
        );

        tracing::info!(
            session = %session_id,
            plugin = dispatcher.plugin_id(),
            "Enclosure bridge session started"
        );

        Ok(Bridge::from_parts(session_id, state, gateway, dispatcher))
    }
}

impl std::fmt::Debug for BridgeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeBuilder")
            .field("plugin_id", &self.plugin_id)
            .field("has_settings", &self.settings.is_some())
            .finish_non_exhaustive()
    }
}
