// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protosthetics Lib - client bridge for the Protosthetics printer enclosure.
//!
//! The enclosure controller lives behind a print server plugin. It pushes
//! loosely-typed notifications (sensor readings, relay states, alerts,
//! remote queue requests) and accepts fire-and-forget commands. This crate
//! keeps a live, observable model of the enclosure in sync with those
//! notifications and turns user intents back into commands.
//!
//! # Overview
//!
//! - **Inbound**: [`notification::Notification`] decodes frames once, at the
//!   boundary. The [`dispatcher::Dispatcher`] routes them to the state model,
//!   the user feedback sink or the queue bridge.
//! - **State**: [`state::StateModel`] holds every display field and notifies
//!   subscribers synchronously on every write, tagged with who wrote it.
//! - **Outbound**: [`gateway::Gateway`] sends action buttons and write-through
//!   edits through a [`protocol::CommandSink`]. Only user edits leave the
//!   bridge; remote updates and settings seeding never echo back.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use protosthetics_lib::bridge::BridgeBuilder;
//! use protosthetics_lib::protocol::{HttpConfig, HttpTransport};
//! use protosthetics_lib::state::Field;
//! use protosthetics_lib::subscription::Subscribable;
//!
//! #[tokio::main]
//! async fn main() -> protosthetics_lib::Result<()> {
//!     let transport = Arc::new(HttpTransport::start(
//!         HttpConfig::new("octopi.local").with_api_key("secret"),
//!     )?);
//!
//!     let bridge = BridgeBuilder::with_shared_sink(transport.clone()).build()?;
//!     bridge.subscribe(Field::Temperature, |change, _origin| {
//!         println!("{change:?}");
//!     });
//!
//!     bridge.gateway().light_toggle();
//!
//!     bridge.shutdown();
//!     transport.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `http` (default): [`protocol::HttpTransport`] for the print server API
//! - `mqtt` (default): [`protocol::MqttNotificationSource`] for relayed notifications

pub mod bridge;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod notification;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod types;

pub use bridge::{Bridge, BridgeBuilder, SessionId};
pub use command::{Command, DeviceCommand, OutboundCommand, QueueAction, QueueCommand, SettingKey};
pub use config::{PluginSettings, SettingsSource};
pub use dispatcher::{Dispatcher, Disposition};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
pub use feedback::{Alert, Feedback, Toast, TracingFeedback};
pub use gateway::Gateway;
pub use notification::{Notification, NotificationKind, PluginMessage};
pub use protocol::{ChannelSink, CommandSink};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, HttpTransport};
#[cfg(feature = "mqtt")]
pub use protocol::{MqttConfig, MqttNotificationSource};
pub use state::{EnclosureState, Field, Origin, StateChange, StateModel};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{Reading, StatusClass, SwitchState};
