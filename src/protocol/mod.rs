// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transports for outbound commands and inbound notifications.
//!
//! Outbound traffic is one-way: [`CommandSink::send`] returns nothing, and
//! whatever happens to the request afterwards is invisible to the bridge.
//! The effect of a command, if any, comes back later as a notification.
//!
//! # Transports
//!
//! - [`ChannelSink`]: hands commands to an in-process channel
//! - [`HttpTransport`]: delivers commands to the control and queue HTTP APIs
//! - [`MqttNotificationSource`]: feeds notifications from an MQTT topic into
//!   a dispatcher

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "mqtt")]
mod mqtt;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig, HttpTransport};
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttConfig, MqttNotificationSource};

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::command::OutboundCommand;

/// A fire-and-forget destination for outbound commands.
///
/// Implementations must not block: the caller may be in the middle of a
/// state model notification.
pub trait CommandSink: Send + Sync {
    /// Hands a command over for delivery.
    fn send(&self, command: OutboundCommand);
}

impl<S: CommandSink + ?Sized> CommandSink for Arc<S> {
    fn send(&self, command: OutboundCommand) {
        (**self).send(command);
    }
}

/// Command sink backed by an unbounded tokio channel.
///
/// The receiving half can drive any custom transport, or be inspected
/// directly.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::command::{DeviceCommand, OutboundCommand};
/// use protosthetics_lib::protocol::{ChannelSink, CommandSink};
///
/// let (sink, mut rx) = ChannelSink::new();
/// sink.send(DeviceCommand::LightToggle.into());
///
/// assert_eq!(rx.try_recv().unwrap(), OutboundCommand::Device(DeviceCommand::LightToggle));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<OutboundCommand>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its commands arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Returns `true` once the receiver has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl CommandSink for ChannelSink {
    fn send(&self, command: OutboundCommand) {
        let name = command.name();
        if self.tx.send(command).is_err() {
            tracing::warn!(command = name, "Command receiver dropped, discarding command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{DeviceCommand, QueueCommand};

    #[test]
    fn channel_sink_preserves_order() {
        let (sink, mut rx) = ChannelSink::new();
        sink.send(DeviceCommand::DryerToggle.into());
        sink.send(QueueCommand::StartQueue.into());

        assert_eq!(rx.try_recv().unwrap().name(), "dryerToggle");
        assert_eq!(rx.try_recv().unwrap().name(), "startqueue");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        assert!(sink.is_closed());
        sink.send(DeviceCommand::ResetEsp.into());
    }

    #[test]
    fn arc_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        let shared: Arc<dyn CommandSink> = Arc::new(sink);
        shared.send(DeviceCommand::PrinterToggle.into());
        assert_eq!(rx.try_recv().unwrap().name(), "printerToggle");
    }
}
