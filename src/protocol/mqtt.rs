// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT source of inbound plugin messages.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::task::JoinHandle;

use crate::error::{ParseError, ProtocolError};
use crate::notification::PluginMessage;

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// First delay before polling again after a connection error.
const RECONNECT_DELAY: Duration = Duration::from_millis(500);

/// Upper bound for the reconnect delay.
const MAX_RECONNECT_DELAY: Duration = Duration::from_secs(30);

/// Connection parameters for the MQTT notification source.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::protocol::MqttConfig;
///
/// let config = MqttConfig::new("mqtt://broker.local:1883", "octoprint/plugin/protosthetics")
///     .with_credentials("user", "pass");
/// assert_eq!(config.topic(), "octoprint/plugin/protosthetics");
/// ```
#[derive(Debug, Clone)]
pub struct MqttConfig {
    broker_url: String,
    topic: String,
    client_id: Option<String>,
    credentials: Option<(String, String)>,
    keep_alive: Duration,
}

impl MqttConfig {
    /// Default keep-alive interval.
    pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(30);

    /// Creates a configuration for `topic` on the broker at `broker_url`.
    #[must_use]
    pub fn new(broker_url: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            broker_url: broker_url.into(),
            topic: topic.into(),
            client_id: None,
            credentials: None,
            keep_alive: Self::DEFAULT_KEEP_ALIVE,
        }
    }

    /// Sets a fixed client ID instead of a generated one.
    #[must_use]
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Sets broker credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets the keep-alive interval.
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    fn options(&self) -> Result<MqttOptions, ProtocolError> {
        let (host, port) = parse_mqtt_url(&self.broker_url)?;
        let client_id = self.client_id.clone().unwrap_or_else(|| {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("protosthetics_{}_{}", std::process::id(), counter)
        });

        let mut options = MqttOptions::new(client_id, host, port);
        options.set_keep_alive(self.keep_alive);
        options.set_clean_session(true);
        if let Some((username, password)) = &self.credentials {
            options.set_credentials(username, password);
        }
        Ok(options)
    }
}

/// Feeds plugin messages from an MQTT topic to a handler.
///
/// Each publish on the topic must carry a `{"plugin", "data"}` envelope.
/// Envelopes are handed over one at a time in arrival order. Malformed
/// payloads are logged and skipped.
///
/// Connection errors do not stop the source. The error is logged and the
/// broker is retried with a growing delay until [`disconnect`] is called.
/// [`is_connected`] reports whether the broker link is currently up.
///
/// [`disconnect`]: MqttNotificationSource::disconnect
/// [`is_connected`]: MqttNotificationSource::is_connected
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use protosthetics_lib::protocol::{MqttConfig, MqttNotificationSource};
///
/// let bridge = Arc::new(bridge);
/// let handler = bridge.clone();
/// let source = MqttNotificationSource::connect(
///     MqttConfig::new("mqtt://broker:1883", "octoprint/plugin/protosthetics"),
///     move |msg| { handler.handle_message(msg); },
/// ).await?;
/// ```
#[derive(Debug)]
pub struct MqttNotificationSource {
    client: AsyncClient,
    topic: String,
    connected: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl MqttNotificationSource {
    /// Connects, subscribes and starts forwarding messages to `handler`.
    ///
    /// # Errors
    ///
    /// Returns error if the broker URL is invalid or the subscription
    /// cannot be queued.
    pub async fn connect<F>(config: MqttConfig, handler: F) -> Result<Self, ProtocolError>
    where
        F: Fn(PluginMessage) + Send + 'static,
    {
        let options = config.options()?;
        let (client, event_loop) = AsyncClient::new(options, 10);

        client
            .subscribe(&config.topic, QoS::AtLeastOnce)
            .await
            .map_err(ProtocolError::Mqtt)?;

        tracing::debug!(topic = %config.topic, "Subscribed to plugin messages");
        let connected = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(forward_messages(
            event_loop,
            config.topic.clone(),
            connected.clone(),
            handler,
        ));

        Ok(Self {
            client,
            topic: config.topic,
            connected,
            task,
        })
    }

    /// Returns the subscribed topic.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns `true` while the broker has acknowledged the connection.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Returns `true` until the source has been disconnected.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Disconnects from the broker and stops forwarding.
    pub async fn disconnect(self) {
        if let Err(e) = self.client.disconnect().await {
            tracing::debug!(error = %e, "MQTT disconnect request failed");
        }
        self.task.abort();
    }
}

/// Parses an MQTT URL into host and port.
fn parse_mqtt_url(url: &str) -> Result<(String, u16), ProtocolError> {
    let url = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    if url.is_empty() {
        return Err(ProtocolError::InvalidAddress("empty broker host".to_string()));
    }

    let (host, port) = if let Some((h, p)) = url.rsplit_once(':') {
        let port = p
            .parse()
            .map_err(|_| ProtocolError::InvalidAddress(format!("Invalid port: {p}")))?;
        (h.to_string(), port)
    } else {
        (url.to_string(), 1883)
    };

    Ok((host, port))
}

/// Decodes the payload of one publish into a plugin message.
fn decode_publish(payload: &[u8]) -> Result<PluginMessage, ParseError> {
    let envelope = serde_json::from_slice::<serde_json::Value>(payload)?;
    PluginMessage::from_value(envelope)
}

/// Hands a publish on `topic` to `handler`. Other events are ignored.
fn forward_event<F>(event: Event, topic: &str, handler: &F)
where
    F: Fn(PluginMessage),
{
    let Event::Incoming(Packet::Publish(publish)) = event else {
        return;
    };
    if publish.topic != topic {
        tracing::trace!(topic = %publish.topic, "Ignoring publish on foreign topic");
        return;
    }
    match decode_publish(&publish.payload) {
        Ok(message) => handler(message),
        Err(e) => {
            tracing::warn!(topic = %publish.topic, error = %e, "Skipping malformed plugin message");
        }
    }
}

async fn forward_messages<F>(
    mut event_loop: EventLoop,
    topic: String,
    connected: Arc<AtomicBool>,
    handler: F,
) where
    F: Fn(PluginMessage),
{
    let mut delay = RECONNECT_DELAY;
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT connected");
                connected.store(true, Ordering::Release);
                delay = RECONNECT_DELAY;
            }
            Ok(event) => forward_event(event, &topic, &handler),
            Err(e) => {
                connected.store(false, Ordering::Release);
                tracing::warn!(error = %e, retry_in = ?delay, "MQTT connection error");
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(MAX_RECONNECT_DELAY);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use rumqttc::Publish;

    use super::*;
    use crate::notification::Notification;

    const TOPIC: &str = "octoprint/plugin/protosthetics";

    fn publish(topic: &str, payload: &str) -> Event {
        Event::Incoming(Packet::Publish(Publish::new(
            topic,
            QoS::AtLeastOnce,
            payload.as_bytes().to_vec(),
        )))
    }

    #[test]
    fn decode_valid_envelope() {
        let msg =
            decode_publish(br#"{"plugin":"protosthetics","data":{"type":"B1","message":"held"}}"#)
                .unwrap();
        assert_eq!(msg.source_id, "protosthetics");
        assert_eq!(msg.notification, Notification::Button("held".to_string()));
    }

    #[test]
    fn decode_bare_string_data() {
        let msg = decode_publish(br#"{"plugin":"protosthetics","data":"Firmware uploaded"}"#)
            .unwrap();
        assert!(msg.notification.is_unrecognized());
    }

    #[test]
    fn decode_invalid_json() {
        assert!(matches!(
            decode_publish(b"{not json"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn decode_missing_plugin() {
        assert!(matches!(
            decode_publish(br#"{"data":{"type":"P","message":1}}"#),
            Err(ParseError::MissingField(ref field)) if field == "plugin"
        ));
    }

    #[test]
    fn forwards_in_arrival_order() {
        let seen = Mutex::new(Vec::new());
        let handler = |msg: PluginMessage| seen.lock().push(msg.notification);

        let events = [
            publish(TOPIC, r#"{"plugin":"protosthetics","data":{"type":"FIL","message":"one"}}"#),
            publish("octoprint/plugin/other", r#"{"plugin":"other","data":{"type":"FIL","message":"x"}}"#),
            publish(TOPIC, "garbage"),
            Event::Incoming(Packet::PingResp),
            publish(TOPIC, r#"{"plugin":"protosthetics","data":{"type":"FIL","message":"two"}}"#),
            publish(TOPIC, r#"{"plugin":"protosthetics","data":{"type":"FIL","message":"three"}}"#),
        ];
        for event in events {
            forward_event(event, TOPIC, &handler);
        }

        assert_eq!(
            *seen.lock(),
            vec![
                Notification::Filament("one".to_string()),
                Notification::Filament("two".to_string()),
                Notification::Filament("three".to_string()),
            ]
        );
    }

    #[test]
    fn parse_url_with_scheme_and_port() {
        let (host, port) = parse_mqtt_url("mqtt://192.168.1.50:1884").unwrap();
        assert_eq!(host, "192.168.1.50");
        assert_eq!(port, 1884);
    }

    #[test]
    fn parse_url_default_port() {
        let (host, port) = parse_mqtt_url("tcp://broker").unwrap();
        assert_eq!(host, "broker");
        assert_eq!(port, 1883);
    }

    #[test]
    fn parse_url_bad_port() {
        assert!(matches!(
            parse_mqtt_url("broker:abc"),
            Err(ProtocolError::InvalidAddress(_))
        ));
    }

    #[test]
    fn parse_url_empty() {
        assert!(parse_mqtt_url("mqtt://").is_err());
    }

    #[test]
    fn generated_client_ids_differ() {
        let config = MqttConfig::new("broker", "t");
        let a = config.options().unwrap();
        let b = config.options().unwrap();
        assert_ne!(a.client_id(), b.client_id());
    }
}
