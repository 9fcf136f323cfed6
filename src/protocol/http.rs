// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP delivery of outbound commands.
//!
//! Device commands go to the plugin's simple API endpoint as JSON. Queue
//! commands go to the print-queue plugin's blueprint routes.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::{Client, RequestBuilder};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::command::{Command, DeviceCommand, OutboundCommand, QueueCommand, RequestMethod};
use crate::config::DEFAULT_PLUGIN_ID;
use crate::error::ProtocolError;
use crate::protocol::CommandSink;

const API_KEY_HEADER: &str = "X-Api-Key";

// ============================================================================
// HttpConfig
// ============================================================================

/// Connection parameters for the print-server HTTP API.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("octopi.local")
///     .with_api_key("secret")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.api_url(), "http://octopi.local/api/plugin/protosthetics");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    api_key: Option<String>,
    plugin_id: String,
    queue_plugin: String,
    timeout: Duration,
}

impl HttpConfig {
    /// Default print-queue plugin identifier.
    pub const DEFAULT_QUEUE_PLUGIN: &'static str = "continuousprint";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the server at `base_url`.
    ///
    /// A missing scheme defaults to `http://`. Trailing slashes are dropped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&base_url.into()),
            api_key: None,
            plugin_id: DEFAULT_PLUGIN_ID.to_string(),
            queue_plugin: Self::DEFAULT_QUEUE_PLUGIN.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the API key sent with every request.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the enclosure plugin identifier.
    #[must_use]
    pub fn with_plugin_id(mut self, plugin_id: impl Into<String>) -> Self {
        self.plugin_id = plugin_id.into();
        self
    }

    /// Sets the print-queue plugin identifier.
    #[must_use]
    pub fn with_queue_plugin(mut self, queue_plugin: impl Into<String>) -> Self {
        self.queue_plugin = queue_plugin.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the API key if set.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Returns the enclosure plugin identifier.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the URL device commands are posted to.
    #[must_use]
    pub fn api_url(&self) -> String {
        format!(
            "{}/api/plugin/{}",
            self.base_url,
            urlencoding::encode(&self.plugin_id)
        )
    }

    /// Returns the URL for a queue command.
    #[must_use]
    pub fn queue_url(&self, command: &QueueCommand) -> String {
        format!(
            "{}/plugin/{}/{}",
            self.base_url,
            urlencoding::encode(&self.queue_plugin),
            command.name()
        )
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            config: self,
            client,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// Delivers single commands over HTTP.
///
/// # Examples
///
/// ```no_run
/// use protosthetics_lib::command::DeviceCommand;
/// use protosthetics_lib::protocol::HttpConfig;
///
/// # async fn example() -> Result<(), protosthetics_lib::error::ProtocolError> {
/// let client = HttpConfig::new("octopi.local").with_api_key("secret").into_client()?;
/// client.deliver(&DeviceCommand::LightToggle.into()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: HttpConfig,
    client: Client,
}

impl HttpClient {
    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Sends one command and checks the response status.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Http` if the request fails and
    /// `ProtocolError::ConnectionFailed` on a non-success status.
    pub async fn deliver(&self, command: &OutboundCommand) -> Result<(), ProtocolError> {
        let request = match command {
            OutboundCommand::Device(cmd) => self.device_request(cmd),
            OutboundCommand::Queue(cmd) => self.queue_request(cmd),
        };

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "{} returned HTTP {status}",
                command.name()
            )));
        }

        tracing::debug!(command = command.name(), %status, "Command delivered");
        Ok(())
    }

    fn device_request(&self, command: &DeviceCommand) -> RequestBuilder {
        self.client
            .post(self.config.api_url())
            .json(&command.request_body())
    }

    fn queue_request(&self, command: &QueueCommand) -> RequestBuilder {
        let url = self.config.queue_url(command);
        match command.method() {
            RequestMethod::Get => self.client.get(url),
            RequestMethod::Post => self.client.post(url).form(&command.form()),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// A [`CommandSink`] that delivers commands over HTTP from a background task.
///
/// `send` enqueues and returns immediately. Commands are delivered one at a
/// time in submission order. Delivery failures are logged and dropped.
///
/// The transport is usually shared: one `Arc` goes to the bridge as its
/// sink, another is kept to call [`HttpTransport::shutdown`].
#[derive(Debug)]
pub struct HttpTransport {
    tx: Mutex<Option<mpsc::UnboundedSender<OutboundCommand>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpTransport {
    /// Builds a client and spawns the delivery task on the current runtime.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::NoRuntime` outside a tokio runtime, or an
    /// error if the HTTP client cannot be created.
    pub fn start(config: HttpConfig) -> Result<Self, ProtocolError> {
        let handle = Handle::try_current().map_err(|_| ProtocolError::NoRuntime("http worker"))?;
        let client = config.into_client()?;
        let (tx, rx) = mpsc::unbounded_channel();

        tracing::debug!(url = %client.config().api_url(), "Starting HTTP command worker");
        let worker = handle.spawn(run_worker(client, rx));

        Ok(Self {
            tx: Mutex::new(Some(tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Returns `true` once [`HttpTransport::shutdown`] has been called.
    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.tx.lock().is_none()
    }

    /// Stops accepting commands and waits for queued ones to be delivered.
    ///
    /// Later calls return immediately.
    pub async fn shutdown(&self) {
        self.tx.lock().take();
        let worker = self.worker.lock().take();
        if let Some(worker) = worker
            && let Err(e) = worker.await
        {
            tracing::warn!(error = %e, "HTTP command worker terminated abnormally");
        }
    }
}

impl CommandSink for HttpTransport {
    fn send(&self, command: OutboundCommand) {
        let name = command.name();
        let delivered = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(command).is_ok(),
            None => false,
        };
        if !delivered {
            tracing::warn!(command = name, "HTTP command worker stopped, discarding command");
        }
    }
}

async fn run_worker(client: HttpClient, mut rx: mpsc::UnboundedReceiver<OutboundCommand>) {
    while let Some(command) = rx.recv().await {
        if let Err(e) = client.deliver(&command).await {
            tracing::warn!(command = command.name(), error = %e, "Command delivery failed");
        }
    }
    tracing::debug!("HTTP command worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpConfig::new("192.168.1.10");
        assert_eq!(config.base_url(), "http://192.168.1.10");
        assert_eq!(config.plugin_id(), "protosthetics");
        assert_eq!(config.api_key(), None);
        assert_eq!(config.timeout(), HttpConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn base_url_keeps_scheme_and_drops_slash() {
        let config = HttpConfig::new("https://printer.example/");
        assert_eq!(config.base_url(), "https://printer.example");
    }

    #[test]
    fn queue_urls() {
        let config = HttpConfig::new("octopi.local:5000");
        assert_eq!(
            config.queue_url(&QueueCommand::ResumeQueue),
            "http://octopi.local:5000/plugin/continuousprint/resumequeue"
        );
        assert_eq!(
            config.queue_url(&QueueCommand::SetActive { active: false }),
            "http://octopi.local:5000/plugin/continuousprint/set_active"
        );
    }

    #[test]
    fn plugin_id_is_encoded() {
        let config = HttpConfig::new("host").with_plugin_id("my plugin");
        assert_eq!(config.api_url(), "http://host/api/plugin/my%20plugin");
    }

    #[test]
    fn start_without_runtime_fails() {
        let result = HttpTransport::start(HttpConfig::new("host"));
        assert!(matches!(result, Err(ProtocolError::NoRuntime(_))));
    }
}
