// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! The inbound path never fails: notifications that cannot be understood are
//! decoded into ignorable variants instead. Errors only come out of session
//! construction (settings loading, transport start-up) and explicit parsing.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value conversion.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred in a transport.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a document or frame.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Settings could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to converting wire values into typed values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// An unknown queue action name was provided.
    #[error("unknown queue action: {0}")]
    UnknownQueueAction(String),

    /// An unknown settings key was provided.
    #[error("unknown settings key: {0}")]
    UnknownSettingKey(String),

    /// An unknown notification tag was provided.
    #[error("unknown notification type: {0}")]
    UnknownNotificationKind(String),
}

/// Errors related to the HTTP and MQTT transports.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP client construction failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// MQTT subscription failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// The remote end answered with a failure status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A background worker needs a tokio runtime and none is running.
    #[error("no tokio runtime available to start {0}")]
    NoRuntime(&'static str),
}

/// Errors related to parsing notification frames and settings documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing.
    #[error("missing field: {0}")]
    MissingField(String),

    /// Unexpected document shape.
    #[error("unexpected format: {0}")]
    UnexpectedFormat(String),
}

/// Errors raised by a settings source.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document could not be parsed.
    #[error("invalid settings document: {0}")]
    Invalid(#[from] ParseError),

    /// The settings store could not be reached.
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::UnknownQueueAction("pauseQueue".to_string());
        assert_eq!(err.to_string(), "unknown queue action: pauseQueue");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::UnknownSettingKey("words".to_string()).into();
        assert!(matches!(
            err,
            Error::Value(ValueError::UnknownSettingKey(ref key)) if key == "words"
        ));
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::MissingField("type".to_string());
        assert_eq!(err.to_string(), "missing field: type");
    }

    #[test]
    fn config_error_wraps_parse_error() {
        let err: ConfigError = ParseError::UnexpectedFormat("array".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid settings document: unexpected format: array"
        );
    }

    #[test]
    fn no_runtime_display() {
        let err = ProtocolError::NoRuntime("http worker");
        assert_eq!(err.to_string(), "no tokio runtime available to start http worker");
    }
}
