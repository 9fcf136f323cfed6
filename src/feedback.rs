// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-facing alerts and toasts.
//!
//! The presentation layer decides how to render these. `ERROR`
//! notifications become blocking [`Alert`]s, `POP` notifications become
//! non-blocking [`Toast`]s. Every delivery is surfaced again; nothing is
//! deduplicated.

use chrono::{DateTime, Utc};

/// A blocking alert that needs the user's attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Text to show.
    pub message: String,
    /// When the alert was raised.
    pub raised_at: DateTime<Utc>,
}

impl Alert {
    /// Creates an alert stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// A transient, self-dismissing success notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Toast title.
    pub title: String,
    /// Toast body.
    pub message: String,
    /// When the toast was raised.
    pub raised_at: DateTime<Utc>,
}

impl Toast {
    /// Title used for enclosure toasts.
    pub const DEFAULT_TITLE: &'static str = "Protosthetics";

    /// Creates a toast with the default title, stamped with the current time.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            title: Self::DEFAULT_TITLE.to_string(),
            message: message.into(),
            raised_at: Utc::now(),
        }
    }
}

/// Sink for user-facing feedback.
pub trait Feedback: Send + Sync {
    /// Shows a blocking alert.
    fn alert(&self, alert: Alert);

    /// Shows a transient toast.
    fn toast(&self, toast: Toast);
}

/// Feedback sink that only logs.
///
/// Useful for headless sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl Feedback for TracingFeedback {
    fn alert(&self, alert: Alert) {
        tracing::error!(text = %alert.message, "Enclosure alert");
    }

    fn toast(&self, toast: Toast) {
        tracing::info!(title = %toast.title, text = %toast.message, "Enclosure toast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_default_title() {
        let toast = Toast::new("Script loaded");
        assert_eq!(toast.title, "Protosthetics");
        assert_eq!(toast.message, "Script loaded");
    }

    #[test]
    fn alert_is_stamped() {
        let before = Utc::now();
        let alert = Alert::new("Thermal runaway");
        assert!(alert.raised_at >= before);
    }
}
