// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Commands for the print-queue subsystem.

use std::fmt;
use std::str::FromStr;

use serde_json::{Value, json};

use super::Command;
use crate::error::ValueError;

/// Request verb used by a queue endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    /// Read-style request without a body.
    Get,
    /// Request carrying a body.
    Post,
}

/// A request to the print-queue subsystem.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::command::{Command, QueueCommand, RequestMethod};
///
/// let cmd = QueueCommand::SetActive { active: true };
/// assert_eq!(cmd.name(), "set_active");
/// assert_eq!(cmd.method(), RequestMethod::Post);
/// assert_eq!(cmd.payload(), Some(serde_json::json!({"active": true})));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueCommand {
    /// Resumes a paused queue.
    ResumeQueue,
    /// Starts the queue from the top.
    StartQueue,
    /// Marks the queue active or inactive.
    SetActive {
        /// New activity flag.
        active: bool,
    },
}

impl QueueCommand {
    /// Returns the verb the endpoint expects.
    #[must_use]
    pub const fn method(&self) -> RequestMethod {
        match self {
            Self::ResumeQueue | Self::StartQueue => RequestMethod::Get,
            Self::SetActive { .. } => RequestMethod::Post,
        }
    }

    /// Returns the form fields sent with the request.
    #[must_use]
    pub fn form(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::ResumeQueue | Self::StartQueue => Vec::new(),
            Self::SetActive { active } => vec![("active", active.to_string())],
        }
    }
}

impl Command for QueueCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::ResumeQueue => "resumequeue",
            Self::StartQueue => "startqueue",
            Self::SetActive { .. } => "set_active",
        }
    }

    fn payload(&self) -> Option<Value> {
        match self {
            Self::ResumeQueue | Self::StartQueue => None,
            Self::SetActive { active } => Some(json!({ "active": active })),
        }
    }
}

/// A queue operation that can be triggered by the user or by the device.
///
/// Both paths resolve through [`QueueAction::command`], so a button press
/// and a remote invocation always produce the same request.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::command::{QueueAction, QueueCommand};
///
/// let action: QueueAction = "setNotActive".parse().unwrap();
/// assert_eq!(action.command(), QueueCommand::SetActive { active: false });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueAction {
    /// Resume the queue.
    ResumeQueue,
    /// Start the queue.
    StartQueue,
    /// Activate the queue.
    SetActive,
    /// Deactivate the queue.
    SetNotActive,
}

impl QueueAction {
    /// All actions.
    pub const ALL: [Self; 4] = [
        Self::ResumeQueue,
        Self::StartQueue,
        Self::SetActive,
        Self::SetNotActive,
    ];

    /// Returns the action name as the device spells it.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ResumeQueue => "resumeQueue",
            Self::StartQueue => "startQueue",
            Self::SetActive => "setActive",
            Self::SetNotActive => "setNotActive",
        }
    }

    /// Returns the queue request this action issues.
    #[must_use]
    pub const fn command(&self) -> QueueCommand {
        match self {
            Self::ResumeQueue => QueueCommand::ResumeQueue,
            Self::StartQueue => QueueCommand::StartQueue,
            Self::SetActive => QueueCommand::SetActive { active: true },
            Self::SetNotActive => QueueCommand::SetActive { active: false },
        }
    }
}

impl fmt::Display for QueueAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueAction {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ValueError::UnknownQueueAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_style_endpoints_have_no_body() {
        for cmd in [QueueCommand::ResumeQueue, QueueCommand::StartQueue] {
            assert_eq!(cmd.method(), RequestMethod::Get);
            assert_eq!(cmd.payload(), None);
            assert!(cmd.form().is_empty());
        }
    }

    #[test]
    fn set_active_form() {
        assert_eq!(
            QueueCommand::SetActive { active: false }.form(),
            vec![("active", "false".to_string())]
        );
    }

    #[test]
    fn action_names_parse() {
        for action in QueueAction::ALL {
            assert_eq!(action.as_str().parse::<QueueAction>(), Ok(action));
        }
    }

    #[test]
    fn action_name_is_case_sensitive() {
        assert!("resumequeue".parse::<QueueAction>().is_err());
        assert!("SetActive".parse::<QueueAction>().is_err());
    }

    #[test]
    fn actions_map_to_commands() {
        assert_eq!(QueueAction::ResumeQueue.command(), QueueCommand::ResumeQueue);
        assert_eq!(QueueAction::StartQueue.command(), QueueCommand::StartQueue);
        assert_eq!(
            QueueAction::SetActive.command(),
            QueueCommand::SetActive { active: true }
        );
    }
}
