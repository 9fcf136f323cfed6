// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off states reported by the enclosure relays.

use std::fmt;

/// Power state of a relay-driven output (printer, dryer).
///
/// # Examples
///
/// ```
/// use protosthetics_lib::types::SwitchState;
///
/// assert_eq!(SwitchState::On.as_str(), "ON");
/// assert_eq!(SwitchState::from_flag_str("0"), Some(SwitchState::Off));
/// assert_eq!(SwitchState::from_flag_str("on"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SwitchState {
    /// Output is off.
    Off,
    /// Output is on.
    On,
}

impl SwitchState {
    /// Returns the display word used in status texts.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Parses the string flags `"1"` and `"0"`.
    ///
    /// Anything else, including padded or spelled-out forms, is rejected.
    #[must_use]
    pub fn from_flag_str(flag: &str) -> Option<Self> {
        match flag {
            "1" => Some(Self::On),
            "0" => Some(Self::Off),
            _ => None,
        }
    }

    /// Parses the numeric flags `1` and `0`.
    #[must_use]
    pub fn from_flag_number(flag: f64) -> Option<Self> {
        if flag == 1.0 {
            Some(Self::On)
        } else if flag == 0.0 {
            Some(Self::Off)
        } else {
            None
        }
    }

    /// Returns `true` if the output is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Style tag paired with the printer power text.
///
/// The presentation layer maps these onto its own classes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    /// Positive state (printer powered).
    #[default]
    Success,
    /// Negative state (printer unpowered).
    Danger,
}

impl StatusClass {
    /// Returns the tag as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Danger => "danger",
        }
    }
}

impl From<SwitchState> for StatusClass {
    fn from(state: SwitchState) -> Self {
        match state {
            SwitchState::On => Self::Success,
            SwitchState::Off => Self::Danger,
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_str_accepts_only_exact_digits() {
        assert_eq!(SwitchState::from_flag_str("1"), Some(SwitchState::On));
        assert_eq!(SwitchState::from_flag_str("0"), Some(SwitchState::Off));
        assert_eq!(SwitchState::from_flag_str(" 1"), None);
        assert_eq!(SwitchState::from_flag_str("2"), None);
        assert_eq!(SwitchState::from_flag_str(""), None);
    }

    #[test]
    fn flag_number() {
        assert_eq!(SwitchState::from_flag_number(1.0), Some(SwitchState::On));
        assert_eq!(SwitchState::from_flag_number(0.0), Some(SwitchState::Off));
        assert_eq!(SwitchState::from_flag_number(0.5), None);
        assert_eq!(SwitchState::from_flag_number(-1.0), None);
    }

    #[test]
    fn status_class_follows_switch() {
        assert_eq!(StatusClass::from(SwitchState::On), StatusClass::Success);
        assert_eq!(StatusClass::from(SwitchState::Off), StatusClass::Danger);
        assert_eq!(StatusClass::Danger.to_string(), "danger");
    }

    #[test]
    fn from_bool() {
        assert!(SwitchState::from(true).is_on());
        assert!(!SwitchState::from(false).is_on());
    }
}
