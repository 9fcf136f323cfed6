// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire tags of the recognized notification kinds.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// The closed set of notification tags the enclosure sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// `ERROR`: blocking alert.
    Error,
    /// `INFO`: log line.
    Info,
    /// `POP`: transient success toast.
    Pop,
    /// `FUNCTION`: remote invocation of a queue action.
    Function,
    /// `L`: light level.
    Light,
    /// `DRYER`: dryer relay state.
    Dryer,
    /// `P`: printer relay state.
    Printer,
    /// `B1`: physical button event.
    Button,
    /// `Temp`: enclosure temperature.
    Temperature,
    /// `Hum`: enclosure humidity.
    Humidity,
    /// `FIL`: filament change status.
    Filament,
    /// `PROGRESS`: print progress.
    Progress,
}

impl NotificationKind {
    /// All recognized kinds.
    pub const ALL: [Self; 12] = [
        Self::Error,
        Self::Info,
        Self::Pop,
        Self::Function,
        Self::Light,
        Self::Dryer,
        Self::Printer,
        Self::Button,
        Self::Temperature,
        Self::Humidity,
        Self::Filament,
        Self::Progress,
    ];

    /// Returns the tag as it appears in the `type` field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Info => "INFO",
            Self::Pop => "POP",
            Self::Function => "FUNCTION",
            Self::Light => "L",
            Self::Dryer => "DRYER",
            Self::Printer => "P",
            Self::Button => "B1",
            Self::Temperature => "Temp",
            Self::Humidity => "Hum",
            Self::Filament => "FIL",
            Self::Progress => "PROGRESS",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = ValueError;

    /// Tags are case-sensitive: `"temp"` is not `"Temp"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::UnknownNotificationKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_back() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.as_str().parse::<NotificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert!("temp".parse::<NotificationKind>().is_err());
        assert!("error".parse::<NotificationKind>().is_err());
        assert!("l".parse::<NotificationKind>().is_err());
    }
}
