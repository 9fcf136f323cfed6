// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor readings rounded for display.

use std::fmt;

/// A sensor value rounded to two decimal places.
///
/// The stored value is the rounded one, so repeated reads always format the
/// same way.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::types::Reading;
///
/// let temp = Reading::rounded(21.456);
/// assert_eq!(temp.to_string(), "21.46");
/// assert!((temp.value() - 21.46).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, serde::Serialize)]
pub struct Reading(f64);

impl Reading {
    /// A zero reading, shown before the first sensor report.
    pub const ZERO: Self = Self(0.0);

    /// Rounds a raw sensor value to two decimal places.
    ///
    /// Rounding goes through the decimal text form, so the stored value
    /// always matches what is displayed.
    #[must_use]
    pub fn rounded(raw: f64) -> Self {
        if !raw.is_finite() {
            return Self(raw);
        }
        let text = format!("{raw:.2}");
        Self(text.parse().unwrap_or(raw))
    }

    /// Returns the rounded value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(Reading::rounded(21.456).to_string(), "21.46");
        assert_eq!(Reading::rounded(45.0).to_string(), "45.00");
        assert_eq!(Reading::rounded(-3.14159).to_string(), "-3.14");
    }

    #[test]
    fn zero_formats_with_two_places() {
        assert_eq!(Reading::ZERO.to_string(), "0.00");
    }

    #[test]
    fn rounding_is_stable() {
        let once = Reading::rounded(33.337);
        let twice = Reading::rounded(once.value());
        assert_eq!(once, twice);
    }
}
