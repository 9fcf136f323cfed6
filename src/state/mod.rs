// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State model types.
//!
//! [`StateModel`] is the observable container; [`EnclosureState`] is a plain
//! snapshot of its fields; [`StateChange`] is one assignment, tagged on
//! write with the [`Origin`] that made it.
//!
//! # Examples
//!
//! ```
//! use protosthetics_lib::state::{Origin, StateChange, StateModel};
//!
//! let model = StateModel::new();
//! model.set(StateChange::HumidityLow(35.0), Origin::User);
//! assert!((model.snapshot().humidity_low() - 35.0).abs() < f64::EPSILON);
//! ```

mod enclosure_state;
mod model;
mod state_change;

pub use enclosure_state::EnclosureState;
pub use model::StateModel;
pub use state_change::{Field, Origin, StateChange};
