// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for observable state holders.

use crate::state::{Field, Origin, StateChange};
use crate::subscription::SubscriptionId;

/// Trait for types whose fields can be observed.
///
/// Callbacks run synchronously, before the write that triggered them
/// returns.
///
/// # Examples
///
/// ```
/// use protosthetics_lib::state::{Field, Origin, StateChange, StateModel};
/// use protosthetics_lib::subscription::Subscribable;
///
/// let model = StateModel::new();
/// let sub = model.subscribe(Field::FilamentStatus, |change, origin| {
///     println!("{change:?} from {origin:?}");
/// });
///
/// model.set(StateChange::FilamentStatus("jammed".into()), Origin::Remote);
/// assert!(model.unsubscribe(sub));
/// ```
pub trait Subscribable {
    /// Subscribes to changes of a single field.
    fn subscribe<F>(&self, field: Field, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static;

    /// Subscribes to every change.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
