// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Observable state model.

use parking_lot::{ReentrantMutex, RwLock};

use super::{EnclosureState, Field, Origin, StateChange};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};

/// The observable state shared by the dispatcher, the gateway and the
/// presentation layer.
///
/// `set` stores the value and then notifies every matching subscriber
/// synchronously, before it returns. Writes are serialized: subscribers see
/// updates in the order they were stored, even when several threads write
/// at once. The state lock is released before callbacks run, so callbacks
/// may read the model and write to it from the same thread. Values are
/// stored as given; nothing is validated here.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// use protosthetics_lib::state::{Field, Origin, StateChange, StateModel};
/// use protosthetics_lib::subscription::Subscribable;
///
/// let model = StateModel::new();
/// let hits = Arc::new(AtomicU32::new(0));
/// let hits_clone = hits.clone();
/// model.subscribe(Field::ButtonStatus, move |_, _| {
///     hits_clone.fetch_add(1, Ordering::SeqCst);
/// });
///
/// model.set(StateChange::ButtonStatus("press".into()), Origin::Remote);
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// assert_eq!(model.snapshot().button_status(), "press");
/// ```
#[derive(Debug)]
pub struct StateModel {
    state: RwLock<EnclosureState>,
    callbacks: CallbackRegistry,
    // Held across store and notify.
    update: ReentrantMutex<()>,
}

impl Default for StateModel {
    fn default() -> Self {
        Self::with_state(EnclosureState::default())
    }
}

impl StateModel {
    /// Creates a model holding the initial display state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a model holding the given state.
    #[must_use]
    pub fn with_state(state: EnclosureState) -> Self {
        Self {
            state: RwLock::new(state),
            callbacks: CallbackRegistry::new(),
            update: ReentrantMutex::new(()),
        }
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> EnclosureState {
        self.state.read().clone()
    }

    /// Returns the current value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> StateChange {
        self.state.read().field(field)
    }

    /// Stores a change and notifies subscribers.
    ///
    /// Subscribers are notified even if the value did not change. Returns
    /// `true` if any stored value differs from before.
    pub fn set(&self, change: StateChange, origin: Origin) -> bool {
        let _update = self.update.lock();
        let changed = self.state.write().apply(&change);
        self.callbacks.dispatch(&change, origin);
        changed
    }

    /// Removes every subscription.
    pub fn clear_subscriptions(&self) {
        self.callbacks.clear();
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.callbacks.callback_count()
    }
}

impl Subscribable for StateModel {
    fn subscribe<F>(&self, field: Field, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        self.callbacks.on_field_changed(field, callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        self.callbacks.on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }
}
