// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for state model subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{Field, Origin, StateChange};

/// Unique identifier for a subscription.
///
/// IDs increase monotonically within a registry, and callbacks run in
/// subscription order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Callback receiving a single-field change and who made it.
type ChangeCallback = Arc<dyn Fn(&StateChange, Origin) + Send + Sync>;

/// Registry for state model callbacks.
///
/// Callbacks are cloned out of the registry before they run, so a callback
/// may subscribe, unsubscribe or write to the model without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Callbacks bound to a single field.
    field_callbacks: RwLock<BTreeMap<SubscriptionId, (Field, ChangeCallback)>>,
    /// Callbacks receiving every change.
    state_changed_callbacks: RwLock<BTreeMap<SubscriptionId, ChangeCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            field_callbacks: RwLock::new(BTreeMap::new()),
            state_changed_callbacks: RwLock::new(BTreeMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Registers a callback for changes to one field.
    pub fn on_field_changed<F>(&self, field: Field, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.field_callbacks
            .write()
            .insert(id, (field, Arc::new(callback)));
        id
    }

    /// Registers a callback for every change.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange, Origin) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        if self.field_callbacks.write().remove(&id).is_some() {
            return true;
        }
        self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.field_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    /// Dispatches a change to the relevant callbacks.
    ///
    /// Batches are flattened: each nested change is dispatched on its own,
    /// so field subscribers only ever see single-field changes.
    pub fn dispatch(&self, change: &StateChange, origin: Origin) {
        if let StateChange::Batch(changes) = change {
            for nested in changes {
                self.dispatch(nested, origin);
            }
            return;
        }

        let Some(field) = change.field() else {
            return;
        };

        let generic: Vec<ChangeCallback> = self
            .state_changed_callbacks
            .read()
            .values()
            .cloned()
            .collect();
        for callback in generic {
            callback(change, origin);
        }

        let specific: Vec<ChangeCallback> = self
            .field_callbacks
            .read()
            .values()
            .filter(|(bound, _)| *bound == field)
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in specific {
            callback(change, origin);
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.field_callbacks.read().len() + self.state_changed_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}
