// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for state model changes.
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches changes
//! - [`Subscribable`] - Trait for types that support field subscriptions
//!
//! Every callback receives the [`StateChange`](crate::state::StateChange)
//! and its [`Origin`](crate::state::Origin). Write-through of user edits
//! hangs off this: the gateway subscribes to the settings fields and only
//! reacts to [`Origin::User`](crate::state::Origin::User).

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
