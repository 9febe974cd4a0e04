// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Registry of active fps listeners.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use taskrate_core::scene::TaskTag;
use taskrate_core::telemetry::{FpsListener, ListenerId};

/// One subscription: a listener handle and the task it wants reports for.
#[derive(Debug, Clone)]
pub struct ListenerEntry {
    /// The transport handle used for delivery.
    pub listener: Arc<dyn FpsListener>,
    /// The task this listener subscribed to.
    pub task_tag: TaskTag,
    /// When a report was last delivered. `None` until the first dispatch.
    pub last_dispatch: Option<Instant>,
    /// Serial number of the registration that created this entry.
    ///
    /// Re-registering the same listener yields a new serial, so work
    /// captured from an older snapshot can tell it is stale.
    pub registration: u64,
}

impl ListenerEntry {
    /// The listener's identity.
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.listener.id()
    }
}

/// A thread-safe table of listeners keyed by [`ListenerId`].
///
/// Registration and removal may come from any thread while a dispatch cycle
/// is running. The lock is only held for the duration of a single map
/// operation; the dispatcher works on a cloned snapshot.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    entries: Mutex<HashMap<ListenerId, ListenerEntry>>,
    next_registration: AtomicU64,
}

impl ListenerRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ListenerId, ListenerEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts or replaces the subscription of `listener` under a fresh
    /// registration serial.
    ///
    /// The new entry has never been dispatched, so the next cycle reports to
    /// it whatever the time since the previous delivery. Returns the entry it
    /// replaced, if any.
    pub fn add(&self, listener: Arc<dyn FpsListener>, task_tag: TaskTag) -> Option<ListenerEntry> {
        let registration = self.reserve_registration();
        self.insert(listener, task_tag, registration)
    }

    /// Hands out the next registration serial without inserting anything.
    ///
    /// Lets a caller link the listener to its death notifications before
    /// the entry becomes visible to a dispatch cycle.
    pub fn reserve_registration(&self) -> u64 {
        self.next_registration.fetch_add(1, Ordering::Relaxed)
    }

    /// Inserts or replaces the subscription of `listener` under a serial
    /// obtained from [`reserve_registration`](Self::reserve_registration).
    ///
    /// ## Arguments
    /// * `listener` - The transport handle; its id keys the entry.
    /// * `task_tag` - The task the listener wants reports for.
    /// * `registration` - A serial reserved for this subscription.
    ///
    /// ## Returns
    /// The entry that was replaced, if the id was already registered.
    pub fn insert(
        &self,
        listener: Arc<dyn FpsListener>,
        task_tag: TaskTag,
        registration: u64,
    ) -> Option<ListenerEntry> {
        let id = listener.id();
        let entry = ListenerEntry {
            listener,
            task_tag,
            last_dispatch: None,
            registration,
        };
        self.entries().insert(id, entry)
    }

    /// Removes the subscription of `id`. Absent ids are ignored.
    pub fn remove(&self, id: ListenerId) -> Option<ListenerEntry> {
        self.entries().remove(&id)
    }

    /// Removes `id` only if it still holds the given registration.
    pub fn remove_if_current(&self, id: ListenerId, registration: u64) -> Option<ListenerEntry> {
        let mut entries = self.entries();
        match entries.get(&id) {
            Some(entry) if entry.registration == registration => entries.remove(&id),
            _ => None,
        }
    }

    /// Returns a copy of every entry. Order is unspecified.
    pub fn active_listeners(&self) -> Vec<ListenerEntry> {
        self.entries().values().cloned().collect()
    }

    /// Records a delivery at `now`.
    ///
    /// Returns `false` without touching anything if the entry was removed or
    /// re-registered since `registration` was observed.
    pub fn mark_dispatched(&self, id: ListenerId, registration: u64, now: Instant) -> bool {
        match self.entries().get_mut(&id) {
            Some(entry) if entry.registration == registration => {
                entry.last_dispatch = Some(now);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if `id` is registered under `registration`.
    pub fn is_current(&self, id: ListenerId, registration: u64) -> bool {
        self.entries()
            .get(&id)
            .is_some_and(|entry| entry.registration == registration)
    }

    /// The registration serial `id` currently holds.
    pub fn registration(&self, id: ListenerId) -> Option<u64> {
        self.entries().get(&id).map(|entry| entry.registration)
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries().contains_key(&id)
    }

    /// The task `id` is subscribed to.
    pub fn task_tag(&self, id: ListenerId) -> Option<TaskTag> {
        self.entries().get(&id).map(|entry| entry.task_tag)
    }

    /// When `id` last received a report.
    pub fn last_dispatch(&self, id: ListenerId) -> Option<Instant> {
        self.entries().get(&id).and_then(|entry| entry.last_dispatch)
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns `true` if no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}
