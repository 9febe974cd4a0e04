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

//! The transport-side contract of an fps listener.

use std::fmt::{self, Debug};

use thiserror::Error;

/// Identity of a listener handle, assigned by the transport.
///
/// Two handles with the same id are the same listener: registering it again
/// replaces the previous subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Why a report could not be handed to a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The remote end is gone. The listener should be dropped.
    #[error("listener {0} is no longer alive")]
    ListenerDead(ListenerId),
    /// The listener is alive but its inbound queue is full; the report was
    /// dropped.
    #[error("listener {0} is not keeping up, report dropped")]
    Backpressure(ListenerId),
}

/// Events a transport raises about its listeners from any thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerEvent {
    /// The process behind the listener died.
    ///
    /// `registration` names the subscription the transport was linked to.
    /// A listener registered again under the same id gets a new serial, so a
    /// late notification for the old subscription leaves the new one alone.
    Died {
        /// The dead listener.
        id: ListenerId,
        /// Serial of the subscription the death link belongs to.
        registration: u64,
    },
}

/// The sending half of a death link, bound to one subscription.
///
/// Handed to [`FpsListener::link_to_death`]. The transport keeps it and calls
/// [`notify`](DeathNotifier::notify) once when the remote end goes away.
#[derive(Debug, Clone)]
pub struct DeathNotifier {
    id: ListenerId,
    registration: u64,
    sender: flume::Sender<ListenerEvent>,
}

impl DeathNotifier {
    /// Binds a death link to one subscription.
    ///
    /// ## Arguments
    /// * `id` - The listener the link belongs to.
    /// * `registration` - The serial of the subscription being linked.
    /// * `sender` - Where [`ListenerEvent::Died`] is published.
    pub fn new(id: ListenerId, registration: u64, sender: flume::Sender<ListenerEvent>) -> Self {
        Self {
            id,
            registration,
            sender,
        }
    }

    /// The listener this link belongs to.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// The subscription this link belongs to.
    pub fn registration(&self) -> u64 {
        self.registration
    }

    /// Publishes the death of the linked subscription.
    ///
    /// ## Returns
    /// `false` if nobody is listening for deaths anymore.
    pub fn notify(&self) -> bool {
        self.sender
            .send(ListenerEvent::Died {
                id: self.id,
                registration: self.registration,
            })
            .is_ok()
    }
}

/// A remote subscriber receiving fps reports for one task.
///
/// Delivery is one-way: [`on_fps_reported`](FpsListener::on_fps_reported)
/// must hand the value to the transport and return without waiting for the
/// remote side to acknowledge it.
pub trait FpsListener: Send + Sync + Debug {
    /// The identity of this handle.
    fn id(&self) -> ListenerId;

    /// Delivers a freshly computed fps value.
    fn on_fps_reported(&self, fps: f32) -> Result<(), DeliveryError>;

    /// Asks the transport to call [`DeathNotifier::notify`] when this
    /// listener's process goes away.
    ///
    /// A new link replaces any previous one.
    fn link_to_death(&self, notifier: DeathNotifier) {
        let _ = notifier;
    }

    /// Cancels the link made for `registration`.
    ///
    /// A link made since for another registration stays in place.
    fn unlink_to_death(&self, registration: u64) {
        let _ = registration;
    }
}
