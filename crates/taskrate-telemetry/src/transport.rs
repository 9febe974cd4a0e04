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

//! An in-process listener transport built on bounded channels.
//!
//! [`ChannelListener`] is the handle registered with the reporter and
//! [`FpsReceiver`] is what the subscriber keeps. Delivery never blocks: a
//! full queue drops the report and a dropped receiver marks the listener
//! dead. Dropping the receiver also publishes a death notification if the
//! listener was linked to one.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use flume::TrySendError;
use taskrate_core::telemetry::{DeathNotifier, DeliveryError, FpsListener, ListenerId};

type DeathLink = Arc<Mutex<Option<DeathNotifier>>>;

/// The reporter-side handle of an in-process listener.
#[derive(Debug)]
pub struct ChannelListener {
    id: ListenerId,
    sender: flume::Sender<f32>,
    death: DeathLink,
}

impl ChannelListener {
    /// Creates a connected handle/receiver pair.
    ///
    /// ## Arguments
    /// * `id` - The identity shared by both halves.
    /// * `capacity` - How many reports may wait in the queue, raised to at
    ///   least one.
    ///
    /// ## Returns
    /// The handle to register with the reporter and the receiver the
    /// subscriber keeps.
    pub fn pair(id: ListenerId, capacity: usize) -> (Self, FpsReceiver) {
        let (sender, receiver) = flume::bounded(capacity.max(1));
        let death: DeathLink = Arc::new(Mutex::new(None));
        let listener = Self {
            id,
            sender,
            death: Arc::clone(&death),
        };
        let receiver = FpsReceiver {
            id,
            receiver,
            death,
        };
        (listener, receiver)
    }
}

impl FpsListener for ChannelListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn on_fps_reported(&self, fps: f32) -> Result<(), DeliveryError> {
        match self.sender.try_send(fps) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(DeliveryError::Backpressure(self.id)),
            Err(TrySendError::Disconnected(_)) => Err(DeliveryError::ListenerDead(self.id)),
        }
    }

    fn link_to_death(&self, notifier: DeathNotifier) {
        *self.death.lock().unwrap_or_else(PoisonError::into_inner) = Some(notifier);
    }

    fn unlink_to_death(&self, registration: u64) {
        let mut link = self.death.lock().unwrap_or_else(PoisonError::into_inner);
        if link
            .as_ref()
            .is_some_and(|notifier| notifier.registration() == registration)
        {
            *link = None;
        }
    }
}

/// The subscriber side of a [`ChannelListener`].
#[derive(Debug)]
pub struct FpsReceiver {
    id: ListenerId,
    receiver: flume::Receiver<f32>,
    death: DeathLink,
}

impl FpsReceiver {
    /// The id of the paired listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns the oldest pending report without blocking.
    pub fn try_recv(&self) -> Option<f32> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `timeout` for the next report.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<f32> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Takes every pending report, oldest first.
    pub fn drain(&self) -> Vec<f32> {
        self.receiver.try_iter().collect()
    }

    /// Takes every pending report and returns only the newest.
    pub fn latest(&self) -> Option<f32> {
        self.receiver.try_iter().last()
    }
}

impl Drop for FpsReceiver {
    fn drop(&mut self) {
        let notifier = self
            .death
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(notifier) = notifier {
            log::debug!("FpsReceiver: {} dropped, sending death notification", self.id);
            // The reporter may already be gone; nobody is left to notify then.
            notifier.notify();
        }
    }
}
