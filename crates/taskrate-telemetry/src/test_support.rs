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

//! Stub collaborators shared by the unit tests of this crate.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use taskrate_core::scene::LayerId;
use taskrate_core::telemetry::{
    DeathNotifier, DeliveryError, FpsComputer, FpsListener, ListenerId,
};

/// A listener that records every value it receives.
#[derive(Debug)]
pub(crate) struct RecordingListener {
    id: ListenerId,
    pub(crate) reports: Mutex<Vec<f32>>,
    pub(crate) dead: AtomicBool,
    /// Simulates a full inbound queue.
    pub(crate) saturated: AtomicBool,
    pub(crate) linked: Mutex<Option<DeathNotifier>>,
}

impl RecordingListener {
    pub(crate) fn new(id: u64) -> Self {
        Self {
            id: ListenerId(id),
            reports: Mutex::new(Vec::new()),
            dead: AtomicBool::new(false),
            saturated: AtomicBool::new(false),
            linked: Mutex::new(None),
        }
    }

    pub(crate) fn reports(&self) -> Vec<f32> {
        self.reports.lock().unwrap().clone()
    }

    pub(crate) fn is_linked(&self) -> bool {
        self.linked.lock().unwrap().is_some()
    }

    pub(crate) fn linked_registration(&self) -> Option<u64> {
        self.linked
            .lock()
            .unwrap()
            .as_ref()
            .map(DeathNotifier::registration)
    }

    /// Fires the death link, as a transport would when the remote dies.
    pub(crate) fn die(&self) {
        self.dead.store(true, Ordering::SeqCst);
        if let Some(notifier) = self.linked.lock().unwrap().take() {
            notifier.notify();
        }
    }
}

impl FpsListener for RecordingListener {
    fn id(&self) -> ListenerId {
        self.id
    }

    fn on_fps_reported(&self, fps: f32) -> Result<(), DeliveryError> {
        if self.dead.load(Ordering::SeqCst) {
            return Err(DeliveryError::ListenerDead(self.id));
        }
        if self.saturated.load(Ordering::SeqCst) {
            return Err(DeliveryError::Backpressure(self.id));
        }
        self.reports.lock().unwrap().push(fps);
        Ok(())
    }

    fn link_to_death(&self, notifier: DeathNotifier) {
        *self.linked.lock().unwrap() = Some(notifier);
    }

    fn unlink_to_death(&self, registration: u64) {
        let mut linked = self.linked.lock().unwrap();
        if linked.as_ref().map(DeathNotifier::registration) == Some(registration) {
            *linked = None;
        }
    }
}

/// An fps computer returning a fixed value and recording each layer set.
#[derive(Debug)]
pub(crate) struct RecordingFpsComputer {
    value: f32,
    pub(crate) calls: Mutex<Vec<HashSet<LayerId>>>,
    pub(crate) count: AtomicUsize,
}

impl RecordingFpsComputer {
    pub(crate) fn returning(value: f32) -> Self {
        Self {
            value,
            calls: Mutex::new(Vec::new()),
            count: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<HashSet<LayerId>> {
        self.calls.lock().unwrap().clone()
    }
}

impl FpsComputer for RecordingFpsComputer {
    fn compute_fps(&self, layers: &HashSet<LayerId>) -> f32 {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(layers.clone());
        self.value
    }
}
